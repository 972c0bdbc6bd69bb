use crate::geometry::surface::Plane;

use super::{Point3, Vector3, EPSILON15};

/// Relationship of a ray with a plane.
#[derive(Debug)]
pub enum RayPlaneRelation {
    /// Ray hits the plane at `origin + t * dir` with `t >= 0`.
    Point { point: Point3, t: f64 },
    /// Ray direction is parallel to the plane.
    Parallel,
    /// The supporting line crosses the plane behind the ray origin.
    Behind,
}

/// Computes the intersection of a ray `origin + t * dir` (`t >= 0`) with a plane.
///
/// The parallel test compares `normal . dir` against [`EPSILON15`], so `dir`
/// is expected to be unit length.
#[must_use]
pub fn ray_plane_intersect(origin: &Point3, dir: &Vector3, plane: &Plane) -> RayPlaneRelation {
    let normal = plane.plane_normal();
    let denom = normal.dot(dir);
    if denom.abs() < EPSILON15 {
        return RayPlaneRelation::Parallel;
    }

    let t = normal.dot(&(plane.origin() - origin)) / denom;
    if t < 0.0 {
        return RayPlaneRelation::Behind;
    }
    RayPlaneRelation::Point {
        point: origin + dir * t,
        t,
    }
}

/// Signed distance from a point to a plane.
/// Positive = on the normal side, negative = opposite.
#[must_use]
pub fn signed_distance_to_plane(point: &Point3, plane: &Plane) -> f64 {
    let diff = point - plane.origin();
    plane.plane_normal().dot(&diff)
}
