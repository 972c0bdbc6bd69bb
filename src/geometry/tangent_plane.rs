use tracing::trace;

use crate::error::{GeometryError, OperationError, Result};
use crate::math::intersect_3d::{ray_plane_intersect, RayPlaneRelation};
use crate::math::{Point3, Vector2, Vector3};

use super::surface::{Ellipsoid, Plane};

/// A plane tangent to an ellipsoid, with a local east-north-up frame.
///
/// `x_axis` points east, `y_axis` north and `z_axis` along the outward
/// surface normal at `origin`. 2D coordinates are measured from `origin`
/// along `x_axis` and `y_axis`.
#[derive(Debug, Clone)]
pub struct EllipsoidTangentPlane<'a> {
    ellipsoid: &'a Ellipsoid,
    origin: Point3,
    x_axis: Vector3,
    y_axis: Vector3,
    z_axis: Vector3,
    plane: Plane,
}

impl<'a> EllipsoidTangentPlane<'a> {
    /// Creates the tangent plane at the surface point below (or above) `origin`.
    ///
    /// `origin` is first moved onto the surface along the surface normal.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::DegenerateOrigin`] if `origin` is at the
    /// ellipsoid's center.
    pub fn from_origin(origin: Point3, ellipsoid: &'a Ellipsoid) -> Result<Self> {
        let origin = ellipsoid
            .scale_to_geodetic_surface(&origin)
            .ok_or(GeometryError::DegenerateOrigin)?;
        let (east, north, up) = ellipsoid
            .east_north_up(&origin)
            .ok_or(GeometryError::DegenerateOrigin)?;
        let plane = Plane::new(origin, east, north)?;

        trace!(?origin, "created tangent plane");
        Ok(Self {
            ellipsoid,
            origin,
            x_axis: east,
            y_axis: north,
            z_axis: up,
            plane,
        })
    }

    /// Creates the tangent plane below the center of the points' axis-aligned
    /// bounding box.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::EmptyInput`] if `points` is empty, or
    /// [`GeometryError::DegenerateOrigin`] if the box center is the
    /// ellipsoid's center.
    pub fn from_points(points: &[Point3], ellipsoid: &'a Ellipsoid) -> Result<Self> {
        let (first, rest) = points
            .split_first()
            .ok_or(OperationError::EmptyInput("points"))?;
        let (min, max) = rest.iter().fold((first.coords, first.coords), |(min, max), p| {
            (min.inf(&p.coords), max.sup(&p.coords))
        });
        Self::from_origin(Point3::from((min + max) * 0.5), ellipsoid)
    }

    /// Returns the ellipsoid this plane is tangent to.
    #[must_use]
    pub fn ellipsoid(&self) -> &'a Ellipsoid {
        self.ellipsoid
    }

    /// Returns the point of tangency.
    #[must_use]
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    /// Returns the east axis.
    #[must_use]
    pub fn x_axis(&self) -> &Vector3 {
        &self.x_axis
    }

    /// Returns the north axis.
    #[must_use]
    pub fn y_axis(&self) -> &Vector3 {
        &self.y_axis
    }

    /// Returns the up axis, the surface normal at the origin.
    #[must_use]
    pub fn z_axis(&self) -> &Vector3 {
        &self.z_axis
    }

    /// Returns the tangent plane itself.
    #[must_use]
    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    /// Projects `point` onto the plane along the line through the ellipsoid
    /// center.
    ///
    /// Returns `None` when that line does not cross the plane.
    #[must_use]
    pub fn project_point_onto_plane(&self, point: &Point3) -> Option<Vector2> {
        let dir = point.coords.try_normalize(0.0)?;
        let hit = match ray_plane_intersect(point, &dir, &self.plane) {
            RayPlaneRelation::Point { point, .. } => point,
            RayPlaneRelation::Behind => match ray_plane_intersect(point, &-dir, &self.plane) {
                RayPlaneRelation::Point { point, .. } => point,
                _ => return None,
            },
            RayPlaneRelation::Parallel => return None,
        };
        Some(self.local_coordinates(&hit))
    }

    /// Projects each point with
    /// [`project_point_onto_plane`](Self::project_point_onto_plane).
    ///
    /// Points that cannot be projected are left out, so the result may be
    /// shorter than `points`.
    #[must_use]
    pub fn project_points_onto_plane(&self, points: &[Point3]) -> Vec<Vector2> {
        let mut result = Vec::with_capacity(points.len());
        self.project_points_onto_plane_into(points, &mut result);
        result
    }

    /// Like [`project_points_onto_plane`](Self::project_points_onto_plane),
    /// but refills `result` in place and returns it.
    pub fn project_points_onto_plane_into<'r>(
        &self,
        points: &[Point3],
        result: &'r mut Vec<Vector2>,
    ) -> &'r mut Vec<Vector2> {
        result.clear();
        result.extend(points.iter().filter_map(|p| self.project_point_onto_plane(p)));
        result
    }

    /// Projects `point` onto the plane along the plane normal.
    #[must_use]
    pub fn project_point_to_nearest_on_plane(&self, point: &Point3) -> Vector2 {
        self.local_coordinates(point)
    }

    /// Projects each point with
    /// [`project_point_to_nearest_on_plane`](Self::project_point_to_nearest_on_plane).
    #[must_use]
    pub fn project_points_to_nearest_on_plane(&self, points: &[Point3]) -> Vec<Vector2> {
        let mut result = Vec::with_capacity(points.len());
        self.project_points_to_nearest_on_plane_into(points, &mut result);
        result
    }

    /// Like [`project_points_to_nearest_on_plane`](Self::project_points_to_nearest_on_plane),
    /// but refills `result` in place and returns it.
    pub fn project_points_to_nearest_on_plane_into<'r>(
        &self,
        points: &[Point3],
        result: &'r mut Vec<Vector2>,
    ) -> &'r mut Vec<Vector2> {
        result.clear();
        result.extend(points.iter().map(|p| self.local_coordinates(p)));
        result
    }

    /// Maps plane coordinates back onto the ellipsoid surface, along the line
    /// through the ellipsoid center.
    #[must_use]
    pub fn project_point_onto_ellipsoid(&self, point: &Vector2) -> Point3 {
        let on_plane = self.origin + self.x_axis * point.x + self.y_axis * point.y;
        self.ellipsoid.scale_to_geocentric_surface(&on_plane)
    }

    /// Maps each point with
    /// [`project_point_onto_ellipsoid`](Self::project_point_onto_ellipsoid).
    #[must_use]
    pub fn project_points_onto_ellipsoid(&self, points: &[Vector2]) -> Vec<Point3> {
        let mut result = Vec::with_capacity(points.len());
        self.project_points_onto_ellipsoid_into(points, &mut result);
        result
    }

    /// Like [`project_points_onto_ellipsoid`](Self::project_points_onto_ellipsoid),
    /// but refills `result` in place and returns it.
    pub fn project_points_onto_ellipsoid_into<'r>(
        &self,
        points: &[Vector2],
        result: &'r mut Vec<Point3>,
    ) -> &'r mut Vec<Point3> {
        result.clear();
        result.extend(points.iter().map(|p| self.project_point_onto_ellipsoid(p)));
        result
    }

    fn local_coordinates(&self, point: &Point3) -> Vector2 {
        self.plane.parameters_of(point)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::GeoboundError;
    use crate::geometry::Cartographic;
    use approx::assert_abs_diff_eq;

    fn unit_x_plane(ellipsoid: &Ellipsoid) -> EllipsoidTangentPlane<'_> {
        EllipsoidTangentPlane::from_origin(Point3::new(1.0, 0.0, 0.0), ellipsoid).unwrap()
    }

    fn planar_points() -> [Point3; 3] {
        [
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ]
    }

    fn planar_expected() -> [Vector2; 3] {
        [
            Vector2::new(0.0, 1.0),
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 0.0),
        ]
    }

    #[test]
    fn wgs84_origin_on_surface_is_kept() {
        let wgs84 = Ellipsoid::wgs84();
        let origin = Point3::new(wgs84.radii().x, 0.0, 0.0);
        let plane = EllipsoidTangentPlane::from_origin(origin, &wgs84).unwrap();
        assert_eq!(*plane.ellipsoid(), wgs84);
        assert_abs_diff_eq!(*plane.origin(), origin, epsilon = 1e-6);
    }

    #[test]
    fn from_origin_sets_frame() {
        let sphere = Ellipsoid::unit_sphere();
        let plane = unit_x_plane(&sphere);
        assert!(std::ptr::eq(plane.ellipsoid(), &sphere));
        assert_eq!(*plane.origin(), Point3::new(1.0, 0.0, 0.0));
        assert_abs_diff_eq!(*plane.x_axis(), Vector3::y(), epsilon = 1e-15);
        assert_abs_diff_eq!(*plane.y_axis(), Vector3::z(), epsilon = 1e-15);
        assert_abs_diff_eq!(*plane.z_axis(), Vector3::x(), epsilon = 1e-15);
        assert_abs_diff_eq!(*plane.plane().plane_normal(), Vector3::x(), epsilon = 1e-15);
    }

    #[test]
    fn from_origin_scales_onto_surface() {
        let sphere = Ellipsoid::unit_sphere();
        let plane =
            EllipsoidTangentPlane::from_origin(Point3::new(0.0, 3.0, 0.0), &sphere).unwrap();
        assert_abs_diff_eq!(*plane.origin(), Point3::new(0.0, 1.0, 0.0), epsilon = 1e-15);
    }

    #[test]
    fn from_origin_at_center_fails() {
        let wgs84 = Ellipsoid::wgs84();
        let r = EllipsoidTangentPlane::from_origin(Point3::origin(), &wgs84);
        assert!(matches!(
            r,
            Err(GeoboundError::Geometry(GeometryError::DegenerateOrigin))
        ));
    }

    #[test]
    fn from_origin_at_pole() {
        let sphere = Ellipsoid::unit_sphere();
        let plane =
            EllipsoidTangentPlane::from_origin(Point3::new(0.0, 0.0, 1.0), &sphere).unwrap();
        assert_eq!(*plane.z_axis(), Vector3::z());
        assert_abs_diff_eq!(
            plane.x_axis().cross(plane.y_axis()),
            *plane.z_axis(),
            epsilon = 1e-15
        );
    }

    #[test]
    fn from_points_uses_box_center() {
        let sphere = Ellipsoid::unit_sphere();
        let points = [Point3::new(2.0, 0.0, 0.0), Point3::new(0.0, 0.0, 0.0)];
        let plane = EllipsoidTangentPlane::from_points(&points, &sphere).unwrap();
        assert!(std::ptr::eq(plane.ellipsoid(), &sphere));
        assert_eq!(*plane.origin(), Point3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn from_points_empty_fails() {
        let wgs84 = Ellipsoid::wgs84();
        let r = EllipsoidTangentPlane::from_points(&[], &wgs84);
        assert!(matches!(
            r,
            Err(GeoboundError::Operation(OperationError::EmptyInput(_)))
        ));
    }

    #[test]
    fn project_onto_plane_unsolvable_is_none() {
        let sphere = Ellipsoid::unit_sphere();
        let plane = unit_x_plane(&sphere);
        assert!(plane.project_point_onto_plane(&Point3::new(0.0, 0.0, 1.0)).is_none());
        assert!(plane.project_point_onto_plane(&Point3::origin()).is_none());
    }

    #[test]
    fn project_onto_plane() {
        let sphere = Ellipsoid::unit_sphere();
        let plane = unit_x_plane(&sphere);
        let r = plane.project_point_onto_plane(&Point3::new(1.0, 0.0, 1.0)).unwrap();
        assert_abs_diff_eq!(r, Vector2::new(0.0, 1.0), epsilon = 1e-15);
    }

    #[test]
    fn project_onto_plane_from_behind_origin() {
        // The ray from (2, 1, 0) points away from the plane and is flipped.
        let sphere = Ellipsoid::unit_sphere();
        let plane = unit_x_plane(&sphere);
        let r = plane.project_point_onto_plane(&Point3::new(2.0, 1.0, 0.0)).unwrap();
        assert_abs_diff_eq!(r, Vector2::new(0.5, 0.0), epsilon = 1e-15);
        let r = plane.project_point_onto_plane(&Point3::new(0.5, 0.25, 0.0)).unwrap();
        assert_abs_diff_eq!(r, Vector2::new(0.5, 0.0), epsilon = 1e-15);
    }

    #[test]
    fn project_points_onto_plane() {
        let sphere = Ellipsoid::unit_sphere();
        let plane = unit_x_plane(&sphere);
        let result = plane.project_points_onto_plane(&planar_points());
        assert_eq!(result.len(), 3);
        for (r, e) in result.iter().zip(planar_expected()) {
            assert_abs_diff_eq!(*r, e, epsilon = 1e-15);
        }
    }

    #[test]
    fn project_points_onto_plane_into_buffer() {
        let sphere = Ellipsoid::unit_sphere();
        let plane = unit_x_plane(&sphere);
        let mut buffer = vec![Vector2::zeros()];
        let ptr = std::ptr::addr_of!(buffer);
        let returned = plane.project_points_onto_plane_into(&planar_points(), &mut buffer);
        assert!(std::ptr::eq(&*returned, ptr));
        assert_eq!(returned.len(), 3);
        for (r, e) in returned.iter().zip(planar_expected()) {
            assert_abs_diff_eq!(*r, e, epsilon = 1e-15);
        }
    }

    #[test]
    fn project_points_onto_plane_skips_unprojectable() {
        let sphere = Ellipsoid::unit_sphere();
        let plane = unit_x_plane(&sphere);
        let points = [
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let result = plane.project_points_onto_plane(&points);
        assert_eq!(result.len(), 3);
        for (r, e) in result.iter().zip(planar_expected()) {
            assert_abs_diff_eq!(*r, e, epsilon = 1e-15);
        }
    }

    #[test]
    fn project_to_nearest_on_plane() {
        let sphere = Ellipsoid::unit_sphere();
        let plane = unit_x_plane(&sphere);
        let r = plane.project_point_to_nearest_on_plane(&Point3::new(1.0, 0.0, 1.0));
        assert_abs_diff_eq!(r, Vector2::new(0.0, 1.0), epsilon = 1e-15);
    }

    #[test]
    fn project_to_nearest_from_various_distances() {
        let sphere = Ellipsoid::unit_sphere();
        let plane = unit_x_plane(&sphere);
        for x in [2.0, 1.0, 0.0, -1.0] {
            let r = plane.project_point_to_nearest_on_plane(&Point3::new(x, 0.0, 0.0));
            assert_abs_diff_eq!(r, Vector2::zeros(), epsilon = 1e-15);
        }
        // Points the central projection cannot reach still project.
        let r = plane.project_point_to_nearest_on_plane(&Point3::new(0.0, 0.0, 1.0));
        assert_abs_diff_eq!(r, Vector2::new(0.0, 1.0), epsilon = 1e-15);
    }

    #[test]
    fn project_points_to_nearest_on_plane() {
        let sphere = Ellipsoid::unit_sphere();
        let plane = unit_x_plane(&sphere);
        let result = plane.project_points_to_nearest_on_plane(&planar_points());
        assert_eq!(result.len(), 3);
        for (r, e) in result.iter().zip(planar_expected()) {
            assert_abs_diff_eq!(*r, e, epsilon = 1e-15);
        }

        let mut buffer = Vec::new();
        let ptr = std::ptr::addr_of!(buffer);
        let returned = plane.project_points_to_nearest_on_plane_into(&planar_points(), &mut buffer);
        assert!(std::ptr::eq(&*returned, ptr));
        assert_eq!(returned.as_slice(), result.as_slice());
    }

    #[test]
    fn project_onto_ellipsoid() {
        let sphere = Ellipsoid::unit_sphere();
        let plane = unit_x_plane(&sphere);
        let r = plane.project_point_onto_ellipsoid(&Vector2::new(2.0, 2.0));
        assert_abs_diff_eq!(
            r,
            Point3::new(1.0 / 3.0, 2.0 / 3.0, 2.0 / 3.0),
            epsilon = 1e-15
        );
    }

    #[test]
    fn project_points_onto_ellipsoid() {
        let sphere = Ellipsoid::unit_sphere();
        let plane = unit_x_plane(&sphere);
        let input = [Vector2::new(2.0, -2.0), Vector2::new(2.0, 2.0)];
        let expected = [
            Point3::new(1.0 / 3.0, 2.0 / 3.0, -2.0 / 3.0),
            Point3::new(1.0 / 3.0, 2.0 / 3.0, 2.0 / 3.0),
        ];

        let result = plane.project_points_onto_ellipsoid(&input);
        assert_eq!(result.len(), 2);
        for (r, e) in result.iter().zip(expected) {
            assert_abs_diff_eq!(*r, e, epsilon = 1e-15);
        }

        let mut buffer = vec![Point3::origin()];
        let ptr = std::ptr::addr_of!(buffer);
        let returned = plane.project_points_onto_ellipsoid_into(&input, &mut buffer);
        assert!(std::ptr::eq(&*returned, ptr));
        assert_eq!(returned.as_slice(), result.as_slice());
    }

    #[test]
    fn wgs84_roundtrip_through_plane() {
        let wgs84 = Ellipsoid::wgs84();
        let points: Vec<Point3> = [
            (-72.0, 40.0),
            (-68.0, 35.0),
            (-75.0, 30.0),
            (-70.0, 30.0),
            (-68.0, 40.0),
        ]
        .iter()
        .map(|&(lon, lat)| wgs84.cartographic_to_cartesian(&Cartographic::from_degrees(lon, lat, 0.0)))
        .collect();

        let plane = EllipsoidTangentPlane::from_points(&points, &wgs84).unwrap();
        let points_2d = plane.project_points_onto_plane(&points);
        assert_eq!(points_2d.len(), points.len());

        let back = plane.project_points_onto_ellipsoid(&points_2d);
        for (b, p) in back.iter().zip(&points) {
            assert_abs_diff_eq!(*b, *p, epsilon = 1e-6);
        }
    }
}
