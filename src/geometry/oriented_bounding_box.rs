use crate::math::{Matrix3, Point3, Vector3};

/// A box with arbitrary orientation.
///
/// The columns of `half_axes` are the box's three half-extent vectors in
/// world space: their directions give the orientation and their lengths the
/// half extents. Any of them may be zero for degenerate boxes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedBoundingBox {
    /// Center of the box.
    pub center: Point3,
    /// Half-extent vectors, one per column.
    pub half_axes: Matrix3,
}

impl OrientedBoundingBox {
    /// Creates a new box.
    #[must_use]
    pub fn new(center: Point3, half_axes: Matrix3) -> Self {
        Self { center, half_axes }
    }

    /// Lengths of the three half axes.
    #[must_use]
    pub fn half_extents(&self) -> Vector3 {
        Vector3::new(
            self.half_axes.column(0).norm(),
            self.half_axes.column(1).norm(),
            self.half_axes.column(2).norm(),
        )
    }

    /// The eight corners, ordered by the sign pattern of the half axes with
    /// the first axis varying fastest.
    #[must_use]
    pub fn corners(&self) -> [Point3; 8] {
        let mut corners = [self.center; 8];
        for (i, corner) in corners.iter_mut().enumerate() {
            for axis in 0..3 {
                let sign = if i & (1 << axis) == 0 { -1.0 } else { 1.0 };
                *corner += self.half_axes.column(axis) * sign;
            }
        }
        corners
    }
}

impl Default for OrientedBoundingBox {
    fn default() -> Self {
        Self::new(Point3::origin(), Matrix3::zeros())
    }
}
