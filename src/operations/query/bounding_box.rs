use tracing::debug;

use crate::error::{OperationError, Result};
use crate::geometry::{Cartographic, Ellipsoid, EllipsoidTangentPlane, OrientedBoundingBox, Rectangle};
use crate::math::intersect_3d::signed_distance_to_plane;
use crate::math::{Matrix3, Vector3};

// Perimeter ring layout. "C" is the rectangle center, except that the
// middle row sits on the equator when the rectangle straddles it.
//
//          N/+y
//      [0] [1] [2]
// W/-x [7]     [3] E/+x
//      [6] [5] [4]
//          S/-y
const NW: usize = 0;
const NC: usize = 1;
const NE: usize = 2;
const CE: usize = 3;
const SE: usize = 4;
const SC: usize = 5;
const SW: usize = 6;
const CW: usize = 7;
const CORNERS: [usize; 4] = [NW, NE, SE, SW];

/// Optional inputs to [`OrientedBoundingBoxBuilder`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBoxOptions {
    /// Lowest height of the region above the ellipsoid. Defaults to `0.0`.
    pub minimum_height: f64,
    /// Highest height of the region above the ellipsoid. Defaults to `0.0`.
    pub maximum_height: f64,
    /// Reference ellipsoid. Defaults to WGS84. Must be an ellipsoid of
    /// revolution.
    pub ellipsoid: Ellipsoid,
}

impl Default for BoundingBoxOptions {
    fn default() -> Self {
        Self {
            minimum_height: 0.0,
            maximum_height: 0.0,
            ellipsoid: Ellipsoid::wgs84(),
        }
    }
}

/// Computes an oriented bounding box enclosing a geographic rectangle between
/// two heights.
///
/// The box is aligned with the east-north-up tangent plane at the center of
/// the rectangle. There are no further guarantees about its orientation.
#[derive(Debug, Clone, Default)]
pub struct OrientedBoundingBoxBuilder {
    rectangle: Option<Rectangle>,
    options: BoundingBoxOptions,
}

impl OrientedBoundingBoxBuilder {
    /// Creates a builder with default options and no rectangle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the rectangle to bound.
    #[must_use]
    pub fn rectangle(mut self, rectangle: Rectangle) -> Self {
        self.rectangle = Some(rectangle);
        self
    }

    /// Sets the lowest height.
    #[must_use]
    pub fn minimum_height(mut self, height: f64) -> Self {
        self.options.minimum_height = height;
        self
    }

    /// Sets the highest height.
    #[must_use]
    pub fn maximum_height(mut self, height: f64) -> Self {
        self.options.maximum_height = height;
        self
    }

    /// Sets the reference ellipsoid.
    #[must_use]
    pub fn ellipsoid(mut self, ellipsoid: Ellipsoid) -> Self {
        self.options.ellipsoid = ellipsoid;
        self
    }

    /// Replaces all options at once.
    #[must_use]
    pub fn options(mut self, options: BoundingBoxOptions) -> Self {
        self.options = options;
        self
    }

    /// Executes the computation, returning a new box.
    ///
    /// # Errors
    ///
    /// See [`execute_into`](Self::execute_into).
    pub fn execute(&self) -> Result<OrientedBoundingBox> {
        let mut result = OrientedBoundingBox::default();
        self.execute_into(&mut result)?;
        Ok(result)
    }

    /// Executes the computation, overwriting `result` and returning it.
    ///
    /// Degenerate rectangles and height ranges produce boxes with zero
    /// extent along the affected axes. A minimum height above the maximum is
    /// not reordered.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::MissingInput`] if no rectangle was set,
    /// `InvalidRectangle` if its width is outside `[0, 2*pi]` or its height
    /// outside `[0, pi]`, and `InvalidEllipsoid` if the ellipsoid is not an
    /// ellipsoid of revolution. `result` is untouched on error.
    pub fn execute_into<'a>(
        &self,
        result: &'a mut OrientedBoundingBox,
    ) -> Result<&'a mut OrientedBoundingBox> {
        let rectangle = self
            .rectangle
            .ok_or(OperationError::MissingInput("rectangle"))?;
        let BoundingBoxOptions {
            minimum_height,
            maximum_height,
            ref ellipsoid,
        } = self.options;

        rectangle
            .validate()
            .and_then(|()| ellipsoid.ensure_revolution())
            .inspect_err(|err| debug!(%err, ?rectangle, "rejected bounding box input"))?;

        let center = rectangle.center();
        let tangent_point = ellipsoid.cartographic_to_cartesian(&center);
        let tangent_plane = EllipsoidTangentPlane::from_origin(tangent_point, ellipsoid)?;

        let lon_center = center.longitude;
        let lat_center = if rectangle.straddles_equator() {
            0.0
        } else {
            center.latitude
        };

        let mut ring = [Cartographic::default(); 8];
        for (index, longitude, latitude) in [
            (NW, rectangle.west, rectangle.north),
            (NC, lon_center, rectangle.north),
            (NE, rectangle.east, rectangle.north),
            (CE, rectangle.east, lat_center),
            (SE, rectangle.east, rectangle.south),
            (SC, lon_center, rectangle.south),
            (SW, rectangle.west, rectangle.south),
            (CW, rectangle.west, lat_center),
        ] {
            ring[index] = Cartographic::new(longitude, latitude, maximum_height);
        }

        // X/Y extents from the whole ring at the top of the region. Only the
        // row or column facing each direction can hold its extremum.
        let projected = ring.map(|c| {
            tangent_plane.project_point_to_nearest_on_plane(&ellipsoid.cartographic_to_cartesian(&c))
        });
        let min_x = projected[SW].x.min(projected[CW].x).min(projected[NW].x);
        let max_x = projected[NE].x.max(projected[CE].x).max(projected[SE].x);
        let min_y = projected[SE].y.min(projected[SC].y).min(projected[SW].y);
        let max_y = projected[NW].y.max(projected[NC].y).max(projected[NE].y);

        // Z extents from the corners at the bottom of the region. The plane
        // touches the surface at height zero, so the top is exactly
        // `maximum_height` above it.
        for index in CORNERS {
            ring[index].height = minimum_height;
        }
        let min_z = CORNERS
            .iter()
            .map(|&index| {
                let point = ellipsoid.cartographic_to_cartesian(&ring[index]);
                signed_distance_to_plane(&point, tangent_plane.plane())
            })
            .fold(f64::INFINITY, f64::min);
        let max_z = maximum_height;

        let min = Vector3::new(min_x, min_y, min_z);
        let max = Vector3::new(max_x, max_y, max_z);
        debug!(
            ?rectangle,
            minimum_height,
            maximum_height,
            ?min,
            ?max,
            "computed tangent plane extents"
        );

        from_tangent_plane_extents(&tangent_plane, &min, &max, result);
        Ok(result)
    }
}

/// Writes the box spanning `[min, max]` in the east-north-up frame of
/// `tangent_plane` into `result`.
fn from_tangent_plane_extents(
    tangent_plane: &EllipsoidTangentPlane<'_>,
    min: &Vector3,
    max: &Vector3,
    result: &mut OrientedBoundingBox,
) {
    let rotation = Matrix3::from_columns(&[
        *tangent_plane.x_axis(),
        *tangent_plane.y_axis(),
        *tangent_plane.z_axis(),
    ]);
    let center_offset = (min + max) * 0.5;
    let scale = (max - min) * 0.5;

    result.center = tangent_plane.origin() + rotation * center_offset;
    result.half_axes = rotation * Matrix3::from_diagonal(&scale);
}

impl OrientedBoundingBox {
    /// Computes the box enclosing `rectangle` with the given options.
    ///
    /// # Errors
    ///
    /// See [`OrientedBoundingBoxBuilder::execute_into`].
    pub fn from_rectangle(rectangle: &Rectangle, options: &BoundingBoxOptions) -> Result<Self> {
        OrientedBoundingBoxBuilder::new()
            .rectangle(*rectangle)
            .options(*options)
            .execute()
    }
}
