use tracing::{trace, warn};

use crate::error::{GeometryError, Result};
use crate::geometry::Cartographic;
use crate::math::{equals_epsilon, Point3, Vector3, EPSILON1, EPSILON12, EPSILON14, EPSILON15};

/// Upper bound on Newton steps in [`Ellipsoid::scale_to_geodetic_surface`].
const MAX_NEWTON_ITERATIONS: usize = 64;

/// A tri-axial ellipsoid centered at the origin, `x²/a² + y²/b² + z²/c² = 1`.
///
/// All radii are positive. The reciprocal radii are cached at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    radii: Vector3,
    radii_squared: Vector3,
    one_over_radii: Vector3,
    one_over_radii_squared: Vector3,
    minimum_radius: f64,
    maximum_radius: f64,
    center_tolerance_squared: f64,
}

impl Ellipsoid {
    /// Creates an ellipsoid from its three radii.
    ///
    /// # Errors
    ///
    /// Returns an error if any radius is not a positive finite number.
    pub fn new(x: f64, y: f64, z: f64) -> Result<Self> {
        Self::from_radii(Vector3::new(x, y, z))
    }

    /// Creates an ellipsoid from a radii vector.
    ///
    /// # Errors
    ///
    /// Returns an error if any radius is not a positive finite number.
    pub fn from_radii(radii: Vector3) -> Result<Self> {
        if radii.iter().any(|r| !r.is_finite() || *r <= 0.0) {
            return Err(GeometryError::InvalidEllipsoid(format!(
                "radii must be positive and finite, got ({}, {}, {})",
                radii.x, radii.y, radii.z
            ))
            .into());
        }
        Ok(Self::with_radii(radii))
    }

    /// The WGS84 reference ellipsoid, in meters.
    #[must_use]
    pub fn wgs84() -> Self {
        Self::with_radii(Vector3::new(6_378_137.0, 6_378_137.0, 6_356_752.314_245_179_3))
    }

    /// The unit sphere.
    #[must_use]
    pub fn unit_sphere() -> Self {
        Self::with_radii(Vector3::repeat(1.0))
    }

    fn with_radii(radii: Vector3) -> Self {
        Self {
            radii,
            radii_squared: radii.component_mul(&radii),
            one_over_radii: radii.map(f64::recip),
            one_over_radii_squared: radii.map(|r| (r * r).recip()),
            minimum_radius: radii.min(),
            maximum_radius: radii.max(),
            center_tolerance_squared: EPSILON1,
        }
    }

    /// Returns the radii.
    #[must_use]
    pub fn radii(&self) -> &Vector3 {
        &self.radii
    }

    /// Returns the squared radii.
    #[must_use]
    pub fn radii_squared(&self) -> &Vector3 {
        &self.radii_squared
    }

    /// Returns the reciprocal radii.
    #[must_use]
    pub fn one_over_radii(&self) -> &Vector3 {
        &self.one_over_radii
    }

    /// Returns the reciprocal squared radii.
    #[must_use]
    pub fn one_over_radii_squared(&self) -> &Vector3 {
        &self.one_over_radii_squared
    }

    /// Returns the smallest radius.
    #[must_use]
    pub fn minimum_radius(&self) -> f64 {
        self.minimum_radius
    }

    /// Returns the largest radius.
    #[must_use]
    pub fn maximum_radius(&self) -> f64 {
        self.maximum_radius
    }

    /// Returns `true` if the two equatorial radii are equal within
    /// [`EPSILON15`] (relative or absolute).
    #[must_use]
    pub fn is_revolution(&self) -> bool {
        equals_epsilon(self.radii.x, self.radii.y, EPSILON15, EPSILON15)
    }

    /// Checks that this is an ellipsoid of revolution (`radii.x == radii.y`).
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidEllipsoid`] otherwise.
    pub fn ensure_revolution(&self) -> Result<()> {
        if self.is_revolution() {
            Ok(())
        } else {
            Err(GeometryError::InvalidEllipsoid(format!(
                "ellipsoid must be an ellipsoid of revolution (radii.x == radii.y), got x = {}, y = {}",
                self.radii.x, self.radii.y
            ))
            .into())
        }
    }

    /// Direction from the ellipsoid center through `cartesian`.
    #[must_use]
    pub fn geocentric_surface_normal(&self, cartesian: &Point3) -> Vector3 {
        cartesian.coords.normalize()
    }

    /// Outward normal of the surface through `cartesian`, i.e. the normalized
    /// gradient of the implicit surface equation.
    ///
    /// Returns `None` when `cartesian` is at the center.
    #[must_use]
    pub fn geodetic_surface_normal(&self, cartesian: &Point3) -> Option<Vector3> {
        if cartesian.coords.iter().all(|c| c.abs() <= EPSILON14) {
            return None;
        }
        cartesian
            .coords
            .component_mul(&self.one_over_radii_squared)
            .try_normalize(0.0)
    }

    /// Outward surface normal at a geographic position.
    #[must_use]
    pub fn geodetic_surface_normal_cartographic(&self, cartographic: &Cartographic) -> Vector3 {
        let (sin_lon, cos_lon) = cartographic.longitude.sin_cos();
        let (sin_lat, cos_lat) = cartographic.latitude.sin_cos();
        Vector3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat).normalize()
    }

    /// Converts a geographic position to a Cartesian point.
    #[must_use]
    pub fn cartographic_to_cartesian(&self, cartographic: &Cartographic) -> Point3 {
        let n = self.geodetic_surface_normal_cartographic(cartographic);
        let k = self.radii_squared.component_mul(&n);
        let gamma = n.dot(&k).sqrt();
        Point3::from(k / gamma + n * cartographic.height)
    }

    /// Converts each position, preserving order.
    #[must_use]
    pub fn cartographic_array_to_vector_array(&self, cartographics: &[Cartographic]) -> Vec<Point3> {
        let mut result = Vec::with_capacity(cartographics.len());
        self.cartographic_array_to_vector_array_into(cartographics, &mut result);
        result
    }

    /// Like [`cartographic_array_to_vector_array`](Self::cartographic_array_to_vector_array),
    /// but refills `result` in place and returns it.
    pub fn cartographic_array_to_vector_array_into<'a>(
        &self,
        cartographics: &[Cartographic],
        result: &'a mut Vec<Point3>,
    ) -> &'a mut Vec<Point3> {
        result.clear();
        result.extend(cartographics.iter().map(|c| self.cartographic_to_cartesian(c)));
        result
    }

    /// Converts a Cartesian point to a geographic position.
    ///
    /// Returns `None` when `cartesian` is at the center.
    #[must_use]
    pub fn cartesian_to_cartographic(&self, cartesian: &Point3) -> Option<Cartographic> {
        let surface = self.scale_to_geodetic_surface(cartesian)?;
        let n = self.geodetic_surface_normal(&surface)?;
        let h = cartesian - surface;

        let longitude = n.y.atan2(n.x);
        let latitude = n.z.clamp(-1.0, 1.0).asin();
        let height = h.dot(&cartesian.coords).signum() * h.norm();
        Some(Cartographic::new(longitude, latitude, height))
    }

    /// Moves `cartesian` along the surface normal onto the surface.
    ///
    /// Solves for the Lagrange multiplier with Newton's method. Points deep
    /// inside the ellipsoid are scaled radially instead.
    ///
    /// Returns `None` when `cartesian` is at the center.
    #[must_use]
    pub fn scale_to_geodetic_surface(&self, cartesian: &Point3) -> Option<Point3> {
        let p = cartesian.coords;
        let inv = self.one_over_radii;
        let inv2 = self.one_over_radii_squared;

        let x2 = p.x * p.x * inv.x * inv.x;
        let y2 = p.y * p.y * inv.y * inv.y;
        let z2 = p.z * p.z * inv.z * inv.z;

        let squared_norm = x2 + y2 + z2;
        let ratio = (1.0 / squared_norm).sqrt();
        let intersection = p * ratio;

        if squared_norm < self.center_tolerance_squared {
            return ratio.is_finite().then_some(Point3::from(intersection));
        }

        let gradient = intersection.component_mul(&inv2) * 2.0;
        let mut lambda = (1.0 - ratio) * p.norm() / (0.5 * gradient.norm());
        let mut correction = 0.0;
        let mut multiplier = Vector3::repeat(1.0);

        for _ in 0..MAX_NEWTON_ITERATIONS {
            lambda -= correction;
            multiplier = inv2.map(|w| 1.0 / (1.0 + lambda * w));
            let m2 = multiplier.component_mul(&multiplier);
            let m3 = m2.component_mul(&multiplier);

            let func = x2 * m2.x + y2 * m2.y + z2 * m2.z - 1.0;
            if func.abs() <= EPSILON12 {
                return Some(Point3::from(p.component_mul(&multiplier)));
            }

            let denominator = x2 * m3.x * inv2.x + y2 * m3.y * inv2.y + z2 * m3.z * inv2.z;
            correction = func / (-2.0 * denominator);
        }

        warn!(?cartesian, "geodetic surface scaling did not converge");
        Some(Point3::from(p.component_mul(&multiplier)))
    }

    /// Scales `cartesian` along the line through the center onto the surface.
    #[must_use]
    pub fn scale_to_geocentric_surface(&self, cartesian: &Point3) -> Point3 {
        let p = cartesian.coords;
        let beta = 1.0 / p.component_mul(&p).dot(&self.one_over_radii_squared).sqrt();
        Point3::from(p * beta)
    }

    /// Local east-north-up axes at `origin`.
    ///
    /// On the rotation axis, where east is undefined, a fixed polar frame is
    /// used: east `+y`, north `-x` at the north pole and `+x` at the south pole.
    ///
    /// Returns `None` when `origin` is at the center.
    #[must_use]
    pub fn east_north_up(&self, origin: &Point3) -> Option<(Vector3, Vector3, Vector3)> {
        if origin.x.abs() < EPSILON14 && origin.y.abs() < EPSILON14 {
            if origin.z.abs() < EPSILON14 {
                return None;
            }
            let sign = origin.z.signum();
            trace!(?origin, "using polar east-north-up frame");
            return Some((
                Vector3::y(),
                Vector3::new(-sign, 0.0, 0.0),
                Vector3::new(0.0, 0.0, sign),
            ));
        }

        let up = self.geodetic_surface_normal(origin)?;
        let east = Vector3::new(-origin.y, origin.x, 0.0).normalize();
        let north = up.cross(&east);
        Some((east, north, up))
    }
}
