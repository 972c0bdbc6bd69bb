/// A geographic position: longitude and latitude in radians, height above
/// the ellipsoid surface in the ellipsoid's linear units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Cartographic {
    /// Longitude in radians.
    pub longitude: f64,
    /// Latitude in radians.
    pub latitude: f64,
    /// Height above the ellipsoid surface.
    pub height: f64,
}

impl Cartographic {
    /// Creates a new position from radians.
    #[must_use]
    pub fn new(longitude: f64, latitude: f64, height: f64) -> Self {
        Self {
            longitude,
            latitude,
            height,
        }
    }

    /// Creates a new position from longitude and latitude in degrees.
    #[must_use]
    pub fn from_degrees(longitude: f64, latitude: f64, height: f64) -> Self {
        Self::new(longitude.to_radians(), latitude.to_radians(), height)
    }

    /// Returns `(longitude, latitude)` in degrees.
    #[must_use]
    pub fn to_degrees(&self) -> (f64, f64) {
        (self.longitude.to_degrees(), self.latitude.to_degrees())
    }
}
