mod ellipsoid;
mod plane;

pub use ellipsoid::Ellipsoid;
pub use plane::Plane;
