mod cartographic;
mod oriented_bounding_box;
mod rectangle;
pub mod surface;
mod tangent_plane;

pub use cartographic::Cartographic;
pub use oriented_bounding_box::OrientedBoundingBox;
pub use rectangle::Rectangle;
pub use surface::{Ellipsoid, Plane};
pub use tangent_plane::EllipsoidTangentPlane;
