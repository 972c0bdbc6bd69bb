pub mod query;

pub use query::{BoundingBoxOptions, OrientedBoundingBoxBuilder};
