use thiserror::Error;

/// Top-level error type for the geobound crate.
#[derive(Debug, Error)]
pub enum GeoboundError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors related to geometric validation and construction.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("rectangle {parameter} = {value} is out of range [{min}, {max}]")]
    InvalidRectangle {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("invalid ellipsoid: {0}")]
    InvalidEllipsoid(String),

    #[error("origin must not be at the center of the ellipsoid")]
    DegenerateOrigin,

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors related to operation inputs.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("missing input: {0}")]
    MissingInput(&'static str),

    #[error("empty input: {0}")]
    EmptyInput(&'static str),
}

/// Convenience type alias for results using [`GeoboundError`].
pub type Result<T> = std::result::Result<T, GeoboundError>;
