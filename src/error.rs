//! Error types.

use thiserror::Error;

/// Errors produced by spline construction, evaluation and queries.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SplineError {
    /// A polynomial was evaluated outside its segment-local domain.
    #[error("parameter {value} is outside the segment domain [0, 1]")]
    ParameterOutOfRange { value: f64 },

    /// A spline location lies outside the span covered by the spline.
    #[error("location {location} is outside the spline domain [{min}, {max}]")]
    LocationOutOfRange { location: f64, min: f64, max: f64 },

    /// A segment index past the last segment.
    #[error("segment index {index} is out of range for a spline with {count} segments")]
    SegmentOutOfRange { index: usize, count: usize },

    /// The spline does not have enough handles to define a single segment.
    #[error("invalid spline: need at least {required} handles excluding margins, got {actual}")]
    InvalidSpline { required: usize, actual: usize },

    /// The input of a bulk operation was not sorted in ascending order.
    #[error("locations must be ascending: {previous} is followed by {next} at index {index}")]
    UnsortedLocations {
        index: usize,
        previous: f64,
        next: f64,
    },

    /// An argument that is not a location or parameter was invalid.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Convenience type alias for results using [`SplineError`].
pub type Result<T> = std::result::Result<T, SplineError>;
