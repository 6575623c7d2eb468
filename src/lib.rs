//! Evaluation and queries on immutable Catmull-Rom splines.
//!
//! An [ImmutableSpline] is built from a sequence of handles and converts each
//! segment into a cubic [Polynomial](math::Polynomial). Splines can be sampled
//! by raw [SplineLocation], by [NormalizedSplineLocation] (the fraction of the
//! spline's arc length) or by arc length directly, and queried for the point
//! closest to a given position.
//!
//! The geometry is generic over [GeometricOperations](math::GeometricOperations),
//! with implementations for scalars and for 2D and 3D `cgmath` points.

pub use cgmath;
pub use config::{
    ClosestPointSettings, SplineSettings, DEFAULT_CANDIDATE_SEGMENTS, DEFAULT_SAMPLES_PER_SEGMENT,
};
pub use error::{Result, SplineError};
pub use spline::{
    arc_length_at, bulk_denormalize_ordered, bulk_normalize_ordered, denormalize,
    location_at_arc_length, normalize, ClosestOnSplineQueryResult, ImmutableSpline,
    NormalizedSplineLocation, SplineLocation, SplineSample, SplineSegment, SplineSegmentIndex,
    MAX_EQUIDISTANT_SAMPLES, MIN_HANDLES,
};
pub use util::Interval;

mod config;
mod error;
pub mod math;
mod spline;
mod util;
