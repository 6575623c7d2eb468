//! Tunable numerical settings.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, SplineError};

/// Default number of intervals each segment is divided into for the coarse search.
pub const DEFAULT_SAMPLES_PER_SEGMENT: usize = 16;

/// Default number of coarse matches refined by a closest point query.
pub const DEFAULT_CANDIDATE_SEGMENTS: usize = 3;

/// Settings which affect the lengths a spline computes for its segments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct SplineSettings {
    /// The number of equal parts each segment is split into when integrating its
    /// arc length. Must be at least one.
    pub arc_length_subdivisions: usize,
}

impl Default for SplineSettings {
    fn default() -> Self {
        Self {
            arc_length_subdivisions: 4,
        }
    }
}

impl SplineSettings {
    pub fn with_arc_length_subdivisions(mut self, subdivisions: usize) -> Self {
        self.arc_length_subdivisions = subdivisions;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.arc_length_subdivisions == 0 {
            return Err(SplineError::InvalidArgument(
                "spline setting `arc_length_subdivisions` must be at least one".into(),
            ));
        }
        Ok(())
    }
}

/// Settings of a closest point query on a spline.
///
/// The query samples every segment coarsely, then refines the most promising
/// segments with Newton's method. The Newton iteration budget has no default
/// and is given to [ClosestPointSettings::new].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClosestPointSettings {
    /// The number of intervals each segment is divided into for the coarse search.
    #[cfg_attr(feature = "serde", serde(default = "default_samples_per_segment"))]
    pub samples_per_segment: usize,
    /// How many of the best coarse matches are refined.
    #[cfg_attr(feature = "serde", serde(default = "default_candidate_segments"))]
    pub candidate_segments: usize,
    /// Newton iterations spent on each refined segment.
    pub iterations: usize,
}

#[cfg(feature = "serde")]
fn default_samples_per_segment() -> usize {
    DEFAULT_SAMPLES_PER_SEGMENT
}

#[cfg(feature = "serde")]
fn default_candidate_segments() -> usize {
    DEFAULT_CANDIDATE_SEGMENTS
}

impl ClosestPointSettings {
    /// Creates settings spending `iterations` Newton steps on each refined
    /// segment, with the default coarse search.
    pub fn new(iterations: usize) -> Self {
        Self {
            samples_per_segment: DEFAULT_SAMPLES_PER_SEGMENT,
            candidate_segments: DEFAULT_CANDIDATE_SEGMENTS,
            iterations,
        }
    }

    pub fn with_samples_per_segment(mut self, samples: usize) -> Self {
        self.samples_per_segment = samples;
        self
    }

    pub fn with_candidate_segments(mut self, candidates: usize) -> Self {
        self.candidate_segments = candidates;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let invalid = |name: &str| {
            Err(SplineError::InvalidArgument(format!(
                "closest point setting `{name}` must be at least one"
            )))
        };
        if self.samples_per_segment == 0 {
            return invalid("samples_per_segment");
        }
        if self.candidate_segments == 0 {
            return invalid("candidate_segments");
        }
        if self.iterations == 0 {
            return invalid("iterations");
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn zero_counts_are_rejected() {
        assert!(ClosestPointSettings::new(24).validate().is_ok());
        assert!(ClosestPointSettings::new(0).validate().is_err());
        assert!(ClosestPointSettings::new(24).with_samples_per_segment(0).validate().is_err());
        assert!(ClosestPointSettings::new(24).with_candidate_segments(0).validate().is_err());
        assert!(SplineSettings::default().validate().is_ok());
        assert!(matches!(
            SplineSettings::default().with_arc_length_subdivisions(0).validate(),
            Err(SplineError::InvalidArgument(_))
        ));
    }

    #[test]
    fn iteration_budget_is_caller_supplied() {
        let settings = ClosestPointSettings::new(7);
        assert_eq!(settings.iterations, 7);
        assert_eq!(settings.samples_per_segment, DEFAULT_SAMPLES_PER_SEGMENT);
        assert_eq!(settings.candidate_segments, DEFAULT_CANDIDATE_SEGMENTS);
    }
}
