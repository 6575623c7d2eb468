//! Locations along a spline.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A raw location along a spline, measured in segments.
///
/// The integer part selects the segment and the fractional part the
/// progress within that segment's polynomial. Valid locations lie within
/// `[0, segment_count]`. Raw progress is not proportional to arc length.
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct SplineLocation(pub f64);

/// A location along a spline as a fraction of its arc length, within `[0, 1]`.
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct NormalizedSplineLocation(pub f64);

/// The index of a segment within a spline.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct SplineSegmentIndex(pub usize);

impl SplineLocation {
    pub const ZERO: SplineLocation = SplineLocation(0.0);

    pub fn value(self) -> f64 {
        self.0
    }

    /// Splits the location into a segment index and the progress within it.
    ///
    /// The end of the spline belongs to the last segment.
    /// Expects a location within `[0, segment_count]` and `segment_count > 0`.
    pub(crate) fn split(self, segment_count: usize) -> (usize, f64) {
        let idx = usize::min(self.0 as usize, segment_count - 1);
        (idx, self.0 - idx as f64)
    }
}

impl NormalizedSplineLocation {
    pub const ZERO: NormalizedSplineLocation = NormalizedSplineLocation(0.0);
    pub const END: NormalizedSplineLocation = NormalizedSplineLocation(1.0);

    pub fn value(self) -> f64 {
        self.0
    }
}

impl SplineSegmentIndex {
    /// The raw location at which the segment starts.
    pub fn start(self) -> SplineLocation {
        SplineLocation(self.0 as f64)
    }
}

impl From<f64> for SplineLocation {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl From<f64> for NormalizedSplineLocation {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl From<SplineLocation> for f64 {
    fn from(location: SplineLocation) -> Self {
        location.0
    }
}

impl From<NormalizedSplineLocation> for f64 {
    fn from(location: NormalizedSplineLocation) -> Self {
        location.0
    }
}

impl From<usize> for SplineSegmentIndex {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

impl fmt::Display for SplineSegmentIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
