//! Immutable Catmull-Rom splines.

use std::hash::{Hash, Hasher};

use itertools::Itertools;
use once_cell::sync::OnceCell;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::{ClosestPointSettings, SplineSettings};
use crate::error::{Result, SplineError};
use crate::math::arclen::integrate_speed;
use crate::math::{CatmullRomSegment, GeometricOperations, Polynomial, SplineType};
use crate::util::Interval;

pub use closest::ClosestOnSplineQueryResult;
pub use location::{NormalizedSplineLocation, SplineLocation, SplineSegmentIndex};
pub use normalize::{
    arc_length_at, bulk_denormalize_ordered, bulk_normalize_ordered, denormalize,
    location_at_arc_length, normalize,
};

mod closest;
mod location;
mod normalize;

/// The minimum number of handles, margins excluded, a spline needs for one segment.
pub const MIN_HANDLES: usize = 2;

/// The most samples [ImmutableSpline::sample_every] produces.
pub const MAX_EQUIDISTANT_SAMPLES: usize = 1 << 24;

/// An immutable Catmull-Rom spline.
///
/// The spline passes through its handles in order. A margin handle before the
/// first and after the last handle shapes the tangents at the ends; margins
/// are never traversed.
///
/// A spline with fewer than [MIN_HANDLES] handles can be constructed, but every
/// query on it fails with [SplineError::InvalidSpline].
///
/// Segment lengths are computed for the whole spline on first use and memoized.
/// Equality and hashing only consider the handles and the spline type.
#[derive(Clone, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(bound(
        serialize = "O::Pos: Serialize",
        deserialize = "O::Pos: Deserialize<'de>"
    ))
)]
pub struct ImmutableSpline<O: GeometricOperations> {
    /// All handles, the begin and end margin included.
    handles: Vec<O::Pos>,
    spline_type: SplineType,
    #[cfg_attr(feature = "serde", serde(default))]
    settings: SplineSettings,
    #[cfg_attr(feature = "serde", serde(skip))]
    lengths: OnceCell<SegmentLengths>,
}

/// The memoized arc lengths of a spline's segments.
#[derive(Clone, Debug)]
pub(crate) struct SegmentLengths {
    /// The length of each segment.
    pub lengths: Vec<f64>,
    /// The length of the spline up to the start of each segment,
    /// followed by the total length.
    pub cumulative: Vec<f64>,
}

impl SegmentLengths {
    pub fn total(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }
}

/// A single segment of a spline together with its arc length.
#[derive(Clone, Debug, PartialEq)]
pub struct SplineSegment<O: GeometricOperations> {
    pub index: SplineSegmentIndex,
    pub polynomial: Polynomial<O>,
    pub length: f64,
}

/// The result of sampling a spline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplineSample<O: GeometricOperations> {
    /// Where the spline was sampled.
    pub location: SplineLocation,
    pub position: O::Pos,
    /// The first derivative with respect to the raw location.
    pub tangent: O::Diff,
    /// The second derivative with respect to the raw location.
    pub curvature: O::Diff,
}

impl<O: GeometricOperations> ImmutableSpline<O> {
    /// Creates a spline from its handles and explicit margin handles.
    pub fn new(
        begin_margin: O::Pos,
        handles: impl IntoIterator<Item = O::Pos>,
        end_margin: O::Pos,
        spline_type: SplineType,
    ) -> Self {
        let handles = std::iter::once(begin_margin)
            .chain(handles)
            .chain(std::iter::once(end_margin));
        Self::from_handles_including_margin(handles, spline_type)
    }

    /// Creates a spline whose first and last handle are the margin handles.
    pub fn from_handles_including_margin(
        handles: impl IntoIterator<Item = O::Pos>,
        spline_type: SplineType,
    ) -> Self {
        Self {
            handles: handles.into_iter().collect(),
            spline_type,
            settings: SplineSettings::default(),
            lengths: OnceCell::new(),
        }
    }

    /// Creates a spline through the given handles, synthesizing each margin
    /// handle by mirroring the second handle from that end through the first.
    ///
    /// With fewer than two handles no margins can be derived, and the spline is invalid.
    pub fn from_handles(handles: impl IntoIterator<Item = O::Pos>, spline_type: SplineType) -> Self {
        let handles = handles.into_iter().collect::<Vec<_>>();
        let len = handles.len();
        if len < MIN_HANDLES {
            return Self::from_handles_including_margin(handles, spline_type);
        }
        let mirror = |end, next| O::add(end, O::sub(end, next));
        let begin = mirror(handles[0], handles[1]);
        let end = mirror(handles[len - 1], handles[len - 2]);
        Self::new(begin, handles, end, spline_type)
    }

    /// Returns a copy of this spline using the given settings.
    pub fn with_settings(self, settings: SplineSettings) -> Self {
        Self {
            handles: self.handles,
            spline_type: self.spline_type,
            settings,
            lengths: OnceCell::new(),
        }
    }

    /// Returns the same curve traversed in the opposite direction.
    ///
    /// The raw location `l` on this spline corresponds to `segment_count - l`
    /// on the reversed one.
    pub fn reversed(&self) -> Self {
        let handles = self.handles.iter().rev().copied();
        Self::from_handles_including_margin(handles, self.spline_type).with_settings(self.settings)
    }

    /// The traversed handles, margins excluded.
    pub fn handles(&self) -> &[O::Pos] {
        match self.handles.len() {
            0 | 1 => &[],
            len => &self.handles[1..len - 1],
        }
    }

    pub fn handles_including_margin(&self) -> &[O::Pos] {
        &self.handles
    }

    pub fn begin_margin(&self) -> Option<O::Pos> {
        self.handles.first().copied()
    }

    pub fn end_margin(&self) -> Option<O::Pos> {
        self.handles.last().copied()
    }

    pub fn spline_type(&self) -> SplineType {
        self.spline_type
    }

    pub fn settings(&self) -> SplineSettings {
        self.settings
    }

    /// The number of handles, margins excluded.
    pub fn handle_count(&self) -> usize {
        self.handles.len().saturating_sub(2)
    }

    pub fn is_valid(&self) -> bool {
        self.handle_count() >= MIN_HANDLES
    }

    /// Fails with [SplineError::InvalidSpline] if the spline has too few handles.
    pub fn validate(&self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(SplineError::InvalidSpline {
                required: MIN_HANDLES,
                actual: self.handle_count(),
            })
        }
    }

    /// The number of segments, or zero for an invalid spline.
    pub fn segment_count(&self) -> usize {
        if self.is_valid() {
            self.handle_count() - 1
        } else {
            0
        }
    }

    /// The range of valid raw locations.
    pub fn domain(&self) -> Interval<f64> {
        Interval::new(0.0, self.segment_count() as f64)
    }

    /// Gets a segment and its arc length.
    pub fn segment(&self, index: SplineSegmentIndex) -> Result<SplineSegment<O>> {
        let lengths = self.lengths()?;
        let count = self.segment_count();
        if index.0 >= count {
            return Err(SplineError::SegmentOutOfRange {
                index: index.0,
                count,
            });
        }
        Ok(SplineSegment {
            index,
            polynomial: self.polynomial(index.0),
            length: lengths.lengths[index.0],
        })
    }

    /// Iterates over all segments in order.
    pub fn segments(&self) -> Result<impl Iterator<Item = SplineSegment<O>> + '_> {
        let lengths = self.lengths()?;
        let segments = self
            .handles
            .iter()
            .copied()
            .tuple_windows()
            .zip(&lengths.lengths)
            .enumerate()
            .map(move |(idx, ((p0, p1, p2, p3), &length))| SplineSegment {
                index: SplineSegmentIndex(idx),
                polynomial: CatmullRomSegment::new([p0, p1, p2, p3], self.spline_type).into(),
                length,
            });
        Ok(segments)
    }

    /// The arc length of each segment.
    pub fn segment_lengths(&self) -> Result<&[f64]> {
        Ok(&self.lengths()?.lengths)
    }

    /// The total arc length of the spline.
    pub fn length(&self) -> Result<f64> {
        Ok(self.lengths()?.total())
    }

    /// Samples the spline at a raw location.
    pub fn sample(&self, location: SplineLocation) -> Result<SplineSample<O>> {
        self.check_location(location)?;
        let (idx, t) = location.split(self.segment_count());
        let polynomial = self.polynomial(idx);
        Ok(SplineSample {
            location,
            position: polynomial.sample(t),
            tangent: polynomial.sample_dt(t),
            curvature: polynomial.sample_dt2(t),
        })
    }

    /// Samples the spline at a fraction of its arc length.
    pub fn sample_normalized(&self, location: NormalizedSplineLocation) -> Result<SplineSample<O>> {
        self.sample(denormalize(self, location)?)
    }

    /// Samples the spline at an arc length measured from its start.
    pub fn sample_at_arc_length(&self, distance: f64) -> Result<SplineSample<O>> {
        self.sample(location_at_arc_length(self, distance)?)
    }

    /// Samples the spline every `spacing` units of arc length, starting at its
    /// beginning. The end of the spline is always included.
    ///
    /// Fails with [SplineError::InvalidArgument] if `spacing` would produce more
    /// than [MAX_EQUIDISTANT_SAMPLES] samples.
    pub fn sample_every(&self, spacing: f64) -> Result<Vec<SplineSample<O>>> {
        if !(spacing.is_finite() && spacing > 0.0) {
            return Err(SplineError::InvalidArgument(format!(
                "sample spacing must be positive and finite, got {spacing}"
            )));
        }
        let total = self.length()?;
        if total <= 0.0 {
            return Ok(vec![self.sample(SplineLocation::ZERO)?]);
        }

        let steps = (total / spacing).floor();
        // Leaves room for the start and end samples
        if steps >= (MAX_EQUIDISTANT_SAMPLES - 1) as f64 {
            return Err(SplineError::InvalidArgument(format!(
                "sample spacing {spacing} yields more than {MAX_EQUIDISTANT_SAMPLES} samples"
            )));
        }
        let count = steps as usize;
        let mut fractions = (0..=count)
            .map(|i| (i as f64 * spacing / total).min(1.0))
            .collect::<Vec<_>>();
        // Skip a sliver between the last multiple of `spacing` and the end
        if (1.0 - fractions[count]) * total > 1e-9 * spacing {
            fractions.push(1.0);
        }

        let locations = bulk_denormalize_ordered(
            self,
            fractions.into_iter().map(NormalizedSplineLocation),
        )?;
        locations.into_iter().map(|location| self.sample(location)).collect()
    }

    /// Finds the point on the spline closest to `position`.
    pub fn query_closest(
        &self,
        position: O::Pos,
        settings: &ClosestPointSettings,
    ) -> Result<ClosestOnSplineQueryResult<'_, O>> {
        closest::query_closest(self, position, settings)
    }

    /// Converts a raw location into a fraction of the arc length.
    pub fn normalize(&self, location: SplineLocation) -> Result<NormalizedSplineLocation> {
        normalize(self, location)
    }

    /// Converts a fraction of the arc length into a raw location.
    pub fn denormalize(&self, location: NormalizedSplineLocation) -> Result<SplineLocation> {
        denormalize(self, location)
    }

    /// The arc length from the start of the spline to a raw location.
    pub fn arc_length_at(&self, location: SplineLocation) -> Result<f64> {
        arc_length_at(self, location)
    }

    /// The raw location at which the arc length from the start equals `distance`.
    pub fn location_at_arc_length(&self, distance: f64) -> Result<SplineLocation> {
        location_at_arc_length(self, distance)
    }

    /// Gets the memoized segment lengths, computing them on first use.
    pub(crate) fn lengths(&self) -> Result<&SegmentLengths> {
        self.validate()?;
        self.settings.validate()?;
        Ok(self.lengths.get_or_init(|| self.compute_lengths()))
    }

    fn compute_lengths(&self) -> SegmentLengths {
        let subdivisions = self.settings.arc_length_subdivisions;
        let lengths = (0..self.segment_count())
            .map(|idx| integrate_speed(&self.polynomial(idx), Interval::UNIT, subdivisions))
            .collect::<Vec<_>>();
        let cumulative = std::iter::once(0.0)
            .chain(lengths.iter().scan(0.0, |sum, length| {
                *sum += length;
                Some(*sum)
            }))
            .collect::<Vec<_>>();
        log::trace!(
            "computed lengths of {} segments, total length {}",
            lengths.len(),
            cumulative.last().copied().unwrap_or(0.0)
        );
        SegmentLengths {
            lengths,
            cumulative,
        }
    }

    /// Checks that the spline is valid and `location` lies within its domain.
    pub(crate) fn check_location(&self, location: SplineLocation) -> Result<()> {
        self.validate()?;
        let domain = self.domain();
        if domain.contains(location.0) {
            Ok(())
        } else {
            Err(SplineError::LocationOutOfRange {
                location: location.0,
                min: domain.min,
                max: domain.max,
            })
        }
    }

    /// The Catmull-Rom segment starting at the handle with the given index.
    /// The index must be less than the segment count.
    pub(crate) fn catmull_rom_segment(&self, idx: usize) -> CatmullRomSegment<O> {
        let handles = [0, 1, 2, 3].map(|offset| self.handles[idx + offset]);
        CatmullRomSegment::new(handles, self.spline_type)
    }

    pub(crate) fn polynomial(&self, idx: usize) -> Polynomial<O> {
        self.catmull_rom_segment(idx).to_polynomial()
    }
}

impl<O: GeometricOperations> PartialEq for ImmutableSpline<O> {
    fn eq(&self, other: &Self) -> bool {
        self.spline_type == other.spline_type && self.handles == other.handles
    }
}

impl<O: GeometricOperations> Hash for ImmutableSpline<O> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.spline_type.hash(state);
        self.handles.len().hash(state);
        for handle in &self.handles {
            O::hash_pos(handle, state);
        }
    }
}

impl<O: GeometricOperations> SplineSegment<O> {
    /// The raw location at which the segment starts.
    pub fn start(&self) -> SplineLocation {
        self.index.start()
    }
}
