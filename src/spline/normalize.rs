//! Conversions between raw locations and arc length.
//!
//! A raw [SplineLocation] advances uniformly in each segment's polynomial
//! parameter, which is not proportional to arc length for most splines.
//! These functions map raw locations onto [NormalizedSplineLocation]s, the
//! fraction of the spline's arc length, and back.

use super::{ImmutableSpline, NormalizedSplineLocation, SegmentLengths, SplineLocation};
use crate::error::{Result, SplineError};
use crate::math::arclen::{integrate_speed, solve_parameter};
use crate::math::GeometricOperations;
use crate::util::Interval;

/// Converts a raw location into the fraction of arc length travelled up to it.
///
/// Fails if the spline is invalid or the location lies outside `[0, segment_count]`.
/// A spline without length, whose handles all coincide, normalizes linearly.
pub fn normalize<O: GeometricOperations>(
    spline: &ImmutableSpline<O>,
    location: SplineLocation,
) -> Result<NormalizedSplineLocation> {
    let distance = arc_length_at(spline, location)?;
    let total = spline.length()?;
    Ok(NormalizedSplineLocation(fraction(spline, location, distance, total)))
}

/// Converts a fraction of the arc length into the raw location reaching it.
///
/// A fraction that falls exactly on a boundary between two segments resolves
/// to the start of the later segment; `1` resolves to the end of the spline.
pub fn denormalize<O: GeometricOperations>(
    spline: &ImmutableSpline<O>,
    location: NormalizedSplineLocation,
) -> Result<SplineLocation> {
    let lengths = spline.lengths()?;
    check_normalized(location)?;
    let total = lengths.total();
    if total <= 0.0 {
        return Ok(SplineLocation(location.0 * spline.segment_count() as f64));
    }
    let distance = location.0 * total;
    let idx = lengths.cumulative[1..].partition_point(|end| *end <= distance);
    Ok(locate(spline, lengths, idx, distance))
}

/// The arc length from the start of the spline to a raw location.
pub fn arc_length_at<O: GeometricOperations>(
    spline: &ImmutableSpline<O>,
    location: SplineLocation,
) -> Result<f64> {
    spline.check_location(location)?;
    let lengths = spline.lengths()?;
    let (idx, t) = location.split(spline.segment_count());
    Ok(lengths.cumulative[idx] + partial_length(spline, lengths, idx, Interval::new(0.0, t)))
}

/// The raw location at which the arc length from the start of the spline equals `distance`.
pub fn location_at_arc_length<O: GeometricOperations>(
    spline: &ImmutableSpline<O>,
    distance: f64,
) -> Result<SplineLocation> {
    let lengths = spline.lengths()?;
    let total = lengths.total();
    if !Interval::new(0.0, total).contains(distance) {
        return Err(SplineError::LocationOutOfRange {
            location: distance,
            min: 0.0,
            max: total,
        });
    }
    let idx = lengths.cumulative[1..].partition_point(|end| *end <= distance);
    Ok(locate(spline, lengths, idx, distance))
}

/// Normalizes an ascending sequence of raw locations in a single pass.
///
/// Consecutive locations within the same segment only integrate the arc
/// between them. The result matches calling [normalize] on each location.
/// Fails with [SplineError::UnsortedLocations] at the first location that is
/// smaller than its predecessor.
pub fn bulk_normalize_ordered<O: GeometricOperations>(
    spline: &ImmutableSpline<O>,
    locations: impl IntoIterator<Item = SplineLocation>,
) -> Result<Vec<NormalizedSplineLocation>> {
    let lengths = spline.lengths()?;
    let total = lengths.total();
    let count = spline.segment_count();

    // The segment, parameter and arc length of the previous location.
    let mut cursor: Option<(usize, f64, f64)> = None;
    let mut previous = None;
    let mut result = Vec::new();

    for (index, location) in locations.into_iter().enumerate() {
        check_ascending(index, previous, location.0)?;
        spline.check_location(location)?;
        previous = Some(location.0);

        let (idx, t) = location.split(count);
        let distance = match cursor {
            Some((last_idx, last_t, last_distance)) if last_idx == idx => {
                last_distance + partial_length(spline, lengths, idx, Interval::new(last_t, t))
            }
            _ => lengths.cumulative[idx] + partial_length(spline, lengths, idx, Interval::new(0.0, t)),
        };
        cursor = Some((idx, t, distance));
        result.push(NormalizedSplineLocation(fraction(spline, location, distance, total)));
    }

    Ok(result)
}

/// Denormalizes an ascending sequence of normalized locations in a single pass.
///
/// The search for the containing segment resumes where the previous location
/// was found. Fails with [SplineError::UnsortedLocations] at the first location
/// that is smaller than its predecessor.
pub fn bulk_denormalize_ordered<O: GeometricOperations>(
    spline: &ImmutableSpline<O>,
    locations: impl IntoIterator<Item = NormalizedSplineLocation>,
) -> Result<Vec<SplineLocation>> {
    let lengths = spline.lengths()?;
    let total = lengths.total();
    let count = spline.segment_count();

    let mut idx = 0;
    let mut previous = None;
    let mut result = Vec::new();

    for (index, location) in locations.into_iter().enumerate() {
        check_ascending(index, previous, location.0)?;
        check_normalized(location)?;
        previous = Some(location.0);

        if total <= 0.0 {
            result.push(SplineLocation(location.0 * count as f64));
            continue;
        }
        let distance = location.0 * total;
        while idx < count && lengths.cumulative[idx + 1] <= distance {
            idx += 1;
        }
        result.push(locate(spline, lengths, idx, distance));
    }

    Ok(result)
}

/// Solves for the raw location at `distance`, given the index of the first
/// segment ending beyond it. An index past the last segment means the end.
fn locate<O: GeometricOperations>(
    spline: &ImmutableSpline<O>,
    lengths: &SegmentLengths,
    idx: usize,
    distance: f64,
) -> SplineLocation {
    let count = spline.segment_count();
    if idx >= count {
        return SplineLocation(count as f64);
    }
    let local = distance - lengths.cumulative[idx];
    let t = solve_parameter(
        &spline.polynomial(idx),
        local,
        lengths.lengths[idx],
        spline.settings().arc_length_subdivisions,
    );
    SplineLocation(idx as f64 + t)
}

/// The arc length of segment `idx` over a range of its parameter.
fn partial_length<O: GeometricOperations>(
    spline: &ImmutableSpline<O>,
    lengths: &SegmentLengths,
    idx: usize,
    range: Interval<f64>,
) -> f64 {
    if range.length() <= 0.0 {
        0.0
    } else if range == Interval::UNIT {
        lengths.lengths[idx]
    } else {
        integrate_speed(&spline.polynomial(idx), range, spline.settings().arc_length_subdivisions)
    }
}

/// The fraction of `total` covered by `distance`, with a linear fallback for
/// splines without length.
fn fraction<O: GeometricOperations>(
    spline: &ImmutableSpline<O>,
    location: SplineLocation,
    distance: f64,
    total: f64,
) -> f64 {
    if total <= 0.0 {
        location.0 / spline.segment_count() as f64
    } else {
        (distance / total).min(1.0)
    }
}

fn check_normalized(location: NormalizedSplineLocation) -> Result<()> {
    if Interval::UNIT.contains(location.0) {
        Ok(())
    } else {
        Err(SplineError::LocationOutOfRange {
            location: location.0,
            min: 0.0,
            max: 1.0,
        })
    }
}

fn check_ascending(index: usize, previous: Option<f64>, next: f64) -> Result<()> {
    match previous {
        Some(previous) if next < previous => Err(SplineError::UnsortedLocations {
            index,
            previous,
            next,
        }),
        _ => Ok(()),
    }
}
