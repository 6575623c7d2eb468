//! Closest point queries on a whole spline.

use std::cmp::Ordering;

use once_cell::sync::OnceCell;

use super::{normalize, ImmutableSpline, NormalizedSplineLocation, SplineLocation, SplineSample};
use crate::config::ClosestPointSettings;
use crate::error::Result;
use crate::math::{closest_parameter, GeometricOperations, Polynomial};

/// The point on a spline closest to a queried position.
#[derive(Debug)]
pub struct ClosestOnSplineQueryResult<'a, O: GeometricOperations> {
    spline: &'a ImmutableSpline<O>,
    query_position: O::Pos,
    closest_position: O::Pos,
    location: SplineLocation,
    /// Derived from `location` on first request, as it needs arc lengths.
    normalized_location: OnceCell<NormalizedSplineLocation>,
}

impl<'a, O: GeometricOperations> ClosestOnSplineQueryResult<'a, O> {
    /// The spline that was queried.
    pub fn spline(&self) -> &'a ImmutableSpline<O> {
        self.spline
    }

    /// The position the query was made for.
    pub fn query_position(&self) -> O::Pos {
        self.query_position
    }

    /// The closest position found on the spline.
    pub fn closest_position(&self) -> O::Pos {
        self.closest_position
    }

    /// The raw location of the closest position.
    pub fn location(&self) -> SplineLocation {
        self.location
    }

    /// The normalized location of the closest position.
    pub fn normalized_location(&self) -> Result<NormalizedSplineLocation> {
        self.normalized_location
            .get_or_try_init(|| normalize(self.spline, self.location))
            .copied()
    }

    /// The distance between the queried and the closest position.
    pub fn distance(&self) -> f64 {
        O::distance(self.query_position, self.closest_position)
    }

    /// Samples the spline at the closest position.
    pub fn sample(&self) -> Result<SplineSample<O>> {
        self.spline.sample(self.location)
    }
}

/// A candidate for the closest point: segment, parameter and squared distance.
#[derive(Clone, Copy)]
struct Candidate {
    idx: usize,
    t: f64,
    distance2: f64,
}

impl Candidate {
    fn new<O: GeometricOperations>(polynomial: &Polynomial<O>, position: O::Pos, idx: usize, t: f64) -> Self {
        let diff = O::sub(polynomial.sample(t), position);
        Self {
            idx,
            t,
            distance2: O::dot(diff, diff),
        }
    }

    /// Orders by distance, then by location along the spline.
    fn cmp(&self, other: &Candidate) -> Ordering {
        self.distance2
            .total_cmp(&other.distance2)
            .then((self.idx as f64 + self.t).total_cmp(&(other.idx as f64 + other.t)))
    }

    fn min(self, other: Candidate) -> Candidate {
        match other.cmp(&self) {
            Ordering::Less => other,
            _ => self,
        }
    }
}

/// Samples every segment coarsely, then refines the best few segments with
/// Newton's method seeded at their coarse minimum.
pub(crate) fn query_closest<'a, O: GeometricOperations>(
    spline: &'a ImmutableSpline<O>,
    position: O::Pos,
    settings: &ClosestPointSettings,
) -> Result<ClosestOnSplineQueryResult<'a, O>> {
    settings.validate()?;
    spline.validate()?;

    let samples = settings.samples_per_segment;
    let polynomials = (0..spline.segment_count())
        .map(|idx| spline.polynomial(idx))
        .collect::<Vec<_>>();

    let mut coarse = polynomials
        .iter()
        .enumerate()
        .filter_map(|(idx, polynomial)| {
            (0..=samples)
                .map(|i| Candidate::new(polynomial, position, idx, i as f64 / samples as f64))
                .reduce(Candidate::min)
        })
        .collect::<Vec<_>>();
    coarse.sort_by(Candidate::cmp);

    let mut best: Option<Candidate> = None;
    for candidate in coarse.into_iter().take(settings.candidate_segments) {
        let polynomial = &polynomials[candidate.idx];
        let t = closest_parameter(polynomial, position, settings.iterations, Some(candidate.t))?;
        // Newton may wander off to a worse stationary point
        let found = Candidate::new(polynomial, position, candidate.idx, t).min(candidate);
        best = Some(best.map_or(found, |best| best.min(found)));
    }

    // A valid spline has at least one segment, so there is always a candidate.
    let best = best.unwrap_or(Candidate {
        idx: 0,
        t: 0.0,
        distance2: f64::INFINITY,
    });
    let polynomial = &polynomials[best.idx];
    let location = SplineLocation(best.idx as f64 + best.t);
    log::trace!("closest point at {:?}, {} away", location, best.distance2.sqrt());

    Ok(ClosestOnSplineQueryResult {
        spline,
        query_position: position,
        closest_position: polynomial.sample(best.t),
        location,
        normalized_location: OnceCell::new(),
    })
}
