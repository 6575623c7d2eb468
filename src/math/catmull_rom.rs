//! Catmull-Rom segments.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{GeometricOperations, Polynomial};

/// Knot intervals shorter than this are treated as coincident control points.
const MIN_KNOT_INTERVAL: f64 = 1e-4;

/// The parameterization of a Catmull-Rom spline.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SplineType {
    /// `alpha = 0`, the classic Catmull-Rom spline.
    Uniform,
    /// `alpha = 0.5`, which avoids cusps and self-intersections within a segment.
    #[default]
    Centripetal,
    /// `alpha = 1`.
    Chordal,
}

impl SplineType {
    /// The exponent applied to handle distances to obtain knot intervals.
    pub fn alpha(self) -> f64 {
        match self {
            SplineType::Uniform => 0.0,
            SplineType::Centripetal => 0.5,
            SplineType::Chordal => 1.0,
        }
    }
}

/// Four consecutive handles of a Catmull-Rom spline.
///
/// The segment runs from `p1` to `p2`; `p0` and `p3` only shape the tangents.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CatmullRomSegment<O: GeometricOperations> {
    pub p0: O::Pos,
    pub p1: O::Pos,
    pub p2: O::Pos,
    pub p3: O::Pos,
    pub spline_type: SplineType,
}

impl<O: GeometricOperations> CatmullRomSegment<O> {
    pub fn new(handles: [O::Pos; 4], spline_type: SplineType) -> Self {
        let [p0, p1, p2, p3] = handles;
        Self {
            p0,
            p1,
            p2,
            p3,
            spline_type,
        }
    }

    /// The knot intervals `|pᵢ - pᵢ₊₁|^alpha`, with degenerate intervals replaced
    /// by a usable neighbour so that coincident handles never divide by zero.
    pub fn knot_intervals(&self) -> [f64; 3] {
        let alpha = self.spline_type.alpha();
        let interval = |a, b| O::distance(a, b).powf(alpha);
        let mut dt = [
            interval(self.p0, self.p1),
            interval(self.p1, self.p2),
            interval(self.p2, self.p3),
        ];
        let degenerate = |dt: f64| dt < MIN_KNOT_INTERVAL;

        if degenerate(dt[1]) {
            dt[1] = [dt[0], dt[2]]
                .into_iter()
                .find(|dt| !degenerate(*dt))
                .unwrap_or(1.0);
            log::trace!("coincident segment handles, knot interval replaced by {}", dt[1]);
        }
        if degenerate(dt[0]) {
            dt[0] = dt[1];
        }
        if degenerate(dt[2]) {
            dt[2] = dt[1];
        }
        dt
    }

    /// The tangents at `p1` and `p2`, scaled to the segment's `[0, 1]` domain.
    pub fn tangents(&self) -> [O::Diff; 2] {
        let [dt0, dt1, dt2] = self.knot_intervals();
        let Self { p0, p1, p2, p3, .. } = *self;

        let t1 = O::add_diff(
            O::sub_diff(O::div(O::sub(p1, p0), dt0), O::div(O::sub(p2, p0), dt0 + dt1)),
            O::div(O::sub(p2, p1), dt1),
        );
        let t2 = O::add_diff(
            O::sub_diff(O::div(O::sub(p2, p1), dt1), O::div(O::sub(p3, p1), dt1 + dt2)),
            O::div(O::sub(p3, p2), dt2),
        );

        [O::mul(t1, dt1), O::mul(t2, dt1)]
    }

    /// Converts the segment into its cubic polynomial, which passes through
    /// `p1` at `t = 0` and `p2` at `t = 1`.
    pub fn to_polynomial(&self) -> Polynomial<O> {
        let [t1, t2] = self.tangents();
        Polynomial::hermite(self.p1, t1, self.p2, t2)
    }
}

impl<O: GeometricOperations> From<CatmullRomSegment<O>> for Polynomial<O> {
    fn from(segment: CatmullRomSegment<O>) -> Self {
        segment.to_polynomial()
    }
}
