//! Closest point queries on a single polynomial segment.

use super::polynomial::check_parameter;
use super::{GeometricOperations, Polynomial};
use crate::error::{Result, SplineError};
use crate::util::Interval;

/// Newton steps with a denominator smaller than this are not taken;
/// the squared distance is flat there and the step would blow up.
const FLAT_EPSILON: f64 = 1e-12;

/// Finds the parameter of the point on `polynomial` closest to `point`.
///
/// Runs exactly `iterations` steps of Newton's method on the derivative of the
/// squared distance, starting at `t0` or at `0.5` if none is given. Each step is
/// clamped to `[0, 1]`. The iteration only stops early when the second
/// derivative of the squared distance vanishes.
///
/// The result is a local minimum. On curves with several candidates, seed
/// `t0` from a coarse sampling first.
pub fn closest_parameter<O: GeometricOperations>(
    polynomial: &Polynomial<O>,
    point: O::Pos,
    iterations: usize,
    t0: Option<f64>,
) -> Result<f64> {
    if iterations == 0 {
        return Err(SplineError::InvalidArgument(
            "closest point search needs an iteration budget of at least one".into(),
        ));
    }
    let mut t = match t0 {
        Some(t0) => {
            check_parameter(t0)?;
            t0
        }
        None => 0.5,
    };

    for _ in 0..iterations {
        let diff = O::sub(polynomial.sample(t), point);
        let tangent = polynomial.sample_dt(t);
        let numerator = O::dot(tangent, diff);
        let denominator = O::dot(polynomial.sample_dt2(t), diff) + O::dot(tangent, tangent);
        if denominator.abs() < FLAT_EPSILON {
            log::debug!("closest point search stopped on a flat distance function at t = {t}");
            break;
        }
        t = Interval::UNIT.clamp(t - numerator / denominator);
    }

    Ok(t)
}
