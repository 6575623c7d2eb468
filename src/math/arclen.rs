//! Arc length of polynomial segments.

use super::{GeometricOperations, Polynomial};
use crate::error::{Result, SplineError};
use crate::util::Interval;

/// Weights and abscissae of 16-point Gauss-Legendre quadrature on `[-1, 1]`.
const GAUSS_LEGENDRE_COEFFS_16: [(f64, f64); 16] = [
    (0.027152459411754058, -0.9894009349916499),
    (0.062253523938647776, -0.9445750230732326),
    (0.0951585116824929, -0.8656312023878318),
    (0.12462897125553395, -0.755404408355003),
    (0.14959598881657682, -0.6178762444026438),
    (0.16915651939500256, -0.45801677765722737),
    (0.1826034150449236, -0.2816035507792589),
    (0.18945061045506847, -0.09501250983763744),
    (0.18945061045506847, 0.09501250983763744),
    (0.1826034150449236, 0.2816035507792589),
    (0.16915651939500256, 0.45801677765722737),
    (0.14959598881657682, 0.6178762444026438),
    (0.12462897125553395, 0.755404408355003),
    (0.0951585116824929, 0.8656312023878318),
    (0.062253523938647776, 0.9445750230732326),
    (0.027152459411754058, 0.9894009349916499),
];

/// Maximum number of refinement steps when inverting the arc length.
const MAX_INVERSION_STEPS: usize = 64;

/// Relative accuracy at which an inverted arc length is accepted.
const INVERSION_TOLERANCE: f64 = 1e-13;

/// Computes the arc length of a polynomial between `0` and `t`.
///
/// The interval is split into `subdivisions` equal parts, each integrated
/// with 16-point Gauss-Legendre quadrature of the curve's speed.
pub fn arc_length<O: GeometricOperations>(
    polynomial: &Polynomial<O>,
    t: f64,
    subdivisions: usize,
) -> Result<f64> {
    super::polynomial::check_parameter(t)?;
    check_subdivisions(subdivisions)?;
    Ok(integrate_speed(polynomial, Interval::new(0.0, t), subdivisions))
}

/// Finds the parameter `t` at which the arc length measured from `t = 0` equals `length`.
///
/// Fails if `length` is negative or exceeds the length of the whole segment.
pub fn parameter_at_arc_length<O: GeometricOperations>(
    polynomial: &Polynomial<O>,
    length: f64,
    subdivisions: usize,
) -> Result<f64> {
    check_subdivisions(subdivisions)?;
    let total = integrate_speed(polynomial, Interval::UNIT, subdivisions);
    // Lengths measured independently may exceed the quadrature total by rounding.
    let slack = 1e-9 * total.max(1.0);
    if !Interval::new(0.0, total + slack).contains(length) {
        return Err(SplineError::LocationOutOfRange {
            location: length,
            min: 0.0,
            max: total,
        });
    }
    Ok(solve_parameter(polynomial, length, total, subdivisions))
}

/// Integrates `|p'(t)|` over the given range of parameters.
pub(crate) fn integrate_speed<O: GeometricOperations>(
    polynomial: &Polynomial<O>,
    range: Interval<f64>,
    subdivisions: usize,
) -> f64 {
    let step = range.length() / subdivisions as f64;
    let half = 0.5 * step;
    (0..subdivisions)
        .map(|i| {
            let mid = range.min + (i as f64 + 0.5) * step;
            GAUSS_LEGENDRE_COEFFS_16
                .iter()
                .map(|&(wi, xi)| {
                    // Rounding may push the outermost abscissa a hair past the domain.
                    let t = Interval::UNIT.clamp(mid + half * xi);
                    wi * O::magnitude(polynomial.sample_dt(t))
                })
                .sum::<f64>()
                * half
        })
        .sum()
}

/// Inverts [integrate_speed] on `[0, t]` for a target length within `[0, total]`.
///
/// Newton's method on the arc length, falling back to bisection whenever a
/// step would leave the bracket known to contain the solution.
pub(crate) fn solve_parameter<O: GeometricOperations>(
    polynomial: &Polynomial<O>,
    target: f64,
    total: f64,
    subdivisions: usize,
) -> f64 {
    if target <= 0.0 || total <= 0.0 {
        return 0.0;
    }
    if target >= total {
        return 1.0;
    }

    let mut bracket = Interval::UNIT;
    let mut t = target / total;
    for _ in 0..MAX_INVERSION_STEPS {
        let error = integrate_speed(polynomial, Interval::new(0.0, t), subdivisions) - target;
        if error.abs() <= INVERSION_TOLERANCE * total {
            break;
        }
        if error > 0.0 {
            bracket.max = t;
        } else {
            bracket.min = t;
        }
        let speed = O::magnitude(polynomial.sample_dt(t));
        let next = t - error / speed;
        t = if speed > 0.0 && next > bracket.min && next < bracket.max {
            next
        } else {
            bracket.lerp(0.5)
        };
    }
    t
}

fn check_subdivisions(subdivisions: usize) -> Result<()> {
    if subdivisions == 0 {
        return Err(SplineError::InvalidArgument(
            "arc length integration needs at least one subdivision".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::math::{Point2d, Space2d, Vector2d};
    use assert_approx_eq::assert_approx_eq;

    /// The parabola `(t, t²)`.
    fn parabola() -> Polynomial<Space2d> {
        Polynomial::new(Point2d::new(0.0, 0.0), [Vector2d::new(1.0, 0.0), Vector2d::new(0.0, 1.0)])
    }

    /// Closed form arc length of `(t, t²)` from `0` to `t`.
    fn parabola_length(t: f64) -> f64 {
        let s = (1.0 + 4.0 * t * t).sqrt();
        0.5 * t * s + 0.25 * (2.0 * t).asinh()
    }

    #[test]
    fn straight_line_length() {
        let line = Polynomial::<Space2d>::new(Point2d::new(1.0, 1.0), [Vector2d::new(3.0, 4.0)]);
        assert_approx_eq!(arc_length(&line, 1.0, 1).unwrap(), 5.0, 1e-12);
        assert_approx_eq!(arc_length(&line, 0.3, 1).unwrap(), 1.5, 1e-12);
        assert_eq!(arc_length(&line, 0.0, 1).unwrap(), 0.0);
    }

    #[test]
    fn parabola_matches_closed_form() {
        let curve = parabola();
        for i in 0..=10 {
            let t = i as f64 / 10.0;
            assert_approx_eq!(arc_length(&curve, t, 4).unwrap(), parabola_length(t), 1e-10);
        }
    }

    #[test]
    fn inverse_recovers_parameter() {
        let curve = parabola();
        for i in 0..=20 {
            let t = i as f64 / 20.0;
            let length = parabola_length(t);
            assert_approx_eq!(parameter_at_arc_length(&curve, length, 4).unwrap(), t, 1e-9);
        }
    }

    #[test]
    fn rejects_invalid_input() {
        let curve = parabola();
        assert!(arc_length(&curve, 1.5, 4).is_err());
        assert!(arc_length(&curve, 0.5, 0).is_err());
        assert!(matches!(
            parameter_at_arc_length(&curve, 100.0, 4),
            Err(SplineError::LocationOutOfRange { .. })
        ));
        assert!(parameter_at_arc_length(&curve, -0.1, 4).is_err());
    }

    #[test]
    fn degenerate_curve_has_zero_length() {
        let point = Polynomial::<Space2d>::constant(Point2d::new(2.0, 3.0));
        assert_eq!(arc_length(&point, 1.0, 4).unwrap(), 0.0);
        assert_eq!(parameter_at_arc_length(&point, 0.0, 4).unwrap(), 0.0);
    }
}
