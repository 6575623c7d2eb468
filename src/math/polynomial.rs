//! Polynomials over an abstract geometric space.

use smallvec::SmallVec;

use super::GeometricOperations;
use crate::error::{Result, SplineError};
use crate::util::Interval;

/// A polynomial `p(t) = d + c₁·t + c₂·t² + … + cₙ·tⁿ` of degree `n`.
///
/// The constant term `d` is a position, every other coefficient is a
/// difference. Polynomials are always evaluated segment-locally, so the
/// parameter `t` must lie within `[0, 1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Polynomial<O: GeometricOperations> {
    /// The coefficients of `t¹..tⁿ`, lowest power first.
    coeffs: SmallVec<[O::Diff; 3]>,
    constant: O::Pos,
}

impl<O: GeometricOperations> Polynomial<O> {
    /// Creates a polynomial from its constant term and the coefficients of
    /// `t¹, t², …` in ascending order.
    pub fn new(constant: O::Pos, coeffs: impl IntoIterator<Item = O::Diff>) -> Self {
        Self {
            coeffs: coeffs.into_iter().collect(),
            constant,
        }
    }

    /// A polynomial of degree zero.
    pub fn constant(value: O::Pos) -> Self {
        Self::new(value, [])
    }

    /// The cubic `a·t³ + b·t² + c·t + d`.
    pub fn cubic(a: O::Diff, b: O::Diff, c: O::Diff, d: O::Pos) -> Self {
        Self::new(d, [c, b, a])
    }

    /// The cubic Hermite curve which starts at `p0` with tangent `m0`
    /// and ends at `p1` with tangent `m1`.
    pub fn hermite(p0: O::Pos, m0: O::Diff, p1: O::Pos, m1: O::Diff) -> Self {
        let span = O::sub(p1, p0);
        let a = O::add_diff(O::add_diff(O::mul(span, -2.0), m0), m1);
        let b = O::sub_diff(O::sub_diff(O::mul(span, 3.0), O::mul(m0, 2.0)), m1);
        Self::cubic(a, b, m0, p0)
    }

    /// The degree of the polynomial, i.e. the number of non-constant coefficients.
    pub fn degree(&self) -> usize {
        self.coeffs.len()
    }

    /// The coefficients of `t¹..tⁿ`, lowest power first.
    pub fn coefficients(&self) -> &[O::Diff] {
        &self.coeffs
    }

    /// The constant term, which is also the position at `t = 0`.
    pub fn constant_term(&self) -> O::Pos {
        self.constant
    }

    /// Evaluates the polynomial.
    ///
    /// Fails with [SplineError::ParameterOutOfRange] if `t` is not within `[0, 1]`.
    pub fn evaluate(&self, t: f64) -> Result<O::Pos> {
        check_parameter(t)?;
        Ok(self.sample(t))
    }

    /// Evaluates the first derivative.
    pub fn evaluate_derivative(&self, t: f64) -> Result<O::Diff> {
        check_parameter(t)?;
        Ok(self.sample_dt(t))
    }

    /// Evaluates the second derivative.
    pub fn evaluate_second_derivative(&self, t: f64) -> Result<O::Diff> {
        check_parameter(t)?;
        Ok(self.sample_dt2(t))
    }

    /// Evaluates the `n`-th derivative.
    ///
    /// Derivatives of an order above the degree are exactly the zero difference.
    /// The zeroth derivative is a position and must be obtained through
    /// [Polynomial::evaluate] instead, so `n == 0` is rejected.
    pub fn evaluate_nth_derivative(&self, t: f64, n: usize) -> Result<O::Diff> {
        check_parameter(t)?;
        if n == 0 {
            return Err(SplineError::InvalidArgument(
                "the zeroth derivative is a position, use `evaluate`".into(),
            ));
        }
        Ok(self.sample_nth(t, n))
    }

    /// Evaluates the polynomial without checking the domain.
    pub(crate) fn sample(&self, t: f64) -> O::Pos {
        let tail = self
            .coeffs
            .iter()
            .rev()
            .fold(O::zero_diff(), |acc, &c| O::add_diff(c, O::mul(acc, t)));
        O::add(self.constant, O::mul(tail, t))
    }

    pub(crate) fn sample_dt(&self, t: f64) -> O::Diff {
        self.sample_nth(t, 1)
    }

    pub(crate) fn sample_dt2(&self, t: f64) -> O::Diff {
        self.sample_nth(t, 2)
    }

    /// Evaluates `Σ i!/(i-n)! · cᵢ · t^(i-n)` over `i ≥ n` with Horner's scheme.
    pub(crate) fn sample_nth(&self, t: f64, n: usize) -> O::Diff {
        (n..=self.degree()).rev().fold(O::zero_diff(), |acc, power| {
            let c = self.coeffs[power - 1];
            O::add_diff(O::mul(acc, t), O::mul(c, falling_factorial(power, n)))
        })
    }
}

/// `i · (i-1) · … · (i-n+1)`, the factor the power rule produces after `n` steps.
fn falling_factorial(i: usize, n: usize) -> f64 {
    (i + 1 - n..=i).map(|k| k as f64).product()
}

pub(crate) fn check_parameter(t: f64) -> Result<()> {
    if Interval::UNIT.contains(t) {
        Ok(())
    } else {
        Err(SplineError::ParameterOutOfRange { value: t })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::math::{Point2d, Space1d, Space2d, Vector2d};
    use assert_approx_eq::assert_approx_eq;
    use rand::{Rng, SeedableRng};

    fn random_quintic(rng: &mut impl Rng) -> Polynomial<Space1d> {
        let coeffs = (0..5).map(|_| rng.gen_range(-10.0..10.0)).collect::<Vec<_>>();
        Polynomial::new(rng.gen_range(-10.0..10.0), coeffs)
    }

    #[test]
    pub fn evaluate_matches_expansion() {
        let mut rng = rand::rngs::StdRng::from_seed(*b"Vegemite sandwhich is not fun...");
        for _i in 0..100 {
            let poly = random_quintic(&mut rng);
            let t: f64 = rng.gen_range(0.0..=1.0);
            let expected = poly.constant_term()
                + poly
                    .coefficients()
                    .iter()
                    .enumerate()
                    .map(|(i, c)| c * t.powi(i as i32 + 1))
                    .sum::<f64>();
            assert_approx_eq!(poly.evaluate(t).unwrap(), expected, 1e-7);
        }
    }

    #[test]
    pub fn derivatives_match_finite_differences() {
        let mut rng = rand::rngs::StdRng::from_seed(*b"Vegemite sandwhich is not fun...");
        let h = 1e-5;
        for _i in 0..100 {
            let poly = random_quintic(&mut rng);
            let t = rng.gen_range(0.1..0.9);
            let numeric = (poly.evaluate(t + h).unwrap() - poly.evaluate(t - h).unwrap()) / (2. * h);
            assert_approx_eq!(poly.evaluate_derivative(t).unwrap(), numeric, 1e-4);

            let numeric2 = (poly.evaluate_derivative(t + h).unwrap()
                - poly.evaluate_derivative(t - h).unwrap())
                / (2. * h);
            assert_approx_eq!(poly.evaluate_second_derivative(t).unwrap(), numeric2, 1e-4);

            let numeric3 = (poly.evaluate_nth_derivative(t + h, 2).unwrap()
                - poly.evaluate_nth_derivative(t - h, 2).unwrap())
                / (2. * h);
            assert_approx_eq!(poly.evaluate_nth_derivative(t, 3).unwrap(), numeric3, 1e-3);
        }
    }

    #[test]
    pub fn derivatives_above_degree_are_zero() {
        let poly = Polynomial::<Space2d>::cubic(
            Vector2d::new(1.0, 2.0),
            Vector2d::new(-3.0, 0.5),
            Vector2d::new(4.0, 4.0),
            Point2d::new(7.0, -1.0),
        );
        assert_eq!(poly.evaluate_nth_derivative(0.3, 3).unwrap(), Vector2d::new(6.0, 12.0));
        assert_eq!(poly.evaluate_nth_derivative(0.3, 4).unwrap(), Vector2d::new(0.0, 0.0));
        assert_eq!(poly.evaluate_nth_derivative(1.0, 9).unwrap(), Vector2d::new(0.0, 0.0));
        assert_eq!(
            Polynomial::<Space1d>::constant(3.0).evaluate_nth_derivative(0.5, 1),
            Ok(0.0)
        );
    }

    #[test]
    pub fn rejects_parameters_outside_unit_interval() {
        let poly = Polynomial::<Space1d>::cubic(1.0, 1.0, 1.0, 1.0);
        for t in [-0.001, 1.001, f64::NAN, f64::INFINITY] {
            assert!(matches!(poly.evaluate(t), Err(SplineError::ParameterOutOfRange { .. })));
            assert!(poly.evaluate_derivative(t).is_err());
            assert!(poly.evaluate_nth_derivative(t, 2).is_err());
        }
        assert!(matches!(
            poly.evaluate_nth_derivative(0.5, 0),
            Err(SplineError::InvalidArgument(_))
        ));
    }

    #[test]
    pub fn hermite_fit() {
        let mut rng = rand::rngs::StdRng::from_seed(*b"Vegemite sandwhich is not fun...");
        let mut point = || Point2d::new(rng.gen_range(-100.0..100.0), rng.gen_range(-100.0..100.0));
        for _i in 0..100 {
            let (p0, p1) = (point(), point());
            let (m0, m1) = (point() - Point2d::new(0., 0.), point() - Point2d::new(0., 0.));
            let poly = Polynomial::<Space2d>::hermite(p0, m0, p1, m1);

            let start = poly.evaluate(0.0).unwrap();
            let end = poly.evaluate(1.0).unwrap();
            assert_approx_eq!(start.x, p0.x, 0.01);
            assert_approx_eq!(start.y, p0.y, 0.01);
            assert_approx_eq!(end.x, p1.x, 0.01);
            assert_approx_eq!(end.y, p1.y, 0.01);

            let (d0, d1) = (poly.evaluate_derivative(0.0).unwrap(), poly.evaluate_derivative(1.0).unwrap());
            assert_approx_eq!(d0.x, m0.x, 0.01);
            assert_approx_eq!(d0.y, m0.y, 0.01);
            assert_approx_eq!(d1.x, m1.x, 0.01);
            assert_approx_eq!(d1.y, m1.y, 0.01);
        }
    }

    #[test]
    pub fn straight_lines() {
        let mut rng = rand::rngs::StdRng::from_seed(*b"Vegemite sandwhich is not fun...");
        for _i in 0..100 {
            let y1 = rng.gen_range(-100.0..100.0);
            let y2 = rng.gen_range(-100.0..100.0);
            let poly = Polynomial::<Space1d>::hermite(y1, y2 - y1, y2, y2 - y1);

            assert_approx_eq!(poly.evaluate(0.5).unwrap(), 0.5 * (y1 + y2), 0.01);
            assert_approx_eq!(poly.evaluate_derivative(0.5).unwrap(), y2 - y1, 0.01);
            assert_approx_eq!(poly.evaluate_second_derivative(0.5).unwrap(), 0.0, 0.01);
        }
    }
}
