//! Ready-made transfer curves
//!
//! Each preset is defined purely by its junction constraints; the linear
//! solve produces the coefficients. The delay feedback curve additionally has
//! a hand-derived closed form, which [`check_delay_feedback`] compares against
//! the solver output as a self-test before anything is generated from it.

use super::curve::{Constraint, CurveBuilder, CurveError, PiecewiseCurve};
use super::linalg::{solve, Matrix};
use thiserror::Error;
use tracing::{debug, info};

/// Inputs at or above this magnitude saturate
pub const INPUT_MAX: f64 = 3.0;

/// Largest allowed difference between a hand-derived and a solved coefficient
pub const CONSISTENCY_TOLERANCE: f64 = 0.000001;

/// A hand-derived coefficient disagrees with the solved one
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Calculation error in {name}:\n      manual: {manual}\n    computed: {computed}\n        diff: {diff}")]
pub struct ConsistencyError {
    pub name: String,
    pub manual: f64,
    pub computed: f64,
    pub diff: f64,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PresetError {
    #[error(transparent)]
    Curve(#[from] CurveError),
    #[error(transparent)]
    Inconsistent(#[from] ConsistencyError),
}

/// Peak value of the delay feedback curve at the junction for a given slope at 0
///
/// Picks the largest value that keeps the cubic part monotone, minus a small
/// safety margin.
pub fn delay_feedback_alpha(beta: f64) -> f64 {
    (beta + 5.0 + (beta * beta - 6.0 * beta + 5.0).sqrt()) / 8.0 - 0.001
}

fn check_beta(beta: f64) -> Result<(), CurveError> {
    if !(0.0..=1.0).contains(&beta) {
        return Err(CurveError::InvalidParameter(format!(
            "beta must be between 0.0 and 1.0, got {}",
            beta
        )));
    }
    Ok(())
}

/// Saturating curve for delay feedback paths
///
/// - `f` on `[0, 1)`: cubic with `f(0) = 0`, `f'(0) = beta`, `f(1) = alpha`
/// - `g` on `[1, 3)`: quadratic meeting `f` smoothly at 1 and reaching 1 with
///   zero slope at 3
/// - `1` from 3 onwards
///
/// Increasing `beta` reduces the distortion.
pub fn delay_feedback(beta: f64) -> Result<PiecewiseCurve, CurveError> {
    check_beta(beta)?;
    let alpha = delay_feedback_alpha(beta);

    CurveBuilder::new(INPUT_MAX)
        .segment(0.0, 3)
        .segment(1.0, 2)
        .constraint(Constraint::value(0, 0.0, 0.0))
        .constraint(Constraint::slope(0, 0.0, beta))
        .constraint(Constraint::value(0, 1.0, alpha))
        .constraints(Constraint::smooth_junction(0, 1, 1.0, 1))
        .constraint(Constraint::value(1, INPUT_MAX, 1.0))
        .constraint(Constraint::slope(1, INPUT_MAX, 0.0))
        .build()
}

/// Closed form of [`delay_feedback`], derived by hand
///
/// `f(x) = ((A x + B) x + C) x`, `F(x) = f`'s antiderivative `+ cf`,
/// `g(x) = (a x - 6 a) x + 9 a + 1` with `a = (alpha - 1) / 4`,
/// `G(x) = g`'s antiderivative `+ cg`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayFeedbackClosedForm {
    pub alpha: f64,
    pub beta: f64,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub cf: f64,
    pub tail_scale: f64,
    pub cg: f64,
}

impl DelayFeedbackClosedForm {
    pub fn new(beta: f64) -> Self {
        let alpha = delay_feedback_alpha(beta);
        let tail_scale = (alpha - 1.0) / 4.0;
        Self {
            alpha,
            beta,
            a: 1.0 - 3.0 * alpha + beta,
            b: 4.0 * alpha - 2.0 * beta - 1.0,
            c: beta,
            cf: (-5.0 * alpha + 7.0 - beta / 3.0) / 4.0,
            tail_scale,
            cg: -9.0 * tail_scale,
        }
    }

    /// Ascending coefficients of `f`
    pub fn f(&self) -> [f64; 4] {
        [0.0, self.c, self.b, self.a]
    }

    /// Ascending coefficients of `g`
    pub fn g(&self) -> [f64; 3] {
        let s = self.tail_scale;
        [9.0 * s + 1.0, -6.0 * s, s]
    }

    /// Evaluate the hand-derived curve
    pub fn value(&self, x: f64) -> f64 {
        let sign = if x < 0.0 { -1.0 } else { 1.0 };
        let x = x.abs();
        if x >= INPUT_MAX {
            return sign;
        }
        let s = self.tail_scale;
        if x >= 1.0 {
            return sign * ((s * x - 6.0 * s) * x + 9.0 * s + 1.0);
        }
        sign * ((self.a * x + self.b) * x + self.c) * x
    }

    /// Evaluate the hand-derived antiderivative
    pub fn antiderivative(&self, x: f64) -> f64 {
        let x = x.abs();
        if x >= INPUT_MAX {
            return x;
        }
        let s = self.tail_scale;
        if x >= 1.0 {
            return (((s / 3.0) * x - 3.0 * s) * x + 9.0 * s + 1.0) * x + self.cg;
        }
        ((((self.a / 4.0) * x + (self.b / 3.0)) * x + (self.c / 2.0)) * x) * x + self.cf
    }

    /// Solve `A`, `B` and `cf` from the antiderivative's junction equations
    ///
    /// Rows: `F(1) - F(0)` matches `alpha - beta`, slope matching at 1, and
    /// continuity of `F` with `G` at 1.
    pub fn solve_integration_system(&self) -> Result<[f64; 3], CurveError> {
        let m = Matrix::from_rows(&[&[1.0, 1.0, 0.0], &[3.0, 2.0, 0.0], &[3.0, 4.0, 12.0]]);
        let rhs = [
            self.alpha - self.beta,
            1.0 - self.alpha - self.beta,
            19.0 * self.alpha - 7.0 + 12.0 * self.cg - 6.0 * self.c,
        ];
        let x = solve(&m, &rhs)?;
        Ok([x[0], x[1], x[2]])
    }
}

fn compare(name: &str, manual: f64, computed: f64) -> Result<(), ConsistencyError> {
    let diff = (manual - computed).abs();
    // NaN must fail too
    if !(diff <= CONSISTENCY_TOLERANCE) {
        return Err(ConsistencyError {
            name: name.to_string(),
            manual,
            computed,
            diff,
        });
    }
    Ok(())
}

/// Build [`delay_feedback`] and verify it against the closed form
///
/// Checks every coefficient of both pieces, both integration constants, and
/// the separately solved antiderivative system.
pub fn check_delay_feedback(beta: f64) -> Result<PiecewiseCurve, PresetError> {
    let curve = delay_feedback(beta)?;
    let manual = DelayFeedbackClosedForm::new(beta);

    let segments = curve.segments();
    let f = segments[0].poly.coefficients();
    let g = segments[1].poly.coefficients();
    for (name, want, got) in [
        ("f[0]", manual.f()[0], f[0]),
        ("C", manual.f()[1], f[1]),
        ("B", manual.f()[2], f[2]),
        ("A", manual.f()[3], f[3]),
        ("g[0]", manual.g()[0], g[0]),
        ("g[1]", manual.g()[1], g[1]),
        ("g[2]", manual.g()[2], g[2]),
    ] {
        compare(name, want, got)?;
    }

    let integrals = curve.antiderivative_segments();
    compare("cf", manual.cf, integrals[0].poly.coefficients()[0])?;
    compare("cg", manual.cg, integrals[1].poly.coefficients()[0])?;

    let [a, b, cf] = manual.solve_integration_system()?;
    compare("A", manual.a, a)?;
    compare("B", manual.b, b)?;
    compare("cf", manual.cf, cf)?;

    info!(beta, alpha = manual.alpha, "delay feedback curve passed consistency check");
    Ok(curve)
}

/// Junction smoothness of the [`soft_knee`] curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Smoothness {
    /// Value and slope continuous; cubic knee
    #[default]
    C1,
    /// Value, slope and curvature continuous; quintic knee
    C2,
}

impl Smoothness {
    pub fn derivatives(self) -> usize {
        match self {
            Smoothness::C1 => 1,
            Smoothness::C2 => 2,
        }
    }

    pub fn knee_degree(self) -> usize {
        match self {
            Smoothness::C1 => 3,
            Smoothness::C2 => 5,
        }
    }
}

/// Parameters of [`soft_knee`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoftKnee {
    /// End of the linear region
    pub gamma: f64,
    /// Curve value at 1.0
    pub knee_level: f64,
    pub smoothness: Smoothness,
}

impl SoftKnee {
    /// Knee level halfway between `gamma` and 1
    pub fn new(gamma: f64) -> Self {
        Self {
            gamma,
            knee_level: (1.0 + gamma) / 2.0,
            smoothness: Smoothness::C1,
        }
    }
}

/// Soft clipping curve: identity up to `gamma`, a polynomial knee up to 1,
/// then a quadratic tail that flattens out at the saturation ceiling
pub fn soft_knee(params: SoftKnee) -> Result<PiecewiseCurve, CurveError> {
    let SoftKnee {
        gamma,
        knee_level,
        smoothness,
    } = params;
    if !(0.0 < gamma && gamma < knee_level && knee_level < 1.0) {
        return Err(CurveError::InvalidParameter(format!(
            "need 0 < gamma < knee_level < 1, got gamma={}, knee_level={}",
            gamma, knee_level
        )));
    }
    let order = smoothness.derivatives();
    debug!(gamma, knee_level, ?smoothness, "building soft knee curve");

    CurveBuilder::new(INPUT_MAX)
        .segment(0.0, 1)
        .segment(gamma, smoothness.knee_degree())
        .segment(1.0, 2)
        .constraint(Constraint::value(0, 0.0, 0.0))
        .constraint(Constraint::slope(0, 0.0, 1.0))
        .constraints(Constraint::smooth_junction(0, 1, gamma, order))
        .constraint(Constraint::value(1, 1.0, knee_level))
        .constraints(Constraint::smooth_junction(1, 2, 1.0, order))
        .constraint(Constraint::value(2, INPUT_MAX, 1.0))
        .constraint(Constraint::slope(2, INPUT_MAX, 0.0))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-6;

    fn assert_close(a: f64, b: f64, what: &str) {
        assert!((a - b).abs() < TOLERANCE, "{}: {} vs {}", what, a, b);
    }

    fn curves() -> Vec<PiecewiseCurve> {
        let mut quintic = SoftKnee::new(0.4);
        quintic.smoothness = Smoothness::C2;
        vec![
            delay_feedback(0.0).unwrap(),
            delay_feedback(0.7).unwrap(),
            soft_knee(SoftKnee::new(0.5)).unwrap(),
            soft_knee(quintic).unwrap(),
        ]
    }

    #[test]
    fn test_consistency_check_passes() {
        for beta in [0.0, 0.25, 0.5, 1.0] {
            check_delay_feedback(beta).unwrap();
        }
    }

    #[test]
    fn test_consistency_error_message() {
        let err = compare("A", 1.0, 1.5).unwrap_err();
        assert_eq!(err.diff, 0.5);
        let message = err.to_string();
        assert!(message.starts_with("Calculation error in A:"));
        assert!(message.contains("manual: 1"));
        assert!(message.contains("computed: 1.5"));
        assert!(compare("nan", 1.0, f64::NAN).is_err());
    }

    #[test]
    fn test_solved_matches_closed_form_everywhere() {
        let curve = delay_feedback(0.3).unwrap();
        let manual = DelayFeedbackClosedForm::new(0.3);
        for i in 0..=80 {
            let x = -4.0 + 0.1 * i as f64;
            assert_close(curve.value(x), manual.value(x), "value");
            assert_close(curve.antiderivative(x), manual.antiderivative(x), "antiderivative");
        }
    }

    #[test]
    fn test_beta_out_of_range() {
        assert!(matches!(delay_feedback(-0.1), Err(CurveError::InvalidParameter(_))));
        assert!(matches!(delay_feedback(2.0), Err(CurveError::InvalidParameter(_))));
        assert!(matches!(
            check_delay_feedback(3.0),
            Err(PresetError::Curve(CurveError::InvalidParameter(_)))
        ));
    }

    #[test]
    fn test_soft_knee_junctions_agree() {
        let gamma = 0.5;
        let curve = soft_knee(SoftKnee::new(gamma)).unwrap();
        let s = curve.segments();

        let linear = s[0].poly.eval(gamma);
        let knee = s[1].poly.eval(gamma);
        assert_close(linear, gamma, "linear branch at gamma");
        assert_close(linear, knee, "linear vs knee at gamma");

        let knee = s[1].poly.eval(1.0);
        let tail = s[2].poly.eval(1.0);
        assert_close(knee, 0.75, "knee level");
        assert_close(knee, tail, "knee vs tail at 1.0");

        let tail_end = s[2].poly.eval(INPUT_MAX);
        assert_close(tail_end, 1.0, "tail at ceiling");
    }

    #[test]
    fn test_quintic_knee_is_curvature_continuous() {
        let mut params = SoftKnee::new(0.4);
        params.smoothness = Smoothness::C2;
        let curve = soft_knee(params).unwrap();
        let s = curve.segments();
        assert_eq!(s[1].poly.degree(), 5);
        for order in 0..=2 {
            assert_close(
                s[0].poly.eval_derivative(order, 0.4),
                s[1].poly.eval_derivative(order, 0.4),
                "at gamma",
            );
            assert_close(
                s[1].poly.eval_derivative(order, 1.0),
                s[2].poly.eval_derivative(order, 1.0),
                "at 1.0",
            );
        }
    }

    #[test]
    fn test_soft_knee_rejects_bad_parameters() {
        for (gamma, knee_level) in [(0.0, 0.5), (0.6, 0.5), (0.5, 1.0), (-0.2, 0.4)] {
            let result = soft_knee(SoftKnee {
                gamma,
                knee_level,
                smoothness: Smoothness::C1,
            });
            assert!(matches!(result, Err(CurveError::InvalidParameter(_))));
        }
    }

    #[test]
    fn test_antiderivative_continuous_at_junctions() {
        for curve in curves() {
            let pieces = curve.antiderivative_segments();
            for i in 1..pieces.len() {
                let x = pieces[i].start;
                assert_close(
                    pieces[i - 1].poly.eval(x),
                    pieces[i].poly.eval(x),
                    "antiderivative junction",
                );
            }
            let last = &pieces[pieces.len() - 1];
            assert_close(last.poly.eval(INPUT_MAX), INPUT_MAX, "antiderivative at ceiling");
        }
    }

    #[test]
    fn test_vanishing_coefficients_are_exact() {
        let curve = delay_feedback(0.0).unwrap();
        assert_eq!(curve.segments()[0].poly.coefficients()[0], 0.0);
        assert_eq!(curve.value(0.0), 0.0);
        assert_eq!(curve.value(-0.0), 0.0);
    }

    #[test]
    fn test_saturation_is_exact() {
        for curve in curves() {
            for x in [INPUT_MAX, 3.5, 10.0, 1e6] {
                assert_eq!(curve.value(x), 1.0);
                assert_eq!(curve.value(-x), -1.0);
                assert_eq!(curve.antiderivative(x), x);
                assert_eq!(curve.antiderivative(-x), x);
            }
        }
    }

    #[test]
    fn test_antiderivative_differentiates_back() {
        let h = 1e-4;
        for curve in curves() {
            for i in 1..60 {
                let x = -INPUT_MAX + i as f64 * 0.1;
                // Skip points whose stencil straddles a kink in the derivative
                if curve.junctions().any(|j| (x.abs() - j).abs() < 2.0 * h) {
                    continue;
                }
                let approx = (curve.antiderivative(x + h) - curve.antiderivative(x - h)) / (2.0 * h);
                assert!(
                    (approx - curve.value(x)).abs() < 100.0 * h,
                    "at {}: {} vs {}",
                    x,
                    approx,
                    curve.value(x)
                );
            }
        }
    }
}
