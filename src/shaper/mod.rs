pub mod tanh;
pub mod wavefolder;

pub use tanh::TanhShaper;
pub use wavefolder::Wavefolder;

use crate::spline::PiecewiseCurve;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShaperError {
    #[error("Steepness must be greater than 0, got: {0}")]
    InvalidSteepness(f64),
    #[error("Folding must be greater than 0, got: {0}")]
    InvalidFolding(f64),
}

/// Core trait for all waveshaper transfer functions
///
/// A transfer function maps an input sample to an output sample. Each one
/// also knows its antiderivative, which is what first order antiderivative
/// anti-aliasing evaluates instead of the function itself.
pub trait TransferFunction {
    /// Evaluate the function at `x`
    fn value(&self, x: f64) -> f64;

    /// Evaluate an antiderivative at `x`
    ///
    /// The integration constant is arbitrary but fixed.
    fn antiderivative(&self, x: f64) -> f64;
}

impl TransferFunction for PiecewiseCurve {
    fn value(&self, x: f64) -> f64 {
        PiecewiseCurve::value(self, x)
    }

    fn antiderivative(&self, x: f64) -> f64 {
        PiecewiseCurve::antiderivative(self, x)
    }
}

/// `n` evenly spaced points from `min` (inclusive) towards `max` (exclusive)
pub fn sample_range(min: f64, max: f64, n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| min + (max - min) * (i as f64 / n as f64))
        .collect()
}

/// What antiderivative anti-aliasing outputs for a sequence of samples
///
/// For each sample the difference quotient of the antiderivative between the
/// previous and the current input is used; when the input did not move (or
/// for the very first sample) the function value is used instead, which is
/// the limit of the quotient.
///
/// # Arguments
/// * `func` - The transfer function
/// * `xs` - Input samples in playback order
///
/// # Example
/// ```
/// use synthgen::shaper::{antiderivative_approximation, TanhShaper};
///
/// let shaper = TanhShaper::new(2.0).unwrap();
/// let ys = antiderivative_approximation(&shaper, &[0.0, 0.0, 0.5]);
/// assert_eq!(ys[0], 0.0);
/// assert_eq!(ys[1], 0.0);
/// assert!(ys[2] > 0.0 && ys[2] < 0.5);
/// ```
pub fn antiderivative_approximation<F: TransferFunction + ?Sized>(func: &F, xs: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(xs.len());
    let Some(&first) = xs.first() else {
        return out;
    };
    let mut prev = first;
    let mut prev_antiderivative = func.antiderivative(prev);

    for &x in xs {
        let delta = x - prev;
        let antiderivative = func.antiderivative(x);
        if delta.abs() > 0.0 {
            out.push((antiderivative - prev_antiderivative) / delta);
        } else {
            out.push(func.value(x));
        }
        prev = x;
        prev_antiderivative = antiderivative;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spline::delay_feedback;

    #[test]
    fn test_sample_range() {
        let xs = sample_range(-3.0, 3.0, 4);
        assert_eq!(xs, vec![-3.0, -1.5, 0.0, 1.5]);
        assert!(sample_range(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn test_approximation_tracks_function() {
        let curve = delay_feedback(0.5).unwrap();
        let shapers: [&dyn TransferFunction; 3] = [
            &curve,
            &TanhShaper::new(3.0).unwrap(),
            &Wavefolder::new(),
        ];
        let xs = sample_range(-3.0, 3.0, 20000);
        for shaper in shapers {
            let approx = antiderivative_approximation(shaper, &xs);
            assert_eq!(approx.len(), xs.len());
            assert_eq!(approx[0], shaper.value(xs[0]));
            for i in 1..xs.len() {
                let midpoint = (xs[i] + xs[i - 1]) / 2.0;
                assert!(
                    (approx[i] - shaper.value(midpoint)).abs() < 1e-3,
                    "at {}: {} vs {}",
                    midpoint,
                    approx[i],
                    shaper.value(midpoint)
                );
            }
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(antiderivative_approximation(&Wavefolder::new(), &[]).is_empty());
    }
}
