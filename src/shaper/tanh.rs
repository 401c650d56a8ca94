use super::{ShaperError, TransferFunction};

/// Hyperbolic tangent distortion: `f(x) = tanh(steepness * x / 2)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TanhShaper {
    steepness: f64,
}

impl TanhShaper {
    /// Create a new shaper
    ///
    /// # Arguments
    /// * `steepness` - Slope multiplier, must be positive
    ///
    /// # Example
    /// ```
    /// use synthgen::shaper::TanhShaper;
    ///
    /// assert!(TanhShaper::new(4.0).is_ok());
    /// assert!(TanhShaper::new(0.0).is_err());
    /// ```
    pub fn new(steepness: f64) -> Result<Self, ShaperError> {
        if !(steepness > 0.0) || !steepness.is_finite() {
            return Err(ShaperError::InvalidSteepness(steepness));
        }
        Ok(Self { steepness })
    }

    pub fn steepness(&self) -> f64 {
        self.steepness
    }
}

/// `ln(1 + e^t)` without overflowing for large `t`
fn softplus(t: f64) -> f64 {
    t.max(0.0) + (-t.abs()).exp().ln_1p()
}

impl TransferFunction for TanhShaper {
    fn value(&self, x: f64) -> f64 {
        (self.steepness * x * 0.5).tanh()
    }

    /// `x + (2 / steepness) * ln(1 + e^(-steepness * x))`
    fn antiderivative(&self, x: f64) -> f64 {
        x + (2.0 / self.steepness) * softplus(-self.steepness * x)
    }
}
