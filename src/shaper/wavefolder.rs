//! Band-limited triangle wavefolder
//!
//! The fold curve is the first three odd harmonics of a triangle wave with
//! period 4, so it passes through 0 at the origin and folds back at every
//! odd integer input.

use super::{ShaperError, TransferFunction};
use std::f64::consts::PI;

pub const FOLD_MIN: f64 = 0.0;
pub const FOLD_TRANSITION: f64 = 0.5;
pub const FOLD_MAX: f64 = 5.0 + FOLD_TRANSITION;

const TRIANGLE_SCALE: f64 = 8.0 / (PI * PI);

const S0: f64 = TRIANGLE_SCALE;
const S1: f64 = PI / 2.0;
const S2: f64 = TRIANGLE_SCALE / 9.0;
const S3: f64 = PI / 2.0 * 3.0;
const S4: f64 = TRIANGLE_SCALE / 25.0;
const S5: f64 = PI / 2.0 * 5.0;

// Antiderivative amplitudes: S0 / S1, S2 / S3, S4 / S5
const S6: f64 = TRIANGLE_SCALE * 2.0 / PI;
const S7: f64 = TRIANGLE_SCALE * 2.0 / (27.0 * PI);
const S8: f64 = TRIANGLE_SCALE * 2.0 / (125.0 * PI);

/// Phase offset of whole periods keeping the sine arguments positive
/// over the folding range
fn trig_offset() -> f64 {
    2.0 * PI * (FOLD_MAX * S5).ceil()
}

/// The wavefolder's transfer function
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wavefolder {
    offset: f64,
}

impl Wavefolder {
    pub fn new() -> Self {
        Self {
            offset: trig_offset(),
        }
    }

    /// Validate a folding amount (the input range the shaper is driven over)
    pub fn check_folding(folding: f64) -> Result<f64, ShaperError> {
        if folding > FOLD_MIN && folding <= FOLD_MAX {
            Ok(folding)
        } else {
            Err(ShaperError::InvalidFolding(folding))
        }
    }
}

impl Default for Wavefolder {
    fn default() -> Self {
        Self::new()
    }
}

impl TransferFunction for Wavefolder {
    fn value(&self, x: f64) -> f64 {
        let o = self.offset;
        S0 * (S1 * x + o).sin() - S2 * (S3 * x + o).sin() + S4 * (S5 * x + o).sin()
    }

    fn antiderivative(&self, x: f64) -> f64 {
        let o = self.offset;
        -S6 * (S1 * x + o).cos() + S7 * (S3 * x + o).cos() - S8 * (S5 * x + o).cos()
    }
}
