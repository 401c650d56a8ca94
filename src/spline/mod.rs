//! Smooth transfer-function solver
//!
//! Builds odd-symmetric, saturating waveshaper curves out of polynomial
//! pieces whose coefficients come from a linear solve, and derives the
//! matching antiderivatives for antiderivative anti-aliasing.

pub mod curve;
pub mod export;
pub mod linalg;
pub mod polynomial;
pub mod presets;

pub use curve::{Constraint, CurveBuilder, CurveError, PiecewiseCurve, Segment};
pub use linalg::{solve, Matrix, SolveError};
pub use polynomial::Polynomial;
pub use presets::{
    check_delay_feedback, delay_feedback, soft_knee, ConsistencyError, DelayFeedbackClosedForm,
    PresetError, Smoothness, SoftKnee,
};
