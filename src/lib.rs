//! Offline generators for a synthesizer plugin.
//!
//! Everything here runs once, at development time, and writes either C++
//! source fragments or small raster assets that the plugin build consumes:
//!
//! - [`spline`]: piecewise polynomial transfer curves solved from junction
//!   constraints, with their antiderivatives
//! - [`shaper`]: closed-form transfer functions (tanh, wavefolder) sharing the
//!   [`shaper::TransferFunction`] interface with the solved curves
//! - [`codegen`]: parameter ids, hash search, preset bank, colors, MIDI notes
//! - [`raster`]: sprite sheets for knobs, screws and shape previews
//! - [`plot`]: SVG diagnostic charts

pub mod cli;
pub mod codegen;
pub mod logging;
pub mod plot;
pub mod raster;
pub mod shaper;
pub mod spline;
