//! C++ source generators
//!
//! Every generator is a pure function from a fixed table (or a directory of
//! presets) to a block of C++ text, so that regenerating an unchanged input
//! gives a byte-identical file.

pub mod colors;
pub mod hash_search;
pub mod midi_notes;
pub mod param_ids;
pub mod programs;

/// Prepended to generated files that must not be edited by hand
pub const GENERATED_WARNING: &str = "\
/*
 * WARNING: this file was generated, do not edit it by hand. Edit the
 *          template or the presets instead, then regenerate it.
 */";
