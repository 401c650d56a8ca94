//! C++ constant blocks for solved curves

use super::curve::{PiecewiseCurve, Segment};
use std::fmt::Write;

fn coefficient_list(segment: &Segment) -> String {
    let values: Vec<String> = segment
        .poly
        .coefficients()
        .iter()
        .map(|c| format!("{:?}", c))
        .collect();
    values.join(", ")
}

/// Render `curve` as a block of `constexpr` arrays
///
/// Coefficients are ascending, one array per segment for the curve and for
/// its antiderivative, named `<PREFIX>_F<i>` and `<PREFIX>_F<i>_INT`.
///
/// # Arguments
/// * `prefix` - Upper case identifier prefix, e.g. `DELAY_FEEDBACK`
/// * `curve` - The solved curve
///
/// # Example
/// ```
/// use synthgen::spline::{delay_feedback, export::cpp_constants};
///
/// let curve = delay_feedback(0.0).unwrap();
/// let code = cpp_constants("DELAY_FEEDBACK", &curve);
/// assert!(code.contains("constexpr Number DELAY_FEEDBACK_CEILING = 3.0;"));
/// ```
pub fn cpp_constants(prefix: &str, curve: &PiecewiseCurve) -> String {
    let mut out = String::new();
    let segments = curve.segments();
    let integrals = curve.antiderivative_segments();

    // Writing into a String cannot fail
    let _ = writeln!(
        out,
        "// {} segments, saturates at {:?}",
        segments.len(),
        curve.ceiling()
    );
    let _ = writeln!(out, "constexpr Number {}_CEILING = {:?};", prefix, curve.ceiling());
    let _ = writeln!(
        out,
        "constexpr Number {}_SATURATION = {:?};",
        prefix,
        curve.saturation()
    );
    let starts: Vec<String> = segments.iter().map(|s| format!("{:?}", s.start)).collect();
    let _ = writeln!(
        out,
        "constexpr Number {}_STARTS[{}] = {{{}}};",
        prefix,
        segments.len(),
        starts.join(", ")
    );

    for (i, (segment, integral)) in segments.iter().zip(integrals).enumerate() {
        let _ = writeln!(out);
        let _ = writeln!(out, "// f{}(x) = {}", i, segment.poly);
        let _ = writeln!(
            out,
            "constexpr Number {}_F{}[{}] = {{{}}};",
            prefix,
            i,
            segment.poly.coefficients().len(),
            coefficient_list(segment)
        );
        let _ = writeln!(
            out,
            "constexpr Number {}_F{}_INT[{}] = {{{}}};",
            prefix,
            i,
            integral.poly.coefficients().len(),
            coefficient_list(integral)
        );
    }

    out
}
