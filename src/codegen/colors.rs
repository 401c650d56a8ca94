//! Controller highlight colors for the GUI
//!
//! Each controller kind has a text color; its background is the same color
//! darkened by a fixed factor.

use std::fmt::Write;

pub const DARKEN_FACTOR: f64 = 0.57;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Scale every channel by [`DARKEN_FACTOR`], rounding half up
    ///
    /// # Example
    /// ```
    /// use synthgen::codegen::colors::Rgb;
    ///
    /// assert_eq!(Rgb(255, 255, 120).darken(), Rgb(145, 145, 68));
    /// ```
    pub fn darken(self) -> Rgb {
        let scale = |c: u8| (c as f64 * DARKEN_FACTOR + 0.5).floor() as u8;
        Rgb(scale(self.0), scale(self.1), scale(self.2))
    }
}

pub const CONTROLLER_COLORS: [(&str, Rgb); 7] = [
    ("CTL_COLOR_MIDI_CC", Rgb(255, 255, 120)),
    ("CTL_COLOR_MIDI_SPECIAL", Rgb(255, 220, 150)),
    ("CTL_COLOR_MIDI_LEARN", Rgb(90, 120, 230)),
    ("CTL_COLOR_AFTERTOUCH", Rgb(255, 160, 110)),
    ("CTL_COLOR_MACRO", Rgb(110, 190, 255)),
    ("CTL_COLOR_LFO", Rgb(230, 100, 255)),
    ("CTL_COLOR_ENVELOPE", Rgb(110, 255, 150)),
];

/// `GUI::Color` definitions for a color table, a blank line after each pair
pub fn render(colors: &[(&str, Rgb)]) -> String {
    let mut out = String::new();
    for (name, text) in colors {
        let bg = text.darken();
        let _ = writeln!(
            out,
            "const GUI::Color GUI::{}_TEXT = GUI::rgb({}, {}, {});",
            name, text.0, text.1, text.2
        );
        let _ = writeln!(
            out,
            "const GUI::Color GUI::{}_BG = GUI::rgb({}, {}, {});",
            name, bg.0, bg.1, bg.2
        );
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_darken_rounding() {
        assert_eq!(Rgb(0, 1, 255).darken(), Rgb(0, 1, 145));
        // 90 * 0.57 = 51.3, 230 * 0.57 = 131.1
        assert_eq!(Rgb(90, 120, 230).darken(), Rgb(51, 68, 131));
        // 110 * 0.57 = 62.7
        assert_eq!(Rgb(110, 110, 110).darken(), Rgb(63, 63, 63));
    }

    #[test]
    fn test_render_controller_colors() {
        let code = render(&CONTROLLER_COLORS);
        let lines: Vec<&str> = code.lines().collect();
        assert_eq!(lines.len(), 21);
        assert_eq!(
            lines[0],
            "const GUI::Color GUI::CTL_COLOR_MIDI_CC_TEXT = GUI::rgb(255, 255, 120);"
        );
        assert_eq!(
            lines[1],
            "const GUI::Color GUI::CTL_COLOR_MIDI_CC_BG = GUI::rgb(145, 145, 68);"
        );
        assert_eq!(lines[2], "");
        assert!(code.ends_with("GUI::CTL_COLOR_ENVELOPE_BG = GUI::rgb(63, 145, 85);\n\n"));
    }
}
