//! MIDI note number constants

use std::fmt::Write;

/// Note names by `(note + 3) % 12`, with enharmonic aliases for black keys
const NAMES: [&[&str]; 12] = [
    &["A"],
    &["A_SHARP", "B_FLAT"],
    &["B"],
    &["C"],
    &["C_SHARP", "D_FLAT"],
    &["D"],
    &["D_SHARP", "E_FLAT"],
    &["E"],
    &["F"],
    &["F_SHARP", "G_FLAT"],
    &["G"],
    &["G_SHARP", "A_FLAT"],
];

/// Lowest note that gets named constants (A0)
pub const LOWEST_NAMED_NOTE: u8 = 21;

/// Names of a MIDI note, e.g. `["C_SHARP_4", "D_FLAT_4"]` for 61
///
/// # Example
/// ```
/// use synthgen::codegen::midi_notes::note_names;
///
/// assert_eq!(note_names(60), vec!["C_4"]);
/// assert_eq!(note_names(61), vec!["C_SHARP_4", "D_FLAT_4"]);
/// ```
pub fn note_names(note: u8) -> Vec<String> {
    let octave = note as i32 / 12 - 1;
    NAMES[(note as usize + 3) % 12]
        .iter()
        .map(|name| format!("{}_{}", name, octave))
        .collect()
}

/// Named constants from 127 down to A0, a blank line, then numbered
/// constants from 127 down to 0
pub fn render() -> String {
    let mut out = String::new();
    for note in (LOWEST_NAMED_NOTE..=127).rev() {
        for name in note_names(note) {
            let _ = writeln!(out, "Note const NOTE_{:<31} = {};", name, note);
        }
    }
    out.push('\n');
    for note in (0..=127u8).rev() {
        let _ = writeln!(out, "Note const NOTE_{:<31} = {};", note, note);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_names() {
        assert_eq!(note_names(21), vec!["A_0"]);
        assert_eq!(note_names(69), vec!["A_4"]);
        assert_eq!(note_names(70), vec!["A_SHARP_4", "B_FLAT_4"]);
        assert_eq!(note_names(127), vec!["G_9"]);
        assert_eq!(note_names(0), vec!["C_-1"]);
    }

    #[test]
    fn test_render_layout() {
        let code = render();
        let (named, numbered) = code.split_once("\n\n").unwrap();
        let named: Vec<&str> = named.lines().collect();
        // 107 notes, 44 of which are black keys with two names
        assert_eq!(named.len(), 107 + 44);
        assert_eq!(named[0], format!("Note const NOTE_{:<31} = 127;", "G_9"));
        assert_eq!(named[1], format!("Note const NOTE_{:<31} = 126;", "F_SHARP_9"));
        assert_eq!(named[2], format!("Note const NOTE_{:<31} = 126;", "G_FLAT_9"));
        assert_eq!(*named.last().unwrap(), format!("Note const NOTE_{:<31} = 21;", "A_0"));

        let numbered: Vec<&str> = numbered.lines().collect();
        assert_eq!(numbered.len(), 128);
        assert_eq!(numbered[0], format!("Note const NOTE_{:<31} = 127;", "127"));
        assert_eq!(numbered[127], format!("Note const NOTE_{:<31} = 0;", "0"));
    }
}
