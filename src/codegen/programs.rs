//! Built-in program bank
//!
//! Turns a directory of preset files into the C++ array of built-in
//! programs, keeping the order of the previously generated file stable so
//! that program numbers don't shift when presets are added.

use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::GENERATED_WARNING;

/// Longest program name a plugin host is guaranteed to display
pub const MAX_PROGRAM_NAME_LEN: usize = 24;

pub const PRESET_EXTENSION: &str = "js80p";
pub const BLANK_PRESET_FILE_NAME: &str = "blank.js80p";
pub const BLANK_PRESET_NAME: &str = "Blank";

pub const TEMPLATE_FILE_NAME: &str = "programs_tpl.cpp";
pub const OUTPUT_FILE_NAME: &str = "programs.cpp";
pub const BANK_HEADER_FILE_NAME: &str = "bank.hpp";

const INDENT_PROGRAM: &str = "    ";
const INDENT_PROGRAM_BODY: &str = "        ";
const INDENT_PROGRAM_BODY_CONT: &str = "            ";
const PROGRAM_START: &str = "Program(";

const TOKEN_WARNING: &str = "/* WARNING */";
const TOKEN_NUMBER_OF_PROGRAMS: &str = "/* NUMBER_OF_BUILT_IN_PROGRAMS */";
const TOKEN_PROGRAMS: &str = "/* PROGRAMS */";

static NUMBER_OF_PROGRAMS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^ *static +.* +NUMBER_OF_PROGRAMS *= *([0-9]+) *;").unwrap()
});

#[derive(Debug, Error)]
pub enum ProgramsError {
    #[error("Cannot find {what} directory: {path:?}")]
    MissingDirectory { what: &'static str, path: PathBuf },
    #[error("Cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{:?} preset not found in {:?}", BLANK_PRESET_FILE_NAME, .0)]
    MissingBlankPreset(PathBuf),
    #[error("Non-unique program names: {first} vs {second}")]
    DuplicateName { first: String, second: String },
    #[error("Name too long; preset_name={:?}, length={}, max_length={}", .name, .len, MAX_PROGRAM_NAME_LEN)]
    NameTooLong { name: String, len: usize },
    #[error("Cannot find NUMBER_OF_PROGRAMS in {}", BANK_HEADER_FILE_NAME)]
    MissingProgramCount,
}

fn read(path: &Path) -> Result<String, ProgramsError> {
    fs::read_to_string(path).map_err(|source| ProgramsError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Like [`read`], but a missing file is `None`
fn read_optional(path: &Path) -> Result<Option<String>, ProgramsError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ProgramsError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// A parsed preset file
#[derive(Debug, Clone, PartialEq)]
pub struct Preset {
    pub file_name: String,
    pub program_name: String,
    /// Parameter lines, trimmed
    pub lines: Vec<String>,
    /// Comment lines with the leading `;` markers removed
    pub comments: Vec<String>,
}

impl Preset {
    /// Split preset text into parameter lines and comments
    ///
    /// Blank lines and lines starting with `;` are comments.
    pub fn parse(file_name: &str, program_name: &str, text: &str) -> Self {
        let mut lines = Vec::new();
        let mut comments = Vec::new();
        for line in text.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with(';') {
                comments.push(line.trim_start_matches([';', ' ']).trim().to_string());
            } else {
                lines.push(trimmed.to_string());
            }
        }
        Self {
            file_name: file_name.to_string(),
            program_name: program_name.to_string(),
            lines,
            comments,
        }
    }

    pub fn load(path: &Path, program_name: &str) -> Result<Self, ProgramsError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::parse(&file_name, program_name, &read(path)?))
    }

    /// Anchor of the preset's README section
    pub fn anchor(&self) -> String {
        let stem = self
            .file_name
            .strip_suffix(".js80p")
            .unwrap_or(&self.file_name);
        format!("preset-{}", stem.replace('_', "-"))
    }
}

/// Upper-case every letter that follows a non-letter, lower-case the rest
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_letter = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

/// Derive the display name of a preset from its file name
///
/// # Example
/// ```
/// use synthgen::codegen::programs::program_name_from_file_name;
///
/// assert_eq!(program_name_from_file_name("fm_bells.js80p"), "FM Bells");
/// assert_eq!(program_name_from_file_name("demo-lo-fi_piano.js80p"), "Demo Lo-fi Piano");
/// ```
pub fn program_name_from_file_name(file_name: &str) -> String {
    let stem = file_name
        .rsplit_once('.')
        .map_or(file_name, |(stem, _)| stem);
    let name = stem.replace('_', " ").replace("demo-", "demo ");
    title_case(&name)
        .replace("Fm ", "FM ")
        .replace(" At", " AT")
        .replace("Lo-Fi ", "Lo-fi ")
        .replace(" Mod", " mod")
}

/// Program names in the order they appear in a previously generated file
///
/// A program's name is on the line following `Program(`.
pub fn existing_program_order(programs_cpp: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut next_line_is_name = false;
    for line in programs_cpp.lines() {
        if next_line_is_name {
            let literal = line.trim_matches(|c| matches!(c, '\r' | '\n' | ' ' | ','));
            let name = literal
                .strip_prefix('"')
                .and_then(|l| l.strip_suffix('"'))
                .unwrap_or(literal);
            names.push(unescape_cpp(name));
            next_line_is_name = false;
        } else if line.trim().ends_with(PROGRAM_START) {
            next_line_is_name = true;
        }
    }
    names
}

/// Order presets: blank first, then the existing order, then new ones by file name
///
/// # Arguments
/// * `presets` - Every preset except the blank one
/// * `blank` - The blank preset
/// * `existing_order` - Program names from the previously generated file
pub fn order_presets(
    mut presets: Vec<Preset>,
    blank: Preset,
    existing_order: &[String],
) -> Result<Vec<Preset>, ProgramsError> {
    presets.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    let mut by_name: HashMap<&str, usize> = HashMap::new();
    for (i, p) in presets.iter().enumerate() {
        if let Some(&j) = by_name.get(p.program_name.as_str()) {
            return Err(ProgramsError::DuplicateName {
                first: presets[j].file_name.clone(),
                second: p.file_name.clone(),
            });
        }
        by_name.insert(p.program_name.as_str(), i);
    }

    let existing: HashSet<&str> = existing_order.iter().map(String::as_str).collect();
    let mut order = Vec::new();
    let mut placed = HashSet::new();
    for name in existing_order {
        if let Some(&i) = by_name.get(name.as_str()) {
            if placed.insert(i) {
                order.push(i);
            }
        }
    }
    for (i, p) in presets.iter().enumerate() {
        if !existing.contains(p.program_name.as_str()) {
            order.push(i);
        }
    }

    let mut slots: Vec<Option<Preset>> = presets.into_iter().map(Some).collect();
    let mut ordered = vec![blank];
    ordered.extend(order.into_iter().filter_map(|i| slots[i].take()));
    Ok(ordered)
}

/// Read every preset in `presets_dir` and order them
pub fn collect_presets(
    presets_dir: &Path,
    existing_programs_cpp: Option<&str>,
) -> Result<Vec<Preset>, ProgramsError> {
    let entries = fs::read_dir(presets_dir).map_err(|source| ProgramsError::Io {
        path: presets_dir.to_path_buf(),
        source,
    })?;

    let mut blank = None;
    let mut presets = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|source| ProgramsError::Io {
                path: presets_dir.to_path_buf(),
                source,
            })?
            .path();
        if path.extension().and_then(|e| e.to_str()) != Some(PRESET_EXTENSION) {
            continue;
        }
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if file_name == BLANK_PRESET_FILE_NAME {
            blank = Some(Preset::load(&path, BLANK_PRESET_NAME)?);
        } else {
            presets.push(Preset::load(&path, &program_name_from_file_name(&file_name))?);
        }
    }

    let blank = blank.ok_or_else(|| ProgramsError::MissingBlankPreset(presets_dir.to_path_buf()))?;
    let existing = existing_programs_cpp
        .map(existing_program_order)
        .unwrap_or_default();
    debug!(presets = presets.len(), existing = existing.len(), "collected presets");
    order_presets(presets, blank, &existing)
}

/// Read the bank size from the bank header
pub fn number_of_programs(bank_header: &str) -> Result<usize, ProgramsError> {
    NUMBER_OF_PROGRAMS_RE
        .captures(bank_header)
        .and_then(|c| c[1].parse().ok())
        .ok_or(ProgramsError::MissingProgramCount)
}

fn escape_cpp(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn unescape_cpp(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.extend(chars.next()),
            c => out.push(c),
        }
    }
    out
}

/// Quote a preset line as a C++ string literal ending in a newline escape
pub fn cpp_string_literal(line: &str) -> String {
    format!("\"{}\\n\"", escape_cpp(line))
}

/// Render one `Program(...)` initializer per preset, at most `limit` of them
pub fn render_programs(presets: &[Preset], limit: usize) -> Result<Vec<String>, ProgramsError> {
    if presets.len() > limit {
        warn!(
            presets = presets.len(),
            limit, "more presets than program slots, dropping the rest"
        );
    }
    presets
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, preset)| {
            let len = preset.program_name.chars().count();
            if len > MAX_PROGRAM_NAME_LEN {
                return Err(ProgramsError::NameTooLong {
                    name: preset.program_name.clone(),
                    len,
                });
            }
            let mut lines = vec![
                String::new(),
                format!("{}{}", INDENT_PROGRAM, PROGRAM_START),
                format!("{}\"{}\",", INDENT_PROGRAM_BODY, escape_cpp(&preset.program_name)),
                format!("{}\"Prog{:03}\",", INDENT_PROGRAM_BODY, i + 1),
                format!("{}(", INDENT_PROGRAM_BODY),
            ];
            lines.extend(
                preset
                    .lines
                    .iter()
                    .map(|l| format!("{}{}", INDENT_PROGRAM_BODY_CONT, cpp_string_literal(l))),
            );
            lines.push(format!("{})", INDENT_PROGRAM_BODY));
            lines.push(format!("{}),", INDENT_PROGRAM));
            Ok(lines.join("\n"))
        })
        .collect()
}

/// Fill the placeholders of the programs template
pub fn splice_template(template: &str, programs: &[String]) -> String {
    let mut out = template
        .replace(TOKEN_WARNING, GENERATED_WARNING)
        .replace(TOKEN_NUMBER_OF_PROGRAMS, &programs.len().to_string())
        .replace(TOKEN_PROGRAMS, &programs.join("\n"));
    out.push('\n');
    out
}

/// README table of contents and per-preset sections
pub fn readme_fragments(presets: &[Preset]) -> String {
    let mut toc = Vec::new();
    let mut sections = Vec::new();
    for preset in presets {
        let anchor = preset.anchor();
        toc.push(format!("    * [{}](#{})", preset.program_name, anchor));
        sections.push(format!(
            "\n<a id=\"{}\"></a>\n\n### {}\n",
            anchor, preset.program_name
        ));
        sections.push(preset.comments.join("\n"));
    }
    format!("{}\n{}\n", toc.join("\n"), sections.join("\n"))
}

/// Everything produced by one run
#[derive(Debug, Clone, PartialEq)]
pub struct Bank {
    pub programs_cpp: String,
    pub readme: String,
    pub programs: usize,
}

/// Generate the bank from a presets directory and the C++ source directory
///
/// Reads the template, the bank header and (if present) the previously
/// generated output from `src_dir`. Nothing is written.
pub fn generate(presets_dir: &Path, src_dir: &Path) -> Result<Bank, ProgramsError> {
    if !presets_dir.is_dir() {
        return Err(ProgramsError::MissingDirectory {
            what: "presets",
            path: presets_dir.to_path_buf(),
        });
    }
    if !src_dir.is_dir() {
        return Err(ProgramsError::MissingDirectory {
            what: "src",
            path: src_dir.to_path_buf(),
        });
    }

    let template = read(&src_dir.join(TEMPLATE_FILE_NAME))?;
    let limit = number_of_programs(&read(&src_dir.join(BANK_HEADER_FILE_NAME))?)?;
    let existing = read_optional(&src_dir.join(OUTPUT_FILE_NAME))?;

    let presets = collect_presets(presets_dir, existing.as_deref())?;
    let programs = render_programs(&presets, limit)?;
    info!(programs = programs.len(), limit, "generated program bank");

    Ok(Bank {
        programs_cpp: splice_template(&template, &programs),
        readme: readme_fragments(&presets[..programs.len()]),
        programs: programs.len(),
    })
}
