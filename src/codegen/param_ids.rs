//! `ParamId` enum and accessor `switch` cases
//!
//! The parameter table is data: a list of groups, each instantiating its
//! parameter templates for a number of objects. Ids are assigned
//! contiguously in table order starting from 0.

use serde::Deserialize;
use std::collections::HashSet;
use std::fmt::Write;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// The synthesizer's own parameter table
pub const BUILT_IN_TABLE: &str = include_str!("../../data/param_table.json");

const INDENTATION: &str = "            ";
const CASE_INDENTATION: &str = "        ";
const COMMENT_COLUMN: usize = 6;
const RULE: &str = "/******************************************************************************/";

/// Accessor templates, `$` stands for the parameter's field
pub const CASE_TEMPLATES: [&str; 5] = [
    "return $.get_default_ratio();",
    "return $.get_max_value();",
    "return $.ratio_to_value(ratio);",
    "$.set_ratio(ratio); break;",
    "return $.get_ratio();",
];

#[derive(Debug, Error)]
pub enum TableError {
    #[error("Cannot read parameter table: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid parameter table: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Duplicate parameter name: {0}")]
    DuplicateName(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParamTable {
    pub groups: Vec<ParamGroup>,
}

/// Parameters repeated for `objects` instances
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParamGroup {
    /// Human readable group name, substituted for `$` in comments
    pub group: String,
    /// Identifier prefix, substituted for `$` in names
    pub prefix: String,
    pub objects: usize,
    pub params: Vec<ParamTemplate>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParamTemplate {
    /// Identifier template; `$` is the prefix, `#` the 1-based object index
    pub name: String,
    /// Comment template; `$` is the group name, `#` the 1-based object index
    pub comment: String,
    /// C++ expression of the parameter object, empty if it has no accessors
    #[serde(default)]
    pub field: String,
    /// Spaces before the comment, overriding the width derived from `name`
    #[serde(default)]
    pub padding: Option<usize>,
}

/// One row of the generated enum
#[derive(Debug, Clone, PartialEq)]
pub struct ParamEntry {
    pub id: usize,
    pub name: String,
    pub comment: String,
    pub field: String,
    /// Spaces between the id column and the comment
    pub padding: usize,
}

impl ParamTable {
    /// Parse a table from JSON text
    pub fn from_json(json: &str) -> Result<Self, TableError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a table from a JSON file
    pub fn load(path: &Path) -> Result<Self, TableError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn built_in() -> Result<Self, TableError> {
        Self::from_json(BUILT_IN_TABLE)
    }

    /// Load `path` if given, otherwise fall back to the built-in table
    pub fn load_or_built_in(path: Option<&Path>) -> Result<Self, TableError> {
        match path {
            Some(path) => Self::load(path),
            None => Self::built_in(),
        }
    }

    /// Expand all groups into numbered entries, objects separated into chunks
    pub fn objects(&self) -> Vec<Vec<ParamEntry>> {
        let mut id = 0;
        let mut objects = Vec::new();
        for group in &self.groups {
            for obj in 1..=group.objects {
                let index = obj.to_string();
                let entries = group
                    .params
                    .iter()
                    .map(|p| {
                        let entry = ParamEntry {
                            id,
                            name: p.name.replace('#', &index).replace('$', &group.prefix),
                            comment: p.comment.replace('#', &index).replace('$', &group.group),
                            field: p.field.clone(),
                            padding: p
                                .padding
                                .unwrap_or_else(|| COMMENT_COLUMN.saturating_sub(p.name.chars().count())),
                        };
                        id += 1;
                        entry
                    })
                    .collect();
                objects.push(entries);
            }
        }
        objects
    }

    /// All entries in id order, rejecting duplicate names
    pub fn entries(&self) -> Result<Vec<ParamEntry>, TableError> {
        let entries: Vec<ParamEntry> = self.objects().into_iter().flatten().collect();
        let mut seen = HashSet::new();
        for e in &entries {
            if !seen.insert(e.name.as_str()) {
                return Err(TableError::DuplicateName(e.name.clone()));
            }
        }
        Ok(entries)
    }

    /// Generated parameter names in id order
    pub fn names(&self) -> Result<Vec<String>, TableError> {
        Ok(self.entries()?.into_iter().map(|e| e.name).collect())
    }
}

fn enum_line(entry: &ParamEntry) -> String {
    let mut spaces = String::from("   ");
    if entry.id < 100 {
        spaces.push(' ');
    }
    if entry.id < 10 {
        spaces.push(' ');
    }
    let padding = " ".repeat(entry.padding);
    format!(
        "{}{} = {}, {}{}///< {}",
        INDENTATION, entry.name, entry.id, spaces, padding, entry.comment
    )
}

/// Render the enum body followed by the accessor case blocks
///
/// # Example
/// ```
/// use synthgen::codegen::param_ids::{render, ParamTable};
///
/// let table = ParamTable::from_json(r#"{"groups": [{
///     "group": "Osc", "prefix": "O", "objects": 1,
///     "params": [{"name": "$AMP", "comment": "$ Amplitude", "field": "osc.amp"}]
/// }]}"#).unwrap();
/// let code = render(&table).unwrap();
/// assert!(code.starts_with("            OAMP = 0,        ///< Osc Amplitude\n"));
/// assert!(code.contains("        case ParamId::OAMP: return osc.amp.get_ratio();\n"));
/// ```
pub fn render(table: &ParamTable) -> Result<String, TableError> {
    // Validates names before anything is written
    let count = table.entries()?.len();
    let objects = table.objects();
    let mut out = String::new();

    for object in &objects {
        for entry in object {
            let _ = writeln!(out, "{}", enum_line(entry));
        }
        out.push('\n');
    }

    let _ = writeln!(out, "{}PARAM_ID_COUNT = {},", INDENTATION, count);
    let _ = writeln!(out, "{}INVALID_PARAM_ID = PARAM_ID_COUNT,", INDENTATION);
    out.push('\n');

    let with_field: Vec<&ParamEntry> = objects
        .iter()
        .flatten()
        .filter(|e| !e.field.is_empty())
        .collect();
    for template in CASE_TEMPLATES {
        out.push('\n');
        let _ = writeln!(out, "{}", RULE);
        out.push('\n');
        for entry in &with_field {
            let _ = writeln!(
                out,
                "{}case ParamId::{}: {}",
                CASE_INDENTATION,
                entry.name,
                template.replace('$', &entry.field)
            );
        }
    }

    debug!(params = count, accessors = with_field.len(), "rendered param ids");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_built_in_table() {
        let table = ParamTable::built_in().unwrap();
        let entries = table.entries().unwrap();
        assert_eq!(entries.len(), 509);
        for (i, e) in entries.iter().enumerate() {
            assert_eq!(e.id, i);
        }
        assert_eq!(entries[0].name, "MIX");
        assert!(entries.iter().any(|e| e.name == "M20RND"));
        assert!(entries.iter().any(|e| e.name == "N12AMT"));
        assert!(entries.iter().any(|e| e.name == "L8FRQ"));
    }

    #[test]
    fn test_render_is_idempotent() {
        let table = ParamTable::built_in().unwrap();
        let first = render(&table).unwrap();
        let second = render(&table).unwrap();
        assert_eq!(first, second);
        assert!(first.contains("            PARAM_ID_COUNT = 509,\n"));
        assert!(first.contains("            INVALID_PARAM_ID = PARAM_ID_COUNT,\n"));
        assert_eq!(first.matches(RULE).count(), 5);
    }

    #[test]
    fn test_comment_alignment() {
        let table = ParamTable::built_in().unwrap();
        let code = render(&table).unwrap();
        let lines: Vec<&str> = code.lines().collect();
        assert_eq!(lines[0], "            MIX = 0,         ///< Modulator Additive Volume");
        assert_eq!(lines[1], "            PM = 1,          ///< Phase Modulation");
        // The comment column only depends on the template, not the id width
        let mamp = lines
            .iter()
            .find(|l| l.trim_start().starts_with("MAMP = "))
            .unwrap();
        assert_eq!(*mamp, "            MAMP = 4,        ///< Modulator Amplitude");
        let big = lines
            .iter()
            .find(|l| l.trim_start().starts_with("CAMP = "))
            .unwrap();
        assert_eq!(*big, "            CAMP = 35,       ///< Carrier Amplitude");
    }

    #[test]
    fn test_padding_override() {
        let table = ParamTable::built_in().unwrap();
        let code = render(&table).unwrap();
        let line = |name: &str| {
            code.lines()
                .find(|l| l.trim_start().starts_with(&format!("{} = ", name)))
                .unwrap()
                .to_string()
        };
        assert!(line("N9DYN").ends_with(",     ///< Envelope 9 Dynamic"), "{}", line("N9DYN"));
        assert!(line("N10DYN").ends_with(",     ///< Envelope 10 Dynamic"), "{}", line("N10DYN"));
        assert!(line("N12DYN").ends_with(",     ///< Envelope 12 Dynamic"), "{}", line("N12DYN"));

        let table = ParamTable::from_json(
            r#"{"groups": [{"group": "", "prefix": "", "objects": 1, "params": [
                {"name": "AB", "comment": "x", "padding": 0}
            ]}]}"#,
        )
        .unwrap();
        assert!(render(&table).unwrap().starts_with("            AB = 0,      ///< x\n"));
    }

    #[test]
    fn test_blank_line_after_each_object() {
        let table = ParamTable::from_json(
            r#"{"groups": [{"group": "LFO", "prefix": "L", "objects": 2, "params": [
                {"name": "$#FRQ", "comment": "$ # Frequency", "field": "lfos[#]->frequency"},
                {"name": "$#SYN", "comment": "$ # Tempo Sync", "field": ""}
            ]}]}"#,
        )
        .unwrap();
        let code = render(&table).unwrap();
        let expected_head = "            L1FRQ = 0,       ///< LFO 1 Frequency\n\
                             \x20           L1SYN = 1,       ///< LFO 1 Tempo Sync\n\
                             \n\
                             \x20           L2FRQ = 2,       ///< LFO 2 Frequency\n\
                             \x20           L2SYN = 3,       ///< LFO 2 Tempo Sync\n\
                             \n\
                             \x20           PARAM_ID_COUNT = 4,\n";
        assert!(code.starts_with(expected_head), "{}", code);
        // Fields are used verbatim, only `$` in the accessor is substituted
        assert!(code.contains("        case ParamId::L2FRQ: return lfos[#]->frequency.get_max_value();\n"));
        assert!(!code.contains("case ParamId::L1SYN"));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let table = ParamTable::from_json(
            r#"{"groups": [
                {"group": "", "prefix": "", "objects": 1, "params": [{"name": "X", "comment": "", "field": ""}]},
                {"group": "", "prefix": "", "objects": 1, "params": [{"name": "X", "comment": "", "field": ""}]}
            ]}"#,
        )
        .unwrap();
        assert!(matches!(render(&table), Err(TableError::DuplicateName(n)) if n == "X"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.json");
        std::fs::write(&path, BUILT_IN_TABLE).unwrap();
        assert_eq!(ParamTable::load(&path).unwrap(), ParamTable::built_in().unwrap());
        assert!(matches!(
            ParamTable::load(&dir.path().join("missing.json")),
            Err(TableError::Io(_))
        ));
        std::fs::write(&path, "{").unwrap();
        assert!(matches!(ParamTable::load(&path), Err(TableError::Parse(_))));
    }
}
