//! Plausibility checks on a finished table.
//!
//! Nothing here runs during a parse. Callers run [`validate`] on a table
//! when they want a list of suspicious records.

use std::fmt;

use serde::Serialize;

use crate::model::{ResultTable, UNKNOWN_ENTITY};

/// Product-form abbreviations and their expansions, including common OCR
/// misreads that survive normalization.
pub const ACRONYMS: &[(&str, &str)] = &[
    ("D/H-On", "Dressed/Head-On"),
    ("D/H-Off", "Dressed/Head-Off"),
    ("S/B", "Skinless/Boneless"),
    ("SIB", "Skinless/Boneless"),
    ("sp.", "species"),
    ("O/H-On", "Dressed/Head-On"),
    ("O/H-Off", "Dressed/Head-Off"),
    ("DIH-On", "Dressed/Head-On"),
    ("DIH-Off", "Dressed/Head-Off"),
];

/// Expand every known abbreviation in a product label.
///
/// Abbreviations only match as whole words: the characters on either side
/// must not be alphanumeric, so `Crisp.` keeps its `sp.`. Longer
/// abbreviations are tried first so `D/H-Off` is not read as `D/H-On` plus a
/// suffix.
pub fn expand_acronym(label: &str) -> String {
    let mut acronyms: Vec<&(&str, &str)> = ACRONYMS.iter().collect();
    acronyms.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

    let mut out = String::with_capacity(label.len());
    let mut rest = label;
    let mut prev: Option<char> = None;
    'outer: while !rest.is_empty() {
        if !prev.is_some_and(char::is_alphanumeric) {
            for (short, long) in &acronyms {
                let Some(tail) = rest.strip_prefix(short) else {
                    continue;
                };
                if tail.chars().next().is_some_and(char::is_alphanumeric) {
                    continue;
                }
                out.push_str(long);
                prev = short.chars().last();
                rest = tail;
                continue 'outer;
            }
        }
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            out.push(c);
            prev = Some(c);
        }
        rest = chars.as_str();
    }
    out
}

/// A suspicious record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum ValidationIssue {
    /// Yield above 100 percent
    YieldOutOfBounds {
        /// Entity key
        entity: String,
        /// Product label
        description: String,
        /// The yield
        value: u32,
    },
    /// Range with low above high
    InvertedRange {
        /// Entity key
        entity: String,
        /// Product label
        description: String,
        /// Lower bound
        low: u32,
        /// Upper bound
        high: u32,
    },
    /// Yield outside its own range
    YieldOutsideRange {
        /// Entity key
        entity: String,
        /// Product label
        description: String,
        /// The yield
        value: u32,
        /// Lower bound
        low: u32,
        /// Upper bound
        high: u32,
    },
    /// Records were stored under the placeholder entity
    UnknownEntity {
        /// How many
        records: usize,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::YieldOutOfBounds {
                entity,
                description,
                value,
            } => write!(f, "{} / {}: yield {} exceeds 100", entity, description, value),
            ValidationIssue::InvertedRange {
                entity,
                description,
                low,
                high,
            } => write!(f, "{} / {}: range {}-{} is inverted", entity, description, low, high),
            ValidationIssue::YieldOutsideRange {
                entity,
                description,
                value,
                low,
                high,
            } => write!(
                f,
                "{} / {}: yield {} is outside {}-{}",
                entity, description, value, low, high
            ),
            ValidationIssue::UnknownEntity { records } => {
                write!(f, "{} record(s) have no known entity", records)
            }
        }
    }
}

/// Issues found in a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Records checked
    pub checked: usize,
    /// Issues, in table order
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Check if no issues were found.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Check every record in `table`.
pub fn validate(table: &ResultTable) -> ValidationReport {
    let mut report = ValidationReport::default();

    for record in table.records() {
        report.checked += 1;
        let entity = record.entity.key().to_string();
        let description = record.description.clone();

        if record.yield_value > 100 {
            report.issues.push(ValidationIssue::YieldOutOfBounds {
                entity: entity.clone(),
                description: description.clone(),
                value: record.yield_value,
            });
        }

        if let Some(range) = record.range {
            if range.low > range.high {
                report.issues.push(ValidationIssue::InvertedRange {
                    entity,
                    description,
                    low: range.low,
                    high: range.high,
                });
            } else if !range.contains(record.yield_value) {
                report.issues.push(ValidationIssue::YieldOutsideRange {
                    entity,
                    description,
                    value: record.yield_value,
                    low: range.low,
                    high: range.high,
                });
            }
        }
    }

    if let Some(unknown) = table.entity(UNKNOWN_ENTITY) {
        report.issues.push(ValidationIssue::UnknownEntity {
            records: unknown.len(),
        });
    }

    log::debug!(
        "Validated {} records, {} issue(s)",
        report.checked,
        report.issues.len()
    );
    report
}
