//! Per-parse diagnostic counters.

use serde::{Deserialize, Serialize};

use super::builder::SkipReason;
use super::classify::NoiseKind;

/// Counts collected during a parse.
///
/// None of these conditions stop the parse; they are exposed so callers can
/// see how much of the input was dropped and why.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseStats {
    /// Lines consumed
    pub lines: u32,

    /// Blank lines
    pub blank_lines: u32,

    /// Page-break markers
    pub page_breaks: u32,

    /// Banner lines
    pub banner_lines: u32,

    /// Header lines that changed the column context
    pub headers: u32,

    /// Dual-column lines that produced records
    pub dual_lines: u32,

    /// Single-column lines that produced a record
    pub single_lines: u32,

    /// Records written to the table
    pub records: u32,

    /// Records that replaced an earlier one with the same key
    pub overwritten: u32,

    /// Records stored under the `Unknown` entity
    pub unknown_entity: u32,

    /// Lines matching no rule
    pub malformed: u32,

    /// Single-column lines dropped as low-confidence
    pub ambiguous: u32,

    /// Data lines dropped because a number did not parse
    pub numeric_failures: u32,
}

impl ParseStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a noise line.
    pub fn add_noise(&mut self, kind: NoiseKind) {
        match kind {
            NoiseKind::Blank => self.blank_lines += 1,
            NoiseKind::PageBreak { .. } => self.page_breaks += 1,
            NoiseKind::Banner => self.banner_lines += 1,
        }
    }

    /// Count a dropped line.
    pub fn add_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::Malformed => self.malformed += 1,
            SkipReason::Ambiguous => self.ambiguous += 1,
            SkipReason::NumericParse => self.numeric_failures += 1,
        }
    }

    /// Total lines dropped for any reason other than noise.
    pub fn skipped(&self) -> u32 {
        self.malformed + self.ambiguous + self.numeric_failures
    }

    /// Total noise lines.
    pub fn noise(&self) -> u32 {
        self.blank_lines + self.page_breaks + self.banner_lines
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &ParseStats) {
        self.lines += other.lines;
        self.blank_lines += other.blank_lines;
        self.page_breaks += other.page_breaks;
        self.banner_lines += other.banner_lines;
        self.headers += other.headers;
        self.dual_lines += other.dual_lines;
        self.single_lines += other.single_lines;
        self.records += other.records;
        self.overwritten += other.overwritten;
        self.unknown_entity += other.unknown_entity;
        self.malformed += other.malformed;
        self.ambiguous += other.ambiguous;
        self.numeric_failures += other.numeric_failures;
    }
}
