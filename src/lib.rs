//! # yieldtab
//!
//! Rebuilds a species → product → yield table from the text dump of a
//! two-column OCR'd yield report.
//!
//! The report prints two species side by side, so every text line carries
//! the left and right columns glued together. The parser normalizes OCR
//! misreads, classifies each line, tracks which species head the two
//! columns and attributes each data cell to the right one.
//!
//! ## Quick Start
//!
//! ```no_run
//! use yieldtab::{parse_file, render};
//!
//! fn main() -> yieldtab::Result<()> {
//!     let outcome = parse_file("pdf_content.txt")?;
//!
//!     let script = render::to_script(&outcome.table, &render::ScriptOptions::default())?;
//!     std::fs::write("fish_data.js", script)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **OCR correction**: fixed substitution table for known misreads
//! - **Column tracking**: left/right species context carried across pages
//! - **Diagnostics**: every dropped line is counted by reason
//! - **Output**: JSON or a `const NAME = {...};` script
//! - **Supplements**: merge spreadsheet rows into an existing table
//! - **Parallel batches**: independent dumps parsed with Rayon

pub mod error;
pub mod model;
pub mod parser;
pub mod render;
pub mod supplement;
pub mod validate;

// Re-export commonly used types
pub use error::{Error, Result};
pub use model::{ColumnContext, DataRecord, Entity, ResultTable, YieldEntry, YieldRange};
pub use parser::{
    LineOutcome, ParseOptions, ParseOutcome, ParseSession, ParseStats, RegistrySource,
    SkipReason, SpeciesRegistry, YieldParser,
};
pub use render::{JsonFormat, ScriptOptions};
pub use supplement::{merge_supplement, MergeReport, SupplementRow, SupplementValue};
pub use validate::{validate, ValidationIssue, ValidationReport};

use rayon::prelude::*;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Parse lines with default options.
///
/// # Example
///
/// ```
/// use yieldtab::parse_lines;
///
/// let outcome = parse_lines(&["Crab  Sablefish", "Meat 24 22-25 Round 100"])?;
/// assert_eq!(outcome.table.record_count(), 2);
/// # Ok::<(), yieldtab::Error>(())
/// ```
pub fn parse_lines<S: AsRef<str>>(lines: &[S]) -> Result<ParseOutcome> {
    parse_lines_with_options(lines, ParseOptions::default())
}

/// Parse lines with custom options.
pub fn parse_lines_with_options<S: AsRef<str>>(
    lines: &[S],
    options: ParseOptions,
) -> Result<ParseOutcome> {
    Ok(YieldParser::new(options)?.parse(lines))
}

/// Parse a whole text dump.
pub fn parse_text(text: &str) -> Result<ParseOutcome> {
    Ok(YieldParser::new(ParseOptions::default())?.parse_text(text))
}

/// Parse a text dump file.
///
/// # Arguments
///
/// * `path` - Path to the text dump, one report line per text line
///
/// # Example
///
/// ```no_run
/// use yieldtab::parse_file;
///
/// let outcome = parse_file("pdf_content.txt").unwrap();
/// println!("Entities: {}", outcome.table.entity_count());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<ParseOutcome> {
    parse_file_with_options(path, ParseOptions::default())
}

/// Parse a text dump file with custom options.
pub fn parse_file_with_options<P: AsRef<Path>>(
    path: P,
    options: ParseOptions,
) -> Result<ParseOutcome> {
    let file = File::open(path.as_ref())?;
    parse_reader_with_options(file, options)
}

/// Parse a text dump from a reader.
pub fn parse_reader<R: Read>(reader: R) -> Result<ParseOutcome> {
    parse_reader_with_options(reader, ParseOptions::default())
}

/// Parse a text dump from a reader with custom options.
pub fn parse_reader_with_options<R: Read>(reader: R, options: ParseOptions) -> Result<ParseOutcome> {
    let lines = read_lines(reader)?;
    log::debug!("Read {} lines", lines.len());
    parse_lines_with_options(&lines, options)
}

/// Parse several independent dumps in parallel.
///
/// Each dump is still parsed line by line on one thread. Results keep input
/// order.
///
/// # Example
///
/// ```
/// use yieldtab::{parse_batch, ParseOptions};
///
/// let docs = vec![
///     vec!["Crab  Tuna".to_string(), "Meat 24 Loins 50".to_string()],
///     vec!["Sablefish  Rockfish".to_string(), "Round 100 Round 100".to_string()],
/// ];
/// let outcomes = parse_batch(&docs, &ParseOptions::default())?;
/// assert_eq!(outcomes.len(), 2);
/// assert!(outcomes[1].table.contains_entity("Rockfish"));
/// # Ok::<(), yieldtab::Error>(())
/// ```
pub fn parse_batch(documents: &[Vec<String>], options: &ParseOptions) -> Result<Vec<ParseOutcome>> {
    let parser = YieldParser::new(options.clone())?;
    Ok(documents.par_iter().map(|lines| parser.parse(lines)).collect())
}

fn read_lines<R: Read>(reader: R) -> Result<Vec<String>> {
    BufReader::new(reader)
        .lines()
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(Error::from)
}

/// Builder for parsing and rendering yield reports.
///
/// # Example
///
/// ```no_run
/// use yieldtab::Yieldtab;
///
/// let script = Yieldtab::new()
///     .with_toc_registry()
///     .with_species("Skate")
///     .with_const_name("FISH_DATA")
///     .parse_file("pdf_content.txt")?
///     .to_script()?;
/// # Ok::<(), yieldtab::Error>(())
/// ```
pub struct Yieldtab {
    parse_options: ParseOptions,
    script_options: ScriptOptions,
}

impl Yieldtab {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            parse_options: ParseOptions::default(),
            script_options: ScriptOptions::default(),
        }
    }

    /// Replace the parse options.
    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.parse_options = options;
        self
    }

    /// Set the short-line threshold.
    pub fn with_short_line_threshold(mut self, chars: usize) -> Self {
        self.parse_options = self.parse_options.with_short_line_threshold(chars);
        self
    }

    /// Derive the species registry from the table of contents.
    pub fn with_toc_registry(mut self) -> Self {
        self.parse_options = self.parse_options.with_toc_registry();
        self
    }

    /// Add a species name.
    pub fn with_species(mut self, name: impl Into<String>) -> Self {
        self.parse_options = self.parse_options.with_species(name);
        self
    }

    /// Set the constant name for script output.
    pub fn with_const_name(mut self, name: impl Into<String>) -> Self {
        self.script_options = self.script_options.with_const_name(name);
        self
    }

    /// Stamp script output with the current time.
    pub fn with_timestamp(mut self) -> Self {
        self.script_options = self.script_options.with_timestamp();
        self
    }

    /// Parse lines and return a result wrapper.
    pub fn parse<S: AsRef<str>>(self, lines: &[S]) -> Result<YieldtabResult> {
        let outcome = parse_lines_with_options(lines, self.parse_options)?;
        Ok(YieldtabResult {
            outcome,
            script_options: self.script_options,
        })
    }

    /// Parse a text dump file.
    pub fn parse_file<P: AsRef<Path>>(self, path: P) -> Result<YieldtabResult> {
        let outcome = parse_file_with_options(path, self.parse_options)?;
        Ok(YieldtabResult {
            outcome,
            script_options: self.script_options,
        })
    }
}

impl Default for Yieldtab {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a [`Yieldtab`] parse.
pub struct YieldtabResult {
    /// The parse outcome
    pub outcome: ParseOutcome,
    /// Script options to use
    script_options: ScriptOptions,
}

impl YieldtabResult {
    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.outcome.table, format)
    }

    /// Convert to a script declaration.
    pub fn to_script(&self) -> Result<String> {
        render::to_script(&self.outcome.table, &self.script_options)
    }

    /// Get the table.
    pub fn table(&self) -> &ResultTable {
        &self.outcome.table
    }

    /// Get the diagnostic counters.
    pub fn stats(&self) -> &ParseStats {
        &self.outcome.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMP: &str = "\
--- Page 9 ---
Recoveries and Yields from Pacific Fish and Shellfish
Cod, Pacific ... Halibut, Pacific
Product Average Range Product Average Range
Round 81 72-90 Round 88 85-92
D/H-Off 62 58-66 O/H-On 90
";

    #[test]
    fn test_yieldtab_builder() {
        let builder = Yieldtab::new()
            .with_short_line_threshold(30)
            .with_species("Skate")
            .with_const_name("YIELDS");

        assert_eq!(builder.parse_options.short_line_threshold, 30);
        assert_eq!(builder.parse_options.extra_species, vec!["Skate".to_string()]);
        assert_eq!(builder.script_options.const_name, "YIELDS");
    }

    #[test]
    fn test_yieldtab_builder_default() {
        let builder = Yieldtab::default();
        assert!(matches!(builder.parse_options.registry, RegistrySource::Manual));
        assert!(builder.script_options.generated_at.is_none());
    }

    #[test]
    fn test_yieldtab_builder_toc() {
        let builder = Yieldtab::new().with_toc_registry();
        assert!(matches!(
            builder.parse_options.registry,
            RegistrySource::TableOfContents { .. }
        ));
    }

    // ==================== Convenience Functions ====================

    #[test]
    fn test_parse_text() {
        let outcome = parse_text(DUMP).unwrap();
        let halibut = outcome.table.get("Halibut, Pacific", "D/H-On").unwrap();
        assert_eq!(halibut.yield_value, 90);
        assert_eq!(halibut.range, None);
        assert_eq!(outcome.stats.page_breaks, 1);
        assert_eq!(outcome.stats.banner_lines, 1);
        assert_eq!(outcome.stats.malformed, 1);
    }

    #[test]
    fn test_parse_reader() {
        let outcome = parse_reader(DUMP.as_bytes()).unwrap();
        assert_eq!(outcome.table.record_count(), 4);
    }

    #[test]
    fn test_parse_file_missing() {
        let result = parse_file("/nonexistent/dump.txt");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_parse_lines_empty() {
        let lines: [&str; 0] = [];
        let outcome = parse_lines(&lines).unwrap();
        assert!(outcome.table.is_empty());
        assert!(outcome.context.is_unknown());
    }

    #[test]
    fn test_parse_batch_keeps_order() {
        let docs: Vec<Vec<String>> = (0..8)
            .map(|i| {
                vec![
                    "Crab  Tuna".to_string(),
                    format!("Meat {} Loins {}", i, i + 1),
                ]
            })
            .collect();

        let outcomes = parse_batch(&docs, &ParseOptions::default()).unwrap();
        for (i, outcome) in outcomes.iter().enumerate() {
            assert_eq!(outcome.table.get("Crab", "Meat").unwrap().yield_value, i as u32);
        }
    }

    // ==================== Output ====================

    #[test]
    fn test_yieldtab_result_outputs() {
        let result = Yieldtab::new()
            .with_const_name("YIELDS")
            .parse(&["Crab  Tuna", "Meat 24 Loins 50"])
            .unwrap();

        assert!(result.to_script().unwrap().starts_with("const YIELDS = {"));
        let json = result.to_json(JsonFormat::Compact).unwrap();
        assert!(json.contains(r#""Loins":{"yield":"50","range":""}"#));
        assert_eq!(result.stats().records, 2);
        assert_eq!(result.table().entity_count(), 2);
    }
}
