//! The single-pass parse driver.

use crate::error::Result;
use crate::model::{ColumnContext, ResultTable};

use super::builder::{Emission, RecordBuilder, SkipReason};
use super::classify::{LineClass, LineClassifier, NoiseKind};
use super::context::ColumnTracker;
use super::normalize::OcrNormalizer;
use super::options::{ParseOptions, RegistrySource};
use super::registry::{SpeciesRegistry, TocScanner};
use super::stats::ParseStats;

/// Parser for flattened two-column yield reports.
///
/// Lines are visited once, in order. Every attribution depends on the
/// headers seen before it, so a parse cannot be split across threads.
///
/// # Example
///
/// ```
/// use yieldtab::{ParseOptions, YieldParser};
///
/// let parser = YieldParser::new(ParseOptions::default())?;
/// let outcome = parser.parse(&[
///     "Cod, Pacific ... Halibut, Pacific",
///     "Round 81 72-90 Round 88 85-92",
/// ]);
///
/// let cod = outcome.table.get("Cod, Pacific", "Round").unwrap();
/// assert_eq!(cod.yield_value, 81);
/// # Ok::<(), yieldtab::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct YieldParser {
    options: ParseOptions,
    normalizer: OcrNormalizer,
    classifier: LineClassifier,
    toc: Option<TocScanner>,
}

impl YieldParser {
    /// Create a parser with the given options.
    pub fn new(options: ParseOptions) -> Result<Self> {
        let normalizer = OcrNormalizer::new()
            .with_unicode_nfc(options.unicode_nfc)
            .with_substitutions(options.extra_substitutions.iter().cloned());
        let classifier = LineClassifier::new(&options.banner_markers)?;
        let toc = match options.registry {
            RegistrySource::Manual => None,
            RegistrySource::TableOfContents {
                scan_lines,
                min_page,
            } => Some(TocScanner::new(scan_lines, min_page)?),
        };

        Ok(Self {
            options,
            normalizer,
            classifier,
            toc,
        })
    }

    /// The options this parser was built with.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Normalize a single line.
    pub fn normalize(&self, line: &str) -> String {
        self.normalizer.normalize(line)
    }

    /// Build the registry this parser would use for `lines`.
    pub fn registry_for<S: AsRef<str>>(&self, lines: &[S]) -> SpeciesRegistry {
        let mut registry = match &self.toc {
            None => SpeciesRegistry::manual(),
            Some(scanner) => {
                let normalized: Vec<String> = lines
                    .iter()
                    .map(|l| self.normalizer.normalize(l.as_ref()))
                    .collect();
                scanner.scan(&normalized)
            }
        };
        registry.extend(self.options.extra_species.iter().cloned());
        registry
    }

    /// Start an incremental parse against a fixed registry.
    pub fn session(&self, registry: SpeciesRegistry) -> ParseSession<'_> {
        ParseSession {
            parser: self,
            registry,
            tracker: ColumnTracker::new(),
            builder: RecordBuilder::new(self.options.short_line_threshold),
            stats: ParseStats::new(),
            page: None,
        }
    }

    /// Parse a whole dump.
    pub fn parse<S: AsRef<str>>(&self, lines: &[S]) -> ParseOutcome {
        let mut session = self.session(self.registry_for(lines));
        for line in lines {
            session.feed(line.as_ref());
        }
        session.finish()
    }

    /// Parse text holding one line per newline.
    pub fn parse_text(&self, text: &str) -> ParseOutcome {
        let lines: Vec<&str> = text.lines().collect();
        self.parse(&lines)
    }
}

/// What happened to one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// Dropped as noise
    Noise(NoiseKind),
    /// Column context changed
    Header {
        /// New left entity
        left: String,
        /// New right entity
        right: String,
    },
    /// Records were written
    Emitted(Emission),
    /// Dropped for the given reason
    Skipped(SkipReason),
}

/// An in-progress parse.
///
/// The table is consistent after every [`feed`](Self::feed), so a caller may
/// stop early and still [`finish`](Self::finish) with a usable result.
#[derive(Debug)]
pub struct ParseSession<'p> {
    parser: &'p YieldParser,
    registry: SpeciesRegistry,
    tracker: ColumnTracker,
    builder: RecordBuilder,
    stats: ParseStats,
    page: Option<u32>,
}

impl ParseSession<'_> {
    /// Consume one raw line.
    pub fn feed(&mut self, raw: &str) -> LineOutcome {
        self.stats.lines += 1;
        let normalized = self.parser.normalizer.normalize(raw.trim());
        let line = normalized.trim();

        match self.parser.classifier.classify(line, &self.registry) {
            LineClass::Noise(kind) => {
                if let NoiseKind::PageBreak { page: Some(page) } = kind {
                    self.page = Some(page);
                }
                self.stats.add_noise(kind);
                LineOutcome::Noise(kind)
            }
            LineClass::Header { left, right } => {
                self.tracker.update_from_header(left, right);
                self.stats.headers += 1;
                LineOutcome::Header {
                    left: left.to_string(),
                    right: right.to_string(),
                }
            }
            LineClass::DualData(first, second) => {
                let result = self
                    .builder
                    .emit_dual(self.tracker.current(), first, second);
                if result.is_ok() {
                    self.stats.dual_lines += 1;
                }
                self.settle(line, result)
            }
            LineClass::SingleData(cell) => {
                let result = self
                    .builder
                    .emit_single(self.tracker.current(), cell, line);
                if result.is_ok() {
                    self.stats.single_lines += 1;
                }
                self.settle(line, result)
            }
            LineClass::Unrecognized => self.settle(line, Err(SkipReason::Malformed)),
        }
    }

    fn settle(
        &mut self,
        line: &str,
        result: std::result::Result<Emission, SkipReason>,
    ) -> LineOutcome {
        match result {
            Ok(emission) => {
                self.stats.records += emission.records;
                self.stats.overwritten += emission.overwritten;
                self.stats.unknown_entity += emission.unknown_entity;
                if emission.unknown_entity > 0 {
                    log::debug!(
                        "Page {:?}: {} record(s) stored under Unknown: {:?}",
                        self.page,
                        emission.unknown_entity,
                        line
                    );
                }
                LineOutcome::Emitted(emission)
            }
            Err(reason) => {
                match reason {
                    SkipReason::NumericParse => {
                        log::warn!("Page {:?}: dropped {:?}: {}", self.page, line, reason)
                    }
                    _ => log::debug!("Page {:?}: dropped {:?}: {}", self.page, line, reason),
                }
                self.stats.add_skip(reason);
                LineOutcome::Skipped(reason)
            }
        }
    }

    /// The live column context.
    pub fn context(&self) -> &ColumnContext {
        self.tracker.current()
    }

    /// The registry in use.
    pub fn registry(&self) -> &SpeciesRegistry {
        &self.registry
    }

    /// The table accumulated so far.
    pub fn table(&self) -> &ResultTable {
        self.builder.table()
    }

    /// Counters so far.
    pub fn stats(&self) -> &ParseStats {
        &self.stats
    }

    /// End the parse and return everything accumulated.
    pub fn finish(self) -> ParseOutcome {
        let context = self.tracker.current().clone();
        let table = self.builder.finish();

        log::info!(
            "Parsed {} lines: {} records across {} entities ({} skipped)",
            self.stats.lines,
            table.record_count(),
            table.entity_count(),
            self.stats.skipped()
        );

        ParseOutcome {
            table,
            stats: self.stats,
            context,
        }
    }
}

/// Result of a parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOutcome {
    /// The reconstructed table
    pub table: ResultTable,
    /// Diagnostic counters
    pub stats: ParseStats,
    /// Column context after the last line
    pub context: ColumnContext,
}
