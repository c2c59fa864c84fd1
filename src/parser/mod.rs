//! Yield report parsing.
//!
//! A parse runs every raw line through the same pipeline:
//! [`OcrNormalizer`] → [`LineClassifier`] → [`ColumnTracker`] or
//! [`RecordBuilder`], with [`ParseStats`] counting what was dropped.
//! [`YieldParser`] wires these together.

mod builder;
mod classify;
mod context;
mod normalize;
mod options;
mod registry;
mod stats;
mod yield_parser;

pub use builder::{Emission, RecordBuilder, SkipReason};
pub use classify::{LineClass, LineClassifier, NoiseKind, RawCell, Rule, RULE_ORDER};
pub use context::ColumnTracker;
pub use normalize::{OcrNormalizer, OCR_SUBSTITUTIONS};
pub use options::{
    ParseOptions, RegistrySource, DEFAULT_SHORT_LINE_THRESHOLD, DEFAULT_TOC_MIN_PAGE,
    DEFAULT_TOC_SCAN_LINES,
};
pub use registry::{Occurrence, SpeciesRegistry, TocScanner, MANUAL_SPECIES};
pub use stats::ParseStats;
pub use yield_parser::{LineOutcome, ParseOutcome, ParseSession, YieldParser};
