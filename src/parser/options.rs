//! Parsing options and configuration.

/// Default trimmed-length limit for single-column lines to be attributed.
pub const DEFAULT_SHORT_LINE_THRESHOLD: usize = 40;

/// Default number of leading lines scanned for table-of-contents entries.
pub const DEFAULT_TOC_SCAN_LINES: usize = 200;

/// Default page number a TOC entry must exceed to be taken as a species.
pub const DEFAULT_TOC_MIN_PAGE: u32 = 5;

/// Options for parsing a text dump.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Single-column data lines at least this long (in characters, after
    /// trimming) are dropped instead of attributed to the left column
    pub short_line_threshold: usize,

    /// Where the species registry comes from
    pub registry: RegistrySource,

    /// Additional names appended to the registry
    pub extra_species: Vec<String>,

    /// Substrings marking recurring report-title banners
    pub banner_markers: Vec<String>,

    /// Substitutions applied after the built-in OCR fixes
    pub extra_substitutions: Vec<(String, String)>,

    /// NFC-normalize each line before OCR substitution
    pub unicode_nfc: bool,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the short-line threshold.
    pub fn with_short_line_threshold(mut self, chars: usize) -> Self {
        self.short_line_threshold = chars;
        self
    }

    /// Set the registry source.
    pub fn with_registry(mut self, source: RegistrySource) -> Self {
        self.registry = source;
        self
    }

    /// Derive the registry from the table of contents with default limits.
    pub fn with_toc_registry(mut self) -> Self {
        self.registry = RegistrySource::table_of_contents();
        self
    }

    /// Add a species name to the registry.
    pub fn with_species(mut self, name: impl Into<String>) -> Self {
        self.extra_species.push(name.into());
        self
    }

    /// Add a banner marker.
    pub fn with_banner(mut self, marker: impl Into<String>) -> Self {
        self.banner_markers.push(marker.into());
        self
    }

    /// Add an OCR substitution.
    pub fn with_substitution(
        mut self,
        pattern: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        self.extra_substitutions
            .push((pattern.into(), replacement.into()));
        self
    }

    /// Enable or disable Unicode NFC normalization.
    pub fn with_unicode_nfc(mut self, enabled: bool) -> Self {
        self.unicode_nfc = enabled;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            short_line_threshold: DEFAULT_SHORT_LINE_THRESHOLD,
            registry: RegistrySource::Manual,
            extra_species: Vec::new(),
            banner_markers: vec!["Recoveries".to_string()],
            extra_substitutions: Vec::new(),
            unicode_nfc: true,
        }
    }
}

/// Source of the known entity names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegistrySource {
    /// The built-in curated species list
    #[default]
    Manual,
    /// Names scanned from a table of contents at the start of the input,
    /// falling back to the curated list when nothing is found
    TableOfContents {
        /// How many leading lines to scan
        scan_lines: usize,
        /// Entries must point past this page number
        min_page: u32,
    },
}

impl RegistrySource {
    /// Table-of-contents scanning with default limits.
    pub fn table_of_contents() -> Self {
        RegistrySource::TableOfContents {
            scan_lines: DEFAULT_TOC_SCAN_LINES,
            min_page: DEFAULT_TOC_MIN_PAGE,
        }
    }
}
