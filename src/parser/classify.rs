//! Line classification.
//!
//! Each normalized line falls into exactly one [`LineClass`]. The rules are
//! tried in [`RULE_ORDER`] and the first one that matches wins:
//!
//! 1. **Noise**: blank lines, page-break markers, report-title banners.
//! 2. **Dual-column data**: two `description yield [range]` groups. Two
//!    numeric groups on one line are the strongest signal of two physically
//!    separate cells, so this is tried before anything weaker.
//! 3. **Header**: two or more distinct registry names; the first two matches
//!    by position become left and right. Checked before
//!    single-column data because header text can end in something that looks
//!    like a yield (a trailing page number, for instance).
//! 4. **Single-column data**: one `description yield [range]` group.
//!
//! Anything else is [`LineClass::Unrecognized`].

use regex::{Captures, Regex};

use super::registry::SpeciesRegistry;
use crate::error::Result;

/// A product label: starts with a letter or `(`, then letters, digits,
/// spaces, parentheses, hyphens or slashes. Lazy, so the label stops at the
/// first numeric field that lets the rest of the line match.
const DESCRIPTION: &str = r"[A-Za-z(][A-Za-z0-9 ()/\-]*?";

/// Classification rules in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Blank lines and boilerplate markers
    Noise,
    /// Two data cells on one line
    DualColumn,
    /// Two registry names on one line
    Header,
    /// One data cell on the line
    SingleColumn,
}

/// The order rules are tried in.
pub const RULE_ORDER: [Rule; 4] = [Rule::Noise, Rule::DualColumn, Rule::Header, Rule::SingleColumn];

/// Why a line was treated as noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoiseKind {
    /// Empty after trimming
    Blank,
    /// A `--- Page <n> ---` marker
    PageBreak {
        /// Page number, when it could be read
        page: Option<u32>,
    },
    /// A recurring report-title banner
    Banner,
}

/// One `description yield [range]` cell as captured from the line.
///
/// Numbers are kept as text; converting them is the record builder's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawCell<'a> {
    /// Product label, trimmed
    pub description: &'a str,
    /// Yield digits
    pub yield_text: &'a str,
    /// `low-high` digits, when present
    pub range_text: Option<&'a str>,
}

/// Outcome of classifying one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass<'a> {
    /// Discarded without touching any state
    Noise(NoiseKind),
    /// Two cells: left column then right column
    DualData(RawCell<'a>, RawCell<'a>),
    /// New left and right column entities
    Header {
        /// First registry name by position
        left: &'a str,
        /// Second registry name by position
        right: &'a str,
    },
    /// One cell of unknown column
    SingleData(RawCell<'a>),
    /// Matches no rule
    Unrecognized,
}

impl LineClass<'_> {
    /// The rule that produced this outcome, if any.
    pub fn rule(&self) -> Option<Rule> {
        match self {
            LineClass::Noise(_) => Some(Rule::Noise),
            LineClass::DualData(..) => Some(Rule::DualColumn),
            LineClass::Header { .. } => Some(Rule::Header),
            LineClass::SingleData(_) => Some(Rule::SingleColumn),
            LineClass::Unrecognized => None,
        }
    }
}

/// Classifies normalized lines against a species registry.
#[derive(Debug, Clone)]
pub struct LineClassifier {
    banner_markers: Vec<String>,
    page_marker: Regex,
    dual_column: Regex,
    single_column: Regex,
}

impl LineClassifier {
    /// Create a classifier. Empty banner markers are ignored.
    pub fn new(banner_markers: &[String]) -> Result<Self> {
        let cell_pattern = |n: u8| {
            format!(
                r"(?P<d{n}>{desc})\s+(?P<a{n}>\d+)(?:\s+(?P<r{n}>\d+-\d+))?",
                n = n,
                desc = DESCRIPTION
            )
        };

        Ok(Self {
            banner_markers: banner_markers
                .iter()
                .filter(|m| !m.is_empty())
                .cloned()
                .collect(),
            page_marker: Regex::new(r"--- Page(?: (\d+))?")?,
            dual_column: Regex::new(&format!(r"^{}\s+{}$", cell_pattern(1), cell_pattern(2)))?,
            single_column: Regex::new(&format!(r"^{}$", cell_pattern(1)))?,
        })
    }

    /// Classify a line, trying each rule in [`RULE_ORDER`].
    pub fn classify<'a>(&self, line: &'a str, registry: &'a SpeciesRegistry) -> LineClass<'a> {
        let line = line.trim();
        RULE_ORDER
            .iter()
            .find_map(|rule| self.apply(*rule, line, registry))
            .unwrap_or(LineClass::Unrecognized)
    }

    /// Apply a single rule to a trimmed line.
    pub fn apply<'a>(
        &self,
        rule: Rule,
        line: &'a str,
        registry: &'a SpeciesRegistry,
    ) -> Option<LineClass<'a>> {
        match rule {
            Rule::Noise => self.match_noise(line).map(LineClass::Noise),
            Rule::DualColumn => {
                let caps = self.dual_column.captures(line)?;
                Some(LineClass::DualData(cell(&caps, 1)?, cell(&caps, 2)?))
            }
            Rule::Header => match_header(line, registry),
            Rule::SingleColumn => {
                let caps = self.single_column.captures(line)?;
                Some(LineClass::SingleData(cell(&caps, 1)?))
            }
        }
    }

    fn match_noise(&self, line: &str) -> Option<NoiseKind> {
        if line.is_empty() {
            return Some(NoiseKind::Blank);
        }
        if let Some(caps) = self.page_marker.captures(line) {
            let page = caps.get(1).and_then(|m| m.as_str().parse().ok());
            return Some(NoiseKind::PageBreak { page });
        }
        if self.banner_markers.iter().any(|m| line.contains(m.as_str())) {
            return Some(NoiseKind::Banner);
        }
        None
    }
}

fn match_header<'a>(line: &str, registry: &'a SpeciesRegistry) -> Option<LineClass<'a>> {
    let found = registry.find_in(line);
    let first = found.first()?;
    if found.iter().all(|o| o.name == first.name) {
        return None;
    }
    // Left and right are the first two matches by position, even when they
    // repeat a name.
    Some(LineClass::Header {
        left: first.name,
        right: found[1].name,
    })
}

fn cell<'a>(caps: &Captures<'a>, n: u8) -> Option<RawCell<'a>> {
    let group = |prefix: &str| caps.name(&format!("{}{}", prefix, n)).map(|m| m.as_str());
    Some(RawCell {
        description: group("d")?.trim(),
        yield_text: group("a")?,
        range_text: group("r"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        classifier: LineClassifier,
        registry: SpeciesRegistry,
    }

    impl Fixture {
        fn classify<'a>(&'a self, line: &'a str) -> LineClass<'a> {
            self.classifier.classify(line, &self.registry)
        }

        fn apply<'a>(&'a self, rule: Rule, line: &'a str) -> Option<LineClass<'a>> {
            self.classifier.apply(rule, line, &self.registry)
        }
    }

    fn classifier() -> Fixture {
        Fixture {
            classifier: LineClassifier::new(&["Recoveries".to_string()]).unwrap(),
            registry: SpeciesRegistry::manual(),
        }
    }

    fn raw<'a>(description: &'a str, yield_text: &'a str, range_text: Option<&'a str>) -> RawCell<'a> {
        RawCell {
            description,
            yield_text,
            range_text,
        }
    }

    #[test]
    fn test_rule_order() {
        assert_eq!(
            RULE_ORDER,
            [Rule::Noise, Rule::DualColumn, Rule::Header, Rule::SingleColumn]
        );
    }

    // ==================== Noise ====================

    #[test]
    fn test_blank_is_noise() {
        let c = classifier();
        assert_eq!(c.classify(""), LineClass::Noise(NoiseKind::Blank));
        assert_eq!(c.classify("   \t"), LineClass::Noise(NoiseKind::Blank));
    }

    #[test]
    fn test_page_marker_is_noise() {
        let c = classifier();
        assert_eq!(
            c.classify("--- Page 9 ---"),
            LineClass::Noise(NoiseKind::PageBreak { page: Some(9) })
        );
        assert_eq!(
            c.classify("--- Page ---"),
            LineClass::Noise(NoiseKind::PageBreak { page: None })
        );
    }

    #[test]
    fn test_page_marker_is_case_sensitive() {
        let c = classifier();
        assert_eq!(c.classify("--- page 9 ---"), LineClass::Unrecognized);
    }

    #[test]
    fn test_banner_is_noise() {
        let c = classifier();
        assert_eq!(
            c.classify("Recoveries and Yields from Pacific Fish and Shellfish 12"),
            LineClass::Noise(NoiseKind::Banner)
        );
    }

    #[test]
    fn test_empty_banner_marker_ignored() {
        let c = Fixture {
            classifier: LineClassifier::new(&[String::new()]).unwrap(),
            registry: SpeciesRegistry::manual(),
        };
        assert_eq!(
            c.classify("Round 81 72-90"),
            LineClass::SingleData(raw("Round", "81", Some("72-90")))
        );
    }

    // ==================== Dual column ====================

    #[test]
    fn test_dual_with_ranges() {
        let c = classifier();
        assert_eq!(
            c.classify("Round 81 72-90 Round 88 85-92"),
            LineClass::DualData(
                raw("Round", "81", Some("72-90")),
                raw("Round", "88", Some("85-92"))
            )
        );
    }

    #[test]
    fn test_dual_without_ranges() {
        let c = classifier();
        assert_eq!(
            c.classify("Steaks 62 Whole 42"),
            LineClass::DualData(raw("Steaks", "62", None), raw("Whole", "42", None))
        );
    }

    #[test]
    fn test_dual_mixed_ranges_and_multiword() {
        let c = classifier();
        assert_eq!(
            c.classify("Skin-On Fillets (V-cut) 45 38-48   D/H-Off 72"),
            LineClass::DualData(
                raw("Skin-On Fillets (V-cut)", "45", Some("38-48")),
                raw("D/H-Off", "72", None)
            )
        );
        assert_eq!(
            c.classify("Canned 65 D/H-On 86 80-94"),
            LineClass::DualData(raw("Canned", "65", None), raw("D/H-On", "86", Some("80-94")))
        );
    }

    #[test]
    fn test_dual_wins_over_header() {
        let c = classifier();
        // Registry names inside product labels do not make a header
        assert!(matches!(
            c.classify("King Crab Meat 24 22-25 Tanner Meat 18"),
            LineClass::DualData(..)
        ));
    }

    // ==================== Header ====================

    #[test]
    fn test_header_two_names() {
        let c = classifier();
        assert_eq!(
            c.classify("Cod, Pacific ... Halibut, Pacific"),
            LineClass::Header {
                left: "Cod, Pacific",
                right: "Halibut, Pacific"
            }
        );
    }

    #[test]
    fn test_header_with_trailing_number_beats_single() {
        let c = classifier();
        assert_eq!(
            c.classify("Sablefish Rockfish 12"),
            LineClass::Header {
                left: "Sablefish",
                right: "Rockfish"
            }
        );
    }

    #[test]
    fn test_single_name_is_not_header() {
        let c = classifier();
        assert_eq!(c.classify("Sablefish"), LineClass::Unrecognized);
        assert_eq!(c.classify("Sablefish Sablefish"), LineClass::Unrecognized);
    }

    #[test]
    fn test_header_keeps_second_match_by_position() {
        let c = classifier();
        assert_eq!(
            c.classify("Crab Crab Tuna"),
            LineClass::Header {
                left: "Crab",
                right: "Crab"
            }
        );
        assert_eq!(c.classify("Crab  Crab"), LineClass::Unrecognized);
    }

    #[test]
    fn test_header_takes_first_two_by_position() {
        let c = classifier();
        assert_eq!(
            c.classify("Tuna Lingcod Abalone"),
            LineClass::Header {
                left: "Tuna",
                right: "Lingcod"
            }
        );
    }

    // ==================== Single column ====================

    #[test]
    fn test_single_column() {
        let c = classifier();
        assert_eq!(
            c.classify("Skinless S/B Fillet 32"),
            LineClass::SingleData(raw("Skinless S/B Fillet", "32", None))
        );
        assert_eq!(
            c.classify("  Round 81 72-90  "),
            LineClass::SingleData(raw("Round", "81", Some("72-90")))
        );
    }

    #[test]
    fn test_unrecognized() {
        let c = classifier();
        assert_eq!(c.classify("Product Average Range"), LineClass::Unrecognized);
        assert_eq!(c.classify("81 72-90"), LineClass::Unrecognized);
        assert_eq!(c.classify("Round 81 72-90 extra"), LineClass::Unrecognized);
    }

    #[test]
    fn test_apply_single_rule() {
        let c = classifier();
        let line = "Sablefish Rockfish 12";
        assert!(matches!(
            c.apply(Rule::SingleColumn, line),
            Some(LineClass::SingleData(_))
        ));
        assert!(c.apply(Rule::DualColumn, line).is_none());
        assert_eq!(c.classify(line).rule(), Some(Rule::Header));
    }
}
