//! Known species names used to recognize column headers.

use regex::Regex;

use crate::error::Result;

/// Curated species and category names.
pub const MANUAL_SPECIES: &[&str] = &[
    "Abalone",
    "Capelin",
    "Clams",
    "Cockles",
    "Cod, Pacific",
    "Crab",
    "Dungeness",
    "King",
    "Tanner",
    "Flounders",
    "Arrowtooth",
    "Starry",
    "Halibut, Pacific",
    "Herring, Pacific",
    "Lingcod",
    "Mackerel",
    "Mussels",
    "Octopus",
    "Oysters",
    "Perch",
    "Pollock",
    "Rockfish",
    "Sablefish",
    "Salmon",
    "Pink",
    "Chum",
    "Sockeye",
    "Coho",
    "Chinook",
    "Scallops",
    "Shark",
    "Shrimp",
    "Sole",
    "Squid",
    "Tuna",
    "Turbot",
];

/// A registry name found in a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence<'a> {
    /// Byte offset of the match
    pub position: usize,
    /// The registry name that matched
    pub name: &'a str,
}

impl Occurrence<'_> {
    fn end(&self) -> usize {
        self.position + self.name.len()
    }
}

/// Set of known entity names.
///
/// Lookup is case-sensitive substring containment.
#[derive(Debug, Clone)]
pub struct SpeciesRegistry {
    names: Vec<String>,
}

impl SpeciesRegistry {
    /// Registry holding the curated list.
    pub fn manual() -> Self {
        Self::from_names(MANUAL_SPECIES.iter().copied())
    }

    /// Registry holding exactly the given names (duplicates and empty names dropped).
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registry = Self { names: Vec::new() };
        registry.extend(names);
        registry
    }

    /// Derive names from a table of contents at the top of `lines`.
    ///
    /// See [`TocScanner`]. Falls back to the curated list when nothing is found.
    pub fn from_toc<S: AsRef<str>>(lines: &[S], scan_lines: usize, min_page: u32) -> Result<Self> {
        Ok(TocScanner::new(scan_lines, min_page)?.scan(lines))
    }

    /// Append names not already present.
    pub fn extend<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into();
            let name = name.trim();
            if !name.is_empty() && !self.contains(name) {
                self.names.push(name.to_string());
            }
        }
    }

    /// Check whether `name` is a registered name.
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Registered names in insertion order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of registered names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Find registry names in `line`, ordered by position.
    ///
    /// Where several names start at the same offset the longest is kept, and
    /// names starting inside an earlier kept match are dropped.
    pub fn find_in<'a>(&'a self, line: &str) -> Vec<Occurrence<'a>> {
        let mut found: Vec<Occurrence<'a>> = self
            .names
            .iter()
            .flat_map(|name| {
                line.match_indices(name.as_str())
                    .map(move |(position, _)| Occurrence {
                        position,
                        name: name.as_str(),
                    })
            })
            .collect();

        found.sort_by(|a, b| {
            a.position
                .cmp(&b.position)
                .then_with(|| b.name.len().cmp(&a.name.len()))
        });

        let mut kept: Vec<Occurrence<'a>> = Vec::with_capacity(found.len());
        for occurrence in found {
            if kept.last().map_or(true, |prev| occurrence.position >= prev.end()) {
                kept.push(occurrence);
            }
        }
        kept
    }
}

impl Default for SpeciesRegistry {
    fn default() -> Self {
        Self::manual()
    }
}

/// Reads species names from a table of contents.
///
/// Only the first `scan_lines` lines are examined. An entry looks like
/// `Cod, Pacific ........ 9`: a capitalized name, whitespace or dot fill,
/// then a page number that must exceed `min_page`. Lines that do not fit are
/// skipped.
#[derive(Debug, Clone)]
pub struct TocScanner {
    entry: Regex,
    scan_lines: usize,
    min_page: u32,
}

impl TocScanner {
    /// Create a scanner.
    pub fn new(scan_lines: usize, min_page: u32) -> Result<Self> {
        Ok(Self {
            entry: Regex::new(r"^([A-Z][\w, \-]+?)\s+(\d+)$")?,
            scan_lines,
            min_page,
        })
    }

    /// Names found in the leading lines, in order of appearance.
    pub fn entries<S: AsRef<str>>(&self, lines: &[S]) -> Vec<String> {
        let mut names = Vec::new();

        for line in lines.iter().take(self.scan_lines) {
            let cleaned = line.as_ref().trim().replace('.', "");
            let Some(caps) = self.entry.captures(&cleaned) else {
                continue;
            };
            let Ok(page) = caps[2].parse::<u32>() else {
                continue;
            };
            if page > self.min_page {
                names.push(caps[1].trim().to_string());
            }
        }

        names
    }

    /// Build a registry from the leading lines, or the curated list when
    /// no entry is found.
    pub fn scan<S: AsRef<str>>(&self, lines: &[S]) -> SpeciesRegistry {
        let names = self.entries(lines);
        if names.is_empty() {
            log::debug!("No table-of-contents entries found, using curated species list");
            return SpeciesRegistry::manual();
        }

        log::debug!("Derived {} species from table of contents", names.len());
        SpeciesRegistry::from_names(names)
    }
}
