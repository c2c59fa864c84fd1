//! Yield records and ranges.

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use super::Entity;

/// Observed low-high bounds around an average yield.
///
/// The bounds are kept exactly as read; `low <= high` is not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct YieldRange {
    /// Lower bound (percent)
    pub low: u32,
    /// Upper bound (percent)
    pub high: u32,
}

impl YieldRange {
    /// Create a new range.
    pub fn new(low: u32, high: u32) -> Self {
        Self { low, high }
    }

    /// Parse `"<low>-<high>"`, splitting on a single hyphen.
    ///
    /// Returns `None` when either side is not an unsigned integer.
    pub fn parse(text: &str) -> Option<Self> {
        let (low, high) = text.trim().split_once('-')?;
        let low = low.trim().parse().ok()?;
        let high = high.trim().parse().ok()?;
        Some(Self { low, high })
    }

    /// Check whether `value` lies within the bounds (inclusive).
    pub fn contains(&self, value: u32) -> bool {
        (self.low..=self.high).contains(&value)
    }
}

impl fmt::Display for YieldRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

/// One product yield attributed to an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataRecord {
    /// Entity the record was attributed to
    pub entity: Entity,
    /// Product label, trimmed
    pub description: String,
    /// Average yield (percent)
    pub yield_value: u32,
    /// Range, present only when the source encoded one
    pub range: Option<YieldRange>,
}

impl DataRecord {
    /// Create a new record.
    pub fn new(
        entity: Entity,
        description: impl Into<String>,
        yield_value: u32,
        range: Option<YieldRange>,
    ) -> Self {
        Self {
            entity,
            description: description.into().trim().to_string(),
            yield_value,
            range,
        }
    }

    /// Range formatted for output, or an empty string.
    pub fn range_text(&self) -> String {
        self.range.map(|r| r.to_string()).unwrap_or_default()
    }

    /// Convert to the output entry shape.
    pub fn to_entry(&self) -> YieldEntry {
        YieldEntry {
            yield_value: self.yield_value.to_string(),
            range: Some(self.range_text()),
        }
    }
}

// Output shape is `{"yield": "81", "range": "72-90"}`; entity and description
// live in the enclosing map keys.
impl Serialize for DataRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("DataRecord", 2)?;
        state.serialize_field("yield", &self.yield_value.to_string())?;
        state.serialize_field("range", &self.range_text())?;
        state.end()
    }
}

/// A yield entry as it appears in serialized output.
///
/// Used when reading a table back. `range` may be missing, `null` or empty
/// in files written by older tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YieldEntry {
    /// Stringified integer percentage
    #[serde(rename = "yield")]
    pub yield_value: String,

    /// `"<low>-<high>"`, empty or absent
    #[serde(default)]
    pub range: Option<String>,
}
