//! JSON rendering for result tables.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::model::{ResultTable, YieldEntry};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a table to JSON.
///
/// Keys come out sorted, so the same table always renders to the same bytes.
pub fn to_json(table: &ResultTable, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(table),
        JsonFormat::Compact => serde_json::to_string(table),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Read a table from its JSON mapping.
pub fn from_json(text: &str) -> Result<ResultTable> {
    let entries: BTreeMap<String, BTreeMap<String, YieldEntry>> = serde_json::from_str(text)?;
    ResultTable::from_entries(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DataRecord, Entity, YieldRange};

    fn sample() -> ResultTable {
        let mut table = ResultTable::new();
        table.insert(DataRecord::new(
            Entity::named("Halibut, Pacific"),
            "Round",
            88,
            Some(YieldRange::new(85, 92)),
        ));
        table.insert(DataRecord::new(Entity::named("Cod, Pacific"), "Steaks", 62, None));
        table
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&sample(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"Cod, Pacific\""));
        assert!(json.contains('\n'));
        // Sorted keys
        assert!(json.find("Cod").unwrap() < json.find("Halibut").unwrap());
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&sample(), JsonFormat::Compact).unwrap();
        assert_eq!(
            json,
            r#"{"Cod, Pacific":{"Steaks":{"yield":"62","range":""}},"Halibut, Pacific":{"Round":{"yield":"88","range":"85-92"}}}"#
        );
    }

    #[test]
    fn test_from_json_reads_back() {
        let json = to_json(&sample(), JsonFormat::Pretty).unwrap();
        assert_eq!(from_json(&json).unwrap(), sample());
    }

    #[test]
    fn test_from_json_rejects_bad_yield() {
        let result = from_json(r#"{"Crab":{"Meat":{"yield":"lots","range":""}}}"#);
        assert!(matches!(result, Err(Error::InvalidRecord { .. })));
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(to_json(&ResultTable::new(), JsonFormat::Compact).unwrap(), "{}");
    }
}
