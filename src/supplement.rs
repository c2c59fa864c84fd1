//! Merging spreadsheet-style yield rows into a parsed table.
//!
//! Each row names a species and gives one yield cell, either a number
//! (`0.62` or `62`) or text (`"62%"`, `"80-85%"`). Rows become an
//! `Average Yield` record under the species, with the row's notes appended
//! to the label.

use serde::{Deserialize, Serialize};

use crate::model::{DataRecord, Entity, ResultTable, YieldRange};

/// Label given to merged records.
pub const AVERAGE_YIELD_LABEL: &str = "Average Yield";

/// Half-width of the range stored when a row gives none.
pub const SYNTHETIC_RANGE_SPREAD: u32 = 5;

/// A yield cell as read from the sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SupplementValue {
    /// A numeric cell. Values below 1 are fractions.
    Number(f64),
    /// A text cell, optionally with `%` and a `low-high` range
    Text(String),
}

/// One row of supplementary yield data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplementRow {
    /// Common name of the species
    pub name: String,

    /// Yield cell
    pub value: SupplementValue,

    /// Free-form notes, appended to the product label
    #[serde(default)]
    pub notes: Option<String>,
}

impl SupplementRow {
    /// Create a row with a numeric value.
    pub fn number(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value: SupplementValue::Number(value),
            notes: None,
        }
    }

    /// Create a row with a text value.
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: SupplementValue::Text(value.into()),
            notes: None,
        }
    }

    /// Attach notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Product label for this row.
    pub fn label(&self) -> String {
        match self.notes.as_deref().map(str::trim) {
            Some(notes) if !notes.is_empty() => format!("{} ({})", AVERAGE_YIELD_LABEL, notes),
            _ => AVERAGE_YIELD_LABEL.to_string(),
        }
    }

    /// Convert the row to a record, or `None` when the row is unusable.
    pub fn to_record(&self) -> Option<DataRecord> {
        let name = self.name.trim();
        if name.is_empty() {
            return None;
        }

        let (yield_value, range) = self.value.interpret()?;
        let range = range.unwrap_or_else(|| {
            YieldRange::new(
                yield_value.saturating_sub(SYNTHETIC_RANGE_SPREAD),
                yield_value.saturating_add(SYNTHETIC_RANGE_SPREAD),
            )
        });

        Some(DataRecord::new(
            Entity::named(name),
            self.label(),
            yield_value,
            Some(range),
        ))
    }
}

impl SupplementValue {
    /// Yield and, for `low-high` text, the range.
    pub fn interpret(&self) -> Option<(u32, Option<YieldRange>)> {
        match self {
            SupplementValue::Number(value) => {
                let percent = if *value < 1.0 { value * 100.0 } else { *value };
                Some((truncate(percent)?, None))
            }
            SupplementValue::Text(text) => {
                let cleaned = text.replace('%', "");
                let cleaned = cleaned.trim();

                if cleaned.contains('-') {
                    let mut parts = cleaned.split('-');
                    let (Some(low), Some(high), None) = (parts.next(), parts.next(), parts.next())
                    else {
                        return None;
                    };
                    let low: f64 = low.trim().parse().ok()?;
                    let high: f64 = high.trim().parse().ok()?;
                    let average = truncate((low + high) / 2.0)?;
                    Some((average, Some(YieldRange::new(truncate(low)?, truncate(high)?))))
                } else {
                    let value: f64 = cleaned.parse().ok()?;
                    Some((truncate(value)?, None))
                }
            }
        }
    }
}

fn truncate(value: f64) -> Option<u32> {
    if !value.is_finite() || value < 0.0 || value > u32::MAX as f64 {
        return None;
    }
    Some(value.trunc() as u32)
}

/// Outcome of a merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    /// Rows written to the table
    pub merged: usize,
    /// Rows skipped for an empty name or unusable value
    pub skipped: usize,
}

/// Merge rows into `table`, last write wins.
pub fn merge_supplement(table: &mut ResultTable, rows: &[SupplementRow]) -> MergeReport {
    let mut report = MergeReport::default();

    for row in rows {
        if row.name.trim().is_empty() {
            log::debug!("Skipping supplement row without a name");
            report.skipped += 1;
            continue;
        }

        match row.to_record() {
            Some(record) => {
                if table.insert(record).is_some() {
                    log::debug!("Supplement row for {} replaced an existing record", row.name);
                }
                report.merged += 1;
            }
            None => {
                log::warn!("Skipping {} due to invalid yield: {:?}", row.name, row.value);
                report.skipped += 1;
            }
        }
    }

    log::info!(
        "Merged {} supplement rows ({} skipped)",
        report.merged,
        report.skipped
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction_scaled() {
        assert_eq!(SupplementValue::Number(0.625).interpret(), Some((62, None)));
        assert_eq!(SupplementValue::Number(62.9).interpret(), Some((62, None)));
        assert_eq!(SupplementValue::Number(1.0).interpret(), Some((1, None)));
    }

    #[test]
    fn test_text_values() {
        assert_eq!(
            SupplementValue::Text("80-85%".to_string()).interpret(),
            Some((82, Some(YieldRange::new(80, 85))))
        );
        assert_eq!(SupplementValue::Text(" 45 % ".to_string()).interpret(), Some((45, None)));
        assert_eq!(SupplementValue::Text("n/a".to_string()).interpret(), None);
        assert_eq!(SupplementValue::Text("1-2-3".to_string()).interpret(), None);
        assert_eq!(SupplementValue::Number(-3.0).interpret(), None);
    }

    #[test]
    fn test_label_with_notes() {
        let row = SupplementRow::number("Scup", 0.5).with_notes("  headed and gutted ");
        assert_eq!(row.label(), "Average Yield (headed and gutted)");
        assert_eq!(SupplementRow::number("Scup", 0.5).with_notes("  ").label(), "Average Yield");
    }

    #[test]
    fn test_synthetic_range() {
        let record = SupplementRow::number("Scup", 0.03).to_record().unwrap();
        assert_eq!(record.yield_value, 3);
        assert_eq!(record.range, Some(YieldRange::new(0, 8)));
    }

    #[test]
    fn test_merge_counts_and_overwrites() {
        let mut table = ResultTable::new();
        let rows = vec![
            SupplementRow::number("Scup", 0.45),
            SupplementRow::text("Tautog", "80-85%"),
            SupplementRow::text("", "50"),
            SupplementRow::text("Butterfish", "unknown"),
            SupplementRow::number("Scup", 0.5),
        ];

        let report = merge_supplement(&mut table, &rows);
        assert_eq!(report, MergeReport { merged: 3, skipped: 2 });
        assert_eq!(table.get("Scup", "Average Yield").unwrap().yield_value, 50);
        assert_eq!(
            table.get("Tautog", "Average Yield").unwrap().range,
            Some(YieldRange::new(80, 85))
        );
    }

    #[test]
    fn test_rows_deserialize() {
        let rows: Vec<SupplementRow> = serde_json::from_str(
            r#"[{"name": "Scup", "value": 0.45}, {"name": "Tautog", "value": "80-85%", "notes": "fillet"}]"#,
        )
        .unwrap();
        assert_eq!(rows[0].value, SupplementValue::Number(0.45));
        assert_eq!(rows[1].label(), "Average Yield (fillet)");
    }
}
