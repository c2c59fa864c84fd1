//! Turns classified data lines into records.

use std::fmt;

use super::classify::RawCell;
use crate::model::{ColumnContext, DataRecord, Entity, ResultTable, YieldRange};

/// Why a line produced no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The line matched no classification rule
    Malformed,
    /// A single-column line could not be confidently given a column
    Ambiguous,
    /// A captured number did not parse as an integer
    NumericParse,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::Malformed => "malformed line",
            SkipReason::Ambiguous => "ambiguous attribution",
            SkipReason::NumericParse => "numeric parse failure",
        };
        f.write_str(text)
    }
}

/// What a successful emit wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Emission {
    /// Records written
    pub records: u32,
    /// Of those, how many replaced an existing record
    pub overwritten: u32,
    /// Of those, how many went under the `Unknown` entity
    pub unknown_entity: u32,
}

/// Accumulates records into a [`ResultTable`].
///
/// The table is consistent after every call: a line either contributes all
/// of its records or none.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    table: ResultTable,
    short_line_threshold: usize,
}

impl RecordBuilder {
    /// Create a builder with an empty table.
    pub fn new(short_line_threshold: usize) -> Self {
        Self {
            table: ResultTable::new(),
            short_line_threshold,
        }
    }

    /// Emit both cells of a dual-column line, left then right.
    ///
    /// An unknown side is still emitted, under the `Unknown` key.
    pub fn emit_dual(
        &mut self,
        context: &ColumnContext,
        left: RawCell<'_>,
        right: RawCell<'_>,
    ) -> Result<Emission, SkipReason> {
        let left = to_record(&context.left, left)?;
        let right = to_record(&context.right, right)?;

        let mut emission = Emission::default();
        self.store(left, &mut emission);
        self.store(right, &mut emission);
        Ok(emission)
    }

    /// Emit a single-column line under the left entity.
    ///
    /// Only short lines with a known left entity are attributed; anything
    /// else is dropped rather than guessed. `line` is the normalized line the
    /// cell came from.
    pub fn emit_single(
        &mut self,
        context: &ColumnContext,
        cell: RawCell<'_>,
        line: &str,
    ) -> Result<Emission, SkipReason> {
        if context.left.is_unknown() {
            return Err(SkipReason::Ambiguous);
        }
        if line.trim().chars().count() >= self.short_line_threshold {
            return Err(SkipReason::Ambiguous);
        }

        let record = to_record(&context.left, cell)?;
        let mut emission = Emission::default();
        self.store(record, &mut emission);
        Ok(emission)
    }

    /// The table accumulated so far.
    pub fn table(&self) -> &ResultTable {
        &self.table
    }

    /// Hand over the finished table.
    pub fn finish(self) -> ResultTable {
        self.table
    }

    fn store(&mut self, record: DataRecord, emission: &mut Emission) {
        emission.records += 1;
        if record.entity.is_unknown() {
            emission.unknown_entity += 1;
        }
        if self.table.insert(record).is_some() {
            emission.overwritten += 1;
        }
    }
}

fn to_record(entity: &Entity, cell: RawCell<'_>) -> Result<DataRecord, SkipReason> {
    let yield_value = cell
        .yield_text
        .parse::<u32>()
        .map_err(|_| SkipReason::NumericParse)?;

    let range = match cell.range_text {
        Some(text) => Some(YieldRange::parse(text).ok_or(SkipReason::NumericParse)?),
        None => None,
    };

    Ok(DataRecord::new(
        entity.clone(),
        cell.description,
        yield_value,
        range,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell<'a>(description: &'a str, yield_text: &'a str, range_text: Option<&'a str>) -> RawCell<'a> {
        RawCell {
            description,
            yield_text,
            range_text,
        }
    }

    fn context(left: &str, right: &str) -> ColumnContext {
        ColumnContext::new(Entity::named(left), Entity::named(right))
    }

    #[test]
    fn test_dual_emits_both_sides() {
        let mut builder = RecordBuilder::new(40);
        let ctx = context("Cod, Pacific", "Halibut, Pacific");

        let emission = builder
            .emit_dual(
                &ctx,
                cell("Round", "81", Some("72-90")),
                cell("Round", "88", Some("85-92")),
            )
            .unwrap();
        assert_eq!(emission.records, 2);

        let table = builder.finish();
        let cod = table.get("Cod, Pacific", "Round").unwrap();
        assert_eq!(cod.yield_value, 81);
        assert_eq!(cod.range, Some(YieldRange::new(72, 90)));
        let halibut = table.get("Halibut, Pacific", "Round").unwrap();
        assert_eq!(halibut.yield_value, 88);
    }

    #[test]
    fn test_dual_unknown_context_uses_unknown_key() {
        let mut builder = RecordBuilder::new(40);
        let emission = builder
            .emit_dual(
                &ColumnContext::default(),
                cell("Steaks", "62", None),
                cell("Whole", "42", None),
            )
            .unwrap();
        assert_eq!(emission.unknown_entity, 2);
        assert!(builder.table().get("Unknown", "Steaks").is_some());
        assert!(builder.table().get("Unknown", "Whole").is_some());
    }

    #[test]
    fn test_dual_is_all_or_nothing() {
        let mut builder = RecordBuilder::new(40);
        let ctx = context("Crab", "Sablefish");
        let result = builder.emit_dual(
            &ctx,
            cell("Meat", "24", None),
            cell("Round", "99999999999", None),
        );
        assert_eq!(result, Err(SkipReason::NumericParse));
        assert!(builder.table().is_empty());
    }

    #[test]
    fn test_single_short_line_goes_left() {
        let mut builder = RecordBuilder::new(40);
        let ctx = context("Sablefish", "Rockfish");
        builder
            .emit_single(&ctx, cell("Smoked", "58", Some("50-65")), "Smoked 58 50-65")
            .unwrap();
        assert_eq!(builder.table().get("Sablefish", "Smoked").unwrap().yield_value, 58);
        assert!(!builder.table().contains_entity("Rockfish"));
    }

    #[test]
    fn test_single_long_line_dropped() {
        let mut builder = RecordBuilder::new(40);
        let ctx = context("Sablefish", "Rockfish");
        let line = "Skinless Boneless Fillet Portions Individually Frozen 32";
        let result = builder.emit_single(
            &ctx,
            cell("Skinless Boneless Fillet Portions Individually Frozen", "32", None),
            line,
        );
        assert_eq!(result, Err(SkipReason::Ambiguous));
        assert!(builder.table().is_empty());
    }

    #[test]
    fn test_single_threshold_is_exclusive() {
        let mut builder = RecordBuilder::new(9);
        let ctx = context("Crab", "Tuna");
        // "Meat 24 1" is nine characters
        let result = builder.emit_single(&ctx, cell("Meat", "24", None), "Meat 24 1");
        assert_eq!(result, Err(SkipReason::Ambiguous));
        assert!(builder.emit_single(&ctx, cell("Meat", "24", None), "Meat 24").is_ok());
    }

    #[test]
    fn test_single_unknown_left_dropped() {
        let mut builder = RecordBuilder::new(40);
        let result = builder.emit_single(&ColumnContext::default(), cell("Round", "81", None), "Round 81");
        assert_eq!(result, Err(SkipReason::Ambiguous));
    }

    #[test]
    fn test_range_not_validated() {
        let mut builder = RecordBuilder::new(40);
        let ctx = context("Crab", "Tuna");
        builder
            .emit_single(&ctx, cell("Meat", "24", Some("30-20")), "Meat 24 30-20")
            .unwrap();
        assert_eq!(
            builder.table().get("Crab", "Meat").unwrap().range,
            Some(YieldRange::new(30, 20))
        );
    }

    #[test]
    fn test_overwrite_counted() {
        let mut builder = RecordBuilder::new(40);
        let ctx = context("Crab", "Tuna");
        builder.emit_single(&ctx, cell("Meat", "24", None), "Meat 24").unwrap();
        let emission = builder
            .emit_single(&ctx, cell("Meat", "25", None), "Meat 25")
            .unwrap();
        assert_eq!(emission.overwritten, 1);
        assert_eq!(builder.table().get("Crab", "Meat").unwrap().yield_value, 25);
    }
}
