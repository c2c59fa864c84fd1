//! The entity → description → record table.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{DataRecord, Entity, YieldEntry, YieldRange};
use crate::error::{Error, Result};

/// Reconstructed yield table.
///
/// Descriptions are unique within an entity; inserting an existing
/// entity/description pair replaces the earlier record. Keys are kept sorted
/// so serialized output is stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResultTable {
    entities: BTreeMap<String, BTreeMap<String, DataRecord>>,
}

impl ResultTable {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, returning the record it replaced.
    pub fn insert(&mut self, record: DataRecord) -> Option<DataRecord> {
        self.entities
            .entry(record.entity.key().to_string())
            .or_default()
            .insert(record.description.clone(), record)
    }

    /// Look up a record.
    pub fn get(&self, entity: &str, description: &str) -> Option<&DataRecord> {
        self.entities.get(entity)?.get(description)
    }

    /// All records of one entity, keyed by description.
    pub fn entity(&self, entity: &str) -> Option<&BTreeMap<String, DataRecord>> {
        self.entities.get(entity)
    }

    /// Check whether an entity has any records.
    pub fn contains_entity(&self, entity: &str) -> bool {
        self.entities.contains_key(entity)
    }

    /// Entity keys in sorted order.
    pub fn entity_names(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }

    /// All records, grouped by entity in key order.
    pub fn records(&self) -> impl Iterator<Item = &DataRecord> {
        self.entities.values().flat_map(|m| m.values())
    }

    /// Number of entities.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Number of records across all entities.
    pub fn record_count(&self) -> usize {
        self.entities.values().map(BTreeMap::len).sum()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Merge another table into this one. Records in `other` win.
    pub fn merge(&mut self, other: ResultTable) {
        for record in other.entities.into_values().flat_map(BTreeMap::into_values) {
            self.insert(record);
        }
    }

    /// Rebuild a table from serialized entries.
    pub fn from_entries(entries: BTreeMap<String, BTreeMap<String, YieldEntry>>) -> Result<Self> {
        let mut table = Self::new();

        for (entity_key, products) in entries {
            let entity = Entity::from_key(&entity_key);
            for (description, entry) in products {
                let invalid = |reason: String| Error::InvalidRecord {
                    entity: entity_key.clone(),
                    description: description.clone(),
                    reason,
                };

                let yield_value = entry.yield_value.trim().parse::<u32>().map_err(|_| {
                    invalid(format!("yield `{}` is not an integer", entry.yield_value))
                })?;

                let range = match entry.range.as_deref().map(str::trim) {
                    None | Some("") => None,
                    Some(text) => Some(
                        YieldRange::parse(text)
                            .ok_or_else(|| invalid(format!("range `{}` is not low-high", text)))?,
                    ),
                };

                table.insert(DataRecord {
                    entity: entity.clone(),
                    description: description.clone(),
                    yield_value,
                    range,
                });
            }
        }

        Ok(table)
    }
}
