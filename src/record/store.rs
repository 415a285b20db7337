//! Record store
//!
//! Ordered collection of records. Appends during paging, cleared on full
//! reload. Duplicate ids are allowed; lookups resolve to the first match.

use super::item::ItemRecord;
use crate::types::JsonValue;

/// Ordered collection of [`ItemRecord`]s
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<ItemRecord>,
}

impl RecordStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a record, returning its row
    pub fn push(&mut self, record: ItemRecord) -> usize {
        self.records.push(record);
        self.records.len() - 1
    }

    /// Drop every record
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Record at `row`
    pub fn get(&self, row: usize) -> Option<&ItemRecord> {
        self.records.get(row)
    }

    /// Mutable record at `row`
    pub fn get_mut(&mut self, row: usize) -> Option<&mut ItemRecord> {
        self.records.get_mut(row)
    }

    /// Field value at `row`
    pub fn value(&self, row: usize, field: &str) -> Option<&JsonValue> {
        self.records.get(row)?.get(field)
    }

    /// Row of the first record with this id
    pub fn position_by_id(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|record| record.has_id(id))
    }

    /// First record with this id
    pub fn find_by_id(&self, id: &str) -> Option<&ItemRecord> {
        self.records.iter().find(|record| record.has_id(id))
    }

    /// Iterate records in order
    pub fn iter(&self) -> std::slice::Iter<'_, ItemRecord> {
        self.records.iter()
    }

    /// Records as a slice
    pub fn as_slice(&self) -> &[ItemRecord] {
        &self.records
    }
}

impl<'a> IntoIterator for &'a RecordStore {
    type Item = &'a ItemRecord;
    type IntoIter = std::slice::Iter<'a, ItemRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
