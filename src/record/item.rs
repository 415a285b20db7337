//! Item record
//!
//! One resource instance keyed by the value of its id field.

use crate::types::{value_to_text, JsonObject, JsonValue};
use serde::Serialize;

/// A single resource instance
///
/// Equality is identity: two records are equal when their id values are
/// equal, regardless of the rest of their fields.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct ItemRecord {
    /// Field name to value
    fields: JsonObject,
    /// Name of the field holding the identity
    #[serde(skip)]
    id_field: String,
    /// Set once a detail payload has been merged
    #[serde(skip)]
    updated: bool,
}

impl ItemRecord {
    /// Create a record from a decoded field map
    pub fn new(fields: JsonObject, id_field: impl Into<String>) -> Self {
        Self {
            fields,
            id_field: id_field.into(),
            updated: false,
        }
    }

    /// Look up a field
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.fields.get(key)
    }

    /// Field names in payload order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// All fields
    pub fn fields(&self) -> &JsonObject {
        &self.fields
    }

    /// Consume the record, returning its fields
    pub fn into_fields(self) -> JsonObject {
        self.fields
    }

    /// Name of the identity field
    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    /// Identity as text, `None` when the id field is missing or not a scalar
    pub fn id(&self) -> Option<String> {
        self.fields.get(&self.id_field).and_then(value_to_text)
    }

    /// Whether a detail payload has been merged into this record
    pub fn is_updated(&self) -> bool {
        self.updated
    }

    /// Overlay `new_fields` onto this record
    ///
    /// Keys present in `new_fields` replace existing values, keys absent are
    /// kept. The record is marked updated even when `new_fields` is empty.
    pub fn merge(&mut self, new_fields: JsonObject) {
        for (key, value) in new_fields {
            self.fields.insert(key, value);
        }
        self.updated = true;
    }

    /// Identity comparison by id value only
    pub fn same_as(&self, other: &ItemRecord) -> bool {
        match (self.id(), other.id()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Whether this record's id equals `id`
    pub fn has_id(&self, id: &str) -> bool {
        self.id().is_some_and(|own| own == id)
    }
}

impl PartialEq for ItemRecord {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}
