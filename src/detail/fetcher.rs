//! Detail fetcher

use crate::decode::PayloadDecoder;
use crate::error::{Error, Result};
use crate::record::{ItemRecord, RecordStore};
use crate::types::{value_to_text, AcceptFormat, JsonObject};
use serde::Serialize;
use tracing::debug;

/// Request for the full representation of one item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DetailRequest {
    /// Item id
    pub id: String,
    /// Requested field subset, empty for all
    pub fields: Vec<String>,
    /// Requested representation
    pub accept: AcceptFormat,
}

/// Where a detail payload landed in the collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailMerge {
    /// Id read from the payload
    pub id: String,
    /// Row of the merged or appended record
    pub row: usize,
    /// No record had this id, so one was appended
    pub inserted: bool,
}

/// Fetches and merges single-item payloads into a [`RecordStore`]
#[derive(Debug, Clone)]
pub struct DetailFetcher {
    id_field: String,
}

impl DetailFetcher {
    /// Create a fetcher keyed on `id_field`
    pub fn new(id_field: impl Into<String>) -> Self {
        Self {
            id_field: id_field.into(),
        }
    }

    /// Identity field name
    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    /// Change the identity field name
    pub fn set_id_field(&mut self, id_field: impl Into<String>) {
        self.id_field = id_field.into();
    }

    /// Whether `id` still lacks its full representation
    ///
    /// Records already merged with a detail payload are not refetched.
    pub fn needs_fetch(&self, store: &RecordStore, id: &str) -> bool {
        store.find_by_id(id).map_or(true, |record| !record.is_updated())
    }

    /// Build the request for `id`
    pub fn request(&self, id: impl Into<String>, accept: AcceptFormat, fields: &[String]) -> DetailRequest {
        DetailRequest {
            id: id.into(),
            fields: fields.to_vec(),
            accept,
        }
    }

    /// Decode `body` and merge it onto the record with the same id
    ///
    /// The id is read from the payload itself. Records are looked up by first
    /// match; when none exists the payload is appended as a new, already
    /// updated record.
    pub fn apply(
        &self,
        store: &mut RecordStore,
        decoder: &dyn PayloadDecoder,
        body: &str,
    ) -> Result<DetailMerge> {
        let fields = decoder.decode_object(body)?;
        let id = fields
            .get(&self.id_field)
            .and_then(value_to_text)
            .ok_or_else(|| Error::missing_id(&self.id_field))?;

        if let Some(row) = store.position_by_id(&id) {
            if let Some(record) = store.get_mut(row) {
                record.merge(fields);
            }
            debug!(id = %id, row, "Merged detail into existing record");
            return Ok(DetailMerge {
                id,
                row,
                inserted: false,
            });
        }

        let mut record = ItemRecord::new(JsonObject::new(), &self.id_field);
        record.merge(fields);
        let row = store.push(record);
        debug!(id = %id, row, "Appended detail as new record");

        Ok(DetailMerge {
            id,
            row,
            inserted: true,
        })
    }
}
