//! Record module
//!
//! Identity-bearing, mergeable records and the ordered collection that owns them.
//!
//! # Overview
//!
//! An [`ItemRecord`] is one resource instance as decoded from a page or detail
//! payload. Its identity is the value stored under the configured id field;
//! everything else is free-form and may grow through [`ItemRecord::merge`].
//! [`RecordStore`] is the append-only, reload-replaced collection.

mod item;
mod store;

pub use item::ItemRecord;
pub use store::RecordStore;

#[cfg(test)]
mod tests;
