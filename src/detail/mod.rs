//! Detail module
//!
//! Single-item fetches merged into the shared collection, and the filtered
//! projection that surfaces the currently selected item.
//!
//! # Overview
//!
//! - [`DetailFetcher`] builds detail requests and merges detail payloads onto
//!   the record with the same id, appending when no such record exists.
//! - [`DetailFilterView`] remembers the selected id and which source rows
//!   match it; [`DetailView`] is the borrowed, read-through projection.

mod fetcher;
mod view;

pub use fetcher::{DetailFetcher, DetailMerge, DetailRequest};
pub use view::{DetailFilterView, DetailView};

#[cfg(test)]
mod tests;
