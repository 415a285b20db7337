//! Detail filter view

use crate::record::{ItemRecord, RecordStore};
use crate::types::JsonValue;

/// Filter over a collection keeping only records whose id is the selection
///
/// The view never mutates the collection. It caches the matching source rows
/// and must be invalidated whenever the selection or the collection changes.
#[derive(Debug, Clone, Default)]
pub struct DetailFilterView {
    selected: Option<String>,
    rows: Vec<usize>,
}

impl DetailFilterView {
    /// Create a view with nothing selected
    pub fn new() -> Self {
        Self::default()
    }

    /// Change the selected id; call [`invalidate`](Self::invalidate) afterwards
    pub fn select(&mut self, id: Option<String>) {
        self.selected = id;
    }

    /// Currently selected id
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Re-evaluate the filter against `store`
    pub fn invalidate(&mut self, store: &RecordStore) {
        self.rows = match &self.selected {
            Some(id) => store
                .iter()
                .enumerate()
                .filter(|(_, record)| record.has_id(id))
                .map(|(row, _)| row)
                .collect(),
            None => Vec::new(),
        };
    }

    /// Source rows accepted by the filter
    pub fn source_rows(&self) -> &[usize] {
        &self.rows
    }

    /// Number of accepted rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no row is accepted
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Borrowed projection over `store`
    pub fn project<'a>(&'a self, store: &'a RecordStore) -> DetailView<'a> {
        DetailView { filter: self, store }
    }
}

/// Read-through projection of a [`DetailFilterView`] over its collection
#[derive(Debug, Clone, Copy)]
pub struct DetailView<'a> {
    filter: &'a DetailFilterView,
    store: &'a RecordStore,
}

impl<'a> DetailView<'a> {
    /// Selected id
    pub fn selected(&self) -> Option<&'a str> {
        self.filter.selected()
    }

    /// Number of visible records
    pub fn len(&self) -> usize {
        self.filter.len()
    }

    /// Whether nothing is visible
    pub fn is_empty(&self) -> bool {
        self.filter.is_empty()
    }

    /// Visible record at `row`
    pub fn get(&self, row: usize) -> Option<&'a ItemRecord> {
        let source = *self.filter.rows.get(row)?;
        self.store.get(source)
    }

    /// First visible record
    pub fn first(&self) -> Option<&'a ItemRecord> {
        self.get(0)
    }

    /// Field value of the visible record at `row`
    pub fn value(&self, row: usize, field: &str) -> Option<&'a JsonValue> {
        self.get(row)?.get(field)
    }

    /// Source row behind visible `row`
    pub fn map_to_source(&self, row: usize) -> Option<usize> {
        self.filter.rows.get(row).copied()
    }

    /// Visible records in order
    pub fn iter(&self) -> impl Iterator<Item = &'a ItemRecord> + 'a {
        let (filter, store) = (self.filter, self.store);
        filter
            .rows
            .iter()
            .filter_map(move |&source| store.get(source))
    }
}
