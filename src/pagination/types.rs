//! Pagination types
//!
//! Loading status, server-reported pagination metadata, and the query
//! parameters attached to each page request.

use crate::decode::DecoderConfig;
use crate::error::ErrorCode;
use crate::types::AcceptFormat;
use reqwest::header::HeaderMap;
use serde::Serialize;
use std::collections::BTreeMap;

/// Header carrying the current page number
pub const HEADER_CURRENT_PAGE: &str = "X-Pagination-Current-Page";
/// Header carrying the total record count
pub const HEADER_TOTAL_COUNT: &str = "X-Pagination-Total-Count";
/// Header carrying the total page count
pub const HEADER_PAGE_COUNT: &str = "X-Pagination-Page-Count";
/// Header carrying the page size the server applied
pub const HEADER_PER_PAGE: &str = "X-Pagination-Per-Page";

// ============================================================================
// Loading Status
// ============================================================================

/// Loading state of a list controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadingStatus {
    /// Resting, accepts new fetches
    #[default]
    Idle,
    /// A full reload was requested; the next fetch restarts from page one
    RequestToReload,
    /// Page fetch in flight, completion replaces the collection
    FullReloadProcessing,
    /// Page fetch in flight, completion appends to the collection
    LoadMoreProcessing,
    /// Detail fetch in flight
    LoadDetailsProcessing,
    /// Resting after a detail fetch, accepts new fetches
    IdleDetails,
    /// The last fetch failed; needs `force_idle` before new fetches
    Error,
}

impl LoadingStatus {
    /// Resting states that accept a load-more or detail trigger
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle | Self::IdleDetails)
    }

    /// A page fetch is in flight
    pub fn is_page_fetch(&self) -> bool {
        matches!(self, Self::FullReloadProcessing | Self::LoadMoreProcessing)
    }

    /// Any fetch is in flight
    pub fn is_busy(&self) -> bool {
        self.is_page_fetch() || *self == Self::LoadDetailsProcessing
    }
}

/// Last error recorded by a controller
///
/// Only overwritten by a later error, never cleared by success.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadingError {
    /// Error classification
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
}

// ============================================================================
// Pagination Metadata
// ============================================================================

/// Pagination counters reported by the server
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    /// Page the response belongs to
    pub current_page: u32,
    /// Total records in the collection
    pub total_count: u32,
    /// Total pages in the collection
    pub page_count: u32,
    /// Page size applied by the server
    pub per_page: u32,
}

impl PaginationMeta {
    /// Read the `X-Pagination-*` headers
    ///
    /// Missing or non-numeric values become 0.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            current_page: header_u32(headers, HEADER_CURRENT_PAGE),
            total_count: header_u32(headers, HEADER_TOTAL_COUNT),
            page_count: header_u32(headers, HEADER_PAGE_COUNT),
            per_page: header_u32(headers, HEADER_PER_PAGE),
        }
    }

    /// Build from explicit counters
    pub fn new(current_page: u32, total_count: u32, page_count: u32) -> Self {
        Self {
            current_page,
            total_count,
            page_count,
            per_page: 0,
        }
    }
}

fn header_u32(headers: &HeaderMap, name: &str) -> u32 {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u32>().ok())
        .unwrap_or(0)
}

// ============================================================================
// Requests
// ============================================================================

/// Query for one page, built from the controller's state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    /// Sort expressions, `-field` for descending
    pub sort: Vec<String>,
    /// Requested page size
    pub per_page: u32,
    /// 1-based page index
    pub page: u32,
    /// Filter key/value pairs
    pub filters: BTreeMap<String, String>,
    /// Requested field subset, empty for all
    pub fields: Vec<String>,
    /// Requested representation
    pub accept: AcceptFormat,
    /// The request restarts the collection
    pub full_reload: bool,
}

// ============================================================================
// List Options
// ============================================================================

/// Construction options for a list controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    /// Field holding each record's identity
    pub id_field: String,
    /// Sort expressions
    pub sort: Vec<String>,
    /// Page size
    pub per_page: u32,
    /// Filter key/value pairs
    pub filters: BTreeMap<String, String>,
    /// Requested field subset
    pub fields: Vec<String>,
    /// Payload decoding, including the accept format
    pub decoder: DecoderConfig,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            id_field: "id".to_string(),
            sort: vec!["-id".to_string()],
            per_page: 20,
            filters: BTreeMap::new(),
            fields: Vec::new(),
            decoder: DecoderConfig::default(),
        }
    }
}

impl ListOptions {
    /// Create default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the id field
    #[must_use]
    pub fn with_id_field(mut self, id_field: impl Into<String>) -> Self {
        self.id_field = id_field.into();
        self
    }

    /// Set sort expressions
    #[must_use]
    pub fn with_sort<I, S>(mut self, sort: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sort = sort.into_iter().map(Into::into).collect();
        self
    }

    /// Set the page size
    #[must_use]
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    /// Add a filter
    #[must_use]
    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    /// Replace all filters
    #[must_use]
    pub fn with_filters(mut self, filters: BTreeMap<String, String>) -> Self {
        self.filters = filters;
        self
    }

    /// Set the requested field subset
    #[must_use]
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Set the accept format
    #[must_use]
    pub fn with_accept(mut self, accept: AcceptFormat) -> Self {
        self.decoder.format = accept;
        self
    }

    /// Set the decoder configuration
    #[must_use]
    pub fn with_decoder(mut self, decoder: DecoderConfig) -> Self {
        self.decoder = decoder;
        self
    }
}
