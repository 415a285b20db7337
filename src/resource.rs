//! Per-resource strategy
//!
//! The list controller knows nothing about URLs or transports. Each concrete
//! resource supplies a [`ResourceStrategy`] that turns page and detail
//! requests into raw replies and optionally reshapes decoded records.

use crate::detail::DetailRequest;
use crate::error::Result;
use crate::pagination::{PageRequest, PaginationMeta};
use crate::types::JsonObject;
use async_trait::async_trait;

/// Raw reply for a page or detail request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    /// Undecoded response body
    pub body: String,
    /// Pagination metadata reported alongside the body
    pub pagination: PaginationMeta,
}

impl Reply {
    /// Create a reply without pagination metadata
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            pagination: PaginationMeta::default(),
        }
    }

    /// Create a reply with pagination metadata
    pub fn with_pagination(body: impl Into<String>, pagination: PaginationMeta) -> Self {
        Self {
            body: body.into(),
            pagination,
        }
    }
}

/// Strategy injected into a list controller for one concrete resource
///
/// A returned `Err` is recorded on the controller as a transport error of
/// the in-flight operation.
#[async_trait]
pub trait ResourceStrategy: Send + Sync {
    /// Fetch one page of the collection
    async fn fetch_page(&self, request: &PageRequest) -> Result<Reply>;

    /// Fetch the full representation of a single item
    async fn fetch_detail(&self, request: &DetailRequest) -> Result<Reply>;

    /// Reshape a decoded page record before it becomes an item
    fn pre_process(&self, record: JsonObject) -> JsonObject {
        record
    }
}
