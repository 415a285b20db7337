//! Change notifications emitted by a list controller

use super::types::{LoadingStatus, PaginationMeta};
use crate::error::ErrorCode;

/// A change observers of a list controller may react to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEvent {
    /// Loading status moved
    StatusChanged(LoadingStatus),
    /// Row count after an insert, reset or failed page
    CountChanged(usize),
    /// Rows `first..=last` were appended
    RowsInserted {
        /// First new row
        first: usize,
        /// Last new row
        last: usize,
    },
    /// A record was merged in place
    RowChanged(usize),
    /// The collection was cleared for a full reload
    Reset,
    /// Server-reported counters changed
    PaginationChanged(PaginationMeta),
    /// An error was recorded
    ErrorChanged {
        /// Error classification
        code: ErrorCode,
        /// Human-readable message
        message: String,
    },
    /// The detail view was re-filtered for this id
    DetailChanged(Option<String>),
}
