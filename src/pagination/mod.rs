//! Pagination module
//!
//! The loading state machine and incremental-fetch controller.
//!
//! # Overview
//!
//! [`PaginationController`] owns the ordered collection, the schema registry
//! and the detail filter view. It issues at most one fetch at a time, page or
//! detail, and folds completions back into the collection:
//!
//! ```text
//!  Idle ──reload()──▶ RequestToReload ──fetch──▶ FullReloadProcessing ─┐
//!   │ ▲                                                                 │
//!   │ └────────────── completed ◀── LoadMoreProcessing ◀──fetch── Idle  │
//!   │ ▲                                                                 │
//!   │ └────────────────────────────── completed ◀───────────────────────┘
//!   └──fetch_detail──▶ LoadDetailsProcessing ──completed──▶ IdleDetails
//!
//!  any in-flight state ──error──▶ Error ──force_idle()──▶ Idle
//! ```

mod controller;
mod events;
mod types;

pub use controller::PaginationController;
pub use events::ListEvent;
pub use types::{
    ListOptions, LoadingError, LoadingStatus, PageRequest, PaginationMeta,
    HEADER_CURRENT_PAGE, HEADER_PAGE_COUNT, HEADER_PER_PAGE, HEADER_TOTAL_COUNT,
};
