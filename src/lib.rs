// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Solidafy RestList
//!
//! Incrementally loaded list models over paginated HATEOAS REST collections.
//!
//! ## Features
//!
//! - **Load on demand**: full reloads and page-by-page appends, one fetch in flight
//! - **Schema discovery**: field names from the first record become stable numeric roles
//! - **Detail merge**: fetch one item's full representation and merge it in place
//! - **Detail view**: a filtered projection holding only the selected item
//! - **JSON and XML**: decoder follows the requested `Accept` format
//! - **Pluggable transport**: any [`ResourceStrategy`](resource::ResourceStrategy), reqwest by default
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use solidafy_restlist::{load_resource, PaginationController, Result};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let resource = load_resource("users.yaml")?;
//!     let mut list = PaginationController::new(
//!         Arc::new(resource.client()?),
//!         resource.list_options(),
//!     );
//!
//!     list.reload();
//!     list.fetch_more().await;
//!     while list.can_fetch_more() {
//!         list.fetch_more().await;
//!     }
//!
//!     list.fetch_detail("42").await;
//!     println!("{:?}", list.detail_view().first());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    PaginationController                         │
//! │  reload()  fetch_more()  fetch_detail(id)  force_idle()         │
//! │  status · error · counters · events                             │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬───────────┬─────────────┐
//! │ Strategy │  Decode   │    Records    │  Schema   │   Detail    │
//! ├──────────┼───────────┼───────────────┼───────────┼─────────────┤
//! │ REST     │ JSON      │ ItemRecord    │ Roles     │ Fetcher     │
//! │ Custom   │ XML       │ RecordStore   │ Frozen    │ FilterView  │
//! └──────────┴───────────┴───────────────┴───────────┴─────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types and the controller-facing error codes
pub mod error;

/// Common types and type aliases
pub mod types;

/// Item records and the collection
pub mod record;

/// Field discovery and role assignment
pub mod schema;

/// Response decoders (JSON, XML)
pub mod decode;

/// List controller, loading status and pagination metadata
pub mod pagination;

/// Detail fetching and the detail filter view
pub mod detail;

/// Per-resource strategy seam
pub mod resource;

/// REST client strategy
pub mod http;

/// YAML loader for resource definitions
pub mod loader;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, ErrorCode, Result};
pub use types::*;

// Re-export commonly used types
pub use detail::{DetailRequest, DetailView};
pub use http::{RestClient, RestClientConfig};
pub use loader::{load_resource, load_resource_from_str, ResourceDefinition};
pub use pagination::{
    ListEvent, ListOptions, LoadingStatus, PageRequest, PaginationController, PaginationMeta,
};
pub use record::{ItemRecord, RecordStore};
pub use resource::{Reply, ResourceStrategy};
pub use schema::{Role, SchemaRegistry};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
