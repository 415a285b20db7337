//! HTTP client module
//!
//! Provides the reqwest-backed [`ResourceStrategy`](crate::resource::ResourceStrategy)
//! for paginated REST collections.
//!
//! # Features
//!
//! - **Yii2-style query**: `page`, `per-page`, `sort`, `fields` plus filters, all renameable
//! - **Content negotiation**: `Accept` follows the list's JSON/XML setting
//! - **Pagination headers**: `X-Pagination-*` parsed into [`PaginationMeta`](crate::pagination::PaginationMeta)

mod client;

pub use client::{
    default_detail_path, PreProcessFn, QueryParamNames, RestClient, RestClientConfig,
    RestClientConfigBuilder, ID_PLACEHOLDER,
};

#[cfg(test)]
mod tests;
