//! Schema discovery module
//!
//! Discovers the field names a collection exposes and assigns each a stable
//! numeric role, for consumers that address fields positionally.
//!
//! # Overview
//!
//! The registry is populated once, from the first record of the first
//! non-empty page, and frozen afterwards. Later records with a different
//! shape neither add nor remove roles.

mod registry;

pub use registry::{Role, SchemaRegistry, FIRST_ROLE};
