//! YAML Loader module
//!
//! Parse resource definitions from YAML files.
//!
//! # Overview
//!
//! The loader module provides:
//! - `ResourceDefinition` - Declarative description of one paginated collection
//! - YAML parsing with validation
//! - Conversion into [`ListOptions`](crate::pagination::ListOptions) and a
//!   [`RestClient`](crate::http::RestClient)

mod parser;
mod types;

pub use parser::{load_resource, load_resource_from_str, validate_resource};
pub use types::{QueryParamsDefinition, ResourceDefinition};
