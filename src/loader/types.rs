//! Loader types
//!
//! Declarative resource definition types for YAML parsing.

use crate::decode::{DecoderConfig, DEFAULT_XML_RECORD_ELEMENT};
use crate::error::Result;
use crate::http::{default_detail_path, QueryParamNames, RestClient, RestClientConfig};
use crate::pagination::ListOptions;
use crate::types::AcceptFormat;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

// ============================================================================
// Resource Definition
// ============================================================================

/// One paginated REST collection and how to list it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ResourceDefinition {
    /// Resource name
    pub name: String,
    /// Base URL of the API
    pub base_url: String,
    /// Collection path
    pub path: String,
    /// Item path containing `{id}`, defaults to `<path>/{id}`
    #[serde(default)]
    pub detail_path: Option<String>,
    /// Field holding each record's identity
    #[serde(default = "default_id_field")]
    pub id_field: String,
    /// Page size
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    /// Sort expressions, `-field` for descending
    #[serde(default = "default_sort")]
    pub sort: Vec<String>,
    /// Filter key/value pairs sent as query parameters
    #[serde(default)]
    pub filters: BTreeMap<String, String>,
    /// Requested field subset
    #[serde(default)]
    pub fields: Vec<String>,
    /// Requested representation
    #[serde(default)]
    pub accept: AcceptFormat,
    /// Dot path to the record array inside a JSON envelope
    #[serde(default)]
    pub record_path: Option<String>,
    /// XML element wrapping each record
    #[serde(default = "default_xml_record_element")]
    pub xml_record_element: String,
    /// Headers sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Query parameter naming
    #[serde(default)]
    pub query_params: QueryParamsDefinition,
}

/// Query parameter names understood by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct QueryParamsDefinition {
    /// Page index parameter
    #[serde(default = "default_page_param")]
    pub page: String,
    /// Page size parameter
    #[serde(default = "default_per_page_param")]
    pub per_page: String,
    /// Sort parameter
    #[serde(default = "default_sort_param")]
    pub sort: String,
    /// Field subset parameter
    #[serde(default = "default_fields_param")]
    pub fields: String,
}

impl Default for QueryParamsDefinition {
    fn default() -> Self {
        Self {
            page: default_page_param(),
            per_page: default_per_page_param(),
            sort: default_sort_param(),
            fields: default_fields_param(),
        }
    }
}

fn default_id_field() -> String {
    "id".to_string()
}

fn default_per_page() -> u32 {
    20
}

fn default_sort() -> Vec<String> {
    vec!["-id".to_string()]
}

fn default_xml_record_element() -> String {
    DEFAULT_XML_RECORD_ELEMENT.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_page_param() -> String {
    "page".to_string()
}

fn default_per_page_param() -> String {
    "per-page".to_string()
}

fn default_sort_param() -> String {
    "sort".to_string()
}

fn default_fields_param() -> String {
    "fields".to_string()
}

// ============================================================================
// Conversions
// ============================================================================

impl ResourceDefinition {
    /// Item path, falling back to `<path>/{id}`
    pub fn detail_path(&self) -> String {
        self.detail_path
            .clone()
            .unwrap_or_else(|| default_detail_path(&self.path))
    }

    /// Payload decoding for this resource
    pub fn decoder_config(&self) -> DecoderConfig {
        DecoderConfig {
            format: self.accept,
            record_path: self.record_path.clone(),
            xml_record_element: Some(self.xml_record_element.clone()),
        }
    }

    /// Controller options for this resource
    pub fn list_options(&self) -> ListOptions {
        ListOptions::new()
            .with_id_field(self.id_field.clone())
            .with_sort(self.sort.clone())
            .with_per_page(self.per_page)
            .with_fields(self.fields.clone())
            .with_decoder(self.decoder_config())
            .with_filters(self.filters.clone())
    }

    /// HTTP client configuration for this resource
    pub fn client_config(&self) -> RestClientConfig {
        let names = QueryParamNames {
            page: self.query_params.page.clone(),
            per_page: self.query_params.per_page.clone(),
            sort: self.query_params.sort.clone(),
            fields: self.query_params.fields.clone(),
        };

        let mut builder = RestClientConfig::builder(self.base_url.clone(), self.path.clone())
            .detail_path(self.detail_path())
            .timeout(Duration::from_secs(self.timeout_secs))
            .query_params(names);
        for (key, value) in &self.headers {
            builder = builder.header(key.clone(), value.clone());
        }
        builder.build()
    }

    /// Build the REST strategy for this resource
    pub fn client(&self) -> Result<RestClient> {
        RestClient::new(self.client_config())
    }
}
