//! Common types used throughout Solidafy RestList
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type, keeps the field order of the decoded payload
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Generic key-value map with string keys and values
pub type StringMap = HashMap<String, String>;

// ============================================================================
// Accept Format
// ============================================================================

/// Representation requested from the server through the `Accept` header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AcceptFormat {
    /// `application/json`
    #[default]
    Json,
    /// `application/xml`
    Xml,
}

impl AcceptFormat {
    /// MIME type sent in the `Accept` header
    pub fn mime(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Xml => "application/xml",
        }
    }
}

// ============================================================================
// Utilities
// ============================================================================

/// Render a scalar JSON value as the text used for identity and query strings
///
/// Strings are returned as-is, numbers and booleans in their JSON spelling.
/// Null, arrays and objects have no textual identity.
pub fn value_to_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        JsonValue::Null | JsonValue::Array(_) | JsonValue::Object(_) => None,
    }
}
