//! Decoder types and traits
//!
//! Defines the core decoder abstractions.

use super::decoders::{JsonDecoder, XmlDecoder};
use crate::error::Result;
use crate::types::{AcceptFormat, JsonObject};

/// Default XML element wrapping each record of a list payload
pub const DEFAULT_XML_RECORD_ELEMENT: &str = "item";

/// Configuration for decoding responses
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Response format
    pub format: AcceptFormat,
    /// Dot path to the record array inside a JSON envelope
    pub record_path: Option<String>,
    /// XML element name for records
    pub xml_record_element: Option<String>,
}

impl DecoderConfig {
    /// Create a JSON decoder config
    pub fn json() -> Self {
        Self {
            format: AcceptFormat::Json,
            ..Default::default()
        }
    }

    /// Create a JSON decoder config with a record path
    pub fn json_with_path(path: impl Into<String>) -> Self {
        Self {
            format: AcceptFormat::Json,
            record_path: Some(path.into()),
            ..Default::default()
        }
    }

    /// Create an XML decoder config
    pub fn xml(record_element: impl Into<String>) -> Self {
        Self {
            format: AcceptFormat::Xml,
            xml_record_element: Some(record_element.into()),
            ..Default::default()
        }
    }

    /// Set the format, keeping paths
    #[must_use]
    pub fn with_format(mut self, format: AcceptFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the record path
    #[must_use]
    pub fn with_record_path(mut self, path: impl Into<String>) -> Self {
        self.record_path = Some(path.into());
        self
    }

    /// Build the decoder for this configuration
    pub fn build(&self) -> Box<dyn PayloadDecoder> {
        match self.format {
            AcceptFormat::Json => match &self.record_path {
                Some(path) => Box::new(JsonDecoder::with_path(path.clone())),
                None => Box::new(JsonDecoder::new()),
            },
            AcceptFormat::Xml => Box::new(XmlDecoder::with_element(
                self.xml_record_element
                    .clone()
                    .unwrap_or_else(|| DEFAULT_XML_RECORD_ELEMENT.to_string()),
            )),
        }
    }
}

/// Trait for decoding response bodies into field maps
pub trait PayloadDecoder: Send + Sync + std::fmt::Debug {
    /// Decode a list payload into one field map per record
    fn decode_list(&self, body: &str) -> Result<Vec<JsonObject>>;

    /// Decode an object payload into a single field map
    fn decode_object(&self, body: &str) -> Result<JsonObject>;
}
