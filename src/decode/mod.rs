//! Payload decoder module
//!
//! Supports: JSON, XML
//!
//! # Overview
//!
//! Page responses decode to a sequence of field maps, detail responses to a
//! single field map. The decoder is chosen from the accept format the list
//! requests from the server.

mod decoders;
mod types;

pub use decoders::{JsonDecoder, XmlDecoder};
pub use types::{DecoderConfig, PayloadDecoder, DEFAULT_XML_RECORD_ELEMENT};
