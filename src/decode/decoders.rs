//! Decoder implementations
//!
//! Each decoder handles a specific response format.

use super::types::{PayloadDecoder, DEFAULT_XML_RECORD_ELEMENT};
use crate::error::{Error, Result};
use crate::types::JsonObject;
use serde_json::{Map, Value};
use tracing::warn;

// ============================================================================
// JSON Decoder
// ============================================================================

/// JSON decoder with optional record path extraction
#[derive(Debug, Clone, Default)]
pub struct JsonDecoder {
    /// Dot path to the record array
    record_path: Option<String>,
}

impl JsonDecoder {
    /// Create a new JSON decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a JSON decoder with a record path
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            record_path: Some(path.into()),
        }
    }

    fn parse(body: &str) -> Result<Value> {
        serde_json::from_str(body).map_err(|e| Error::Decode {
            message: format!("Failed to parse JSON: {e}"),
        })
    }

    /// Extract records from a JSON value using the record path
    fn extract_records(&self, value: Value) -> Result<Vec<Value>> {
        match &self.record_path {
            Some(path) => match extract_simple_path(&value, path) {
                Some(Value::Array(arr)) => Ok(arr),
                Some(Value::Null) | None => Ok(vec![]),
                Some(other) => Err(Error::RecordExtraction {
                    path: path.clone(),
                    message: format!("expected an array, found {}", json_kind(&other)),
                }),
            },
            None => match value {
                Value::Array(arr) => Ok(arr),
                other => Err(Error::decode(format!(
                    "Expected a list payload, found {}",
                    json_kind(&other)
                ))),
            },
        }
    }
}

impl PayloadDecoder for JsonDecoder {
    fn decode_list(&self, body: &str) -> Result<Vec<JsonObject>> {
        let value = Self::parse(body)?;
        let records = self.extract_records(value)?;
        Ok(into_objects(records))
    }

    fn decode_object(&self, body: &str) -> Result<JsonObject> {
        match Self::parse(body)? {
            Value::Object(map) => Ok(map),
            other => Err(Error::decode(format!(
                "Expected an object payload, found {}",
                json_kind(&other)
            ))),
        }
    }
}

// ============================================================================
// XML Decoder
// ============================================================================

/// XML decoder with record element extraction
///
/// `<response><item>..</item><item>..</item></response>` is a list payload;
/// the children of the root element form an object payload.
#[derive(Debug, Clone)]
pub struct XmlDecoder {
    /// Element name wrapping each record
    record_element: String,
}

impl Default for XmlDecoder {
    fn default() -> Self {
        Self {
            record_element: DEFAULT_XML_RECORD_ELEMENT.to_string(),
        }
    }
}

impl XmlDecoder {
    /// Create a new XML decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an XML decoder with a record element name
    pub fn with_element(element: impl Into<String>) -> Self {
        Self {
            record_element: element.into(),
        }
    }
}

impl PayloadDecoder for XmlDecoder {
    fn decode_list(&self, body: &str) -> Result<Vec<JsonObject>> {
        let root = xml_to_json(body)?;
        let records = match root {
            Value::Object(mut map) => match map.remove(&self.record_element) {
                Some(Value::Array(arr)) => arr,
                Some(Value::Null) | None => vec![],
                Some(single) => vec![single],
            },
            _ => vec![],
        };
        Ok(into_objects(records))
    }

    fn decode_object(&self, body: &str) -> Result<JsonObject> {
        match xml_to_json(body)? {
            Value::Object(map) => Ok(map),
            other => Err(Error::xml(format!(
                "Expected child elements in object payload, found {}",
                json_kind(&other)
            ))),
        }
    }
}

/// Convert an XML document into JSON, dropping the root element name
fn xml_to_json(xml: &str) -> Result<Value> {
    let xml = skip_misc(xml);

    if !xml.starts_with('<') {
        return Err(Error::xml("Input does not appear to be XML"));
    }

    parse_xml_element(xml).map(|(_, value, _)| value)
}

/// Skip whitespace, declarations and comments before markup
fn skip_misc(mut input: &str) -> &str {
    loop {
        input = input.trim_start();
        if input.starts_with("<?") {
            match input.find("?>") {
                Some(end) => input = &input[end + 2..],
                None => return input,
            }
        } else if input.starts_with("<!--") {
            match input.find("-->") {
                Some(end) => input = &input[end + 3..],
                None => return input,
            }
        } else {
            return input;
        }
    }
}

/// Parse one element, returning its name, JSON value and the remaining input
fn parse_xml_element(input: &str) -> Result<(&str, Value, &str)> {
    let open_end = input
        .find('>')
        .ok_or_else(|| Error::xml("Malformed tag: missing '>'"))?;
    let open_tag = &input[1..open_end];

    let self_closing = open_tag.ends_with('/');
    let tag_name = open_tag
        .trim_end_matches('/')
        .split_whitespace()
        .next()
        .ok_or_else(|| Error::xml("Empty tag name"))?;

    let mut rest = &input[open_end + 1..];
    if self_closing {
        return Ok((tag_name, Value::Null, rest));
    }

    let mut obj = Map::new();
    let mut text = String::new();

    loop {
        rest = skip_misc(rest);

        if let Some(after) = rest.strip_prefix("</") {
            let close_end = after
                .find('>')
                .ok_or_else(|| Error::xml(format!("Malformed closing tag for {tag_name}")))?;
            let close_name = after[..close_end].trim();
            if close_name != tag_name {
                return Err(Error::xml(format!(
                    "Mismatched closing tag: expected </{tag_name}>, found </{close_name}>"
                )));
            }
            let remaining = &after[close_end + 1..];

            let value = if !obj.is_empty() {
                Value::Object(obj)
            } else if text.trim().is_empty() {
                Value::Null
            } else {
                parse_text_value(&unescape(text.trim()))
            };
            return Ok((tag_name, value, remaining));
        }

        if rest.starts_with('<') {
            let (child_tag, child_value, after) = parse_xml_element(rest)?;

            // Repeated elements become arrays
            match obj.get_mut(child_tag) {
                Some(Value::Array(arr)) => arr.push(child_value),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, child_value]);
                }
                None => {
                    obj.insert(child_tag.to_string(), child_value);
                }
            }

            rest = after;
            continue;
        }

        match rest.find('<') {
            Some(pos) => {
                text.push_str(&rest[..pos]);
                rest = &rest[pos..];
            }
            None => {
                return Err(Error::xml(format!("Missing closing tag for {tag_name}")));
            }
        }
    }
}

/// Replace the predefined XML entities
fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Parse text content into appropriate JSON value
fn parse_text_value(text: &str) -> Value {
    // Integers only when the text round-trips, so "007" stays a string
    if let Ok(n) = text.parse::<i64>() {
        if n.to_string() == text {
            return Value::Number(n.into());
        }
    }

    if text.contains('.') {
        if let Ok(n) = text.parse::<f64>() {
            if let Some(num) = serde_json::Number::from_f64(n) {
                return Value::Number(num);
            }
        }
    }

    match text {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::String(text.to_string()),
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Keep object entries, skipping anything else
fn into_objects(records: Vec<Value>) -> Vec<JsonObject> {
    records
        .into_iter()
        .filter_map(|record| match record {
            Value::Object(map) => Some(map),
            other => {
                warn!("Skipping non-object record: {}", json_kind(&other));
                None
            }
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Extract a value using simple dot-notation path
fn extract_simple_path(value: &Value, path: &str) -> Option<Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    if path.is_empty() || path == "$" {
        return Some(value.clone());
    }

    let mut current = value;
    for part in path.split('.') {
        // Handle array indexing like "data[0]" or "items[-1]"
        if let Some(bracket_pos) = part.find('[') {
            let name = &part[..bracket_pos];
            let index_str = part[bracket_pos + 1..].strip_suffix(']')?;

            if !name.is_empty() {
                current = current.get(name)?;
            }

            let index = index_str.parse::<i64>().ok()?;
            let Value::Array(arr) = current else {
                return None;
            };
            #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            let idx = if index < 0 {
                usize::try_from(arr.len() as i64 + index).ok()?
            } else {
                index as usize
            };
            current = arr.get(idx)?;
        } else {
            current = current.get(part)?;
        }
    }

    Some(current.clone())
}
