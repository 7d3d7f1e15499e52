//! Response validation for Sim API pages.
//!
//! The page envelope (`next_offset` plus the record array) is checked here so
//! every failure can name where it happened. Individual records deserialize
//! through the serde models in `dune_store`, which carry the defaults for
//! optional fields.

pub mod activity;
pub mod transactions;

use std::{error::Error, fmt};

use dune_store::models::Page;
use dune_store::schema::FIELD_NEXT_OFFSET;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::client::PageBody;

pub use activity::parse_activity_page;
pub use transactions::parse_transactions_page;

/// A page body that does not match the expected schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    path: String,
    reason: String,
}

impl SchemaError {
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "invalid Sim API response: {}", self.reason)
        } else {
            write!(f, "invalid Sim API response at {}: {}", self.path, self.reason)
        }
    }
}

impl Error for SchemaError {}

/// Validates the envelope of a paged response and deserializes each record
/// under `records_key`.
fn parse_page<T: DeserializeOwned>(
    body: &PageBody,
    records_key: &str,
) -> Result<Page<T>, SchemaError> {
    let root = root_object(body)?;

    let next_offset = match present(root, FIELD_NEXT_OFFSET) {
        None => String::new(),
        Some(Value::String(offset)) => offset.clone(),
        Some(other) => return Err(mistyped(FIELD_NEXT_OFFSET, "a string", other)),
    };

    let items: &[Value] = match present(root, records_key) {
        None => &[],
        Some(Value::Array(items)) => items,
        Some(other) => return Err(mistyped(records_key, "an array", other)),
    };

    let records = items
        .iter()
        .enumerate()
        .map(|(index, item)| parse_record(item, format!("{records_key}[{index}]")))
        .collect::<Result<Vec<T>, _>>()?;

    Ok(Page::new(records, next_offset))
}

fn root_object(body: &PageBody) -> Result<&Map<String, Value>, SchemaError> {
    match body {
        PageBody::Json(Value::Object(object)) => Ok(object),
        PageBody::Json(other) => Err(SchemaError::new(
            "",
            format!("expected an object, got {}", kind(other)),
        )),
        PageBody::Text(text) => Err(SchemaError::new(
            "",
            format!("expected a JSON object, got a text body ({} bytes)", text.len()),
        )),
    }
}

fn parse_record<T: DeserializeOwned>(item: &Value, path: String) -> Result<T, SchemaError> {
    if !item.is_object() {
        return Err(SchemaError::new(
            path,
            format!("expected an object, got {}", kind(item)),
        ));
    }
    T::deserialize(item).map_err(|err| SchemaError::new(path, err.to_string()))
}

/// Null counts as absent.
fn present<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    object.get(key).filter(|value| !value.is_null())
}

fn mistyped(key: &str, expected: &str, got: &Value) -> SchemaError {
    SchemaError::new(key, format!("expected {expected}, got {}", kind(got)))
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
