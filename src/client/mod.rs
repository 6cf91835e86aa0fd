//! Resource client layer: network access to collection endpoints

pub mod http;

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    error::FetchError,
    models::{record::json_type_name, Record, SearchQuery},
};

pub use http::HttpResourceClient;

/// How a list response wraps its records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CollectionShape {
    /// The body is the JSON array itself
    #[default]
    Array,
    /// The body is an object holding the array under this key
    Envelope(String),
}

impl CollectionShape {
    pub fn from_envelope(envelope: Option<&str>) -> Self {
        match envelope {
            Some(key) if !key.is_empty() => CollectionShape::Envelope(key.to_string()),
            _ => CollectionShape::Array,
        }
    }
}

/// Single-attempt I/O against a collection endpoint. Retries are a caller
/// concern.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResourceClient: Send + Sync {
    /// GET the collection at `url`
    async fn fetch_collection(
        &self,
        url: &str,
        query: &SearchQuery,
        shape: &CollectionShape,
    ) -> Result<Vec<Record>, FetchError>;

    /// POST one record to the collection at `url`, returning the created record
    async fn create_record(&self, url: &str, record: &Record) -> Result<Record, FetchError>;
}

/// Parse a list response body into records
pub fn decode_collection(body: &[u8], shape: &CollectionShape) -> Result<Vec<Record>, FetchError> {
    let value: Value = serde_json::from_slice(body)?;

    let items = match (shape, value) {
        (CollectionShape::Array, Value::Array(items)) => items,
        (CollectionShape::Envelope(key), Value::Object(mut map)) => match map.remove(key) {
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(FetchError::Decode(format!(
                    "expected '{}' to be an array, got {}",
                    key,
                    json_type_name(&other)
                )))
            }
            None => {
                return Err(FetchError::Decode(format!("missing '{}' in response", key)));
            }
        },
        (CollectionShape::Array, other) => {
            return Err(FetchError::Decode(format!(
                "expected a JSON array, got {}",
                json_type_name(&other)
            )))
        }
        (CollectionShape::Envelope(_), other) => {
            return Err(FetchError::Decode(format!(
                "expected a JSON object, got {}",
                json_type_name(&other)
            )))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            Record::try_from(item).map_err(|e| match e {
                FetchError::Decode(msg) => FetchError::Decode(format!("element {}: {}", idx, msg)),
                other => other,
            })
        })
        .collect()
}

/// Parse a single-record response body
pub fn decode_record(body: &[u8]) -> Result<Record, FetchError> {
    let value: Value = serde_json::from_slice(body)?;
    Record::try_from(value)
}
