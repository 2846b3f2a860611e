//! JSON codec with a wire field-naming convention.
//!
//! # Design
//! Values go through `serde_json::Value` so object keys can be rewritten at
//! the boundary: camelCase in memory becomes snake_case on the wire. Decoding
//! first maps the wire keys onto `T` as they are, which covers plain
//! snake_case structs and free-form maps; only if that fails are the keys
//! converted to camelCase and the decode retried, for types declared with
//! `#[serde(rename_all = "camelCase")]`. A camelCase type whose fields are all
//! optional decodes on the first attempt with those fields empty, so such
//! types should use snake_case field names. The codec holds no state beyond
//! its convention and is `Copy`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ApiError, Result};
use crate::types::ApiResponse;

/// How object keys are mapped between memory and the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyConvention {
    /// camelCase in memory, snake_case on the wire.
    #[default]
    SnakeCase,
    /// Serde names are written and read unchanged.
    Verbatim,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec {
    convention: KeyConvention,
}

impl JsonCodec {
    pub fn new(convention: KeyConvention) -> Self {
        Self { convention }
    }

    pub fn convention(&self) -> KeyConvention {
        self.convention
    }

    pub fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        let value = serde_json::to_value(value).map_err(|e| ApiError::Encoding(e.to_string()))?;
        let value = match self.convention {
            KeyConvention::SnakeCase => rewrite_keys(value, &to_snake_case),
            KeyConvention::Verbatim => value,
        };
        serde_json::to_vec(&value).map_err(|e| ApiError::Encoding(e.to_string()))
    }

    pub fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| ApiError::Decoding(e.to_string()))?;
        match self.convention {
            KeyConvention::Verbatim => {
                serde_json::from_value(value).map_err(|e| ApiError::Decoding(e.to_string()))
            }
            KeyConvention::SnakeCase => match serde_json::from_value(value.clone()) {
                Ok(decoded) => Ok(decoded),
                Err(e) => serde_json::from_value(rewrite_keys(value, &to_camel_case))
                    .map_err(|_| ApiError::Decoding(e.to_string())),
            },
        }
    }

    /// Decode `{"data": T}` and return the inner value. Other envelope
    /// fields are ignored.
    pub fn decode_envelope<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        self.decode::<ApiResponse<T>>(bytes).map(|envelope| envelope.data)
    }
}

fn rewrite_keys(value: Value, convert: &dyn Fn(&str) -> String) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (convert(&key), rewrite_keys(value, convert)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| rewrite_keys(item, convert))
                .collect(),
        ),
        other => other,
    }
}

/// `userId` -> `user_id`, `myURLValue` -> `my_url_value`.
///
/// A word boundary sits before an uppercase letter that follows a lowercase
/// letter or digit, and before the last uppercase letter of an acronym that
/// is followed by a lowercase letter.
pub fn to_snake_case(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let mut out = String::with_capacity(key.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary {
                out.push('_');
            }
        }
        out.extend(c.to_lowercase());
    }
    out
}

/// `user_id` -> `userId`. Leading and trailing underscores are kept; keys
/// without an inner underscore are returned unchanged.
pub fn to_camel_case(key: &str) -> String {
    let start = key.len() - key.trim_start_matches('_').len();
    let end = key.trim_end_matches('_').len();
    if start >= end {
        return key.to_string();
    }
    let core = &key[start..end];
    if !core.contains('_') {
        return key.to_string();
    }

    let mut out = String::with_capacity(key.len());
    out.push_str(&key[..start]);
    let mut words = core.split('_').filter(|word| !word.is_empty());
    if let Some(first) = words.next() {
        out.push_str(first);
    }
    for word in words {
        let mut chars = word.chars();
        if let Some(head) = chars.next() {
            out.extend(head.to_uppercase());
            out.push_str(&chars.as_str().to_lowercase());
        }
    }
    out.push_str(&key[end..]);
    out
}
