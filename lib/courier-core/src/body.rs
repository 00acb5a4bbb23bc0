//! Body and parameter serialization utilities.

use bytes::Bytes;
use serde_json::{Map, Value};

use crate::{Error, Result, to_param_string};

/// Content type for request bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// JSON content type (`application/json`).
    Json,
    /// Form URL-encoded content type (`application/x-www-form-urlencoded`).
    FormUrlEncoded,
}

impl ContentType {
    /// Name of the header carrying the content type.
    pub const HEADER: &'static str = "Content-Type";

    /// Get the MIME type string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::FormUrlEncoded => "application/x-www-form-urlencoded",
        }
    }

    /// Returns `true` if a `Content-Type` header value denotes this type.
    ///
    /// Parameters such as `; charset=utf-8` are ignored and the comparison
    /// is case-insensitive.
    #[must_use]
    pub fn matches(&self, header_value: &str) -> bool {
        let essence = header_value
            .split_once(';')
            .map_or(header_value, |(essence, _)| essence);
        essence.trim().eq_ignore_ascii_case(self.as_str())
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Serialize a value to JSON bytes.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
///
/// # Example
///
/// ```
/// use courier_core::to_json;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct User { name: String, age: u32 }
///
/// let user = User { name: "Jane".to_string(), age: 18 };
/// let bytes = to_json(&user).expect("serialize");
/// assert_eq!(bytes.as_ref(), br#"{"name":"Jane","age":18}"#);
/// ```
pub fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<Bytes> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(Into::into)
}

/// Serialize an object into `application/x-www-form-urlencoded` text.
///
/// Nested objects are flattened as `parent[child]=value` and arrays as
/// `parent[index]=value`; `null` fields are sent with an empty value.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if the value is neither an object nor
/// `null`, or a serialization error if encoding fails.
///
/// # Example
///
/// ```
/// use courier_core::to_form;
/// use serde_json::json;
///
/// let form = to_form(&json!({"username": "test", "password": "123456"})).expect("form");
/// assert_eq!(form, "username=test&password=123456");
/// ```
pub fn to_form(value: &Value) -> Result<String> {
    let pairs = match value {
        Value::Object(map) => {
            let mut pairs = Vec::new();
            for (key, value) in map {
                flatten_form(key.clone(), value, &mut pairs);
            }
            pairs
        }
        Value::Null => Vec::new(),
        other => {
            return Err(Error::invalid_argument(format!(
                "form body must be an object, got {other}"
            )));
        }
    };
    serde_html_form::to_string(&pairs).map_err(Into::into)
}

fn flatten_form(key: String, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (child, value) in map {
                flatten_form(format!("{key}[{child}]"), value, pairs);
            }
        }
        Value::Array(items) => {
            for (index, value) in items.iter().enumerate() {
                flatten_form(format!("{key}[{index}]"), value, pairs);
            }
        }
        Value::Null => pairs.push((key, String::new())),
        other => pairs.push((key, to_param_string(other))),
    }
}

/// Expand resolved query parameters into `(name, value)` pairs.
///
/// Arrays produce one pair per element with a repeated name
/// (`tags=a&tags=b`, never `tags[]=a`), nested objects use bracket names.
#[must_use]
pub fn to_query_pairs(params: &Map<String, Value>) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (name, value) in params {
        match value {
            Value::Array(items) => {
                pairs.extend(items.iter().map(|item| (name.clone(), to_param_string(item))));
            }
            Value::Object(_) => flatten_form(name.clone(), value, &mut pairs),
            other => pairs.push((name.clone(), to_param_string(other))),
        }
    }
    pairs
}

/// Deserialize JSON bytes to a value with path-aware error messages.
///
/// Uses `serde_path_to_error` to provide detailed error messages that include
/// the exact path to the field that failed to deserialize.
///
/// # Errors
///
/// Returns an error if JSON deserialization fails, with the error message
/// including the path to the problematic field (e.g., "user.address.city").
///
/// # Example
///
/// ```
/// use courier_core::from_json;
/// use serde::Deserialize;
///
/// #[derive(Debug, PartialEq, Deserialize)]
/// struct User { name: String }
///
/// let bytes = br#"{"name":"Alice"}"#;
/// let user: User = from_json(bytes).expect("deserialize");
/// assert_eq!(user, User { name: "Alice".to_string() });
/// ```
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        crate::Error::json_deserialization(e.path().to_string(), e.inner().to_string())
    })
}
