//! Request descriptors and argument resolution.
//!
//! [`RequestBuilder`] turns one method's [`MethodMetadata`] and the live call
//! arguments into a [`RequestDescriptor`]. Resolution is pure: no I/O, no
//! shared state, identical inputs always give identical descriptors.
//!
//! # Example
//!
//! ```
//! use courier_core::{MethodMetadata, RequestBuilder, args};
//!
//! let meta = MethodMetadata::get("/users/{id}")
//!     .header_param(0, "X-Token")
//!     .path_param(1, "id");
//!
//! let request = RequestBuilder::new("get_user", &meta)
//!     .build("http://localhost:8080/api/v1/users/{id}", &args!["token", 42]?)?;
//!
//! assert_eq!(request.url(), "http://localhost:8080/api/v1/users/42");
//! assert_eq!(request.header("X-Token"), Some("token"));
//! # Ok::<(), courier_core::Error>(())
//! ```

use std::collections::BTreeMap;

use bytes::Bytes;
use serde_json::{Map, Value};

use crate::{
    ContentType, Error, Method, MethodMetadata, Result, is_truthy, to_form, to_json,
    to_param_string, to_query_pairs,
};

/// Request body after content-type resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// The argument as given; the transport serializes it (JSON by default).
    Json(Value),
    /// An `application/x-www-form-urlencoded` string.
    Form(String),
}

/// A fully resolved outgoing request.
///
/// Built fresh for every call and never shared between calls.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    verb: Method,
    url: String,
    headers: BTreeMap<String, String>,
    query_params: Map<String, Value>,
    body: Option<Body>,
}

impl RequestDescriptor {
    /// Creates an empty descriptor.
    #[must_use]
    pub fn new(verb: Method, url: impl Into<String>) -> Self {
        Self {
            verb,
            url: url.into(),
            headers: BTreeMap::new(),
            query_params: Map::new(),
            body: None,
        }
    }

    /// Replaces the verb.
    #[must_use]
    pub fn with_verb(mut self, verb: Method) -> Self {
        self.verb = verb;
        self
    }

    /// Sets a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets a query parameter.
    #[must_use]
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query_params.insert(name.into(), value.into());
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: Body) -> Self {
        self.body = Some(body);
        self
    }

    /// HTTP verb.
    #[must_use]
    pub const fn verb(&self) -> Method {
        self.verb
    }

    /// URL with path parameters substituted, without the query string.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Request headers.
    #[must_use]
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Mutable access to headers.
    #[must_use]
    pub fn headers_mut(&mut self) -> &mut BTreeMap<String, String> {
        &mut self.headers
    }

    /// Single header value by exact name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// The `Content-Type` header, matched case-insensitively.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        content_type(&self.headers)
    }

    /// Query parameters.
    #[must_use]
    pub fn query_params(&self) -> &Map<String, Value> {
        &self.query_params
    }

    /// Request body.
    #[must_use]
    pub const fn body(&self) -> Option<&Body> {
        self.body.as_ref()
    }

    /// Parses the URL and appends the query parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] when the endpoint does not form a valid URL.
    pub fn to_url(&self) -> Result<url::Url> {
        let mut url = url::Url::parse(&self.url)?;
        if !self.query_params.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(to_query_pairs(&self.query_params));
        }
        Ok(url)
    }

    /// Serializes the body for the wire.
    ///
    /// JSON bodies are encoded as JSON, except a string value sent with an
    /// explicit non-JSON content type, which goes out verbatim. Form bodies
    /// are already encoded.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn body_bytes(&self) -> Result<Option<Bytes>> {
        let bytes = match &self.body {
            None => return Ok(None),
            Some(Body::Form(form)) => Bytes::from(form.clone()),
            Some(Body::Json(Value::String(raw)))
                if self
                    .content_type()
                    .is_some_and(|ct| !ContentType::Json.matches(ct)) =>
            {
                Bytes::from(raw.clone())
            }
            Some(Body::Json(value)) => to_json(value)?,
        };
        Ok(Some(bytes))
    }

    /// Consume into (verb, url, headers, query params, body).
    #[must_use]
    pub fn into_parts(
        self,
    ) -> (
        Method,
        String,
        BTreeMap<String, String>,
        Map<String, Value>,
        Option<Body>,
    ) {
        (
            self.verb,
            self.url,
            self.headers,
            self.query_params,
            self.body,
        )
    }
}

fn content_type(headers: &BTreeMap<String, String>) -> Option<&str> {
    headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(ContentType::HEADER))
        .map(|(_, value)| value.as_str())
}

/// Resolves the arguments of one call against one method's metadata.
#[derive(Debug, Clone, Copy)]
pub struct RequestBuilder<'a> {
    method_name: &'a str,
    metadata: &'a MethodMetadata,
}

impl<'a> RequestBuilder<'a> {
    /// Creates a builder for the method `method_name`.
    #[must_use]
    pub const fn new(method_name: &'a str, metadata: &'a MethodMetadata) -> Self {
        Self {
            method_name,
            metadata,
        }
    }

    /// Builds the descriptor for `args`, starting from the full URL template
    /// (`endpoint + base path + path template`).
    ///
    /// Only the first occurrence of each bound `{name}` placeholder is
    /// substituted; unbound placeholders are left in the URL as is.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingArgument`] if a binding points past the end of `args`
    /// - [`Error::InvalidArgument`] if the query map is not an object, or a
    ///   form body is not an object
    pub fn build(&self, url_template: &str, args: &[Value]) -> Result<RequestDescriptor> {
        let mut url = url_template.to_string();
        for (&position, name) in self.metadata.path_params() {
            let value = to_param_string(self.arg(args, position)?);
            url = url.replacen(&format!("{{{name}}}"), &value, 1);
        }

        let mut headers = self.metadata.static_headers().clone();
        for (&position, name) in self.metadata.header_params() {
            let value = self.arg(args, position)?;
            headers.retain(|key, _| !key.eq_ignore_ascii_case(name));
            if !value.is_null() {
                headers.insert(name.clone(), to_param_string(value));
            }
        }

        let mut query_params = Map::new();
        if let Some(position) = self.metadata.query_map_position() {
            match self.arg(args, position)? {
                Value::Object(map) => query_params.extend(
                    map.iter()
                        .filter(|(_, value)| is_truthy(value))
                        .map(|(key, value)| (key.clone(), value.clone())),
                ),
                Value::Null => {}
                other => {
                    return Err(Error::invalid_argument(format!(
                        "query map of `{}` must be an object, got {other}",
                        self.method_name
                    )));
                }
            }
        }

        let body = match self.metadata.body_position() {
            Some(position) => Some(resolve_body(&headers, self.arg(args, position)?)?),
            None => None,
        };

        Ok(RequestDescriptor {
            verb: self.metadata.verb(),
            url,
            headers,
            query_params,
            body,
        })
    }

    fn arg<'v>(&self, args: &'v [Value], position: usize) -> Result<&'v Value> {
        args.get(position)
            .ok_or_else(|| Error::missing_argument(self.method_name, position))
    }
}

fn resolve_body(headers: &BTreeMap<String, String>, value: &Value) -> Result<Body> {
    match content_type(headers) {
        Some(ct) if ContentType::FormUrlEncoded.matches(ct) => Ok(Body::Form(to_form(value)?)),
        _ => Ok(Body::Json(value.clone())),
    }
}
