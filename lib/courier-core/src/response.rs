//! What a transport hands back for a sent [`RequestDescriptor`].
//!
//! A [`Response`] keeps the effective request next to the status, headers
//! and raw body, so callers can see exactly what went over the wire after
//! middleware ran.
//!
//! ```ignore
//! let response = users.create_user(TOKEN, &jane).await?;
//! assert_eq!(response.request().url(), "http://localhost:8080/api/v1/users");
//! let user: User = response.json()?;
//! ```

use std::borrow::Cow;
use std::collections::HashMap;

use bytes::Bytes;
use http::StatusCode;

use crate::RequestDescriptor;

/// A received response and the request that produced it.
#[derive(Debug, Clone)]
pub struct Response {
    request: RequestDescriptor,
    status: StatusCode,
    headers: HashMap<String, String>,
    body: Bytes,
}

impl Response {
    /// Pairs a received status, headers and body with the request that was sent.
    #[must_use]
    pub fn new(
        request: RequestDescriptor,
        status: StatusCode,
        headers: HashMap<String, String>,
        body: Bytes,
    ) -> Self {
        Self {
            request,
            status,
            headers,
            body,
        }
    }

    /// The effective request, as resolved and sent.
    #[must_use]
    pub const fn request(&self) -> &RequestDescriptor {
        &self.request
    }

    /// Status code.
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status.as_u16()
    }

    /// 2xx.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Response headers as received.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Looks a header up regardless of name case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find_map(|(key, value)| key.eq_ignore_ascii_case(name).then_some(value.as_str()))
    }

    /// Raw body.
    #[must_use]
    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    /// Decodes the body as JSON. Failures carry the path of the bad field.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> crate::Result<T> {
        crate::from_json(&self.body)
    }

    /// The body as text, with invalid UTF-8 replaced.
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Method;

    fn response(status: StatusCode, body: &'static str) -> Response {
        let request = RequestDescriptor::new(Method::Post, "http://localhost/users");
        let headers = HashMap::from([(
            "Content-Type".to_string(),
            "application/json".to_string(),
        )]);
        Response::new(request, status, headers, Bytes::from_static(body.as_bytes()))
    }

    #[test]
    fn response_keeps_effective_request() {
        let response = response(StatusCode::CREATED, "{}");

        assert_eq!(response.status(), 201);
        assert!(response.is_success());
        assert_eq!(response.request().verb(), Method::Post);
        assert_eq!(response.request().url(), "http://localhost/users");
    }

    #[test]
    fn response_header_lookup_ignores_case() {
        let response = response(StatusCode::OK, "");
        assert_eq!(response.header("content-type"), Some("application/json"));
        assert_eq!(response.header("CONTENT-TYPE"), Some("application/json"));
        assert_eq!(response.header("x-missing"), None);
    }

    #[test]
    fn response_unvalidated_failure_is_not_success() {
        let response = response(StatusCode::SERVICE_UNAVAILABLE, "");
        assert!(!response.is_success());
        assert_eq!(response.status(), 503);
    }

    #[test]
    fn response_json() {
        #[derive(Debug, PartialEq, serde::Deserialize)]
        struct User {
            id: u64,
            name: String,
        }

        let response = response(StatusCode::OK, r#"{"id":1,"name":"test"}"#);

        let user: User = response.json().expect("deserialize");
        assert_eq!(
            user,
            User {
                id: 1,
                name: "test".to_string()
            }
        );
    }

    #[test]
    fn response_json_error_names_field() {
        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct User {
            id: u64,
        }

        let err = response(StatusCode::OK, r#"{"id":"one"}"#)
            .json::<User>()
            .expect_err("id is not a number");
        assert!(matches!(err, crate::Error::JsonDeserialization { ref path, .. } if path == "id"));
    }

    #[test]
    fn response_text() {
        assert_eq!(response(StatusCode::OK, "Hello, World!").text(), "Hello, World!");
    }
}
