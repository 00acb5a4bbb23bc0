//! Error types for courier.
//!
//! Request construction fails synchronously, before any network I/O
//! ([`Error::MetadataMissing`], [`Error::MissingArgument`],
//! [`Error::InvalidArgument`]). Transport failures are surfaced unchanged
//! through the future returned by the call.

use bytes::Bytes;
use derive_more::{Display, Error, From};

/// Everything a courier call can fail with.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// An intercepted method has no metadata entry.
    #[display("no HTTP metadata for method `{method}` of service `{service}`")]
    #[from(skip)]
    MetadataMissing {
        /// Service type name.
        service: String,
        /// Method name.
        method: String,
    },

    /// A binding refers to a position beyond the supplied arguments.
    #[display("method `{method}` expects an argument at position {position}")]
    #[from(skip)]
    MissingArgument {
        /// Method name.
        method: String,
        /// Argument position required by the binding.
        position: usize,
    },

    /// A call argument has the wrong shape for its role.
    #[display("invalid argument: {_0}")]
    #[from(skip)]
    InvalidArgument(#[error(not(source))] String),

    /// The server answered outside of 2xx and status validation is on.
    #[display("server answered {status} {reason}")]
    #[from(skip)]
    Http {
        /// Status code.
        status: u16,
        /// Canonical reason phrase, empty for unknown codes.
        reason: String,
        /// Raw response body, possibly empty.
        #[error(not(source))]
        body: Bytes,
    },

    /// The connection could not be opened or broke mid-exchange.
    #[display("connection failed: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS handshake or certificate failure.
    #[display("TLS failure: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// No response within the transport timeout.
    #[display("timed out waiting for a response")]
    #[from(skip)]
    Timeout,

    /// The descriptor could not be turned into a wire request.
    #[display("cannot send request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// A JSON body could not be encoded.
    #[display("cannot encode JSON body: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),

    /// A response body did not match the expected type.
    #[display("cannot decode JSON at `{path}`: {message}")]
    #[from(skip)]
    JsonDeserialization {
        /// Path of the offending field, `.` for the root.
        path: String,
        /// Decoder message.
        message: String,
    },

    /// A form body could not be encoded.
    #[display("cannot encode form body: {_0}")]
    #[from]
    FormSerialization(serde_html_form::ser::Error),

    /// The endpoint and path do not form a valid URL.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// No metadata for `method` on `service`.
    #[must_use]
    pub fn metadata_missing(service: impl Into<String>, method: impl Into<String>) -> Self {
        Self::MetadataMissing {
            service: service.into(),
            method: method.into(),
        }
    }

    /// A binding points past the end of the call arguments.
    #[must_use]
    pub fn missing_argument(method: impl Into<String>, position: usize) -> Self {
        Self::MissingArgument {
            method: method.into(),
            position,
        }
    }

    /// An argument cannot play its bound role.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// A rejected response. The reason phrase comes from the status code.
    #[must_use]
    pub fn http(status: http::StatusCode, body: Bytes) -> Self {
        Self::Http {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        }
    }

    /// Connection failure.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// TLS failure.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// The descriptor cannot be sent as is.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Decode failure at `path`.
    #[must_use]
    pub fn json_deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::JsonDeserialization {
            path: path.into(),
            message: message.into(),
        }
    }

    /// The service has no metadata for the requested method.
    #[must_use]
    pub const fn is_metadata_missing(&self) -> bool {
        matches!(self, Self::MetadataMissing { .. })
    }

    /// No response arrived in time.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// The connection failed.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Status code of a rejected response.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The server rejected the request itself (4xx).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|s| (400..500).contains(&s))
    }

    /// Body of a rejected response, `None` when the server sent nothing.
    #[must_use]
    pub fn body(&self) -> Option<&Bytes> {
        match self {
            Self::Http { body, .. } if !body.is_empty() => Some(body),
            _ => None,
        }
    }

    /// Decodes the body of a rejected response as JSON, typically an API
    /// error payload.
    pub fn decode_body<T: serde::de::DeserializeOwned>(&self) -> Option<Result<T>> {
        self.body().map(|body| crate::from_json(body))
    }
}
