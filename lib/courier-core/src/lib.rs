//! Core types for the courier metadata-driven HTTP service client.
//!
//! This crate provides the foundational types used by courier:
//! - [`Method`] - the six HTTP verbs a service method can declare
//! - [`ServiceMetadata`] and [`MethodMetadata`] - per-service metadata table
//! - [`CallArgs`], [`arg`] and [`args!`] - positional call arguments
//! - [`RequestBuilder`] - resolves call arguments into a [`RequestDescriptor`]
//! - [`Response`] - HTTP response with the effective request
//! - [`Error`] and [`Result`] - Error handling
//! - [`HttpTransport`] - transport trait with one entry point per verb
//! - [`StatusCode`] - HTTP status codes (re-exported from `http` crate)

mod body;
mod call_args;
mod error;
mod metadata;
mod method;
pub mod prelude;
mod request;
mod response;
mod transport;

pub use body::{ContentType, from_json, to_form, to_json, to_query_pairs};
pub use call_args::{CallArgs, arg, is_truthy, to_param_string};
pub use error::{Error, Result};
pub use metadata::{MethodMetadata, ServiceMetadata, ServiceMetadataBuilder};
pub use method::Method;
pub use request::{Body, RequestBuilder, RequestDescriptor};
pub use response::Response;
pub use transport::HttpTransport;

// Re-export http crate types for status codes
pub use http::StatusCode;

// Call arguments are JSON values
pub use serde_json::Value;
