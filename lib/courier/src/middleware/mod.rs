//! Tower middleware layers for the courier HTTP transport.
//!
//! Layers wrap the transport's inner service, which takes a
//! [`RequestDescriptor`](crate::RequestDescriptor) and yields a
//! [`Response`](crate::Response). They apply to every request the transport
//! sends, whichever service proxy issued it.
//!
//! # Available Layers
//!
//! - [`CredentialsLayer`] - Adds an `Authorization` header from [`Credentials`](crate::Credentials)
//! - [`LoggingLayer`] - Logs each request in a `tracing` span
//!
//! # Example
//!
//! ```ignore
//! use courier::{Credentials, HyperClient};
//!
//! let client = HyperClient::builder()
//!     .credentials(Credentials::bearer("my-token"))
//!     .with_logging()
//!     .build();
//!
//! // Raw layer access
//! use courier::middleware::LoggingLayer;
//! let client = HyperClient::builder()
//!     .layer(LoggingLayer::full())
//!     .build();
//! ```

mod credentials;
mod logging;

pub use credentials::{CredentialsLayer, WithCredentials};
pub use logging::{Detail, Logging, LoggingLayer};

// Re-export tower's layer trait for custom middleware
pub use tower::Layer;
