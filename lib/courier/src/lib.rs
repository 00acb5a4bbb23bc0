//! Metadata-driven declarative HTTP service client for Rust.
//!
//! A service is a plain Rust type with a static [`ServiceMetadata`] table:
//! for each method, the HTTP verb, a path template and the position of each
//! call argument in the request (path placeholder, header, query map, body).
//! Calling a method resolves its arguments against that table and sends the
//! request through an [`HttpTransport`].
//!
//! # Example
//!
//! ```ignore
//! use std::sync::LazyLock;
//! use courier::prelude::*;
//!
//! static USER_SERVICE: LazyLock<ServiceMetadata> = LazyLock::new(|| {
//!     ServiceMetadata::builder("/api/v1")
//!         .method(
//!             "get_user",
//!             MethodMetadata::get("/users/{id}")
//!                 .header_param(0, "X-Token")
//!                 .path_param(1, "id"),
//!         )
//!         .build()
//! });
//!
//! pub struct UserService {
//!     proxy: ServiceProxy,
//! }
//!
//! impl Service for UserService {
//!     const NAME: &'static str = "UserService";
//!
//!     fn metadata() -> &'static ServiceMetadata {
//!         &USER_SERVICE
//!     }
//!
//!     fn from_proxy(proxy: ServiceProxy) -> Self {
//!         Self { proxy }
//!     }
//! }
//!
//! impl UserService {
//!     pub async fn get_user(&self, token: &str, id: u64) -> Result<Response> {
//!         self.proxy.interceptor("get_user")?.call(&args![token, id]?)?.await
//!     }
//! }
//!
//! let users: UserService = ServiceBuilder::new()
//!     .endpoint("https://api.example.com")
//!     .build();
//! let response = users.get_user("secret", 42).await?;
//! ```

mod client;
mod config;
mod connector;
pub mod middleware;
pub mod prelude;
mod proxy;
mod service;

// Re-export client types
pub use client::{BoxedService, HyperClient, HyperClientBuilder, ServiceFuture};
pub use config::{Credentials, TransportConfig, TransportConfigBuilder};
pub use connector::https_connector;
pub use proxy::{Interceptor, RESERVED_METHODS, ServiceProxy};
pub use service::{Service, ServiceBuilder};

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use courier_core::{
    Body, CallArgs, ContentType, Error, HttpTransport, Method, MethodMetadata, RequestBuilder,
    RequestDescriptor, Response, Result, ServiceMetadata, ServiceMetadataBuilder, StatusCode,
    Value, arg, args, from_json, is_truthy, to_form, to_json, to_param_string, to_query_pairs,
};
