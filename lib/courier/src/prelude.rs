//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types, functions, and macros
//! for easy glob importing:
//!
//! ```ignore
//! use courier::prelude::*;
//! ```

pub use crate::{
    Credentials, Error, HttpTransport, HyperClient, Method, MethodMetadata, RequestDescriptor,
    Response, Result, Service, ServiceBuilder, ServiceMetadata, ServiceProxy, StatusCode,
    TransportConfig, Value, arg, args,
};
pub use serde::{Deserialize, Serialize};
