//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions
//! for easy glob importing:
//!
//! ```ignore
//! use courier_core::prelude::*;
//! ```

pub use crate::{
    Body, CallArgs, ContentType, Error, HttpTransport, Method, MethodMetadata, RequestBuilder,
    RequestDescriptor, Response, Result, ServiceMetadata, Value, arg, args, from_json, to_json,
};
