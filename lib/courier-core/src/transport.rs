//! HTTP transport trait.
//!
//! [`HttpTransport`] has a single low-level entry point, [`HttpTransport::send`].
//! The per-verb methods only stamp their verb on the descriptor and funnel
//! into it; [`HttpTransport::dispatch`] routes a descriptor by its own verb.
//!
//! Implement the trait directly to add request interceptors or to record
//! requests in tests.

use std::future::Future;

use crate::{Method, RequestDescriptor, Response, Result};

/// Executes resolved requests.
///
/// Implementations must propagate failures unchanged: no retry, no
/// suppression, no transformation.
pub trait HttpTransport: Send + Sync {
    /// Execute a request and return the response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails for any reason:
    /// - Network errors
    /// - TLS errors
    /// - Timeouts
    /// - HTTP error responses, when the transport classifies them as failures
    fn send(
        &self,
        request: RequestDescriptor,
    ) -> impl Future<Output = Result<Response>> + Send;

    /// Send as `GET`.
    fn get(
        &self,
        request: RequestDescriptor,
    ) -> impl Future<Output = Result<Response>> + Send {
        self.send(request.with_verb(Method::Get))
    }

    /// Send as `POST`.
    fn post(
        &self,
        request: RequestDescriptor,
    ) -> impl Future<Output = Result<Response>> + Send {
        self.send(request.with_verb(Method::Post))
    }

    /// Send as `PUT`.
    fn put(
        &self,
        request: RequestDescriptor,
    ) -> impl Future<Output = Result<Response>> + Send {
        self.send(request.with_verb(Method::Put))
    }

    /// Send as `PATCH`.
    fn patch(
        &self,
        request: RequestDescriptor,
    ) -> impl Future<Output = Result<Response>> + Send {
        self.send(request.with_verb(Method::Patch))
    }

    /// Send as `DELETE`.
    fn delete(
        &self,
        request: RequestDescriptor,
    ) -> impl Future<Output = Result<Response>> + Send {
        self.send(request.with_verb(Method::Delete))
    }

    /// Send as `HEAD`.
    fn head(
        &self,
        request: RequestDescriptor,
    ) -> impl Future<Output = Result<Response>> + Send {
        self.send(request.with_verb(Method::Head))
    }

    /// Route the descriptor to the entry point matching its verb.
    fn dispatch(
        &self,
        request: RequestDescriptor,
    ) -> impl Future<Output = Result<Response>> + Send {
        async move {
            match request.verb() {
                Method::Get => self.get(request).await,
                Method::Post => self.post(request).await,
                Method::Put => self.put(request).await,
                Method::Patch => self.patch(request).await,
                Method::Delete => self.delete(request).await,
                Method::Head => self.head(request).await,
            }
        }
    }
}
