//! Credentials middleware.
//!
//! Adds an `Authorization` header built from the transport's [`Credentials`]
//! to every outgoing request. A request that already carries an
//! `Authorization` header (e.g. from a header binding) keeps its own.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use base64::Engine;
use tower::{Layer, Service};

use crate::{Credentials, Error, RequestDescriptor, Response, Result};

const AUTHORIZATION: &str = "Authorization";

/// Layer that adds credentials to requests.
///
/// # Example
///
/// ```ignore
/// use courier::Credentials;
/// use courier::middleware::CredentialsLayer;
/// use tower::ServiceBuilder;
///
/// let service = ServiceBuilder::new()
///     .layer(CredentialsLayer::new(&Credentials::bearer("my-secret-token")))
///     .service(client);
/// ```
#[derive(Debug, Clone)]
pub struct CredentialsLayer {
    authorization: Arc<str>,
}

impl CredentialsLayer {
    /// Create a new credentials layer.
    #[must_use]
    pub fn new(credentials: &Credentials) -> Self {
        let authorization = match credentials {
            Credentials::Bearer(token) => format!("Bearer {token}"),
            Credentials::Basic { username, password } => {
                let encoded = base64::engine::general_purpose::STANDARD
                    .encode(format!("{username}:{password}"));
                format!("Basic {encoded}")
            }
        };
        Self {
            authorization: Arc::from(authorization),
        }
    }
}

impl<S> Layer<S> for CredentialsLayer {
    type Service = WithCredentials<S>;

    fn layer(&self, inner: S) -> Self::Service {
        WithCredentials {
            inner,
            authorization: Arc::clone(&self.authorization),
        }
    }
}

/// Service that adds credentials to requests.
#[derive(Debug, Clone)]
pub struct WithCredentials<S> {
    inner: S,
    authorization: Arc<str>,
}

impl<S> Service<RequestDescriptor> for WithCredentials<S>
where
    S: Service<RequestDescriptor, Response = Response, Error = Error>
        + Clone
        + Send
        + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: RequestDescriptor) -> Self::Future {
        let has_authorization = request
            .headers()
            .keys()
            .any(|name| name.eq_ignore_ascii_case(AUTHORIZATION));
        if !has_authorization {
            request
                .headers_mut()
                .insert(AUTHORIZATION.to_string(), self.authorization.to_string());
        }

        let mut inner = self.inner.clone();
        Box::pin(async move { inner.call(request).await })
    }
}
