//! Wire-level logging through `tracing`.
//!
//! Every request runs in a `courier_request` span with its verb, URL, query
//! parameter count and body kind. The status is recorded on the span once
//! the server answers. Requests sent by an [`Interceptor`](crate::Interceptor)
//! nest inside its `courier_call` span, which names the service and method.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use tower::{Layer, Service};
use tracing::{Instrument, Span, debug, field, info, info_span, warn};

use crate::{Body, ContentType, Error, RequestDescriptor, Response, Result, Value};

/// How much of each request is logged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Detail {
    /// Span fields plus one event per outcome.
    #[default]
    Summary,
    /// Also logs headers and query parameters before sending.
    Full,
}

/// Layer that logs every request passing through the transport.
///
/// ```ignore
/// let client = HyperClient::builder()
///     .layer(LoggingLayer::full())
///     .build();
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingLayer {
    detail: Detail,
}

impl LoggingLayer {
    /// Summary logging.
    #[must_use]
    pub fn summary() -> Self {
        Self::default()
    }

    /// Summary logging plus request headers and query at debug level.
    #[must_use]
    pub fn full() -> Self {
        Self {
            detail: Detail::Full,
        }
    }

    /// The configured detail.
    #[must_use]
    pub const fn detail(&self) -> Detail {
        self.detail
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = Logging<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Logging {
            inner,
            detail: self.detail,
        }
    }
}

/// Service produced by [`LoggingLayer`].
#[derive(Debug, Clone)]
pub struct Logging<S> {
    inner: S,
    detail: Detail,
}

/// What kind of body a descriptor carries, as it will be put on the wire.
fn body_kind(request: &RequestDescriptor) -> &'static str {
    match request.body() {
        None => "none",
        Some(Body::Form(_)) => "form",
        Some(Body::Json(Value::String(_)))
            if request
                .content_type()
                .is_some_and(|ct| !ContentType::Json.matches(ct)) =>
        {
            "raw"
        }
        Some(Body::Json(_)) => "json",
    }
}

impl<S> Service<RequestDescriptor> for Logging<S>
where
    S: Service<RequestDescriptor, Response = Response, Error = Error> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Response>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: RequestDescriptor) -> Self::Future {
        let span = info_span!(
            "courier_request",
            verb = %request.verb(),
            url = request.url(),
            query = request.query_params().len(),
            body = body_kind(&request),
            status = field::Empty,
        );
        if self.detail == Detail::Full {
            span.in_scope(|| {
                debug!(
                    headers = ?request.headers(),
                    query = ?request.query_params(),
                    "request details"
                );
            });
        }

        let mut inner = self.inner.clone();
        Box::pin(
            async move {
                let started = Instant::now();
                let result = inner.call(request).await;
                let elapsed = started.elapsed();

                match &result {
                    Ok(response) => {
                        Span::current().record("status", response.status());
                        if response.is_success() {
                            info!(?elapsed, "response received");
                        } else {
                            warn!(?elapsed, "unsuccessful response passed through");
                        }
                    }
                    Err(Error::Http { status, .. }) => {
                        Span::current().record("status", status);
                        warn!(?elapsed, "server rejected request");
                    }
                    Err(err) => warn!(error = %err, ?elapsed, "request failed"),
                }

                result
            }
            .instrument(span),
        )
    }
}
