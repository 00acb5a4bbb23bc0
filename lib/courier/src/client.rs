//! The default [`HttpTransport`]: hyper-util over rustls, behind a tower stack.
//!
//! A descriptor travels outermost layer first, then through the credentials
//! layer, and is finally serialized by the wire service, which owns the
//! connection pool.

use std::collections::HashMap;
use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper_rustls::HttpsConnector;
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};
use tower::util::BoxCloneSyncService;
use tower::{Layer, ServiceExt};
use tower_service::Service;

use crate::{
    Body, ContentType, Credentials, Error, HttpTransport, RequestDescriptor, Response, Result,
    config::TransportConfig,
    connector::https_connector,
    middleware::{CredentialsLayer, LoggingLayer},
};

/// The type-erased middleware stack every layer wraps.
pub type BoxedService = BoxCloneSyncService<RequestDescriptor, Response, Error>;

/// Future returned by the transport's tower services.
pub type ServiceFuture = Pin<Box<dyn Future<Output = Result<Response>> + Send + 'static>>;

type Wrap = Box<dyn FnOnce(BoxedService) -> BoxedService + Send>;

/// Innermost service: turns descriptors into hyper requests and back.
#[derive(Clone)]
struct Wire {
    pool: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
    config: Arc<TransportConfig>,
}

impl Wire {
    fn new(config: Arc<TransportConfig>) -> Self {
        let pool = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_idle_per_host)
            .build(https_connector(config.connect_timeout));
        Self { pool, config }
    }

    /// Default headers only fill names the descriptor does not already set,
    /// whatever their case. JSON bodies get a JSON content type when none is set.
    fn encode(&self, request: &RequestDescriptor) -> Result<http::Request<Full<Bytes>>> {
        let url = request.to_url()?;
        let is_set = |name: &str| {
            request
                .headers()
                .keys()
                .any(|key| key.eq_ignore_ascii_case(name))
        };

        let defaults = self
            .config
            .default_headers
            .iter()
            .filter(|(name, _)| !is_set(name));
        let json_content_type = (matches!(request.body(), Some(Body::Json(_)))
            && request.content_type().is_none())
        .then_some((ContentType::HEADER, ContentType::Json.as_str()));

        let headers = defaults
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .chain(request.headers().iter().map(|(name, value)| (name.as_str(), value.as_str())))
            .chain(json_content_type);

        let mut wire = http::Request::builder()
            .method(http::Method::from(request.verb()))
            .uri(url.as_str());
        for (name, value) in headers {
            wire = wire.header(name, value);
        }

        let body = request.body_bytes()?.unwrap_or_default();
        wire.body(Full::new(body))
            .map_err(|e| Error::invalid_request(e.to_string()))
    }

    async fn exchange(self, request: RequestDescriptor) -> Result<Response> {
        let wire_request = self.encode(&request)?;

        let reply = tokio::time::timeout(self.config.timeout, self.pool.request(wire_request))
            .await
            .map_err(|_| Error::Timeout)?
            .map_err(classify)?;

        let status = reply.status();
        let headers: HashMap<String, String> = reply
            .headers()
            .iter()
            .filter_map(|(name, value)| Some((name.to_string(), value.to_str().ok()?.to_string())))
            .collect();
        let body = reply
            .into_body()
            .collect()
            .await
            .map_err(|e| Error::connection(e.to_string()))?
            .to_bytes();

        if self.config.validate_status && !status.is_success() {
            return Err(Error::http(status, body));
        }
        Ok(Response::new(request, status, headers, body))
    }
}

impl Service<RequestDescriptor> for Wire {
    type Response = Response;
    type Error = Error;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: RequestDescriptor) -> Self::Future {
        Box::pin(self.clone().exchange(request))
    }
}

/// Maps a hyper failure, looking through its source chain for rustls errors.
#[allow(clippy::needless_pass_by_value)]
fn classify(err: hyper_util::client::legacy::Error) -> Error {
    let mut cause: Option<&(dyn StdError + 'static)> = Some(&err);
    while let Some(current) = cause {
        let wraps_tls = current
            .downcast_ref::<std::io::Error>()
            .and_then(std::io::Error::get_ref)
            .is_some_and(|inner| inner.is::<rustls::Error>());
        if current.is::<rustls::Error>() || wraps_tls {
            return Error::tls(err.to_string());
        }
        cause = current.source();
    }
    Error::connection(err.to_string())
}

/// HTTP transport with connection pooling, TLS and tower middleware.
///
/// Clones share the pool and the middleware stack, so one client can back
/// any number of service proxies.
///
/// ```ignore
/// let client = HyperClient::builder()
///     .timeout(Duration::from_secs(5))
///     .credentials(Credentials::bearer("token"))
///     .with_logging()
///     .build();
/// ```
#[derive(Clone)]
pub struct HyperClient {
    stack: BoxedService,
    config: Arc<TransportConfig>,
}

impl std::fmt::Debug for HyperClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HyperClient {
    /// A client with the default configuration and no middleware.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(TransportConfig::default())
    }

    /// A client for `config`. Its credentials, if any, go on every request.
    #[must_use]
    pub fn with_config(config: TransportConfig) -> Self {
        Self::builder().config(config).build()
    }

    /// Starts a [`HyperClientBuilder`].
    #[must_use]
    pub fn builder() -> HyperClientBuilder {
        HyperClientBuilder::default()
    }

    /// The configuration this client was built with.
    #[must_use]
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }
}

impl Default for HyperClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport for HyperClient {
    async fn send(&self, request: RequestDescriptor) -> Result<Response> {
        self.stack.clone().oneshot(request).await
    }
}

impl Service<RequestDescriptor> for HyperClient {
    type Response = Response;
    type Error = Error;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.stack.poll_ready(cx)
    }

    fn call(&mut self, request: RequestDescriptor) -> Self::Future {
        self.stack.call(request)
    }
}

/// Builder for [`HyperClient`].
///
/// Pool sizing lives on [`TransportConfig`]; pass a full one with
/// [`config`](Self::config).
#[derive(Default)]
pub struct HyperClientBuilder {
    config: TransportConfig,
    layers: Vec<Wrap>,
}

impl std::fmt::Debug for HyperClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperClientBuilder")
            .field("config", &self.config)
            .field("layers", &self.layers.len())
            .finish()
    }
}

impl HyperClientBuilder {
    fn tweak(mut self, change: impl FnOnce(&mut TransportConfig)) -> Self {
        change(&mut self.config);
        self
    }

    /// Start from `config`. Later setters adjust it.
    #[must_use]
    pub fn config(self, config: TransportConfig) -> Self {
        self.tweak(|current| *current = config)
    }

    /// Total time allowed for one exchange.
    #[must_use]
    pub fn timeout(self, timeout: Duration) -> Self {
        self.tweak(|config| config.timeout = timeout)
    }

    /// Time allowed to open a connection.
    #[must_use]
    pub fn connect_timeout(self, timeout: Duration) -> Self {
        self.tweak(|config| config.connect_timeout = timeout)
    }

    /// When `false`, non-2xx responses are returned instead of failing.
    #[must_use]
    pub fn validate_status(self, validate: bool) -> Self {
        self.tweak(|config| config.validate_status = validate)
    }

    /// A header for every request that does not set it itself.
    #[must_use]
    pub fn default_header(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let (name, value) = (name.into(), value.into());
        self.tweak(|config| {
            config.default_headers.insert(name, value);
        })
    }

    /// Credentials for every request.
    #[must_use]
    pub fn credentials(self, credentials: Credentials) -> Self {
        self.tweak(|config| config.credentials = Some(credentials))
    }

    /// Bearer token [`credentials`](Self::credentials).
    #[must_use]
    pub fn with_bearer_auth(self, token: impl Into<String>) -> Self {
        self.credentials(Credentials::bearer(token))
    }

    /// Basic [`credentials`](Self::credentials).
    #[must_use]
    pub fn with_basic_auth(self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials(Credentials::basic(username, password))
    }

    /// Wraps the stack in `layer`. The first layer added sees requests first.
    #[must_use]
    pub fn layer<L>(mut self, layer: L) -> Self
    where
        L: Layer<BoxedService> + Send + 'static,
        L::Service: Service<RequestDescriptor, Response = Response, Error = Error>
            + Clone
            + Send
            + Sync
            + 'static,
        <L::Service as Service<RequestDescriptor>>::Future: Send + 'static,
    {
        self.layers
            .push(Box::new(move |inner| BoxCloneSyncService::new(layer.layer(inner))));
        self
    }

    /// Log every request in a `courier_request` span.
    #[must_use]
    pub fn with_logging(self) -> Self {
        self.layer(LoggingLayer::summary())
    }

    /// Like [`with_logging`](Self::with_logging), with headers and query
    /// parameters at debug level.
    #[must_use]
    pub fn with_detailed_logging(self) -> Self {
        self.layer(LoggingLayer::full())
    }

    /// Assembles the stack: user layers outside, credentials, then the wire.
    #[must_use]
    pub fn build(self) -> HyperClient {
        let config = Arc::new(self.config);

        let mut stack = BoxCloneSyncService::new(Wire::new(Arc::clone(&config)));
        if let Some(credentials) = &config.credentials {
            stack = BoxCloneSyncService::new(CredentialsLayer::new(credentials).layer(stack));
        }
        let stack = self
            .layers
            .into_iter()
            .rev()
            .fold(stack, |inner, wrap| wrap(inner));

        HyperClient { stack, config }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Method;

    fn wire(config: TransportConfig) -> Wire {
        Wire::new(Arc::new(config))
    }

    #[test]
    fn client_default() {
        let client = HyperClient::new();
        assert_eq!(client.config().timeout, Duration::from_secs(30));
        assert!(client.config().validate_status);
        assert_eq!(client.config().credentials, None);
    }

    #[test]
    fn client_builder() {
        let client = HyperClient::builder()
            .timeout(Duration::from_secs(60))
            .validate_status(false)
            .with_bearer_auth("token")
            .build();

        assert_eq!(client.config().timeout, Duration::from_secs(60));
        assert!(!client.config().validate_status);
        assert_eq!(client.config().credentials, Some(Credentials::bearer("token")));
    }

    #[test]
    fn client_builder_tweaks_ready_config() {
        let base = TransportConfig::builder()
            .pool_idle_per_host(4)
            .default_header("User-Agent", "courier")
            .build();
        let client = HyperClient::builder()
            .config(base)
            .timeout(Duration::from_secs(3))
            .build();

        assert_eq!(client.config().timeout, Duration::from_secs(3));
        assert_eq!(client.config().pool_idle_per_host, 4);
        assert_eq!(
            client.config().default_headers.get("User-Agent").map(String::as_str),
            Some("courier")
        );
    }

    #[test]
    fn encode_merges_headers_and_query() {
        let wire = wire(
            TransportConfig::builder()
                .default_header("User-Agent", "courier")
                .default_header("Accept", "*/*")
                .build(),
        );
        let request = RequestDescriptor::new(Method::Post, "http://localhost:8080/users")
            .with_header("accept", "application/json")
            .with_query("page", 2)
            .with_body(Body::Json(serde_json::json!({"name": "Jane"})));

        let encoded = wire.encode(&request).expect("request");

        assert_eq!(encoded.method(), http::Method::POST);
        assert_eq!(encoded.uri().to_string(), "http://localhost:8080/users?page=2");
        let headers = encoded.headers();
        assert_eq!(headers.get("user-agent").map(|v| v.as_bytes()), Some(&b"courier"[..]));
        assert_eq!(
            headers.get("accept").map(|v| v.as_bytes()),
            Some(&b"application/json"[..])
        );
        assert_eq!(headers.get_all("accept").iter().count(), 1);
        assert_eq!(
            headers.get("content-type").map(|v| v.as_bytes()),
            Some(&b"application/json"[..])
        );
    }

    #[test]
    fn encode_keeps_explicit_content_type() {
        let request = RequestDescriptor::new(Method::Post, "http://localhost/notes")
            .with_header("Content-Type", "text/plain")
            .with_body(Body::Json(serde_json::json!("hello")));

        let encoded = wire(TransportConfig::default()).encode(&request).expect("request");

        assert_eq!(encoded.headers().get_all("content-type").iter().count(), 1);
        assert_eq!(
            encoded.headers().get("content-type").map(|v| v.as_bytes()),
            Some(&b"text/plain"[..])
        );
    }

    #[test]
    fn encode_rejects_relative_url() {
        let request = RequestDescriptor::new(Method::Get, "/api/v1/users");

        assert!(matches!(
            wire(TransportConfig::default()).encode(&request),
            Err(Error::InvalidUrl(_))
        ));
    }

    #[test]
    fn client_is_clone_and_debug() {
        let client = HyperClient::new();
        let cloned = client.clone();
        assert!(format!("{cloned:?}").contains("HyperClient"));
    }
}
