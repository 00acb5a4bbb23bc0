//! Service types and their builder.

use crate::{HyperClient, ServiceMetadata, ServiceProxy, TransportConfig};

/// A declarative HTTP service.
///
/// Implementors provide a static metadata table and wrap the
/// [`ServiceProxy`] handed to them by [`ServiceBuilder::build`].
///
/// # Example
///
/// ```ignore
/// use std::sync::LazyLock;
/// use courier::{MethodMetadata, Service, ServiceMetadata, ServiceProxy};
///
/// static USER_SERVICE: LazyLock<ServiceMetadata> = LazyLock::new(|| {
///     ServiceMetadata::builder("/api/v1")
///         .method("get_user", MethodMetadata::get("/users/{id}").path_param(0, "id"))
///         .build()
/// });
///
/// pub struct UserService {
///     proxy: ServiceProxy,
/// }
///
/// impl Service for UserService {
///     const NAME: &'static str = "UserService";
///
///     fn metadata() -> &'static ServiceMetadata {
///         &USER_SERVICE
///     }
///
///     fn from_proxy(proxy: ServiceProxy) -> Self {
///         Self { proxy }
///     }
/// }
/// ```
pub trait Service<C = HyperClient>: Sized {
    /// Service name, used in errors and logs.
    const NAME: &'static str;

    /// Metadata table keyed by method name.
    fn metadata() -> &'static ServiceMetadata;

    /// Wrap a ready proxy.
    fn from_proxy(proxy: ServiceProxy<C>) -> Self;
}

/// Builds service instances bound to an endpoint and a transport.
///
/// One builder can build any number of services; they all share the
/// builder's transport (and its connection pool).
///
/// ```ignore
/// let users: UserService = ServiceBuilder::new()
///     .endpoint("https://api.example.com")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ServiceBuilder<C = HyperClient> {
    endpoint: String,
    transport: C,
}

impl ServiceBuilder {
    /// Builder with the default [`HyperClient`] and an empty endpoint.
    #[must_use]
    pub fn new() -> Self {
        Self::with_transport(HyperClient::new())
    }

    /// Use a [`HyperClient`] built from `config`.
    #[must_use]
    pub fn config(self, config: TransportConfig) -> Self {
        self.transport(HyperClient::with_config(config))
    }
}

impl Default for ServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> ServiceBuilder<C> {
    /// Builder around an existing transport.
    #[must_use]
    pub fn with_transport(transport: C) -> Self {
        Self {
            endpoint: String::new(),
            transport,
        }
    }

    /// Set the endpoint. It is not validated here: a malformed endpoint
    /// fails when a request is sent.
    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// The configured endpoint.
    #[must_use]
    pub fn endpoint_url(&self) -> &str {
        &self.endpoint
    }

    /// Replace the transport.
    #[must_use]
    pub fn transport<T>(self, transport: T) -> ServiceBuilder<T> {
        ServiceBuilder {
            endpoint: self.endpoint,
            transport,
        }
    }

    /// Build a service instance.
    #[must_use]
    pub fn build<S: Service<C>>(&self) -> S
    where
        C: Clone,
    {
        S::from_proxy(ServiceProxy::new(
            S::NAME,
            self.endpoint.clone(),
            S::metadata(),
            self.transport.clone(),
        ))
    }
}
