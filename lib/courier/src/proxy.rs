//! Service proxies and per-method interceptors.
//!
//! A [`ServiceProxy`] is what a service type holds: the endpoint it was built
//! with, the static metadata table of the service, and a transport handle.
//! Each metadata-bearing method of the service asks the proxy for an
//! [`Interceptor`] and calls it with its positional arguments.
//!
//! # Example
//!
//! ```ignore
//! use courier::{Response, Result, ServiceProxy, args};
//!
//! pub struct UserService {
//!     proxy: ServiceProxy,
//! }
//!
//! impl UserService {
//!     pub async fn get_user(&self, token: &str, id: u64) -> Result<Response> {
//!         self.proxy.interceptor("get_user")?.call(&args![token, id]?)?.await
//!     }
//! }
//! ```

use std::future::Future;

use serde::de::DeserializeOwned;
use tracing::{Instrument, debug, info_span, warn};

use crate::{
    Error, HttpTransport, HyperClient, MethodMetadata, RequestBuilder, RequestDescriptor,
    Response, Result, ServiceMetadata, Value,
};

/// Method names that belong to the proxy itself and are never intercepted.
pub const RESERVED_METHODS: [&str; 4] = ["endpoint", "metadata", "transport", "interceptor"];

/// Runtime handle of one service instance.
#[derive(Debug, Clone)]
pub struct ServiceProxy<C = HyperClient> {
    service: &'static str,
    endpoint: String,
    metadata: &'static ServiceMetadata,
    transport: C,
}

impl<C> ServiceProxy<C> {
    /// Create a proxy for the service `service`.
    ///
    /// The endpoint is used as is: it is concatenated with the base path and
    /// the method path templates, not parsed.
    #[must_use]
    pub fn new(
        service: &'static str,
        endpoint: impl Into<String>,
        metadata: &'static ServiceMetadata,
        transport: C,
    ) -> Self {
        for name in metadata
            .method_names()
            .filter(|name| RESERVED_METHODS.contains(name))
        {
            warn!(service, method = name, "metadata on a reserved method name is ignored");
        }

        Self {
            service,
            endpoint: endpoint.into(),
            metadata,
            transport,
        }
    }

    /// Name of the proxied service.
    #[must_use]
    pub const fn service(&self) -> &'static str {
        self.service
    }

    /// Endpoint the service was built with.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Metadata table of the service.
    #[must_use]
    pub const fn metadata(&self) -> &'static ServiceMetadata {
        self.metadata
    }

    /// The transport requests are sent through.
    #[must_use]
    pub const fn transport(&self) -> &C {
        &self.transport
    }

    /// Names of the methods that carry metadata, reserved names excluded.
    pub fn intercepted_methods(&self) -> impl Iterator<Item = &'static str> + use<C> {
        self.metadata
            .method_names()
            .filter(|name| !RESERVED_METHODS.contains(name))
    }

    /// Interceptor for the method `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MetadataMissing`] if the method has no metadata or its
    /// name is reserved.
    pub fn interceptor(&self, name: &str) -> Result<Interceptor<'_, C>> {
        self.metadata
            .methods()
            .find(|(method, _)| *method == name && !RESERVED_METHODS.contains(method))
            .map(|(method, metadata)| Interceptor {
                proxy: self,
                method,
                metadata,
            })
            .ok_or_else(|| Error::metadata_missing(self.service, name))
    }
}

/// Replaces one service method: resolves its arguments and sends the request.
#[derive(Debug)]
pub struct Interceptor<'a, C> {
    proxy: &'a ServiceProxy<C>,
    method: &'static str,
    metadata: &'static MethodMetadata,
}

impl<C> Clone for Interceptor<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for Interceptor<'_, C> {}

impl<'a, C> Interceptor<'a, C> {
    /// Name of the intercepted method.
    #[must_use]
    pub const fn method(&self) -> &'static str {
        self.method
    }

    /// Metadata of the intercepted method.
    #[must_use]
    pub const fn metadata(&self) -> &'static MethodMetadata {
        self.metadata
    }

    /// `endpoint + base_path + path_template`, placeholders unresolved.
    #[must_use]
    pub fn url_template(&self) -> String {
        format!(
            "{}{}{}",
            self.proxy.endpoint,
            self.proxy.metadata.base_path(),
            self.metadata.path_template()
        )
    }

    /// Resolve `args` into a request descriptor without sending it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingArgument`] or [`Error::InvalidArgument`] when
    /// the arguments do not fit the bindings.
    pub fn prepare(&self, args: &[Value]) -> Result<RequestDescriptor> {
        RequestBuilder::new(self.method, self.metadata).build(&self.url_template(), args)
    }
}

impl<'a, C: HttpTransport> Interceptor<'a, C> {
    /// Resolve `args` and send the request.
    ///
    /// Request construction happens right away, so argument errors surface
    /// here and not through the returned future.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`prepare`](Self::prepare). Transport failures
    /// come out of the future unchanged.
    pub fn call(
        &self,
        args: &[Value],
    ) -> Result<impl Future<Output = Result<Response>> + Send + use<'a, C>> {
        let request = self.prepare(args)?;
        let span = info_span!(
            "courier_call",
            service = self.proxy.service,
            method = self.method,
        );
        span.in_scope(|| debug!(verb = %request.verb(), url = request.url(), "intercepted call"));

        let proxy = self.proxy;
        let transport = &proxy.transport;
        Ok(async move { transport.dispatch(request).await }.instrument(span))
    }

    /// Call and decode the JSON response body.
    ///
    /// # Errors
    ///
    /// Returns any error of [`call`](Self::call), or
    /// [`Error::JsonDeserialization`] when the body does not decode as `T`.
    pub async fn call_json<T: DeserializeOwned>(&self, args: &[Value]) -> Result<T> {
        let response = self.call(args)?.await?;
        response.json()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::LazyLock;

    use bytes::Bytes;

    use super::*;
    use crate::args;

    static METADATA: LazyLock<ServiceMetadata> = LazyLock::new(|| {
        ServiceMetadata::builder("/api/v1")
            .method(
                "get_user",
                MethodMetadata::get("/users/{id}").path_param(0, "id"),
            )
            .method("list_users", MethodMetadata::get("/users").query_map(0))
            .method("endpoint", MethodMetadata::get("/endpoint"))
            .build()
    });

    #[derive(Debug, Clone, Copy)]
    struct Echo;

    impl HttpTransport for Echo {
        async fn send(&self, request: RequestDescriptor) -> Result<Response> {
            Ok(Response::new(
                request,
                crate::StatusCode::OK,
                HashMap::new(),
                Bytes::from_static(br#"{"id":42}"#),
            ))
        }
    }

    fn proxy() -> ServiceProxy<Echo> {
        ServiceProxy::new("UserService", "http://localhost:8080", &METADATA, Echo)
    }

    #[test]
    fn intercepted_methods_skip_reserved_names() {
        let proxy = proxy();
        let methods: Vec<_> = proxy.intercepted_methods().collect();
        assert_eq!(methods, vec!["get_user", "list_users"]);
    }

    #[test]
    fn url_template_is_plain_concatenation() {
        let proxy = proxy();
        let interceptor = proxy.interceptor("get_user").expect("interceptor");
        assert_eq!(
            interceptor.url_template(),
            "http://localhost:8080/api/v1/users/{id}"
        );
    }

    #[test]
    fn unknown_method_is_metadata_missing() {
        let proxy = proxy();
        let err = proxy.interceptor("delete_user").expect_err("no metadata");
        assert!(err.is_metadata_missing());
        assert_eq!(
            err.to_string(),
            "no HTTP metadata for method `delete_user` of service `UserService`"
        );
    }

    #[test]
    fn reserved_method_is_not_intercepted() {
        let proxy = proxy();
        assert!(
            proxy
                .interceptor("endpoint")
                .is_err_and(|err| err.is_metadata_missing())
        );
    }

    #[test]
    fn prepare_resolves_arguments() {
        let proxy = proxy();
        let args = args![42].expect("args");
        let request = proxy
            .interceptor("get_user")
            .and_then(|interceptor| interceptor.prepare(&args))
            .expect("request");
        assert_eq!(request.url(), "http://localhost:8080/api/v1/users/42");
    }

    #[test]
    fn call_fails_fast_on_missing_argument() {
        let proxy = proxy();
        let interceptor = proxy.interceptor("get_user").expect("interceptor");
        let err = interceptor.call(&[]).err().expect("missing argument");
        assert!(matches!(err, Error::MissingArgument { position: 0, .. }));
    }

    #[tokio::test]
    async fn call_dispatches_through_transport() {
        let proxy = proxy();
        let args = args![serde_json::json!({"page": 2})].expect("args");
        let response = proxy
            .interceptor("list_users")
            .expect("interceptor")
            .call(&args)
            .expect("call")
            .await
            .expect("response");

        assert_eq!(response.status(), 200);
        assert_eq!(response.request().verb(), crate::Method::Get);
        assert_eq!(
            response.request().query_params().get("page"),
            Some(&serde_json::json!(2))
        );
    }

    #[tokio::test]
    async fn call_json_decodes_body() {
        #[derive(serde::Deserialize)]
        struct User {
            id: u64,
        }

        let proxy = proxy();
        let args = args![42].expect("args");
        let user: User = proxy
            .interceptor("get_user")
            .expect("interceptor")
            .call_json(&args)
            .await
            .expect("user");
        assert_eq!(user.id, 42);
    }
}
