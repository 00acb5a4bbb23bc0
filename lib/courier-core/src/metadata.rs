//! Declarative per-service metadata.
//!
//! A [`ServiceMetadata`] is built once per service type, before any instance
//! exists, and is only ever read afterwards. Every instance of the service
//! shares the same table through a `&'static` reference.
//!
//! # Example
//!
//! ```
//! use courier_core::{MethodMetadata, ServiceMetadata};
//!
//! let metadata = ServiceMetadata::builder("/api/v1")
//!     .method(
//!         "get_user",
//!         MethodMetadata::get("/users/{id}")
//!             .header_param(0, "X-Token")
//!             .path_param(1, "id"),
//!     )
//!     .build();
//!
//! assert_eq!(metadata.base_path(), "/api/v1");
//! assert!(metadata.method("get_user").is_some());
//! ```

use std::collections::BTreeMap;

use crate::Method;

/// HTTP metadata attached to one service method.
///
/// Positions are indices into the call arguments. Each role keeps its
/// positions unique, but one call may feed several roles at once
/// (e.g. a header at `0`, a path parameter at `1` and the body at `2`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodMetadata {
    verb: Method,
    path_template: String,
    static_headers: BTreeMap<String, String>,
    path_params: BTreeMap<usize, String>,
    header_params: BTreeMap<usize, String>,
    query_map: Option<usize>,
    body: Option<usize>,
}

impl MethodMetadata {
    /// Metadata for `verb` on a relative path template with `{name}` placeholders.
    #[must_use]
    pub fn new(verb: Method, path_template: impl Into<String>) -> Self {
        Self {
            verb,
            path_template: path_template.into(),
            static_headers: BTreeMap::new(),
            path_params: BTreeMap::new(),
            header_params: BTreeMap::new(),
            query_map: None,
            body: None,
        }
    }

    /// `GET` metadata.
    #[must_use]
    pub fn get(path_template: impl Into<String>) -> Self {
        Self::new(Method::Get, path_template)
    }

    /// `POST` metadata.
    #[must_use]
    pub fn post(path_template: impl Into<String>) -> Self {
        Self::new(Method::Post, path_template)
    }

    /// `PUT` metadata.
    #[must_use]
    pub fn put(path_template: impl Into<String>) -> Self {
        Self::new(Method::Put, path_template)
    }

    /// `PATCH` metadata.
    #[must_use]
    pub fn patch(path_template: impl Into<String>) -> Self {
        Self::new(Method::Patch, path_template)
    }

    /// `DELETE` metadata.
    #[must_use]
    pub fn delete(path_template: impl Into<String>) -> Self {
        Self::new(Method::Delete, path_template)
    }

    /// `HEAD` metadata.
    #[must_use]
    pub fn head(path_template: impl Into<String>) -> Self {
        Self::new(Method::Head, path_template)
    }

    /// Adds a static default header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.static_headers.insert(name.into(), value.into());
        self
    }

    /// Adds several static default headers.
    #[must_use]
    pub fn headers<K, V>(mut self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.static_headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Binds the argument at `position` to the `{name}` placeholder.
    #[must_use]
    pub fn path_param(mut self, position: usize, name: impl Into<String>) -> Self {
        self.path_params.insert(position, name.into());
        self
    }

    /// Binds the argument at `position` to the `name` header.
    #[must_use]
    pub fn header_param(mut self, position: usize, name: impl Into<String>) -> Self {
        self.header_params.insert(position, name.into());
        self
    }

    /// Declares the argument at `position` as the query-parameter map.
    #[must_use]
    pub fn query_map(mut self, position: usize) -> Self {
        self.query_map = Some(position);
        self
    }

    /// Declares the argument at `position` as the request body.
    #[must_use]
    pub fn body(mut self, position: usize) -> Self {
        self.body = Some(position);
        self
    }

    /// HTTP verb.
    #[must_use]
    pub const fn verb(&self) -> Method {
        self.verb
    }

    /// Relative path template.
    #[must_use]
    pub fn path_template(&self) -> &str {
        &self.path_template
    }

    /// Static default headers.
    #[must_use]
    pub fn static_headers(&self) -> &BTreeMap<String, String> {
        &self.static_headers
    }

    /// Path parameter bindings, ordered by position.
    #[must_use]
    pub fn path_params(&self) -> &BTreeMap<usize, String> {
        &self.path_params
    }

    /// Header parameter bindings, ordered by position.
    #[must_use]
    pub fn header_params(&self) -> &BTreeMap<usize, String> {
        &self.header_params
    }

    /// Position of the query-map argument.
    #[must_use]
    pub const fn query_map_position(&self) -> Option<usize> {
        self.query_map
    }

    /// Position of the body argument.
    #[must_use]
    pub const fn body_position(&self) -> Option<usize> {
        self.body
    }
}

/// Metadata table for a whole service type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServiceMetadata {
    base_path: String,
    methods: BTreeMap<String, MethodMetadata>,
}

impl ServiceMetadata {
    /// Starts building metadata for a service rooted at `base_path`.
    #[must_use]
    pub fn builder(base_path: impl Into<String>) -> ServiceMetadataBuilder {
        ServiceMetadataBuilder {
            base_path: base_path.into(),
            methods: BTreeMap::new(),
        }
    }

    /// Service-wide base path, inserted between the endpoint and each method path.
    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Metadata of a single method.
    #[must_use]
    pub fn method(&self, name: &str) -> Option<&MethodMetadata> {
        self.methods.get(name)
    }

    /// Returns `true` if `name` carries metadata.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// All declared method names, sorted.
    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }

    /// All declared methods, sorted by name.
    pub fn methods(&self) -> impl Iterator<Item = (&str, &MethodMetadata)> {
        self.methods.iter().map(|(name, meta)| (name.as_str(), meta))
    }

    /// Number of declared methods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Returns `true` if no method is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

/// Builder for [`ServiceMetadata`].
#[derive(Debug, Clone)]
pub struct ServiceMetadataBuilder {
    base_path: String,
    methods: BTreeMap<String, MethodMetadata>,
}

impl ServiceMetadataBuilder {
    /// Declares a method. A later declaration under the same name replaces the earlier one.
    #[must_use]
    pub fn method(mut self, name: impl Into<String>, metadata: MethodMetadata) -> Self {
        self.methods.insert(name.into(), metadata);
        self
    }

    /// Freezes the table.
    #[must_use]
    pub fn build(self) -> ServiceMetadata {
        ServiceMetadata {
            base_path: self.base_path,
            methods: self.methods,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_service() -> ServiceMetadata {
        ServiceMetadata::builder("/api/v1")
            .method("get_users", MethodMetadata::get("/users").header_param(0, "X-Token"))
            .method(
                "create_user",
                MethodMetadata::post("/users")
                    .header_param(0, "X-Token")
                    .body(1),
            )
            .build()
    }

    #[test]
    fn method_metadata_defaults() {
        let meta = MethodMetadata::delete("/users/{id}");
        assert_eq!(meta.verb(), Method::Delete);
        assert_eq!(meta.path_template(), "/users/{id}");
        assert!(meta.static_headers().is_empty());
        assert!(meta.path_params().is_empty());
        assert!(meta.header_params().is_empty());
        assert_eq!(meta.query_map_position(), None);
        assert_eq!(meta.body_position(), None);
    }

    #[test]
    fn method_metadata_several_roles() {
        let meta = MethodMetadata::put("/users/{id}")
            .header_param(0, "X-Token")
            .path_param(1, "id")
            .body(2);

        assert_eq!(meta.header_params().get(&0).map(String::as_str), Some("X-Token"));
        assert_eq!(meta.path_params().get(&1).map(String::as_str), Some("id"));
        assert_eq!(meta.body_position(), Some(2));
    }

    #[test]
    fn binding_positions_are_unique_per_role() {
        let meta = MethodMetadata::get("/a/{x}/{y}")
            .path_param(0, "x")
            .path_param(0, "y");

        assert_eq!(meta.path_params().len(), 1);
        assert_eq!(meta.path_params().get(&0).map(String::as_str), Some("y"));
    }

    #[test]
    fn path_params_are_ordered_by_position() {
        let meta = MethodMetadata::get("/{a}/{b}")
            .path_param(3, "b")
            .path_param(1, "a");

        let positions: Vec<_> = meta.path_params().keys().copied().collect();
        assert_eq!(positions, vec![1, 3]);
    }

    #[test]
    fn static_headers_from_iterator() {
        let meta = MethodMetadata::post("/auth")
            .headers([("Content-Type", "application/x-www-form-urlencoded"), ("Accept", "*/*")]);
        assert_eq!(meta.static_headers().len(), 2);
    }

    #[test]
    fn service_metadata_lookup() {
        let metadata = user_service();

        assert_eq!(metadata.base_path(), "/api/v1");
        assert_eq!(metadata.len(), 2);
        assert!(metadata.contains("get_users"));
        assert!(!metadata.contains("delete_user"));
        assert_eq!(
            metadata.method("create_user").map(MethodMetadata::verb),
            Some(Method::Post)
        );
    }

    #[test]
    fn service_metadata_method_names_sorted() {
        let metadata = user_service();
        let names: Vec<_> = metadata.method_names().collect();
        assert_eq!(names, vec!["create_user", "get_users"]);
    }

    #[test]
    fn service_metadata_default_is_empty() {
        let metadata = ServiceMetadata::default();
        assert!(metadata.is_empty());
        assert_eq!(metadata.base_path(), "");
    }
}
