//! The façade resource code talks to.
//!
//! A [`Node`] combines the configuration of one backend with its route
//! table and the HTTP dispatcher, optionally fronted by an
//! [`OAuth2TokenManager`]. It builds URLs, query parameters and payloads,
//! decodes responses, and runs the resource operations.
//!
//! # Example
//!
//! ```rust,ignore
//! use drf_consumer::config::{BaseUrl, NodeConfig};
//! use drf_consumer::routing::{Route, RouteTable};
//! use drf_consumer::Node;
//!
//! let config = NodeConfig::builder()
//!     .base_url(BaseUrl::new("https://api.example.com/v1/")?)
//!     .build()?;
//! let routes = RouteTable::new()
//!     .with_route(Route::list_get::<Widget>("widgets/"))
//!     .with_route(Route::detail_get::<Widget>("widgets/"));
//!
//! let node = Node::new(config, routes);
//! let page = node.get_list::<Widget>(0, 0).await?;
//! println!("{} of {}", page.len(), page.pagination().total_count);
//! ```

use std::sync::Arc;

use crate::auth::OAuth2TokenManager;
use crate::clients::{
    HttpClient, HttpMethod, HttpRequest, HttpResponse, Middleware, ParameterEncoding,
};
use crate::config::{BaseUrl, NodeConfig};
use crate::payload::{Parameters, PayloadError, PayloadValue, RequestPayload};
use crate::rest::pagination::keys;
use crate::rest::{
    extract, parameters_from_filters, DetailDeletable, DetailGettable, DetailPatchable,
    DetailPuttable, Filter, FilteredListGettable, IdentifiableResource, ListGettable,
    ListPostable, ListResponse, MetaResource, PayloadConvertible, ResourceError, SinglePostable,
};
use crate::routing::{build_detail_path, ResourceId, Route, RouteKind, RouteTable};

/// One backend: base URL, routes and dispatcher.
///
/// Cloning is cheap enough to hand a node to several tasks; clones share
/// the token manager.
#[derive(Clone, Debug)]
pub struct Node {
    config: NodeConfig,
    routes: RouteTable,
    client: HttpClient,
    token_manager: Option<OAuth2TokenManager>,
}

// Verify Node is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Node>();
};

impl Node {
    /// Creates a node without authentication.
    #[must_use]
    pub fn new(config: NodeConfig, routes: RouteTable) -> Self {
        let client = HttpClient::new(config.user_agent_prefix());
        Self {
            config,
            routes,
            client,
            token_manager: None,
        }
    }

    /// Fronts every request with `manager`.
    #[must_use]
    pub fn with_token_manager(mut self, manager: OAuth2TokenManager) -> Self {
        self.client = self.client.with_middleware(Arc::new(manager.clone()));
        self.token_manager = Some(manager);
        self
    }

    /// Registers an additional middleware after the existing ones.
    #[must_use]
    pub fn with_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.client = self.client.with_middleware(middleware);
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// Returns the base URL.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        self.config.base_url()
    }

    /// Returns the route table.
    #[must_use]
    pub const fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Returns the dispatcher.
    #[must_use]
    pub const fn client(&self) -> &HttpClient {
        &self.client
    }

    /// Returns the token manager, if the node authenticates.
    #[must_use]
    pub const fn token_manager(&self) -> Option<&OAuth2TokenManager> {
        self.token_manager.as_ref()
    }

    // URLs

    /// Returns the relative URL of `T`'s `kind` route.
    ///
    /// # Panics
    ///
    /// Panics if the route table has no route or several routes for `T`
    /// and `kind`.
    #[must_use]
    pub fn relative_url<T: MetaResource>(&self, kind: RouteKind) -> &str {
        self.routes.resolve::<T>(kind).template()
    }

    /// Returns the absolute URL of `T`'s `kind` route.
    ///
    /// # Panics
    ///
    /// See [`Node::relative_url`].
    #[must_use]
    pub fn absolute_url<T: MetaResource>(&self, kind: RouteKind) -> String {
        self.base_url().join(self.relative_url::<T>(kind))
    }

    /// Returns the relative detail URL of `id`.
    ///
    /// # Panics
    ///
    /// See [`Node::relative_url`].
    #[must_use]
    pub fn relative_url_for_id<T: MetaResource>(&self, id: &ResourceId<T>, kind: RouteKind) -> String {
        build_detail_path(self.relative_url::<T>(kind), id.as_str())
    }

    /// Returns the absolute detail URL of `id`.
    ///
    /// # Panics
    ///
    /// See [`Node::relative_url`].
    #[must_use]
    pub fn absolute_url_for_id<T: MetaResource>(&self, id: &ResourceId<T>, kind: RouteKind) -> String {
        self.base_url().join(&self.relative_url_for_id(id, kind))
    }

    /// Returns the relative detail URL of `resource`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingId`] if `resource` has no id.
    ///
    /// # Panics
    ///
    /// See [`Node::relative_url`].
    pub fn relative_detail_url<T: IdentifiableResource>(
        &self,
        resource: &T,
        kind: RouteKind,
    ) -> Result<String, ResourceError> {
        let id = resource.id().ok_or(ResourceError::MissingId {
            resource: T::resource_name(),
        })?;
        Ok(self.relative_url_for_id(&id, kind))
    }

    /// Returns the absolute detail URL of `resource`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingId`] if `resource` has no id.
    ///
    /// # Panics
    ///
    /// See [`Node::relative_url`].
    pub fn absolute_detail_url<T: IdentifiableResource>(
        &self,
        resource: &T,
        kind: RouteKind,
    ) -> Result<String, ResourceError> {
        Ok(self.base_url().join(&self.relative_detail_url(resource, kind)?))
    }

    // Parameters

    /// Returns the default list limit for `T`.
    #[must_use]
    pub fn default_limit_for<T: MetaResource>(&self) -> u64 {
        self.config.default_limit_for::<T>()
    }

    /// Returns the default filters for `T`.
    #[must_use]
    pub fn default_filters_for<T: FilteredListGettable>(&self) -> &[Filter] {
        self.config.default_filters_for::<T>()
    }

    /// Builds `offset` and `limit` query parameters.
    #[must_use]
    pub fn parameters_from_page(&self, offset: u64, limit: u64) -> Parameters {
        Parameters::from([
            (keys::OFFSET.to_string(), PayloadValue::from(offset)),
            (keys::LIMIT.to_string(), PayloadValue::from(limit)),
        ])
    }

    /// Builds query parameters from filters.
    #[must_use]
    pub fn parameters_from_filters(&self, filters: &[Filter]) -> Parameters {
        parameters_from_filters(filters)
    }

    /// Builds list query parameters. Filter keys win over `offset`/`limit`.
    #[must_use]
    pub fn parameters_from(&self, offset: u64, limit: u64, filters: &[Filter]) -> Parameters {
        let mut parameters = self.parameters_from_page(offset, limit);
        parameters.extend(self.parameters_from_filters(filters));
        parameters
    }

    // Payloads

    /// Builds the payload for sending `object` with `method`.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError`] if the object cannot be converted.
    pub fn payload_from<T: PayloadConvertible>(
        &self,
        object: &T,
        method: HttpMethod,
    ) -> Result<RequestPayload, PayloadError> {
        object.to_payload(method)
    }

    /// Builds a list POST payload, placing each object under `objects[i]`.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError`] if any object cannot be converted.
    pub fn payload_from_list<T: ListPostable>(
        &self,
        objects: &[T],
    ) -> Result<RequestPayload, PayloadError> {
        let payloads = objects
            .iter()
            .map(|object| object.to_payload(HttpMethod::Post))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RequestPayload::indexed(extract::OBJECTS_KEY, payloads))
    }

    // Operations

    /// Fetches one page of `T`.
    ///
    /// A `limit` of `0` uses the configured default limit for `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the request fails or the response does
    /// not decode.
    ///
    /// # Panics
    ///
    /// Panics if `T` has no unique list GET route.
    pub async fn get_list<T: ListGettable>(
        &self,
        offset: u64,
        limit: u64,
    ) -> Result<ListResponse<T, T::Pagination>, ResourceError> {
        self.fetch_list::<T>(offset, limit, &[]).await
    }

    /// Fetches one page of `T` matching `filters`.
    ///
    /// With `add_default_filters` the configured default filters for `T`
    /// are applied first, so explicit filters win on key collision.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the request fails or the response does
    /// not decode.
    ///
    /// # Panics
    ///
    /// Panics if `T` has no unique list GET route.
    pub async fn get_filtered_list<T: FilteredListGettable>(
        &self,
        offset: u64,
        limit: u64,
        filters: &[Filter],
        add_default_filters: bool,
    ) -> Result<ListResponse<T, T::Pagination>, ResourceError> {
        let mut all_filters = Vec::new();
        if add_default_filters {
            all_filters.extend_from_slice(self.default_filters_for::<T>());
        }
        all_filters.extend_from_slice(filters);
        self.fetch_list::<T>(offset, limit, &all_filters).await
    }

    async fn fetch_list<T: ListGettable>(
        &self,
        offset: u64,
        limit: u64,
        filters: &[Filter],
    ) -> Result<ListResponse<T, T::Pagination>, ResourceError> {
        let limit = if limit == 0 {
            self.default_limit_for::<T>()
        } else {
            limit
        };
        let route = self.routes.resolve::<T>(RouteKind::ListGet);
        let url = self.base_url().join(route.template());
        let parameters = self.parameters_from(offset, limit, filters);

        let response = self
            .dispatch::<T>(route, url, Some(RequestPayload::Json(parameters)), None)
            .await?;
        let (pagination, objects) = extract::extract_list_response(&response.body)?;
        Ok(ListResponse::new(pagination, objects))
    }

    /// Fetches the `T` identified by `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] on `404`, or another
    /// [`ResourceError`] if the request fails or the response does not
    /// decode.
    ///
    /// # Panics
    ///
    /// Panics if `T` has no unique detail GET route.
    pub async fn get_detail<T: DetailGettable>(&self, id: &ResourceId<T>) -> Result<T, ResourceError> {
        let route = self.routes.resolve::<T>(RouteKind::DetailGet);
        let url = self.absolute_url_for_id(id, RouteKind::DetailGet);
        let response = self.dispatch::<T>(route, url, None, Some(id.as_str())).await?;
        extract::extract_single_object(&response.body)
    }

    /// Creates `object` and returns the server's representation.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::ValidationFailed`] on `400`, or another
    /// [`ResourceError`] if the payload cannot be built, the request fails
    /// or the response does not decode.
    ///
    /// # Panics
    ///
    /// Panics if `T` has no unique single POST route.
    pub async fn post<T: SinglePostable>(&self, object: &T) -> Result<T, ResourceError> {
        let route = self.routes.resolve::<T>(RouteKind::SinglePost);
        let url = self.base_url().join(route.template());
        let payload = self.payload_from(object, route.http_method())?;
        let response = self.dispatch::<T>(route, url, Some(payload), None).await?;
        extract::extract_single_object(&response.body)
    }

    /// Creates all `objects` in one request.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the payload cannot be built, the request
    /// fails or the response has no `results` array.
    ///
    /// # Panics
    ///
    /// Panics if `T` has no unique list POST route.
    pub async fn post_list<T: ListPostable>(&self, objects: &[T]) -> Result<Vec<T>, ResourceError> {
        let route = self.routes.resolve::<T>(RouteKind::ListPost);
        let url = self.base_url().join(route.template());
        let payload = self.payload_from_list(objects)?;
        let response = self.dispatch::<T>(route, url, Some(payload), None).await?;
        extract::extract_post_list_response(&response.body)
    }

    /// Replaces `object` on the server.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingId`] if `object` has no id, or
    /// another [`ResourceError`] if the request fails or the response does
    /// not decode.
    ///
    /// # Panics
    ///
    /// Panics if `T` has no unique detail PUT route.
    pub async fn put<T: DetailPuttable>(&self, object: &T) -> Result<T, ResourceError> {
        self.send_detail_update(object, RouteKind::DetailPut).await
    }

    /// Partially updates `object` on the server.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingId`] if `object` has no id, or
    /// another [`ResourceError`] if the request fails or the response does
    /// not decode.
    ///
    /// # Panics
    ///
    /// Panics if `T` has no unique detail PATCH route.
    pub async fn patch<T: DetailPatchable>(&self, object: &T) -> Result<T, ResourceError> {
        self.send_detail_update(object, RouteKind::DetailPatch).await
    }

    async fn send_detail_update<T>(&self, object: &T, kind: RouteKind) -> Result<T, ResourceError>
    where
        T: IdentifiableResource + PayloadConvertible + serde::de::DeserializeOwned,
    {
        let route = self.routes.resolve::<T>(kind);
        let url = self.absolute_detail_url(object, kind)?;
        let id = object.id();
        let payload = self.payload_from(object, route.http_method())?;
        let response = self
            .dispatch::<T>(route, url, Some(payload), id.as_ref().map(ResourceId::as_str))
            .await?;
        extract::extract_single_object(&response.body)
    }

    /// Deletes `object` on the server.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingId`] if `object` has no id, or
    /// another [`ResourceError`] if the request fails.
    ///
    /// # Panics
    ///
    /// Panics if `T` has no unique detail DELETE route.
    pub async fn delete<T: DetailDeletable>(&self, object: &T) -> Result<(), ResourceError> {
        let route = self.routes.resolve::<T>(RouteKind::DetailDelete);
        let url = self.absolute_detail_url(object, RouteKind::DetailDelete)?;
        let id = object.id();
        self.dispatch::<T>(route, url, None, id.as_ref().map(ResourceId::as_str))
            .await?;
        Ok(())
    }

    async fn dispatch<T: MetaResource>(
        &self,
        route: &Route,
        url: String,
        payload: Option<RequestPayload>,
        id: Option<&str>,
    ) -> Result<HttpResponse, ResourceError> {
        let method = route.http_method();
        let kind = route.kind();
        let encoding = if method.encodes_in_url() {
            ParameterEncoding::Url
        } else {
            T::body_encoding()
        };

        tracing::debug!(
            resource = T::resource_name(),
            route = %kind,
            %method,
            %url,
            "running resource operation"
        );

        let mut builder = HttpRequest::builder(method, url)
            .encoding(encoding)
            .acceptable_status_codes(T::acceptable_status_codes(kind))
            .acceptable_content_types(T::acceptable_content_types(kind));
        if let Some(payload) = payload {
            builder = builder.payload(payload);
        }
        let request = builder.build().map_err(crate::clients::HttpError::from)?;

        self.client
            .request(request)
            .await
            .map_err(|error| ResourceError::from_http_error(error, T::resource_name(), id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::{Comparator, DefaultPagination};
    use crate::payload::flatten_parameters;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct Widget {
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<ResourceId<Widget>>,
        name: String,
    }

    impl MetaResource for Widget {}
    impl ListGettable for Widget {
        type Pagination = DefaultPagination;
    }
    impl FilteredListGettable for Widget {}
    impl IdentifiableResource for Widget {
        fn id(&self) -> Option<ResourceId<Self>> {
            self.id.clone()
        }
    }
    impl PayloadConvertible for Widget {}
    impl ListPostable for Widget {}

    fn node() -> Node {
        let config = NodeConfig::builder()
            .base_url(BaseUrl::new("https://api.example.com/v1/").unwrap())
            .default_limit_for::<Widget>(20)
            .build()
            .unwrap();
        let routes = RouteTable::new()
            .with_route(Route::list_get::<Widget>("widgets/"))
            .with_route(Route::detail_put::<Widget>("widgets/"))
            .with_route(Route::detail_delete::<Widget>("widgets/{id}/remove/"));
        Node::new(config, routes)
    }

    fn widget(id: Option<&str>) -> Widget {
        Widget {
            id: id.and_then(ResourceId::new),
            name: "w".to_string(),
        }
    }

    #[test]
    fn test_absolute_url_joins_base_url() {
        assert_eq!(
            node().absolute_url::<Widget>(RouteKind::ListGet),
            "https://api.example.com/v1/widgets/"
        );
    }

    #[test]
    fn test_detail_urls() {
        let node = node();
        assert_eq!(
            node.absolute_detail_url(&widget(Some("7")), RouteKind::DetailPut)
                .unwrap(),
            "https://api.example.com/v1/widgets/7/"
        );
        assert_eq!(
            node.relative_detail_url(&widget(Some("7")), RouteKind::DetailDelete)
                .unwrap(),
            "widgets/7/remove/"
        );
    }

    #[test]
    fn test_detail_url_without_id_is_recoverable() {
        let result = node().absolute_detail_url(&widget(None), RouteKind::DetailPut);
        assert!(matches!(
            result,
            Err(ResourceError::MissingId { resource: "Widget" })
        ));
    }

    #[test]
    #[should_panic(expected = "No detail GET route registered")]
    fn test_missing_route_panics() {
        let _ = node().absolute_url::<Widget>(RouteKind::DetailGet);
    }

    #[test]
    fn test_parameters_from_page_round_trip() {
        let parameters = node().parameters_from_page(10, 100);
        let pairs = flatten_parameters(&parameters);
        assert_eq!(
            pairs,
            vec![
                ("limit".to_string(), "100".to_string()),
                ("offset".to_string(), "10".to_string()),
            ]
        );

        let decoded: std::collections::HashMap<String, u64> = pairs
            .into_iter()
            .map(|(key, value)| (key, value.parse().unwrap()))
            .collect();
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[keys::OFFSET], 10);
        assert_eq!(decoded[keys::LIMIT], 100);
    }

    #[test]
    fn test_parameters_from_merges_filters_last() {
        let parameters = node().parameters_from(
            0,
            10,
            &[
                Filter::new("name", Comparator::IContains, "blubb"),
                Filter::equals("limit", 3_i64),
            ],
        );
        assert_eq!(parameters["name__icontains"], PayloadValue::from("blubb"));
        assert_eq!(parameters["limit"], PayloadValue::from(3_i64));
        assert_eq!(parameters["offset"], PayloadValue::from(0_u64));
    }

    #[test]
    fn test_default_limit_per_resource() {
        assert_eq!(node().default_limit_for::<Widget>(), 20);
    }

    #[test]
    fn test_payload_from_list_places_objects_under_key() {
        let payload = node()
            .payload_from_list(&[widget(None), widget(None)])
            .unwrap();
        let RequestPayload::Json(fields) = payload else {
            panic!("Expected JSON payload");
        };
        assert_eq!(fields["objects"].as_array().map(<[_]>::len), Some(2));
    }

    #[test]
    fn test_with_token_manager_registers_middleware() {
        use crate::auth::{InMemoryCredentialStore, OAuth2Settings};
        use crate::config::AppSecret;

        let settings = OAuth2Settings::builder()
            .app_secret(AppSecret::new("c2VjcmV0").unwrap())
            .token_url(BaseUrl::new("https://api.example.com/o/token/").unwrap())
            .revoke_url(BaseUrl::new("https://api.example.com/o/revoke_token/").unwrap())
            .build()
            .unwrap();
        let manager = OAuth2TokenManager::new(settings, Arc::new(InMemoryCredentialStore::new()));

        let node = node().with_token_manager(manager);
        assert_eq!(node.client().middleware_count(), 1);
        assert!(node.token_manager().is_some());
    }
}
