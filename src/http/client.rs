//! REST client strategy
//!
//! Issues the page and detail GET requests of a HATEOAS collection:
//! - Query parameters named after the server's conventions
//! - `Accept` header following the requested representation
//! - Pagination metadata read from the `X-Pagination-*` headers
//! - Non-success statuses classified as errors

use crate::detail::DetailRequest;
use crate::error::{Error, Result};
use crate::pagination::{PageRequest, PaginationMeta};
use crate::resource::{Reply, ResourceStrategy};
use crate::types::{AcceptFormat, JsonObject, StringMap};
use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::header::ACCEPT;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Placeholder replaced by the item id in detail paths
pub const ID_PLACEHOLDER: &str = "{id}";

/// Bytes escaped when an id is placed into a single path segment
const ID_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Reshapes a decoded page record before it becomes an item
pub type PreProcessFn = Arc<dyn Fn(JsonObject) -> JsonObject + Send + Sync>;

/// Names of the query parameters understood by the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParamNames {
    /// 1-based page index
    pub page: String,
    /// Page size
    pub per_page: String,
    /// Comma-joined sort expressions
    pub sort: String,
    /// Comma-joined field subset
    pub fields: String,
}

impl Default for QueryParamNames {
    fn default() -> Self {
        Self {
            page: "page".to_string(),
            per_page: "per-page".to_string(),
            sort: "sort".to_string(),
            fields: "fields".to_string(),
        }
    }
}

/// Configuration for the REST client
#[derive(Debug, Clone)]
pub struct RestClientConfig {
    /// Base URL of the API
    pub base_url: String,
    /// Collection path, relative to the base URL
    pub list_path: String,
    /// Item path containing `{id}`
    pub detail_path: String,
    /// Request timeout
    pub timeout: Duration,
    /// Headers sent with every request
    pub default_headers: StringMap,
    /// User agent string
    pub user_agent: String,
    /// Query parameter naming
    pub query: QueryParamNames,
}

impl Default for RestClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            list_path: String::new(),
            detail_path: ID_PLACEHOLDER.to_string(),
            timeout: Duration::from_secs(30),
            default_headers: StringMap::new(),
            user_agent: format!("solidafy-restlist/{}", env!("CARGO_PKG_VERSION")),
            query: QueryParamNames::default(),
        }
    }
}

impl RestClientConfig {
    /// Create a config builder for the collection at `base_url`/`list_path`
    pub fn builder(base_url: impl Into<String>, list_path: impl Into<String>) -> RestClientConfigBuilder {
        let list_path = list_path.into();
        RestClientConfigBuilder {
            config: Self {
                base_url: base_url.into(),
                detail_path: default_detail_path(&list_path),
                list_path,
                ..Default::default()
            },
        }
    }
}

/// Detail path used when none is configured: `<list_path>/{id}`
pub fn default_detail_path(list_path: &str) -> String {
    format!("{}/{ID_PLACEHOLDER}", list_path.trim_end_matches('/'))
}

/// Builder for REST client config
#[derive(Debug)]
pub struct RestClientConfigBuilder {
    config: RestClientConfig,
}

impl RestClientConfigBuilder {
    /// Set the item path template
    pub fn detail_path(mut self, path: impl Into<String>) -> Self {
        self.config.detail_path = path.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Set query parameter names
    pub fn query_params(mut self, names: QueryParamNames) -> Self {
        self.config.query = names;
        self
    }

    /// Build the config
    pub fn build(self) -> RestClientConfig {
        self.config
    }
}

/// [`ResourceStrategy`] over a REST collection endpoint
///
/// One request per call; retries are left to the consumer, which sees a
/// failure as the controller's `Error` status.
pub struct RestClient {
    client: Client,
    config: RestClientConfig,
    pre_process: Option<PreProcessFn>,
}

impl RestClient {
    /// Create a client for `config`
    pub fn new(config: RestClientConfig) -> Result<Self> {
        if !config.detail_path.contains(ID_PLACEHOLDER) {
            return Err(Error::invalid_value(
                "detail_path",
                format!("must contain {ID_PLACEHOLDER}"),
            ));
        }
        Url::parse(&config.base_url)?;

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            client,
            config,
            pre_process: None,
        })
    }

    /// Reshape every page record with `f` before it is inserted
    #[must_use]
    pub fn with_pre_process(mut self, f: PreProcessFn) -> Self {
        self.pre_process = Some(f);
        self
    }

    /// Client configuration
    pub fn config(&self) -> &RestClientConfig {
        &self.config
    }

    /// URL of the collection
    pub fn list_url(&self) -> Result<Url> {
        self.build_url(&self.config.list_path)
    }

    /// URL of the item `id`
    ///
    /// The id always lands in a single path segment. Empty and dot-segment
    /// ids are rejected since they would address another resource.
    pub fn detail_url(&self, id: &str) -> Result<Url> {
        if matches!(id, "" | "." | "..") {
            return Err(Error::invalid_value(
                "id",
                format!("'{id}' cannot be used as a path segment"),
            ));
        }
        let segment = utf8_percent_encode(id, ID_SEGMENT).to_string();
        let path = self.config.detail_path.replace(ID_PLACEHOLDER, &segment);
        self.build_url(&path)
    }

    /// Query pairs for a page request
    pub fn page_query(&self, request: &PageRequest) -> Vec<(String, String)> {
        let names = &self.config.query;
        let mut query = vec![
            (names.page.clone(), request.page.to_string()),
            (names.per_page.clone(), request.per_page.to_string()),
        ];
        if !request.sort.is_empty() {
            query.push((names.sort.clone(), request.sort.join(",")));
        }
        if !request.fields.is_empty() {
            query.push((names.fields.clone(), request.fields.join(",")));
        }
        query.extend(
            request
                .filters
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        query
    }

    /// Query pairs for a detail request
    pub fn detail_query(&self, request: &DetailRequest) -> Vec<(String, String)> {
        if request.fields.is_empty() {
            return Vec::new();
        }
        vec![(self.config.query.fields.clone(), request.fields.join(","))]
    }

    /// Issue a GET and collect body and pagination headers
    async fn get(&self, url: Url, query: &[(String, String)], accept: AcceptFormat) -> Result<Reply> {
        let mut req = self.client.get(url.clone());

        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }
        req = req.header(ACCEPT, accept.mime());

        if !query.is_empty() {
            req = req.query(query);
        }

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout {
                    timeout_ms: self.config.timeout.as_millis() as u64,
                }
            } else {
                Error::Http(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), %url, "Request failed");
            return Err(Error::http_status(status.as_u16(), body));
        }

        let pagination = PaginationMeta::from_headers(response.headers());
        let body = response.text().await?;
        debug!(%url, bytes = body.len(), ?pagination, "Request succeeded");

        Ok(Reply::with_pagination(body, pagination))
    }

    /// Build full URL from path
    fn build_url(&self, path: &str) -> Result<Url> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Ok(Url::parse(path)?);
        }

        let base = self.config.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }
}

#[async_trait]
impl ResourceStrategy for RestClient {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Reply> {
        let url = self.list_url()?;
        let query = self.page_query(request);
        debug!(%url, page = request.page, full_reload = request.full_reload, "Fetching page");
        self.get(url, &query, request.accept).await
    }

    async fn fetch_detail(&self, request: &DetailRequest) -> Result<Reply> {
        let url = self.detail_url(&request.id)?;
        let query = self.detail_query(request);
        debug!(%url, id = %request.id, "Fetching detail");
        self.get(url, &query, request.accept).await
    }

    fn pre_process(&self, record: JsonObject) -> JsonObject {
        match &self.pre_process {
            Some(f) => f(record),
            None => record,
        }
    }
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("config", &self.config)
            .field("has_pre_process", &self.pre_process.is_some())
            .finish_non_exhaustive()
    }
}
