//! HTTP client abstraction for making requests to the fitportal backend

use log::{debug, warn};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE},
    Client, Method, RequestBuilder,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use url::Url;

use crate::config::ClientOptions;
use crate::error::{Error, Result};

/// The one configured client every feature issues its requests through.
///
/// Cloning is cheap: the underlying connection pool and cookie store are
/// shared, so the session cookie set by a login is replayed by every clone.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    http_client: Client,
    client_info: String,
}

impl ApiClient {
    /// Create a new client from options
    pub fn new(options: &ClientOptions) -> Result<Self> {
        let mut base_url = Url::parse(&options.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::config(format!("{} cannot be used as a base URL", base_url)));
        }
        // Relative joins must keep any path prefix of the origin
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut builder = Client::builder().cookie_store(options.cookie_store);
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url,
            http_client,
            client_info: options.client_info.clone(),
        })
    }

    /// The configured origin
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an API path such as `/api/session` against the origin
    pub fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Start a request with an arbitrary method
    pub fn fetch(&self, method: Method, path: &str) -> FetchBuilder<'_> {
        FetchBuilder::new(self, path, method)
    }

    /// Create a GET request
    pub fn get(&self, path: &str) -> FetchBuilder<'_> {
        self.fetch(Method::GET, path)
    }

    /// Create a POST request
    pub fn post(&self, path: &str) -> FetchBuilder<'_> {
        self.fetch(Method::POST, path)
    }

    /// Create a PATCH request
    pub fn patch(&self, path: &str) -> FetchBuilder<'_> {
        self.fetch(Method::PATCH, path)
    }

    /// Create a DELETE request
    pub fn delete(&self, path: &str) -> FetchBuilder<'_> {
        self.fetch(Method::DELETE, path)
    }

    /// Issue one request and return the decoded JSON body.
    ///
    /// Fire-once: there are no retries. Empty bodies decode as `Value::Null`.
    pub async fn request(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        let mut builder = self.fetch(method, path);
        if let Some(body) = body {
            builder = builder.json(&body)?;
        }
        builder.execute().await
    }
}

/// Helper for building and executing HTTP requests
pub struct FetchBuilder<'a> {
    api: &'a ApiClient,
    path: String,
    method: Method,
    headers: HeaderMap,
    query_params: Vec<(String, String)>,
    segments: Vec<String>,
    body: Option<Vec<u8>>,
}

impl<'a> FetchBuilder<'a> {
    /// Create a new FetchBuilder
    pub fn new(api: &'a ApiClient, path: &str, method: Method) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Ok(value) = HeaderValue::from_str(&api.client_info) {
            headers.insert(HeaderName::from_static("x-client-info"), value);
        }

        Self {
            api,
            path: path.to_string(),
            method,
            headers,
            query_params: Vec::new(),
            segments: Vec::new(),
            body: None,
        }
    }

    /// Add a header to the request
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Add a query parameter to the request
    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.query_params.push((key.to_string(), value.to_string()));
        self
    }

    /// Append one percent-encoded path segment, such as a record id.
    ///
    /// `/`, `?` and `#` inside the value are encoded rather than
    /// interpreted. Empty, `.` and `..` segments are rejected when the
    /// request is built.
    pub fn segment<T: ToString>(mut self, value: T) -> Self {
        self.segments.push(value.to_string());
        self
    }

    /// Add a JSON body to the request
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_vec(body)?);
        Ok(self)
    }

    /// Build the request
    fn build(&self) -> Result<RequestBuilder> {
        let mut url = self.api.url(&self.path)?;

        if !self.segments.is_empty() {
            if let Some(bad) = self
                .segments
                .iter()
                .find(|s| matches!(s.as_str(), "" | "." | ".."))
            {
                return Err(Error::invalid_state(format!(
                    "{:?} cannot be used as a path segment",
                    bad
                )));
            }
            url.path_segments_mut()
                .map_err(|()| Error::config("base URL cannot take path segments"))?
                .pop_if_empty()
                .extend(&self.segments);
        }

        if !self.query_params.is_empty() {
            let mut query_pairs = url.query_pairs_mut();
            for (key, value) in &self.query_params {
                query_pairs.append_pair(key, value);
            }
        }

        let mut req = self
            .api
            .http_client
            .request(self.method.clone(), url)
            .headers(self.headers.clone());

        if let Some(body) = &self.body {
            req = req.body(body.clone());
        }

        Ok(req)
    }

    /// Execute the request and parse the response as JSON.
    ///
    /// Non-2xx statuses become [`Error::Http`]; transport failures become
    /// [`Error::Network`]. An empty body (e.g. 204) decodes as JSON `null`,
    /// so `T = ()` accepts it.
    pub async fn execute<T: DeserializeOwned>(&self) -> Result<T> {
        let req = self.build()?;
        debug!("{} {}", self.method, self.path);

        let response = req.send().await.map_err(|e| {
            warn!("{} {} failed to reach server: {}", self.method, self.path, e);
            Error::Network(e)
        })?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!("{} {} returned {}", self.method, self.path, status);
            return Err(Error::Http { status, body: text });
        }

        let body = if text.trim().is_empty() { "null" } else { text.as_str() };
        Ok(serde_json::from_str(body)?)
    }

    /// Execute the request and discard the response body
    pub async fn execute_empty(&self) -> Result<()> {
        self.execute::<Value>().await.map(|_| ())
    }
}
