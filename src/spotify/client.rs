use std::{sync::Arc, time::Duration};

use reqwest::{
    Client, Method, RequestBuilder, Response,
    header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Every upstream call gives up after this long.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Parameters of an upstream call: query string for GET, body otherwise.
pub type Params = Map<String, Value>;

/// Turns a `json!({...})` literal into [`Params`]. Anything but an object
/// yields an empty map.
pub fn params(value: Value) -> Params {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Thin client over the Spotify Web API.
///
/// Cloning is cheap; clones share the underlying connection pool, which is
/// what lets fan-out tasks each own a handle.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    base_url: Arc<str>,
}

impl SpotifyClient {
    /// Creates a client resolving relative endpoints against `base_url`.
    ///
    /// # Errors
    ///
    /// Fails if the TLS backend cannot be initialized.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(transport_error)?;

        Ok(Self {
            http,
            base_url: Arc::from(base_url.into().trim_end_matches('/')),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `http://…` and `https://…` are used as-is, anything else is appended
    /// to the base URL.
    pub fn resolve_url(&self, endpoint: &str) -> String {
        if is_absolute_url(endpoint) {
            return endpoint.to_string();
        }
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    /// Builds, without sending, the request [`SpotifyClient::call`] would
    /// send.
    ///
    /// Caller `headers` override the defaults (`Content-Type:
    /// application/x-www-form-urlencoded`, `Accept: application/json`).
    /// GET carries `params` as query string, every other method as a JSON
    /// body, never both.
    pub fn request(
        &self,
        method: Method,
        endpoint: &str,
        params: Option<&Params>,
        headers: HeaderMap,
    ) -> RequestBuilder {
        let mut merged = default_headers();
        merged.extend(headers);

        let is_get = method == Method::GET;
        let builder = self
            .http
            .request(method, self.resolve_url(endpoint))
            .headers(merged);

        match params {
            Some(p) if is_get => builder.query(&query_pairs(p)),
            Some(p) => builder.body(Value::Object(p.clone()).to_string()),
            None => builder,
        }
    }

    /// Sends a request to the Spotify Web API and returns the decoded JSON
    /// body (`null` for empty bodies).
    ///
    /// # Errors
    ///
    /// Non-2xx replies, timeouts and transport failures all surface as
    /// [`ApiError::Upstream`]. Nothing is retried.
    pub async fn call(
        &self,
        method: Method,
        endpoint: &str,
        params: Option<&Params>,
        headers: HeaderMap,
    ) -> Result<Value, ApiError> {
        tracing::debug!(%method, endpoint, "calling spotify");
        let response = self
            .request(method, endpoint, params, headers)
            .send()
            .await
            .map_err(transport_error)?;
        read_response(response).await
    }

    pub async fn get(
        &self,
        endpoint: &str,
        params: Option<&Params>,
        headers: HeaderMap,
    ) -> Result<Value, ApiError> {
        self.call(Method::GET, endpoint, params, headers).await
    }

    pub async fn post(
        &self,
        endpoint: &str,
        params: Option<&Params>,
        headers: HeaderMap,
    ) -> Result<Value, ApiError> {
        self.call(Method::POST, endpoint, params, headers).await
    }

    pub async fn put(
        &self,
        endpoint: &str,
        params: Option<&Params>,
        headers: HeaderMap,
    ) -> Result<Value, ApiError> {
        self.call(Method::PUT, endpoint, params, headers).await
    }

    pub async fn delete(
        &self,
        endpoint: &str,
        params: Option<&Params>,
        headers: HeaderMap,
    ) -> Result<Value, ApiError> {
        self.call(Method::DELETE, endpoint, params, headers).await
    }

    /// POSTs a form-encoded body to an absolute URL. The accounts token
    /// endpoint only understands form bodies.
    pub async fn post_form(
        &self,
        url: &str,
        form: &[(&str, &str)],
        headers: HeaderMap,
    ) -> Result<Value, ApiError> {
        tracing::debug!(url, "posting form to spotify");
        let response = self
            .http
            .post(url)
            .headers(headers)
            .form(form)
            .send()
            .await
            .map_err(transport_error)?;
        read_response(response).await
    }
}

pub fn is_absolute_url(endpoint: &str) -> bool {
    ["http://", "https://"]
        .iter()
        .any(|scheme| endpoint.len() > scheme.len() && endpoint.starts_with(scheme))
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("application/x-www-form-urlencoded"),
    );
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

/// Flattens params into query pairs. `null` values are dropped, arrays are
/// joined with commas.
fn query_pairs(params: &Params) -> Vec<(String, String)> {
    params
        .iter()
        .filter_map(|(key, value)| {
            let value = match value {
                Value::Null => return None,
                Value::String(s) => s.clone(),
                Value::Array(items) => items
                    .iter()
                    .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
                    .collect::<Vec<_>>()
                    .join(","),
                other => other.to_string(),
            };
            Some((key.clone(), value))
        })
        .collect()
}

async fn read_response(response: Response) -> Result<Value, ApiError> {
    let status = response.status();
    let bytes = response.bytes().await.map_err(transport_error)?;
    let body = parse_body(&bytes);

    if status.is_success() {
        return Ok(body);
    }

    let message = upstream_message(&body)
        .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()));
    Err(ApiError::Upstream {
        status: Some(status.as_u16()),
        message,
        body: (!body.is_null()).then_some(body),
    })
}

fn parse_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

/// Pulls a human readable message out of an error body. The Web API nests it
/// as `{"error": {"message": …}}`, the accounts service uses
/// `{"error": …, "error_description": …}`.
pub fn upstream_message(body: &Value) -> Option<String> {
    let message = body
        .pointer("/error/message")
        .or_else(|| body.get("error_description"))
        .or_else(|| body.get("error"))
        .and_then(Value::as_str)
        .or_else(|| body.as_str())?;

    (!message.trim().is_empty()).then(|| message.to_string())
}

fn transport_error(err: reqwest::Error) -> ApiError {
    let message = if err.is_timeout() {
        format!("timeout of {}ms exceeded", REQUEST_TIMEOUT.as_millis())
    } else {
        err.to_string()
    };

    ApiError::Upstream {
        status: err.status().map(|s| s.as_u16()),
        message,
        body: None,
    }
}
