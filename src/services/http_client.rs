//! HTTP transport to the backend API.
//!
//! `Transport` is the seam every controller talks through: one untyped JSON
//! round-trip per call. `HttpClient` is the `reqwest` implementation; tests
//! substitute a scripted one.

use std::time::Duration;

use futures::future::BoxFuture;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use serde_json::Value;

use crate::types::errors::NetworkError;
use crate::types::settings::ClientSettings;

/// HTTP verbs used by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// One JSON round-trip to `/api{path}`.
///
/// A non-2xx status and a transport failure both come back as `NetworkError`.
pub trait Transport: Send + Sync {
    fn call(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> BoxFuture<'static, Result<Value, NetworkError>>;
}

/// `reqwest`-backed transport with a cookie jar and optional session cookie.
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpClient {
    pub fn new(settings: &ClientSettings) -> Result<Self, NetworkError> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = settings.session_cookie.as_deref() {
            let value = HeaderValue::from_str(cookie)
                .map_err(|e| NetworkError::Transport(format!("invalid session cookie: {}", e)))?;
            headers.insert(COOKIE, value);
        }

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|e| NetworkError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }
}

impl Transport for HttpClient {
    fn call(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> BoxFuture<'static, Result<Value, NetworkError>> {
        let url = self.url_for(path);
        let mut request = self.client.request(method.into(), &url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        Box::pin(async move {
            log::debug!("{} {}", method.as_str(), url);
            let response = request
                .send()
                .await
                .map_err(|e| NetworkError::Transport(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(NetworkError::Status(status.as_u16()));
            }

            response
                .json::<Value>()
                .await
                .map_err(|e| NetworkError::Decode(e.to_string()))
        })
    }
}
