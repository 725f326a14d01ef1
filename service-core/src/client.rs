//! Outbound HTTP client shared by services.

use crate::observability::inject_trace_context;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("invalid header '{0}'")]
    InvalidHeader(String),

    #[error("send {method} request: {source}")]
    Request {
        method: Method,
        #[source]
        source: reqwest::Error,
    },

    #[error("{method} request failed with http status code: {status}")]
    Status { method: Method, status: StatusCode },

    #[error("read response: {0}")]
    Body(#[source] reqwest::Error),
}

/// A successful (2xx) response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
}

impl HttpClient {
    /// `insecure_skip_verify` accepts invalid TLS certificates; only meant for
    /// talking to test endpoints.
    pub fn new(insecure_skip_verify: bool) -> Result<Self, ClientError> {
        let inner = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .danger_accept_invalid_certs(insecure_skip_verify)
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self { inner })
    }

    pub async fn get(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
    ) -> Result<HttpResponse, ClientError> {
        self.send(Method::GET, url, None, headers).await
    }

    pub async fn post(
        &self,
        url: &str,
        body: Vec<u8>,
        headers: &HashMap<String, String>,
    ) -> Result<HttpResponse, ClientError> {
        self.send(Method::POST, url, Some(body), headers).await
    }

    #[tracing::instrument(skip(self, method, body, headers), fields(method = %method))]
    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<Vec<u8>>,
        headers: &HashMap<String, String>,
    ) -> Result<HttpResponse, ClientError> {
        let mut header_map = to_header_map(headers)?;
        inject_trace_context(&mut header_map);

        let mut request = self.inner.request(method.clone(), url).headers(header_map);
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request
            .send()
            .await
            .map_err(|source| ClientError::Request {
                method: method.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status { method, status });
        }

        let body = response.bytes().await.map_err(ClientError::Body)?;

        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}

fn to_header_map(headers: &HashMap<String, String>) -> Result<HeaderMap, ClientError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (key, value) in headers {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|_| ClientError::InvalidHeader(key.clone()))?;
        let value =
            HeaderValue::from_str(value).map_err(|_| ClientError::InvalidHeader(key.clone()))?;
        map.insert(name, value);
    }
    Ok(map)
}
