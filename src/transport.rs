//! HTTP transport used to reach the platform API.
//!
//! The dispatcher only ever talks to [`Transport`], so tests can swap in a
//! double that records the request instead of hitting the network.
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use url::Url;

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and read the whole response body.
    async fn send(&self, request: HttpRequest) -> anyhow::Result<HttpResponse>;
}

/// Default transport backed by `reqwest`.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("manual-approval/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> anyhow::Result<HttpResponse> {
        let url = request.url.to_string();
        let resp = self
            .client
            .request(request.method, request.url)
            .headers(request.headers)
            .body(request.body)
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .with_context(|| format!("failed to read response body from {}", url))?;

        Ok(HttpResponse { status, body })
    }
}
