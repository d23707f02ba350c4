use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use url::Url;

use crate::config::{ApiConfig, Env};
use crate::errors::{ApprovalError, Result};
use crate::transport::{HttpRequest, Transport};

pub const CREATE_APPROVAL_PATH: &str = "/v1/workflows/approval";
pub const UPDATE_STATUS_PATH: &str = "/v1/workflows/approval/status";

/// Thin JSON-over-HTTP client for the workflow approval API.
pub struct ApiClient<T> {
    transport: T,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// POST `body` as JSON to `path` under the configured base URL and
    /// return the raw response body. Anything other than 200 is an error.
    pub async fn post<B>(&self, env: &Env, path: &str, body: &B) -> Result<String>
    where
        B: Serialize + ?Sized,
    {
        tracing::debug!(path, "posting to platform API");

        let cfg = ApiConfig::from_env(env)?;
        let url = join_path(&cfg.base_url, path)?;

        let payload = serde_json::to_vec(body)?;
        tracing::debug!(payload = %String::from_utf8_lossy(&payload), "request payload");

        let request = HttpRequest {
            method: Method::POST,
            url: url.clone(),
            headers: json_headers(&cfg.token)?,
            body: payload,
        };

        let resp = self.transport.send(request).await?;

        if resp.status != StatusCode::OK {
            tracing::debug!(status = %resp.status, body = %resp.body, "platform API rejected request");
            return Err(ApprovalError::Http {
                method: Method::POST.to_string(),
                url: url.to_string(),
                code: resp.status.as_u16(),
                reason: resp.status.canonical_reason().unwrap_or_default().to_string(),
                body: resp.body,
            });
        }

        Ok(resp.body)
    }
}

fn json_headers(token: &str) -> Result<HeaderMap> {
    let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
        .context("API_TOKEN is not a valid header value")?;
    auth.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, auth);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    Ok(headers)
}

/// Append `path` to the base URL's own path instead of replacing it.
pub fn join_path(base: &str, path: &str) -> Result<Url> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|_| ApprovalError::InvalidUrl(format!("{} cannot be used as a base URL", base)))?
        .pop_if_empty()
        .extend(path.split('/').filter(|s| !s.is_empty()));
    Ok(url)
}
