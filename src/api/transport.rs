use super::error::ApiError;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json(&self, url: &str) -> Result<Value, ApiError> {
        serde_json::from_slice(&self.body).map_err(|e| ApiError::decode(url, e.to_string()))
    }
}

/// Raw HTTP exchange with the backend. Status codes are returned, not
/// interpreted; callers decide what a non-2xx reply means.
pub trait Transport: Send + Sync {
    fn post_json(&self, url: &str, body: &Value) -> Result<Reply, ApiError>;
    fn get(&self, url: &str) -> Result<Reply, ApiError>;
}

#[derive(Debug, Clone, Default)]
pub struct HttpOptions {
    pub accept_invalid_certs: bool,
    pub timeout: Option<Duration>,
}

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(opts: &HttpOptions) -> anyhow::Result<Self> {
        // The blocking client defaults to a 30s timeout; only set one when asked.
        let client = Client::builder()
            .danger_accept_invalid_certs(opts.accept_invalid_certs)
            .timeout(opts.timeout)
            .build()?;
        Ok(Self { client })
    }

    fn finish(url: &str, resp: reqwest::blocking::Response) -> Result<Reply, ApiError> {
        let status = resp.status().as_u16();
        let body = resp
            .bytes()
            .map_err(|e| ApiError::transport(url, e.to_string()))?
            .to_vec();
        tracing::debug!(url, status, bytes = body.len(), "backend reply");
        Ok(Reply { status, body })
    }
}

impl Transport for HttpTransport {
    fn post_json(&self, url: &str, body: &Value) -> Result<Reply, ApiError> {
        let payload =
            serde_json::to_vec(body).map_err(|e| ApiError::transport(url, e.to_string()))?;
        let resp = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(payload)
            .send()
            .map_err(|e| ApiError::transport(url, e.to_string()))?;
        Self::finish(url, resp)
    }

    fn get(&self, url: &str) -> Result<Reply, ApiError> {
        let resp = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .map_err(|e| ApiError::transport(url, e.to_string()))?;
        Self::finish(url, resp)
    }
}
