use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::error::{FetchCause, FetchError};

/// Network access as an injectable capability.
///
/// One attempt per call; no retries.
#[async_trait]
pub trait HttpClient: Send + Sync + Debug {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    http: Client,
}

impl ReqwestHttpClient {
    pub fn new(timeout: Option<Duration>, user_agent: &str) -> anyhow::Result<Self> {
        let mut builder = Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self { http: builder.build()? })
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        tracing::debug!(%url, "GET");

        let res = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::new(url, FetchCause::Transport(e.to_string())))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| FetchError::new(url, FetchCause::Transport(e.to_string())))?;

        if !status.is_success() {
            tracing::debug!(%url, %status, body = %truncate_body(&body), "non-success status");
            return Err(FetchError::new(url, FetchCause::Status(status.as_u16())));
        }

        serde_json::from_str(&body).map_err(|e| FetchError::new(url, FetchCause::Parse(e.to_string())))
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
