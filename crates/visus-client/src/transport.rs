//! Network transport for array requests.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{header, Client, Url};
use seaview_common::{FieldError, FieldResult};
use tracing::debug;

use crate::config::ClientConfig;
use crate::payload::MSGPACK_CONTENT_TYPE;

/// A single-attempt GET returning the full response body.
///
/// Implementations must map every failure (connection, timeout, non-success
/// status) to [`FieldError::Transport`] and must not retry.
#[async_trait]
pub trait ArrayTransport: Send + Sync {
    async fn get(&self, url: &Url) -> FieldResult<Bytes>;
}

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport with the timeouts from `config`.
    pub fn new(config: &ClientConfig) -> FieldResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .build()
            .map_err(|e| FieldError::config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Wrap an existing client, e.g. one shared with other components.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ArrayTransport for HttpTransport {
    async fn get(&self, url: &Url) -> FieldResult<Bytes> {
        let response = self
            .client
            .get(url.clone())
            .header(header::ACCEPT, MSGPACK_CONTENT_TYPE)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FieldError::transport(
                Some(status.as_u16()),
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string(),
            ));
        }

        let body = response.bytes().await.map_err(map_reqwest_error)?;
        debug!(bytes = body.len(), "Received array payload");
        Ok(body)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FieldError {
    let message = if err.is_timeout() {
        format!("request timed out: {}", err)
    } else if err.is_connect() {
        format!("connection failed: {}", err)
    } else {
        err.to_string()
    };
    FieldError::transport(err.status().map(|s| s.as_u16()), message)
}
