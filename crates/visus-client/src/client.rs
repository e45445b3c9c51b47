//! Array server client: one descriptor in, one decoded field out.

use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use reqwest::Url;
use seaview_common::{DecodedField, FieldResult};
use tracing::{debug, info, instrument};

use crate::config::ClientConfig;
use crate::payload::RawPayload;
use crate::query::QueryDescriptor;
use crate::transport::{ArrayTransport, HttpTransport};

/// Fetches and decodes velocity sub-volumes.
///
/// Each call is a single attempt; there is no caching and no retry.
#[derive(Clone)]
pub struct VisusClient {
    base_url: Url,
    transport: Arc<dyn ArrayTransport>,
}

impl VisusClient {
    /// Create a client with the default HTTP transport.
    pub fn new(config: &ClientConfig) -> FieldResult<Self> {
        config.validate()?;
        let base_url = config.parsed_base_url()?;
        let transport = Arc::new(HttpTransport::new(config)?);
        Ok(Self::with_transport(base_url, transport))
    }

    /// Create a client over a caller-supplied transport.
    pub fn with_transport(base_url: Url, transport: Arc<dyn ArrayTransport>) -> Self {
        Self {
            base_url,
            transport,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The exact URL a descriptor is sent as.
    pub fn request_url(&self, query: &QueryDescriptor) -> Url {
        query.to_url(&self.base_url)
    }

    /// Perform the round trip and return the undecoded body.
    #[instrument(skip(self), fields(quality = query.quality, time = query.time))]
    pub async fn fetch_raw(&self, query: &QueryDescriptor) -> FieldResult<Bytes> {
        let url = self.request_url(query);
        debug!(url = %url, "Requesting array data");

        let start = Instant::now();
        let body = self.transport.get(&url).await?;

        info!(
            bytes = body.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Array data received"
        );
        Ok(body)
    }

    /// Fetch and decode in one step.
    pub async fn fetch(&self, query: &QueryDescriptor) -> FieldResult<DecodedField> {
        let body = self.fetch_raw(query).await?;
        decode_body(&body)
    }
}

/// Decode a full response body into a validated field.
pub fn decode_body(body: &[u8]) -> FieldResult<DecodedField> {
    RawPayload::from_msgpack(body)?.decode()
}

impl std::fmt::Debug for VisusClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisusClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}
