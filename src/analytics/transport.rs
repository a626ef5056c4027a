use std::time::Duration;

use reqwest::{Client, StatusCode};

use crate::analytics::config::{join_path, EntrolyticsConfig, ProxyConfig, SEND_PATH};
use crate::analytics::error::{internal_error, network_error, EntrolyticsResult};
use crate::analytics::payload::PayloadEnvelope;
use crate::platform::environment;

/// Where payload envelopes are POSTed.
#[derive(Clone, Debug)]
pub enum IngestEndpoint {
    /// The ingestion server itself: `{host_url}/api/send`.
    Host(String),
    /// A first-party proxy in front of the ingestion server.
    Proxy(ProxyConfig),
    /// Custom endpoint (primarily for testing).
    Custom(String),
}

impl IngestEndpoint {
    fn url(&self) -> String {
        match self {
            IngestEndpoint::Host(base) => join_path(base, SEND_PATH),
            IngestEndpoint::Proxy(proxy) => proxy.send_url(),
            IngestEndpoint::Custom(url) => url.clone(),
        }
    }
}

/// Configuration used to dispatch payloads to the ingestion endpoint.
#[derive(Clone, Debug)]
pub struct IngestConfig {
    endpoint: IngestEndpoint,
    timeout: Duration,
}

impl IngestConfig {
    pub fn new(endpoint: IngestEndpoint) -> Self {
        Self {
            endpoint,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Sends payload envelopes over HTTP. One POST per payload; batching, retry,
/// and delivery guarantees are explicitly out of scope.
#[derive(Clone, Debug)]
pub struct IngestDispatcher {
    client: Client,
    config: IngestConfig,
}

impl IngestDispatcher {
    pub fn new(config: IngestConfig) -> EntrolyticsResult<Self> {
        let client = build_http_client(config.timeout())?;
        Ok(Self { client, config })
    }

    /// Builds a dispatcher for a site configuration, honoring its proxy.
    pub fn for_site(config: &EntrolyticsConfig) -> EntrolyticsResult<Self> {
        let endpoint = match &config.proxy {
            Some(proxy) => IngestEndpoint::Proxy(proxy.clone()),
            None => IngestEndpoint::Host(config.host_url.clone()),
        };
        Self::new(IngestConfig::new(endpoint))
    }

    pub async fn send_envelope(&self, envelope: &PayloadEnvelope) -> EntrolyticsResult<()> {
        if environment::transport_disabled() {
            return Ok(());
        }

        let response = self
            .client
            .post(self.config.endpoint.url())
            .json(envelope)
            .send()
            .await
            .map_err(|err| network_error(format!("failed to send payload: {err}")))?;

        if response.status().is_success() {
            return Ok(());
        }

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unavailable response body>".to_string());

        let message = match status {
            StatusCode::BAD_REQUEST => {
                format!("ingestion endpoint rejected the payload (400). Response: {body}")
            }
            _ => format!("ingestion request failed with status {status}. Response: {body}"),
        };

        Err(network_error(message))
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn build_http_client(timeout: Duration) -> EntrolyticsResult<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|err| internal_error(format!("failed to build HTTP client: {err}")))
}

#[cfg(target_arch = "wasm32")]
fn build_http_client(_timeout: Duration) -> EntrolyticsResult<Client> {
    // reqwest's wasm client has no request timeout; the browser enforces its own.
    Client::builder()
        .build()
        .map_err(|err| internal_error(format!("failed to build HTTP client: {err}")))
}
