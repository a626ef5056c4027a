use url::Url;

use crate::analytics::error::{invalid_argument, EntrolyticsResult};
use crate::analytics::payload::EventData;

pub const DEFAULT_OUTBOUND_LINK_EVENT: &str = "outbound-link";
pub(crate) const SEND_PATH: &str = "/api/send";

/// Static configuration for an [`Entrolytics`](crate::analytics::Entrolytics)
/// client. `website_id` and `host_url` are required; everything else has
/// sensible defaults.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntrolyticsConfig {
    /// Identifier of the tracked website, as issued by the ingestion server.
    pub website_id: String,
    /// Base URL of the ingestion server, e.g. `https://analytics.example.com`.
    pub host_url: String,
    /// Event name stamped on outbound-link events and on the DOM
    /// instrumentation attribute of rendered links.
    pub outbound_link_event: String,
    /// Whether page views are tracked automatically by the hosted tracker
    /// script. Only consulted by the script loader.
    pub auto_track: bool,
    /// Optional first-party proxy in front of the ingestion endpoint.
    pub proxy: Option<ProxyConfig>,
}

impl EntrolyticsConfig {
    pub fn new(website_id: impl Into<String>, host_url: impl Into<String>) -> Self {
        Self {
            website_id: website_id.into(),
            host_url: host_url.into(),
            outbound_link_event: DEFAULT_OUTBOUND_LINK_EVENT.to_string(),
            auto_track: true,
            proxy: None,
        }
    }

    pub fn with_outbound_link_event(mut self, event: impl Into<String>) -> Self {
        self.outbound_link_event = event.into();
        self
    }

    pub fn with_auto_track(mut self, auto_track: bool) -> Self {
        self.auto_track = auto_track;
        self
    }

    pub fn with_proxy(mut self, proxy: ProxyConfig) -> Self {
        self.proxy = Some(proxy);
        self
    }

    pub(crate) fn validate(&self) -> EntrolyticsResult<()> {
        if self.website_id.trim().is_empty() {
            return Err(invalid_argument("website_id must not be empty"));
        }
        parse_base_url(&self.host_url)?;
        if self.outbound_link_event.trim().is_empty() {
            return Err(invalid_argument("outbound_link_event must not be empty"));
        }
        if let Some(proxy) = &self.proxy {
            parse_base_url(&proxy.base_url)?;
        }
        Ok(())
    }

    /// Resolved URL payloads are sent to, honoring the proxy when configured.
    pub fn send_url(&self) -> String {
        match &self.proxy {
            Some(proxy) => proxy.send_url(),
            None => join_path(&self.host_url, SEND_PATH),
        }
    }
}

/// Routes ingestion traffic through a first-party endpoint so the tracker is
/// not blocked by third-party filters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProxyConfig {
    pub base_url: String,
    /// Path appended to `base_url`; defaults to the standard send path.
    pub send_path: Option<String>,
}

impl ProxyConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            send_path: None,
        }
    }

    pub fn with_send_path(mut self, path: impl Into<String>) -> Self {
        self.send_path = Some(path.into());
        self
    }

    pub(crate) fn send_url(&self) -> String {
        let path = self.send_path.as_deref().unwrap_or(SEND_PATH);
        join_path(&self.base_url, path)
    }
}

/// Per-call overrides for [`track_event`](crate::analytics::Entrolytics::track_event).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrackOptions {
    pub url: Option<String>,
    pub referrer: Option<String>,
    pub title: Option<String>,
}

/// Describes an explicit page view.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PageViewOptions {
    pub url: String,
    pub referrer: Option<String>,
    pub title: Option<String>,
    pub data: Option<EventData>,
}

impl PageViewOptions {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }
}

fn parse_base_url(raw: &str) -> EntrolyticsResult<Url> {
    Url::parse(raw).map_err(|err| invalid_argument(format!("`{raw}` is not a valid base URL: {err}")))
}

pub(crate) fn join_path(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = EntrolyticsConfig::new("site-1", "https://stats.example.com");
        assert_eq!(config.outbound_link_event, DEFAULT_OUTBOUND_LINK_EVENT);
        assert!(config.auto_track);
        assert!(config.proxy.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn send_url_joins_host_and_path() {
        let config = EntrolyticsConfig::new("site-1", "https://stats.example.com/");
        assert_eq!(config.send_url(), "https://stats.example.com/api/send");
    }

    #[test]
    fn proxy_overrides_send_url() {
        let config = EntrolyticsConfig::new("site-1", "https://stats.example.com")
            .with_proxy(ProxyConfig::new("https://www.example.com").with_send_path("/ingest"));
        assert_eq!(config.send_url(), "https://www.example.com/ingest");
    }

    #[test]
    fn empty_website_id_is_rejected() {
        let config = EntrolyticsConfig::new("  ", "https://stats.example.com");
        let err = config.validate().unwrap_err();
        assert_eq!(err.code_str(), "entrolytics/invalid-argument");
    }

    #[test]
    fn relative_host_url_is_rejected() {
        let config = EntrolyticsConfig::new("site-1", "/stats");
        assert!(config.validate().is_err());
    }
}
