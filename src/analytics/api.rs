use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;

use crate::analytics::config::{EntrolyticsConfig, PageViewOptions, TrackOptions};
use crate::analytics::error::{invalid_argument, not_initialized, EntrolyticsResult};
use crate::analytics::payload::{
    EventData, EventPayload, IdentifyPayload, PayloadEnvelope, RecordedPayload,
};
use crate::analytics::transport::{IngestConfig, IngestDispatcher};

/// Payload interception hook applied before dispatch. Returning `None` drops
/// the payload.
#[cfg(not(target_arch = "wasm32"))]
pub type BeforeSendCallback =
    Arc<dyn Fn(PayloadEnvelope) -> Option<PayloadEnvelope> + Send + Sync>;
#[cfg(target_arch = "wasm32")]
pub type BeforeSendCallback = Arc<dyn Fn(PayloadEnvelope) -> Option<PayloadEnvelope>>;

/// Handle to the analytics client. Cheap to clone; all clones share state.
#[derive(Clone)]
pub struct Entrolytics {
    inner: Arc<EntrolyticsInner>,
}

impl fmt::Debug for Entrolytics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entrolytics")
            .field("website_id", &self.inner.config.website_id)
            .field("ready", &self.is_ready())
            .finish()
    }
}

struct EntrolyticsInner {
    config: EntrolyticsConfig,
    session_id: String,
    ready: AtomicBool,
    collection_enabled: AtomicBool,
    transport: Mutex<Option<Arc<dyn IngestTransport>>>,
    before_send: Mutex<Option<BeforeSendCallback>>,
    default_event_data: Mutex<EventData>,
    payloads: Mutex<Vec<RecordedPayload>>,
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub(crate) trait IngestTransport: Send + Sync {
    async fn send(&self, envelope: &PayloadEnvelope) -> EntrolyticsResult<()>;
}

struct HttpIngestTransport {
    dispatcher: IngestDispatcher,
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl IngestTransport for HttpIngestTransport {
    async fn send(&self, envelope: &PayloadEnvelope) -> EntrolyticsResult<()> {
        self.dispatcher.send_envelope(envelope).await
    }
}

impl Entrolytics {
    /// Creates a client for the given configuration. The client starts out
    /// not ready; call [`connect`](Self::connect) (or go through
    /// [`init_entrolytics`](crate::context::init_entrolytics)) before tracking.
    pub fn new(config: EntrolyticsConfig) -> EntrolyticsResult<Self> {
        config.validate()?;
        let inner = EntrolyticsInner {
            config,
            session_id: generate_session_id(),
            ready: AtomicBool::new(false),
            collection_enabled: AtomicBool::new(true),
            transport: Mutex::new(None),
            before_send: Mutex::new(None),
            default_event_data: Mutex::new(EventData::new()),
            payloads: Mutex::new(Vec::new()),
        };
        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    pub fn config(&self) -> &EntrolyticsConfig {
        &self.inner.config
    }

    /// Random per-client session identifier, generated at construction.
    pub fn session_id(&self) -> &str {
        &self.inner.session_id
    }

    /// Installs the HTTP dispatcher derived from the configuration and marks
    /// the client ready. Idempotent.
    pub fn connect(&self) -> EntrolyticsResult<()> {
        if self.is_ready() {
            return Ok(());
        }
        let dispatcher = IngestDispatcher::for_site(&self.inner.config)?;
        self.install_transport(Arc::new(HttpIngestTransport { dispatcher }));
        Ok(())
    }

    /// Like [`connect`](Self::connect), but with an explicit ingest
    /// configuration. Primarily intended for testing or emulator scenarios.
    pub fn connect_with(&self, config: IngestConfig) -> EntrolyticsResult<()> {
        let dispatcher = IngestDispatcher::new(config)?;
        self.install_transport(Arc::new(HttpIngestTransport { dispatcher }));
        Ok(())
    }

    fn install_transport(&self, transport: Arc<dyn IngestTransport>) {
        *self.inner.transport.lock().unwrap() = Some(transport);
        self.inner.ready.store(true, Ordering::SeqCst);
    }

    /// Whether the client has completed initialization and accepts tracking
    /// calls.
    pub fn is_ready(&self) -> bool {
        self.inner.ready.load(Ordering::SeqCst)
    }

    /// Tracks a custom event.
    pub async fn track_event(
        &self,
        name: &str,
        data: Option<EventData>,
        options: Option<TrackOptions>,
    ) -> EntrolyticsResult<()> {
        validate_event_name(name)?;
        self.ensure_ready()?;
        let options = options.unwrap_or_default();
        let payload = EventPayload {
            website: self.inner.config.website_id.clone(),
            name: Some(name.to_string()),
            url: options.url,
            referrer: options.referrer,
            title: options.title,
            data: self.merge_default_event_data(data),
            ..Default::default()
        };
        self.submit(PayloadEnvelope::event(&payload)).await
    }

    /// Tracks a page view: an event payload without an event name.
    pub async fn track_page_view(&self, options: PageViewOptions) -> EntrolyticsResult<()> {
        if options.url.trim().is_empty() {
            return Err(invalid_argument("Page view URL must not be empty"));
        }
        self.ensure_ready()?;
        let payload = EventPayload {
            website: self.inner.config.website_id.clone(),
            url: Some(options.url),
            referrer: options.referrer,
            title: options.title,
            data: self.merge_default_event_data(options.data),
            ..Default::default()
        };
        self.submit(PayloadEnvelope::event(&payload)).await
    }

    /// Associates session-level traits with the current visitor.
    pub async fn identify(&self, data: EventData) -> EntrolyticsResult<()> {
        self.ensure_ready()?;
        let payload = IdentifyPayload {
            website: self.inner.config.website_id.clone(),
            data,
        };
        self.submit(PayloadEnvelope::identify(&payload)).await
    }

    /// Tracks an outbound link click: an event named by
    /// `config.outbound_link_event` whose data carries the destination URL.
    pub async fn track_outbound_link(
        &self,
        url: &str,
        data: Option<EventData>,
    ) -> EntrolyticsResult<()> {
        if url.trim().is_empty() {
            return Err(invalid_argument("Outbound link URL must not be empty"));
        }
        self.ensure_ready()?;
        let mut event_data = data.unwrap_or_default();
        event_data.insert("url".to_string(), Value::String(url.to_string()));
        let payload = EventPayload {
            website: self.inner.config.website_id.clone(),
            name: Some(self.inner.config.outbound_link_event.clone()),
            data: self.merge_default_event_data(Some(event_data)),
            ..Default::default()
        };
        self.submit(PayloadEnvelope::event(&payload)).await
    }

    /// Sets the interception hook applied to every payload before dispatch.
    pub fn set_before_send(&self, callback: BeforeSendCallback) {
        *self.inner.before_send.lock().unwrap() = Some(callback);
    }

    pub fn clear_before_send(&self) {
        self.inner.before_send.lock().unwrap().take();
    }

    /// Sets data merged into every event unless explicitly overridden.
    pub fn set_default_event_data(&self, data: EventData) {
        *self.inner.default_event_data.lock().unwrap() = data;
    }

    /// Enables or disables dispatch. When disabled, payloads are still
    /// recorded locally but never sent.
    pub fn set_collection_enabled(&self, enabled: bool) {
        self.inner
            .collection_enabled
            .store(enabled, Ordering::SeqCst);
    }

    pub fn collection_enabled(&self) -> bool {
        self.inner.collection_enabled.load(Ordering::SeqCst)
    }

    /// Every payload the client accepted, in order.
    pub fn recorded_payloads(&self) -> Vec<RecordedPayload> {
        self.inner.payloads.lock().unwrap().clone()
    }

    async fn submit(&self, envelope: PayloadEnvelope) -> EntrolyticsResult<()> {
        let envelope = {
            let callback = self.inner.before_send.lock().unwrap().clone();
            match callback {
                Some(callback) => match callback(envelope) {
                    Some(envelope) => envelope,
                    None => return Ok(()),
                },
                None => envelope,
            }
        };

        self.inner.payloads.lock().unwrap().push(RecordedPayload {
            envelope: envelope.clone(),
            recorded_at: Utc::now(),
        });

        let transport = {
            let guard = self.inner.transport.lock().unwrap();
            guard.clone()
        };

        if self.inner.collection_enabled.load(Ordering::SeqCst) {
            if let Some(transport) = transport {
                transport.send(&envelope).await?;
            }
        }

        Ok(())
    }

    fn ensure_ready(&self) -> EntrolyticsResult<()> {
        if !self.is_ready() {
            return Err(not_initialized(
                "Entrolytics client has not completed initialization; call connect() first",
            ));
        }
        Ok(())
    }

    fn merge_default_event_data(&self, data: Option<EventData>) -> Option<EventData> {
        let defaults = self.inner.default_event_data.lock().unwrap().clone();
        if defaults.is_empty() {
            return data;
        }
        let mut merged = data.unwrap_or_default();
        for (key, value) in defaults {
            merged.entry(key).or_insert(value);
        }
        Some(merged)
    }

    #[cfg(test)]
    pub(crate) fn set_transport_for_tests(&self, transport: Arc<dyn IngestTransport>) {
        self.install_transport(transport);
    }
}

fn validate_event_name(name: &str) -> EntrolyticsResult<()> {
    if name.trim().is_empty() {
        return Err(invalid_argument("Event name must not be empty"));
    }
    Ok(())
}

fn generate_session_id() -> String {
    use rand::distributions::Alphanumeric;
    use rand::Rng;

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .map(char::from)
        .take(32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::payload::PayloadType;
    use serde_json::json;
    use std::sync::Mutex;

    fn test_config() -> EntrolyticsConfig {
        EntrolyticsConfig::new("site-1", "https://stats.example.com")
    }

    #[derive(Default)]
    struct RecordingTransport {
        envelopes: Mutex<Vec<PayloadEnvelope>>,
    }

    #[cfg_attr(not(target_arch = "wasm32"), async_trait)]
    #[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
    impl IngestTransport for RecordingTransport {
        async fn send(&self, envelope: &PayloadEnvelope) -> EntrolyticsResult<()> {
            self.envelopes.lock().unwrap().push(envelope.clone());
            Ok(())
        }
    }

    fn ready_client() -> (Entrolytics, Arc<RecordingTransport>) {
        let client = Entrolytics::new(test_config()).unwrap();
        let transport = Arc::new(RecordingTransport::default());
        client.set_transport_for_tests(transport.clone());
        (client, transport)
    }

    #[tokio::test(flavor = "current_thread")]
    async fn tracking_before_connect_fails() {
        let client = Entrolytics::new(test_config()).unwrap();
        assert!(!client.is_ready());
        let err = client.track_event("signup", None, None).await.unwrap_err();
        assert_eq!(err.code_str(), "entrolytics/not-initialized");
        assert!(client.recorded_payloads().is_empty());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn empty_event_name_is_rejected() {
        let (client, _) = ready_client();
        let err = client.track_event("  ", None, None).await.unwrap_err();
        assert_eq!(err.code_str(), "entrolytics/invalid-argument");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn track_event_dispatches_envelope() {
        let (client, transport) = ready_client();
        let data = EventData::from([("plan".to_string(), json!("pro"))]);
        client
            .track_event("signup", Some(data), None)
            .await
            .unwrap();

        let sent = transport.envelopes.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].payload_type, PayloadType::Event);
        assert_eq!(sent[0].payload["name"], "signup");
        assert_eq!(sent[0].payload["data"]["plan"], "pro");
        assert_eq!(client.recorded_payloads().len(), 1);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn outbound_link_event_carries_url() {
        let (client, transport) = ready_client();
        client
            .track_outbound_link("https://example.com", None)
            .await
            .unwrap();

        let sent = transport.envelopes.lock().unwrap().clone();
        assert_eq!(sent[0].payload["name"], "outbound-link");
        assert_eq!(sent[0].payload["data"]["url"], "https://example.com");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn default_event_data_merges_under_explicit_keys() {
        let (client, transport) = ready_client();
        client.set_default_event_data(EventData::from([
            ("plan".to_string(), json!("default")),
            ("region".to_string(), json!("eu")),
        ]));

        let data = EventData::from([("plan".to_string(), json!("custom"))]);
        client.track_event("signup", Some(data), None).await.unwrap();

        let sent = transport.envelopes.lock().unwrap().clone();
        assert_eq!(sent[0].payload["data"]["plan"], "custom");
        assert_eq!(sent[0].payload["data"]["region"], "eu");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn before_send_can_drop_payloads() {
        let (client, transport) = ready_client();
        client.set_before_send(Arc::new(|envelope| {
            if envelope.payload["name"] == "internal" {
                None
            } else {
                Some(envelope)
            }
        }));

        client.track_event("internal", None, None).await.unwrap();
        client.track_event("signup", None, None).await.unwrap();

        let sent = transport.envelopes.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].payload["name"], "signup");
        // Dropped payloads are not recorded either.
        assert_eq!(client.recorded_payloads().len(), 1);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn disabled_collection_records_without_dispatch() {
        let (client, transport) = ready_client();
        client.set_collection_enabled(false);
        client.track_event("signup", None, None).await.unwrap();

        assert!(transport.envelopes.lock().unwrap().is_empty());
        assert_eq!(client.recorded_payloads().len(), 1);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn page_view_has_no_event_name() {
        let (client, transport) = ready_client();
        client
            .track_page_view(PageViewOptions::new("https://example.com/pricing"))
            .await
            .unwrap();

        let sent = transport.envelopes.lock().unwrap().clone();
        assert_eq!(sent[0].payload["url"], "https://example.com/pricing");
        assert!(sent[0].payload.get("name").is_none());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn identify_uses_identify_envelope() {
        let (client, transport) = ready_client();
        client
            .identify(EventData::from([("plan".to_string(), json!("pro"))]))
            .await
            .unwrap();

        let sent = transport.envelopes.lock().unwrap().clone();
        assert_eq!(sent[0].payload_type, PayloadType::Identify);
        assert_eq!(sent[0].payload["data"]["plan"], "pro");
    }

    #[test]
    fn session_id_is_stable_per_client() {
        let client = Entrolytics::new(test_config()).unwrap();
        assert_eq!(client.session_id().len(), 32);
        assert_eq!(client.session_id(), client.clone().session_id());
    }
}
