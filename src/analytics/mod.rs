mod api;
mod config;
pub mod error;
#[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
mod loader;
mod payload;
mod transport;

pub use api::{BeforeSendCallback, Entrolytics};
pub use config::{
    EntrolyticsConfig, PageViewOptions, ProxyConfig, TrackOptions, DEFAULT_OUTBOUND_LINK_EVENT,
};
#[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
pub use loader::load_tracker_script;
pub use payload::{
    EventData, EventPayload, IdentifyPayload, PayloadEnvelope, PayloadType, RecordedPayload,
};
pub use transport::{IngestConfig, IngestDispatcher, IngestEndpoint};
