use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// Schema-less tracked-properties mapping. Keys map to primitive or nested
/// JSON values; validation of the shape is the ingestion server's concern.
pub type EventData = BTreeMap<String, Value>;

/// Wire tag of a payload envelope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadType {
    Event,
    Identify,
}

impl PayloadType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayloadType::Event => "event",
            PayloadType::Identify => "identify",
        }
    }
}

/// Body of an `event` payload. Page views are events without a `name`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct EventPayload {
    pub website: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<EventData>,
}

/// Body of an `identify` payload, associating session-level traits.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IdentifyPayload {
    pub website: String,
    pub data: EventData,
}

/// What actually goes over the wire: `{"type": ..., "payload": {...}}`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PayloadEnvelope {
    #[serde(rename = "type")]
    pub payload_type: PayloadType,
    pub payload: Value,
}

impl PayloadEnvelope {
    pub fn event(payload: &EventPayload) -> Self {
        Self {
            payload_type: PayloadType::Event,
            payload: serde_json::to_value(payload).unwrap_or(Value::Null),
        }
    }

    pub fn identify(payload: &IdentifyPayload) -> Self {
        Self {
            payload_type: PayloadType::Identify,
            payload: serde_json::to_value(payload).unwrap_or(Value::Null),
        }
    }
}

/// A payload the client accepted, kept locally for inspection.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedPayload {
    pub envelope: PayloadEnvelope,
    pub recorded_at: DateTime<Utc>,
}
