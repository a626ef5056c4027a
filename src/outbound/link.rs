use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::analytics::{EntrolyticsConfig, EventData};
use crate::outbound::click::PointerClick;

/// DOM instrumentation attribute carrying the configured event name.
pub const EVENT_ATTR: &str = "data-entrolytics-event";
/// DOM instrumentation attribute carrying the link destination.
pub const EVENT_URL_ATTR: &str = "data-entrolytics-event-url";

/// Callback invoked with the original click, whatever branch the handler
/// took.
#[cfg(not(target_arch = "wasm32"))]
pub type ClickCallback = Arc<dyn Fn(&PointerClick) + Send + Sync>;
#[cfg(target_arch = "wasm32")]
pub type ClickCallback = Arc<dyn Fn(&PointerClick)>;

/// Everything the page author supplies for one rendered link. Immutable per
/// render; known fields are typed, anything else rides in `attrs`.
#[derive(Clone, Default)]
pub struct LinkDescriptor {
    pub href: String,
    pub data: Option<EventData>,
    pub target: Option<String>,
    pub rel: Option<String>,
    /// Open extension mapping: passthrough attributes forwarded verbatim.
    pub attrs: BTreeMap<String, String>,
    pub on_click: Option<ClickCallback>,
}

impl fmt::Debug for LinkDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkDescriptor")
            .field("href", &self.href)
            .field("target", &self.target)
            .field("has_on_click", &self.on_click.is_some())
            .finish()
    }
}

impl LinkDescriptor {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            ..Default::default()
        }
    }

    pub fn with_data(mut self, data: EventData) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_rel(mut self, rel: impl Into<String>) -> Self {
        self.rel = Some(rel.into());
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn with_on_click(mut self, callback: ClickCallback) -> Self {
        self.on_click = Some(callback);
        self
    }
}

/// Attributes for the emitted anchor element: caller-supplied passthrough
/// attributes plus the two fixed instrumentation attributes, which are
/// present whatever the readiness flag says and which passthrough values
/// cannot clobber.
pub fn anchor_attributes(
    link: &LinkDescriptor,
    config: &EntrolyticsConfig,
) -> BTreeMap<String, String> {
    let mut attrs = link.attrs.clone();
    attrs.insert("href".to_string(), link.href.clone());
    if let Some(target) = &link.target {
        attrs.insert("target".to_string(), target.clone());
    }
    if let Some(rel) = &link.rel {
        attrs.insert("rel".to_string(), rel.clone());
    }
    attrs.insert(
        EVENT_ATTR.to_string(),
        config.outbound_link_event.clone(),
    );
    attrs.insert(EVENT_URL_ATTR.to_string(), link.href.clone());
    attrs
}
