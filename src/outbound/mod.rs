//! Outbound link interception: decide, per click, whether to block
//! navigation until tracking completes or to let the browser navigate while
//! tracking fires detached.
//!
//! The decision itself is [`plan_click`]; [`handle_outbound_click`] executes
//! it against an injected [`NavigationSurface`]. Rendering emits two fixed
//! data attributes so external click-instrumentation tooling can discover
//! outbound links even before the client is ready.

mod click;
#[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
mod dom;
mod link;

pub use click::{
    handle_outbound_click, plan_click, resolve_frame, ClickOutcome, ClickPlan, NavigationFrame,
    NavigationSurface, PointerClick, TrackingMode,
};
#[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
pub use dom::{OutboundLink, WindowNavigationSurface};
pub use link::{anchor_attributes, ClickCallback, LinkDescriptor, EVENT_ATTR, EVENT_URL_ATTR};
