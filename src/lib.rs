//! Rust port of the Entrolytics web analytics SDK.
//!
//! The crate ships the ingestion client (page views, custom events, identity
//! association), a scoped provider for app-wide client access, and the
//! outbound-link click interceptor. Native targets talk to the ingestion
//! endpoint directly; the `wasm-web` feature adds the browser pieces
//! (anchor rendering, `window.location` navigation, tracker script
//! injection).
//!
//! ```
//! use entrolytics_rs_sdk::outbound::{plan_click, ClickPlan, PointerClick};
//!
//! // A ctrl-click opens a new tab, so tracking must not block navigation.
//! let plan = plan_click(true, None, &PointerClick::primary().with_ctrl());
//! assert_eq!(plan, ClickPlan::TrackDetached);
//! ```

pub mod analytics;
pub mod context;
pub mod outbound;
pub mod platform;
