//! Runtime environment probes shared by the transport layer.

/// Environment variable that disables outgoing dispatches process-wide.
#[cfg(not(target_arch = "wasm32"))]
pub const DISABLE_TRANSPORT_ENV: &str = "ENTROLYTICS_DISABLE_TRANSPORT";

/// Returns true when payload dispatch is suppressed for this process: the
/// kill-switch environment variable natively, the browser's Do Not Track
/// signal on wasm.
pub fn transport_disabled() -> bool {
    transport_disabled_impl()
}

#[cfg(not(target_arch = "wasm32"))]
fn transport_disabled_impl() -> bool {
    std::env::var(DISABLE_TRANSPORT_ENV).is_ok()
}

#[cfg(all(target_arch = "wasm32", feature = "wasm-web"))]
fn transport_disabled_impl() -> bool {
    do_not_track_requested()
}

#[cfg(all(target_arch = "wasm32", not(feature = "wasm-web")))]
fn transport_disabled_impl() -> bool {
    false
}

#[cfg(all(target_arch = "wasm32", feature = "wasm-web"))]
fn do_not_track_requested() -> bool {
    let navigator = match web_sys::window() {
        Some(window) => window.navigator(),
        None => return false,
    };
    matches!(navigator.do_not_track().as_str(), "1" | "yes")
}
