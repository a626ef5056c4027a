//! Injects the hosted tracker `<script>` element so pages can run the
//! standard tag alongside (or instead of) this SDK's programmatic API.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use crate::analytics::config::{join_path, EntrolyticsConfig};
use crate::analytics::error::{internal_error, EntrolyticsResult};

const SCRIPT_ELEMENT_ID: &str = "entrolytics-tracker";
const SCRIPT_PATH: &str = "/script.js";

/// Appends the tracker script tag to `<head>` and resolves once its load
/// event fires. Idempotent per document: a second call finds the existing
/// element and returns immediately.
pub async fn load_tracker_script(config: &EntrolyticsConfig) -> EntrolyticsResult<()> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| internal_error("Document not available"))?;

    if document.get_element_by_id(SCRIPT_ELEMENT_ID).is_some() {
        return Ok(());
    }

    let element = document
        .create_element("script")
        .map_err(|err| internal_error(format!("Failed to create script element: {err:?}")))?
        .dyn_into::<web_sys::HtmlScriptElement>()
        .map_err(|_| internal_error("Script element has unexpected type"))?;

    element.set_id(SCRIPT_ELEMENT_ID);
    element.set_src(&join_path(&config.host_url, SCRIPT_PATH));
    element.set_defer(true);
    element
        .set_attribute("data-website-id", &config.website_id)
        .map_err(|err| internal_error(format!("Failed to set website id: {err:?}")))?;
    if !config.auto_track {
        element
            .set_attribute("data-auto-track", "false")
            .map_err(|err| internal_error(format!("Failed to set auto-track: {err:?}")))?;
    }

    let (sender, receiver) = futures::channel::oneshot::channel::<EntrolyticsResult<()>>();
    let sender = std::rc::Rc::new(std::cell::RefCell::new(Some(sender)));

    let load_sender = sender.clone();
    let on_load = Closure::wrap(Box::new(move || {
        if let Some(tx) = load_sender.borrow_mut().take() {
            let _ = tx.send(Ok(()));
        }
    }) as Box<dyn FnMut()>);

    let error_sender = sender.clone();
    let on_error = Closure::wrap(Box::new(move || {
        if let Some(tx) = error_sender.borrow_mut().take() {
            let _ = tx.send(Err(internal_error("Tracker script failed to load")));
        }
    }) as Box<dyn FnMut()>);

    element.set_onload(Some(on_load.as_ref().unchecked_ref()));
    element.set_onerror(Some(on_error.as_ref().unchecked_ref()));
    on_load.forget();
    on_error.forget();

    let head = document
        .head()
        .ok_or_else(|| internal_error("Document head not available"))?;
    head.append_child(&element)
        .map_err(|err| internal_error(format!("Failed to append tracker script: {err:?}")))?;

    receiver
        .await
        .map_err(|_| internal_error("Tracker script load callback dropped"))?
}
