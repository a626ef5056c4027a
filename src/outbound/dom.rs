//! Browser rendering of outbound links: an anchor element wired to the click
//! handler, navigating through `window.location`.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlAnchorElement, MouseEvent};

use crate::analytics::error::{internal_error, EntrolyticsResult};
use crate::analytics::Entrolytics;
use crate::outbound::click::{
    handle_outbound_click, plan_click, ClickPlan, NavigationFrame, NavigationSurface, PointerClick,
};
use crate::outbound::link::{anchor_attributes, LinkDescriptor};

/// Navigates through the real browsing context.
#[derive(Clone, Copy, Debug, Default)]
pub struct WindowNavigationSurface;

impl NavigationSurface for WindowNavigationSurface {
    fn has_top_frame(&self) -> bool {
        web_sys::window()
            .and_then(|window| window.top().ok().flatten())
            .is_some()
    }

    fn assign(&self, frame: NavigationFrame, href: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let location = match frame {
            NavigationFrame::Top => window
                .top()
                .ok()
                .flatten()
                .map(|top| top.location())
                .unwrap_or_else(|| window.location()),
            NavigationFrame::Current => window.location(),
        };
        if let Err(err) = location.set_href(href) {
            log::warn!("outbound navigation to {href} failed: {err:?}");
        }
    }
}

/// A rendered outbound link: the anchor element plus its live click
/// listener. Dropping the handle detaches nothing; an issued tracking call
/// runs to completion independently of this handle's lifetime.
pub struct OutboundLink {
    element: HtmlAnchorElement,
    _listener: Closure<dyn FnMut(MouseEvent)>,
}

impl OutboundLink {
    /// Builds the anchor element, stamps the caller's passthrough attributes
    /// plus the instrumentation data attributes, and wires the click
    /// handler. Default suppression is decided synchronously, before any
    /// suspension point, so the browser honors it.
    pub fn render(
        document: &Document,
        client: Entrolytics,
        link: LinkDescriptor,
    ) -> EntrolyticsResult<Self> {
        let element = document
            .create_element("a")
            .map_err(|err| internal_error(format!("Failed to create anchor element: {err:?}")))?
            .dyn_into::<HtmlAnchorElement>()
            .map_err(|_| internal_error("Anchor element has unexpected type"))?;

        for (name, value) in anchor_attributes(&link, client.config()) {
            element
                .set_attribute(&name, &value)
                .map_err(|err| internal_error(format!("Failed to set `{name}`: {err:?}")))?;
        }

        let listener = Closure::wrap(Box::new(move |event: MouseEvent| {
            let click = PointerClick {
                button: event.button(),
                ctrl_key: event.ctrl_key(),
                shift_key: event.shift_key(),
                meta_key: event.meta_key(),
            };
            let plan = plan_click(client.is_ready(), link.target.as_deref(), &click);
            if plan == ClickPlan::TrackThenNavigate {
                event.prevent_default();
            }
            let client = client.clone();
            let link = link.clone();
            wasm_bindgen_futures::spawn_local(async move {
                handle_outbound_click(&client, &WindowNavigationSurface, &link, &click).await;
            });
        }) as Box<dyn FnMut(MouseEvent)>);

        element
            .add_event_listener_with_callback("click", listener.as_ref().unchecked_ref())
            .map_err(|err| internal_error(format!("Failed to attach click listener: {err:?}")))?;

        Ok(Self {
            element,
            _listener: listener,
        })
    }

    pub fn element(&self) -> &HtmlAnchorElement {
        &self.element
    }
}
