use crate::analytics::Entrolytics;
use crate::outbound::link::LinkDescriptor;
use crate::platform::runtime;

const MIDDLE_BUTTON: i16 = 1;
const BLANK_TARGET: &str = "_blank";
const TOP_TARGET: &str = "_top";

/// The parts of a pointer click the interception contract cares about.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PointerClick {
    pub button: i16,
    pub ctrl_key: bool,
    pub shift_key: bool,
    pub meta_key: bool,
}

impl PointerClick {
    /// Plain primary-button click, no modifiers.
    pub fn primary() -> Self {
        Self::default()
    }

    pub fn middle() -> Self {
        Self {
            button: MIDDLE_BUTTON,
            ..Self::default()
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl_key = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift_key = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta_key = true;
        self
    }
}

/// Per-click decision: what to do about tracking and default navigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickPlan {
    /// Client not ready: no tracking, default navigation untouched.
    Passthrough,
    /// New browsing context: fire-and-forget tracking, default untouched.
    TrackDetached,
    /// Same-context navigation: suppress default, await tracking, navigate.
    TrackThenNavigate,
}

/// Decides how a click on an outbound link is handled.
///
/// A click opens a new browsing context when the link targets `_blank`, any
/// of ctrl/shift/meta was held, or the middle button was used — in which
/// case the browser navigates natively and tracking must not block it.
pub fn plan_click(is_ready: bool, target: Option<&str>, click: &PointerClick) -> ClickPlan {
    if !is_ready {
        return ClickPlan::Passthrough;
    }
    let new_context = target == Some(BLANK_TARGET)
        || click.ctrl_key
        || click.shift_key
        || click.meta_key
        || click.button == MIDDLE_BUTTON;
    if new_context {
        ClickPlan::TrackDetached
    } else {
        ClickPlan::TrackThenNavigate
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavigationFrame {
    Current,
    Top,
}

/// Manual navigation targets the top frame only for `_top` links when a top
/// frame reference actually exists.
pub fn resolve_frame(target: Option<&str>, has_top_frame: bool) -> NavigationFrame {
    if target == Some(TOP_TARGET) && has_top_frame {
        NavigationFrame::Top
    } else {
        NavigationFrame::Current
    }
}

/// The browsing-context seam the handler navigates through. `wasm-web`
/// provides the `window.location` implementation; tests provide recording
/// surfaces.
pub trait NavigationSurface {
    fn has_top_frame(&self) -> bool;
    fn assign(&self, frame: NavigationFrame, href: &str);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackingMode {
    Skipped,
    Detached,
    Awaited,
}

/// What one click actually did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClickOutcome {
    pub plan: ClickPlan,
    pub default_suppressed: bool,
    pub tracked: TrackingMode,
    pub navigated: Option<NavigationFrame>,
}

/// Executes the click contract for one outbound link click.
///
/// Same-context clicks suppress default navigation, await the tracking call,
/// and then navigate manually; a rejected tracking call is logged and
/// navigation proceeds anyway, so a dead analytics endpoint never bricks a
/// link. New-context clicks spawn the tracking call detached and leave the
/// browser's own navigation alone. When the client is not ready no tracking
/// happens at all. The user `on_click` callback always runs with the
/// original click.
///
/// Rapid repeat clicks may overlap in flight; no lock or dedup is applied.
pub async fn handle_outbound_click<S: NavigationSurface>(
    client: &Entrolytics,
    surface: &S,
    link: &LinkDescriptor,
    click: &PointerClick,
) -> ClickOutcome {
    let plan = plan_click(client.is_ready(), link.target.as_deref(), click);

    let outcome = match plan {
        ClickPlan::Passthrough => ClickOutcome {
            plan,
            default_suppressed: false,
            tracked: TrackingMode::Skipped,
            navigated: None,
        },
        ClickPlan::TrackDetached => {
            let client = client.clone();
            let href = link.href.clone();
            let data = link.data.clone();
            runtime::spawn_detached(async move {
                if let Err(err) = client.track_outbound_link(&href, data).await {
                    log::warn!("outbound link tracking failed: {err}");
                }
            });
            ClickOutcome {
                plan,
                default_suppressed: false,
                tracked: TrackingMode::Detached,
                navigated: None,
            }
        }
        ClickPlan::TrackThenNavigate => {
            if let Err(err) = client.track_outbound_link(&link.href, link.data.clone()).await {
                log::warn!("outbound link tracking failed; navigating anyway: {err}");
            }
            let frame = resolve_frame(link.target.as_deref(), surface.has_top_frame());
            surface.assign(frame, &link.href);
            ClickOutcome {
                plan,
                default_suppressed: true,
                tracked: TrackingMode::Awaited,
                navigated: Some(frame),
            }
        }
    };

    if let Some(on_click) = &link.on_click {
        on_click(click);
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_ready_is_passthrough_regardless_of_click_shape() {
        let clicks = [
            PointerClick::primary(),
            PointerClick::middle(),
            PointerClick::primary().with_ctrl(),
        ];
        for click in clicks {
            assert_eq!(
                plan_click(false, Some("_blank"), &click),
                ClickPlan::Passthrough
            );
            assert_eq!(plan_click(false, None, &click), ClickPlan::Passthrough);
        }
    }

    #[test]
    fn blank_target_opens_new_context() {
        assert_eq!(
            plan_click(true, Some("_blank"), &PointerClick::primary()),
            ClickPlan::TrackDetached
        );
    }

    #[test]
    fn modifier_keys_open_new_context_regardless_of_target() {
        for click in [
            PointerClick::primary().with_ctrl(),
            PointerClick::primary().with_shift(),
            PointerClick::primary().with_meta(),
        ] {
            assert_eq!(plan_click(true, None, &click), ClickPlan::TrackDetached);
            assert_eq!(
                plan_click(true, Some("_top"), &click),
                ClickPlan::TrackDetached
            );
        }
    }

    #[test]
    fn middle_button_opens_new_context() {
        assert_eq!(
            plan_click(true, None, &PointerClick::middle()),
            ClickPlan::TrackDetached
        );
    }

    #[test]
    fn plain_left_click_blocks_and_tracks() {
        assert_eq!(
            plan_click(true, None, &PointerClick::primary()),
            ClickPlan::TrackThenNavigate
        );
        assert_eq!(
            plan_click(true, Some("_top"), &PointerClick::primary()),
            ClickPlan::TrackThenNavigate
        );
    }

    #[test]
    fn top_frame_requires_target_and_reference() {
        assert_eq!(resolve_frame(Some("_top"), true), NavigationFrame::Top);
        assert_eq!(resolve_frame(Some("_top"), false), NavigationFrame::Current);
        assert_eq!(resolve_frame(None, true), NavigationFrame::Current);
        assert_eq!(resolve_frame(Some("_blank"), true), NavigationFrame::Current);
    }
}
