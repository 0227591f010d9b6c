/// Injected "Swooosh" controls and their terminal states.
///
/// Platforms with no native bookmarking affordance (Reddit, ChatGPT)
/// get a button injected per content node. A control settles exactly
/// once: after its intent resolves it is disabled for good, showing
/// either the saved or the error label. Re-clicks on a settled control
/// are no-ops.
use crate::bridge::Dispatcher;
use crate::message::DispatchResult;
use crate::platform::Platform;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, HtmlButtonElement};

/// Reserved marker class; its presence on/inside a container means the
/// control was already injected there.
pub const CONTROL_CLASS: &str = "swooosh-save-button";

pub const IDLE_LABEL: &str = "Swooosh";
pub const SAVED_LABEL: &str = "Swoooshed!";
pub const ERROR_LABEL: &str = "Error!";

/// Build an idle save button. Styling is inline since the host page's
/// stylesheets are not ours to extend.
pub fn save_button(document: &Document) -> Option<HtmlButtonElement> {
    let button = document
        .create_element("button")
        .ok()?
        .dyn_into::<HtmlButtonElement>()
        .ok()?;

    button.set_text_content(Some(IDLE_LABEL));
    button.set_class_name(CONTROL_CLASS);

    let style = button.style();
    let _ = style.set_property("margin-left", "8px");
    let _ = style.set_property("padding", "4px 8px");
    let _ = style.set_property("border", "1px solid #ccc");
    let _ = style.set_property("border-radius", "4px");
    let _ = style.set_property("cursor", "pointer");
    let _ = style.set_property("font-size", "12px");
    let _ = style.set_property("font-weight", "bold");

    Some(button)
}

/// Lock the control while its intent is in flight. A disabled button
/// fires no further click events, so one gesture maps to at most one
/// dispatch.
pub fn mark_pending(button: &HtmlButtonElement) {
    button.set_disabled(true);
    let _ = button.style().set_property("cursor", "default");
}

/// Terminal success state.
pub fn mark_saved(button: &HtmlButtonElement) {
    button.set_text_content(Some(SAVED_LABEL));
    button.set_disabled(true);
    let style = button.style();
    let _ = style.set_property("cursor", "default");
    let _ = style.set_property("opacity", "0.6");
}

/// Terminal error state, visually distinct from success.
pub fn mark_failed(button: &HtmlButtonElement) {
    button.set_text_content(Some(ERROR_LABEL));
    button.set_disabled(true);
    let style = button.style();
    let _ = style.set_property("cursor", "default");
    let _ = style.set_property("color", "#b00020");
}

/// Run one intent to completion and settle the control from its result.
///
/// The intent is never retried or aborted from here; completion order
/// across concurrently in-flight intents is unconstrained.
pub fn dispatch_and_settle(
    dispatch: Rc<dyn Dispatcher>,
    platform: Platform,
    url: String,
    button: HtmlButtonElement,
) {
    mark_pending(&button);

    spawn_local(async move {
        let result = dispatch.dispatch(platform, url).await;
        match &result {
            DispatchResult::Success { .. } => mark_saved(&button),
            DispatchResult::Error { message } => {
                log::warn!("{platform} save failed: {message}");
                mark_failed(&button);
            }
        }
    });
}

/// Fire-and-log variant for adapters that piggyback on a native control
/// and have no injected UI to settle.
pub fn dispatch_and_log(dispatch: Rc<dyn Dispatcher>, platform: Platform, url: String) {
    spawn_local(async move {
        match dispatch.dispatch(platform, url).await {
            DispatchResult::Success { .. } => log::debug!("{platform} bookmark saved"),
            DispatchResult::Error { message } => {
                log::warn!("{platform} save failed: {message}");
            }
        }
    });
}
