/// ChatGPT adapter.
///
/// The trigger is not a click but the share dialog itself: once a
/// dialog with an enabled share-link input is present, a "Swooosh"
/// control is injected next to the social share buttons and the input
/// value is captured verbatim on click.
///
/// The dialog is a two-stage flow. A fresh share shows an "Update link"
/// button first; the real share URL only exists after the user clicks
/// it and the dialog re-renders. In that case we arm a one-shot
/// listener on the button and re-resolve the dialog after a settling
/// delay before retrying injection. Both the observer debounce and the
/// settling delay are empirically chosen and configurable; nothing
/// about the host page guarantees them.
use super::{AdapterGuard, SiteAdapter};
use crate::bridge::Dispatcher;
use crate::canonical;
use crate::controls;
use crate::dom;
use crate::observe::{self, ObserveOptions};
use crate::platform::Platform;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlInputElement};

const DIALOG_SELECTOR: &str = r#"div[role="dialog"][data-state="open"]"#;
const UPDATE_BUTTON_SELECTOR: &str = "button.btn-primary";
const UPDATE_BUTTON_TEXT: &str = "Update link";
const SHARE_ROW_SELECTOR: &str = "div.mt-6.flex.justify-center.space-x-14";
const SHARE_INPUT_SELECTOR: &str =
    r#"input[type="text"][value^="https://chatgpt.com/share/"]:not([disabled])"#;
/// Marks an "Update link" button whose one-shot listener is already
/// armed, so re-delivered dialogs do not arm it twice.
const ARMED_MARKER: &str = "data-swooosh-armed";

pub struct ChatGptAdapter {
    /// Debounce window for the dialog observer; the chat UI rewrites
    /// large subtrees per keystroke.
    pub debounce_ms: i32,
    /// Delay after an "Update link" click before re-resolving the
    /// dialog and its input.
    pub settle_ms: i32,
}

impl Default for ChatGptAdapter {
    fn default() -> Self {
        ChatGptAdapter {
            debounce_ms: 500,
            settle_ms: 3000,
        }
    }
}

impl SiteAdapter for ChatGptAdapter {
    fn platform(&self) -> Platform {
        Platform::ChatGpt
    }

    fn attach(&self, document: &Document, dispatch: Rc<dyn Dispatcher>) -> AdapterGuard {
        let mut guard = AdapterGuard::default();

        let Some(body) = document.body() else {
            log::warn!("chatgpt: no body to attach to");
            return guard;
        };

        let document = document.clone();
        let settle_ms = self.settle_ms;
        let watcher = observe::observe(
            &Element::from(body),
            DIALOG_SELECTOR,
            move |dialog| process_dialog(&document, &dialog, &dispatch, settle_ms),
            ObserveOptions {
                recurse: true,
                scan_existing: true,
                debounce_ms: Some(self.debounce_ms),
                watch_attributes: Some(vec!["data-state".to_string()]),
                ..Default::default()
            },
        );

        if let Some(watcher) = watcher {
            guard.watchers.push(watcher);
        }
        guard
    }
}

/// Handle one (re)appearance of the share dialog.
pub fn process_dialog(
    document: &Document,
    dialog: &Element,
    dispatch: &Rc<dyn Dispatcher>,
    settle_ms: i32,
) {
    if let Some(update_button) = find_update_button(dialog) {
        if update_button.has_attribute(ARMED_MARKER) {
            return;
        }
        let _ = update_button.set_attribute(ARMED_MARKER, "");
        arm_update_listener(document, &update_button, dispatch, settle_ms);
    } else {
        inject_if_ready(document, dialog, dispatch);
    }
}

/// Locate the "Update link" action, matching on text since the button
/// carries no distinguishing attribute.
fn find_update_button(dialog: &Element) -> Option<Element> {
    let candidates = dialog.query_selector_all(UPDATE_BUTTON_SELECTOR).ok()?;
    for i in 0..candidates.length() {
        let Some(button) = candidates.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };
        if button
            .text_content()
            .is_some_and(|t| t.contains(UPDATE_BUTTON_TEXT))
        {
            return Some(button);
        }
    }
    None
}

/// One-shot: after the update click, wait for the dialog to settle,
/// re-resolve it (it may have been replaced wholesale) and retry.
fn arm_update_listener(
    document: &Document,
    update_button: &Element,
    dispatch: &Rc<dyn Dispatcher>,
    settle_ms: i32,
) {
    let document = document.clone();
    let dispatch = Rc::clone(dispatch);

    let on_click = Closure::once_into_js(move |_event: Event| {
        dom::set_timeout(settle_ms, move || {
            match dom::query(&document, DIALOG_SELECTOR) {
                Some(current) => inject_if_ready(&document, &current, &dispatch),
                None => log::warn!("chatgpt: dialog disappeared after update-link click"),
            }
        });
    });

    let options = web_sys::AddEventListenerOptions::new();
    options.set_once(true);
    let attached = update_button.add_event_listener_with_callback_and_add_event_listener_options(
        "click",
        on_click.unchecked_ref(),
        &options,
    );
    if let Err(e) = attached {
        log::warn!("chatgpt: could not arm update-link listener: {e:?}");
    }
}

/// Inject the save control if the dialog has reached its final state:
/// a share row plus a non-disabled input already holding a share URL.
pub fn inject_if_ready(document: &Document, dialog: &Element, dispatch: &Rc<dyn Dispatcher>) {
    let Some(row) = dom::query(dialog, SHARE_ROW_SELECTOR) else {
        log::debug!("chatgpt: share row not present yet");
        return;
    };
    let Some(input) = dom::query(dialog, SHARE_INPUT_SELECTOR) else {
        log::debug!("chatgpt: no enabled share input yet");
        return;
    };

    if dom::query(&row, &format!(".{}", controls::CONTROL_CLASS)).is_some() {
        return;
    }

    let value = input
        .dyn_into::<HtmlInputElement>()
        .map(|i| i.value())
        .unwrap_or_default();
    let url = match canonical::chatgpt_share_url(&value) {
        Ok(url) => url,
        Err(e) => {
            log::warn!("chatgpt: abandoning intent: {e}");
            return;
        }
    };

    let Some(wrapper) = document.create_element("div").ok() else {
        return;
    };
    wrapper.set_class_name("flex flex-col items-center");

    let Some(button) = controls::save_button(document) else {
        return;
    };
    // Round style to sit alongside the social share buttons.
    let _ = button.style().set_property("border-radius", "20px");
    let _ = button.style().set_property("margin-left", "0");

    if wrapper.append_child(&button).is_err() || row.append_child(&wrapper).is_err() {
        log::warn!("chatgpt: could not append control");
        return;
    }

    let click_button = button.clone();
    let click_dispatch = Rc::clone(dispatch);
    let on_click = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        event.prevent_default();
        event.stop_propagation();

        if click_button.disabled() {
            return;
        }

        controls::dispatch_and_settle(
            Rc::clone(&click_dispatch),
            Platform::ChatGpt,
            url.clone(),
            click_button.clone(),
        );
    });

    if let Err(e) =
        button.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())
    {
        log::warn!("chatgpt: could not wire control: {e:?}");
    }
    on_click.forget();
}
