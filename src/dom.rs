/// Shared DOM plumbing for content-script code.
///
/// Everything here is defensive: selectors that fail to parse, missing
/// elements, and absent globals log and return `None` instead of
/// throwing into the host page.
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, EventTarget};

/// The element a delegated event actually landed on, if any.
pub fn event_target_element(event: &Event) -> Option<Element> {
    event.target()?.dyn_into::<Element>().ok()
}

/// `Element::closest` with the error path folded into `None`.
pub fn closest(element: &Element, selector: &str) -> Option<Element> {
    match element.closest(selector) {
        Ok(found) => found,
        Err(e) => {
            log::warn!("closest(\"{selector}\") failed: {e:?}");
            None
        }
    }
}

/// `query_selector` against any node that supports it, logging invalid
/// selectors instead of propagating them.
pub fn query(scope: &dyn QueryScope, selector: &str) -> Option<Element> {
    match scope.query_selector(selector) {
        Ok(found) => found,
        Err(e) => {
            log::warn!("query_selector(\"{selector}\") failed: {e:?}");
            None
        }
    }
}

/// Common surface over `Document`, `Element` and `ShadowRoot` queries.
pub trait QueryScope {
    fn query_selector(&self, selector: &str) -> Result<Option<Element>, JsValue>;
}

impl QueryScope for Document {
    fn query_selector(&self, selector: &str) -> Result<Option<Element>, JsValue> {
        Document::query_selector(self, selector)
    }
}

impl QueryScope for Element {
    fn query_selector(&self, selector: &str) -> Result<Option<Element>, JsValue> {
        Element::query_selector(self, selector)
    }
}

impl QueryScope for web_sys::ShadowRoot {
    fn query_selector(&self, selector: &str) -> Result<Option<Element>, JsValue> {
        web_sys::ShadowRoot::query_selector(self, selector)
    }
}

/// A delegated event listener that detaches itself on drop.
///
/// Adapters hold these inside their guard so a dropped adapter leaves
/// no listeners behind (test isolation without global teardown).
pub struct ListenerGuard {
    target: EventTarget,
    event: &'static str,
    capture: bool,
    callback: Closure<dyn FnMut(Event)>,
}

impl ListenerGuard {
    /// Attach `handler` to `target`, optionally in the capture phase.
    pub fn listen(
        target: &EventTarget,
        event: &'static str,
        capture: bool,
        handler: impl FnMut(Event) + 'static,
    ) -> Option<ListenerGuard> {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);

        let attached = target.add_event_listener_with_callback_and_bool(
            event,
            callback.as_ref().unchecked_ref(),
            capture,
        );
        if let Err(e) = attached {
            log::warn!("failed to attach {event} listener: {e:?}");
            return None;
        }

        Some(ListenerGuard {
            target: target.clone(),
            event,
            capture,
            callback,
        })
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        let _ = self.target.remove_event_listener_with_callback_and_bool(
            self.event,
            self.callback.as_ref().unchecked_ref(),
            self.capture,
        );
    }
}

/// Schedule `f` on the page event loop after `ms` milliseconds.
/// Returns the timer handle, or `None` if scheduling failed.
pub fn set_timeout(ms: i32, f: impl FnOnce() + 'static) -> Option<i32> {
    let window = web_sys::window()?;
    let callback = Closure::once_into_js(f);

    match window.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.unchecked_ref(),
        ms,
    ) {
        Ok(handle) => Some(handle),
        Err(e) => {
            log::warn!("set_timeout failed: {e:?}");
            None
        }
    }
}

/// Cancel a timer produced by [`set_timeout`].
pub fn clear_timeout(handle: i32) {
    if let Some(window) = web_sys::window() {
        window.clear_timeout_with_handle(handle);
    }
}
