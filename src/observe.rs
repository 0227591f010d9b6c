/// DOM Observation Engine: delivers newly inserted elements matching a
/// selector to a callback, exactly once per element.
///
/// Thin wrapper over `MutationObserver` that handles the recurring
/// needs of the site adapters: scanning descendants of added subtrees,
/// deduplicating delivery with a per-node marker attribute, deferring a
/// batch until the page has settled, and collapsing mutation bursts
/// with a debounce window (chat UIs rewrite large subtrees per
/// keystroke).
///
/// Mutation delivery is asynchronous and batched by the browser; no
/// callback here may assume synchronous layout. If the observed root is
/// removed from the document, observation silently stops.
use crate::dom;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, MutationObserver, MutationObserverInit, MutationRecord};

#[derive(Default)]
pub struct ObserveOptions {
    /// Also scan descendants of each added node for matches.
    pub recurse: bool,
    /// Deliver elements already present under the root at setup time.
    pub scan_existing: bool,
    /// Defer scanning each batch by this many milliseconds (bounded
    /// delay for post-render state). Default: none.
    pub settle_ms: Option<i32>,
    /// Collapse mutation bursts: only scan once no mutation has arrived
    /// for this long. Takes precedence over `settle_ms`.
    pub debounce_ms: Option<i32>,
    /// Also deliver elements whose listed attributes change.
    pub watch_attributes: Option<Vec<String>>,
    /// Attribute stamped on delivered elements so the same node is
    /// never delivered twice.
    pub seen_marker: Option<&'static str>,
}

struct WatchInner {
    selector: String,
    options: ObserveOptions,
    on_match: RefCell<Box<dyn FnMut(Element)>>,
    pending: RefCell<Vec<Element>>,
    debounce_timer: Cell<Option<i32>>,
}

/// Live observation handle; dropping it disconnects the observer.
pub struct NodeWatcher {
    observer: MutationObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, MutationObserver)>,
    _inner: Rc<WatchInner>,
}

impl Drop for NodeWatcher {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// Watch `root` for elements matching `selector`.
///
/// Returns `None` (after logging) if the observer cannot be installed;
/// failure here must never break the host page.
pub fn observe(
    root: &Element,
    selector: &str,
    on_match: impl FnMut(Element) + 'static,
    options: ObserveOptions,
) -> Option<NodeWatcher> {
    let inner = Rc::new(WatchInner {
        selector: selector.to_string(),
        options,
        on_match: RefCell::new(Box::new(on_match)),
        pending: RefCell::new(Vec::new()),
        debounce_timer: Cell::new(None),
    });

    if inner.options.scan_existing {
        scan_scope(&inner, root);
    }

    let callback_inner = Rc::clone(&inner);
    let callback = Closure::<dyn FnMut(js_sys::Array, MutationObserver)>::new(
        move |records: js_sys::Array, _observer: MutationObserver| {
            collect(&callback_inner, &records);
            schedule_flush(&callback_inner);
        },
    );

    let observer = match MutationObserver::new(callback.as_ref().unchecked_ref()) {
        Ok(observer) => observer,
        Err(e) => {
            log::warn!("could not create MutationObserver: {e:?}");
            return None;
        }
    };

    let init = MutationObserverInit::new();
    init.set_child_list(true);
    init.set_subtree(true);
    if let Some(attributes) = &inner.options.watch_attributes {
        init.set_attributes(true);
        let filter = js_sys::Array::new();
        for name in attributes {
            filter.push(&JsValue::from_str(name));
        }
        init.set_attribute_filter(&filter);
    }

    if let Err(e) = observer.observe_with_options(root, &init) {
        log::warn!("could not observe root node: {e:?}");
        return None;
    }

    Some(NodeWatcher {
        observer,
        _callback: callback,
        _inner: inner,
    })
}

/// Pull candidate elements out of one mutation batch.
fn collect(inner: &Rc<WatchInner>, records: &js_sys::Array) {
    let mut pending = inner.pending.borrow_mut();

    for record in records.iter() {
        let Ok(record) = record.dyn_into::<MutationRecord>() else {
            continue;
        };

        match record.type_().as_str() {
            "childList" => {
                let added = record.added_nodes();
                for i in 0..added.length() {
                    if let Some(element) =
                        added.get(i).and_then(|n| n.dyn_into::<Element>().ok())
                    {
                        pending.push(element);
                    }
                }
            }
            "attributes" => {
                if let Some(element) =
                    record.target().and_then(|n| n.dyn_into::<Element>().ok())
                {
                    pending.push(element);
                }
            }
            _ => {}
        }
    }
}

fn schedule_flush(inner: &Rc<WatchInner>) {
    if let Some(ms) = inner.options.debounce_ms {
        // Restart the window on every burst.
        if let Some(handle) = inner.debounce_timer.take() {
            dom::clear_timeout(handle);
        }
        let timer_inner = Rc::clone(inner);
        inner.debounce_timer.set(dom::set_timeout(ms, move || {
            timer_inner.debounce_timer.set(None);
            flush(&timer_inner);
        }));
    } else if let Some(ms) = inner.options.settle_ms {
        let timer_inner = Rc::clone(inner);
        dom::set_timeout(ms, move || flush(&timer_inner));
    } else {
        flush(inner);
    }
}

fn flush(inner: &Rc<WatchInner>) {
    let drained: Vec<Element> = inner.pending.borrow_mut().drain(..).collect();

    for element in drained {
        if element_matches(&element, &inner.selector) {
            deliver(inner, element.clone());
        }
        if inner.options.recurse {
            scan_scope(inner, &element);
        }
    }
}

/// Deliver every current match under `scope`.
fn scan_scope(inner: &Rc<WatchInner>, scope: &Element) {
    match scope.query_selector_all(&inner.selector) {
        Ok(matches) => {
            for i in 0..matches.length() {
                if let Some(element) =
                    matches.get(i).and_then(|n| n.dyn_into::<Element>().ok())
                {
                    deliver(inner, element);
                }
            }
        }
        Err(e) => log::warn!("query_selector_all(\"{}\") failed: {e:?}", inner.selector),
    }
}

fn deliver(inner: &Rc<WatchInner>, element: Element) {
    if let Some(marker) = inner.options.seen_marker {
        if element.has_attribute(marker) {
            return;
        }
        let _ = element.set_attribute(marker, "");
    }
    (inner.on_match.borrow_mut())(element);
}

fn element_matches(element: &Element, selector: &str) -> bool {
    element.matches(selector).unwrap_or_else(|e| {
        log::warn!("matches(\"{selector}\") failed: {e:?}");
        false
    })
}
