/// Reddit adapter.
///
/// Reddit has no usable native affordance, so a "Swooosh" button is
/// injected into each post's action bar. Posts are `shreddit-post`
/// custom elements whose content lives behind a shadow root, and the
/// feed loads via infinite scroll, so injection runs once over the
/// initial page and then from the observation engine as new posts
/// arrive. Injection is idempotent per post: the reserved control class
/// inside the shadow root marks prior injection.
use super::{AdapterGuard, SiteAdapter};
use crate::bridge::Dispatcher;
use crate::canonical::{self, ExtractError};
use crate::controls;
use crate::dom;
use crate::observe::{self, ObserveOptions};
use crate::platform::Platform;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlAnchorElement, ShadowRoot};

const POST_SELECTOR: &str = "shreddit-post";
const FEED_ROOT: &str = "#main-content";
/// Stamped on delivered post elements so the engine never hands us the
/// same node twice.
const SEEN_MARKER: &str = "data-swooosh-seen";

/// Action-bar candidates inside the shadow root, tried in order; the
/// markup differs between redesigns.
const ACTION_BAR_SELECTORS: [&str; 3] = ["div.shreddit-post-actionBar", "div.buttons", "footer"];

/// Fallback permalink anchors when the `permalink` attribute is absent.
const FALLBACK_LINK_SELECTOR: &str = concat!(
    r#"a[slot="full-post-link"], a[data-testid="post-title"], "#,
    r#"a.title, a[data-click-id="comments"]"#
);

pub struct RedditAdapter {
    /// Bounded delay before scanning a mutation batch, letting the
    /// custom elements finish rendering their shadow trees.
    pub settle_ms: i32,
}

impl Default for RedditAdapter {
    fn default() -> Self {
        RedditAdapter { settle_ms: 0 }
    }
}

impl SiteAdapter for RedditAdapter {
    fn platform(&self) -> Platform {
        Platform::Reddit
    }

    fn attach(&self, document: &Document, dispatch: Rc<dyn Dispatcher>) -> AdapterGuard {
        let mut guard = AdapterGuard::default();

        let root = dom::query(document, FEED_ROOT)
            .or_else(|| document.body().map(Element::from));
        let Some(root) = root else {
            log::warn!("reddit: no feed root to observe");
            return guard;
        };

        let document = document.clone();
        let watcher = observe::observe(
            &root,
            POST_SELECTOR,
            move |post| inject_save_button(&document, &post, &dispatch),
            ObserveOptions {
                recurse: true,
                scan_existing: true,
                settle_ms: Some(self.settle_ms),
                seen_marker: Some(SEEN_MARKER),
                ..Default::default()
            },
        );

        if let Some(watcher) = watcher {
            guard.watchers.push(watcher);
        }
        guard
    }
}

/// Add the save control to one post, if it does not already have one.
pub fn inject_save_button(document: &Document, post: &Element, dispatch: &Rc<dyn Dispatcher>) {
    let Some(shadow) = post.shadow_root() else {
        log::warn!("reddit: post has no shadow root, cannot inject");
        return;
    };

    if dom::query(&shadow, &format!(".{}", controls::CONTROL_CLASS)).is_some() {
        return;
    }

    let Some(bar) = ACTION_BAR_SELECTORS
        .iter()
        .find_map(|s| dom::query(&shadow, s))
    else {
        log::warn!("reddit: no action bar found inside shadow root");
        return;
    };

    let Some(button) = controls::save_button(document) else {
        return;
    };
    if let Err(e) = bar.append_child(&button) {
        log::warn!("reddit: could not append control: {e:?}");
        return;
    }

    let click_post = post.clone();
    let click_shadow = shadow.clone();
    let click_button = button.clone();
    let click_dispatch = Rc::clone(dispatch);

    let on_click = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        // The host page must not react to our control.
        event.prevent_default();
        event.stop_propagation();
        event.stop_immediate_propagation();

        if click_button.disabled() {
            return;
        }

        match extract_post_url(&click_post, &click_shadow) {
            Ok(url) => controls::dispatch_and_settle(
                Rc::clone(&click_dispatch),
                Platform::Reddit,
                url,
                click_button.clone(),
            ),
            Err(e) => {
                log::warn!("reddit: abandoning intent: {e}");
                controls::mark_failed(&click_button);
            }
        }
    });

    if let Err(e) =
        button.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())
    {
        log::warn!("reddit: could not wire control: {e:?}");
    }
    // The closure lives as long as the injected button does.
    on_click.forget();
}

fn extract_post_url(post: &Element, shadow: &ShadowRoot) -> Result<String, ExtractError> {
    let raw = post.get_attribute("permalink").or_else(|| {
        dom::query(shadow, FALLBACK_LINK_SELECTOR)
            .and_then(|a| a.dyn_into::<HtmlAnchorElement>().ok())
            .map(|a| a.href())
    });

    let raw = raw.ok_or(ExtractError::PermalinkMissing)?;
    canonical::reddit_post_url(&raw)
}
