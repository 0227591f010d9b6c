/// X/Twitter adapter.
///
/// X ships its own bookmark control, so nothing is injected: a
/// capture-phase click listener on the body watches for the native
/// control, then walks up to the tweet article and out through the
/// timestamp permalink. The permalink href is already canonical.
use super::{AdapterGuard, SiteAdapter};
use crate::bridge::Dispatcher;
use crate::canonical::{self, ExtractError};
use crate::controls;
use crate::dom;
use crate::platform::Platform;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlAnchorElement};

const BOOKMARK_BUTTON: &str = r#"button[data-testid="bookmark"]"#;
const TWEET_ARTICLE: &str = r#"article[data-testid="tweet"]"#;
const TIMESTAMP_LINK: &str = r#"a[href*="/status/"] time"#;

pub struct XAdapter;

impl SiteAdapter for XAdapter {
    fn platform(&self) -> Platform {
        Platform::X
    }

    fn attach(&self, document: &Document, dispatch: Rc<dyn Dispatcher>) -> AdapterGuard {
        let mut guard = AdapterGuard::default();

        let Some(body) = document.body() else {
            log::warn!("x: no body to attach to");
            return guard;
        };

        let listener = dom::ListenerGuard::listen(&body, "click", true, move |event| {
            let Some(target) = dom::event_target_element(&event) else {
                return;
            };
            let Some(button) = dom::closest(&target, BOOKMARK_BUTTON) else {
                return;
            };

            match extract_tweet_url(&button) {
                Ok(url) => {
                    controls::dispatch_and_log(Rc::clone(&dispatch), Platform::X, url);
                }
                Err(e) => log::warn!("x: abandoning intent: {e}"),
            }
        });

        if let Some(listener) = listener {
            guard.listeners.push(listener);
        }
        guard
    }
}

fn extract_tweet_url(button: &Element) -> Result<String, ExtractError> {
    let article = dom::closest(button, TWEET_ARTICLE).ok_or(ExtractError::ContainerNotFound)?;
    let timestamp =
        dom::query(&article, TIMESTAMP_LINK).ok_or(ExtractError::PermalinkMissing)?;
    let anchor = dom::closest(&timestamp, "a")
        .and_then(|a| a.dyn_into::<HtmlAnchorElement>().ok())
        .ok_or(ExtractError::PermalinkMissing)?;

    canonical::x_status_url(&anchor.href())
}
