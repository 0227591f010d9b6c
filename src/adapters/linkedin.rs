/// LinkedIn adapter.
///
/// The trigger is a click on a post's options (ellipsis) menu. The
/// nearest ancestor carrying a post URN gives us the activity/share
/// identifier, from which the canonical feed-update URL is synthesized.
/// URNs outside the two accepted prefixes abort the intent.
use super::{AdapterGuard, SiteAdapter};
use crate::bridge::Dispatcher;
use crate::canonical::{self, ExtractError};
use crate::controls;
use crate::dom;
use crate::platform::Platform;
use std::rc::Rc;
use web_sys::{Document, Element};

const MENU_TRIGGER: &str = "button.feed-shared-control-menu__trigger";
const POST_CONTAINER: &str = concat!(
    r#"[data-urn^="urn:li:activity:"],[data-urn^="urn:li:share:"],"#,
    r#"[data-id^="urn:li:activity:"],[data-id^="urn:li:share:"]"#
);

pub struct LinkedInAdapter;

impl SiteAdapter for LinkedInAdapter {
    fn platform(&self) -> Platform {
        Platform::LinkedIn
    }

    fn attach(&self, document: &Document, dispatch: Rc<dyn Dispatcher>) -> AdapterGuard {
        let mut guard = AdapterGuard::default();

        let Some(body) = document.body() else {
            log::warn!("linkedin: no body to attach to");
            return guard;
        };

        let listener = dom::ListenerGuard::listen(&body, "click", true, move |event| {
            let Some(target) = dom::event_target_element(&event) else {
                return;
            };
            let Some(trigger) = dom::closest(&target, MENU_TRIGGER) else {
                return;
            };

            match extract_post_url(&trigger) {
                Ok(url) => {
                    controls::dispatch_and_log(Rc::clone(&dispatch), Platform::LinkedIn, url);
                }
                Err(e) => log::warn!("linkedin: abandoning intent: {e}"),
            }
        });

        if let Some(listener) = listener {
            guard.listeners.push(listener);
        }
        guard
    }
}

fn extract_post_url(trigger: &Element) -> Result<String, ExtractError> {
    let container =
        dom::closest(trigger, POST_CONTAINER).ok_or(ExtractError::ContainerNotFound)?;
    let urn = container
        .get_attribute("data-urn")
        .or_else(|| container.get_attribute("data-id"))
        .ok_or(ExtractError::PermalinkMissing)?;

    canonical::linkedin_update_url(&urn)
}
