/// Site Adapters: one per supported platform.
///
/// An adapter owns the knowledge of one platform's DOM conventions. It
/// recognizes the triggering user gesture, locates the content
/// container, extracts a canonical URL, and hands the intent to the
/// Dispatch Bridge exactly once. All failure paths log and abandon the
/// single intent; nothing here may throw into the host page.
pub mod chatgpt;
pub mod linkedin;
pub mod reddit;
pub mod x;

use crate::bridge::Dispatcher;
use crate::dom::ListenerGuard;
use crate::observe::NodeWatcher;
use crate::platform::Platform;
use std::rc::Rc;
use web_sys::Document;

/// Common adapter contract. Adapters are plain structs carrying their
/// selector/timing configuration so tests can construct them with
/// shortened delays and a recording dispatcher.
pub trait SiteAdapter {
    fn platform(&self) -> Platform;

    /// Install the adapter's listeners and observers against `document`.
    /// Never fails loudly; on unusable pages the returned guard is
    /// simply empty.
    fn attach(&self, document: &Document, dispatch: Rc<dyn Dispatcher>) -> AdapterGuard;
}

/// Keeps an attached adapter's listeners and observers alive; dropping
/// it detaches everything that can be detached.
#[derive(Default)]
pub struct AdapterGuard {
    pub(crate) listeners: Vec<ListenerGuard>,
    pub(crate) watchers: Vec<NodeWatcher>,
}

impl AdapterGuard {
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty() && self.watchers.is_empty()
    }
}

/// Factory used by the content-script entry point after the hostname
/// registry has picked a platform.
pub fn adapter_for(platform: Platform) -> Box<dyn SiteAdapter> {
    match platform {
        Platform::X => Box::new(x::XAdapter),
        Platform::Reddit => Box::new(reddit::RedditAdapter::default()),
        Platform::LinkedIn => Box::new(linkedin::LinkedInAdapter),
        Platform::ChatGpt => Box::new(chatgpt::ChatGptAdapter::default()),
    }
}
