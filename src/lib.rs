/// Swooosh - browser extension that bookmarks content from X/Twitter,
/// Reddit, LinkedIn and ChatGPT share pages into a per-user store.
/// Built with Rust + WASM + Yew

pub mod adapters;
pub mod background;
pub mod bridge;
pub mod canonical;
pub mod controls;
pub mod dom;
pub mod message;
pub mod observe;
pub mod platform;
pub mod storage;
pub mod ui;

use std::rc::Rc;
use wasm_bindgen::prelude::*;

// Set up panic hook and logging for better diagnostics in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

/// Entry point for the content script: resolve the platform from the
/// page hostname once and attach the matching adapter. Pages without an
/// adapter are left untouched.
#[wasm_bindgen]
pub fn start_content_script() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };
    let hostname = match window.location().hostname() {
        Ok(hostname) => hostname,
        Err(e) => {
            log::warn!("could not read page hostname: {e:?}");
            return;
        }
    };

    match platform::platform_for_hostname(&hostname) {
        Some(p) => {
            log::debug!("attaching {p} adapter on {hostname}");
            let adapter = adapters::adapter_for(p);
            let guard = adapter.attach(&document, Rc::new(bridge::ChromeBridge));
            // Listeners live for the whole page load; the browser tears
            // them down with the page on navigation.
            std::mem::forget(guard);
        }
        None => log::debug!("no adapter for host {hostname}"),
    }
}

/// Entry point for the background service worker.
#[wasm_bindgen]
pub fn start_background() {
    background::install_message_listener();
}

/// Entry point for the popup.
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}
