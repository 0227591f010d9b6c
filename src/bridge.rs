/// Dispatch Bridge: the single chokepoint moving a bookmark intent from
/// page context into the extension's background context.
///
/// One call produces exactly one `chrome.runtime.sendMessage` round
/// trip and exactly one `DispatchResult`. Transport failures (service
/// worker not woken, channel torn down, `chrome` missing entirely) are
/// folded into `DispatchResult::Error` so adapters never see a raw JS
/// exception.
use crate::message::{DispatchResult, SaveRequest};
use crate::platform::Platform;
use std::future::Future;
use std::pin::Pin;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = ["chrome", "runtime"], js_name = sendMessage)]
    async fn runtime_send_message(message: JsValue) -> Result<JsValue, JsValue>;
}

pub type DispatchFuture = Pin<Box<dyn Future<Output = DispatchResult> + 'static>>;

/// Seam between adapters and the messaging transport. Tests substitute
/// a recording implementation; production code uses [`ChromeBridge`].
pub trait Dispatcher {
    fn dispatch(&self, platform: Platform, url: String) -> DispatchFuture;
}

/// Production dispatcher over the extension messaging channel.
pub struct ChromeBridge;

impl Dispatcher for ChromeBridge {
    fn dispatch(&self, platform: Platform, url: String) -> DispatchFuture {
        Box::pin(send_save_request(platform, url))
    }
}

async fn send_save_request(platform: Platform, url: String) -> DispatchResult {
    let request = SaveRequest::new(platform, url);
    log::debug!("dispatching {} intent: {}", request.platform, request.url);

    let message = match serde_wasm_bindgen::to_value(&request) {
        Ok(message) => message,
        Err(e) => return DispatchResult::error(format!("failed to serialize request: {e}")),
    };

    match runtime_send_message(message).await {
        Ok(reply) => match serde_wasm_bindgen::from_value::<DispatchResult>(reply) {
            Ok(result) => result,
            Err(e) => DispatchResult::error(format!("unintelligible reply: {e}")),
        },
        Err(e) => DispatchResult::error(describe_js_error(&e)),
    }
}

/// Best-effort human-readable form of a thrown JS value.
pub fn describe_js_error(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        String::from(error.message())
    } else if let Some(text) = value.as_string() {
        text
    } else {
        format!("{value:?}")
    }
}
