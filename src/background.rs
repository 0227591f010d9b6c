/// Background Save Coordinator.
///
/// Runs in the extension service worker. For each `saveBookmark`
/// message it resolves the signed-in user from extension storage,
/// attaches the user id to the payload, POSTs to the backend save
/// endpoint, and sends exactly one structured reply back through the
/// messaging channel. A 409 from the backend means "already saved" and
/// is treated as success.
use crate::bridge::describe_js_error;
use crate::message::{DispatchResult, SavePayload, SaveRequest};
use crate::storage;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Headers, Request, RequestInit, Response};

const BACKEND_SAVE_URL: &str = "http://localhost:3000/save";
const STATUS_ALREADY_SAVED: u16 = 409;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["chrome", "runtime", "onMessage"], js_name = addListener)]
    fn add_message_listener(listener: &js_sys::Function);

    // Global fetch, available in both window and worker scopes.
    #[wasm_bindgen(js_name = fetch)]
    fn fetch_with_request(input: &Request) -> js_sys::Promise;
}

/// Install the `chrome.runtime.onMessage` listener. Returning `true`
/// from the listener holds the reply channel open until the async
/// handler calls `sendResponse`.
pub fn install_message_listener() {
    let listener = Closure::<dyn FnMut(JsValue, JsValue, js_sys::Function) -> JsValue>::new(
        move |message: JsValue, _sender: JsValue, send_response: js_sys::Function| {
            let Ok(request) = serde_wasm_bindgen::from_value::<SaveRequest>(message) else {
                return JsValue::FALSE;
            };
            if !request.is_save_action() {
                return JsValue::FALSE;
            }

            spawn_local(async move {
                let result = handle_save(request).await;
                let reply = serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL);
                if let Err(e) = send_response.call1(&JsValue::NULL, &reply) {
                    log::warn!("could not deliver reply: {e:?}");
                }
            });
            JsValue::TRUE
        },
    );

    add_message_listener(listener.as_ref().unchecked_ref());
    // The listener lives for the whole worker lifetime.
    listener.forget();
    log::debug!("save coordinator listening");
}

async fn handle_save(request: SaveRequest) -> DispatchResult {
    let Some(user) = storage::signed_in_user().await else {
        return DispatchResult::error("User not signed in or error fetching user info.");
    };

    log::debug!(
        "saving {} bookmark for user {}: {}",
        request.platform,
        user.id,
        request.url
    );

    post_save(&SavePayload {
        platform: request.platform,
        url: request.url,
        user_id: user.id,
    })
    .await
}

async fn post_save(payload: &SavePayload) -> DispatchResult {
    let body = match serde_json::to_string(payload) {
        Ok(body) => body,
        Err(e) => return DispatchResult::error(format!("failed to encode payload: {e}")),
    };

    let headers = match Headers::new() {
        Ok(headers) => headers,
        Err(e) => return DispatchResult::error(describe_js_error(&e)),
    };
    let _ = headers.append("Content-Type", "application/json");

    let init = RequestInit::new();
    init.set_method("POST");
    init.set_headers(&JsValue::from(headers));
    init.set_body(&JsValue::from_str(&body));

    let request = match Request::new_with_str_and_init(BACKEND_SAVE_URL, &init) {
        Ok(request) => request,
        Err(e) => return DispatchResult::error(describe_js_error(&e)),
    };

    let response = match JsFuture::from(fetch_with_request(&request)).await {
        Ok(response) => response,
        Err(e) => return DispatchResult::error(describe_js_error(&e)),
    };
    let Ok(response) = response.dyn_into::<Response>() else {
        return DispatchResult::error("fetch returned a non-Response value");
    };

    let status = response.status();
    if response.ok() || status == STATUS_ALREADY_SAVED {
        let data = read_json(&response).await.unwrap_or(serde_json::Value::Null);
        DispatchResult::Success { data }
    } else {
        let detail = read_text(&response).await.unwrap_or_default();
        DispatchResult::error(format!("backend returned {status}: {detail}"))
    }
}

async fn read_json(response: &Response) -> Option<serde_json::Value> {
    let promise = response.json().ok()?;
    let value = JsFuture::from(promise).await.ok()?;
    serde_wasm_bindgen::from_value(value).ok()
}

async fn read_text(response: &Response) -> Option<String> {
    let promise = response.text().ok()?;
    let value = JsFuture::from(promise).await.ok()?;
    value.as_string()
}
