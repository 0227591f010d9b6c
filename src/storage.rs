/// Read-side access to extension-local storage.
///
/// The identity collaborator writes the signed-in user record to
/// `chrome.storage.local` under `userInfo`; the Background Save
/// Coordinator and the popup only ever read it. User identity is never
/// taken from page-context messages.
use crate::message::StoredUser;
use wasm_bindgen::prelude::*;

pub const USER_INFO_KEY: &str = "userInfo";

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "local"], js_name = get)]
    async fn storage_local_get(keys: JsValue) -> Result<JsValue, JsValue>;
}

/// The signed-in user, or `None` when signed out, storage is
/// unreadable, or the record does not parse.
pub async fn signed_in_user() -> Option<StoredUser> {
    let result = match storage_local_get(JsValue::from_str(USER_INFO_KEY)).await {
        Ok(result) => result,
        Err(e) => {
            log::warn!("storage read failed: {e:?}");
            return None;
        }
    };

    let stored = js_sys::Reflect::get(&result, &JsValue::from_str(USER_INFO_KEY)).ok()?;
    if stored.is_undefined() || stored.is_null() {
        return None;
    }

    match serde_wasm_bindgen::from_value::<StoredUser>(stored) {
        Ok(user) => Some(user),
        Err(e) => {
            log::warn!("stored user record did not parse: {e}");
            None
        }
    }
}
