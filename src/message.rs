/// Wire types crossing the content-script/background boundary and the
/// backend HTTP boundary.
use crate::platform::Platform;
use serde::{Deserialize, Serialize};

/// Message action name for save requests. The background listener
/// ignores anything else.
pub const SAVE_ACTION: &str = "saveBookmark";

/// One bookmark intent, serialized across the extension messaging
/// channel by the Dispatch Bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveRequest {
    pub action: String,
    pub platform: Platform,
    pub url: String,
}

impl SaveRequest {
    pub fn new(platform: Platform, url: String) -> SaveRequest {
        SaveRequest {
            action: SAVE_ACTION.to_string(),
            platform,
            url,
        }
    }

    /// Whether an incoming message is a save request at all.
    pub fn is_save_action(&self) -> bool {
        self.action == SAVE_ACTION
    }
}

/// Reply flowing back to the originating adapter, exactly one per
/// request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DispatchResult {
    Success {
        #[serde(default)]
        data: serde_json::Value,
    },
    Error {
        message: String,
    },
}

impl DispatchResult {
    pub fn error(message: impl Into<String>) -> DispatchResult {
        DispatchResult::Error {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DispatchResult::Success { .. })
    }
}

/// Body POSTed to the backend save endpoint by the Background Save
/// Coordinator. The user id comes from extension storage, never from
/// the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavePayload {
    pub platform: Platform,
    pub url: String,
    #[serde(rename = "userId")]
    pub user_id: String,
}

/// Per-platform saved-item counts, as stored alongside the user record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveMetrics {
    #[serde(default)]
    pub x: u32,
    #[serde(default)]
    pub reddit: u32,
    #[serde(default)]
    pub linkedin: u32,
    #[serde(default)]
    pub chatgpt: u32,
}

/// Signed-in user record kept in `chrome.storage.local` under the
/// `userInfo` key by the identity collaborator. Only `id` is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredUser {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub metrics: Option<SaveMetrics>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_request_shape() {
        let req = SaveRequest::new(Platform::Reddit, "https://www.reddit.com/r/a/".to_string());
        let json = serde_json::to_value(&req).unwrap();

        assert_eq!(json["action"], "saveBookmark");
        assert_eq!(json["platform"], "reddit");
        assert_eq!(json["url"], "https://www.reddit.com/r/a/");
        assert!(req.is_save_action());
    }

    #[test]
    fn test_dispatch_result_success_wire_shape() {
        let reply: DispatchResult =
            serde_json::from_str(r#"{"status":"success","data":{"saved":true}}"#).unwrap();
        assert!(reply.is_success());

        match reply {
            DispatchResult::Success { data } => assert_eq!(data["saved"], true),
            DispatchResult::Error { .. } => panic!("expected success"),
        }
    }

    #[test]
    fn test_dispatch_result_success_without_data() {
        let reply: DispatchResult = serde_json::from_str(r#"{"status":"success"}"#).unwrap();
        assert!(reply.is_success());
    }

    #[test]
    fn test_dispatch_result_error_wire_shape() {
        let reply = DispatchResult::error("channel closed");
        let json = serde_json::to_string(&reply).unwrap();
        assert_eq!(json, r#"{"status":"error","message":"channel closed"}"#);
    }

    #[test]
    fn test_save_payload_user_id_camel_case() {
        let payload = SavePayload {
            platform: Platform::X,
            url: "https://x.com/a/status/1".to_string(),
            user_id: "google-sub-123".to_string(),
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["userId"], "google-sub-123");
        assert!(json.get("user_id").is_none());
    }

    #[test]
    fn test_stored_user_minimal() {
        let user: StoredUser = serde_json::from_str(r#"{"id":"u1"}"#).unwrap();
        assert_eq!(user.id, "u1");
        assert!(user.metrics.is_none());
    }

    #[test]
    fn test_stored_user_metrics_defaults() {
        let user: StoredUser =
            serde_json::from_str(r#"{"id":"u1","metrics":{"x":3,"reddit":1}}"#).unwrap();
        let metrics = user.metrics.unwrap();
        assert_eq!(metrics.x, 3);
        assert_eq!(metrics.reddit, 1);
        assert_eq!(metrics.linkedin, 0);
        assert_eq!(metrics.chatgpt, 0);
    }
}
