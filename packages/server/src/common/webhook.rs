// Outcome payload delivered to a run's callback URI
//
// Lives in common so both the webhook transport (kernel) and the outcome
// reporter (domain) can use it without a circular dependency.

use serde::{Deserialize, Serialize};

/// Terminal status of a run as seen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WebhookStatus {
    Ok,
    BadRequest,
}

/// Body POSTed to the callback URI once per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    pub message: String,
    /// Full error chain on failure, empty on success
    pub error_detail: String,
    pub status: WebhookStatus,
}

impl WebhookPayload {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error_detail: String::new(),
            status: WebhookStatus::Ok,
        }
    }

    pub fn bad_request(message: impl Into<String>, error_detail: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error_detail: error_detail.into(),
            status: WebhookStatus::BadRequest,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == WebhookStatus::Ok
    }
}
