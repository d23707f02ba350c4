use serde::{Deserialize, Serialize};

pub const APPROVED: &str = "UPDATE_MANUAL_APPROVAL_STATUS_APPROVED";
pub const REJECTED: &str = "UPDATE_MANUAL_APPROVAL_STATUS_REJECTED";

/// Body of the "create approval" call.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approvers: Option<Vec<String>>,
    /// HTML rendered from the step's Markdown instructions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    pub disallow_launched_by_user: bool,
    pub notify_all_eligible_users: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateApprovalResponse {
    #[serde(default)]
    pub approvers: Vec<Approver>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Approver {
    pub user_name: String,
    pub user_id: String,
    pub email: String,
}

/// Approver response delivered to the `callback` handler.
///
/// Only `status` is mandatory; the rest is informational.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackPayload {
    pub status: String,
    #[serde(default)]
    pub comments: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub responded_on: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApprovalDecision {
    #[serde(rename = "UPDATE_MANUAL_APPROVAL_STATUS_ABORTED")]
    Aborted,
    #[serde(rename = "UPDATE_MANUAL_APPROVAL_STATUS_TIMED_OUT")]
    TimedOut,
}

/// Body of the status-update call issued on cancellation.
#[derive(Debug, Clone, Serialize)]
pub struct StatusUpdate {
    pub status: ApprovalDecision,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_request_omits_optional_fields() {
        let json = serde_json::to_value(ApprovalRequest::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "disallowLaunchedByUser": false,
                "notifyAllEligibleUsers": false,
            })
        );
    }

    #[test]
    fn test_response_tolerates_partial_approvers() {
        let resp: CreateApprovalResponse =
            serde_json::from_str(r#"{"approvers":[{"userId": "123", "userEmail": "user@mail.com"}]}"#).unwrap();
        assert_eq!(resp.approvers.len(), 1);
        assert_eq!(resp.approvers[0].user_id, "123");
        assert!(resp.approvers[0].user_name.is_empty());
    }

    #[test]
    fn test_callback_payload_requires_status() {
        let err = serde_json::from_str::<CallbackPayload>(r#"{"comments":"ok"}"#).unwrap_err();
        assert!(err.to_string().contains("status"));
    }

    #[test]
    fn test_status_update_wire_names() {
        let aborted = serde_json::to_string(&StatusUpdate { status: ApprovalDecision::Aborted }).unwrap();
        assert_eq!(aborted, r#"{"status":"UPDATE_MANUAL_APPROVAL_STATUS_ABORTED"}"#);
        let timed_out = serde_json::to_string(&StatusUpdate { status: ApprovalDecision::TimedOut }).unwrap();
        assert_eq!(timed_out, r#"{"status":"UPDATE_MANUAL_APPROVAL_STATUS_TIMED_OUT"}"#);
    }
}
