//! Handler dispatch for the three phases of a manual approval step.
//!
//! Each invocation performs at most one platform call. `init` and `callback`
//! leave a status record behind for the pipeline; `cancel` only notifies the
//! platform.
use std::str::FromStr;

use serde_json::value::RawValue;
use tracing::{debug, error, info, warn};

use crate::client::{ApiClient, CREATE_APPROVAL_PATH, UPDATE_STATUS_PATH};
use crate::config::{
    Env, APPROVERS, CANCELLATION_REASON, DISALLOW_LAUNCHED_BY_USER, INSTRUCTIONS,
    NOTIFY_ALL_ELIGIBLE_USERS, PAYLOAD,
};
use crate::errors::{ApprovalError, Result};
use crate::markdown;
use crate::models::approval::{
    self, ApprovalDecision, ApprovalRequest, CallbackPayload, CreateApprovalResponse, StatusUpdate,
};
use crate::status::{StatusRecord, StepStatus};
use crate::transport::Transport;

/// `CANCELLATION_REASON` value meaning a user aborted the workflow.
/// Every other reason is reported as a timeout.
pub const CANCELLED: &str = "CANCELLED";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    Init,
    Callback,
    Cancel,
}

impl FromStr for Handler {
    type Err = ApprovalError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "init" => Ok(Handler::Init),
            "callback" => Ok(Handler::Callback),
            "cancel" => Ok(Handler::Cancel),
            other => Err(ApprovalError::UnsupportedHandler(other.to_string())),
        }
    }
}

pub struct ApprovalDispatcher<T> {
    env: Env,
    client: ApiClient<T>,
}

impl<T: Transport> ApprovalDispatcher<T> {
    pub fn new(env: Env, transport: T) -> Self {
        Self {
            env,
            client: ApiClient::new(transport),
        }
    }

    pub fn transport(&self) -> &T {
        self.client.transport()
    }

    pub async fn run(&self, handler: &str) -> Result<()> {
        match handler.parse::<Handler>()? {
            Handler::Init => self.init().await,
            Handler::Callback => self.callback().await,
            Handler::Cancel => self.cancel().await,
        }
    }

    pub async fn init(&self) -> Result<()> {
        debug!("Inside init handler");

        let raw_instructions = self.env.get(INSTRUCTIONS);
        let request = ApprovalRequest {
            approvers: self.env.list(APPROVERS),
            instructions: raw_instructions.map(markdown::to_html),
            disallow_launched_by_user: self.env.flag(DISALLOW_LAUNCHED_BY_USER)?,
            notify_all_eligible_users: self.env.flag(NOTIFY_ALL_ELIGIBLE_USERS)?,
        };

        let body = match self.client.post(&self.env, CREATE_APPROVAL_PATH, &request).await {
            Ok(body) => body,
            Err(e) => {
                error!(error = %e, "API call failed");
                self.record_failure(StatusRecord::new(
                    StepStatus::Failed,
                    format!("Failed to initialize workflow manual approval request: '{}'", e),
                ))
                .await;
                return Err(e);
            }
        };

        // The approver list only feeds the log line, so a body we cannot
        // decode does not fail the step.
        let created: CreateApprovalResponse = serde_json::from_str(&body).unwrap_or_else(|e| {
            warn!(error = %e, "could not decode create approval response");
            CreateApprovalResponse::default()
        });
        let users: Vec<&str> = created
            .approvers
            .iter()
            .map(|a| a.user_name.as_str())
            .collect();

        info!("Waiting for approval from one of the following: {}", users.join(","));
        if let Some(text) = raw_instructions {
            info!("Instructions:\n{}", text);
        }

        StatusRecord::new(StepStatus::PendingApproval, "Waiting for approval from approvers")
            .write(&self.env)
            .await?;
        Ok(())
    }

    pub async fn callback(&self) -> Result<()> {
        debug!("Inside callback handler");

        let raw = self.env.require(PAYLOAD)?;
        debug!(payload = raw, "incoming payload");

        // Forwarded as received; the typed parse is only for validation and logging.
        let payload: &RawValue = serde_json::from_str(raw)?;
        let response: CallbackPayload = serde_json::from_str(payload.get())?;
        debug!(
            status = %response.status,
            comments = %response.comments,
            responded_on = %response.responded_on,
            user_id = %response.user_id,
            user_name = %response.user_name,
            "approval response"
        );

        if let Err(e) = self.client.post(&self.env, UPDATE_STATUS_PATH, payload).await {
            error!(error = %e, "API call failed");
            self.record_failure(StatusRecord::new(
                StepStatus::Failed,
                format!("Failed to change workflow manual approval status: '{}'", e),
            ))
            .await;
            return Err(e);
        }

        let status = match response.status.as_str() {
            approval::APPROVED => {
                info!(
                    "Approved by {} on {} with comments:\n{}",
                    response.user_name, response.responded_on, response.comments
                );
                StepStatus::Approved
            }
            approval::REJECTED => {
                info!(
                    "Rejected by {} on {} with comments:\n{}",
                    response.user_name, response.responded_on, response.comments
                );
                StepStatus::Rejected
            }
            other => {
                let err = ApprovalError::UnexpectedStatus(other.to_string());
                error!("{}", err);
                self.record_failure(StatusRecord::new(StepStatus::Failed, err.to_string()))
                    .await;
                return Err(err);
            }
        };

        StatusRecord::new(status, "Successfully changed workflow manual approval status")
            .write(&self.env)
            .await?;
        Ok(())
    }

    pub async fn cancel(&self) -> Result<()> {
        debug!("Inside cancel handler");

        let reason = self.env.require(CANCELLATION_REASON)?;

        let status = if reason == CANCELLED {
            info!("Workflow aborted by user");
            info!("Cancelling the manual approval request");
            ApprovalDecision::Aborted
        } else {
            info!("Workflow timed out");
            info!("Workflow approval response was not received within allotted time.");
            ApprovalDecision::TimedOut
        };

        let body = self
            .client
            .post(&self.env, UPDATE_STATUS_PATH, &StatusUpdate { status })
            .await
            .inspect_err(|e| error!(error = %e, "API call failed"))?;

        debug!(response = %body, "status update accepted");
        Ok(())
    }

    /// Best-effort FAILED record; the caller's error stays the one reported.
    async fn record_failure(&self, record: StatusRecord) {
        if let Err(e) = record.write(&self.env).await {
            error!(error = %e, "failed to record step failure");
        }
    }
}
