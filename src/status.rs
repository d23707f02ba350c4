//! Status record handed back to the surrounding pipeline step.
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{Env, CLOUDBEES_STATUS};
use crate::errors::{ApprovalError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepStatus {
    PendingApproval,
    Approved,
    Rejected,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub status: StepStatus,
    pub message: String,
}

impl StatusRecord {
    pub fn new(status: StepStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Overwrite the file named by `CLOUDBEES_STATUS` with this record.
    pub async fn write(&self, env: &Env) -> Result<PathBuf> {
        let path = PathBuf::from(env.require(CLOUDBEES_STATUS)?);
        self.write_to(&path).await?;
        Ok(path)
    }

    pub async fn write_to(&self, path: &Path) -> Result<()> {
        let bytes = serde_json::to_vec(self)?;
        tokio::fs::write(path, bytes)
            .await
            .map_err(|source| ApprovalError::StatusWrite {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::debug!(path = %path.display(), status = ?self.status, "status record written");
        Ok(())
    }
}
