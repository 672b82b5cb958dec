// service/backjob_service.rs
use std::sync::Arc;

use crate::{
    client::ApiClient,
    dtos::jobdtos::MarkBackjobCompleteDto,
    models::disputemodel::{BackjobPhase, BackjobStatus, Dispute},
    service::error::ServiceError,
};

pub const MARK_COMPLETE_CONFIRMATION: &str =
    "Backjob marked as complete. Waiting for the client to confirm.";

/// Worker/agency side of the backjob handoff for one job.
///
/// The dispute record is only ever replaced by a successful fetch; a
/// failed command leaves the last fetched state in place.
#[derive(Debug)]
pub struct BackjobWorkflow {
    client: Arc<ApiClient>,
    job_id: i64,
    status: Option<BackjobStatus>,
    stale: bool,
}

impl BackjobWorkflow {
    pub fn new(client: Arc<ApiClient>, job_id: i64) -> Self {
        Self {
            client,
            job_id,
            status: None,
            stale: false,
        }
    }

    pub async fn load(client: Arc<ApiClient>, job_id: i64) -> Result<Self, ServiceError> {
        let mut workflow = Self::new(client, job_id);
        workflow.refresh().await?;
        Ok(workflow)
    }

    pub fn job_id(&self) -> i64 {
        self.job_id
    }

    pub fn status(&self) -> Option<&BackjobStatus> {
        self.status.as_ref()
    }

    pub fn dispute(&self) -> Option<&Dispute> {
        self.status.as_ref().and_then(|s| s.dispute.as_ref())
    }

    /// True when a command succeeded but the follow-up fetch did not.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn phase(&self) -> Result<Option<BackjobPhase>, ServiceError> {
        match self.dispute() {
            Some(dispute) => Ok(Some(dispute.phase()?)),
            None => Ok(None),
        }
    }

    pub fn can_mark_complete(&self) -> bool {
        !self.stale
            && self
                .dispute()
                .map(|d| d.validate_phases().is_ok() && d.can_mark_complete())
                .unwrap_or(false)
    }

    pub async fn refresh(&mut self) -> Result<&BackjobStatus, ServiceError> {
        let status = self
            .client
            .get_backjob_status(self.job_id)
            .await
            .map_err(|e| {
                tracing::warn!("Failed to fetch backjob status for job {}: {}", self.job_id, e);
                e
            })?;

        self.stale = false;
        let status = self.status.insert(status);
        Ok(&*status)
    }

    pub async fn mark_complete(&mut self, notes: Option<String>) -> Result<String, ServiceError> {
        let dispute = self
            .dispute()
            .ok_or(ServiceError::BackjobNotFound(self.job_id))?;

        let phase = dispute.phase()?;
        if self.stale || !dispute.can_mark_complete() {
            return Err(ServiceError::BackjobNotActionable {
                job_id: self.job_id,
                phase: phase.to_str().to_string(),
            });
        }

        let body = MarkBackjobCompleteDto {
            notes: notes.map(|n| n.trim().to_string()).unwrap_or_default(),
        };

        tracing::info!(
            "Marking backjob complete for job {} (dispute {})",
            self.job_id,
            dispute.dispute_id
        );

        let response = match self.client.mark_backjob_complete(self.job_id, &body).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Mark backjob complete failed for job {}: {}", self.job_id, e);
                return Err(e.into());
            }
        };

        if let Err(e) = self.refresh().await {
            tracing::warn!(
                "Backjob for job {} marked complete but refetch failed: {}",
                self.job_id,
                e
            );
            self.stale = true;
        }

        Ok(response
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| MARK_COMPLETE_CONFIRMATION.to_string()))
    }
}
