use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisputeStatus {
    Open,
    UnderReview,
    Resolved,
    Closed,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisputePriority {
    Low,
    Medium,
    High,
    Critical,
}

/// Where a backjob sits in the start → complete → confirm handoff.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BackjobPhase {
    /// Filed, not yet reviewed.
    Open,
    /// Under review, waiting for the client to confirm work started.
    AwaitingStart,
    /// Client confirmed start; the worker or agency is redoing the work.
    InProgress,
    /// Worker marked the redo complete; waiting on the client.
    AwaitingClientConfirmation,
    Resolved,
    Closed,
}

impl BackjobPhase {
    pub fn to_str(&self) -> &str {
        match self {
            BackjobPhase::Open => "open",
            BackjobPhase::AwaitingStart => "awaiting_start",
            BackjobPhase::InProgress => "in_progress",
            BackjobPhase::AwaitingClientConfirmation => "awaiting_client_confirmation",
            BackjobPhase::Resolved => "resolved",
            BackjobPhase::Closed => "closed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BackjobPhase::Resolved | BackjobPhase::Closed)
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PhaseError {
    #[error("dispute {0} is marked complete by the worker but the backjob never started")]
    CompletedBeforeStart(i64),

    #[error("dispute {0} is confirmed by the client but the worker never marked it complete")]
    ConfirmedBeforeCompletion(i64),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Dispute {
    pub dispute_id: i64,
    pub reason: String,
    #[serde(default)]
    pub description: String,
    pub status: DisputeStatus,
    pub priority: DisputePriority,
    pub opened_date: DateTime<Utc>,
    pub resolved_date: Option<DateTime<Utc>>,
    pub resolution: Option<String>,
    #[serde(default)]
    pub evidence_images: Vec<String>,

    #[serde(default)]
    pub backjob_started: bool,
    pub backjob_started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub worker_marked_complete: bool,
    pub worker_marked_complete_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub client_confirmed: bool,
    pub client_confirmed_at: Option<DateTime<Utc>>,
}

impl Dispute {
    /// Checks the handoff flags are set in order.
    pub fn validate_phases(&self) -> Result<(), PhaseError> {
        if self.worker_marked_complete && !self.backjob_started {
            return Err(PhaseError::CompletedBeforeStart(self.dispute_id));
        }
        if self.client_confirmed && !self.worker_marked_complete {
            return Err(PhaseError::ConfirmedBeforeCompletion(self.dispute_id));
        }
        Ok(())
    }

    pub fn phase(&self) -> Result<BackjobPhase, PhaseError> {
        self.validate_phases()?;

        let phase = match self.status {
            DisputeStatus::Closed => BackjobPhase::Closed,
            DisputeStatus::Resolved => BackjobPhase::Resolved,
            _ if self.client_confirmed => BackjobPhase::Resolved,
            DisputeStatus::Open => BackjobPhase::Open,
            DisputeStatus::UnderReview => {
                if self.worker_marked_complete {
                    BackjobPhase::AwaitingClientConfirmation
                } else if self.backjob_started {
                    BackjobPhase::InProgress
                } else {
                    BackjobPhase::AwaitingStart
                }
            }
        };

        Ok(phase)
    }

    /// The worker/agency may mark the backjob complete only after the
    /// client confirmed the start and before it has already been marked.
    pub fn can_mark_complete(&self) -> bool {
        self.backjob_started && !self.worker_marked_complete
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BackjobStatus {
    #[serde(default)]
    pub has_backjob: bool,
    pub dispute: Option<Dispute>,
}
