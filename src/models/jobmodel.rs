use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ServiceCategory {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub minimum_rate: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UrgencyLevel {
    Low,
    Medium,
    High,
}

/// Who receives a direct job invite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InviteTarget {
    Worker(i64),
    Agency(i64),
}

/// What happened after a job was submitted.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum JobCreationOutcome {
    /// Paid from wallet (or no payment needed); the job is live.
    Posted { job_id: i64 },
    /// The downpayment must be completed on the provider's checkout page.
    AwaitingPayment { job_id: i64, checkout_url: String },
}

impl JobCreationOutcome {
    pub fn job_id(&self) -> i64 {
        match self {
            JobCreationOutcome::Posted { job_id }
            | JobCreationOutcome::AwaitingPayment { job_id, .. } => *job_id,
        }
    }
}
