// service/job_service.rs
use std::sync::Arc;

use validator::Validate;

use crate::{
    client::ApiClient,
    dtos::jobdtos::{CreateJobDto, CreateJobPayload, JobCreatedResponse},
    models::{
        jobmodel::{InviteTarget, JobCreationOutcome, ServiceCategory},
        transactionmodel::{EscrowSplit, PaymentMethod},
    },
    service::error::ServiceError,
};

#[derive(Debug, Clone)]
pub struct JobService {
    client: Arc<ApiClient>,
}

impl JobService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn categories(&self) -> Result<Vec<ServiceCategory>, ServiceError> {
        Ok(self.client.get_categories().await?)
    }

    /// Validates the form and attaches the 50/50 escrow split.
    pub fn build_payload(
        job: CreateJobDto,
        target: Option<InviteTarget>,
    ) -> Result<CreateJobPayload, ServiceError> {
        job.validate()
            .map_err(|e| ServiceError::Validation(e.to_string()))?;

        if job.payment_method == PaymentMethod::Cash {
            return Err(ServiceError::Validation(
                "Job payments must be made by wallet or GCash".to_string(),
            ));
        }

        let split = EscrowSplit::from_budget(job.budget);
        let (worker_id, agency_id) = match target {
            Some(InviteTarget::Worker(id)) => (Some(id), None),
            Some(InviteTarget::Agency(id)) => (None, Some(id)),
            None => (None, None),
        };

        Ok(CreateJobPayload {
            job,
            downpayment_amount: split.downpayment(),
            final_payment_amount: split.final_payment(),
            worker_id,
            agency_id,
        })
    }

    pub async fn create_listing(&self, job: CreateJobDto) -> Result<JobCreationOutcome, ServiceError> {
        let payload = Self::build_payload(job, None)?;
        tracing::info!(
            "Posting job listing \"{}\" ({} down)",
            payload.job.title,
            payload.downpayment_amount
        );

        let response = self.client.create_listing_job(&payload).await.map_err(|e| {
            tracing::error!("Job listing creation failed: {}", e);
            e
        })?;
        Self::outcome(response)
    }

    pub async fn create_invite(
        &self,
        job: CreateJobDto,
        target: InviteTarget,
    ) -> Result<JobCreationOutcome, ServiceError> {
        let payload = Self::build_payload(job, Some(target))?;
        tracing::info!("Sending job invite \"{}\" to {:?}", payload.job.title, target);

        let response = self.client.create_invite_job(&payload).await.map_err(|e| {
            tracing::error!("Job invite creation failed: {}", e);
            e
        })?;
        Self::outcome(response)
    }

    fn outcome(response: JobCreatedResponse) -> Result<JobCreationOutcome, ServiceError> {
        match response.checkout_url.filter(|url| !url.trim().is_empty()) {
            Some(checkout_url) => Ok(JobCreationOutcome::AwaitingPayment {
                job_id: response.job_id,
                checkout_url,
            }),
            None if response.requires_payment => Err(ServiceError::Other(format!(
                "Job {} requires payment but no checkout URL was returned",
                response.job_id
            ))),
            None => Ok(JobCreationOutcome::Posted {
                job_id: response.job_id,
            }),
        }
    }
}
