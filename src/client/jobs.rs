// client/jobs.rs
use super::{api_client::ApiClient, error::ClientError};
use crate::{
    dtos::{
        jobdtos::{
            AssignEmployeesDto, CategoriesResponse, CreateJobPayload, JobCreatedResponse,
            MarkBackjobCompleteDto,
        },
        responsedtos::CommandResponse,
    },
    models::{disputemodel::BackjobStatus, jobmodel::ServiceCategory},
};

impl ApiClient {
    pub async fn get_backjob_status(&self, job_id: i64) -> Result<BackjobStatus, ClientError> {
        self.get_json(&format!("/api/jobs/{}/backjob-status", job_id)).await
    }

    pub async fn mark_backjob_complete(
        &self,
        job_id: i64,
        body: &MarkBackjobCompleteDto,
    ) -> Result<CommandResponse, ClientError> {
        self.post_json(&format!("/api/jobs/{}/backjob/mark-complete", job_id), body)
            .await
    }

    pub async fn create_listing_job(
        &self,
        payload: &CreateJobPayload,
    ) -> Result<JobCreatedResponse, ClientError> {
        self.post_json("/api/jobs/create-mobile", payload).await
    }

    pub async fn create_invite_job(
        &self,
        payload: &CreateJobPayload,
    ) -> Result<JobCreatedResponse, ClientError> {
        self.post_json("/api/jobs/create-invite", payload).await
    }

    pub async fn get_categories(&self) -> Result<Vec<ServiceCategory>, ClientError> {
        let response: CategoriesResponse = self
            .get_json("/api/adminpanel/settings/categories")
            .await?;
        Ok(response.categories)
    }

    pub async fn assign_team_employees(
        &self,
        job_id: i64,
        body: &AssignEmployeesDto,
    ) -> Result<CommandResponse, ClientError> {
        self.post_json(&format!("/api/agency/jobs/{}/assign-employees", job_id), body)
            .await
    }
}
