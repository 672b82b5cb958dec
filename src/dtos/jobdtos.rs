use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{
    jobmodel::{ServiceCategory, UrgencyLevel},
    teammodel::SlotAssignment,
    transactionmodel::PaymentMethod,
};

//Job Dto
#[derive(Debug, Deserialize, Serialize, Validate, Clone, PartialEq)]
pub struct CreateJobDto {
    pub category_id: i64,

    #[validate(length(min = 1, max = 100, message = "Title must be between 1 and 100"))]
    pub title: String,

    #[validate(length(min = 20, max = 2000, message = "Description must be between 20 and 2000"))]
    pub description: String,

    #[validate(range(min = 1.0, max = 10_000_000.0, message = "Budget must be between 1 and 10,000,000"))]
    pub budget: f64,

    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,

    pub expected_duration: Option<String>,

    pub urgency_level: UrgencyLevel,

    pub preferred_start_date: Option<chrono::NaiveDate>,

    #[serde(default)]
    pub materials_needed: Vec<String>,

    pub payment_method: PaymentMethod,
}

/// What is actually posted: the form plus the computed escrow split and,
/// for invites, the recipient.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct CreateJobPayload {
    #[serde(flatten)]
    pub job: CreateJobDto,
    pub downpayment_amount: f64,
    pub final_payment_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agency_id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct JobCreatedResponse {
    #[serde(default)]
    pub success: bool,
    pub job_id: i64,
    #[serde(default)]
    pub requires_payment: bool,
    #[serde(alias = "invoice_url", alias = "payment_url")]
    pub checkout_url: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CategoriesResponse {
    #[serde(default)]
    pub categories: Vec<ServiceCategory>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct MarkBackjobCompleteDto {
    pub notes: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AssignEmployeesDto {
    pub assignments: Vec<SlotAssignment>,
    pub primary_contact_id: i64,
}
