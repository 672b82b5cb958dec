use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Account {
    pub account_id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub is_verified: bool,
    #[serde(skip_serializing)]
    pub verify_token: Option<String>,
    pub verify_token_expiry: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Agency {
    pub agency_id: Uuid,
    pub account_id: Uuid,
    pub business_name: String,
    pub contact_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Everything written for a new agency in one transaction.
#[derive(Debug, Clone)]
pub struct NewAgencyAccount {
    pub email: String,
    pub password_hash: String,
    pub business_name: String,
    pub contact_number: Option<String>,
    pub verify_token: String,
    pub verify_token_expiry: DateTime<Utc>,
}
