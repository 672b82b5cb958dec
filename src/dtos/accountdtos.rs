use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::kycmodel::{KycConfirmationStatus, KycExtraction};

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct RegisterAgencyDto {
    #[validate(length(min = 1, max = 255, message = "Business name is required"))]
    pub business_name: String,

    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be between 8 and 128 characters"))]
    pub password: String,

    #[validate(length(min = 1, message = "Confirm Password is required"))]
    #[serde(rename = "passwordConfirm", alias = "password_confirm")]
    pub password_confirm: String,

    #[validate(length(min = 10, max = 20, message = "Contact number must be between 10-20 characters"))]
    pub contact_number: Option<String>,
}

impl RegisterAgencyDto {
    /// Trims the free-text fields and lowercases the email. Blank contact numbers become `None`.
    pub fn normalized(self) -> Self {
        Self {
            business_name: self.business_name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            contact_number: self
                .contact_number
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            ..self
        }
    }

    pub fn passwords_match(&self) -> bool {
        self.password == self.password_confirm
    }
}

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct VerifyEmailQueryDto {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AgencyRegistrationData {
    pub account_id: Uuid,
    pub email: String,
    pub business_name: String,
    pub verification_email_sent: bool,
}

// KYC

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct KycAutofillResponse {
    #[serde(default)]
    pub success: bool,
    pub extraction: Option<KycExtraction>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct KycConfirmDto {
    pub fields: std::collections::BTreeMap<String, String>,
    pub edited_fields: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct KycConfirmResponse {
    #[serde(default)]
    pub success: bool,
    pub status: Option<KycConfirmationStatus>,
    pub message: Option<String>,
}
