// service/kyc_service.rs
use std::collections::BTreeMap;

use crate::{
    client::ApiClient,
    dtos::accountdtos::{KycConfirmDto, KycConfirmResponse},
    models::kycmodel::{ConfidenceLevel, KycConfirmationStatus, KycExtraction, KycField},
    service::error::ServiceError,
};

/// Review of auto-extracted ID fields before a single confirmation post.
#[derive(Debug, Clone)]
pub struct KycConfirmation {
    status: KycConfirmationStatus,
    document_type: Option<String>,
    fields: Vec<KycField>,
}

impl KycConfirmation {
    pub fn from_extraction(extraction: KycExtraction) -> Self {
        Self {
            status: extraction.status,
            document_type: extraction.document_type,
            fields: extraction.fields.into_iter().map(KycField::from).collect(),
        }
    }

    pub async fn load(client: &ApiClient) -> Result<Self, ServiceError> {
        let response = client.get_kyc_autofill().await?;
        let extraction = response.extraction.ok_or(ServiceError::KycNotExtracted)?;
        tracing::debug!(
            "Loaded {} extracted KYC fields ({:?})",
            extraction.fields.len(),
            extraction.status
        );
        Ok(Self::from_extraction(extraction))
    }

    pub fn status(&self) -> KycConfirmationStatus {
        self.status
    }

    pub fn document_type(&self) -> Option<&str> {
        self.document_type.as_deref()
    }

    pub fn fields(&self) -> &[KycField] {
        &self.fields
    }

    pub fn field(&self, key: &str) -> Option<&KycField> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn set_value(&mut self, key: &str, value: impl Into<String>) -> Result<(), ServiceError> {
        let field = self
            .fields
            .iter_mut()
            .find(|f| f.key == key)
            .ok_or_else(|| ServiceError::Validation(format!("Unknown KYC field: {}", key)))?;
        field.value = value.into();
        Ok(())
    }

    pub fn reset(&mut self, key: &str) {
        if let Some(field) = self.fields.iter_mut().find(|f| f.key == key) {
            field.value = field.original_value.clone();
        }
    }

    pub fn edited_keys(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|f| f.edited())
            .map(|f| f.key.clone())
            .collect()
    }

    pub fn missing_required(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|f| f.is_missing())
            .map(|f| f.label.clone())
            .collect()
    }

    /// Untouched fields the extractor was unsure about.
    pub fn needs_review(&self) -> Vec<&KycField> {
        self.fields
            .iter()
            .filter(|f| !f.edited() && f.confidence_level() == ConfidenceLevel::Low)
            .collect()
    }

    pub fn submission(&self) -> Result<KycConfirmDto, ServiceError> {
        if self.status == KycConfirmationStatus::Confirmed {
            return Err(ServiceError::Validation(
                "KYC details have already been confirmed".to_string(),
            ));
        }

        let missing = self.missing_required();
        if !missing.is_empty() {
            return Err(ServiceError::MissingKycFields(missing));
        }

        let fields: BTreeMap<String, String> = self
            .fields
            .iter()
            .map(|f| (f.key.clone(), f.value.trim().to_string()))
            .collect();

        Ok(KycConfirmDto {
            fields,
            edited_fields: self.edited_keys(),
        })
    }

    pub async fn submit(&mut self, client: &ApiClient) -> Result<KycConfirmResponse, ServiceError> {
        let body = self.submission()?;

        tracing::info!(
            "Confirming KYC with {} fields ({} edited)",
            body.fields.len(),
            body.edited_fields.len()
        );

        let response = client.confirm_kyc(&body).await.map_err(|e| {
            tracing::error!("KYC confirmation failed: {}", e);
            e
        })?;

        self.status = response.status.unwrap_or(KycConfirmationStatus::Confirmed);
        Ok(response)
    }
}
