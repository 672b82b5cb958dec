use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    /// Buckets a 0-100 extraction score.
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            ConfidenceLevel::High
        } else if score >= 70.0 {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }

    pub fn to_str(&self) -> &str {
        match self {
            ConfidenceLevel::High => "High",
            ConfidenceLevel::Medium => "Medium",
            ConfidenceLevel::Low => "Low",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KycConfirmationStatus {
    Pending,
    Extracted,
    Confirmed,
    Failed,
}

/// A field as returned by the extraction pipeline.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ExtractedField {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct KycExtraction {
    pub status: KycConfirmationStatus,
    pub document_type: Option<String>,
    #[serde(default)]
    pub fields: Vec<ExtractedField>,
}

/// A field being reviewed by the user before confirmation.
#[derive(Debug, Clone, PartialEq)]
pub struct KycField {
    pub key: String,
    pub label: String,
    pub value: String,
    pub original_value: String,
    pub confidence: f64,
    pub required: bool,
}

impl KycField {
    pub fn edited(&self) -> bool {
        self.value != self.original_value
    }

    pub fn confidence_level(&self) -> ConfidenceLevel {
        ConfidenceLevel::from_score(self.confidence)
    }

    pub fn is_missing(&self) -> bool {
        self.required && self.value.trim().is_empty()
    }
}

impl From<ExtractedField> for KycField {
    fn from(field: ExtractedField) -> Self {
        KycField {
            original_value: field.value.clone(),
            value: field.value,
            key: field.key,
            label: field.label,
            confidence: field.confidence.clamp(0.0, 100.0),
            required: field.required,
        }
    }
}
