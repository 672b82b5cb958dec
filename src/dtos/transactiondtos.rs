use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::transactionmodel::{EscrowStats, RefundTarget, Transaction, TransactionStatus};

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct ReleaseEscrowDto {
    #[validate(length(min = 1, max = 500, message = "Reason must be between 1 and 500 characters"))]
    pub reason: String,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct RefundDto {
    #[validate(range(min = 0.01, message = "Refund amount must be positive"))]
    pub amount: f64,

    #[validate(length(min = 1, max = 500, message = "Reason must be between 1 and 500 characters"))]
    pub reason: String,

    pub refund_to: RefundTarget,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct BulkReleaseDto {
    #[validate(length(min = 1, message = "Select at least one escrow"))]
    pub escrow_ids: Vec<i64>,

    #[validate(length(min = 1, max = 500, message = "Reason must be between 1 and 500 characters"))]
    pub reason: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BulkReleaseResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub released_count: u32,
    #[serde(default)]
    pub failed_ids: Vec<i64>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct EscrowQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TransactionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EscrowListResponse {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub stats: EscrowStats,
    #[serde(default)]
    pub total: i64,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub total_pages: u32,
}

fn first_page() -> u32 {
    1
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TransactionDetailResponse {
    pub transaction: Transaction,
}
