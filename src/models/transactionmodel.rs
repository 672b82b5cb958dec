use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::currency::{centavos_to_peso, peso_to_centavos};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Pending,
    Held,
    Released,
    Completed,
    Refunded,
    Failed,
    Cancelled,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Wallet,
    Gcash,
    Cash,
}

impl PaymentMethod {
    pub fn to_str(&self) -> &str {
        match self {
            PaymentMethod::Wallet => "wallet",
            PaymentMethod::Gcash => "gcash",
            PaymentMethod::Cash => "cash",
        }
    }
}

/// Where refunded money goes.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RefundTarget {
    Wallet,
    OriginalPaymentMethod,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AuditEntry {
    pub action: String,
    pub admin: String,
    pub reason: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Transaction {
    pub transaction_id: i64,
    pub job_id: Option<i64>,
    pub job_title: Option<String>,
    pub client_name: Option<String>,
    pub worker_name: Option<String>,
    pub amount: f64,
    pub status: TransactionStatus,
    pub payment_method: PaymentMethod,
    pub downpayment_amount: Option<f64>,
    pub final_payment_amount: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub released_at: Option<DateTime<Utc>>,
    pub refunded_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub audit_trail: Vec<AuditEntry>,
}

impl Transaction {
    /// A positive refund request capped at the original amount, in Pesos.
    pub fn clamp_refund(&self, requested: f64) -> f64 {
        let original = peso_to_centavos(self.amount);
        let requested = if requested.is_finite() {
            peso_to_centavos(requested)
        } else {
            0
        };
        centavos_to_peso(requested.clamp(0, original.max(0)))
    }

    pub fn is_releasable(&self) -> bool {
        matches!(self.status, TransactionStatus::Pending | TransactionStatus::Held)
            && self.released_at.is_none()
            && self.refunded_at.is_none()
    }
}

/// Downpayment/final payment split of a job budget.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct EscrowSplit {
    pub downpayment_centavos: i64,
    pub final_payment_centavos: i64,
}

impl EscrowSplit {
    /// 50% up front, the remainder (including any odd centavo) on completion.
    pub fn fifty_fifty(total_centavos: i64) -> Self {
        let downpayment_centavos = total_centavos / 2;
        Self {
            downpayment_centavos,
            final_payment_centavos: total_centavos - downpayment_centavos,
        }
    }

    pub fn from_budget(budget: f64) -> Self {
        Self::fifty_fifty(peso_to_centavos(budget))
    }

    pub fn total_centavos(&self) -> i64 {
        self.downpayment_centavos + self.final_payment_centavos
    }

    pub fn downpayment(&self) -> f64 {
        centavos_to_peso(self.downpayment_centavos)
    }

    pub fn final_payment(&self) -> f64 {
        centavos_to_peso(self.final_payment_centavos)
    }
}

/// Totals the escrow monitor shows above the listing.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct EscrowStats {
    #[serde(default)]
    pub total_held: f64,
    #[serde(default)]
    pub pending_count: i64,
    #[serde(default)]
    pub released_today: i64,
    #[serde(default)]
    pub refunded_today: i64,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;

    pub(crate) fn transaction(id: i64, amount: f64) -> Transaction {
        Transaction {
            transaction_id: id,
            job_id: Some(900 + id),
            job_title: Some("Fix kitchen sink".to_string()),
            client_name: Some("Maria Santos".to_string()),
            worker_name: Some("Juan Dela Cruz".to_string()),
            amount,
            status: TransactionStatus::Held,
            payment_method: PaymentMethod::Gcash,
            downpayment_amount: Some(amount / 2.0),
            final_payment_amount: Some(amount / 2.0),
            created_at: Utc.with_ymd_and_hms(2025, 2, 14, 8, 30, 0).unwrap(),
            released_at: None,
            refunded_at: None,
            audit_trail: Vec::new(),
        }
    }

    #[test]
    fn refund_is_clamped_to_original_amount() {
        let tx = transaction(1, 1500.0);
        assert_eq!(tx.clamp_refund(2000.0), 1500.0);
        assert_eq!(tx.clamp_refund(499.99), 499.99);
        assert_eq!(tx.clamp_refund(-10.0), 0.0);
        assert_eq!(tx.clamp_refund(f64::NAN), 0.0);
    }

    #[test]
    fn split_sums_to_budget() {
        let split = EscrowSplit::from_budget(1000.0);
        assert_eq!(split.downpayment(), 500.0);
        assert_eq!(split.final_payment(), 500.0);

        let odd = EscrowSplit::fifty_fifty(100_001);
        assert_eq!(odd.downpayment_centavos, 50_000);
        assert_eq!(odd.final_payment_centavos, 50_001);
        assert_eq!(odd.total_centavos(), 100_001);

        let huge = EscrowSplit::fifty_fifty(i64::MAX);
        assert_eq!(huge.total_centavos(), i64::MAX);
        assert_eq!(huge.final_payment_centavos - huge.downpayment_centavos, 1);
    }

    #[test]
    fn released_transactions_are_not_releasable() {
        let mut tx = transaction(2, 800.0);
        assert!(tx.is_releasable());
        tx.status = TransactionStatus::Released;
        tx.released_at = Some(Utc::now());
        assert!(!tx.is_releasable());
    }
}
