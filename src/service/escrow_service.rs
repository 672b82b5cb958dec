// service/escrow_service.rs
use std::sync::Arc;

use tokio::{
    sync::{watch, Notify},
    task::JoinHandle,
    time::{interval, Duration, MissedTickBehavior},
};
use validator::Validate;

use crate::{
    client::ApiClient,
    dtos::transactiondtos::{
        BulkReleaseDto, BulkReleaseResponse, EscrowListResponse, EscrowQuery, RefundDto,
        ReleaseEscrowDto,
    },
    models::transactionmodel::{RefundTarget, Transaction, TransactionStatus},
    service::error::ServiceError,
    utils::currency::{format_centavos_as_peso, peso_to_centavos},
};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// An admin command against the escrow ledger.
#[derive(Debug, Clone, PartialEq)]
pub enum EscrowCommand {
    Release {
        transaction_id: i64,
        body: ReleaseEscrowDto,
    },
    Refund {
        transaction_id: i64,
        body: RefundDto,
    },
    BulkRelease {
        body: BulkReleaseDto,
    },
}

/// A validated command waiting for the admin to confirm it.
#[derive(Debug)]
#[must_use = "an escrow action does nothing until it is confirmed and executed"]
pub struct PendingEscrowAction {
    command: EscrowCommand,
    prompt: String,
}

impl PendingEscrowAction {
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn command(&self) -> &EscrowCommand {
        &self.command
    }

    pub fn confirm(self) -> ConfirmedEscrowAction {
        ConfirmedEscrowAction {
            command: self.command,
        }
    }
}

/// Only obtainable through [`PendingEscrowAction::confirm`].
#[derive(Debug)]
pub struct ConfirmedEscrowAction {
    command: EscrowCommand,
}

impl ConfirmedEscrowAction {
    pub fn command(&self) -> &EscrowCommand {
        &self.command
    }
}

/// The command went through. A `None` transaction or listing means the
/// follow-up refetch failed and the caller should reload before acting again.
#[derive(Debug, Clone, PartialEq)]
pub enum EscrowActionOutcome {
    Released {
        transaction: Option<Transaction>,
        message: Option<String>,
    },
    Refunded {
        transaction: Option<Transaction>,
        amount: f64,
        message: Option<String>,
    },
    BulkReleased {
        result: BulkReleaseResponse,
        listing: Option<EscrowListResponse>,
    },
}

impl EscrowActionOutcome {
    pub fn is_stale(&self) -> bool {
        match self {
            EscrowActionOutcome::Released { transaction, .. }
            | EscrowActionOutcome::Refunded { transaction, .. } => transaction.is_none(),
            EscrowActionOutcome::BulkReleased { listing, .. } => listing.is_none(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EscrowService {
    client: Arc<ApiClient>,
    listing_query: EscrowQuery,
}

impl EscrowService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            listing_query: EscrowQuery::default(),
        }
    }

    /// Filter used when the listing is refetched after a bulk release.
    pub fn with_query(mut self, query: EscrowQuery) -> Self {
        self.listing_query = query;
        self
    }

    pub async fn list(&self, query: &EscrowQuery) -> Result<EscrowListResponse, ServiceError> {
        Ok(self.client.list_escrow(query).await?)
    }

    pub async fn detail(&self, transaction_id: i64) -> Result<Transaction, ServiceError> {
        Ok(self.client.get_transaction(transaction_id).await?)
    }

    pub fn prepare_release(
        &self,
        transaction: &Transaction,
        reason: &str,
    ) -> Result<PendingEscrowAction, ServiceError> {
        if !transaction.is_releasable() {
            return Err(ServiceError::NotReleasable(transaction.transaction_id));
        }

        let body = ReleaseEscrowDto {
            reason: reason.trim().to_string(),
        };
        body.validate()
            .map_err(|e| ServiceError::Validation(e.to_string()))?;

        let prompt = format!(
            "Release {} held for {} to {}?",
            peso(transaction.amount),
            describe(transaction),
            transaction.worker_name.as_deref().unwrap_or("the worker"),
        );

        Ok(PendingEscrowAction {
            command: EscrowCommand::Release {
                transaction_id: transaction.transaction_id,
                body,
            },
            prompt,
        })
    }

    /// Amounts above the original payment are clamped down to it.
    pub fn prepare_refund(
        &self,
        transaction: &Transaction,
        requested_amount: f64,
        reason: &str,
        refund_to: RefundTarget,
    ) -> Result<PendingEscrowAction, ServiceError> {
        if transaction.status == TransactionStatus::Refunded || transaction.refunded_at.is_some() {
            return Err(ServiceError::Validation(format!(
                "Transaction {} has already been refunded",
                transaction.transaction_id
            )));
        }

        let amount = transaction.clamp_refund(requested_amount);
        if amount <= 0.0 {
            return Err(ServiceError::InvalidRefundAmount);
        }
        if amount < requested_amount {
            tracing::info!(
                "Refund for transaction {} clamped from {} to {}",
                transaction.transaction_id,
                requested_amount,
                amount
            );
        }

        let body = RefundDto {
            amount,
            reason: reason.trim().to_string(),
            refund_to,
        };
        body.validate()
            .map_err(|e| ServiceError::Validation(e.to_string()))?;

        let destination = match refund_to {
            RefundTarget::Wallet => "the client's wallet".to_string(),
            RefundTarget::OriginalPaymentMethod => {
                format!("the original {} payment", transaction.payment_method.to_str())
            }
        };

        let prompt = format!(
            "Refund {} of {} for {} to {}?",
            peso(amount),
            peso(transaction.amount),
            describe(transaction),
            destination,
        );

        Ok(PendingEscrowAction {
            command: EscrowCommand::Refund {
                transaction_id: transaction.transaction_id,
                body,
            },
            prompt,
        })
    }

    pub fn prepare_bulk_release(
        &self,
        escrow_ids: &[i64],
        reason: &str,
    ) -> Result<PendingEscrowAction, ServiceError> {
        let mut ids: Vec<i64> = Vec::with_capacity(escrow_ids.len());
        for id in escrow_ids {
            if !ids.contains(id) {
                ids.push(*id);
            }
        }

        let body = BulkReleaseDto {
            escrow_ids: ids,
            reason: reason.trim().to_string(),
        };
        body.validate()
            .map_err(|e| ServiceError::Validation(e.to_string()))?;

        let prompt = format!(
            "Release {} escrow payment{}?",
            body.escrow_ids.len(),
            if body.escrow_ids.len() == 1 { "" } else { "s" }
        );

        Ok(PendingEscrowAction {
            command: EscrowCommand::BulkRelease { body },
            prompt,
        })
    }

    pub async fn execute(
        &self,
        action: ConfirmedEscrowAction,
    ) -> Result<EscrowActionOutcome, ServiceError> {
        match action.command {
            EscrowCommand::Release {
                transaction_id,
                body,
            } => {
                tracing::info!("Releasing escrow for transaction {}", transaction_id);
                let response = self
                    .client
                    .release_escrow(transaction_id, &body)
                    .await
                    .map_err(|e| {
                        tracing::error!("Escrow release failed for {}: {}", transaction_id, e);
                        e
                    })?;

                let transaction = self.refetch_detail(transaction_id).await;
                Ok(EscrowActionOutcome::Released {
                    transaction,
                    message: response.message,
                })
            }
            EscrowCommand::Refund {
                transaction_id,
                body,
            } => {
                tracing::info!(
                    "Refunding {} for transaction {}",
                    body.amount,
                    transaction_id
                );
                let response = self
                    .client
                    .refund_transaction(transaction_id, &body)
                    .await
                    .map_err(|e| {
                        tracing::error!("Refund failed for {}: {}", transaction_id, e);
                        e
                    })?;

                let transaction = self.refetch_detail(transaction_id).await;
                Ok(EscrowActionOutcome::Refunded {
                    transaction,
                    amount: body.amount,
                    message: response.message,
                })
            }
            EscrowCommand::BulkRelease { body } => {
                tracing::info!("Bulk releasing {} escrows", body.escrow_ids.len());
                let result = self.client.bulk_release_escrow(&body).await.map_err(|e| {
                    tracing::error!("Bulk release failed: {}", e);
                    e
                })?;

                if !result.failed_ids.is_empty() {
                    tracing::warn!("Bulk release left {:?} unreleased", result.failed_ids);
                }

                let listing = match self.list(&self.listing_query).await {
                    Ok(listing) => Some(listing),
                    Err(e) => {
                        tracing::warn!("Bulk release succeeded but listing refetch failed: {}", e);
                        None
                    }
                };
                Ok(EscrowActionOutcome::BulkReleased { result, listing })
            }
        }
    }

    async fn refetch_detail(&self, transaction_id: i64) -> Option<Transaction> {
        match self.detail(transaction_id).await {
            Ok(transaction) => Some(transaction),
            Err(e) => {
                tracing::warn!(
                    "Action on transaction {} succeeded but detail refetch failed: {}",
                    transaction_id,
                    e
                );
                None
            }
        }
    }
}

fn peso(amount: f64) -> String {
    format_centavos_as_peso(peso_to_centavos(amount))
}

fn describe(transaction: &Transaction) -> String {
    match &transaction.job_title {
        Some(title) => format!("\"{}\" (transaction #{})", title, transaction.transaction_id),
        None => format!("transaction #{}", transaction.transaction_id),
    }
}

/// Keeps the escrow listing fresh in the background.
///
/// The first refresh runs immediately, then once per period. Dropping the
/// monitor stops the task.
#[derive(Debug)]
pub struct EscrowMonitor {
    snapshot: watch::Receiver<Option<EscrowListResponse>>,
    refresh: Arc<Notify>,
    task: JoinHandle<()>,
}

impl EscrowMonitor {
    pub fn spawn(client: Arc<ApiClient>, query: EscrowQuery, period: Duration) -> Self {
        let period = if period.is_zero() {
            DEFAULT_POLL_INTERVAL
        } else {
            period
        };

        let (tx, rx) = watch::channel(None);
        let refresh = Arc::new(Notify::new());
        let task = tokio::spawn(run_monitor(client, query, period, tx, refresh.clone()));

        Self {
            snapshot: rx,
            refresh,
            task,
        }
    }

    pub fn latest(&self) -> Option<EscrowListResponse> {
        self.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<EscrowListResponse>> {
        self.snapshot.clone()
    }

    pub fn refresh_now(&self) {
        self.refresh.notify_one();
    }
}

impl Drop for EscrowMonitor {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run_monitor(
    client: Arc<ApiClient>,
    query: EscrowQuery,
    period: Duration,
    tx: watch::Sender<Option<EscrowListResponse>>,
    refresh: Arc<Notify>,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = refresh.notified() => ticker.reset(),
        }

        tracing::debug!("Refreshing escrow listing");

        match client.list_escrow(&query).await {
            Ok(listing) => {
                tracing::debug!(
                    "Escrow listing refreshed: {} transactions, {} pending",
                    listing.transactions.len(),
                    listing.stats.pending_count
                );
                if tx.send(Some(listing)).is_err() {
                    break;
                }
            }
            Err(e) => tracing::error!("Escrow monitor refresh failed: {}", e),
        }
    }
}
