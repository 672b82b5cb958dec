// client/transactions.rs
use super::{api_client::ApiClient, error::ClientError};
use crate::{
    dtos::{
        responsedtos::CommandResponse,
        transactiondtos::{
            BulkReleaseDto, BulkReleaseResponse, EscrowListResponse, EscrowQuery, RefundDto,
            ReleaseEscrowDto, TransactionDetailResponse,
        },
    },
    models::transactionmodel::Transaction,
};

const TRANSACTIONS: &str = "/api/adminpanel/transactions";

impl ApiClient {
    pub async fn list_escrow(&self, query: &EscrowQuery) -> Result<EscrowListResponse, ClientError> {
        self.get_json_with_query(&format!("{}/escrow", TRANSACTIONS), query)
            .await
    }

    pub async fn get_transaction(&self, transaction_id: i64) -> Result<Transaction, ClientError> {
        let response: TransactionDetailResponse = self
            .get_json(&format!("{}/{}/detail", TRANSACTIONS, transaction_id))
            .await?;
        Ok(response.transaction)
    }

    pub async fn release_escrow(
        &self,
        transaction_id: i64,
        body: &ReleaseEscrowDto,
    ) -> Result<CommandResponse, ClientError> {
        self.post_json(
            &format!("{}/{}/release-escrow", TRANSACTIONS, transaction_id),
            body,
        )
        .await
    }

    pub async fn refund_transaction(
        &self,
        transaction_id: i64,
        body: &RefundDto,
    ) -> Result<CommandResponse, ClientError> {
        self.post_json(&format!("{}/{}/refund", TRANSACTIONS, transaction_id), body)
            .await
    }

    pub async fn bulk_release_escrow(
        &self,
        body: &BulkReleaseDto,
    ) -> Result<BulkReleaseResponse, ClientError> {
        self.post_json(&format!("{}/escrow/bulk-release", TRANSACTIONS), body)
            .await
    }
}
