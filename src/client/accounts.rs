// client/accounts.rs
use super::{api_client::ApiClient, error::ClientError};
use crate::dtos::accountdtos::{KycAutofillResponse, KycConfirmDto, KycConfirmResponse};

impl ApiClient {
    pub async fn get_kyc_autofill(&self) -> Result<KycAutofillResponse, ClientError> {
        self.get_json("/api/accounts/kyc/autofill").await
    }

    pub async fn confirm_kyc(&self, body: &KycConfirmDto) -> Result<KycConfirmResponse, ClientError> {
        self.post_json("/api/accounts/kyc/confirm", body).await
    }
}
