// service/registration_service.rs
use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::{
    db::accountdb::AccountExt,
    dtos::accountdtos::{AgencyRegistrationData, RegisterAgencyDto},
    error::ErrorMessage,
    mail::{mails::send_agency_verification_email, sendmail::Mailer},
    models::accountmodel::{Account, NewAgencyAccount},
    service::error::ServiceError,
    utils::{password, token},
};

#[derive(Debug, Clone)]
pub enum RegistrationOutcome {
    Registered(AgencyRegistrationData),
    /// The account exists but the verification email was not delivered.
    EmailFailed(AgencyRegistrationData),
}

impl RegistrationOutcome {
    pub fn data(&self) -> &AgencyRegistrationData {
        match self {
            RegistrationOutcome::Registered(data) | RegistrationOutcome::EmailFailed(data) => data,
        }
    }
}

#[derive(Clone)]
pub struct AgencyRegistrationService {
    accounts: Arc<dyn AccountExt>,
    mailer: Arc<dyn Mailer>,
    app_url: String,
}

impl std::fmt::Debug for AgencyRegistrationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgencyRegistrationService")
            .field("app_url", &self.app_url)
            .finish()
    }
}

impl AgencyRegistrationService {
    pub fn new(accounts: Arc<dyn AccountExt>, mailer: Arc<dyn Mailer>, app_url: impl Into<String>) -> Self {
        Self {
            accounts,
            mailer,
            app_url: app_url.into(),
        }
    }

    pub async fn register(&self, body: RegisterAgencyDto) -> Result<RegistrationOutcome, ServiceError> {
        let body = body.normalized();
        body.validate()
            .map_err(|e| ServiceError::Validation(e.to_string()))?;

        if !body.passwords_match() {
            return Err(ServiceError::Validation(
                ErrorMessage::PasswordMismatch.to_string(),
            ));
        }

        let RegisterAgencyDto {
            email,
            business_name,
            contact_number,
            password,
            ..
        } = body;

        if self.accounts.get_account_by_email(&email).await?.is_some() {
            tracing::info!("Agency registration rejected: {} already registered", email);
            return Err(ServiceError::DuplicateAccount(email));
        }

        let password_hash = password::hash(password)?;
        let verify_token = token::generate_verification_token();
        let verify_token_expiry = token::verification_expiry(Utc::now());

        let (account, agency) = self
            .accounts
            .save_agency_account(NewAgencyAccount {
                email,
                password_hash,
                business_name,
                contact_number,
                verify_token: verify_token.clone(),
                verify_token_expiry,
            })
            .await
            .map_err(|e| {
                tracing::error!("Failed to save agency account: {}", e);
                ServiceError::from(e)
            })?;

        tracing::info!(
            "Agency {} registered with account {}",
            agency.business_name,
            account.account_id
        );

        let verification_link = token::verification_link(&self.app_url, &verify_token);
        let sent = send_agency_verification_email(
            self.mailer.as_ref(),
            &account.email,
            &agency.business_name,
            &verification_link,
        )
        .await;

        let data = AgencyRegistrationData {
            account_id: account.account_id,
            email: account.email,
            business_name: agency.business_name,
            verification_email_sent: sent.is_ok(),
        };

        match sent {
            Ok(()) => Ok(RegistrationOutcome::Registered(data)),
            Err(e) => {
                tracing::warn!(
                    "Verification email to {} failed, account kept: {}",
                    data.email,
                    e
                );
                Ok(RegistrationOutcome::EmailFailed(data))
            }
        }
    }

    pub async fn verify_email(&self, verify_token: &str) -> Result<Account, ServiceError> {
        let verify_token = verify_token.trim();
        if verify_token.is_empty() {
            return Err(ServiceError::InvalidToken);
        }

        let account = self
            .accounts
            .get_account_by_verify_token(verify_token)
            .await?
            .ok_or(ServiceError::InvalidToken)?;

        if let Some(expires_at) = account.verify_token_expiry {
            if expires_at < Utc::now() {
                return Err(ServiceError::TokenExpired);
            }
        }

        let account = self.accounts.mark_account_verified(account.account_id).await?;
        tracing::info!("Account {} verified", account.account_id);

        Ok(account)
    }
}
