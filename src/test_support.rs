//! In-memory doubles for the account store and the mailer.
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::{
    config::Config,
    db::accountdb::AccountExt,
    mail::sendmail::{MailError, Mailer},
    models::accountmodel::{Account, Agency, NewAgencyAccount},
};

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/iayos_test".to_string(),
        app_url: "https://iayos.online".to_string(),
        port: 8000,
        backend_api_url: "http://localhost:8000".to_string(),
        backend_api_token: None,
        http_timeout: std::time::Duration::from_secs(5),
        escrow_poll_interval: std::time::Duration::from_secs(60),
        smtp_host: "localhost".to_string(),
        smtp_port: 587,
        smtp_username: String::new(),
        smtp_password: String::new(),
        from_email: "iAyos <noreply@iayos.online>".to_string(),
    }
}

#[derive(Default)]
pub struct InMemoryAccounts {
    rows: Mutex<Vec<(Account, Agency)>>,
    failure: Option<fn() -> sqlx::Error>,
}

impl InMemoryAccounts {
    pub fn failing_with(failure: fn() -> sqlx::Error) -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            failure: Some(failure),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn account(&self, email: &str) -> Option<Account> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|(account, _)| account.email == email)
            .map(|(account, _)| account.clone())
    }

    pub fn expire_tokens(&self) {
        for (account, _) in self.rows.lock().unwrap().iter_mut() {
            account.verify_token_expiry = Some(Utc::now() - Duration::hours(1));
        }
    }

    fn check(&self) -> Result<(), sqlx::Error> {
        match self.failure {
            Some(failure) => Err(failure()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl AccountExt for InMemoryAccounts {
    async fn get_account_by_email(&self, email: &str) -> Result<Option<Account>, sqlx::Error> {
        self.check()?;
        Ok(self.account(email))
    }

    async fn get_account_by_verify_token(&self, token: &str) -> Result<Option<Account>, sqlx::Error> {
        self.check()?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|(account, _)| account.verify_token.as_deref() == Some(token))
            .map(|(account, _)| account.clone()))
    }

    async fn save_agency_account(
        &self,
        new_account: NewAgencyAccount,
    ) -> Result<(Account, Agency), sqlx::Error> {
        self.check()?;
        let now = Utc::now();
        let account = Account {
            account_id: Uuid::new_v4(),
            email: new_account.email,
            password: new_account.password_hash,
            is_verified: false,
            verify_token: Some(new_account.verify_token),
            verify_token_expiry: Some(new_account.verify_token_expiry),
            created_at: now,
        };
        let agency = Agency {
            agency_id: Uuid::new_v4(),
            account_id: account.account_id,
            business_name: new_account.business_name,
            contact_number: new_account.contact_number,
            created_at: now,
        };

        self.rows
            .lock()
            .unwrap()
            .push((account.clone(), agency.clone()));
        Ok((account, agency))
    }

    async fn mark_account_verified(&self, account_id: Uuid) -> Result<Account, sqlx::Error> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        let (account, _) = rows
            .iter_mut()
            .find(|(account, _)| account.account_id == account_id)
            .ok_or(sqlx::Error::RowNotFound)?;

        account.is_verified = true;
        account.verify_token = None;
        account.verify_token_expiry = None;
        Ok(account.clone())
    }
}

#[derive(Debug, Clone)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<SentEmail>>,
    fail: AtomicBool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: AtomicBool::new(true),
        }
    }

    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_html(&self, to_email: &str, subject: &str, html_body: &str) -> Result<(), MailError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(MailError::Transport("connection refused".to_string()));
        }

        self.sent.lock().unwrap().push(SentEmail {
            to: to_email.to_string(),
            subject: subject.to_string(),
            html: html_body.to_string(),
        });
        Ok(())
    }
}
