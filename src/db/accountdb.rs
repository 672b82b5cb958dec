// db/accountdb.rs
use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::accountmodel::{Account, Agency, NewAgencyAccount};

#[async_trait]
pub trait AccountExt: Send + Sync {
    async fn get_account_by_email(&self, email: &str) -> Result<Option<Account>, sqlx::Error>;

    async fn get_account_by_verify_token(&self, token: &str) -> Result<Option<Account>, sqlx::Error>;

    /// Inserts the account and its agency profile together.
    async fn save_agency_account(
        &self,
        new_account: NewAgencyAccount,
    ) -> Result<(Account, Agency), sqlx::Error>;

    async fn mark_account_verified(&self, account_id: Uuid) -> Result<Account, sqlx::Error>;
}

#[async_trait]
impl AccountExt for DBClient {
    async fn get_account_by_email(&self, email: &str) -> Result<Option<Account>, sqlx::Error> {
        sqlx::query_as::<_, Account>(
            r#"
            SELECT account_id, email, password, is_verified,
                   verify_token, verify_token_expiry, created_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_account_by_verify_token(&self, token: &str) -> Result<Option<Account>, sqlx::Error> {
        sqlx::query_as::<_, Account>(
            r#"
            SELECT account_id, email, password, is_verified,
                   verify_token, verify_token_expiry, created_at
            FROM accounts
            WHERE verify_token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
    }

    async fn save_agency_account(
        &self,
        new_account: NewAgencyAccount,
    ) -> Result<(Account, Agency), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let account = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (email, password, verify_token, verify_token_expiry)
            VALUES ($1, $2, $3, $4)
            RETURNING account_id, email, password, is_verified,
                      verify_token, verify_token_expiry, created_at
            "#,
        )
        .bind(&new_account.email)
        .bind(&new_account.password_hash)
        .bind(&new_account.verify_token)
        .bind(new_account.verify_token_expiry)
        .fetch_one(&mut *tx)
        .await?;

        let agency = sqlx::query_as::<_, Agency>(
            r#"
            INSERT INTO agencies (account_id, business_name, contact_number)
            VALUES ($1, $2, $3)
            RETURNING agency_id, account_id, business_name, contact_number, created_at
            "#,
        )
        .bind(account.account_id)
        .bind(&new_account.business_name)
        .bind(&new_account.contact_number)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((account, agency))
    }

    async fn mark_account_verified(&self, account_id: Uuid) -> Result<Account, sqlx::Error> {
        sqlx::query_as::<_, Account>(
            r#"
            UPDATE accounts
            SET is_verified = TRUE,
                verify_token = NULL,
                verify_token_expiry = NULL
            WHERE account_id = $1
            RETURNING account_id, email, password, is_verified,
                      verify_token, verify_token_expiry, created_at
            "#,
        )
        .bind(account_id)
        .fetch_one(&self.pool)
        .await
    }
}
