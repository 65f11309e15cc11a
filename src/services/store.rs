//! Account storage behind a trait seam.
//!
//! `PostgresAccountStore` is the production implementation; the single-use
//! guarantee for recovery tokens rides on one conditional `UPDATE` statement.
//! `InMemoryAccountStore` implements the same contract for tests and local
//! development without Postgres.

use crate::error::AppError;
use crate::models::Account;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPool;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_id(&self, account_id: Uuid) -> Result<Option<Account>, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AppError>;

    async fn insert(&self, account: &Account) -> Result<(), AppError>;

    /// Store a new recovery-token digest and deadline, replacing any prior
    /// token for the account.
    async fn set_reset_token(
        &self,
        account_id: Uuid,
        token_hash: &str,
        expiry: DateTime<Utc>,
    ) -> Result<(), AppError>;

    /// Read-only lookup by token digest; the not-expired check is part of the
    /// query so expired and unknown tokens are indistinguishable.
    async fn find_by_reset_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Account>, AppError>;

    /// Atomic verify-and-clear: set the new credential and clear both token
    /// fields in one conditional update. Returns the account id only for the
    /// call that actually consumed the token; concurrent callers presenting
    /// the same token observe `None`.
    async fn consume_reset_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
        new_password_hash: &str,
    ) -> Result<Option<Uuid>, AppError>;

    async fn health_check(&self) -> Result<(), AppError>;
}

/// Postgres-backed account store.
#[derive(Clone)]
pub struct PostgresAccountStore {
    pool: PgPool,
}

impl PostgresAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl AccountStore for PostgresAccountStore {
    async fn find_by_id(&self, account_id: Uuid) -> Result<Option<Account>, AppError> {
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE account_id = $1")
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AppError> {
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    async fn insert(&self, account: &Account) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO accounts (account_id, email, name, password_hash, reset_token_hash, reset_token_expiry, created_utc)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(account.account_id)
        .bind(&account.email)
        .bind(&account.name)
        .bind(&account.password_hash)
        .bind(&account.reset_token_hash)
        .bind(account.reset_token_expiry)
        .bind(account.created_utc)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict(anyhow::anyhow!("Email already registered"))
            }
            _ => AppError::DatabaseError(anyhow::anyhow!(e)),
        })?;
        Ok(())
    }

    async fn set_reset_token(
        &self,
        account_id: Uuid,
        token_hash: &str,
        expiry: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE accounts SET reset_token_hash = $2, reset_token_expiry = $3 WHERE account_id = $1",
        )
        .bind(account_id)
        .bind(token_hash)
        .bind(expiry)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(anyhow::anyhow!("Account not found")));
        }
        Ok(())
    }

    async fn find_by_reset_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Account>, AppError> {
        sqlx::query_as::<_, Account>(
            "SELECT * FROM accounts WHERE reset_token_hash = $1 AND reset_token_expiry > $2",
        )
        .bind(token_hash)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    async fn consume_reset_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
        new_password_hash: &str,
    ) -> Result<Option<Uuid>, AppError> {
        // Credential update and token invalidation are a single statement, so
        // a crash can only observe fully-before or fully-after.
        sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE accounts
            SET password_hash = $3, reset_token_hash = NULL, reset_token_expiry = NULL
            WHERE reset_token_hash = $1 AND reset_token_expiry > $2
            RETURNING account_id
            "#,
        )
        .bind(token_hash)
        .bind(now)
        .bind(new_password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Database health check failed: {}", e);
                AppError::DatabaseError(anyhow::anyhow!("Database health check failed: {}", e))
            })?;
        Ok(())
    }
}

/// In-memory account store for tests and Postgres-less local runs.
#[derive(Default)]
pub struct InMemoryAccountStore {
    accounts: Mutex<HashMap<Uuid, Account>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, Account>> {
        self.accounts.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn find_by_id(&self, account_id: Uuid) -> Result<Option<Account>, AppError> {
        Ok(self.lock().get(&account_id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AppError> {
        Ok(self
            .lock()
            .values()
            .find(|a| a.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn insert(&self, account: &Account) -> Result<(), AppError> {
        let mut accounts = self.lock();
        if accounts
            .values()
            .any(|a| a.email.eq_ignore_ascii_case(&account.email))
        {
            return Err(AppError::Conflict(anyhow::anyhow!(
                "Email already registered"
            )));
        }
        accounts.insert(account.account_id, account.clone());
        Ok(())
    }

    async fn set_reset_token(
        &self,
        account_id: Uuid,
        token_hash: &str,
        expiry: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let mut accounts = self.lock();
        let account = accounts
            .get_mut(&account_id)
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Account not found")))?;
        account.reset_token_hash = Some(token_hash.to_string());
        account.reset_token_expiry = Some(expiry);
        Ok(())
    }

    async fn find_by_reset_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Account>, AppError> {
        Ok(self
            .lock()
            .values()
            .find(|a| {
                a.reset_token_hash.as_deref() == Some(token_hash) && a.has_live_reset_token(now)
            })
            .cloned())
    }

    async fn consume_reset_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
        new_password_hash: &str,
    ) -> Result<Option<Uuid>, AppError> {
        // The whole transition happens under one lock guard, mirroring the
        // single-statement semantics of the Postgres implementation.
        let mut accounts = self.lock();
        let account = accounts.values_mut().find(|a| {
            a.reset_token_hash.as_deref() == Some(token_hash) && a.has_live_reset_token(now)
        });
        match account {
            Some(account) => {
                account.password_hash = new_password_hash.to_string();
                account.reset_token_hash = None;
                account.reset_token_expiry = None;
                Ok(Some(account.account_id))
            }
            None => Ok(None),
        }
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn seeded_store() -> (InMemoryAccountStore, Account) {
        let store = InMemoryAccountStore::new();
        let account = Account::new(
            "user@example.com".to_string(),
            "old-hash".to_string(),
            None,
        );
        (store, account)
    }

    #[tokio::test]
    async fn consume_reset_token_is_single_use() {
        let (store, account) = seeded_store();
        store.insert(&account).await.unwrap();

        let now = Utc::now();
        store
            .set_reset_token(account.account_id, "digest", now + Duration::minutes(15))
            .await
            .unwrap();

        let first = store
            .consume_reset_token("digest", now, "new-hash")
            .await
            .unwrap();
        assert_eq!(first, Some(account.account_id));

        let second = store
            .consume_reset_token("digest", now, "other-hash")
            .await
            .unwrap();
        assert_eq!(second, None);

        let stored = store.find_by_id(account.account_id).await.unwrap().unwrap();
        assert_eq!(stored.password_hash, "new-hash");
        assert!(stored.reset_token_hash.is_none());
        assert!(stored.reset_token_expiry.is_none());
    }

    #[tokio::test]
    async fn expired_token_is_not_consumable() {
        let (store, account) = seeded_store();
        store.insert(&account).await.unwrap();

        let now = Utc::now();
        store
            .set_reset_token(account.account_id, "digest", now - Duration::seconds(1))
            .await
            .unwrap();

        let result = store
            .consume_reset_token("digest", now, "new-hash")
            .await
            .unwrap();
        assert_eq!(result, None);

        let stored = store.find_by_id(account.account_id).await.unwrap().unwrap();
        assert_eq!(stored.password_hash, "old-hash");
    }

    #[tokio::test]
    async fn set_reset_token_replaces_previous() {
        let (store, account) = seeded_store();
        store.insert(&account).await.unwrap();

        let now = Utc::now();
        let expiry = now + Duration::minutes(15);
        store
            .set_reset_token(account.account_id, "first", expiry)
            .await
            .unwrap();
        store
            .set_reset_token(account.account_id, "second", expiry)
            .await
            .unwrap();

        assert!(store
            .find_by_reset_token("first", now)
            .await
            .unwrap()
            .is_none());
        assert!(store
            .find_by_reset_token("second", now)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let (store, account) = seeded_store();
        store.insert(&account).await.unwrap();

        let duplicate = Account::new("USER@example.com".to_string(), "hash".to_string(), None);
        assert!(store.insert(&duplicate).await.is_err());
    }
}
