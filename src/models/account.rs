//! Account model - platform user accounts.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Account entity.
///
/// The account row owns the credential and the optional recovery-token field
/// group. Only the token digest and its expiry are ever stored; the raw token
/// value exists transiently at issue time and is never persisted or logged.
/// No serde derives on purpose: `password_hash` and `reset_token_hash` must
/// never leave the service in a response body.
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub account_id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub password_hash: String,
    pub reset_token_hash: Option<String>,
    pub reset_token_expiry: Option<DateTime<Utc>>,
    pub created_utc: DateTime<Utc>,
}

impl Account {
    /// Create a new account with no live recovery token.
    pub fn new(email: String, password_hash: String, name: Option<String>) -> Self {
        Self {
            account_id: Uuid::new_v4(),
            email,
            name,
            password_hash,
            reset_token_hash: None,
            reset_token_expiry: None,
            created_utc: Utc::now(),
        }
    }

    /// A recovery token is live iff both fields are set and the deadline is ahead.
    pub fn has_live_reset_token(&self, now: DateTime<Utc>) -> bool {
        matches!(
            (&self.reset_token_hash, self.reset_token_expiry),
            (Some(_), Some(expiry)) if expiry > now
        )
    }
}
