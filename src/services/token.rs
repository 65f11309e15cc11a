//! Recovery-token issuance and verification.
//!
//! Tokens carry 256 bits of entropy and are stored only as a sha-256 digest
//! next to their expiry deadline. The digest is deliberately a fast hash:
//! the token itself is high-entropy and single-use, unlike a password.

use crate::services::{AccountStore, ServiceError};
use chrono::{Duration, Utc};
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct RecoveryTokenService {
    store: Arc<dyn AccountStore>,
    ttl: Duration,
}

impl RecoveryTokenService {
    pub fn new(store: Arc<dyn AccountStore>, ttl_minutes: i64) -> Self {
        Self {
            store,
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    pub fn ttl_minutes(&self) -> i64 {
        self.ttl.num_minutes()
    }

    /// Deterministic one-way digest used as the storage and lookup key.
    pub fn digest(raw_token: &str) -> String {
        hex::encode(Sha256::digest(raw_token.as_bytes()))
    }

    /// Issue a new recovery token for the account, replacing any prior one.
    ///
    /// Returns the raw token exactly once; only its digest is persisted.
    pub async fn issue(&self, account_id: Uuid) -> Result<String, ServiceError> {
        let raw_token = generate_raw_token();
        let expiry = Utc::now() + self.ttl;

        self.store
            .set_reset_token(account_id, &Self::digest(&raw_token), expiry)
            .await?;

        tracing::info!(account_id = %account_id, "Recovery token issued");
        Ok(raw_token)
    }

    /// Resolve a raw token to its owning account.
    ///
    /// Unknown and expired tokens fail identically with `InvalidToken`.
    pub async fn verify(&self, raw_token: &str) -> Result<Uuid, ServiceError> {
        let account = self
            .store
            .find_by_reset_token(&Self::digest(raw_token), Utc::now())
            .await?;

        account
            .map(|a| a.account_id)
            .ok_or(ServiceError::InvalidToken)
    }
}

/// 32 random bytes from the OS CSPRNG, hex encoded.
fn generate_raw_token() -> String {
    let mut token_bytes = [0u8; 32];
    OsRng.fill_bytes(&mut token_bytes);
    hex::encode(token_bytes)
}
