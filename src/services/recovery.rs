//! Password-recovery orchestration.

use crate::services::{
    AccountStore, MailRelay, OutboundEmail, RecoveryTokenService, ServiceError,
};
use crate::templates;
use crate::utils::{hash_password, Password};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct RecoveryService {
    store: Arc<dyn AccountStore>,
    tokens: RecoveryTokenService,
    relay: Arc<dyn MailRelay>,
}

impl RecoveryService {
    pub fn new(
        store: Arc<dyn AccountStore>,
        tokens: RecoveryTokenService,
        relay: Arc<dyn MailRelay>,
    ) -> Self {
        Self {
            store,
            tokens,
            relay,
        }
    }

    /// Issue a recovery token for the account registered under `email` and
    /// relay the reset link.
    ///
    /// Reports success even when no such account exists, so the endpoint
    /// cannot be used to enumerate registered addresses.
    pub async fn request_reset(&self, email: &str, base_url: &str) -> Result<(), ServiceError> {
        let Some(account) = self.store.find_by_email(email).await? else {
            tracing::debug!("Password reset requested for unknown email");
            return Ok(());
        };

        let raw_token = self.tokens.issue(account.account_id).await?;
        let reset_link = format!("{}/reset-password?token={}", base_url, raw_token);
        let (html_body, text_body) =
            templates::password_reset_email(&reset_link, self.tokens.ttl_minutes());

        self.relay
            .send(&OutboundEmail {
                to: account.email.clone(),
                subject: "Reset Your Password".to_string(),
                html_body,
                text_body: Some(text_body),
            })
            .await?;

        tracing::info!(account_id = %account.account_id, "Password reset email sent");
        Ok(())
    }

    /// Verify the token and replace the credential as one logical operation.
    ///
    /// The new password is hashed with a fresh random salt, then the store's
    /// conditional consume updates the credential and clears the token in a
    /// single atomic step. Of two concurrent calls presenting the same valid
    /// token, exactly one succeeds; the other sees `InvalidToken`, the same
    /// error an expired or unknown token produces.
    pub async fn reset_password(
        &self,
        raw_token: &str,
        new_password: &str,
    ) -> Result<Uuid, ServiceError> {
        let token_hash = RecoveryTokenService::digest(raw_token);
        let password_hash = hash_password(&Password::new(new_password.to_string()))?;

        let account_id = self
            .store
            .consume_reset_token(&token_hash, Utc::now(), password_hash.as_str())
            .await?
            .ok_or(ServiceError::InvalidToken)?;

        tracing::info!(account_id = %account_id, "Password reset successful");
        Ok(account_id)
    }
}
