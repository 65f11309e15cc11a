//! Mail-relay seam.
//!
//! The relay is an explicitly constructed dependency handed to whoever needs
//! to send mail; there is no module-global transport. `SmtpRelay` is the
//! production implementation, `MockMailRelay` the test double.

use crate::config::SmtpConfig;
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("Send error: {0}")]
    SendFailed(String),

    #[error("Connection error: {0}")]
    Connection(String),
}

/// A composed message ready for relay submission.
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
    pub text_body: Option<String>,
}

/// Provider acknowledgement for a submitted message.
#[derive(Debug, Clone)]
pub struct RelayReceipt {
    /// Provider-assigned id; SMTP servers may not include one.
    pub message_id: Option<String>,
}

#[async_trait]
pub trait MailRelay: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<RelayReceipt, RelayError>;
    async fn health_check(&self) -> Result<(), RelayError>;
}

/// SMTP relay over lettre's async transport.
pub struct SmtpRelay {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl SmtpRelay {
    pub fn new(config: &SmtpConfig) -> Result<Self, RelayError> {
        let creds = Credentials::new(config.user.clone(), config.password.clone());

        // Implicit TLS wraps the connection from byte one (SMTPS); otherwise
        // the session is upgraded with STARTTLS.
        let builder = if config.implicit_tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
        }
        .map_err(|e| RelayError::Configuration(format!("Failed to create SMTP relay: {}", e)))?;

        let transport = builder.port(config.port).credentials(creds).build();

        let sender: Mailbox = format!("{} <{}>", config.from_name, config.from_email)
            .parse()
            .map_err(|e| RelayError::Configuration(format!("Invalid sender address: {}", e)))?;

        Ok(Self { transport, sender })
    }
}

#[async_trait]
impl MailRelay for SmtpRelay {
    async fn send(&self, email: &OutboundEmail) -> Result<RelayReceipt, RelayError> {
        let to: Mailbox = email
            .to
            .parse()
            .map_err(|e| RelayError::InvalidRecipient(format!("Invalid recipient: {}", e)))?;

        let builder = Message::builder()
            .from(self.sender.clone())
            .to(to)
            .subject(&email.subject);

        let message = match &email.text_body {
            Some(text) => builder
                .multipart(
                    MultiPart::alternative()
                        .singlepart(
                            SinglePart::builder()
                                .header(ContentType::TEXT_PLAIN)
                                .body(text.clone()),
                        )
                        .singlepart(
                            SinglePart::builder()
                                .header(ContentType::TEXT_HTML)
                                .body(email.html_body.clone()),
                        ),
                )
                .map_err(|e| RelayError::SendFailed(format!("Failed to build message: {}", e)))?,
            None => builder
                .header(ContentType::TEXT_HTML)
                .body(email.html_body.clone())
                .map_err(|e| RelayError::SendFailed(format!("Failed to build message: {}", e)))?,
        };

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| RelayError::SendFailed(format!("Failed to send email: {}", e)))?;

        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            "Email relayed"
        );

        let message_id = response.message().next().map(|s| s.to_string());
        Ok(RelayReceipt { message_id })
    }

    async fn health_check(&self) -> Result<(), RelayError> {
        self.transport
            .test_connection()
            .await
            .map_err(|e| RelayError::Connection(format!("SMTP connection test failed: {}", e)))?;
        Ok(())
    }
}

/// Mock relay for tests: records submissions and can simulate failures.
#[derive(Default)]
pub struct MockMailRelay {
    fail: bool,
    send_count: AtomicU64,
    sent: Mutex<Vec<OutboundEmail>>,
}

impl MockMailRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// A relay whose every submission fails, as an unreachable provider would.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Number of submission attempts, including failed ones.
    pub fn send_count(&self) -> u64 {
        self.send_count.load(Ordering::SeqCst)
    }

    /// Messages that were accepted by the mock.
    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl MailRelay for MockMailRelay {
    async fn send(&self, email: &OutboundEmail) -> Result<RelayReceipt, RelayError> {
        let attempt = self.send_count.fetch_add(1, Ordering::SeqCst) + 1;

        if self.fail {
            return Err(RelayError::SendFailed(
                "mock relay failure".to_string(),
            ));
        }

        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(email.clone());

        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            "[MOCK] email would be relayed"
        );

        Ok(RelayReceipt {
            message_id: Some(format!("mock-email-{}", attempt)),
        })
    }

    async fn health_check(&self) -> Result<(), RelayError> {
        Ok(())
    }
}
