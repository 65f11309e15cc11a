//! Services layer: account storage, recovery tokens, password reset,
//! hiring-email dispatch, and the mail relay seam.

mod dispatch;
pub mod error;
mod recovery;
mod relay;
mod store;
mod token;

pub use dispatch::{DispatchResult, NotificationDispatcher, NotificationRequest};
pub use error::ServiceError;
pub use recovery::RecoveryService;
pub use relay::{MailRelay, MockMailRelay, OutboundEmail, RelayError, RelayReceipt, SmtpRelay};
pub use store::{AccountStore, InMemoryAccountStore, PostgresAccountStore};
pub use token::RecoveryTokenService;
