pub mod email;
pub mod password;

pub use email::{send_acceptance_email, send_rejection_email, send_selection_email};
pub use password::{confirm_password_reset, request_password_reset};
