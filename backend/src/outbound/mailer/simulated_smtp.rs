//! Log-only mailer.
//!
//! Stands in for an SMTP relay: the message is recorded as a structured
//! `tracing` event and acknowledged with a generated id. The body is never
//! logged because it carries the PIN.

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use crate::domain::ports::{MailerError, ResetPinMailer};
use crate::domain::{MailReceipt, OutgoingEmail};

/// Mailer that logs instead of sending.
#[derive(Debug, Clone, Default)]
pub struct SimulatedSmtpMailer {
    sender: String,
}

impl SimulatedSmtpMailer {
    /// Create a mailer that reports `sender` as the From address.
    pub fn new(sender: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
        }
    }
}

#[async_trait]
impl ResetPinMailer for SimulatedSmtpMailer {
    async fn deliver(&self, email: &OutgoingEmail) -> Result<MailReceipt, MailerError> {
        if email.subject.trim().is_empty() {
            return Err(MailerError::delivery("refusing to send an email without a subject"));
        }
        let message_id = format!("<{}@icumbi.simulated>", Uuid::new_v4());
        info!(
            from = %self.sender,
            to = %email.to,
            subject = %email.subject,
            pin_fingerprint = %email.pin_fingerprint,
            body_chars = email.body.chars().count(),
            %message_id,
            "simulated SMTP delivery"
        );
        Ok(MailReceipt { message_id })
    }
}
