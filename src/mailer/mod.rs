//! Outbound mail: the transport seam and the dispatcher that stamps every
//! notification with the sender identity and fixed headers.

mod smtp;

pub use smtp::SmtpTransport;

use async_trait::async_trait;

use std::{fmt, sync::Arc};

use crate::models::NotificationMessage;

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("Invalid email address format '{address}': {source}")]
    AddressFormat {
        address: String,
        source: lettre::address::AddressError,
    },

    #[error("Failed to build email message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    #[error("SMTP transport error: {0}")]
    SmtpTransport(#[from] lettre::transport::smtp::Error),

    #[error("Failed to configure SMTP relay: {0}")]
    SmtpRelay(lettre::transport::smtp::Error),

    #[error("Mail transport error: {0}")]
    Transport(String),
}

/// Server acknowledgment for an accepted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub code: String,
    pub message: Vec<String>,
}

impl fmt::Display for DeliveryReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code, self.message.join(" "))
    }
}

/// A fully addressed message, independent of the wire transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from_name: String,
    pub from: String,
    pub reply_to: String,
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
    pub headers: Vec<(&'static str, String)>,
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> Result<DeliveryReceipt, DeliveryError>;

    /// Checks that the server is reachable and accepts the credentials.
    async fn verify(&self) -> Result<(), DeliveryError> {
        Ok(())
    }
}

/// Sends notifications from one mail account.
#[derive(Clone)]
pub struct MailDispatcher {
    transport: Arc<dyn MailTransport>,
    sender_name: String,
    account: String,
}

impl MailDispatcher {
    pub fn new(
        transport: Arc<dyn MailTransport>,
        sender_name: impl Into<String>,
        account: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            sender_name: sender_name.into(),
            account: account.into(),
        }
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    fn fixed_headers(&self) -> Vec<(&'static str, String)> {
        vec![
            ("X-Priority", "1".to_string()),
            ("X-MSMail-Priority", "High".to_string()),
            ("Importance", "high".to_string()),
            ("X-Mailer", env!("CARGO_PKG_NAME").to_string()),
            (
                "List-Unsubscribe",
                format!("<mailto:{}?subject=unsubscribe>", self.account),
            ),
            ("X-Auto-Response-Suppress", "OOF, AutoReply".to_string()),
        ]
    }

    pub fn envelope(&self, to: &str, notification: &NotificationMessage) -> OutgoingMail {
        OutgoingMail {
            from_name: self.sender_name.clone(),
            from: self.account.clone(),
            reply_to: self.account.clone(),
            to: to.to_string(),
            subject: notification.subject.clone(),
            text: notification.text.clone(),
            html: notification.html.clone(),
            headers: self.fixed_headers(),
        }
    }

    pub async fn send(
        &self,
        to: &str,
        notification: &NotificationMessage,
    ) -> Result<DeliveryReceipt, DeliveryError> {
        let mail = self.envelope(to, notification);

        tracing::info!(
            "Sending email to '{}' with subject '{}'",
            mail.to,
            mail.subject
        );

        self.transport.send(&mail).await
    }

    pub async fn verify(&self) -> Result<(), DeliveryError> {
        self.transport.verify().await
    }
}
