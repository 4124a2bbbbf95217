//! Outbound mail transport.
//!
//! Orchestrators only see the [`Mailer`] trait. [`SmtpMailer`] is the
//! production backend and is built from an explicit [`MailerConfig`].

mod smtp;

pub use smtp::{MailerConfig, SmtpMailer};

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("SMTP error: {0}")]
    Smtp(String),

    #[error("delivery timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

#[derive(Debug, Clone)]
pub struct MailAttachment {
    pub filename: String,
    pub content_type: String,
    pub data: Bytes,
}

#[derive(Debug, Clone)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub attachment: Option<MailAttachment>,
}

/// Identifier the transport assigned to an accepted message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DeliveryId(pub String);

impl fmt::Display for DeliveryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Returns only once the transport has accepted the message.
    async fn send(&self, mail: OutgoingMail) -> Result<DeliveryId, MailError>;
}
