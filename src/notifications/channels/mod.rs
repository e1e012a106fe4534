//! Notification channels
//!
//! SMTP email is the only transport the assigner ships with. Tests plug in
//! their own [`Channel`] implementations.

pub mod email;

use async_trait::async_trait;
use std::fmt;

use crate::notifications::Notification;

/// Result type for channel operations
pub type ChannelResult<T> = Result<T, ChannelError>;

/// Errors that stop a channel from attempting delivery
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// SMTP relay could not be set up
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// Message could not be assembled
    #[error("Email build error: {0}")]
    EmailBuild(#[from] lettre::error::Error),

    /// Malformed sender or recipient address
    #[error("Invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    /// Invalid channel configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Generic error
    #[error("Channel error: {0}")]
    Other(String),
}

/// Outcome of one delivery attempt on one channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryStatus {
    pub success: bool,
    pub channel: String,
    pub detail: String,
}

impl DeliveryStatus {
    pub fn delivered(channel: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            success: true,
            channel: channel.into(),
            detail: detail.into(),
        }
    }

    pub fn failed(channel: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            success: false,
            channel: channel.into(),
            detail: reason.into(),
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = if self.success { "delivered" } else { "failed" };
        write!(f, "{} {outcome}: {}", self.channel, self.detail)
    }
}

/// A transport notifications can be delivered through
///
/// A transport failure comes back as `Ok` with a failed [`DeliveryStatus`];
/// `Err` is for notifications the channel cannot even attempt to send.
#[async_trait]
pub trait Channel: Send + Sync {
    fn name(&self) -> &str;

    async fn send(&self, notification: &Notification) -> ChannelResult<DeliveryStatus>;
}
