//! Notification manager for channel routing

use super::channels::email::{EmailChannel, EmailConfig};
use super::channels::{Channel, ChannelResult, DeliveryStatus};
use super::{Notification, NotificationError};

/// Routes each notification through every registered channel
#[derive(Default)]
pub struct NotificationManager {
    /// Registered notification channels
    channels: Vec<Box<dyn Channel + Send + Sync>>,
}

impl NotificationManager {
    /// Create a manager with no channels
    pub fn new() -> Self {
        Self {
            channels: Vec::new(),
        }
    }

    /// Add a notification channel
    pub fn add_channel(&mut self, channel: Box<dyn Channel + Send + Sync>) {
        self.channels.push(channel);
    }

    /// Add an SMTP email channel
    pub fn add_email_channel(&mut self, config: EmailConfig) -> ChannelResult<()> {
        self.add_channel(Box::new(EmailChannel::new(config)?));
        Ok(())
    }

    /// Number of registered channels
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Deliver a notification through every channel
    ///
    /// Every channel is attempted even if an earlier one fails; failures are
    /// then reported together.
    pub async fn send(
        &self,
        notification: &Notification,
    ) -> Result<Vec<DeliveryStatus>, NotificationError> {
        if self.channels.is_empty() {
            return Err(NotificationError::NoChannels);
        }

        let mut statuses = Vec::with_capacity(self.channels.len());
        let mut errors = Vec::new();

        for channel in &self.channels {
            match channel.send(notification).await {
                Ok(status) => {
                    if !status.success {
                        errors.push(status.to_string());
                    }
                    statuses.push(status);
                }
                Err(e) => {
                    tracing::error!(channel = channel.name(), error = %e, "Failed to send notification");
                    errors.push(format!("{}: {e}", channel.name()));
                }
            }
        }

        if !errors.is_empty() {
            return Err(NotificationError::DeliveryFailed(errors));
        }

        tracing::info!(
            kind = %notification.kind,
            subject = %notification.subject,
            channels = statuses.len(),
            "Notification delivered"
        );
        Ok(statuses)
    }
}
