//! SMTP email channel
//!
//! Delivers notifications as plain-text email. The weekly notification goes
//! to every player address; admin reports go to the configured admin.

use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{Channel, ChannelError, ChannelResult, DeliveryStatus};
use crate::notifications::Notification;

/// Connection security for the SMTP relay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpSecurity {
    /// Plain connection upgraded with STARTTLS (port 587)
    #[default]
    Starttls,
    /// Implicit TLS (port 465)
    Tls,
    /// No encryption, for local relays and tests only
    None,
}

/// Email channel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// SMTP relay host
    pub smtp_server: String,
    /// SMTP relay port
    #[serde(default = "default_port")]
    pub smtp_port: u16,
    /// Connection security
    #[serde(default)]
    pub security: SmtpSecurity,
    /// Sender address, also the SMTP username
    pub from_email: String,
    /// SMTP password; empty disables authentication
    #[serde(default)]
    pub password: String,
    /// Connection timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_port() -> u16 {
    587
}

fn default_timeout() -> u64 {
    30
}

impl EmailConfig {
    /// Create a new email configuration
    pub fn new(smtp_server: impl Into<String>, from_email: impl Into<String>) -> Self {
        Self {
            smtp_server: smtp_server.into(),
            smtp_port: default_port(),
            security: SmtpSecurity::default(),
            from_email: from_email.into(),
            password: String::new(),
            timeout_secs: default_timeout(),
        }
    }

    /// Set the port
    pub fn with_port(mut self, port: u16) -> Self {
        self.smtp_port = port;
        self
    }

    /// Set connection security
    pub fn with_security(mut self, security: SmtpSecurity) -> Self {
        self.security = security;
        self
    }

    /// Set the SMTP password
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.smtp_server.trim().is_empty() {
            return Err("SMTP server cannot be empty".to_string());
        }

        if self.smtp_port == 0 {
            return Err("SMTP port must be greater than 0".to_string());
        }

        if self.from_email.trim().is_empty() {
            return Err("Sender address cannot be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}

fn parse_mailbox(address: &str) -> ChannelResult<Mailbox> {
    address
        .trim()
        .parse::<Mailbox>()
        .map_err(|e| ChannelError::InvalidAddress {
            address: address.to_string(),
            reason: e.to_string(),
        })
}

/// SMTP email channel
///
/// # Example
///
/// ```rust,ignore
/// use team_assigner::notifications::{EmailChannel, EmailConfig, Notification};
///
/// let config = EmailConfig::new("smtp.gmail.com", "league@example.com")
///     .with_password("app-password");
/// let channel = EmailChannel::new(config)?;
/// channel.send(&Notification::weekly(recipients, 5, body)).await?;
/// ```
pub struct EmailChannel {
    config: EmailConfig,
    sender: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl EmailChannel {
    /// Create a new email channel; no connection is made until sending
    ///
    /// Must be called from within a Tokio runtime: the transport's
    /// connection pool starts its idle reaper on construction.
    pub fn new(config: EmailConfig) -> ChannelResult<Self> {
        config.validate().map_err(ChannelError::InvalidConfig)?;

        let sender = parse_mailbox(&config.from_email)?;

        let builder = match config.security {
            SmtpSecurity::Starttls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_server)?
            }
            SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_server)?,
            SmtpSecurity::None => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(config.smtp_server.clone())
            }
        };

        let mut builder = builder
            .port(config.smtp_port)
            .timeout(Some(Duration::from_secs(config.timeout_secs)));

        if !config.password.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.from_email.clone(),
                config.password.clone(),
            ));
        }

        Ok(Self {
            config,
            sender,
            transport: builder.build(),
        })
    }

    /// Assemble the plain-text message for a notification
    pub fn build_message(&self, notification: &Notification) -> ChannelResult<Message> {
        if notification.recipients.is_empty() {
            return Err(ChannelError::InvalidConfig(
                "Notification has no recipients".to_string(),
            ));
        }

        let mut builder = Message::builder()
            .from(self.sender.clone())
            .subject(notification.subject.clone())
            .header(ContentType::TEXT_PLAIN);

        for recipient in &notification.recipients {
            builder = builder.to(parse_mailbox(recipient)?);
        }

        Ok(builder.body(notification.body.clone())?)
    }
}

#[async_trait]
impl Channel for EmailChannel {
    fn name(&self) -> &str {
        "email"
    }

    async fn send(&self, notification: &Notification) -> ChannelResult<DeliveryStatus> {
        let message = self.build_message(notification)?;

        match self.transport.send(message).await {
            Ok(_) => {
                tracing::info!(
                    subject = %notification.subject,
                    recipients = notification.recipients.len(),
                    "Email delivered"
                );
                Ok(DeliveryStatus::delivered(
                    self.name(),
                    format!("Sent to {} recipient(s)", notification.recipients.len()),
                ))
            }
            Err(e) => {
                tracing::error!(
                    server = %self.config.smtp_server,
                    error = %e,
                    "Failed to deliver email"
                );
                Ok(DeliveryStatus::failed(self.name(), e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_config() -> EmailConfig {
        EmailConfig::new("localhost", "league@example.com")
            .with_port(2525)
            .with_security(SmtpSecurity::None)
    }

    #[test]
    fn test_email_config_validation() {
        assert!(local_config().validate().is_ok());
        assert!(EmailConfig::new("", "league@example.com").validate().is_err());
        assert!(EmailConfig::new("localhost", " ").validate().is_err());
        assert!(local_config().with_port(0).validate().is_err());
    }

    #[tokio::test]
    async fn test_email_channel_rejects_bad_sender() {
        let config = EmailConfig::new("localhost", "not an address").with_security(SmtpSecurity::None);
        assert!(matches!(
            EmailChannel::new(config),
            Err(ChannelError::InvalidAddress { .. })
        ));
    }

    #[tokio::test]
    async fn test_build_message_headers() {
        let channel = EmailChannel::new(local_config()).unwrap();
        let notification = Notification::weekly(
            vec!["a@example.com".to_string(), "b@example.com".to_string()],
            3,
            "Alice: Lions & Bears\n",
        );

        let message = channel.build_message(&notification).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("Subject: Week 3"));
        assert!(raw.contains("a@example.com"));
        assert!(raw.contains("b@example.com"));
        assert!(raw.contains("Alice: Lions & Bears"));
    }

    #[tokio::test]
    async fn test_build_message_rejects_bad_recipient() {
        let channel = EmailChannel::new(local_config()).unwrap();
        let notification = Notification::weekly(vec!["nope".to_string()], 3, "body");
        assert!(matches!(
            channel.build_message(&notification),
            Err(ChannelError::InvalidAddress { .. })
        ));
    }

    #[tokio::test]
    async fn test_build_message_requires_recipients() {
        let channel = EmailChannel::new(local_config()).unwrap();
        let notification = Notification::weekly(Vec::new(), 3, "body");
        assert!(channel.build_message(&notification).is_err());
    }

    #[tokio::test]
    async fn test_channel_with_credentials() {
        let channel = EmailChannel::new(local_config().with_password("secret")).unwrap();
        assert_eq!(channel.name(), "email");
    }
}
