//! Notification delivery
//!
//! Weekly assignments and administrative error reports are both modelled as a
//! [`Notification`] and routed through every registered [`Channel`].
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────┐
//! │      NotificationManager                   │
//! │  - Channel routing                         │
//! │  - Delivery status aggregation             │
//! └────────────────────────────────────────────┘
//!                     │
//!                     ▼
//!               ┌─────────┐
//!               │  Email  │
//!               │ Channel │
//!               └─────────┘
//! ```
//!
//! Delivery is attempted once per channel. A failure on any channel is
//! reported as a [`NotificationError`] rather than swallowed.

pub mod channels;
mod manager;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

// Re-exports
pub use channels::email::{EmailChannel, EmailConfig, SmtpSecurity};
pub use channels::{Channel, ChannelError, ChannelResult, DeliveryStatus};
pub use manager::NotificationManager;

/// Subject line of administrative error reports
pub const ADMIN_ERROR_SUBJECT: &str = "Error Running NFL Team Assigner";

/// Errors raised when a notification could not be delivered
#[derive(Error, Debug)]
pub enum NotificationError {
    /// Nothing to deliver through
    #[error("No notification channels configured")]
    NoChannels,

    /// One or more channels failed
    #[error("Delivery failed: {}", .0.join("; "))]
    DeliveryFailed(Vec<String>),
}

/// What a notification reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Weekly team assignments for every player
    Weekly,
    /// Failure report for the administrator
    AdminError,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::AdminError => "admin_error",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A message ready for delivery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub kind: NotificationKind,
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Create a notification of any kind
    pub fn new(
        kind: NotificationKind,
        recipients: Vec<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            recipients,
            subject: subject.into(),
            body: body.into(),
            created_at: Utc::now(),
        }
    }

    /// Weekly assignments, subject `Week {week}`
    pub fn weekly(recipients: Vec<String>, week: u32, body: impl Into<String>) -> Self {
        Self::new(NotificationKind::Weekly, recipients, format!("Week {week}"), body)
    }

    /// Administrative error report with body `"{message} {error}"`
    pub fn admin_error(
        admin_email: impl Into<String>,
        message: &str,
        error: Option<&dyn std::error::Error>,
    ) -> Self {
        let detail = error.map(|e| e.to_string()).unwrap_or_default();
        Self::new(
            NotificationKind::AdminError,
            vec![admin_email.into()],
            ADMIN_ERROR_SUBJECT,
            format!("{message} {detail}").trim_end().to_string(),
        )
    }
}
