//! Configuration management for the team assigner
//!
//! Configuration is read from a TOML file and can be overridden by
//! `TEAM_ASSIGNER_*` environment variables, which is the recommended way to
//! supply the SMTP password.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use crate::models::Player;
use crate::notifications::{EmailConfig, SmtpSecurity};
use crate::schedule::espn::DEFAULT_BASE_URL;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,

    /// SMTP settings for the email channel
    pub email: EmailConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// The season's roster
    #[serde(default)]
    pub players: Vec<Player>,
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// ESPN core API base URL for the NFL league
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Recipient of error reports
    pub admin_email: String,

    /// Week to use instead of the live week; blank means none
    #[serde(default)]
    pub week_override: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load a file, apply environment overrides and validate
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Override file values with `TEAM_ASSIGNER_*` environment variables
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(url) = env_var("TEAM_ASSIGNER_BASE_URL") {
            self.app.base_url = url;
        }
        if let Some(admin) = env_var("TEAM_ASSIGNER_ADMIN_EMAIL") {
            self.app.admin_email = admin;
        }
        if let Some(week) = env_var("TEAM_ASSIGNER_WEEK_OVERRIDE") {
            self.app.week_override = Some(week);
        }
        if let Some(timeout) = env_var("TEAM_ASSIGNER_REQUEST_TIMEOUT") {
            self.app.request_timeout_secs = timeout
                .parse()
                .with_context(|| format!("Invalid TEAM_ASSIGNER_REQUEST_TIMEOUT: {timeout}"))?;
        }

        if let Some(server) = env_var("TEAM_ASSIGNER_SMTP_SERVER") {
            self.email.smtp_server = server;
        }
        if let Some(port) = env_var("TEAM_ASSIGNER_SMTP_PORT") {
            self.email.smtp_port = port
                .parse()
                .with_context(|| format!("Invalid TEAM_ASSIGNER_SMTP_PORT: {port}"))?;
        }
        if let Some(from) = env_var("TEAM_ASSIGNER_FROM_EMAIL") {
            self.email.from_email = from;
        }
        if let Some(password) = env_var("TEAM_ASSIGNER_SMTP_PASSWORD") {
            self.email.password = password;
        }

        if let Some(level) = env_var("TEAM_ASSIGNER_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = env_var("TEAM_ASSIGNER_LOG_FORMAT") {
            self.logging.format = format;
        }

        Ok(())
    }

    /// Validate configuration values
    ///
    /// The roster size is deliberately not checked here; an unsupported size
    /// is a runtime precondition reported by the runner.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.app.base_url)
            .with_context(|| format!("Invalid base_url: {}", self.app.base_url))?;

        if self.app.admin_email.trim().is_empty() {
            anyhow::bail!("admin_email must be set");
        }

        if self.app.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than 0");
        }

        self.email
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid [email] section: {e}"))?;

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            anyhow::bail!("logging.format must be 'text' or 'json'");
        }

        let mut ids = HashSet::new();
        for player in &self.players {
            if !ids.insert(player.id) {
                anyhow::bail!("Duplicate player id {}", player.id);
            }
            if player.email.trim().is_empty() {
                anyhow::bail!("Player {} ({}) has no email", player.id, player.name);
            }
        }

        Ok(())
    }

    /// Week override, if one is configured
    pub fn week_override(&self) -> Option<&str> {
        self.app
            .week_override
            .as_deref()
            .map(str::trim)
            .filter(|w| !w.is_empty())
    }

    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.app.request_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app: AppConfig {
                base_url: default_base_url(),
                admin_email: String::new(),
                week_override: None,
                request_timeout_secs: default_request_timeout(),
            },
            email: EmailConfig::new("localhost", "team-assigner@localhost")
                .with_security(SmtpSecurity::Starttls),
            logging: LoggingConfig::default(),
            players: Vec::new(),
        }
    }
}
