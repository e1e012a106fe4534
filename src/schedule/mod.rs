//! Schedule data provider
//!
//! Everything the assigner needs to know about the NFL calendar comes through
//! the [`ScheduleProvider`] trait: the regular-season window, the current week
//! count, the full team list and the teams on bye for a given week.
//!
//! - [`espn`] - HTTP implementation against the ESPN core API
//! - [`season`] - resolution of `now` into a [`WeekContext`]
//!
//! Every call is attempted exactly once. A failure is a data retrieval error
//! and aborts the run.

pub mod espn;
pub mod season;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{TeamName, WeekContext};

pub use espn::EspnClient;
pub use season::{resolve_season_week, season_year};

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors that can occur while retrieving schedule data
#[derive(Error, Debug)]
pub enum ProviderError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status code
    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    /// Request timeout
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Response body did not match the expected shape
    #[error("Invalid JSON from {url}: {source}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Malformed endpoint URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Season boundary date that could not be parsed
    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

/// Start and end of a regular season
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl SeasonWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }
}

/// Source of season, week, team and bye data
#[async_trait]
pub trait ScheduleProvider: Send + Sync {
    /// Regular-season window for the season that starts in `year`
    async fn fetch_season_window(&self, year: i32) -> ProviderResult<SeasonWindow>;

    /// Number of regular-season weeks published so far, i.e. the current week
    async fn fetch_week_count(&self, year: i32) -> ProviderResult<u32>;

    /// Every team in the league
    async fn fetch_all_teams(&self) -> ProviderResult<Vec<TeamName>>;

    /// Teams on bye for a week, in the provider's order
    async fn fetch_bye_teams(&self, ctx: WeekContext) -> ProviderResult<Vec<TeamName>>;
}
