//! ESPN core API client
//!
//! Implements [`ScheduleProvider`] on top of the public ESPN sports core API:
//! - `/seasons/{year}/types/2` for the regular-season window
//! - `/seasons/{year}/types/2/weeks` for the current week count
//! - `/seasons/{year}/types/2/weeks/{week}` for teams on bye
//! - `/teams?limit=32` for the league
//!
//! Team and bye listings only carry `$ref` links, so each entry is followed
//! with a second request to read the team nickname. Requests are made one at
//! a time, in listing order, without retries.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT},
    Client,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use super::{ProviderError, ProviderResult, ScheduleProvider, SeasonWindow};
use crate::models::{TeamName, WeekContext};

/// Default ESPN endpoint for the NFL league
pub const DEFAULT_BASE_URL: &str = "https://sports.core.api.espn.com/v2/sports/football/leagues/nfl";

/// Regular season type in ESPN season paths
const REGULAR_SEASON_TYPE: u32 = 2;

/// Date format ESPN uses for season boundaries, e.g. `2024-09-05T07:00Z`
const ESPN_DATE_FORMAT: &str = "%Y-%m-%dT%H:%MZ";

/// `{ "$ref": "..." }` link to another resource
#[derive(Debug, Clone, Deserialize)]
struct Reference {
    #[serde(rename = "$ref")]
    href: String,
}

/// Paged listing of references
#[derive(Debug, Deserialize)]
struct RefList {
    #[serde(default)]
    count: u32,
    #[serde(default)]
    items: Vec<Reference>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeasonType {
    start_date: String,
    end_date: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WeekDetails {
    #[serde(default)]
    teams_on_bye: Option<Vec<Reference>>,
}

#[derive(Debug, Deserialize)]
struct Team {
    nickname: String,
}

/// HTTP client for the ESPN core API
pub struct EspnClient {
    client: Client,
    base_url: String,
}

impl EspnClient {
    /// Create a client against the default ESPN endpoint
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Http` if the HTTP client cannot be created
    pub fn new(timeout: Duration) -> ProviderResult<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, timeout)
    }

    /// Create a client against a custom base URL (mock servers in tests)
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::InvalidUrl` when `base_url` is not an absolute
    /// http(s) URL, or `ProviderError::Http` if the client cannot be built
    pub fn with_base_url(base_url: &str, timeout: Duration) -> ProviderResult<Self> {
        let parsed =
            url::Url::parse(base_url).map_err(|e| ProviderError::InvalidUrl(format!("{base_url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ProviderError::InvalidUrl(base_url.to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .default_headers(Self::default_headers())
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL requests are made against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("team-assigner/", env!("CARGO_PKG_VERSION"))),
        );
        headers
    }

    fn season_path(year: i32) -> String {
        format!("/seasons/{year}/types/{REGULAR_SEASON_TYPE}")
    }

    /// GET a path relative to the base URL
    async fn get_path<T: DeserializeOwned>(&self, path: &str) -> ProviderResult<T> {
        let url = format!("{}{}", self.base_url, path);
        self.get_url(&url).await
    }

    /// GET an absolute URL and decode its JSON body
    async fn get_url<T: DeserializeOwned>(&self, url: &str) -> ProviderResult<T> {
        tracing::debug!(url = %url, "Requesting ESPN resource");

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(url.to_string())
            } else {
                ProviderError::Http(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|source| ProviderError::Json {
            url: url.to_string(),
            source,
        })
    }

    /// Follow each reference in order and collect the team nicknames
    async fn resolve_team_refs(&self, refs: &[Reference]) -> ProviderResult<Vec<TeamName>> {
        let mut names = Vec::with_capacity(refs.len());
        for reference in refs {
            let team: Team = self.get_url(&reference.href).await?;
            names.push(team.nickname);
        }
        Ok(names)
    }
}

/// Parse an ESPN season boundary, accepting RFC 3339 as well
pub fn parse_espn_date(value: &str) -> ProviderResult<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(value, ESPN_DATE_FORMAT)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|e| ProviderError::InvalidDate(format!("{value}: {e}")))
}

#[async_trait]
impl ScheduleProvider for EspnClient {
    async fn fetch_season_window(&self, year: i32) -> ProviderResult<SeasonWindow> {
        let season: SeasonType = self.get_path(&Self::season_path(year)).await?;
        Ok(SeasonWindow::new(
            parse_espn_date(&season.start_date)?,
            parse_espn_date(&season.end_date)?,
        ))
    }

    async fn fetch_week_count(&self, year: i32) -> ProviderResult<u32> {
        let weeks: RefList = self
            .get_path(&format!("{}/weeks", Self::season_path(year)))
            .await?;
        Ok(weeks.count)
    }

    async fn fetch_all_teams(&self) -> ProviderResult<Vec<TeamName>> {
        let teams: RefList = self.get_path("/teams?limit=32").await?;
        self.resolve_team_refs(&teams.items).await
    }

    async fn fetch_bye_teams(&self, ctx: WeekContext) -> ProviderResult<Vec<TeamName>> {
        let details: WeekDetails = self
            .get_path(&format!("{}/weeks/{}", Self::season_path(ctx.year), ctx.week))
            .await?;

        match details.teams_on_bye {
            Some(refs) => self.resolve_team_refs(&refs).await,
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_parse_espn_short_date() {
        let date = parse_espn_date("2024-09-05T07:00Z").unwrap();
        assert_eq!(date.year(), 2024);
        assert_eq!(date.month(), 9);
        assert_eq!(date.day(), 5);
    }

    #[test]
    fn test_parse_rfc3339_date() {
        let date = parse_espn_date("2025-01-08T07:59:00Z").unwrap();
        assert_eq!(date.year(), 2025);
    }

    #[test]
    fn test_parse_invalid_date() {
        assert!(matches!(
            parse_espn_date("next tuesday"),
            Err(ProviderError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_reference_deserialization() {
        let json = r#"{"count": 2, "items": [{"$ref": "http://a/1"}, {"$ref": "http://a/2"}]}"#;
        let list: RefList = serde_json::from_str(json).unwrap();
        assert_eq!(list.count, 2);
        assert_eq!(list.items[1].href, "http://a/2");
    }

    #[test]
    fn test_week_without_byes_field() {
        let details: WeekDetails = serde_json::from_str(r#"{"number": 1}"#).unwrap();
        assert!(details.teams_on_bye.is_none());
    }

    #[test]
    fn test_client_rejects_bad_base_url() {
        assert!(EspnClient::with_base_url("not a url", Duration::from_secs(5)).is_err());
        assert!(EspnClient::with_base_url("ftp://example.com", Duration::from_secs(5)).is_err());
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = EspnClient::with_base_url("http://localhost:8080/nfl/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/nfl");
    }
}
