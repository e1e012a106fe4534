//! Common test utilities

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use team_assigner::models::{Player, TeamName, WeekContext};
use team_assigner::notifications::{Channel, ChannelError, ChannelResult, DeliveryStatus, Notification};
use team_assigner::schedule::{ProviderError, ProviderResult, ScheduleProvider, SeasonWindow};

/// Roster with ids `1..=n`
pub fn roster(n: u32) -> Vec<Player> {
    (1..=n)
        .map(|id| Player::new(id, format!("Player {id}"), format!("player{id}@example.com")))
        .collect()
}

/// `n` distinct team names
pub fn teams(n: usize) -> Vec<TeamName> {
    (0..n).map(|i| format!("Team {i}")).collect()
}

/// A moment inside the 2024 regular season
pub fn mid_season() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, 15, 12, 0, 0).unwrap()
}

/// In-memory schedule provider that counts every call
pub struct FakeProvider {
    pub window: SeasonWindow,
    pub week_count: u32,
    pub teams: Vec<TeamName>,
    pub byes: HashMap<u32, Vec<TeamName>>,
    pub fail_teams: bool,
    pub window_calls: AtomicUsize,
    pub week_count_calls: AtomicUsize,
    pub team_calls: AtomicUsize,
    pub bye_calls: AtomicUsize,
}

impl FakeProvider {
    /// 2024 season, week 6, 32 teams and no byes anywhere
    pub fn new() -> Self {
        Self {
            window: SeasonWindow::new(
                Utc.with_ymd_and_hms(2024, 9, 5, 7, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2025, 1, 8, 7, 59, 0).unwrap(),
            ),
            week_count: 6,
            teams: teams(32),
            byes: HashMap::new(),
            fail_teams: false,
            window_calls: AtomicUsize::new(0),
            week_count_calls: AtomicUsize::new(0),
            team_calls: AtomicUsize::new(0),
            bye_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_week(mut self, week: u32) -> Self {
        self.week_count = week;
        self
    }

    pub fn with_byes(mut self, week: u32, byes: &[&str]) -> Self {
        self.byes
            .insert(week, byes.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn failing_teams(mut self) -> Self {
        self.fail_teams = true;
        self
    }

    pub fn total_calls(&self) -> usize {
        self.window_calls.load(Ordering::SeqCst)
            + self.week_count_calls.load(Ordering::SeqCst)
            + self.team_calls.load(Ordering::SeqCst)
            + self.bye_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScheduleProvider for FakeProvider {
    async fn fetch_season_window(&self, _year: i32) -> ProviderResult<SeasonWindow> {
        self.window_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.window)
    }

    async fn fetch_week_count(&self, _year: i32) -> ProviderResult<u32> {
        self.week_count_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.week_count)
    }

    async fn fetch_all_teams(&self) -> ProviderResult<Vec<TeamName>> {
        self.team_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_teams {
            return Err(ProviderError::Status {
                status: 503,
                url: "http://fake/teams".to_string(),
            });
        }
        Ok(self.teams.clone())
    }

    async fn fetch_bye_teams(&self, ctx: WeekContext) -> ProviderResult<Vec<TeamName>> {
        self.bye_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.byes.get(&ctx.week).cloned().unwrap_or_default())
    }
}

/// Channel that records what it was asked to send
#[derive(Clone)]
pub struct RecordingChannel {
    pub sent: Arc<Mutex<Vec<Notification>>>,
    pub fail: bool,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Channel for RecordingChannel {
    fn name(&self) -> &str {
        "recording"
    }

    async fn send(&self, notification: &Notification) -> ChannelResult<DeliveryStatus> {
        self.sent.lock().unwrap().push(notification.clone());
        if self.fail {
            return Err(ChannelError::Other("relay unavailable".to_string()));
        }
        Ok(DeliveryStatus::delivered(self.name(), "recorded"))
    }
}
