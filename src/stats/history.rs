use log::warn;
use serde_json::Value;

use crate::config::GameMode;
use crate::domain::ids::MatchId;
use crate::domain::models::{HistoryMatch, MatchHistoryResponse};

/// How many recent matches per mode are aggregated in depth.
pub const MAX_DEEP_MATCHES: usize = 3;

/// A history entry selected for deep aggregation.
#[derive(Debug, Clone)]
pub struct RecentMatch {
    pub match_id: MatchId,
    pub start_date: Option<String>,
    pub outcome: Option<i64>,
}

/// Parsed page of a player's most recent matchmaking matches, most recent
/// first.
#[derive(Debug, Default)]
pub struct MatchHistory {
    entries: Vec<HistoryMatch>,
}

impl MatchHistory {
    pub fn from_payload(payload: &Value) -> Self {
        match serde_json::from_value::<MatchHistoryResponse>(payload.clone()) {
            Ok(response) => Self {
                entries: response.results,
            },
            Err(err) => {
                warn!("Failed to parse match history: {}", err);
                Self::default()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent entry played on the given mode's playlist.
    pub fn latest_for_mode(&self, mode: GameMode) -> Option<&HistoryMatch> {
        self.entries
            .iter()
            .find(|entry| entry.playlist_id.as_deref() == Some(mode.playlist_uuid()))
    }

    /// Total XP from the most recent entry of any recognized mode.
    pub fn latest_xp(&self) -> Option<u64> {
        self.entries.iter().find_map(|entry| {
            GameMode::from_playlist_uuid(entry.playlist_id.as_deref()?)?;
            entry.xp_progress.as_ref()?.updated_total_xp
        })
    }

    /// Up to `max_matches` most recent entries on the mode's playlist.
    /// Entries without a well-formed match id are dropped here, before any
    /// network use.
    pub fn recent_matches_for_mode(&self, mode: GameMode, max_matches: usize) -> Vec<RecentMatch> {
        self.entries
            .iter()
            .filter(|entry| entry.playlist_id.as_deref() == Some(mode.playlist_uuid()))
            .filter_map(|entry| {
                let match_id = MatchId::parse(entry.match_id.as_deref()?)?;
                Some(RecentMatch {
                    match_id,
                    start_date: entry.start_date.as_ref().and_then(|date| date.iso8601.clone()),
                    outcome: entry.outcome,
                })
            })
            .take(max_matches)
            .collect()
    }
}
