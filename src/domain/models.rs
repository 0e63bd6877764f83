use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::GameMode;

// --- API response structures ---

/// Raw match-history response from the statistics service.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchHistoryResponse {
    #[serde(rename = "Results", default)]
    pub results: Vec<HistoryMatch>,
}

/// One match entry from the history page. Every field is optional: entries
/// missing data degrade the report instead of failing it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HistoryMatch {
    #[serde(rename = "MatchId")]
    pub match_id: Option<String>,
    #[serde(rename = "PlaylistId")]
    pub playlist_id: Option<String>,
    #[serde(rename = "MatchStartDate")]
    pub start_date: Option<MatchStartDate>,
    #[serde(rename = "PlayerMatchOutcome")]
    pub outcome: Option<i64>,
    #[serde(rename = "XPProgress")]
    pub xp_progress: Option<XpProgress>,
    #[serde(rename = "RatingProgress")]
    pub rating_progress: Option<RatingProgress>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MatchStartDate {
    #[serde(rename = "ISO8601Date")]
    pub iso8601: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct XpProgress {
    #[serde(rename = "UpdatedTotalXP")]
    pub updated_total_xp: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RatingProgress {
    #[serde(rename = "UpdatedMmr")]
    pub updated_mmr: Option<Mmr>,
    #[serde(rename = "UpdatedCsr")]
    pub updated_csr: Option<Csr>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Mmr {
    #[serde(rename = "Rating")]
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Csr {
    #[serde(rename = "Tier")]
    pub tier: Option<i64>,
    #[serde(rename = "Designation")]
    pub designation: Option<i64>,
}

/// Raw playlist-ratings response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RatingsResponse {
    #[serde(rename = "Results", default)]
    pub results: Vec<RatingRow>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RatingRow {
    #[serde(rename = "Id")]
    pub id: Option<String>,
    #[serde(rename = "Result")]
    pub result: Option<RatingResult>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RatingResult {
    #[serde(rename = "Mmr")]
    pub mmr: Option<Mmr>,
    #[serde(rename = "Csr")]
    pub csr: Option<Csr>,
}

// --- Aggregation output ---

/// Per-match aggregate produced by a single pass over the telemetry stream.
/// Raw values only; display formatting happens in the consolidator.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchSummary {
    pub game_mode: Option<Value>,
    pub match_type: Option<Value>,
    pub playlist_id: Option<String>,
    pub leader_id: Option<i64>,
    pub tech2_ms: Option<u64>,
    pub tech3_ms: Option<u64>,
    pub turrets_ms: Vec<u64>,
    pub bases_ms: Vec<u64>,
    pub minis_ms: Vec<u64>,
    pub population: Vec<u64>,
    pub units: BTreeMap<String, u32>,
    pub duration_ms: Option<u64>,
}

/// Consumer-facing view of one aggregated match.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchReport {
    pub date: Option<String>,
    pub result: Option<String>,
    pub leader: Option<String>,
    pub t2: Option<String>,
    pub t3: Option<String>,
    pub turrets: Vec<String>,
    pub bases: Vec<String>,
    pub minis: Vec<String>,
    pub population: Vec<u64>,
    pub units: BTreeMap<String, u32>,
    pub duration: Option<String>,
}

/// Rating triple for one game mode, plus the composite rank label.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModeRating {
    pub mmr: Option<f64>,
    pub tier: Option<String>,
    pub designation: Option<String>,
    pub csr: Option<String>,
}

/// Consolidated stats for one player, ready for export.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PlayerReport {
    pub gamertag: String,
    pub xp: Option<u64>,
    pub level: Option<u32>,
    #[serde(rename = "1vs1")]
    pub one_vs_one: ModeRating,
    #[serde(rename = "2vs2")]
    pub two_vs_two: ModeRating,
    #[serde(rename = "3vs3")]
    pub three_vs_three: ModeRating,
    pub matches: Vec<MatchReport>,
    /// Unit ids seen in telemetry but missing from the display table.
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub unknown_units: BTreeSet<String>,
}

impl PlayerReport {
    pub fn new(gamertag: impl Into<String>) -> Self {
        Self {
            gamertag: gamertag.into(),
            ..Self::default()
        }
    }

    pub fn mode_rating_mut(&mut self, mode: GameMode) -> &mut ModeRating {
        match mode {
            GameMode::OneVsOne => &mut self.one_vs_one,
            GameMode::TwoVsTwo => &mut self.two_vs_two,
            GameMode::ThreeVsThree => &mut self.three_vs_three,
        }
    }
}
