use std::collections::{BTreeMap, BTreeSet};

use log::{info, warn};
use serde_json::Value;

use crate::api::client::HaloApiClient;
use crate::cache::EventCache;
use crate::config::{GameMode, tables};
use crate::domain::ids::{Gamertag, MatchId, PlaylistId};
use crate::domain::models::{MatchReport, MatchSummary, ModeRating, PlayerReport};
use crate::errors::ApiError;
use crate::stats::format;
use crate::stats::history::{MAX_DEEP_MATCHES, MatchHistory, RecentMatch};
use crate::stats::ratings::RatingTriple;
use crate::telemetry::{aggregate, game_events};

/// Boundary to the statistics service as the consolidator sees it.
#[allow(async_fn_in_trait)]
pub trait StatsSource {
    async fn match_history(&self, gamertag: &Gamertag) -> Result<Option<Value>, ApiError>;
    async fn playlist_ratings(
        &self,
        playlist: &PlaylistId,
        gamertags: &[Gamertag],
    ) -> Result<Option<Value>, ApiError>;
    async fn match_events(&self, match_id: &MatchId) -> Result<Option<Value>, ApiError>;
}

/// Production source: the rate-limited gateway with the event cache in
/// front of the match-events endpoint.
pub struct HaloStatsSource {
    client: HaloApiClient,
    cache: EventCache,
}

impl HaloStatsSource {
    pub fn new(client: HaloApiClient, cache: EventCache) -> Self {
        Self { client, cache }
    }
}

impl StatsSource for HaloStatsSource {
    async fn match_history(&self, gamertag: &Gamertag) -> Result<Option<Value>, ApiError> {
        self.client.match_history(gamertag).await
    }

    async fn playlist_ratings(
        &self,
        playlist: &PlaylistId,
        gamertags: &[Gamertag],
    ) -> Result<Option<Value>, ApiError> {
        self.client.playlist_ratings(playlist, gamertags).await
    }

    async fn match_events(&self, match_id: &MatchId) -> Result<Option<Value>, ApiError> {
        self.cache
            .get_or_fetch(match_id, || self.client.match_events(match_id))
            .await
    }
}

/// Builds the consolidated report for one player and mode.
///
/// Construction performs no I/O; everything happens in the explicit
/// [`build`] call. Any missing datum leaves its field empty and the build
/// continues; only a rejected credential aborts.
///
/// [`build`]: PlayerReportBuilder::build
pub struct PlayerReportBuilder {
    gamertag: Gamertag,
    mode: GameMode,
}

impl PlayerReportBuilder {
    pub fn new(gamertag: Gamertag, mode: GameMode) -> Self {
        Self { gamertag, mode }
    }

    pub async fn build<S: StatsSource>(&self, source: &S) -> Result<PlayerReport, ApiError> {
        let mut report = PlayerReport::new(self.gamertag.as_str());

        let Some(history_payload) = source.match_history(&self.gamertag).await? else {
            warn!(
                "Can't get the match history for {}, please check the gamertag and the api key.",
                self.gamertag
            );
            return Ok(report);
        };
        let history = MatchHistory::from_payload(&history_payload);
        if history.is_empty() {
            info!("No recent matchmaking matches for {}.", self.gamertag);
            return Ok(report);
        }

        if let Some(xp) = history.latest_xp() {
            report.xp = Some(xp);
            report.level = tables::level_for_xp(xp);
        }

        for mode in GameMode::ALL {
            *report.mode_rating_mut(mode) = self.mode_rating(&history, mode, source).await?;
        }

        for recent in history.recent_matches_for_mode(self.mode, MAX_DEEP_MATCHES) {
            let summary = match source.match_events(&recent.match_id).await {
                Ok(Some(payload)) => aggregate(&self.gamertag, game_events(&payload)),
                // Missing events still produce a date/outcome-only entry.
                Ok(None) => MatchSummary::default(),
                Err(ApiError::Cache(err)) => {
                    warn!("Cache failure for match {}: {:#}", recent.match_id, err);
                    MatchSummary::default()
                }
                Err(err) => return Err(err),
            };
            let entry = format_match_report(summary, &recent, &mut report.unknown_units);
            report.matches.push(entry);
        }

        Ok(report)
    }

    /// Rating triple for one mode, read from history when possible and
    /// completed from the playlist-ratings endpoint when the player has no
    /// recent match on that playlist.
    async fn mode_rating<S: StatsSource>(
        &self,
        history: &MatchHistory,
        mode: GameMode,
        source: &S,
    ) -> Result<ModeRating, ApiError> {
        let mut triple = history
            .latest_for_mode(mode)
            .map(RatingTriple::from_history_entry)
            .unwrap_or_default();

        if triple.mmr.is_none() {
            info!(
                "No recent {} matches for {}; querying the playlist ratings api.",
                mode.label(),
                self.gamertag
            );
            let payload = source
                .playlist_ratings(&mode.playlist_id(), std::slice::from_ref(&self.gamertag))
                .await?;
            if let Some(payload) = payload {
                triple.merge_missing(RatingTriple::from_ratings_payload(&payload, &self.gamertag));
            }
        }

        Ok(triple.into_mode_rating())
    }
}

/// Turn a raw summary into its display form, routing unit ids without a
/// display name into the unknown-unit side channel.
fn format_match_report(
    summary: MatchSummary,
    recent: &RecentMatch,
    unknown_units: &mut BTreeSet<String>,
) -> MatchReport {
    let mut units = BTreeMap::new();
    for (squad_id, count) in summary.units {
        match tables::unit_display_name(&squad_id) {
            Some(name) => *units.entry(name.to_string()).or_insert(0) += count,
            None => {
                unknown_units.insert(squad_id.clone());
                *units.entry(squad_id).or_insert(0) += count;
            }
        }
    }

    MatchReport {
        date: recent.start_date.as_deref().and_then(format::iso_date_to_display),
        result: recent.outcome.and_then(tables::outcome_label).map(str::to_string),
        leader: summary.leader_id.and_then(tables::leader_name).map(str::to_string),
        t2: summary.tech2_ms.map(format::ms_to_min_sec),
        t3: summary.tech3_ms.map(format::ms_to_min_sec),
        turrets: summary.turrets_ms.into_iter().map(format::ms_to_min_sec).collect(),
        bases: summary.bases_ms.into_iter().map(format::ms_to_min_sec).collect(),
        minis: summary.minis_ms.into_iter().map(format::ms_to_min_sec).collect(),
        population: summary.population,
        units,
        duration: summary.duration_ms.map(format::ms_to_min_sec),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;

    const MATCH_1VS1: &str = "11111111-1111-1111-1111-111111111111";

    /// Canned source that records every service call it receives.
    #[derive(Default)]
    struct FakeSource {
        history: Option<Value>,
        ratings: BTreeMap<String, Value>,
        events: BTreeMap<String, Value>,
        calls: RefCell<Vec<String>>,
    }

    impl StatsSource for FakeSource {
        async fn match_history(&self, gamertag: &Gamertag) -> Result<Option<Value>, ApiError> {
            self.calls.borrow_mut().push(format!("history:{}", gamertag));
            Ok(self.history.clone())
        }

        async fn playlist_ratings(
            &self,
            playlist: &PlaylistId,
            gamertags: &[Gamertag],
        ) -> Result<Option<Value>, ApiError> {
            assert_eq!(gamertags.len(), 1);
            self.calls.borrow_mut().push(format!("ratings:{}", playlist));
            Ok(self.ratings.get(playlist.as_str()).cloned())
        }

        async fn match_events(&self, match_id: &MatchId) -> Result<Option<Value>, ApiError> {
            self.calls.borrow_mut().push(format!("events:{}", match_id));
            Ok(self.events.get(match_id.as_str()).cloned())
        }
    }

    fn gamertag() -> Gamertag {
        Gamertag::parse("Scout").unwrap()
    }

    fn one_vs_one_history() -> Value {
        json!({
            "Results": [
                {
                    "MatchId": MATCH_1VS1,
                    "PlaylistId": GameMode::OneVsOne.playlist_uuid(),
                    "MatchStartDate": {"ISO8601Date": "2023-10-02T18:33:20Z"},
                    "PlayerMatchOutcome": 1,
                    "XPProgress": {"UpdatedTotalXP": 24_500},
                    "RatingProgress": {
                        "UpdatedMmr": {"Rating": 1312.551},
                        "UpdatedCsr": {"Tier": 3, "Designation": 4},
                    },
                },
            ],
        })
    }

    fn match_events_payload() -> Value {
        json!({
            "GameEvents": [
                {
                    "EventName": "PlayerJoinedMatch",
                    "PlayerIndex": 1,
                    "HumanPlayerId": {"Gamertag": "Scout"},
                    "LeaderId": 5,
                },
                {
                    "EventName": "ResourceHeartbeat",
                    "TimeSinceStartMilliseconds": 121_000,
                    "PlayerResources": {"1": {"TechLevel": 2, "Population": 16}},
                },
                {
                    "EventName": "UnitTrained",
                    "TimeSinceStartMilliseconds": 30_000,
                    "PlayerIndex": 1,
                    "SquadId": "unsc_inf_generic_marine",
                },
                {
                    "EventName": "UnitTrained",
                    "TimeSinceStartMilliseconds": 31_000,
                    "PlayerIndex": 1,
                    "SquadId": "mod_custom_squad_01",
                },
                {"EventName": "MatchEnd", "ActivePlaytimeMilliseconds": 540_000},
            ],
        })
    }

    #[tokio::test]
    async fn missing_mode_history_falls_back_to_the_ratings_api() {
        let mut source = FakeSource {
            history: Some(one_vs_one_history()),
            ..FakeSource::default()
        };
        source.ratings.insert(
            GameMode::ThreeVsThree.playlist_uuid().to_string(),
            json!({
                "Results": [{
                    "Id": "Scout",
                    "Result": {
                        "Mmr": {"Rating": 987.654},
                        "Csr": {"Tier": 1, "Designation": 2},
                    },
                }],
            }),
        );

        let report = PlayerReportBuilder::new(gamertag(), GameMode::ThreeVsThree)
            .build(&source)
            .await
            .unwrap();

        // 1vs1 came from history; 2vs2 and 3vs3 went through the fallback.
        let calls = source.calls.borrow();
        assert!(!calls.contains(&format!("ratings:{}", GameMode::OneVsOne.playlist_uuid())));
        assert!(calls.contains(&format!("ratings:{}", GameMode::TwoVsTwo.playlist_uuid())));
        assert!(calls.contains(&format!("ratings:{}", GameMode::ThreeVsThree.playlist_uuid())));

        assert_eq!(report.one_vs_one.mmr, Some(1312.55));
        assert_eq!(report.one_vs_one.csr.as_deref(), Some("3 Platinum"));
        assert_eq!(report.three_vs_three.mmr, Some(987.65));
        assert_eq!(report.three_vs_three.csr.as_deref(), Some("1 Silver"));
        assert_eq!(report.two_vs_two, ModeRating::default());
    }

    #[tokio::test]
    async fn recent_matches_are_aggregated_and_formatted() {
        let mut source = FakeSource {
            history: Some(one_vs_one_history()),
            ..FakeSource::default()
        };
        source
            .events
            .insert(MATCH_1VS1.to_string(), match_events_payload());

        let report = PlayerReportBuilder::new(gamertag(), GameMode::OneVsOne)
            .build(&source)
            .await
            .unwrap();

        assert_eq!(report.xp, Some(24_500));
        assert_eq!(report.level, Some(10));
        assert_eq!(report.matches.len(), 1);

        let entry = &report.matches[0];
        assert_eq!(entry.date.as_deref(), Some("2023-10-02 18:33:20"));
        assert_eq!(entry.result.as_deref(), Some("Victory"));
        assert_eq!(entry.leader.as_deref(), Some("Atriox"));
        assert_eq!(entry.t2.as_deref(), Some("02:01"));
        assert_eq!(entry.population, vec![16]);
        assert_eq!(entry.duration.as_deref(), Some("09:00"));
        assert_eq!(entry.units.get("Marine"), Some(&1));
        // The unmapped squad id passes through raw and is reported back.
        assert_eq!(entry.units.get("mod_custom_squad_01"), Some(&1));
        assert!(report.unknown_units.contains("mod_custom_squad_01"));
    }

    #[tokio::test]
    async fn missing_event_payload_keeps_the_dated_entry() {
        let source = FakeSource {
            history: Some(one_vs_one_history()),
            ..FakeSource::default()
        };

        let report = PlayerReportBuilder::new(gamertag(), GameMode::OneVsOne)
            .build(&source)
            .await
            .unwrap();

        assert_eq!(report.matches.len(), 1);
        let entry = &report.matches[0];
        assert_eq!(entry.date.as_deref(), Some("2023-10-02 18:33:20"));
        assert_eq!(entry.result.as_deref(), Some("Victory"));
        assert!(entry.leader.is_none());
        assert!(entry.units.is_empty());
    }

    #[tokio::test]
    async fn absent_history_yields_a_bare_report() {
        let source = FakeSource::default();

        let report = PlayerReportBuilder::new(gamertag(), GameMode::OneVsOne)
            .build(&source)
            .await
            .unwrap();

        assert_eq!(report.gamertag, "Scout");
        assert_eq!(report.xp, None);
        assert!(report.matches.is_empty());
        // Without history there is nothing to consolidate, so no further
        // calls are spent on this gamertag.
        assert_eq!(source.calls.borrow().len(), 1);
    }

    #[tokio::test]
    async fn rejected_credential_aborts_the_build() {
        struct UnauthorizedSource;

        impl StatsSource for UnauthorizedSource {
            async fn match_history(&self, _: &Gamertag) -> Result<Option<Value>, ApiError> {
                Err(ApiError::InvalidKey)
            }
            async fn playlist_ratings(
                &self,
                _: &PlaylistId,
                _: &[Gamertag],
            ) -> Result<Option<Value>, ApiError> {
                Err(ApiError::InvalidKey)
            }
            async fn match_events(&self, _: &MatchId) -> Result<Option<Value>, ApiError> {
                Err(ApiError::InvalidKey)
            }
        }

        let result = PlayerReportBuilder::new(gamertag(), GameMode::OneVsOne)
            .build(&UnauthorizedSource)
            .await;
        assert!(matches!(result, Err(ApiError::InvalidKey)));
    }
}
