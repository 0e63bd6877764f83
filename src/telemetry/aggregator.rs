use serde_json::Value;

use crate::config::tables;
use crate::domain::ids::Gamertag;
use crate::domain::models::MatchSummary;
use crate::telemetry::events::{
    BuildingCompletedEvent, BuildingQueuedEvent, MatchStartEvent, PlayerJoinedEvent,
    ResourceHeartbeatEvent, TelemetryEvent, UnitTrainedEvent, decode_event,
};

/// Fixed elapsed-time checkpoints at which population is sampled.
pub const POPULATION_CHECKPOINTS_MS: [u64; 6] =
    [120_000, 240_000, 360_000, 480_000, 600_000, 720_000];

// Construction and training are only tracked through the early game.
const EARLY_GAME_WINDOW_MS: u64 = 720_000;

const TURRET_BUILDINGS: [&str; 2] = ["unsc_bldg_turret_01", "cov_bldg_turret_01"];
const BASE_BUILDING_MARKERS: [&str; 2] = ["unsc_bldg_command", "cov_bldg_builder"];
const MINI_BASE_BUILDINGS: [&str; 4] = [
    "unsc_bldg_minibase1sock_01",
    "cov_bldg_minibase1sock_01",
    "unsc_bldg_minibase2sock_01",
    "cov_bldg_minibase2sock_01",
];

/// Aggregate one match's chronologically ordered telemetry into a summary
/// for the given player.
///
/// A pure single pass: the input ordering is trusted, malformed events are
/// skipped individually, and the same input always yields the same summary.
/// When no `PlayerJoinedMatch` event names the player, the summary carries
/// match-level metadata only, which is a valid outcome.
pub fn aggregate(gamertag: &Gamertag, events: &[Value]) -> MatchSummary {
    let mut state = AggregatorState::new(gamertag);
    for raw in events {
        if let Some(event) = decode_event(raw) {
            state.apply(event);
        }
    }
    state.into_summary()
}

enum BuildingKind {
    Turret,
    Base,
    MiniBase,
}

fn classify_building(building_id: &str) -> Option<BuildingKind> {
    if TURRET_BUILDINGS.contains(&building_id) {
        Some(BuildingKind::Turret)
    } else if BASE_BUILDING_MARKERS.iter().any(|marker| building_id.contains(marker)) {
        Some(BuildingKind::Base)
    } else if MINI_BASE_BUILDINGS.contains(&building_id) {
        Some(BuildingKind::MiniBase)
    } else {
        None
    }
}

fn take_pending(pending: &mut Vec<i64>, instance_id: i64) -> bool {
    match pending.iter().position(|&id| id == instance_id) {
        Some(pos) => {
            pending.remove(pos);
            true
        }
        None => false,
    }
}

struct AggregatorState<'a> {
    target: &'a Gamertag,
    summary: MatchSummary,
    player_index: Option<i64>,
    previous_heartbeat_ms: u64,
    previous_tech_level: u32,
    pending_turrets: Vec<i64>,
    pending_bases: Vec<i64>,
    pending_minis: Vec<i64>,
}

impl<'a> AggregatorState<'a> {
    fn new(target: &'a Gamertag) -> Self {
        Self {
            target,
            summary: MatchSummary::default(),
            player_index: None,
            previous_heartbeat_ms: 0,
            previous_tech_level: 1,
            pending_turrets: Vec::new(),
            pending_bases: Vec::new(),
            pending_minis: Vec::new(),
        }
    }

    fn apply(&mut self, event: TelemetryEvent) {
        match event {
            TelemetryEvent::MatchStart(event) => self.on_match_start(event),
            TelemetryEvent::PlayerJoinedMatch(event) => self.on_player_joined(event),
            TelemetryEvent::ResourceHeartbeat(event) => self.on_heartbeat(event),
            TelemetryEvent::BuildingConstructionQueued(event) => self.on_building_queued(event),
            TelemetryEvent::BuildingConstructionCompleted(event) => {
                self.on_building_completed(event)
            }
            TelemetryEvent::UnitTrained(event) => self.on_unit_trained(event),
            TelemetryEvent::MatchEnd(event) => {
                self.summary.duration_ms = Some(event.active_playtime_ms);
            }
            TelemetryEvent::Other => {}
        }
    }

    fn on_match_start(&mut self, event: MatchStartEvent) {
        if self.summary.game_mode.is_none() {
            self.summary.game_mode = event.game_mode;
        }
        if self.summary.match_type.is_none() {
            self.summary.match_type = event.match_type;
        }
        if self.summary.playlist_id.is_none() {
            self.summary.playlist_id = event.playlist_id;
        }
    }

    fn on_player_joined(&mut self, event: PlayerJoinedEvent) {
        // The first matching join fixes the index for the rest of the pass.
        if self.player_index.is_some() {
            return;
        }
        let Some(gamertag) = event.human_player_id.as_ref().and_then(|id| id.gamertag.as_deref())
        else {
            return;
        };
        if self.target.matches(gamertag) {
            self.player_index = Some(event.player_index);
            self.summary.leader_id = event.leader_id;
        }
    }

    fn on_heartbeat(&mut self, event: ResourceHeartbeatEvent) {
        let Some(player_index) = self.player_index else {
            return;
        };
        let Some(resources) = event.player_resources.get(&player_index.to_string()) else {
            return;
        };

        if self.summary.tech2_ms.is_none()
            && self.previous_tech_level == 1
            && resources.tech_level == 2
        {
            self.summary.tech2_ms = Some(event.time_ms);
        }
        if self.summary.tech3_ms.is_none()
            && self.previous_tech_level == 2
            && resources.tech_level == 3
        {
            self.summary.tech3_ms = Some(event.time_ms);
        }

        // All checkpoints are evaluated against the same transition; a gap
        // in heartbeat cadence can satisfy several at once.
        for checkpoint in POPULATION_CHECKPOINTS_MS {
            if self.previous_heartbeat_ms < checkpoint && event.time_ms >= checkpoint {
                self.summary.population.push(resources.population);
            }
        }

        self.previous_heartbeat_ms = event.time_ms;
        self.previous_tech_level = resources.tech_level;
    }

    fn on_building_queued(&mut self, event: BuildingQueuedEvent) {
        if Some(event.player_index) != self.player_index || event.time_ms > EARLY_GAME_WINDOW_MS {
            return;
        }
        match classify_building(&event.building_id) {
            Some(BuildingKind::Turret) => self.pending_turrets.push(event.instance_id),
            Some(BuildingKind::Base) => self.pending_bases.push(event.instance_id),
            Some(BuildingKind::MiniBase) => self.pending_minis.push(event.instance_id),
            None => {}
        }
    }

    fn on_building_completed(&mut self, event: BuildingCompletedEvent) {
        // Removal from the pending set prevents a double count on any later
        // completion-like event for the same instance.
        if take_pending(&mut self.pending_turrets, event.instance_id) {
            self.summary.turrets_ms.push(event.time_ms);
        }
        if take_pending(&mut self.pending_bases, event.instance_id) {
            self.summary.bases_ms.push(event.time_ms);
        }
        if take_pending(&mut self.pending_minis, event.instance_id) {
            self.summary.minis_ms.push(event.time_ms);
        }
    }

    fn on_unit_trained(&mut self, event: UnitTrainedEvent) {
        if Some(event.player_index) != self.player_index
            || event.time_ms > EARLY_GAME_WINDOW_MS
            || tables::is_ignored_unit(&event.squad_id)
        {
            return;
        }
        *self.summary.units.entry(event.squad_id).or_insert(0) += 1;
    }

    fn into_summary(self) -> MatchSummary {
        self.summary
    }
}
