use std::collections::HashMap;

use log::debug;
use serde::Deserialize;
use serde_json::Value;

/// One decoded telemetry event, tagged by its `EventName` field.
///
/// Fields that an event is meaningless without are required, so a malformed
/// event fails to decode and is skipped instead of aborting the pass.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "EventName")]
pub enum TelemetryEvent {
    MatchStart(MatchStartEvent),
    PlayerJoinedMatch(PlayerJoinedEvent),
    ResourceHeartbeat(ResourceHeartbeatEvent),
    BuildingConstructionQueued(BuildingQueuedEvent),
    BuildingConstructionCompleted(BuildingCompletedEvent),
    UnitTrained(UnitTrainedEvent),
    MatchEnd(MatchEndEvent),
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MatchStartEvent {
    #[serde(rename = "GameMode")]
    pub game_mode: Option<Value>,
    #[serde(rename = "MatchType")]
    pub match_type: Option<Value>,
    #[serde(rename = "PlaylistId")]
    pub playlist_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerJoinedEvent {
    #[serde(rename = "PlayerIndex")]
    pub player_index: i64,
    #[serde(rename = "HumanPlayerId", default)]
    pub human_player_id: Option<HumanPlayerId>,
    #[serde(rename = "LeaderId", default)]
    pub leader_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HumanPlayerId {
    #[serde(rename = "Gamertag")]
    pub gamertag: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResourceHeartbeatEvent {
    #[serde(rename = "TimeSinceStartMilliseconds")]
    pub time_ms: u64,
    #[serde(rename = "PlayerResources")]
    pub player_resources: HashMap<String, PlayerResourceState>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerResourceState {
    #[serde(rename = "TechLevel")]
    pub tech_level: u32,
    #[serde(rename = "Population")]
    pub population: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BuildingQueuedEvent {
    #[serde(rename = "TimeSinceStartMilliseconds")]
    pub time_ms: u64,
    #[serde(rename = "PlayerIndex")]
    pub player_index: i64,
    #[serde(rename = "BuildingId")]
    pub building_id: String,
    #[serde(rename = "InstanceId")]
    pub instance_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BuildingCompletedEvent {
    #[serde(rename = "TimeSinceStartMilliseconds")]
    pub time_ms: u64,
    #[serde(rename = "InstanceId")]
    pub instance_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UnitTrainedEvent {
    #[serde(rename = "TimeSinceStartMilliseconds")]
    pub time_ms: u64,
    #[serde(rename = "PlayerIndex")]
    pub player_index: i64,
    #[serde(rename = "SquadId")]
    pub squad_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchEndEvent {
    #[serde(rename = "ActivePlaytimeMilliseconds")]
    pub active_playtime_ms: u64,
}

/// Decode one raw event, skipping malformed entries.
pub fn decode_event(raw: &Value) -> Option<TelemetryEvent> {
    match serde_json::from_value(raw.clone()) {
        Ok(event) => Some(event),
        Err(err) => {
            debug!("Skipping malformed telemetry event: {}", err);
            None
        }
    }
}

/// The ordered event list inside a match-events payload.
pub fn game_events(payload: &Value) -> &[Value] {
    payload
        .get("GameEvents")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_event_names_decode_as_other() {
        let raw = json!({"EventName": "PointCaptured", "PointId": 3});
        assert!(matches!(decode_event(&raw), Some(TelemetryEvent::Other)));
    }

    #[test]
    fn malformed_known_event_is_skipped() {
        // UnitTrained without its squad id cannot be counted.
        let raw = json!({"EventName": "UnitTrained", "TimeSinceStartMilliseconds": 1000, "PlayerIndex": 1});
        assert!(decode_event(&raw).is_none());
    }

    #[test]
    fn game_events_tolerates_missing_list() {
        assert!(game_events(&json!({})).is_empty());
        assert_eq!(game_events(&json!({"GameEvents": [{"EventName": "MatchEnd"}]})).len(), 1);
    }
}
