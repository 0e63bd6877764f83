use log::warn;
use serde_json::Value;

use crate::config::tables;
use crate::domain::ids::Gamertag;
use crate::domain::models::{HistoryMatch, ModeRating, RatingsResponse};

/// Raw rating triple for one mode, before display formatting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingTriple {
    pub mmr: Option<f64>,
    pub tier: Option<i64>,
    pub designation: Option<i64>,
}

impl RatingTriple {
    /// Extract the triple carried by a match-history entry.
    pub fn from_history_entry(entry: &HistoryMatch) -> Self {
        let progress = entry.rating_progress.as_ref();
        Self {
            mmr: progress.and_then(|p| p.updated_mmr.as_ref()).and_then(|mmr| mmr.rating),
            tier: progress.and_then(|p| p.updated_csr.as_ref()).and_then(|csr| csr.tier),
            designation: progress
                .and_then(|p| p.updated_csr.as_ref())
                .and_then(|csr| csr.designation),
        }
    }

    /// Extract the triple for one gamertag from a playlist-ratings payload.
    pub fn from_ratings_payload(payload: &Value, gamertag: &Gamertag) -> Self {
        let response = match serde_json::from_value::<RatingsResponse>(payload.clone()) {
            Ok(response) => response,
            Err(err) => {
                warn!("Failed to parse playlist ratings: {}", err);
                return Self::default();
            }
        };

        let row = response.results.iter().find(|row| {
            row.id.as_deref().is_some_and(|id| gamertag.matches(id))
        });
        let Some(result) = row.and_then(|row| row.result.as_ref()) else {
            return Self::default();
        };

        Self {
            mmr: result.mmr.as_ref().and_then(|mmr| mmr.rating),
            tier: result.csr.as_ref().and_then(|csr| csr.tier),
            designation: result.csr.as_ref().and_then(|csr| csr.designation),
        }
    }

    /// Fill in whatever this triple is missing from a fallback lookup.
    pub fn merge_missing(&mut self, fallback: RatingTriple) {
        if self.mmr.is_none() {
            self.mmr = fallback.mmr;
        }
        if self.tier.is_none() {
            self.tier = fallback.tier;
        }
        if self.designation.is_none() {
            self.designation = fallback.designation;
        }
    }

    /// Produce the display rating: rounded MMR, labelled designation, and
    /// the composite rank only when both of its parts are present.
    pub fn into_mode_rating(self) -> ModeRating {
        let mmr = self.mmr.map(|value| (value * 100.0).round() / 100.0);
        let tier = self.tier.map(|tier| tier.to_string());
        let designation = self
            .designation
            .and_then(tables::designation_label)
            .map(str::to_string);
        let csr = match (&tier, &designation) {
            (Some(tier), Some(designation)) => Some(format!("{} {}", tier, designation)),
            _ => None,
        };
        ModeRating {
            mmr,
            tier,
            designation,
            csr,
        }
    }
}
