pub mod ids;
pub mod models;

pub use ids::{Gamertag, MatchId, PlaylistId};
pub use models::*;
