pub mod consolidator;
pub mod format;
pub mod history;
pub mod ratings;

pub use consolidator::{HaloStatsSource, PlayerReportBuilder, StatsSource};
pub use history::{MAX_DEEP_MATCHES, MatchHistory};
pub use ratings::RatingTriple;
