pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod stats;
pub mod telemetry;

pub use api::HaloApiClient;
pub use cache::EventCache;
pub use config::GameMode;
pub use domain::{Gamertag, PlayerReport};
pub use errors::ApiError;
pub use stats::{HaloStatsSource, PlayerReportBuilder};
