mod aggregator;
pub mod events;

pub use aggregator::{POPULATION_CHECKPOINTS_MS, aggregate};
pub use events::{TelemetryEvent, game_events};
