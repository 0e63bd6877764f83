use std::path::PathBuf;

use clap::{ArgGroup, Parser};

use crate::cache::DEFAULT_MAX_AGE_DAYS;
use crate::config::GameMode;

/// Fetch and summarize recent ranked Halo Wars 2 matches for the players of
/// a lobby. The game mode follows from which player slots are filled.
#[derive(Debug, Parser)]
#[command(name = "hw2-scout", version, about)]
#[command(group = ArgGroup::new("lead").required(true).args(["red", "blue"]))]
pub struct Cli {
    /// Red team player one
    #[arg(short, long)]
    pub red: Option<String>,

    /// Red team player two
    #[arg(short, long, requires = "red")]
    pub yellow: Option<String>,

    /// Red team player three
    #[arg(short, long, requires = "yellow")]
    pub orange: Option<String>,

    /// Blue team player one
    #[arg(short, long)]
    pub blue: Option<String>,

    /// Blue team player two
    #[arg(short, long, requires = "blue")]
    pub cyan: Option<String>,

    /// Blue team player three
    #[arg(short, long, requires = "cyan")]
    pub green: Option<String>,

    /// API key for the statistics service (falls back to HW2_API_KEY)
    #[arg(short, long)]
    pub key: Option<String>,

    /// Directory holding the match events cache
    #[arg(long, default_value = "cache/matches/events")]
    pub cache_dir: PathBuf,

    /// Days to keep cached match events before pruning
    #[arg(long, default_value_t = DEFAULT_MAX_AGE_DAYS)]
    pub cache_days: i64,
}

impl Cli {
    /// Game mode implied by the populated player slots.
    pub fn mode(&self) -> GameMode {
        if self.green.is_some() || self.orange.is_some() {
            GameMode::ThreeVsThree
        } else if self.cyan.is_some() || self.yellow.is_some() {
            GameMode::TwoVsTwo
        } else {
            GameMode::OneVsOne
        }
    }

    /// Populated player slots in display order.
    pub fn players(&self) -> Vec<(&'static str, &str)> {
        let slots = [
            ("red", &self.red),
            ("yellow", &self.yellow),
            ("orange", &self.orange),
            ("blue", &self.blue),
            ("cyan", &self.cyan),
            ("green", &self.green),
        ];
        slots
            .into_iter()
            .filter_map(|(slot, value)| value.as_deref().map(|gamertag| (slot, gamertag)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_follows_the_filled_slots() {
        let cli = Cli::try_parse_from(["hw2-scout", "--red", "a"]).unwrap();
        assert_eq!(cli.mode(), GameMode::OneVsOne);

        let cli = Cli::try_parse_from(["hw2-scout", "--blue", "a", "--cyan", "b"]).unwrap();
        assert_eq!(cli.mode(), GameMode::TwoVsTwo);

        let cli =
            Cli::try_parse_from(["hw2-scout", "--blue", "a", "--cyan", "b", "--green", "c"])
                .unwrap();
        assert_eq!(cli.mode(), GameMode::ThreeVsThree);
    }

    #[test]
    fn a_lead_player_is_required() {
        assert!(Cli::try_parse_from(["hw2-scout"]).is_err());
        assert!(Cli::try_parse_from(["hw2-scout", "--cyan", "b"]).is_err());
    }

    #[test]
    fn third_slot_requires_the_second() {
        assert!(Cli::try_parse_from(["hw2-scout", "--red", "a", "--orange", "c"]).is_err());
        assert!(
            Cli::try_parse_from(["hw2-scout", "--red", "a", "--yellow", "b", "--orange", "c"])
                .is_ok()
        );
    }
}
