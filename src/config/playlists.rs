use crate::domain::ids::PlaylistId;

const PLAYLIST_1VS1: &str = "548d864e-8666-430e-9140-8dd2ad8fbfcd";
const PLAYLIST_2VS2: &str = "379f9ee5-92ec-45d9-b5e5-9f30236cab00";
const PLAYLIST_3VS3: &str = "4a2cedcc-9098-4728-886f-60649896278d";

/// Ranked game mode, each bound to exactly one matchmaking playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameMode {
    OneVsOne,
    TwoVsTwo,
    ThreeVsThree,
}

impl GameMode {
    pub const ALL: [GameMode; 3] = [GameMode::OneVsOne, GameMode::TwoVsTwo, GameMode::ThreeVsThree];

    pub fn playlist_uuid(self) -> &'static str {
        match self {
            GameMode::OneVsOne => PLAYLIST_1VS1,
            GameMode::TwoVsTwo => PLAYLIST_2VS2,
            GameMode::ThreeVsThree => PLAYLIST_3VS3,
        }
    }

    pub fn playlist_id(self) -> PlaylistId {
        PlaylistId::trusted(self.playlist_uuid())
    }

    pub fn from_playlist_uuid(uuid: &str) -> Option<GameMode> {
        GameMode::ALL
            .into_iter()
            .find(|mode| mode.playlist_uuid().eq_ignore_ascii_case(uuid))
    }

    pub fn label(self) -> &'static str {
        match self {
            GameMode::OneVsOne => "1vs1",
            GameMode::TwoVsTwo => "2vs2",
            GameMode::ThreeVsThree => "3vs3",
        }
    }
}
