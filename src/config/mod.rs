pub mod playlists;
pub mod tables;

pub use playlists::GameMode;
