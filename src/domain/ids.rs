use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static UUID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("invalid uuid pattern")
});

static GAMERTAG_STRIP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9\s_-]").expect("invalid gamertag pattern"));

/// Sanitized player display name.
///
/// Holds only letters, digits, spaces and hyphens; underscores are normalized
/// to spaces on construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Gamertag(String);

impl Gamertag {
    /// Sanitize a raw gamertag. Returns `None` when nothing valid remains.
    pub fn parse(raw: &str) -> Option<Self> {
        let stripped = GAMERTAG_STRIP_PATTERN.replace_all(raw, "");
        let normalized = stripped.replace('_', " ");
        if normalized.is_empty() {
            return None;
        }
        Some(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison against a name embedded in telemetry.
    pub fn matches(&self, other: &str) -> bool {
        self.0.to_lowercase() == other.to_lowercase()
    }
}

impl fmt::Display for Gamertag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonical-form match UUID, validated before any network or cache use.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MatchId(String);

impl MatchId {
    pub fn parse(raw: &str) -> Option<Self> {
        UUID_PATTERN.is_match(raw).then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonical-form playlist UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PlaylistId(String);

impl PlaylistId {
    pub fn parse(raw: &str) -> Option<Self> {
        UUID_PATTERN.is_match(raw).then(|| Self(raw.to_string()))
    }

    /// Wrap a compile-time playlist constant, already in canonical form.
    pub(crate) fn trusted(uuid: &'static str) -> Self {
        Self(uuid.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gamertag_is_sanitized() {
        let tag = Gamertag::parse("Some_Player!#1").unwrap();
        assert_eq!(tag.as_str(), "Some Player1");
    }

    #[test]
    fn empty_gamertag_is_invalid() {
        assert!(Gamertag::parse("!!!").is_none());
        assert!(Gamertag::parse("").is_none());
    }

    #[test]
    fn gamertag_matches_ignores_case() {
        let tag = Gamertag::parse("IronFist").unwrap();
        assert!(tag.matches("ironfist"));
        assert!(tag.matches("IRONFIST"));
        assert!(!tag.matches("ironfists"));
    }

    #[test]
    fn match_id_requires_canonical_uuid() {
        assert!(MatchId::parse("548d864e-8666-430e-9140-8dd2ad8fbfcd").is_some());
        assert!(MatchId::parse("548d864e-8666-430e-9140").is_none());
        assert!(MatchId::parse("not-a-uuid").is_none());
        assert!(MatchId::parse("548d864e-8666-430e-9140-8dd2ad8fbfcd ").is_none());
    }
}
