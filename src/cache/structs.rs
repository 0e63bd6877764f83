use std::fs;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde_json::Value;

use crate::domain::ids::MatchId;
use crate::errors::{ApiError, cache_context, parse_context};

pub const DEFAULT_MAX_AGE_DAYS: i64 = 7;

/// File-based cache for per-match telemetry payloads.
///
/// Match telemetry is immutable history, so entries are written once and
/// never updated. Eviction happens only through an explicit [`prune`] call.
///
/// [`prune`]: EventCache::prune
pub struct EventCache {
    cache_dir: PathBuf,
}

impl EventCache {
    /// Create a cache instance rooted at the given directory.
    pub fn new<P: AsRef<Path>>(cache_dir: P) -> Result<Self> {
        let cache_dir = cache_dir.as_ref().to_path_buf();

        fs::create_dir_all(&cache_dir).context("Failed to create cache directory")?;

        Ok(Self { cache_dir })
    }

    fn entry_path(&self, match_id: &MatchId) -> PathBuf {
        self.cache_dir.join(format!("{}.json", match_id.as_str()))
    }

    /// Load a cached payload. `Ok(None)` is a miss; errors mean the storage
    /// itself failed and must not be mistaken for a miss.
    pub fn load(&self, match_id: &MatchId) -> Result<Option<Value>> {
        let file_path = self.entry_path(match_id);

        let json = match fs::read_to_string(&file_path) {
            Ok(json) => json,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| cache_context("read", match_id.as_str()));
            }
        };

        let payload =
            serde_json::from_str(&json).with_context(|| parse_context("cached match events"))?;

        debug!("Loaded match events from cache: {}", file_path.display());
        Ok(Some(payload))
    }

    /// Persist a payload keyed by match id. Written to a temporary file and
    /// renamed into place, so a half-written entry is never served as a hit.
    pub fn store(&self, match_id: &MatchId, payload: &Value) -> Result<()> {
        let file_path = self.entry_path(match_id);
        let tmp_path = self.cache_dir.join(format!("{}.json.tmp", match_id.as_str()));

        let json = serde_json::to_string_pretty(payload)
            .with_context(|| parse_context("match events payload"))?;

        fs::write(&tmp_path, json).with_context(|| cache_context("write", match_id.as_str()))?;
        fs::rename(&tmp_path, &file_path)
            .with_context(|| cache_context("commit", match_id.as_str()))?;

        info!("Saved match events to cache: {}", file_path.display());
        Ok(())
    }

    /// Return the cached payload for a match, fetching and persisting it on
    /// a miss. A failed fetch writes nothing, so it never poisons the cache.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        match_id: &MatchId,
        fetch: F,
    ) -> Result<Option<Value>, ApiError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<Value>, ApiError>>,
    {
        if let Some(payload) = self.load(match_id)? {
            return Ok(Some(payload));
        }

        let fetched = fetch().await?;
        if let Some(payload) = &fetched {
            self.store(match_id, payload)?;
        }
        Ok(fetched)
    }

    /// Delete entries whose last-write time is older than `max_age_days`.
    ///
    /// Explicitly invoked, never triggered by lookups. Idempotent, and safe
    /// to run while other keys are being read.
    pub fn prune(&self, max_age_days: i64) -> Result<()> {
        let now = Utc::now();
        let entries = fs::read_dir(&self.cache_dir).context("Failed to read cache directory")?;

        for entry in entries {
            let entry = entry.context("Failed to read cache directory entry")?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let modified = match entry.metadata().and_then(|meta| meta.modified()) {
                Ok(modified) => modified,
                Err(err) => {
                    warn!(
                        "Skipping cache entry without a modification time: {}: {}",
                        path.display(),
                        err
                    );
                    continue;
                }
            };

            let modified: DateTime<Utc> = modified.into();
            if (now - modified).num_days() > max_age_days {
                match fs::remove_file(&path) {
                    Ok(()) => info!("Deleted cached match: {}", path.display()),
                    // A concurrent prune already removed it.
                    Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                    Err(err) => {
                        return Err(err)
                            .with_context(|| cache_context("delete", &path.display().to_string()));
                    }
                }
            }
        }
        Ok(())
    }
}
