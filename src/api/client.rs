use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::{error, info, warn};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tokio::time::sleep;

use crate::api::throttle::RequestWindow;
use crate::domain::ids::{Gamertag, MatchId, PlaylistId};
use crate::errors::{ApiError, fetch_context};

const API_BASE_URL: &str = "https://www.haloapi.com/stats/hw2";
const API_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// The ratings endpoint accepts at most 6 gamertags per call.
const MAX_RATING_GAMERTAGS: usize = 6;

/// Halo Wars 2 statistics API client with a sliding-window throttle.
///
/// Clones share one request window, so every consumer of a cloned client
/// counts against the same global call-rate ceiling.
#[derive(Clone)]
pub struct HaloApiClient {
    client: Client,
    key: String,
    window: Arc<Mutex<RequestWindow>>,
}

impl HaloApiClient {
    /// Create a client with the default 10 calls / 10 seconds window.
    pub fn new(key: impl Into<String>) -> Result<Self> {
        Self::with_window(key, RequestWindow::default())
    }

    pub fn with_window(key: impl Into<String>, window: RequestWindow) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("hw2-scout/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            key: key.into(),
            window: Arc::new(Mutex::new(window)),
        })
    }

    /// Block until the sliding window admits another call.
    async fn throttle(&self) {
        loop {
            let wait = self
                .window
                .lock()
                .expect("request window mutex poisoned")
                .wait_needed(Instant::now());
            match wait {
                None => return,
                Some(delay) => {
                    info!("Reached max requests. Waiting for {:.1} seconds...", delay.as_secs_f64());
                    sleep(delay).await;
                }
            }
        }
    }

    /// Log a finished call attempt into the shared window.
    fn register_call(&self) {
        self.window
            .lock()
            .expect("request window mutex poisoned")
            .record(Instant::now());
    }

    /// Perform one throttled GET. 200 yields the JSON payload; 401 is fatal;
    /// anything else is logged and reported as an absent payload so the
    /// caller proceeds in degraded mode.
    async fn send(&self, url: &str, what: &str) -> Result<Option<Value>, ApiError> {
        self.throttle().await;
        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, &self.key)
            .send()
            .await;
        // Attempted calls count against the window, not just successful ones.
        self.register_call();

        let response = match response {
            Ok(response) => response,
            Err(err) => {
                warn!("{}: {}", fetch_context(url), err);
                return Ok(None);
            }
        };

        match response.status() {
            StatusCode::OK => match response.json::<Value>().await {
                Ok(payload) => Ok(Some(payload)),
                Err(err) => {
                    warn!("Got an unreadable body from the {} api: {}", what, err);
                    Ok(None)
                }
            },
            StatusCode::UNAUTHORIZED => {
                error!("Got code 401 while accessing the {} api. Please check your api key.", what);
                Err(ApiError::InvalidKey)
            }
            status => {
                error!("Error: Got code {} while accessing the {} api.", status.as_u16(), what);
                Ok(None)
            }
        }
    }

    /// Playlist ratings for up to 6 gamertags.
    pub async fn playlist_ratings(
        &self,
        playlist: &PlaylistId,
        gamertags: &[Gamertag],
    ) -> Result<Option<Value>, ApiError> {
        if gamertags.is_empty() {
            return Ok(None);
        }
        let players = gamertags
            .iter()
            .take(MAX_RATING_GAMERTAGS)
            .map(|gamertag| urlencoding::encode(gamertag.as_str()).into_owned())
            .collect::<Vec<_>>()
            .join(",");
        let url = format!(
            "{}/playlist/{}/rating?players={}",
            API_BASE_URL,
            playlist.as_str(),
            players
        );
        self.send(&url, "player playlist ratings").await
    }

    /// The player's most recent matchmaking matches (one service page).
    pub async fn match_history(&self, gamertag: &Gamertag) -> Result<Option<Value>, ApiError> {
        let url = format!(
            "{}/players/{}/matches?matchType=matchmaking",
            API_BASE_URL,
            urlencoding::encode(gamertag.as_str())
        );
        self.send(&url, "match history").await
    }

    /// Full telemetry event list for one match.
    pub async fn match_events(&self, match_id: &MatchId) -> Result<Option<Value>, ApiError> {
        let url = format!("{}/matches/{}/events", API_BASE_URL, match_id.as_str());
        self.send(&url, "match events").await
    }
}
