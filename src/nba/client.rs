use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use tracing::debug;

use super::endpoints;

/// Source of the three per-game feed documents. Seam for swapping the live
/// HTTP client for canned JSON in tests.
#[async_trait]
pub trait GameFeed: Send + Sync {
    /// All games played on the given date.
    async fn scoreboard(&self, date: NaiveDate) -> Result<serde_json::Value>;

    /// Aggregated box score for one game.
    async fn box_score(&self, date: NaiveDate, game_id: &str) -> Result<serde_json::Value>;

    /// Chronological play-by-play log for one game.
    async fn play_by_play(&self, date: NaiveDate, game_id: &str) -> Result<serde_json::Value>;
}

/// Feed client backed by the public data.nba.com JSON endpoints.
#[derive(Clone)]
pub struct NbaDataClient {
    http: Client,
    base_url: String,
}

impl NbaDataClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(NbaDataClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json(&self, url: &str) -> Result<serde_json::Value> {
        debug!("Fetching {}", url);
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .with_context(|| format!("Request failed: {}", url))?;

        if !resp.status().is_success() {
            anyhow::bail!("Feed error {} for {}", resp.status(), url);
        }

        resp.json()
            .await
            .with_context(|| format!("Failed to parse JSON from {}", url))
    }
}

#[async_trait]
impl GameFeed for NbaDataClient {
    async fn scoreboard(&self, date: NaiveDate) -> Result<serde_json::Value> {
        self.get_json(&endpoints::scoreboard(&self.base_url, date))
            .await
    }

    async fn box_score(&self, date: NaiveDate, game_id: &str) -> Result<serde_json::Value> {
        self.get_json(&endpoints::box_score(&self.base_url, date, game_id))
            .await
    }

    async fn play_by_play(&self, date: NaiveDate, game_id: &str) -> Result<serde_json::Value> {
        self.get_json(&endpoints::play_by_play(&self.base_url, date, game_id))
            .await
    }
}
