use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use futures_util::{stream, StreamExt};
use tracing::{info, warn};

mod config;
mod error;
mod nba;
mod rating;
mod report;

use config::Config;
use nba::{parse_scoreboard, GameFeed, GameSummary, NbaDataClient};
use report::RatedGame;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    let client = NbaDataClient::new(
        &config.api_base_url,
        Duration::from_secs(config.http_timeout_secs),
    )?;
    let feed: Arc<dyn GameFeed> = Arc::new(client);

    let mut games = Vec::new();
    for date in config.requested_dates() {
        match rate_games_on(feed.as_ref(), date, config.concurrency).await {
            Ok(mut rated) => {
                info!("{}: rated {} game(s)", date, rated.len());
                games.append(&mut rated);
            }
            Err(e) => warn!("Skipping {}: {:#}", date, e),
        }
    }

    if games.is_empty() {
        info!("No games rated");
        return Ok(());
    }

    report::sort_by_rating(&mut games);

    if let Some(path) = &config.output_csv {
        report::write_csv(path, &games)?;
        info!("Details saved to {}", path);
    }

    report::print_listing(&games);

    Ok(())
}

/// Rate every game on the scoreboard for one date. Games are independent,
/// so they are fetched and rated with bounded concurrency; a game whose
/// feeds are malformed or degenerate is logged and dropped while the rest
/// of the day continues.
async fn rate_games_on(
    feed: &dyn GameFeed,
    date: NaiveDate,
    concurrency: usize,
) -> Result<Vec<RatedGame>> {
    let scoreboard = feed.scoreboard(date).await?;
    let summaries = parse_scoreboard(&scoreboard);

    let results: Vec<(GameSummary, Result<RatedGame>)> = stream::iter(summaries)
        .map(|game| async move {
            let result = rate_game(feed, date, &game).await;
            (game, result)
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    Ok(results
        .into_iter()
        .filter_map(|(game, result)| match result {
            Ok(rated) => Some(rated),
            Err(e) => {
                warn!("Skipping game {} ({}): {:#}", game.id, game.name, e);
                None
            }
        })
        .collect())
}

/// Fetch both feeds for one game, derive and merge the statistics, and rate
/// the result.
async fn rate_game(feed: &dyn GameFeed, date: NaiveDate, game: &GameSummary) -> Result<RatedGame> {
    let (box_score, play_by_play) = tokio::try_join!(
        feed.box_score(date, &game.id),
        feed.play_by_play(date, &game.id)
    )?;

    let stats = rating::merge_stats(
        rating::box_score_stats(&box_score)?,
        rating::play_by_play_stats(&play_by_play)?,
    )?;
    let rated = rating::rate(&stats)?;

    Ok(RatedGame {
        id: game.id.clone(),
        name: game.name.clone(),
        rating: rated.overall,
        partials: rated.partials,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::stats::{keys, num};
    use approx::assert_relative_eq;
    use async_trait::async_trait;
    use serde_json::{json, Value};

    /// Canned feed documents standing in for data.nba.com.
    struct StubFeed {
        scoreboard: Value,
        box_score: Value,
        play_by_play: Value,
    }

    #[async_trait]
    impl GameFeed for StubFeed {
        async fn scoreboard(&self, _date: NaiveDate) -> Result<Value> {
            Ok(self.scoreboard.clone())
        }

        async fn box_score(&self, _date: NaiveDate, _game_id: &str) -> Result<Value> {
            Ok(self.box_score.clone())
        }

        async fn play_by_play(&self, _date: NaiveDate, _game_id: &str) -> Result<Value> {
            Ok(self.play_by_play.clone())
        }
    }

    fn scoreboard_fixture() -> Value {
        json!({
            "sports_content": { "games": { "game": [
                { "id": "0021501000", "game_url": "20160314/CHIMIA" },
            ]}}
        })
    }

    fn box_score_fixture() -> Value {
        let side = json!({
            "stats": {
                "field_goals_made": "20",
                "field_goals_attempted": "40",
                "free_throws_made": "10",
                "free_throws_attempted": "15",
                "three_pointers_made": "5",
                "three_pointers_attempted": "12",
            }
        });
        json!({
            "sports_content": {
                "game": {
                    "visitor": side,
                    "home": side,
                    "period_time": { "period_value": "4" },
                }
            }
        })
    }

    fn play(period: u32, clock: &str, home: u32, visitor: u32) -> Value {
        json!({
            "period": period.to_string(),
            "clock": clock,
            "home_score": home.to_string(),
            "visitor_score": visitor.to_string(),
        })
    }

    /// Two lead changes in the final 90 seconds of regulation.
    fn play_by_play_fixture() -> Value {
        json!({
            "sports_content": { "game": { "play": [
                play(1, "10:00", 2, 0),
                play(2, "6:00", 40, 38),
                play(3, "6:00", 60, 58),
                play(4, "1:30", 80, 81),
                play(4, "0:45", 82, 81),
            ]}}
        })
    }

    fn stub() -> StubFeed {
        StubFeed {
            scoreboard: scoreboard_fixture(),
            box_score: box_score_fixture(),
            play_by_play: play_by_play_fixture(),
        }
    }

    fn partial(game: &RatedGame, name: &str) -> f64 {
        game.partials
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, s)| *s)
            .unwrap()
    }

    #[tokio::test]
    async fn end_to_end_synthetic_game() {
        let feed = stub();
        let date = NaiveDate::from_ymd_opt(2016, 3, 14).unwrap();
        let games = rate_games_on(&feed, date, 4).await.unwrap();
        assert_eq!(games.len(), 1);

        let game = &games[0];
        assert_eq!(game.id, "0021501000");
        assert_eq!(game.name, "20160314/CHIMIA");

        // 40/80 combined field goals → 50% → calibrated score 0.5.
        assert_relative_eq!(num(&game.stats, keys::FIELD_GOALS_PERCENTAGE).unwrap(), 0.5);
        assert_relative_eq!(partial(game, "field_goals"), 0.5);

        // Both final-90-second lead changes land in the last-minutes window,
        // which saturates its curve at 2.
        assert_relative_eq!(num(&game.stats, keys::LC_IN_LAST_MINUTES).unwrap(), 2.0);
        assert_relative_eq!(partial(game, "last_minutes_lc"), 1.0);

        assert!(game.rating > 0.0 && game.rating <= 1.0);
    }

    #[tokio::test]
    async fn degenerate_game_is_skipped_not_defaulted() {
        // A play log that never changes the score makes the average margin
        // a division by zero; the game must drop out of the batch.
        let feed = StubFeed {
            play_by_play: json!({
                "sports_content": { "game": { "play": [
                    play(1, "12:00", 0, 0),
                ]}}
            }),
            ..stub()
        };
        let date = NaiveDate::from_ymd_opt(2016, 3, 14).unwrap();
        let games = rate_games_on(&feed, date, 4).await.unwrap();
        assert!(games.is_empty());
    }

    #[tokio::test]
    async fn empty_scoreboard_rates_nothing() {
        let feed = StubFeed {
            scoreboard: json!({}),
            ..stub()
        };
        let date = NaiveDate::from_ymd_opt(2016, 3, 14).unwrap();
        let games = rate_games_on(&feed, date, 4).await.unwrap();
        assert!(games.is_empty());
    }
}
