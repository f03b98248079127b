//! URL templates for the data.nba.com JSON feeds.
//!
//! Pure string templating keyed by date and game id; the base URL is passed
//! in so tests and the CLI can point at a mirror.

use chrono::NaiveDate;

/// Default public feed host.
pub const DEFAULT_BASE_URL: &str = "http://data.nba.com/data/5s/json/cms";

fn feed_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Scoreboard listing every game played on `date`.
pub fn scoreboard(base_url: &str, date: NaiveDate) -> String {
    format!("{}/noseason/scoreboard/{}/games.json", base_url, feed_date(date))
}

/// Full box score for one game.
pub fn box_score(base_url: &str, date: NaiveDate, game_id: &str) -> String {
    format!(
        "{}/noseason/game/{}/{}/boxscore.json",
        base_url,
        feed_date(date),
        game_id
    )
}

/// Complete play-by-play log for one game.
pub fn play_by_play(base_url: &str, date: NaiveDate, game_id: &str) -> String {
    format!(
        "{}/noseason/game/{}/{}/pbp_all.json",
        base_url,
        feed_date(date),
        game_id
    )
}
