use serde_json::Value;

use crate::error::RatingError;

use super::stats::{keys, Stat, StatsMap};

const FEED: &str = "box score";

/// Regulation period length in minutes.
const REGULATION_PERIOD_MINUTES: i64 = 12;
/// Overtime period length in minutes.
const OVERTIME_PERIOD_MINUTES: i64 = 5;
/// Regulation game length in minutes (4 × 12).
const REGULATION_MINUTES: f64 = 48.0;

/// Derive shooting-efficiency and game-length statistics from a box-score
/// feed document.
///
/// Made/attempted counts are summed across both teams; percentages are
/// `made / attempted` with zero attempts reported as a hard error rather
/// than defaulted (a caller rating a batch decides whether to skip the game).
pub fn box_score_stats(raw: &Value) -> Result<StatsMap, RatingError> {
    let game = &raw["sports_content"]["game"];
    let visitor = &game["visitor"]["stats"];
    let home = &game["home"]["stats"];
    if visitor.is_null() {
        return Err(RatingError::malformed(FEED, "visitor.stats"));
    }
    if home.is_null() {
        return Err(RatingError::malformed(FEED, "home.stats"));
    }

    let mut stats = StatsMap::new();
    let categories = [
        (
            keys::FIELD_GOALS_MADE,
            keys::FIELD_GOALS_ATTEMPTED,
            keys::FIELD_GOALS_PERCENTAGE,
        ),
        (
            keys::FREE_THROWS_MADE,
            keys::FREE_THROWS_ATTEMPTED,
            keys::FREE_THROWS_PERCENTAGE,
        ),
        (
            keys::THREE_POINTERS_MADE,
            keys::THREE_POINTERS_ATTEMPTED,
            keys::THREE_POINTERS_PERCENTAGE,
        ),
    ];
    for (made_key, attempted_key, pct_key) in categories {
        let made = feed_int(visitor, made_key)? + feed_int(home, made_key)?;
        let attempted = feed_int(visitor, attempted_key)? + feed_int(home, attempted_key)?;
        if attempted == 0 {
            return Err(RatingError::DivisionByZero(pct_key));
        }
        stats.insert(made_key.to_string(), Stat::Num(made as f64));
        stats.insert(attempted_key.to_string(), Stat::Num(attempted as f64));
        stats.insert(
            pct_key.to_string(),
            Stat::Num(made as f64 / attempted as f64),
        );
    }

    let periods = feed_int(&game["period_time"], "period_value")?;
    stats.insert(
        keys::GAME_TIME_MULTIPLIER.to_string(),
        Stat::Num(game_time_multiplier(periods)),
    );

    Ok(stats)
}

/// Scaling factor normalising counting statistics for games that went to
/// overtime: estimated total minutes over the 48 regulation minutes.
fn game_time_multiplier(periods: i64) -> f64 {
    let minutes =
        periods.min(4) * REGULATION_PERIOD_MINUTES + (periods - 4).max(0) * OVERTIME_PERIOD_MINUTES;
    minutes as f64 / REGULATION_MINUTES
}

/// The NBA feeds encode integers as strings ("40"); some mirrors use plain
/// numbers. Accept both, error on anything else.
fn feed_int(block: &Value, field: &str) -> Result<i64, RatingError> {
    block[field]
        .as_str()
        .and_then(|s| s.trim().parse().ok())
        .or_else(|| block[field].as_i64())
        .ok_or_else(|| RatingError::malformed(FEED, field))
}
