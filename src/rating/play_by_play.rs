use serde_json::Value;

use crate::error::RatingError;

use super::stats::{keys, Stat, StatsMap};

const FEED: &str = "play-by-play";

/// Last-two-minutes window, in seconds remaining in the period.
const LAST_MINUTES_SECONDS: u32 = 120;
/// Below this many seconds remaining the shot clock is switched off.
const SHOT_CLOCK_SECONDS: u32 = 24;

/// One entry of the chronological play-by-play log, with the clock already
/// normalised to seconds remaining in the period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayEvent {
    /// 1-indexed; 1–4 regulation, 5 and up overtime.
    pub period: u32,
    /// Seconds remaining in the period; 0 when the feed clock was absent or
    /// unparseable.
    pub clock_seconds: u32,
    pub home_score: i64,
    pub visitor_score: i64,
}

/// Derive lead-change and margin-dynamics statistics from a play-by-play
/// feed document.
pub fn play_by_play_stats(raw: &Value) -> Result<StatsMap, RatingError> {
    let events = parse_play_events(raw)?;
    stats_from_events(&events)
}

/// Fold an ordered event sequence into the derived statistics. Order
/// matters: the scan compares each event against the previously recorded
/// score, so the caller must pass events chronologically.
pub fn stats_from_events(events: &[PlayEvent]) -> Result<StatsMap, RatingError> {
    let mut scan = ScoreScan::default();
    for event in events {
        scan.step(event);
    }
    scan.into_stats()
}

/// Accumulator for the single forward pass over the play log.
///
/// Margins are home minus visitor. The feed re-iterates the current score on
/// non-scoring plays (fouls, substitutions), so only events where the score
/// actually moved update the margin statistics.
#[derive(Debug, Default)]
struct ScoreScan {
    prev_home: i64,
    prev_visitor: i64,
    min_margin: i64,
    max_margin: i64,
    end_margin: i64,
    margin_abs_sum: i64,
    score_changes: u64,
    periods: u32,
    /// (period, seconds remaining) of each change of leading team.
    lead_changes: Vec<(u32, u32)>,
}

impl ScoreScan {
    fn step(&mut self, event: &PlayEvent) {
        self.periods = self.periods.max(event.period);
        if event.home_score != self.prev_home || event.visitor_score != self.prev_visitor {
            let prev_margin = self.prev_home - self.prev_visitor;
            let margin = event.home_score - event.visitor_score;
            self.max_margin = self.max_margin.max(margin);
            self.min_margin = self.min_margin.min(margin);
            self.end_margin = margin;
            // Leading team changed. A side that was strictly ahead is now
            // tied or behind; changes starting from a tie do not count.
            if (prev_margin > 0 && margin <= 0) || (prev_margin < 0 && margin >= 0) {
                self.lead_changes.push((event.period, event.clock_seconds));
            }
            self.margin_abs_sum += margin.abs();
            self.score_changes += 1;
        }
        self.prev_home = event.home_score;
        self.prev_visitor = event.visitor_score;
    }

    fn into_stats(self) -> Result<StatsMap, RatingError> {
        if self.score_changes == 0 {
            return Err(RatingError::DivisionByZero(keys::AVERAGE_PTS_DIFFERENCE));
        }

        let mut per_period = vec![0u32; self.periods as usize];
        for &(period, _) in &self.lead_changes {
            if period >= 1 && period <= self.periods {
                per_period[(period - 1) as usize] += 1;
            }
        }
        let in_last_minutes = self
            .lead_changes
            .iter()
            .filter(|(period, clock)| *period >= 4 && *clock <= LAST_MINUTES_SECONDS)
            .count();
        let shot_clock_off = self
            .lead_changes
            .iter()
            .filter(|(period, clock)| *period >= 4 && *clock < SHOT_CLOCK_SECONDS)
            .count();

        let mut stats = StatsMap::new();
        stats.insert(
            keys::LC_TOTAL.to_string(),
            Stat::Num(self.lead_changes.len() as f64),
        );
        stats.insert(keys::LC_PER_PERIOD.to_string(), Stat::PerPeriod(per_period));
        stats.insert(
            keys::LC_IN_LAST_MINUTES.to_string(),
            Stat::Num(in_last_minutes as f64),
        );
        stats.insert(
            keys::LC_WHEN_SHOT_CLOCK_OFF.to_string(),
            Stat::Num(shot_clock_off as f64),
        );
        stats.insert(
            keys::PTS_AMPLITUDE.to_string(),
            Stat::Num(self.min_margin.abs().max(self.max_margin) as f64),
        );
        stats.insert(
            keys::PTS_PEAK_TO_PEAK_AMPLITUDE.to_string(),
            Stat::Num((self.max_margin - self.min_margin) as f64),
        );
        stats.insert(
            keys::PTS_END_DIFFERENCE.to_string(),
            Stat::Num(self.end_margin.abs() as f64),
        );
        stats.insert(
            keys::AVERAGE_PTS_DIFFERENCE.to_string(),
            Stat::Num(self.margin_abs_sum as f64 / self.score_changes as f64),
        );
        Ok(stats)
    }
}

/// Extract the ordered event list from the feed document.
pub fn parse_play_events(raw: &Value) -> Result<Vec<PlayEvent>, RatingError> {
    let plays = raw["sports_content"]["game"]["play"]
        .as_array()
        .ok_or_else(|| RatingError::malformed(FEED, "play"))?;

    plays
        .iter()
        .map(|play| {
            Ok(PlayEvent {
                period: feed_int(play, "period")? as u32,
                clock_seconds: parse_clock(play["clock"].as_str().unwrap_or("")),
                home_score: feed_int(play, "home_score")?,
                visitor_score: feed_int(play, "visitor_score")?,
            })
        })
        .collect()
}

/// Parse a `"MM:SS"` period clock into seconds remaining. The feed leaves
/// the clock empty on some administrative events; anything that is not two
/// numeric fields counts as 0.
pub fn parse_clock(clock: &str) -> u32 {
    let mut parts = clock.splitn(2, ':');
    match (parts.next(), parts.next()) {
        (Some(minutes), Some(seconds)) => {
            match (minutes.trim().parse::<u32>(), seconds.trim().parse::<u32>()) {
                (Ok(m), Ok(s)) => m * 60 + s,
                _ => 0,
            }
        }
        _ => 0,
    }
}

fn feed_int(play: &Value, field: &str) -> Result<i64, RatingError> {
    play[field]
        .as_str()
        .and_then(|s| s.trim().parse().ok())
        .or_else(|| play[field].as_i64())
        .ok_or_else(|| RatingError::malformed(FEED, field))
}
