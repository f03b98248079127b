use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::RatingError;

/// A single derived statistic. Everything is numeric except the per-period
/// lead-change counts, which stay a sequence so the rating criteria can sum
/// arbitrary period windows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Stat {
    Num(f64),
    PerPeriod(Vec<u32>),
}

impl Stat {
    pub fn as_num(&self) -> Option<f64> {
        match self {
            Stat::Num(v) => Some(*v),
            Stat::PerPeriod(_) => None,
        }
    }

    pub fn as_per_period(&self) -> Option<&[u32]> {
        match self {
            Stat::PerPeriod(v) => Some(v),
            Stat::Num(_) => None,
        }
    }
}

/// Flat mapping from statistic name to value. Ordered so that table and CSV
/// output have a stable column order.
pub type StatsMap = BTreeMap<String, Stat>;

/// Well-known statistic names shared by the extractors and the rating
/// criteria table.
pub mod keys {
    pub const FIELD_GOALS_MADE: &str = "field_goals_made";
    pub const FIELD_GOALS_ATTEMPTED: &str = "field_goals_attempted";
    pub const FIELD_GOALS_PERCENTAGE: &str = "field_goals_percentage";
    pub const FREE_THROWS_MADE: &str = "free_throws_made";
    pub const FREE_THROWS_ATTEMPTED: &str = "free_throws_attempted";
    pub const FREE_THROWS_PERCENTAGE: &str = "free_throws_percentage";
    pub const THREE_POINTERS_MADE: &str = "three_pointers_made";
    pub const THREE_POINTERS_ATTEMPTED: &str = "three_pointers_attempted";
    pub const THREE_POINTERS_PERCENTAGE: &str = "three_pointers_percentage";
    pub const GAME_TIME_MULTIPLIER: &str = "game_time_multiplier";

    pub const LC_TOTAL: &str = "lc_total";
    pub const LC_PER_PERIOD: &str = "lc_per_period";
    pub const LC_IN_LAST_MINUTES: &str = "lc_in_last_minutes";
    pub const LC_WHEN_SHOT_CLOCK_OFF: &str = "lc_when_shot_clock_off";
    pub const PTS_AMPLITUDE: &str = "pts_amplitude";
    pub const PTS_PEAK_TO_PEAK_AMPLITUDE: &str = "pts_peak_to_peak_amplitude";
    pub const PTS_END_DIFFERENCE: &str = "pts_end_difference";
    pub const AVERAGE_PTS_DIFFERENCE: &str = "average_pts_difference";
}

/// Merge the box-score and play-by-play statistic maps into one.
///
/// The two extractors produce disjoint key sets, so this is a plain union;
/// a collision means one of them grew a key it should not have and is
/// reported as a hard error rather than silently overwritten.
pub fn merge_stats(a: StatsMap, b: StatsMap) -> Result<StatsMap, RatingError> {
    let mut merged = a;
    for (key, value) in b {
        if merged.contains_key(&key) {
            return Err(RatingError::StatCollision(key));
        }
        merged.insert(key, value);
    }
    Ok(merged)
}

/// Fetch a numeric statistic by name.
pub fn num(stats: &StatsMap, key: &'static str) -> Result<f64, RatingError> {
    stats
        .get(key)
        .and_then(Stat::as_num)
        .ok_or(RatingError::UnknownStat(key))
}

/// Fetch the per-period lead-change counts.
pub fn per_period<'a>(stats: &'a StatsMap, key: &'static str) -> Result<&'a [u32], RatingError> {
    stats
        .get(key)
        .and_then(Stat::as_per_period)
        .ok_or(RatingError::UnknownStat(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_of(entries: &[(&str, Stat)]) -> StatsMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn merge_disjoint_maps_is_union() {
        let a = map_of(&[("x", Stat::Num(1.0))]);
        let b = map_of(&[("y", Stat::Num(2.0))]);
        let merged = merge_stats(a, b).unwrap();
        assert_eq!(merged.len(), 2);
        assert_eq!(num(&merged, "x").unwrap(), 1.0);
        assert_eq!(num(&merged, "y").unwrap(), 2.0);
    }

    #[test]
    fn merge_collision_is_an_error() {
        let a = map_of(&[("x", Stat::Num(1.0))]);
        let b = map_of(&[("x", Stat::Num(2.0))]);
        let err = merge_stats(a, b).unwrap_err();
        assert!(matches!(err, RatingError::StatCollision(k) if k == "x"));
    }

    #[test]
    fn num_rejects_per_period_values() {
        let stats = map_of(&[(keys::LC_PER_PERIOD, Stat::PerPeriod(vec![1, 0]))]);
        assert!(num(&stats, keys::LC_PER_PERIOD).is_err());
        assert_eq!(
            per_period(&stats, keys::LC_PER_PERIOD).unwrap(),
            &[1, 0][..]
        );
    }
}
