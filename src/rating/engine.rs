//! Watchability rating: each statistic runs through a hand-tuned calibration
//! curve into a [0, 1] "goodness" score, and the overall rating is the
//! weighted mean of those scores.
//!
//! The criteria live in one declarative table so the interpolation logic
//! stays in a single function and tuning a breakpoint or weight never
//! touches code paths.

use crate::error::RatingError;

use super::stats::{keys, num, per_period, StatsMap};

type ValueFn = fn(&StatsMap) -> Result<f64, RatingError>;
type WeightFn = fn(f64) -> u32;

/// One rating criterion: where its input comes from, the calibration curve
/// breakpoints, the output range (descending means "lower is better"), and
/// a weight rule that may depend on the input (zero weight turns a criterion
/// into a no-op instead of penalising a neutral baseline).
struct Criterion {
    name: &'static str,
    value: ValueFn,
    breakpoints: [f64; 2],
    outputs: [f64; 2],
    weight: WeightFn,
}

const CRITERIA: &[Criterion] = &[
    Criterion {
        name: "field_goals",
        value: |s| num(s, keys::FIELD_GOALS_PERCENTAGE),
        breakpoints: [0.4, 0.6],
        outputs: [0.0, 1.0],
        weight: |_| 1,
    },
    Criterion {
        name: "three_pointers",
        value: |s| num(s, keys::THREE_POINTERS_PERCENTAGE),
        breakpoints: [0.3, 0.5],
        outputs: [0.0, 1.0],
        weight: |_| 2,
    },
    Criterion {
        // Free throws stop the clock; many of them drags the game out.
        // Normalised per 48 minutes so overtime games compare fairly.
        name: "free_throws",
        value: |s| {
            Ok(num(s, keys::FREE_THROWS_ATTEMPTED)? / num(s, keys::GAME_TIME_MULTIPLIER)?)
        },
        breakpoints: [30.0, 70.0],
        outputs: [1.0, 0.0],
        weight: |_| 1,
    },
    Criterion {
        name: "early_game_lc",
        value: |s| lead_changes_in_periods(s, 0, 1),
        breakpoints: [0.0, 6.0],
        outputs: [0.0, 1.0],
        weight: |_| 1,
    },
    Criterion {
        name: "mid_game_lc",
        value: |s| lead_changes_in_periods(s, 1, 3),
        breakpoints: [0.0, 10.0],
        outputs: [0.0, 1.0],
        weight: |_| 3,
    },
    Criterion {
        name: "late_game_lc",
        value: |s| lead_changes_in_periods(s, 3, usize::MAX),
        breakpoints: [0.0, 6.0],
        outputs: [0.0, 1.0],
        weight: |_| 4,
    },
    Criterion {
        name: "last_minutes_lc",
        value: |s| num(s, keys::LC_IN_LAST_MINUTES),
        breakpoints: [0.0, 2.0],
        outputs: [0.5, 1.0],
        weight: |v| if v > 0.0 { 6 } else { 0 },
    },
    Criterion {
        name: "clock_off_lc",
        value: |s| num(s, keys::LC_WHEN_SHOT_CLOCK_OFF),
        breakpoints: [0.0, 1.0],
        outputs: [0.0, 1.0],
        weight: |v| if v > 0.0 { 10 } else { 0 },
    },
    Criterion {
        name: "pts_difference",
        value: |s| num(s, keys::AVERAGE_PTS_DIFFERENCE),
        breakpoints: [0.0, 20.0],
        outputs: [1.0, 0.0],
        weight: |_| 4,
    },
    Criterion {
        name: "final_score",
        value: |s| num(s, keys::PTS_END_DIFFERENCE),
        breakpoints: [1.0, 20.0],
        outputs: [1.0, 0.0],
        weight: |_| 4,
    },
];

/// The combined watchability verdict for one game.
#[derive(Debug, Clone)]
pub struct GameRating {
    /// Weighted mean of the per-criterion scores, in [0, 1].
    pub overall: f64,
    /// Per-criterion normalised scores, in criteria-table order. Criteria
    /// whose weight rule evaluated to zero are still reported.
    pub partials: Vec<(&'static str, f64)>,
}

/// Rate a merged statistics map against the fixed criteria table.
pub fn rate(stats: &StatsMap) -> Result<GameRating, RatingError> {
    let mut weighted_sum = 0.0;
    let mut weight_total = 0u32;
    let mut partials = Vec::with_capacity(CRITERIA.len());

    for criterion in CRITERIA {
        let value = (criterion.value)(stats)?;
        let score = interp(value, criterion.breakpoints, criterion.outputs);
        let weight = (criterion.weight)(value);
        weighted_sum += score * f64::from(weight);
        weight_total += weight;
        partials.push((criterion.name, score));
    }

    // Unreachable with the fixed table (several weights are constant and
    // nonzero), kept as an invariant check.
    if weight_total == 0 {
        return Err(RatingError::DivisionByZero("overall rating"));
    }

    Ok(GameRating {
        overall: weighted_sum / f64::from(weight_total),
        partials,
    })
}

/// Piecewise-linear calibration: clamp the input to `[lo, hi]`, then map it
/// linearly onto the output range. Saturates beyond the breakpoints instead
/// of extrapolating; the output range may be descending.
fn interp(value: f64, breakpoints: [f64; 2], outputs: [f64; 2]) -> f64 {
    let [lo, hi] = breakpoints;
    let [out_lo, out_hi] = outputs;
    if value <= lo {
        out_lo
    } else if value >= hi {
        out_hi
    } else {
        out_lo + (value - lo) / (hi - lo) * (out_hi - out_lo)
    }
}

/// Sum of per-period lead changes over the 0-based period index window
/// `[start, end)`, clamped to the observed period count.
fn lead_changes_in_periods(
    stats: &StatsMap,
    start: usize,
    end: usize,
) -> Result<f64, RatingError> {
    let counts = per_period(stats, keys::LC_PER_PERIOD)?;
    let start = start.min(counts.len());
    let end = end.min(counts.len());
    Ok(counts[start..end].iter().map(|&c| f64::from(c)).sum())
}
