pub mod box_score;
pub mod engine;
pub mod play_by_play;
pub mod stats;

pub use box_score::box_score_stats;
pub use engine::{rate, GameRating};
pub use play_by_play::play_by_play_stats;
pub use stats::{merge_stats, Stat, StatsMap};
