pub mod client;
pub mod endpoints;
pub mod scoreboard;

pub use client::{GameFeed, NbaDataClient};
pub use scoreboard::{parse_scoreboard, GameSummary};
