use std::io::Write;

use anyhow::{Context, Result};

use crate::rating::stats::{Stat, StatsMap};

/// Everything derived for one game, ready for display and export.
#[derive(Debug, Clone)]
pub struct RatedGame {
    pub id: String,
    pub name: String,
    /// Overall watchability in [0, 1].
    pub rating: f64,
    /// Per-criterion normalised scores, criteria-table order.
    pub partials: Vec<(&'static str, f64)>,
    pub stats: StatsMap,
}

/// Sort best-first. Ratings are plain weighted means so `total_cmp` keeps
/// the order deterministic even if a NaN ever slipped through.
pub fn sort_by_rating(games: &mut [RatedGame]) {
    games.sort_by(|a, b| b.rating.total_cmp(&a.rating));
}

/// Spoiler-free stdout listing: just the matchup and its rating.
pub fn print_listing(games: &[RatedGame]) {
    for game in games {
        println!("{} {:.3}", game.name, game.rating);
    }
}

/// Export full details (identity, rating, partial ratings, every statistic)
/// to a CSV file. Column order is stable: identity first, then partials in
/// criteria order, then statistics alphabetically.
pub fn write_csv(path: &str, games: &[RatedGame]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create CSV file {}", path))?;
    write_csv_to(file, games)
}

fn write_csv_to<W: Write>(writer: W, games: &[RatedGame]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);

    let first = match games.first() {
        Some(g) => g,
        None => return Ok(()),
    };

    let mut header = vec!["id".to_string(), "name".to_string(), "rating".to_string()];
    header.extend(first.partials.iter().map(|(name, _)| format!("rating_{}", name)));
    header.extend(first.stats.keys().cloned());
    csv.write_record(&header)?;

    for game in games {
        let mut row = vec![game.id.clone(), game.name.clone(), game.rating.to_string()];
        row.extend(game.partials.iter().map(|(_, score)| score.to_string()));
        row.extend(game.stats.values().map(stat_cell));
        csv.write_record(&row)?;
    }

    csv.flush().context("Failed to flush CSV output")?;
    Ok(())
}

fn stat_cell(stat: &Stat) -> String {
    match stat {
        Stat::Num(v) => v.to_string(),
        Stat::PerPeriod(counts) => counts
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join("|"),
    }
}
