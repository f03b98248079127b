use std::collections::BTreeSet;

use chrono::{Days, Local, NaiveDate};
use clap::Parser;

use crate::nba::endpoints::DEFAULT_BASE_URL;

/// Rate completed NBA games by watchability
#[derive(Parser, Debug, Clone)]
#[command(name = "hoopsheet", version, about)]
pub struct Config {
    /// Game dates to rate (YYYY-MM-DD); defaults to yesterday when neither
    /// dates nor ranges are given
    pub dates: Vec<NaiveDate>,

    /// Inclusive date range to rate; may be repeated
    #[arg(short, long, num_args = 2, value_names = ["START", "END"], action = clap::ArgAction::Append)]
    pub range: Vec<NaiveDate>,

    /// Save full statistics and ratings to a CSV file
    #[arg(short, long, value_name = "PATH")]
    pub output_csv: Option<String>,

    /// How many games to rate concurrently
    #[arg(long, env = "CONCURRENCY", default_value = "4")]
    pub concurrency: usize,

    /// NBA data feed base URL
    #[arg(long, env = "NBA_API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub api_base_url: String,

    /// HTTP request timeout in seconds
    #[arg(long, env = "HTTP_TIMEOUT_SECS", default_value = "10")]
    pub http_timeout_secs: u64,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.concurrency == 0 {
            anyhow::bail!("concurrency must be at least 1");
        }
        if self.http_timeout_secs == 0 {
            anyhow::bail!("http_timeout_secs must be at least 1");
        }
        if self.api_base_url.is_empty() {
            anyhow::bail!("api_base_url must not be empty");
        }
        Ok(())
    }

    /// Union of the positional dates and every `--range` pair, deduplicated
    /// and sorted; yesterday when nothing was requested.
    pub fn requested_dates(&self) -> BTreeSet<NaiveDate> {
        self.resolve_dates(Local::now().date_naive())
    }

    fn resolve_dates(&self, today: NaiveDate) -> BTreeSet<NaiveDate> {
        let mut dates: BTreeSet<NaiveDate> = self.dates.iter().copied().collect();
        for pair in self.range.chunks_exact(2) {
            let start = pair[0].min(pair[1]);
            let end = pair[0].max(pair[1]);
            let mut day = start;
            while day <= end {
                dates.insert(day);
                match day.succ_opt() {
                    Some(next) => day = next,
                    None => break,
                }
            }
        }
        if dates.is_empty() {
            if let Some(yesterday) = today.checked_sub_days(Days::new(1)) {
                dates.insert(yesterday);
            }
        }
        dates
    }
}
