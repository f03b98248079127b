use thiserror::Error;

/// Errors produced while deriving statistics or rating a game.
///
/// Every failure mode is a distinct variant so the caller can decide per
/// game whether to skip it and continue the batch. Nothing here is
/// recoverable within the core: a corrupt feed invalidates the whole game.
#[derive(Debug, Error)]
pub enum RatingError {
    /// A required field was absent or had the wrong type in an upstream feed.
    #[error("missing or malformed field `{field}` in {feed} feed")]
    MalformedFeed {
        feed: &'static str,
        field: String,
    },

    /// A derived quantity would divide by zero (e.g. zero attempted free
    /// throws, or a play-by-play log with no score changes at all).
    #[error("division by zero while deriving `{0}`")]
    DivisionByZero(&'static str),

    /// Both extractors produced the same statistic name. The key sets are
    /// disjoint by construction, so this indicates a programming error.
    #[error("statistic `{0}` produced by more than one extractor")]
    StatCollision(String),

    /// A rating criterion referenced a statistic that is not in the merged
    /// map, or expected a different shape (number vs per-period counts).
    #[error("statistic `{0}` missing or of unexpected kind")]
    UnknownStat(&'static str),
}

impl RatingError {
    pub fn malformed(feed: &'static str, field: impl Into<String>) -> Self {
        RatingError::MalformedFeed {
            feed,
            field: field.into(),
        }
    }
}
