pub mod backfill;
pub mod board;
pub mod cache;
pub mod cli;
pub mod error;
pub mod export;
pub mod fetch;
pub mod github;
pub mod merge;
pub mod model;
pub mod output;
pub mod period;
pub mod pipeline;
pub mod rank;
pub mod score;
pub mod title;
pub mod util;

pub use error::{GboardError, Result};
pub use model::{ContributorRecord, PeriodTotals, ScoredEntry, WeekBucket};
pub use period::Period;
pub use rank::compute_leaderboard;
pub use score::ScoringConfig;
pub use title::Title;
