// src/error.rs
use thiserror::Error;

/// Failures raised by a browser session. Strategies swallow these; discovery
/// and navigation surface them to the runner.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("navigation to {0} failed")]
    Navigation(String),

    #[error("no page loaded")]
    NoPage,

    #[error("script evaluation failed: {0}")]
    Script(String),

    #[error("performance log unavailable: {0}")]
    PerfLog(String),

    #[error("no response body for request {0}")]
    ResponseBody(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("profile {0} is private, missing or blocked")]
    ProfileUnavailable(String),

    #[error("no activities found for athlete {0}")]
    NoActivitiesFound(String),

    #[error("page {0} did not load in time")]
    NavigationTimeout(String),

    #[error("activity {0}: no strategy produced data")]
    ExtractionEmpty(String),

    #[error("activity {activity} belongs to athlete {found}, not {expected}")]
    AthleteMismatch {
        activity: String,
        expected: String,
        found: String,
    },

    #[error("shard id {shard_id} must be between 1 and {total_shards}")]
    InvalidShard { shard_id: usize, total_shards: usize },

    #[error("no athlete ids to process")]
    NoAthletes,

    #[error("session error: {0}")]
    Session(#[from] SessionError),

    #[error("persistence error: {0}")]
    Persistence(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScrapeError {
    /// Errors that abort one athlete or one activity but never the run.
    pub fn is_item_level(&self) -> bool {
        matches!(
            self,
            ScrapeError::ProfileUnavailable(_)
                | ScrapeError::NoActivitiesFound(_)
                | ScrapeError::NavigationTimeout(_)
                | ScrapeError::ExtractionEmpty(_)
                | ScrapeError::AthleteMismatch { .. }
                | ScrapeError::Session(_)
                | ScrapeError::Json(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
