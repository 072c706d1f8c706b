// src/lib.rs

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod athletes;
pub mod config;
pub mod core;
pub mod error;
pub mod progress;
pub mod record;
pub mod runner;
pub mod session;
pub mod shard;
pub mod specs;
pub mod store;

#[cfg(feature = "cli")]
pub mod cli;

pub use error::{Result, ScrapeError, SessionError};
pub use record::{CanonicalActivityRecord, MergedRecord, RawFragment};
pub use runner::{run, RunSummary};
pub use session::{BrowserSession, SnapshotSession};
pub use shard::ShardAssignment;
pub use store::{ActivityStore, SqliteStore};
