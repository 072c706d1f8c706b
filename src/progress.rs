// src/progress.rs
/// Lightweight progress reporting for the scrape loop.
/// Frontends (the CLI, tests) implement this to surface status.
pub trait Progress {
    /// Called at the start with the number of athletes in the shard.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// One athlete went through discovery and extraction.
    fn item_done(&mut self, _athlete_id: &str) {}

    /// One athlete was skipped (private, empty, navigation failure).
    fn item_failed(&mut self, _athlete_id: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
