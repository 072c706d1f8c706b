// src/session/mod.rs
//! Browser-session seam.
//!
//! Everything the scraper needs from a browser goes through [`BrowserSession`]:
//! navigation, the rendered markup, script evaluation, and the devtools
//! performance log. Launching and configuring the browser itself happens
//! outside this crate; a WebDriver client only has to implement this trait.
//!
//! One session is driven by one thread. Reads take `&self` so strategies can
//! share the handle, while navigation needs `&mut self`.
use serde_json::Value;

use crate::error::SessionError;

mod snapshot;
pub use snapshot::SnapshotSession;

pub type SessionResult<T> = std::result::Result<T, SessionError>;

/// One buffered entry of the browser's performance log.
/// `message` is the raw JSON text the browser emits; the devtools event sits
/// under its `message` key (`{"message": {"method": …, "params": …}}`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PerfLogEntry {
    pub message: String,
}

impl PerfLogEntry {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    /// Inner devtools event, if the entry is well-formed JSON.
    pub fn event(&self) -> Option<Value> {
        let mut outer: Value = serde_json::from_str(&self.message).ok()?;
        outer.get_mut("message").map(Value::take)
    }
}

pub trait BrowserSession {
    /// Load `url` and return once the browser reports the load finished.
    fn navigate(&mut self, url: &str) -> SessionResult<()>;

    /// Current rendered markup.
    fn page_source(&self) -> SessionResult<String>;

    fn current_url(&self) -> SessionResult<String>;

    /// Run `script` in the page and return its value (`null` for no value).
    fn execute_script(&self, script: &str) -> SessionResult<Value>;

    /// Entries buffered since the previous call.
    fn performance_log(&self) -> SessionResult<Vec<PerfLogEntry>>;

    /// Body of a captured response, by devtools request id.
    fn response_body(&self, request_id: &str) -> SessionResult<String>;
}
