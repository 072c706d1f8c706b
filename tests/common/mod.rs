// tests/common/mod.rs
#![allow(dead_code)]
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};

use serde_json::Value;
use strava_scrape::{
    session::{PerfLogEntry, SessionResult},
    ActivityStore, BrowserSession, CanonicalActivityRecord, Result, SessionError,
};

/// Scripted browser: canned markup per URL, canned script results, a canned
/// performance log. Scripts not listed evaluate to null.
///
/// The performance log is a queue of batches; each read drains one batch,
/// like a real browser handing out what it buffered since the last read.
#[derive(Default)]
pub struct FakeSession {
    pages: HashMap<String, String>,
    scripts: HashMap<String, Value>,
    perf_batches: RefCell<VecDeque<Vec<PerfLogEntry>>>,
    pub perf_reads: Cell<usize>,
    pub script_calls: RefCell<Vec<String>>,
    bodies: HashMap<String, String>,
    /// URL reported after navigating to the key (redirects).
    redirects: HashMap<String, String>,
    current: Option<String>,
    pub visited: Vec<String>,
}

impl FakeSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }

    pub fn script(mut self, js: &str, result: Value) -> Self {
        self.scripts.insert(js.to_string(), result);
        self
    }

    /// Adds a `Network.responseReceived` entry for `url` and its body.
    pub fn response(mut self, request_id: &str, url: &str, body: &str) -> Self {
        let inner = serde_json::json!({
            "method": "Network.responseReceived",
            "params": {"requestId": request_id, "response": {"url": url}}
        });
        let outer = serde_json::json!({"message": inner, "webview": "x"});
        let batches = self.perf_batches.get_mut();
        if batches.is_empty() {
            batches.push_back(Vec::new());
        }
        if let Some(last) = batches.back_mut() {
            last.push(PerfLogEntry::new(outer.to_string()));
        }
        self.bodies.insert(request_id.to_string(), body.to_string());
        self
    }

    /// `n` log reads that return nothing; responses added afterwards show up
    /// on the read after those.
    pub fn silent_samples(mut self, n: usize) -> Self {
        let batches = self.perf_batches.get_mut();
        for _ in 0..n {
            batches.push_back(Vec::new());
        }
        batches.push_back(Vec::new());
        self
    }

    /// How many times `js` was evaluated.
    pub fn script_runs(&self, js: &str) -> usize {
        self.script_calls.borrow().iter().filter(|s| s.as_str() == js).count()
    }

    pub fn redirect(mut self, from: &str, to: &str) -> Self {
        self.redirects.insert(from.to_string(), to.to_string());
        self
    }
}

impl BrowserSession for FakeSession {
    fn navigate(&mut self, url: &str) -> SessionResult<()> {
        self.visited.push(url.to_string());
        if !self.pages.contains_key(url) {
            return Err(SessionError::Navigation(url.to_string()));
        }
        self.current = Some(url.to_string());
        Ok(())
    }

    fn page_source(&self) -> SessionResult<String> {
        let url = self.current.as_ref().ok_or(SessionError::NoPage)?;
        self.pages.get(url).cloned().ok_or(SessionError::NoPage)
    }

    fn current_url(&self) -> SessionResult<String> {
        let url = self.current.as_ref().ok_or(SessionError::NoPage)?;
        Ok(self.redirects.get(url).cloned().unwrap_or_else(|| url.clone()))
    }

    fn execute_script(&self, js: &str) -> SessionResult<Value> {
        self.script_calls.borrow_mut().push(js.to_string());
        Ok(self.scripts.get(js).cloned().unwrap_or(Value::Null))
    }

    fn performance_log(&self) -> SessionResult<Vec<PerfLogEntry>> {
        self.perf_reads.set(self.perf_reads.get() + 1);
        Ok(self.perf_batches.borrow_mut().pop_front().unwrap_or_default())
    }

    fn response_body(&self, request_id: &str) -> SessionResult<String> {
        self.bodies
            .get(request_id)
            .cloned()
            .ok_or_else(|| SessionError::ResponseBody(request_id.to_string()))
    }
}

/// Keeps every upserted record; optionally refuses all writes.
#[derive(Default)]
pub struct RecordingStore {
    pub saved: Vec<CanonicalActivityRecord>,
    pub broken: bool,
}

impl ActivityStore for RecordingStore {
    fn upsert(&mut self, rec: &CanonicalActivityRecord) -> Result<()> {
        if self.broken {
            return Err(rusqlite::Error::InvalidQuery.into());
        }
        self.saved.push(rec.clone());
        Ok(())
    }
}

pub fn athlete_page(activity_ids: &[&str]) -> String {
    let feed: String = activity_ids
        .iter()
        .map(|id| format!(r#"<div class="feed-entry" id="Activity-{id}"></div>"#))
        .collect();
    format!("<html><body><h1>Ana R.</h1>{feed}</body></html>")
}

/// Activity page with an embedded-JSON payload owned by `athlete_id`.
pub fn activity_page(athlete_id: &str, distance: f64) -> String {
    format!(
        r#"<html><body>
        <script id="__NEXT_DATA__" type="application/json">
        {{"props":{{"pageProps":{{"activity":{{
            "distance": {distance}, "moving_time": 1500,
            "start_date": "2024-05-01T07:00:00Z", "sport_type": "Run",
            "athlete": {{"id": "{athlete_id}", "display_name": "Ana R."}}
        }}}}}}}}
        </script>
        <ul class="inline-stats">
          <li><strong>6:00 /km</strong><span class="label">Pace</span></li>
        </ul>
        </body></html>"#
    )
}
