// src/specs/network_capture.rs
// Last resort: the page fetched the activity from its own JSON API. Watch the
// devtools performance log for that response and read its body back.
use std::{thread, time::{Duration, Instant}};

use serde_json::Value;

use super::{PageContext, Source, Strategy};
use crate::config::consts::ACTIVITY_API_PATH;
use crate::record::RawFragment;
use crate::session::{BrowserSession, PerfLogEntry};

const RESPONSE_RECEIVED: &str = "Network.responseReceived";

pub struct NetworkCapture;

impl Strategy for NetworkCapture {
    fn source(&self) -> Source { Source::NetworkCapture }

    fn attempt(&self, page: &PageContext<'_>) -> RawFragment {
        poll_activity_response(page.session, page.activity_id, page.opts.cdp_timeout, page.opts.cdp_poll)
    }
}

/// Sample the log until a matching response body parses, or `timeout` runs
/// out. The log is sampled at least once, even with a zero timeout.
pub fn poll_activity_response(
    session: &dyn BrowserSession,
    activity_id: &str,
    timeout: Duration,
    every: Duration,
) -> RawFragment {
    let needle = join!(ACTIVITY_API_PATH, activity_id);
    let deadline = Instant::now() + timeout;

    loop {
        let entries = match session.performance_log() {
            Ok(entries) => entries,
            Err(e) => {
                logd!("activity {activity_id}: performance log unreadable: {e}");
                return RawFragment::new();
            }
        };
        for entry in &entries {
            if let Some(body) = matching_body(session, entry, &needle) {
                return body;
            }
        }

        let now = Instant::now();
        if now >= deadline {
            logd!("activity {activity_id}: no API response captured within {timeout:?}");
            return RawFragment::new();
        }
        thread::sleep(every.min(deadline - now));
    }
}

fn matching_body(session: &dyn BrowserSession, entry: &PerfLogEntry, needle: &str) -> Option<RawFragment> {
    let event = entry.event()?;
    if event.get("method").and_then(Value::as_str) != Some(RESPONSE_RECEIVED) {
        return None;
    }
    let params = event.get("params")?;
    let url = params.pointer("/response/url").and_then(Value::as_str)?;
    if !url_targets(url, needle) {
        return None;
    }
    let request_id = params.get("requestId").and_then(Value::as_str)?;

    let body = match session.response_body(request_id) {
        Ok(b) => b,
        Err(e) => {
            logd!("request {request_id}: {e}");
            return None;
        }
    };
    match serde_json::from_str::<Value>(&body) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// `.../api/v4/activities/123` matches activity 123, not 1234.
fn url_targets(url: &str, needle: &str) -> bool {
    url.match_indices(needle).any(|(i, m)| {
        !url[i + m.len()..].starts_with(|c: char| c.is_ascii_digit())
    })
}
