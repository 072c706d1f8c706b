// src/specs/athlete.rs
// Athlete profile page → ids of the most recent activities.
// Three sources, in order: feed markup, embedded page state, then scrolling
// the rendered list and collecting activity links.
use std::{collections::HashSet, sync::LazyLock, thread, time::{Duration, Instant}};

use regex::Regex;
use serde_json::Value;

use crate::config::consts::{athlete_url, ATHLETES_PATH, PROFILE_UNAVAILABLE_MARKERS, URL_POLL};
use crate::config::ScrapeOptions;
use crate::error::{Result, ScrapeError};
use crate::session::{BrowserSession, SessionResult};

static FEED_ID: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"Activity-(\d{6,})").ok());

pub const NEXT_NODES_SCRIPT: &str = r#"
try {
  return window.__NEXT_DATA__
    ?.props?.pageProps?.athlete?.recentActivities?.nodes || [];
} catch(e) { return []; }
"#;

pub const LINK_IDS_SCRIPT: &str = r#"
return Array.from(
    document.querySelectorAll('a[href^="/activities/"]')
).map(a => (a.getAttribute('href').match(/\d+/) || [])[0])
 .filter(Boolean);
"#;

pub const SCROLL_SCRIPT: &str = "window.scrollBy(0, window.innerHeight);";

/// Newest-first activity ids for `athlete_id`, at most `opts.per_athlete`.
pub fn recent_activity_ids(
    session: &mut dyn BrowserSession,
    athlete_id: &str,
    opts: &ScrapeOptions,
) -> Result<Vec<String>> {
    let url = athlete_url(athlete_id);
    session.navigate(&url)?;

    let expected = join!(ATHLETES_PATH, athlete_id);
    if !wait_for_url(&*session, &expected, opts.wait)? {
        return Err(ScrapeError::NavigationTimeout(url));
    }

    let html = session.page_source()?;
    if is_unavailable(&html) {
        return Err(ScrapeError::ProfileUnavailable(s!(athlete_id)));
    }

    let limit = opts.per_athlete;

    let feed = feed_ids(&html);
    if !feed.is_empty() {
        logd!("athlete {athlete_id}: {} ids from feed markup", feed.len());
        return Ok(newest(feed, limit));
    }

    let nodes = match session.execute_script(NEXT_NODES_SCRIPT) {
        Ok(v) => node_ids(&v),
        Err(e) => {
            logd!("athlete {athlete_id}: page state unavailable: {e}");
            Vec::new()
        }
    };
    if !nodes.is_empty() {
        logd!("athlete {athlete_id}: {} ids from page state", nodes.len());
        return Ok(newest(nodes, limit));
    }

    let scrolled = scroll_for_ids(&*session, opts);
    if scrolled.is_empty() {
        return Err(ScrapeError::NoActivitiesFound(s!(athlete_id)));
    }
    logd!("athlete {athlete_id}: {} ids from activity links", scrolled.len());
    Ok(newest(scrolled, limit))
}

pub fn is_unavailable(html: &str) -> bool {
    PROFILE_UNAVAILABLE_MARKERS.iter().any(|m| html.contains(m))
}

/// Poll the current URL until it contains `needle`. `false` on timeout.
fn wait_for_url(session: &dyn BrowserSession, needle: &str, wait: Duration) -> SessionResult<bool> {
    let deadline = Instant::now() + wait;
    loop {
        if session.current_url()?.contains(needle) {
            return Ok(true);
        }
        let now = Instant::now();
        if now >= deadline {
            return Ok(false);
        }
        thread::sleep(URL_POLL.min(deadline - now));
    }
}

/// Unique `Activity-<id>` anchors from the feed markup.
pub fn feed_ids(html: &str) -> Vec<u64> {
    let Some(re) = FEED_ID.as_ref() else { return Vec::new() };
    let unique: HashSet<u64> = re
        .captures_iter(html)
        .filter_map(|c| c.get(1)?.as_str().parse().ok())
        .collect();
    unique.into_iter().collect()
}

/// `[{id: …}, …]` from the embedded page state; nodes without an id are dropped.
pub fn node_ids(nodes: &Value) -> Vec<u64> {
    nodes
        .as_array()
        .map(|list| list.iter().filter_map(|n| numeric_id(n.get("id")?)).collect())
        .unwrap_or_default()
}

/// Scroll the list a viewport at a time, collecting link ids in first-seen
/// order until `per_athlete` are known or the round budget runs out.
fn scroll_for_ids(session: &dyn BrowserSession, opts: &ScrapeOptions) -> Vec<u64> {
    let limit = opts.per_athlete;
    let mut seen: HashSet<u64> = HashSet::new();
    let mut ids: Vec<u64> = Vec::new();

    for _ in 0..opts.scroll_rounds.max(1) {
        let found = match session.execute_script(LINK_IDS_SCRIPT) {
            Ok(v) => v,
            Err(e) => {
                logd!("activity link scan failed: {e}");
                Value::Null
            }
        };
        for id in found.as_array().into_iter().flatten().filter_map(numeric_id) {
            if seen.insert(id) {
                ids.push(id);
            }
            if ids.len() >= limit {
                break;
            }
        }
        if ids.len() >= limit {
            break;
        }
        if let Err(e) = session.execute_script(SCROLL_SCRIPT) {
            logd!("scroll failed: {e}");
        }
        if !opts.scroll_pause.is_zero() {
            thread::sleep(opts.scroll_pause);
        }
    }
    ids
}

fn numeric_id(v: &Value) -> Option<u64> {
    match v {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_u64(),
        _ => None,
    }
}

fn newest(mut ids: Vec<u64>, limit: usize) -> Vec<String> {
    ids.sort_unstable_by(|a, b| b.cmp(a));
    ids.dedup();
    ids.into_iter().take(limit).map(|id| id.to_string()).collect()
}
