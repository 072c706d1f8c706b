// src/specs/supplement.rs
// DOM read-outs that fill what the primary source left out: start date,
// sport, elapsed time, pace. Runs on every page, whichever strategy won.
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html};
use serde_json::Value;

use crate::core::html::{full_text, next_element_named, parent_element, sole_string,
                        prev_element_named, select_all, select_first};
use crate::core::parse::{format_timestamp, parse_display_date, parse_duration, parse_pace};
use crate::record::RawFragment;

static TIME_TAG: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)<time[^>]*>\s*([^<]+?)\s*</time>").ok());
static ELAPSED_LABEL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)Elapsed Time").ok());
static PACE_LABEL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)\bPace\b").ok());

/// Title separators seen in "<name> – <sport>" headers.
const TITLE_SEPARATORS: &[char] = &['–', '—'];

/// Keys `primary` doesn't have, read from the page. Only absent keys are
/// considered; nothing here can shadow the primary source.
pub fn supplement(html: &str, doc: &Html, primary: &RawFragment) -> RawFragment {
    let mut out = RawFragment::new();

    if !primary.contains_key("start_date") {
        if let Some(date) = start_date(html) {
            // Unparseable → explicit null, so nobody retries the field later.
            out.insert(s!("start_date"), date.map_or(Value::Null, Value::String));
        }
    }

    if !primary.contains_key("sport_type") {
        if let Some(sport) = sport_type(doc) {
            out.insert(s!("sport_type"), Value::String(sport));
        }
    }

    if !primary.contains_key("elapsed_time") {
        if let Some(txt) = elapsed_time_text(doc) {
            out.insert(s!("elapsed_time_sec"), seconds(parse_duration(&txt)));
            out.insert(s!("elapsed_time"), Value::String(txt));
        }
    }

    if !primary.contains_key("pace_per_km") {
        if let Some(txt) = pace_text(doc) {
            out.insert(s!("pace_sec_per_km"), seconds(parse_pace(&txt)));
            out.insert(s!("pace_per_km"), Value::String(txt));
        }
    }

    out
}

/// `None` when the page has no `<time>` text at all;
/// `Some(None)` when it has one we can't read.
fn start_date(html: &str) -> Option<Option<String>> {
    let re = TIME_TAG.as_ref()?;
    let raw = re.captures(html)?.get(1)?.as_str().trim();
    let parsed = parse_display_date(raw).map(|dt| format_timestamp(&dt));
    if parsed.is_none() {
        logd!("unrecognized <time> text {raw:?}");
    }
    Some(parsed)
}

fn sport_type(doc: &Html) -> Option<String> {
    let title = full_text(select_first(doc, "span.title")?);
    if !title.contains(TITLE_SEPARATORS) {
        return None;
    }
    let sport = title.rsplit(TITLE_SEPARATORS).next()?.trim();
    (!sport.is_empty()).then(|| s!(sport))
}

/// Value sits in the `<strong>` following the label's container.
fn elapsed_time_text(doc: &Html) -> Option<String> {
    let label = find_label(doc, ELAPSED_LABEL.as_ref()?)?;
    let parent = parent_element(label)?;
    let strong = next_element_named(doc, parent, "strong")?;
    Some(full_text(strong))
}

/// Value sits in the `<strong>` just before the label.
fn pace_text(doc: &Html) -> Option<String> {
    let label = find_label(doc, PACE_LABEL.as_ref()?)?;
    let strong = prev_element_named(doc, label, "strong")?;
    Some(full_text(strong))
}

fn find_label<'a>(doc: &'a Html, re: &Regex) -> Option<ElementRef<'a>> {
    select_all(doc, "span")
        .into_iter()
        .find(|span| sole_string(*span).is_some_and(|t| re.is_match(&t)))
}

fn seconds(v: Option<i64>) -> Value {
    v.map_or(Value::Null, Value::from)
}
