// src/specs/legacy_script.rs
// Oldest page generation: attributes are pushed into the view model by inline
// `pageView.activity().set({...});` calls written as JS object literals, not
// JSON. Pull the handful of fields we need out with regexes.
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Number, Value};

use super::{PageContext, Source, Strategy};
use crate::record::RawFragment;

#[derive(Clone, Copy)]
enum Kind { Number, Integer, Flag }

const FIELDS: &[(&str, &str, Kind)] = &[
    ("distance",    r"distance\s*:\s*([\d.]+)",     Kind::Number),
    ("elev_gain",   r"elev_gain\s*:\s*([\d.]+)",    Kind::Number),
    ("moving_time", r"moving_time\s*:\s*(\d+)",     Kind::Integer),
    ("calories",    r"calories\s*:\s*([\d.]+)",     Kind::Number),
    ("avg_hr",      r"avg_hr\s*:\s*([\d.]+)",       Kind::Number),
    ("avg_cadence", r"avg_cadence\s*:\s*([\d.]+)",  Kind::Number),
    ("trainer",     r"trainer\s*:\s*(true|false)",  Kind::Flag),
];

// Regexes are compiled once; a pattern that fails to compile is simply absent.
static SET_CALL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?s)pageView\.activity\(\)\.set\((.*?)\);").ok());
static ATHLETE_CALL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?s)new Strava\.Models\.Athlete\((.*?)\);").ok());
static FIELD_RES: LazyLock<Vec<(&'static str, Regex, Kind)>> = LazyLock::new(|| {
    FIELDS
        .iter()
        .filter_map(|(key, pat, kind)| Regex::new(pat).ok().map(|re| (*key, re, *kind)))
        .collect()
});

pub struct LegacyScript;

impl Strategy for LegacyScript {
    fn source(&self) -> Source { Source::LegacyScript }

    fn attempt(&self, page: &PageContext<'_>) -> RawFragment {
        extract(page.html)
    }
}

/// Fragment from the inline set-calls, or empty unless both `distance` and
/// `moving_time` were found. Partial numbers without those two are noise.
pub fn extract(html: &str) -> RawFragment {
    let mut out = RawFragment::new();
    let Some(set_call) = SET_CALL.as_ref() else { return out };

    let blob: String = set_call
        .captures_iter(html)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .collect();
    if blob.is_empty() {
        return out;
    }

    for (key, re, kind) in FIELD_RES.iter() {
        let Some(raw) = re.captures(&blob).and_then(|c| c.get(1)) else { continue };
        match typed(raw.as_str(), *kind) {
            Some(v) => { out.insert(s!(*key), v); }
            None => logd!("legacy script: {key}={:?} not a number", raw.as_str()),
        }
    }

    if let Some(body) = ATHLETE_CALL.as_ref().and_then(|re| re.captures(html)).and_then(|c| c.get(1)) {
        match serde_json::from_str::<Value>(body.as_str().trim()) {
            Ok(athlete) => { out.insert(s!("athlete"), athlete); }
            Err(e) => logd!("legacy script: athlete object unparseable: {e}"),
        }
    }

    if out.contains_key("distance") && out.contains_key("moving_time") {
        out
    } else {
        RawFragment::new()
    }
}

fn typed(raw: &str, kind: Kind) -> Option<Value> {
    match kind {
        Kind::Flag => Some(Value::Bool(raw.eq_ignore_ascii_case("true"))),
        Kind::Number if raw.contains('.') => raw.parse::<f64>().ok().and_then(Number::from_f64).map(Value::Number),
        Kind::Number | Kind::Integer => raw.parse::<i64>().ok().map(Value::from),
    }
}
