// src/record.rs
// Two-stage data model: loose `RawFragment`s from the strategies, merged
// first-writer-wins, then mapped onto the fixed `CanonicalActivityRecord`.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, ScrapeError};

/// Partial result of one strategy, keyed by source-side field name.
pub type RawFragment = Map<String, Value>;

/// Union of fragments for one activity. Same shape, stronger invariant:
/// a key set by an earlier fragment is never overwritten.
pub type MergedRecord = Map<String, Value>;

/// Fold fragments left to right, only inserting keys not already present.
pub fn merge_fragments<I>(fragments: I) -> MergedRecord
where
    I: IntoIterator<Item = RawFragment>,
{
    let mut merged = MergedRecord::new();
    for fragment in fragments {
        for (key, value) in fragment {
            merged.entry(key).or_insert(value);
        }
    }
    merged
}

/// The persisted shape. Built once per scraped page and never mutated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CanonicalActivityRecord {
    pub activity_id: String,
    pub strava_athlete_id: String,
    pub activity_date: Option<String>,
    pub distance_m: Option<i64>,
    pub elev_gain_m: Option<i64>,
    pub moving_time_s: Option<i64>,
    pub calories: Option<f64>,
    pub avg_cadence: Option<f64>,
    pub trainer: bool,
    pub sport_type: Option<String>,
    pub elapsed_time_s: Option<i64>,
    pub pace_sec_per_km: Option<i64>,
    pub pace_text: Option<String>,
    pub athlete_name: Option<String>,
    pub raw_payload: MergedRecord,
}

/// Map a merged record onto the canonical schema. Total: every lookup is
/// optional and a missing or odd-typed field just becomes null/false.
pub fn canonicalize(merged: MergedRecord, activity_id: &str, athlete_id: &str) -> CanonicalActivityRecord {
    CanonicalActivityRecord {
        activity_id: s!(activity_id),
        strava_athlete_id: s!(athlete_id),
        activity_date: activity_date(&merged),
        distance_m: rounded(merged.get("distance")),
        elev_gain_m: rounded(merged.get("elev_gain")),
        moving_time_s: rounded(merged.get("moving_time")),
        calories: number(merged.get("calories")),
        avg_cadence: number(merged.get("avg_cadence")),
        trainer: merged.get("trainer").is_some_and(truthy),
        sport_type: text(merged.get("sport_type")),
        elapsed_time_s: rounded(merged.get("elapsed_time_sec")),
        pace_sec_per_km: rounded(merged.get("pace_sec_per_km")),
        pace_text: text(merged.get("pace_per_km")),
        athlete_name: merged
            .get("athlete")
            .and_then(|a| a.get("display_name"))
            .and_then(|v| text(Some(v))),
        raw_payload: merged,
    }
}

/// Athlete identity embedded in the page data: `athlete.id`, else the
/// top-level `athlete_id`.
pub fn embedded_athlete_id(merged: &MergedRecord) -> Option<String> {
    let nested = merged.get("athlete").and_then(|a| a.get("id")).and_then(id_string);
    nested.or_else(|| merged.get("athlete_id").and_then(id_string))
}

/// Guard against pages that redirected to someone else's activity.
/// An absent embedded id passes.
pub fn check_athlete(merged: &MergedRecord, activity_id: &str, expected: &str) -> Result<()> {
    match embedded_athlete_id(merged) {
        Some(found) if found != expected => Err(ScrapeError::AthleteMismatch {
            activity: s!(activity_id),
            expected: s!(expected),
            found,
        }),
        _ => Ok(()),
    }
}

/* ---------- helpers ---------- */

fn activity_date(merged: &MergedRecord) -> Option<String> {
    let raw = ["start_date", "startDate"]
        .iter()
        .filter_map(|k| merged.get(*k).and_then(Value::as_str))
        .find(|s| !s.is_empty())?;
    Some(raw.replace('Z', "").replace('T', " "))
}

fn number(v: Option<&Value>) -> Option<f64> {
    let f = match v? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    f.is_finite().then_some(f)
}

/// Nearest integer, ties to even.
fn rounded(v: Option<&Value>) -> Option<i64> {
    let f = number(v)?.round_ties_even();
    if f < i64::MIN as f64 || f > i64::MAX as f64 {
        return None;
    }
    Some(f as i64)
}

fn text(v: Option<&Value>) -> Option<String> {
    v?.as_str().map(String::from)
}

fn truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn id_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
