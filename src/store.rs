// src/store.rs
// Persistence for canonical records. One row per activity id; re-scraping an
// activity overwrites its row and bumps `scraped_at`.
use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::Result;
use crate::record::{CanonicalActivityRecord, MergedRecord};

pub trait ActivityStore {
    fn upsert(&mut self, rec: &CanonicalActivityRecord) -> Result<()>;
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS strava_activities (
    activity_id     TEXT PRIMARY KEY,
    strava_id       TEXT NOT NULL,
    activity_date   TEXT,
    distance_m      INTEGER,
    elev_gain_m     INTEGER,
    moving_time_s   INTEGER,
    calories        REAL,
    avg_cadence     REAL,
    trainer         INTEGER NOT NULL DEFAULT 0,
    sport_type      TEXT,
    elapsed_time_s  INTEGER,
    pace_sec_per_km INTEGER,
    pace_text       TEXT,
    athlete_name    TEXT,
    payload         TEXT NOT NULL,
    scraped_at      TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
)";

const UPSERT: &str = "
INSERT INTO strava_activities (
    activity_id, strava_id, activity_date, distance_m, elev_gain_m,
    moving_time_s, calories, avg_cadence, trainer, sport_type,
    elapsed_time_s, pace_sec_per_km, pace_text, athlete_name, payload
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
ON CONFLICT(activity_id) DO UPDATE SET
    strava_id       = excluded.strava_id,
    activity_date   = excluded.activity_date,
    distance_m      = excluded.distance_m,
    elev_gain_m     = excluded.elev_gain_m,
    moving_time_s   = excluded.moving_time_s,
    calories        = excluded.calories,
    avg_cadence     = excluded.avg_cadence,
    trainer         = excluded.trainer,
    sport_type      = excluded.sport_type,
    elapsed_time_s  = excluded.elapsed_time_s,
    pace_sec_per_km = excluded.pace_sec_per_km,
    pace_text       = excluded.pace_text,
    athlete_name    = excluded.athlete_name,
    payload         = excluded.payload,
    scraped_at      = CURRENT_TIMESTAMP";

const SELECT_ONE: &str = "
SELECT activity_id, strava_id, activity_date, distance_m, elev_gain_m,
       moving_time_s, calories, avg_cadence, trainer, sport_type,
       elapsed_time_s, pace_sec_per_km, pace_text, athlete_name, payload
FROM strava_activities WHERE activity_id = ?1";

/// SQLite-backed store.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute(SCHEMA, [])?;
        Ok(Self { conn })
    }

    /// Row for `activity_id`, if one was saved.
    pub fn get(&self, activity_id: &str) -> Result<Option<CanonicalActivityRecord>> {
        let row = self
            .conn
            .query_row(SELECT_ONE, params![activity_id], read_row)
            .optional()?;
        let Some((mut rec, payload)) = row else { return Ok(None) };
        rec.raw_payload = serde_json::from_str(&payload)?;
        Ok(Some(rec))
    }

    pub fn count(&self) -> Result<usize> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM strava_activities", [], |r| r.get(0))?;
        Ok(usize::try_from(n).unwrap_or(0))
    }

    /// `scraped_at` for `activity_id`, as SQLite formatted it.
    pub fn scraped_at(&self, activity_id: &str) -> Result<Option<String>> {
        Ok(self
            .conn
            .query_row(
                "SELECT scraped_at FROM strava_activities WHERE activity_id = ?1",
                params![activity_id],
                |r| r.get(0),
            )
            .optional()?)
    }
}

impl ActivityStore for SqliteStore {
    fn upsert(&mut self, rec: &CanonicalActivityRecord) -> Result<()> {
        let payload = serde_json::to_string(&rec.raw_payload)?;
        self.conn.execute(
            UPSERT,
            params![
                rec.activity_id,
                rec.strava_athlete_id,
                rec.activity_date,
                rec.distance_m,
                rec.elev_gain_m,
                rec.moving_time_s,
                rec.calories,
                rec.avg_cadence,
                rec.trainer,
                rec.sport_type,
                rec.elapsed_time_s,
                rec.pace_sec_per_km,
                rec.pace_text,
                rec.athlete_name,
                payload,
            ],
        )?;
        logd!("saved activity {} for athlete {}", rec.activity_id, rec.strava_athlete_id);
        Ok(())
    }
}

/// Columns back into a record; the payload comes back as text and is decoded
/// by the caller so JSON errors don't hide inside rusqlite's error type.
fn read_row(row: &Row<'_>) -> rusqlite::Result<(CanonicalActivityRecord, String)> {
    let rec = CanonicalActivityRecord {
        activity_id: row.get(0)?,
        strava_athlete_id: row.get(1)?,
        activity_date: row.get(2)?,
        distance_m: row.get(3)?,
        elev_gain_m: row.get(4)?,
        moving_time_s: row.get(5)?,
        calories: row.get(6)?,
        avg_cadence: row.get(7)?,
        trainer: row.get(8)?,
        sport_type: row.get(9)?,
        elapsed_time_s: row.get(10)?,
        pace_sec_per_km: row.get(11)?,
        pace_text: row.get(12)?,
        athlete_name: row.get(13)?,
        raw_payload: MergedRecord::new(),
    };
    Ok((rec, row.get(14)?))
}
