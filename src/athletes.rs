// src/athletes.rs
// Where the athlete id list comes from.
use std::{fs, path::PathBuf};

use crate::error::{Result, ScrapeError};

#[derive(Clone, Debug)]
pub enum AthleteSource {
    /// Taken as given, trimmed; only blank values are dropped.
    Ids(Vec<String>),
    /// One id per line; blank and non-numeric lines are ignored.
    File(PathBuf),
}

impl AthleteSource {
    /// Resolved, ordered id list. Never empty.
    pub fn load(&self) -> Result<Vec<String>> {
        let ids: Vec<String> = match self {
            AthleteSource::Ids(ids) => ids
                .iter()
                .map(|id| id.trim())
                .filter(|id| !id.is_empty())
                .map(|id| s!(id))
                .collect(),
            AthleteSource::File(path) => {
                let text = fs::read_to_string(path)?;
                text.lines().filter_map(numeric_line).collect()
            }
        };
        if ids.is_empty() {
            return Err(ScrapeError::NoAthletes);
        }
        Ok(ids)
    }
}

fn numeric_line(line: &str) -> Option<String> {
    let t = line.trim();
    (!t.is_empty() && t.bytes().all(|b| b.is_ascii_digit())).then(|| s!(t))
}
