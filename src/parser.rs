use csv::Reader;
use std::collections::{BTreeMap, HashSet};
use std::io::Read;
use std::path::Path;

use thiserror::Error;

use crate::schedule::types::{RequiredStaff, SlotId, WorkerSeed, MAX_REQUIRED_STAFF};

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Row {row}: invalid hours '{value}'")]
    InvalidHours { row: usize, value: String },

    #[error("Worker listed twice in roster: {0}")]
    DuplicateWorker(String),

    #[error("Roster has no workers")]
    Empty,

    #[error("Invalid required staff list '{0}': expected 7 comma-separated counts of 0-5")]
    InvalidRequiredStaff(String),
}

/// Loads a roster from a CSV file with `name` and `total_hours` columns.
pub fn load_roster<P: AsRef<Path>>(csv_path: P) -> Result<Vec<WorkerSeed>, RosterError> {
    let file = std::fs::File::open(csv_path)?;
    read_roster(file)
}

/// Reads a roster from any CSV source.
///
/// Columns are located by header text ("name", "hours"), falling back to the
/// first two columns. Rows with an empty name are skipped; hours must be a
/// whole number.
pub fn read_roster<R: Read>(source: R) -> Result<Vec<WorkerSeed>, RosterError> {
    let mut reader = Reader::from_reader(source);
    let headers = reader.headers()?;

    let name_col = headers
        .iter()
        .position(|h| h.trim().to_lowercase().contains("name"))
        .unwrap_or(0);
    let hours_col = headers
        .iter()
        .position(|h| h.trim().to_lowercase().contains("hours"))
        .unwrap_or(1);

    let mut seen = HashSet::new();
    let mut roster = Vec::new();

    for (index, result) in reader.records().enumerate() {
        let record = result?;
        // header is row 1
        let row = index + 2;

        let name = record.get(name_col).unwrap_or("").trim().to_string();
        if name.is_empty() {
            continue;
        }

        let raw_hours = record.get(hours_col).unwrap_or("").trim();
        let total_hours: u32 = raw_hours.parse().map_err(|_| RosterError::InvalidHours {
            row,
            value: raw_hours.to_string(),
        })?;

        if !seen.insert(name.clone()) {
            return Err(RosterError::DuplicateWorker(name));
        }
        roster.push(WorkerSeed::new(name, total_hours));
    }

    if roster.is_empty() {
        return Err(RosterError::Empty);
    }
    Ok(roster)
}

/// Parses "2,3,3,3,3,3,2" into targets for slots 1 through 7.
pub fn parse_required_staff(value: &str) -> Result<RequiredStaff, RosterError> {
    let invalid = || RosterError::InvalidRequiredStaff(value.to_string());

    let counts: Vec<u8> = value
        .split(',')
        .map(|part| part.trim().parse::<u8>().map_err(|_| invalid()))
        .collect::<Result<_, _>>()?;

    if counts.len() != 7 || counts.iter().any(|&c| c > MAX_REQUIRED_STAFF) {
        return Err(invalid());
    }

    let table: BTreeMap<SlotId, u8> = counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| (i as SlotId + 1, count))
        .collect();
    Ok(RequiredStaff::new(table))
}
