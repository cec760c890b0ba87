//! CSV writer for resolved races.
//!
//! Writes placements to the session CSV in append-only mode for crash
//! safety. Each race adds one row per placement.

use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use crate::session::race::Race;

/// CSV header row.
const CSV_HEADER: &str = "race,timestamp,position,player_id,player,ocr_text,confidence,dc,score";

/// Free-text fields ride in a comma-separated line; swap commas out.
fn sanitize(field: &str) -> String {
    field.replace(',', ";")
}

/// Initializes CSV file with header if it doesn't exist or is empty.
///
/// If the file exists and has content, this does nothing (preserves existing data).
pub fn init_csv(path: &Path) -> Result<()> {
    if path.exists() {
        let file = File::open(path).context("Failed to open existing CSV")?;
        let reader = BufReader::new(file);
        if reader.lines().next().is_some() {
            return Ok(());
        }
    }

    let mut file = File::create(path).context("Failed to create CSV file")?;
    writeln!(file, "{}", CSV_HEADER).context("Failed to write CSV header")?;
    Ok(())
}

/// Appends one race to the CSV file, one row per placement.
///
/// Opens the file in append mode for each write. If a later capture goes
/// wrong, every race accepted so far is already on disk.
pub fn append_race(path: &Path, race_index: usize, race: &Race) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .context("Failed to open CSV for append")?;

    let timestamp = race.timestamp().format("%Y-%m-%dT%H:%M:%S");
    for p in race.placements() {
        let line = format!(
            "{},{},{},{},{},{},{:.1},{},{}",
            race_index + 1,
            timestamp,
            p.position,
            p.player_id.as_deref().unwrap_or(""),
            sanitize(&p.resolved_name),
            sanitize(&p.ocr_text),
            p.ocr_confidence,
            p.dc,
            p.score(),
        );
        writeln!(file, "{}", line).context("Failed to write CSV row")?;
    }
    Ok(())
}
