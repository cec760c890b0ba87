//! Diagnostics for a resolution run.
//!
//! The engine fills a `ResolutionReport` through an injected `&mut` on
//! every call, success or failure, so a bad capture always leaves a trace
//! that can be exported and shared.

use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::matching::OcrRow;

/// Where a resolution run ended up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveOutcome {
    #[default]
    Pending,
    Resolved,
    Cancelled,
    NoScoreboard,
}

/// What happened to a single row: what OCR saw and what the matcher did.
#[derive(Clone, Debug, Serialize)]
pub struct RowTrace {
    /// Row index, 0-based top to bottom
    pub idx: usize,
    pub ocr_text: String,
    pub normalized: String,
    pub confidence: f32,
    pub was_blank: bool,
    /// Roster entry index the solver paired with this row
    pub assigned_entry: Option<usize>,
    /// Matrix cost of that pairing
    pub assigned_cost: Option<u32>,
    /// Pairing was dropped afterwards by the ambiguity policy
    pub revoked: bool,
}

/// Full trace of the most recent resolution call.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ResolutionReport {
    /// Local time the run started, ISO format
    pub timestamp: String,
    pub outcome: ResolveOutcome,
    /// Cost given to every cell of a blank column, once known
    pub blank_cost: Option<u32>,
    /// Surcharge for claiming someone else's locked in-game name, once known
    pub theft_penalty: Option<u32>,
    pub rows: Vec<RowTrace>,
}

impl ResolutionReport {
    /// Clears the previous run and stamps the new one.
    pub fn start(&mut self) {
        self.timestamp = Local::now().format("%Y-%m-%dT%H:%M:%S").to_string();
        self.outcome = ResolveOutcome::Pending;
        self.blank_cost = None;
        self.theft_penalty = None;
        self.rows.clear();
    }

    /// Records the per-row base trace, before any matrix work.
    pub fn trace_rows(&mut self, rows: &[OcrRow], normalized: &[String]) {
        self.rows = rows
            .iter()
            .zip(normalized)
            .enumerate()
            .map(|(idx, (row, norm))| RowTrace {
                idx,
                ocr_text: row.text.clone(),
                normalized: norm.clone(),
                confidence: row.confidence,
                was_blank: norm.is_empty(),
                assigned_entry: None,
                assigned_cost: None,
                revoked: false,
            })
            .collect();
    }

    pub fn set_penalties(&mut self, blank_cost: u32, theft_penalty: u32) {
        self.blank_cost = Some(blank_cost);
        self.theft_penalty = Some(theft_penalty);
    }

    pub fn finish(&mut self, outcome: ResolveOutcome) {
        self.outcome = outcome;
    }

    /// Writes the report as pretty-printed JSON.
    pub fn export_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize resolution report")?;
        let mut file = File::create(path)
            .context(format!("Failed to create report file: {}", path.display()))?;
        file.write_all(json.as_bytes())
            .context("Failed to write report JSON")?;
        Ok(())
    }
}
