//! Capture-file input.
//!
//! The upstream capture pass (frame grab, crop, threshold, recognition)
//! runs outside this tool and hands over its output as JSON Lines: one
//! results screen per line, twelve `{text, confidence}` rows top to
//! bottom, plus an optional snapshot label for the source frame.

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::matching::OcrRow;
use crate::roster::ROSTER_SIZE;

/// One results screen worth of OCR output.
#[derive(Debug, Clone, Deserialize)]
pub struct RaceCapture {
    /// Per-row OCR results, top to bottom
    pub rows: Vec<OcrRow>,
    /// Label of the source frame, when the producer kept one
    #[serde(default)]
    pub snapshot: Option<String>,
}

/// Reads every capture from a JSON Lines file.
///
/// Blank lines are skipped. Anything else must parse as one capture with
/// exactly `ROSTER_SIZE` rows; the error names the offending line.
pub fn read_captures(path: &Path) -> Result<Vec<RaceCapture>> {
    let file = File::open(path)
        .context(format!("Failed to open captures file: {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut captures = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read captures file")?;
        if line.trim().is_empty() {
            continue;
        }
        let capture: RaceCapture = serde_json::from_str(&line)
            .with_context(|| format!("Malformed capture on line {}", idx + 1))?;
        if capture.rows.len() != ROSTER_SIZE {
            return Err(anyhow!(
                "Capture on line {} has {} rows, expected {}",
                idx + 1,
                capture.rows.len(),
                ROSTER_SIZE
            ));
        }
        captures.push(capture);
    }

    Ok(captures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn capture_line(prefix: &str) -> String {
        let rows: Vec<String> = (0..12)
            .map(|i| format!(r#"{{"text":"{}{:02}","confidence":{}}}"#, prefix, i, 90 - i))
            .collect();
        format!(r#"{{"rows":[{}],"snapshot":"frame-{}.png"}}"#, rows.join(","), prefix)
    }

    #[test]
    fn test_reads_captures_in_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("captures.jsonl");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "{}", capture_line("a")).unwrap();
        writeln!(file).unwrap();
        writeln!(file, "{}", capture_line("b")).unwrap();

        let captures = read_captures(&path).unwrap();
        assert_eq!(captures.len(), 2);
        assert_eq!(captures[0].rows[0].text, "a00");
        assert_eq!(captures[0].rows[0].confidence, 90.0);
        assert_eq!(captures[1].snapshot.as_deref(), Some("frame-b.png"));
    }

    #[test]
    fn test_confidence_defaults_to_zero() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("captures.jsonl");
        let rows: Vec<String> = (0..12).map(|i| format!(r#"{{"text":"p{}"}}"#, i)).collect();
        std::fs::write(&path, format!(r#"{{"rows":[{}]}}"#, rows.join(","))).unwrap();

        let captures = read_captures(&path).unwrap();
        assert_eq!(captures[0].rows[3].confidence, 0.0);
        assert!(captures[0].snapshot.is_none());
    }

    #[test]
    fn test_rejects_malformed_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("captures.jsonl");
        std::fs::write(&path, format!("{}\nnot json\n", capture_line("a"))).unwrap();

        let err = format!("{:#}", read_captures(&path).unwrap_err());
        assert!(err.contains("line 2"), "unexpected error: {err}");
    }

    #[test]
    fn test_rejects_wrong_row_count() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("captures.jsonl");
        std::fs::write(&path, r#"{"rows":[{"text":"only one"}]}"#).unwrap();

        let err = read_captures(&path).unwrap_err().to_string();
        assert!(err.contains("expected 12"), "unexpected error: {err}");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope.jsonl");
        assert!(read_captures(&path).is_err());
    }
}
