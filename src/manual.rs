//! Manual resolution front ends.
//!
//! When the matcher leaves rows open, `PromptResolver` walks the user
//! through them: every open row shows its OCR text and confidence, the
//! user picks from the unmatched players, and nothing is applied until
//! the full set of picks is distinct and confirmed. Cancelling at any
//! prompt abandons the capture.

use anyhow::{Context, Result};
use std::io::{BufRead, Write};

use crate::matching::resolve::{Candidate, ManualResolver};
use crate::session::race::Placement;

/// Interactive resolver over any line-based input/output pair.
pub struct PromptResolver<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptResolver<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Reads one trimmed line. None means end of input.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let n = self
            .input
            .read_line(&mut line)
            .context("Failed to read selection")?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

impl<R: BufRead, W: Write> ManualResolver for PromptResolver<R, W> {
    fn resolve(&mut self, placements: &mut [Placement], remaining: &[Candidate]) -> Result<bool> {
        let open: Vec<usize> = placements
            .iter()
            .enumerate()
            .filter(|(_, p)| p.player_id.is_none())
            .map(|(i, _)| i)
            .collect();
        if open.is_empty() {
            return Ok(true);
        }

        loop {
            writeln!(
                self.output,
                "\nManual resolution: {} row(s) need a player",
                open.len()
            )?;
            for (k, c) in remaining.iter().enumerate() {
                writeln!(self.output, "  [{}] {}", k + 1, c.name)?;
            }

            let mut picks: Vec<usize> = Vec::with_capacity(open.len());
            let mut used = vec![false; remaining.len()];
            let mut cancelled = false;

            for &row in &open {
                let p = &placements[row];
                loop {
                    write!(
                        self.output,
                        "Row {} OCR \"{}\" ({:.0}%) -> number, or c to cancel: ",
                        p.position, p.ocr_text, p.ocr_confidence
                    )?;
                    self.output.flush()?;
                    let line = match self.read_line()? {
                        Some(line) => line,
                        None => {
                            cancelled = true;
                            break;
                        }
                    };
                    if line.eq_ignore_ascii_case("c") {
                        cancelled = true;
                        break;
                    }
                    match line.parse::<usize>() {
                        Ok(k) if (1..=remaining.len()).contains(&k) && !used[k - 1] => {
                            used[k - 1] = true;
                            picks.push(k - 1);
                            break;
                        }
                        Ok(k) if (1..=remaining.len()).contains(&k) => {
                            writeln!(self.output, "{} is already taken", remaining[k - 1].name)?;
                        }
                        _ => {
                            writeln!(
                                self.output,
                                "Enter a number between 1 and {}",
                                remaining.len()
                            )?;
                        }
                    }
                }
                if cancelled {
                    break;
                }
            }
            if cancelled {
                return Ok(false);
            }

            writeln!(self.output)?;
            for (&row, &k) in open.iter().zip(&picks) {
                writeln!(
                    self.output,
                    "  Row {} -> {}",
                    placements[row].position, remaining[k].name
                )?;
            }
            write!(
                self.output,
                "Apply? y to accept, c to cancel, anything else to redo: "
            )?;
            self.output.flush()?;

            match self.read_line()? {
                None => return Ok(false),
                Some(line) if line.eq_ignore_ascii_case("y") => {
                    for (&row, &k) in open.iter().zip(&picks) {
                        placements[row].set_player(&remaining[k].id, &remaining[k].name);
                    }
                    return Ok(true);
                }
                Some(line) if line.eq_ignore_ascii_case("c") => return Ok(false),
                Some(_) => {} // redo from the top
            }
        }
    }
}

/// Stand-in for `--non-interactive` runs: cancels every manual request,
/// so ambiguous captures are skipped instead of blocking on a prompt.
pub struct AutoCancelResolver;

impl ManualResolver for AutoCancelResolver {
    fn resolve(&mut self, _: &mut [Placement], _: &[Candidate]) -> Result<bool> {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn open_placements() -> Vec<Placement> {
        let mut resolved = Placement::new(1, "alpha", 95.0);
        resolved.set_player("p01", "Alpha");
        vec![
            resolved,
            Placement::new(2, "??", 30.0),
            Placement::new(3, "", 0.0),
        ]
    }

    fn candidates() -> Vec<Candidate> {
        vec![
            Candidate {
                id: "p05".to_string(),
                name: "Echo".to_string(),
            },
            Candidate {
                id: "p11".to_string(),
                name: "Kilo".to_string(),
            },
        ]
    }

    fn run(input: &str, placements: &mut [Placement]) -> (bool, String) {
        let mut out = Vec::new();
        let confirmed = {
            let mut resolver = PromptResolver::new(Cursor::new(input.as_bytes()), &mut out);
            resolver.resolve(placements, &candidates()).unwrap()
        };
        (confirmed, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_fills_open_rows_in_pick_order() {
        let mut placements = open_placements();
        let (confirmed, output) = run("1\n2\ny\n", &mut placements);

        assert!(confirmed);
        assert_eq!(placements[1].player_id.as_deref(), Some("p05"));
        assert_eq!(placements[1].resolved_name, "Echo");
        assert_eq!(placements[2].player_id.as_deref(), Some("p11"));
        // Untouched row keeps its player
        assert_eq!(placements[0].player_id.as_deref(), Some("p01"));
        assert!(output.contains("[1] Echo"));
        assert!(output.contains("Row 2"));
    }

    #[test]
    fn test_rejects_duplicate_pick() {
        let mut placements = open_placements();
        let (confirmed, output) = run("1\n1\n2\ny\n", &mut placements);

        assert!(confirmed);
        assert!(output.contains("Echo is already taken"));
        assert_eq!(placements[2].player_id.as_deref(), Some("p11"));
    }

    #[test]
    fn test_rejects_out_of_range_and_garbage() {
        let mut placements = open_placements();
        let (confirmed, output) = run("7\nxyz\n1\n2\ny\n", &mut placements);

        assert!(confirmed);
        assert!(output.contains("Enter a number between 1 and 2"));
    }

    #[test]
    fn test_cancel_leaves_placements_untouched() {
        let mut placements = open_placements();
        let (confirmed, _) = run("1\nc\n", &mut placements);

        assert!(!confirmed);
        assert!(placements[1].player_id.is_none());
        assert!(placements[2].player_id.is_none());
    }

    #[test]
    fn test_eof_cancels() {
        let mut placements = open_placements();
        let (confirmed, _) = run("", &mut placements);
        assert!(!confirmed);
    }

    #[test]
    fn test_redo_swaps_picks() {
        let mut placements = open_placements();
        let (confirmed, _) = run("1\n2\nredo\n2\n1\ny\n", &mut placements);

        assert!(confirmed);
        assert_eq!(placements[1].player_id.as_deref(), Some("p11"));
        assert_eq!(placements[2].player_id.as_deref(), Some("p05"));
    }

    #[test]
    fn test_cancel_at_confirmation() {
        let mut placements = open_placements();
        let (confirmed, _) = run("1\n2\nc\n", &mut placements);

        assert!(!confirmed);
        assert!(placements[1].player_id.is_none());
    }

    #[test]
    fn test_nothing_open_confirms_immediately() {
        let mut placements = vec![{
            let mut p = Placement::new(1, "alpha", 95.0);
            p.set_player("p01", "Alpha");
            p
        }];
        let (confirmed, output) = run("", &mut placements);
        assert!(confirmed);
        assert!(output.is_empty());
    }

    #[test]
    fn test_auto_cancel_resolver() {
        let mut placements = open_placements();
        let confirmed = AutoCancelResolver
            .resolve(&mut placements, &candidates())
            .unwrap();
        assert!(!confirmed);
    }
}
