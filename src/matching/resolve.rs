//! Resolves one results screen against the roster.
//!
//! Pipeline: normalize the OCR rows, reject frames with too many blanks,
//! price every player/row pairing (edit distance plus blank and
//! identity-theft penalties), solve the optimal assignment, then apply
//! the ambiguity policy. Rows the policy leaves open go to a single
//! leftover pairing when possible, otherwise to the manual resolver.

use anyhow::Result;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use crate::config::{BlankPolicy, MatchConfig};
use crate::matching::OcrRow;
use crate::matching::assign::solve_assignment;
use crate::matching::distance::weighted_edit_distance;
use crate::matching::normalize::normalize_name;
use crate::matching::report::{ResolutionReport, ResolveOutcome};
use crate::roster::Roster;
use crate::session::race::Placement;

/// Why a resolution attempt produced no race. All of these are scoped to
/// the one capture; the caller moves on to the next.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Too many unreadable rows: this frame is not a results screen.
    #[error("no scoreboard: {blank_rows} of {row_count} rows blank")]
    NoScoreboard { blank_rows: usize, row_count: usize },
    /// The human reviewing the leftovers cancelled instead of confirming.
    #[error("manual resolution cancelled")]
    ManualCancelled,
    /// Capture shape does not match the roster.
    #[error("expected {expected} OCR rows, got {got}")]
    RowCount { expected: usize, got: usize },
    /// The manual resolution front end itself failed.
    #[error("manual resolution failed: {0}")]
    Manual(anyhow::Error),
}

/// A roster entry still unmatched, as offered to manual resolution.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub id: String,
    pub name: String,
}

/// Front end that lets a human settle what the matcher could not.
///
/// Implementations must fill every open placement from `remaining`, each
/// candidate used at most once, before returning `Ok(true)`; `Ok(false)`
/// cancels the capture and discards the attempt.
pub trait ManualResolver {
    fn resolve(&mut self, placements: &mut [Placement], remaining: &[Candidate]) -> Result<bool>;
}

struct Penalties {
    blank_cost: u32,
    theft_penalty: u32,
}

/// Prices every player/row pairing.
///
/// Base cost is the weighted edit distance from the player's expected
/// identity to the row text. Blank columns then get a flat cost strictly
/// above every real match, so they soak up whoever fits nowhere else.
/// A column that reads exactly as some player's locked in-game name is
/// reserved for that player: everyone else pays a surcharge on top of
/// their distance, big enough that no tie ever hands the row away.
fn build_cost_matrix(
    targets: &[String],
    rows_norm: &[String],
    ign_owner: &HashMap<String, usize>,
    cfg: &MatchConfig,
) -> (Vec<Vec<u32>>, Penalties) {
    let n = targets.len();
    let mut cost = vec![vec![0u32; n]; n];

    let mut max_base = 0u32;
    for (i, target) in targets.iter().enumerate() {
        for (j, row) in rows_norm.iter().enumerate() {
            if row.is_empty() {
                continue;
            }
            let d = weighted_edit_distance(target, row, &cfg.weights);
            cost[i][j] = d;
            max_base = max_base.max(d);
        }
    }

    let blank_cost = max_base + cfg.blank_margin;
    let theft_penalty = max_base + cfg.theft_margin;

    for (j, row) in rows_norm.iter().enumerate() {
        if row.is_empty() {
            for entry_costs in cost.iter_mut() {
                entry_costs[j] = blank_cost;
            }
        } else if let Some(&owner) = ign_owner.get(row.as_str()) {
            for (i, entry_costs) in cost.iter_mut().enumerate() {
                if i != owner {
                    entry_costs[j] += theft_penalty;
                }
            }
        }
    }

    (
        cost,
        Penalties {
            blank_cost,
            theft_penalty,
        },
    )
}

/// Resolves the rows of one captured results screen to placements.
///
/// On success every placement carries a player id; rows flagged `dc`
/// were blank and score as disconnects. The report is filled on every
/// path, including failures.
pub fn resolve_rows(
    rows: &[OcrRow],
    roster: &Roster,
    cfg: &MatchConfig,
    manual: &mut dyn ManualResolver,
    report: &mut ResolutionReport,
) -> Result<Vec<Placement>, ResolveError> {
    report.start();

    let n = roster.len();
    if rows.len() != n {
        return Err(ResolveError::RowCount {
            expected: n,
            got: rows.len(),
        });
    }
    let players = roster.players();

    let rows_norm: Vec<String> = rows.iter().map(|r| normalize_name(&r.text)).collect();
    report.trace_rows(rows, &rows_norm);

    let mut placements: Vec<Placement> = rows
        .iter()
        .enumerate()
        .map(|(j, row)| Placement::new(j + 1, &row.text, row.confidence))
        .collect();

    // Reject before any matrix work: a frame this unreadable is a menu or
    // a mid-race shot, not the results screen.
    let blank_rows = rows_norm.iter().filter(|s| s.is_empty()).count();
    if blank_rows > cfg.max_blank_rows {
        crate::log(&format!(
            "Rejecting capture: {} of {} rows blank",
            blank_rows, n
        ));
        report.finish(ResolveOutcome::NoScoreboard);
        return Err(ResolveError::NoScoreboard {
            blank_rows,
            row_count: n,
        });
    }

    let targets: Vec<String> = players
        .iter()
        .map(|p| normalize_name(p.expected_identity()))
        .collect();
    let mut ign_owner: HashMap<String, usize> = HashMap::new();
    for (i, player) in players.iter().enumerate() {
        if let Some(ign) = player.locked_ign() {
            let norm = normalize_name(ign);
            if !norm.is_empty() {
                ign_owner.insert(norm, i);
            }
        }
    }

    let (cost, penalties) = build_cost_matrix(&targets, &rows_norm, &ign_owner, cfg);
    report.set_penalties(penalties.blank_cost, penalties.theft_penalty);

    let assignment = solve_assignment(&cost);
    let mut row_cost = vec![0u32; n];
    for (entry, &row) in assignment.iter().enumerate() {
        placements[row].set_player(players[entry].id(), players[entry].name());
        row_cost[row] = cost[entry][row];
        report.rows[row].assigned_entry = Some(entry);
        report.rows[row].assigned_cost = Some(cost[entry][row]);
    }

    // Per-row ambiguity policy: flag blanks as disconnects, revoke
    // pairings the matcher only took because something had to.
    for (row, placement) in placements.iter_mut().enumerate() {
        if rows_norm[row].is_empty() {
            placement.dc = true;
            if cfg.blank_policy == BlankPolicy::Discard {
                placement.clear_player("");
                report.rows[row].revoked = true;
            }
        } else if row_cost[row] > cfg.max_edit_distance {
            let raw = placement.ocr_text.clone();
            crate::log(&format!(
                "Row {}: cost {} exceeds {}, revoking \"{}\"",
                row + 1,
                row_cost[row],
                cfg.max_edit_distance,
                raw
            ));
            placement.clear_player(&raw);
            report.rows[row].revoked = true;
        }
    }

    let assigned_ids: HashSet<&str> = placements
        .iter()
        .filter_map(|p| p.player_id.as_deref())
        .collect();
    let remaining: Vec<Candidate> = players
        .iter()
        .filter(|p| !assigned_ids.contains(p.id()))
        .map(|p| Candidate {
            id: p.id().to_string(),
            name: p.name().to_string(),
        })
        .collect();

    if remaining.is_empty() {
        report.finish(ResolveOutcome::Resolved);
        return Ok(placements);
    }

    // One open row and one leftover player can only pair one way.
    if remaining.len() == 1 {
        if let Some(open) = placements.iter_mut().find(|p| p.player_id.is_none()) {
            crate::log(&format!(
                "Row {}: only {} left unmatched, auto-assigned",
                open.position, remaining[0].name
            ));
            open.set_player(&remaining[0].id, &remaining[0].name);
            report.finish(ResolveOutcome::Resolved);
            return Ok(placements);
        }
    }

    crate::log(&format!(
        "{} rows unresolved, asking for manual resolution",
        remaining.len()
    ));
    let confirmed = manual
        .resolve(&mut placements, &remaining)
        .map_err(ResolveError::Manual)?;
    if !confirmed {
        report.finish(ResolveOutcome::Cancelled);
        return Err(ResolveError::ManualCancelled);
    }
    debug_assert!(
        placements.iter().all(|p| p.player_id.is_some()),
        "manual resolver confirmed with open rows"
    );

    report.finish(ResolveOutcome::Resolved);
    Ok(placements)
}
