//! Mogi Results
//!
//! Resolves OCR'd race results screens against a known 12-player roster.
//! Each capture is matched with a weighted-edit-distance cost matrix and
//! an exact assignment solver; only what the matcher cannot settle safely
//! is handed to the user. Accepted races append to a session CSV and feed
//! the running scoreboard.

mod capture;
mod config;
mod manual;
mod matching;
mod paths;
mod roster;
mod session;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::manual::{AutoCancelResolver, PromptResolver};
use crate::matching::report::ResolutionReport;
use crate::matching::resolve::{ManualResolver, ResolveError, resolve_rows};
use crate::roster::Roster;
use crate::session::race::Race;
use crate::session::{Mogi, RACE_COUNT};

/// Per-session log file, active while a session is open.
static SESSION_LOG: Mutex<Option<PathBuf>> = Mutex::new(None);

/// Logs a message to both console and log file with timestamp.
/// While a session is open the message also lands in its session.log.
pub fn log(msg: &str) {
    let timestamp = Local::now().format("%H:%M:%S%.3f");
    let line = format!("[{}] {}\n", timestamp, msg);
    print!("{}", line);
    let log_path = paths::get_logs_dir().join("mogi_results.log");
    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        let _ = file.write_all(line.as_bytes());
    }
    if let Ok(guard) = SESSION_LOG.lock() {
        if let Some(path) = guard.as_ref() {
            if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
                let _ = file.write_all(line.as_bytes());
            }
        }
    }
}

/// Activates (Some) or deactivates (None) per-session logging.
pub fn set_session_log(path: Option<PathBuf>) {
    if let Ok(mut guard) = SESSION_LOG.lock() {
        *guard = path;
    }
}

/// Command line interface.
#[derive(Parser, Debug)]
#[command(name = "mogi-results", version)]
#[command(about = "Resolves OCR'd race results screens against a known roster")]
struct Args {
    /// Roster file: one line per seed, `1. Adam (12000 MMR)`
    #[arg(short, long)]
    roster: PathBuf,

    /// Captures file: JSON Lines, one results screen per line
    #[arg(short, long)]
    captures: PathBuf,

    /// Config file (default: config.json next to the executable)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip ambiguous captures instead of prompting
    #[arg(long)]
    non_interactive: bool,

    /// Write a JSON resolution report per capture into the session folder
    #[arg(long)]
    debug_reports: bool,
}

fn main() -> Result<()> {
    // Set up panic hook to log panics
    std::panic::set_hook(Box::new(|panic_info| {
        let msg = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        let location = if let Some(loc) = panic_info.location() {
            format!(" at {}:{}:{}", loc.file(), loc.line(), loc.column())
        } else {
            String::new()
        };
        let log_msg = format!("[PANIC]{} {}\n", location, msg);
        eprintln!("{}", log_msg);
        let log_path = paths::get_logs_dir().join("mogi_results.log");
        if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&log_path) {
            let _ = file.write_all(log_msg.as_bytes());
        }
    }));

    let args = Args::parse();

    paths::ensure_directories().context("Failed to create output directories")?;
    config::init_config(args.config.as_deref());

    // Timestamped session folder: output/YYYYMMDD_HHMMSS/
    let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let session_dir = paths::get_output_dir().join(&timestamp);
    fs::create_dir_all(&session_dir).context("Failed to create session directory")?;
    set_session_log(Some(session_dir.join("session.log")));
    log(&format!("Session folder: {}", session_dir.display()));

    let roster_text = fs::read_to_string(&args.roster)
        .context(format!("Failed to read roster file: {}", args.roster.display()))?;
    let roster = Roster::parse(&roster_text)?;
    if roster.players_per_team() > 1 {
        log(&format!(
            "Roster loaded: {} players in teams of {}",
            roster.len(),
            roster.players_per_team()
        ));
    } else {
        log(&format!("Roster loaded: {} players", roster.len()));
    }

    let captures = capture::read_captures(&args.captures)?;
    log(&format!(
        "Loaded {} captures from {}",
        captures.len(),
        args.captures.display()
    ));

    let csv_path = session_dir.join("results.csv");
    session::csv::init_csv(&csv_path)?;

    let reports_dir = session_dir.join("reports");
    if args.debug_reports {
        fs::create_dir_all(&reports_dir).context("Failed to create reports directory")?;
    }

    let mut manual: Box<dyn ManualResolver> = if args.non_interactive {
        Box::new(AutoCancelResolver)
    } else {
        Box::new(PromptResolver::new(std::io::stdin().lock(), std::io::stdout()))
    };

    let cfg = &config::get_config().matching;
    let mut mogi = Mogi::new(roster);
    let mut report = ResolutionReport::default();

    for (idx, cap) in captures.iter().enumerate() {
        if mogi.ended() {
            log(&format!(
                "Event already has {} races, ignoring remaining captures",
                RACE_COUNT
            ));
            break;
        }
        log(&format!("Resolving capture {}/{}", idx + 1, captures.len()));

        let outcome = resolve_rows(&cap.rows, mogi.roster(), cfg, manual.as_mut(), &mut report);
        if args.debug_reports {
            let report_path = reports_dir.join(format!("race-{:02}.json", idx + 1));
            report.export_json(&report_path)?;
        }

        match outcome {
            Ok(placements) => {
                mogi.roster_mut().lock_igns(&placements);
                let race = Race::new(placements, cap.snapshot.clone());
                session::csv::append_race(&csv_path, mogi.races().len(), &race)?;
                print_race(&race, mogi.races().len() + 1);
                mogi.add_race(race)?;
            }
            Err(ResolveError::NoScoreboard {
                blank_rows,
                row_count,
            }) => {
                log(&format!(
                    "Capture {} rejected: {} of {} rows blank, not a results screen",
                    idx + 1,
                    blank_rows,
                    row_count
                ));
            }
            Err(ResolveError::ManualCancelled) => {
                log(&format!(
                    "Capture {} skipped: manual resolution cancelled",
                    idx + 1
                ));
            }
            Err(other) => {
                return Err(other).with_context(|| format!("Capture {} failed", idx + 1));
            }
        }
    }

    print_scoreboard(&mogi);
    log(&format!("Results CSV: {}", csv_path.display()));
    set_session_log(None);
    Ok(())
}

/// Prints one accepted race as a table.
fn print_race(race: &Race, number: usize) {
    println!();
    match race.snapshot() {
        Some(label) => println!(
            "Race {} at {} (frame {})",
            number,
            race.timestamp().format("%H:%M:%S"),
            label
        ),
        None => println!("Race {} at {}", number, race.timestamp().format("%H:%M:%S")),
    }
    for p in race.placements() {
        println!(
            "  {:>4}  {:<24} +{:<3} OCR \"{}\" ({:.0}%)",
            p.ordinal(),
            p.resolved_name,
            p.score(),
            p.ocr_text,
            p.ocr_confidence
        );
    }
}

/// Prints final standings with credited names, and team totals in team mode.
fn print_scoreboard(mogi: &Mogi) {
    if mogi.races().is_empty() {
        log("No races recorded");
        return;
    }
    let totals = mogi.player_totals();
    let mut standings: Vec<(&roster::Player, u32)> = mogi
        .roster()
        .players()
        .iter()
        .map(|p| (p, totals.get(p.id()).copied().unwrap_or(0)))
        .collect();
    standings.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.seed().cmp(&b.0.seed())));

    println!();
    println!(
        "Final standings after {} races ({} points possible):",
        mogi.races().len(),
        mogi.max_score()
    );
    for (rank, (player, total)) in standings.iter().enumerate() {
        println!("  {:>2}. {:<24} {:>3}", rank + 1, player.credited_name(rank + 1), total);
    }

    if mogi.roster().players_per_team() > 1 {
        println!();
        println!("Team totals:");
        for team in mogi.roster().teams() {
            let sum: u32 = team
                .player_ids
                .iter()
                .map(|id| totals.get(id).copied().unwrap_or(0))
                .sum();
            let members: Vec<&str> = team
                .player_ids
                .iter()
                .filter_map(|id| mogi.roster().by_id(id).map(|p| p.name()))
                .collect();
            println!("  Team {}: {:>3} ({})", team.tag, sum, members.join(", "));
        }
    }
}
