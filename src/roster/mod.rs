//! The fixed 12-player roster and its text format.
//!
//! A roster file has one line per seed:
//!
//! ```text
//! 1. Adam (12000 MMR)
//! 2. Eve, Mallory (11500 MMR)
//! - replaced by Zoe from Race 4
//! ```
//!
//! A line with several comma-separated names is a team sharing that seed.
//! A `- replaced by` line records a substitution for the most recent
//! player above it, with a 1-based race number.

pub mod player;
pub mod team;

pub use player::{ActiveIdentity, Player, Substitute};
pub use team::Team;

use anyhow::{Context, Result, anyhow};
use regex::Regex;

use crate::matching::normalize::normalize_name;
use crate::roster::team::team_letter;
use crate::session::RACE_COUNT;
use crate::session::race::Placement;

/// Players on a results screen.
pub const ROSTER_SIZE: usize = 12;

/// `1. Adam (12000 MMR)` with one or more comma-separated names.
const ROSTER_LINE_PATTERN: &str = r"^(\d+)\.\s*(.+?)\s*\((\d+)\s*MMR\)$";
/// `- replaced by Zoe from Race 4`
const SUB_LINE_PATTERN: &str = r"^-\s*replaced by\s+(.+?)\s+from Race\s+(\d+)$";

/// All twelve roster entries, in seed order.
#[derive(Debug, Clone)]
pub struct Roster {
    players: Vec<Player>,
    /// 1 in free-for-all mode
    players_per_team: usize,
}

impl Roster {
    /// Parses a roster file. Requires exactly `ROSTER_SIZE` players with
    /// the same number of names on every line.
    pub fn parse(input: &str) -> Result<Self> {
        let line_re = Regex::new(ROSTER_LINE_PATTERN).context("Invalid roster line pattern")?;
        let sub_re = Regex::new(SUB_LINE_PATTERN).context("Invalid substitution line pattern")?;

        let mut players: Vec<Player> = Vec::new();
        let mut team_size: Option<usize> = None;

        for (idx, raw_line) in input.lines().enumerate() {
            let line = raw_line.trim();
            let line_num = idx + 1;
            if line.is_empty() {
                continue;
            }

            if let Some(caps) = sub_re.captures(line) {
                let name = caps[1].trim().to_string();
                let race: usize = caps[2]
                    .parse()
                    .with_context(|| format!("Line {}: bad race number", line_num))?;
                if race == 0 || race > RACE_COUNT {
                    return Err(anyhow!(
                        "Line {}: race number must be 1-{}, got {}",
                        line_num,
                        RACE_COUNT,
                        race
                    ));
                }
                let target = players.last_mut().ok_or_else(|| {
                    anyhow!("Line {}: substitution before any player", line_num)
                })?;
                let sub_id = format!("{}-s{}", target.id(), target.substitutes().len() + 1);
                target.add_substitute(Substitute::new(&sub_id, &name, race - 1));
                continue;
            }

            let caps = line_re.captures(line).ok_or_else(|| {
                anyhow!(
                    "Line {}: expected `1. Name (12000 MMR)`, got `{}`",
                    line_num,
                    line
                )
            })?;
            let seed: u32 = caps[1]
                .parse()
                .with_context(|| format!("Line {}: bad seed", line_num))?;
            let mmr: u32 = caps[3]
                .parse()
                .with_context(|| format!("Line {}: bad MMR", line_num))?;

            let names: Vec<&str> = caps[2].split(',').map(str::trim).collect();
            if names.iter().any(|n| n.is_empty()) {
                return Err(anyhow!("Line {}: empty player name", line_num));
            }
            match team_size {
                None => team_size = Some(names.len()),
                Some(size) if size != names.len() => {
                    return Err(anyhow!(
                        "Line {}: {} names but earlier lines have {}",
                        line_num,
                        names.len(),
                        size
                    ));
                }
                Some(_) => {}
            }

            for name in names {
                let id = format!("p{:02}", players.len() + 1);
                players.push(Player::new(&id, name, seed, mmr));
            }
        }

        if players.len() != ROSTER_SIZE {
            return Err(anyhow!(
                "Expected {} players, got {}",
                ROSTER_SIZE,
                players.len()
            ));
        }
        // Stable sort keeps line order within a team
        players.sort_by_key(Player::seed);

        Ok(Self {
            players,
            players_per_team: team_size.unwrap_or(1),
        })
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// All entries, in seed order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn players_per_team(&self) -> usize {
        self.players_per_team
    }

    pub fn by_id(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id() == id)
    }

    pub fn by_id_mut(&mut self, id: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id() == id)
    }

    /// Teams in seed order. In free-for-all mode every team is a single
    /// player.
    pub fn teams(&self) -> Vec<Team> {
        let mut teams: Vec<Team> = Vec::new();
        for p in &self.players {
            if let Some(team) = teams.last_mut() {
                if team.seed == p.seed() {
                    team.player_ids.push(p.id().to_string());
                    continue;
                }
            }
            teams.push(Team {
                seed: p.seed(),
                tag: team_letter(teams.len() as u32 + 1).to_string(),
                player_ids: vec![p.id().to_string()],
            });
        }
        teams
    }

    /// Registers a substitute for the given player from the given race
    /// (0-based index of the first race they play).
    pub fn add_substitute(&mut self, player_id: &str, name: &str, joined_at: usize) -> Result<()> {
        let player = self
            .by_id_mut(player_id)
            .ok_or_else(|| anyhow!("No player with id {}", player_id))?;
        let sub_id = format!("{}-s{}", player_id, player.substitutes().len() + 1);
        player.add_substitute(Substitute::new(&sub_id, name, joined_at));
        Ok(())
    }

    /// Locks in-game names from freshly accepted placements: the first
    /// successfully resolved, non-blank OCR text a slot produces becomes
    /// its identity for the rest of the event.
    pub fn lock_igns(&mut self, placements: &[Placement]) {
        for row in placements {
            let Some(id) = row.player_id.as_deref() else {
                continue;
            };
            let raw = row.ocr_text.trim();
            if normalize_name(raw).is_empty() {
                continue;
            }
            let Some(player) = self.by_id_mut(id) else {
                continue;
            };
            if player.lock_active_ign(raw) {
                crate::log(&format!("IGN locked for {}: \"{}\"", player.name(), raw));
            }
        }
    }
}
