//! Roster entries: players, substitutes, and the crediting rule.

use crate::roster::ROSTER_SIZE;
use crate::session::RACE_COUNT;

/// A rostered player.
///
/// The display name comes from the roster file and never changes. The
/// in-game name is learned from the first successfully resolved screen
/// and locked from then on, so later races match against what OCR
/// actually produces for this player.
#[derive(Debug, Clone)]
pub struct Player {
    id: String,
    name: String,
    seed: u32,
    mmr: u32,
    ign: Option<String>,
    substitutes: Vec<Substitute>,
}

impl Player {
    pub fn new(id: &str, name: &str, seed: u32, mmr: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            seed,
            mmr,
            ign: None,
            substitutes: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn mmr(&self) -> u32 {
        self.mmr
    }

    /// This player's own locked in-game name, if set.
    pub fn ign(&self) -> Option<&str> {
        self.ign.as_deref()
    }

    /// Locks this player's in-game name. The first lock wins; later calls
    /// are no-ops. Returns true when this call set it.
    pub fn lock_ign(&mut self, ign: &str) -> bool {
        if self.ign.is_some() {
            return false;
        }
        self.ign = Some(ign.to_string());
        true
    }

    pub fn substitutes(&self) -> &[Substitute] {
        &self.substitutes
    }

    pub fn add_substitute(&mut self, sub: Substitute) {
        self.substitutes.push(sub);
    }

    /// The identity currently on track: the most recent substitute, or the
    /// player themselves.
    pub fn active(&self) -> ActiveIdentity<'_> {
        match self.substitutes.last() {
            Some(sub) => ActiveIdentity::Substitute(sub),
            None => ActiveIdentity::Original(self),
        }
    }

    /// Locks the in-game name of whoever is currently playing this slot.
    pub fn lock_active_ign(&mut self, ign: &str) -> bool {
        match self.substitutes.last_mut() {
            Some(sub) => sub.lock_ign(ign),
            None => self.lock_ign(ign),
        }
    }

    /// The string OCR is expected to produce for this slot: the active
    /// identity's locked in-game name when known, else its display name.
    pub fn expected_identity(&self) -> &str {
        match self.active() {
            ActiveIdentity::Original(p) => p.ign.as_deref().unwrap_or(&p.name),
            ActiveIdentity::Substitute(s) => s.ign.as_deref().unwrap_or(&s.name),
        }
    }

    /// The active identity's locked in-game name, if locked.
    pub fn locked_ign(&self) -> Option<&str> {
        match self.active() {
            ActiveIdentity::Original(p) => p.ign.as_deref(),
            ActiveIdentity::Substitute(s) => s.ign.as_deref(),
        }
    }

    /// Name credited with this slot's result at the given final rank.
    ///
    /// A substitute takes the credit when they played the whole event, or
    /// when the slot finished in the winning half and the substitute played
    /// at least 4 races. A substitute never takes a losing result.
    pub fn credited_name(&self, final_rank: usize) -> &str {
        let sub = match self.substitutes.last() {
            Some(sub) => sub,
            None => return &self.name,
        };
        if sub.joined_at() == 0 {
            return sub.name();
        }
        let winning = final_rank <= ROSTER_SIZE / 2;
        if winning && RACE_COUNT.saturating_sub(sub.joined_at()) >= 4 {
            return sub.name();
        }
        &self.name
    }
}

/// Which identity is on track for a roster slot.
#[derive(Debug, Clone, Copy)]
pub enum ActiveIdentity<'a> {
    Original(&'a Player),
    Substitute(&'a Substitute),
}

impl ActiveIdentity<'_> {
    pub fn name(&self) -> &str {
        match self {
            ActiveIdentity::Original(p) => p.name(),
            ActiveIdentity::Substitute(s) => s.name(),
        }
    }
}

/// A mid-event replacement for a rostered player.
#[derive(Debug, Clone)]
pub struct Substitute {
    id: String,
    name: String,
    ign: Option<String>,
    /// 0-based index of the first race the substitute played
    joined_at: usize,
}

impl Substitute {
    pub fn new(id: &str, name: &str, joined_at: usize) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            ign: None,
            joined_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ign(&self) -> Option<&str> {
        self.ign.as_deref()
    }

    pub fn joined_at(&self) -> usize {
        self.joined_at
    }

    /// First lock wins, as for players.
    pub fn lock_ign(&mut self, ign: &str) -> bool {
        if self.ign.is_some() {
            return false;
        }
        self.ign = Some(ign.to_string());
        true
    }
}
