//! Session state: the roster plus every race recorded so far.

pub mod csv;
pub mod race;

pub use race::{POINTS_BY_PLACEMENT, Placement, Race};

use anyhow::{Result, anyhow};
use std::collections::HashMap;

use crate::roster::Roster;

/// Races in a full event.
pub const RACE_COUNT: usize = 12;

/// One event in progress.
pub struct Mogi {
    roster: Roster,
    races: Vec<Race>,
}

impl Mogi {
    pub fn new(roster: Roster) -> Self {
        Self {
            roster,
            races: Vec::new(),
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    pub fn races(&self) -> &[Race] {
        &self.races
    }

    /// True once the event has its full `RACE_COUNT` races.
    pub fn ended(&self) -> bool {
        self.races.len() >= RACE_COUNT
    }

    /// Highest total a player could reach: every race won.
    pub fn max_score(&self) -> u32 {
        POINTS_BY_PLACEMENT.iter().sum::<u32>() * RACE_COUNT as u32
    }

    pub fn add_race(&mut self, race: Race) -> Result<()> {
        if self.ended() {
            return Err(anyhow!("Too many races: event already has {}", RACE_COUNT));
        }
        self.races.push(race);
        Ok(())
    }

    /// Replaces the placements of an already recorded race.
    pub fn update_race(&mut self, index: usize, placements: Vec<Placement>) -> Result<()> {
        let race = self
            .races
            .get_mut(index)
            .ok_or_else(|| anyhow!("No race at index {}", index))?;
        race.set_placements(placements);
        Ok(())
    }

    pub fn delete_race(&mut self, index: usize) -> Result<()> {
        if index >= self.races.len() {
            return Err(anyhow!("No race at index {}", index));
        }
        self.races.remove(index);
        Ok(())
    }

    /// Total score per player id across all recorded races.
    pub fn player_totals(&self) -> HashMap<String, u32> {
        let mut totals: HashMap<String, u32> = HashMap::new();
        for race in &self.races {
            for (id, score) in race.player_scores() {
                *totals.entry(id).or_insert(0) += score;
            }
        }
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Roster {
        let text: String = (1..=12)
            .map(|i| format!("{}. Player{:02} (10000 MMR)\n", i, i))
            .collect();
        Roster::parse(&text).unwrap()
    }

    fn race_with_winner(winner_id: &str) -> Race {
        let mut first = Placement::new(1, "w", 90.0);
        first.set_player(winner_id, "Winner");
        let mut last = Placement::new(12, "l", 90.0);
        last.set_player("p12", "Last");
        Race::new(vec![first, last], None)
    }

    #[test]
    fn test_event_ends_after_race_count() {
        let mut mogi = Mogi::new(roster());
        for _ in 0..RACE_COUNT {
            assert!(!mogi.ended());
            mogi.add_race(race_with_winner("p01")).unwrap();
        }
        assert!(mogi.ended());
        assert!(mogi.add_race(race_with_winner("p01")).is_err());
    }

    #[test]
    fn test_player_totals_accumulate() {
        let mut mogi = Mogi::new(roster());
        mogi.add_race(race_with_winner("p01")).unwrap();
        mogi.add_race(race_with_winner("p01")).unwrap();
        mogi.add_race(race_with_winner("p02")).unwrap();

        let totals = mogi.player_totals();
        assert_eq!(totals["p01"], 30);
        assert_eq!(totals["p02"], 15);
        assert_eq!(totals["p12"], 3);
        assert!(!totals.contains_key("p03"));
    }

    #[test]
    fn test_update_race_replaces_placements() {
        let mut mogi = Mogi::new(roster());
        mogi.add_race(race_with_winner("p01")).unwrap();

        let mut fixed = Placement::new(1, "w", 90.0);
        fixed.set_player("p05", "Fixed");
        mogi.update_race(0, vec![fixed]).unwrap();

        assert_eq!(mogi.player_totals()["p05"], 15);
        assert!(mogi.update_race(7, Vec::new()).is_err());
    }

    #[test]
    fn test_delete_race() {
        let mut mogi = Mogi::new(roster());
        mogi.add_race(race_with_winner("p01")).unwrap();
        mogi.add_race(race_with_winner("p02")).unwrap();

        mogi.delete_race(0).unwrap();
        assert_eq!(mogi.races().len(), 1);
        assert_eq!(mogi.player_totals()["p02"], 15);
        assert!(mogi.delete_race(5).is_err());
    }

    #[test]
    fn test_max_score() {
        let mogi = Mogi::new(roster());
        // 82 points on the table per race, 12 races
        assert_eq!(mogi.max_score(), 984);
    }
}
