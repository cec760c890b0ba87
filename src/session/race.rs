//! One recorded race: twelve placements and their scores.

use chrono::{DateTime, Local};
use std::collections::HashMap;

/// Points awarded by finishing position (index 0 = 1st place).
pub const POINTS_BY_PLACEMENT: [u32; 12] = [15, 12, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1];

/// Fixed score for a disconnected player, regardless of position.
const DC_SCORE: u32 = 1;

/// The resolved outcome of one row of a results screen.
#[derive(Debug, Clone)]
pub struct Placement {
    /// Finishing position, 1-based top to bottom
    pub position: usize,
    /// Resolved roster entry, None until resolution settles it
    pub player_id: Option<String>,
    /// Display name for this row: player name once resolved, raw OCR
    /// text while revoked, empty for a discarded blank
    pub resolved_name: String,
    /// Raw OCR text, before normalization
    pub ocr_text: String,
    /// OCR confidence, 0-100
    pub ocr_confidence: f32,
    /// Row was blank: the player is treated as disconnected
    pub dc: bool,
}

impl Placement {
    pub fn new(position: usize, ocr_text: &str, ocr_confidence: f32) -> Self {
        Self {
            position,
            player_id: None,
            resolved_name: ocr_text.to_string(),
            ocr_text: ocr_text.to_string(),
            ocr_confidence,
            dc: false,
        }
    }

    /// Pairs this row with a roster entry.
    pub fn set_player(&mut self, id: &str, name: &str) {
        self.player_id = Some(id.to_string());
        self.resolved_name = name.to_string();
    }

    /// Drops the pairing, leaving `display` as the row's shown text.
    pub fn clear_player(&mut self, display: &str) {
        self.player_id = None;
        self.resolved_name = display.to_string();
    }

    /// Points this row contributes. Disconnects score a fixed 1 no matter
    /// where the row sits, so their pairing can never change a total.
    pub fn score(&self) -> u32 {
        if self.dc {
            return DC_SCORE;
        }
        POINTS_BY_PLACEMENT
            .get(self.position - 1)
            .copied()
            .unwrap_or(0)
    }

    /// `1st`, `2nd`, ... for display. Disconnects render as `DC`.
    pub fn ordinal(&self) -> String {
        if self.dc {
            return "DC".to_string();
        }
        let suffix = match self.position {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        };
        format!("{}{}", self.position, suffix)
    }
}

/// One recorded race.
#[derive(Debug, Clone)]
pub struct Race {
    timestamp: DateTime<Local>,
    placements: Vec<Placement>,
    /// Label of the source frame, when the capture carried one
    snapshot: Option<String>,
}

impl Race {
    pub fn new(placements: Vec<Placement>, snapshot: Option<String>) -> Self {
        Self {
            timestamp: Local::now(),
            placements,
            snapshot,
        }
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn snapshot(&self) -> Option<&str> {
        self.snapshot.as_deref()
    }

    /// Replaces the placements, keeping timestamp and snapshot.
    pub fn set_placements(&mut self, placements: Vec<Placement>) {
        self.placements = placements;
    }

    /// Score earned per resolved player id in this race.
    pub fn player_scores(&self) -> HashMap<String, u32> {
        let mut scores = HashMap::new();
        for p in &self.placements {
            if let Some(id) = &p.player_id {
                scores.insert(id.clone(), p.score());
            }
        }
        scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_by_placement() {
        let mut p = Placement::new(1, "winner", 95.0);
        assert_eq!(p.score(), 15);
        p.position = 12;
        assert_eq!(p.score(), 1);
        p.position = 13;
        assert_eq!(p.score(), 0);
    }

    #[test]
    fn test_dc_scores_one_anywhere() {
        for position in [1, 6, 12] {
            let mut p = Placement::new(position, "", 0.0);
            p.dc = true;
            assert_eq!(p.score(), 1);
        }
    }

    #[test]
    fn test_ordinals() {
        assert_eq!(Placement::new(1, "", 0.0).ordinal(), "1st");
        assert_eq!(Placement::new(2, "", 0.0).ordinal(), "2nd");
        assert_eq!(Placement::new(3, "", 0.0).ordinal(), "3rd");
        assert_eq!(Placement::new(11, "", 0.0).ordinal(), "11th");
        let mut dc = Placement::new(4, "", 0.0);
        dc.dc = true;
        assert_eq!(dc.ordinal(), "DC");
    }

    #[test]
    fn test_set_and_clear_player() {
        let mut p = Placement::new(3, "adaam", 70.0);
        assert_eq!(p.resolved_name, "adaam");
        p.set_player("p01", "Adam");
        assert_eq!(p.player_id.as_deref(), Some("p01"));
        assert_eq!(p.resolved_name, "Adam");
        p.clear_player(&p.ocr_text.clone());
        assert!(p.player_id.is_none());
        assert_eq!(p.resolved_name, "adaam");
    }

    #[test]
    fn test_player_scores_skips_unresolved() {
        let mut a = Placement::new(1, "a", 90.0);
        a.set_player("p01", "A");
        let b = Placement::new(2, "?", 20.0);
        let race = Race::new(vec![a, b], None);

        let scores = race.player_scores();
        assert_eq!(scores.len(), 1);
        assert_eq!(scores["p01"], 15);
    }
}
