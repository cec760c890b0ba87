//! Team grouping for team-mode rosters.

/// The players sharing one seed line of the roster file.
#[derive(Debug, Clone)]
pub struct Team {
    pub seed: u32,
    /// Display tag: A, B, C, ... in seed order
    pub tag: String,
    pub player_ids: Vec<String>,
}

/// Tag letter for a 1-based team number.
pub fn team_letter(n: u32) -> char {
    char::from(b'A' + ((n - 1) % 26) as u8)
}
