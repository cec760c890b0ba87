pub mod assign;
pub mod distance;
pub mod normalize;
pub mod report;
pub mod resolve;

pub use assign::solve_assignment;
pub use distance::{EditWeights, weighted_edit_distance};
pub use normalize::normalize_name;
pub use report::{ResolutionReport, ResolveOutcome};
pub use resolve::{Candidate, ManualResolver, ResolveError, resolve_rows};

use serde::Deserialize;

/// One OCR'd row of a results screen, top to bottom, as delivered by the
/// external recognition pass.
#[derive(Debug, Clone, Deserialize)]
pub struct OcrRow {
    /// Raw recognized text. May be empty or garbage.
    pub text: String,
    /// Recognition confidence, 0-100.
    #[serde(default)]
    pub confidence: f32,
}

impl OcrRow {
    pub fn new(text: &str, confidence: f32) -> Self {
        Self {
            text: text.to_string(),
            confidence,
        }
    }
}
