//! Matching configuration.
//!
//! Loads settings from config.json at startup. Provides edit-distance
//! weights, penalty margins, and the thresholds that decide when a
//! resolution is ambiguous enough to need a human.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use crate::matching::distance::EditWeights;

/// Global configuration instance, initialized once at startup.
static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// What to do with a row whose OCR text normalized to nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlankPolicy {
    /// Keep the solver's pairing and flag the row as a disconnect.
    KeepFlagged,
    /// Drop the pairing; the row goes to manual resolution.
    Discard,
}

/// Tunables for the resolution engine.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Edit-distance weights, expected name -> observed OCR text
    pub weights: EditWeights,
    /// An assigned row costing more than this is revoked to manual resolution
    pub max_edit_distance: u32,
    /// Added to the highest observed match cost to price a blank column
    pub blank_margin: u32,
    /// Added to the highest observed match cost to charge a non-owner for a
    /// row that exactly matches someone else's locked in-game name
    pub theft_margin: u32,
    /// More blank rows than this rejects the capture as not a results screen
    pub max_blank_rows: usize,
    /// How blank rows that survive the rejection check are handled
    pub blank_policy: BlankPolicy,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            weights: EditWeights::default(),
            max_edit_distance: 3,
            blank_margin: 2,
            theft_margin: 50,
            max_blank_rows: 2,
            blank_policy: BlankPolicy::KeepFlagged,
        }
    }
}

/// Complete application configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub matching: MatchConfig,
}

/// Loads configuration from the given file, or from config.json next to
/// the executable, or returns defaults.
fn load_config(explicit: Option<&Path>) -> AppConfig {
    let config_path = explicit.map(Path::to_path_buf).unwrap_or_else(|| {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|p| p.join("config.json")))
            .unwrap_or_else(|| Path::new("config.json").to_path_buf())
    });

    crate::log(&format!("Looking for config at: {}", config_path.display()));

    if config_path.exists() {
        match fs::read_to_string(&config_path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    crate::log(&format!("Config loaded from {}", config_path.display()));
                    return config;
                }
                Err(e) => {
                    crate::log(&format!(
                        "Failed to parse {}: {}. Using defaults.",
                        config_path.display(),
                        e
                    ));
                }
            },
            Err(e) => {
                crate::log(&format!(
                    "Failed to read {}: {}. Using defaults.",
                    config_path.display(),
                    e
                ));
            }
        }
    } else {
        crate::log("config.json not found. Using default config.");
    }

    AppConfig::default()
}

/// Initializes the global configuration. Call once at startup.
pub fn init_config(path: Option<&Path>) {
    let _ = CONFIG.set(load_config(path));
}

/// Returns a reference to the global configuration.
/// Panics if called before init_config().
pub fn get_config() -> &'static AppConfig {
    CONFIG
        .get()
        .expect("Config not initialized. Call init_config() first.")
}
