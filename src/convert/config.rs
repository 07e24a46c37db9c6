// Conversion configuration
// Experiment toggles and thresholds, loadable from a JSON file

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

bitflags! {
    /// Optional conversion behaviours
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct ConversionExperiments: u32 {
        /// Clap samples add a second tap/hold on the opposite lane
        const TWIN_NOTES = 1;
        /// Clap samples on slides add a second slide
        const TWIN_SLIDES = 2;
        /// Whistle samples on instant events become touch notes
        const TOUCH = 4;
    }
}

impl Default for ConversionExperiments {
    fn default() -> Self {
        ConversionExperiments::empty()
    }
}

impl ConversionExperiments {
    /// Parse a comma separated list such as "twin_notes,touch"
    pub fn from_list(list: &str) -> ConfigResult<Self> {
        let mut flags = ConversionExperiments::empty();
        for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            flags |= match name.to_lowercase().as_str() {
                "none" => ConversionExperiments::empty(),
                "twin_notes" | "twinnotes" => ConversionExperiments::TWIN_NOTES,
                "twin_slides" | "twinslides" => ConversionExperiments::TWIN_SLIDES,
                "touch" => ConversionExperiments::TOUCH,
                _ => return Err(ConfigError::UnknownExperiment(name.to_string())),
            };
        }
        Ok(flags)
    }
}

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown conversion experiment: {0}")]
    UnknownExperiment(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings for a conversion session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Enabled experiments
    pub experiments: ConversionExperiments,

    /// Minimum curve duration (ms, inclusive) for a whistle to produce a slide
    pub slide_duration_threshold: f64,

    /// Minimum sustained duration (ms, inclusive) for a touch hold
    pub touch_hold_min_duration: f64,

    /// Spans shorter than this (ms) on repeating curves produce no approach taps
    pub repeat_spam_span: f64,

    /// Keep a per-event decision record during conversion
    pub record_decisions: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        ConversionConfig {
            experiments: ConversionExperiments::empty(),
            slide_duration_threshold: 350.0,
            touch_hold_min_duration: 100.0,
            repeat_spam_span: 75.0,
            record_decisions: false,
        }
    }
}

impl ConversionConfig {
    /// Config with the given experiments and default thresholds
    pub fn with_experiments(experiments: ConversionExperiments) -> Self {
        ConversionConfig {
            experiments,
            ..Default::default()
        }
    }

    /// Load from a JSON file; missing fields take their defaults
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let contents = fs::read_to_string(path)?;
        let config: ConversionConfig = serde_json::from_str(&contents)?;
        log::debug!("Loaded conversion config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Write as pretty JSON
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn enabled(&self, experiment: ConversionExperiments) -> bool {
        self.experiments.contains(experiment)
    }
}
