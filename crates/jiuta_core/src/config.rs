//! Startup configuration.
//!
//! # Responsibility
//! - Read logging and new-score settings from the process environment.
//! - Keep parsing testable through an injectable lookup.
//!
//! # Invariants
//! - Missing variables fall back to defaults; present but invalid values are
//!   errors, never silently ignored.
//! - Tempo values outside `MIN_TEMPO..=MAX_TEMPO` are clamped, matching the
//!   tempo form control.

use crate::logging::{default_log_level, normalize_level};
use crate::model::grid::{clamp_tempo, DEFAULT_TEMPO, DEFAULT_TITLE, MAX_TEMPO, MIN_TEMPO};
use crate::model::instrument::Instrument;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const ENV_LOG_LEVEL: &str = "JIUTA_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "JIUTA_LOG_DIR";
pub const ENV_TITLE: &str = "JIUTA_TITLE";
pub const ENV_TEMPO: &str = "JIUTA_TEMPO";
pub const ENV_INSTRUMENT: &str = "JIUTA_INSTRUMENT";

/// Settings applied to the score of a new session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreDefaults {
    pub title: String,
    pub tempo: u16,
    pub instrument: Instrument,
}

impl Default for ScoreDefaults {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            tempo: DEFAULT_TEMPO,
            instrument: Instrument::Shamisen,
        }
    }
}

/// Full editor configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    /// Normalized log level (`trace|debug|info|warn|error`).
    pub log_level: &'static str,
    /// Absolute log directory; file logging stays off when `None`.
    pub log_dir: Option<String>,
    pub score: ScoreDefaults,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_dir: None,
            score: ScoreDefaults::default(),
        }
    }
}

impl EditorConfig {
    /// Reads configuration from `JIUTA_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// # Errors
    /// - `InvalidLogLevel` for an unsupported level name.
    /// - `InvalidTempo` when the tempo is not an integer.
    /// - `UnknownInstrument` for an instrument outside the closed set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level =
                normalize_level(&level).map_err(|_| ConfigError::InvalidLogLevel(level))?;
        }
        if let Some(dir) = read(ENV_LOG_DIR) {
            config.log_dir = Some(dir.trim().to_string());
        }
        if let Some(title) = lookup(ENV_TITLE) {
            config.score.title = title;
        }
        if let Some(tempo) = read(ENV_TEMPO) {
            let parsed = tempo
                .trim()
                .parse::<i64>()
                .map_err(|_| ConfigError::InvalidTempo(tempo.clone()))?;
            config.score.tempo = clamp_tempo(parsed);
        }
        if let Some(instrument) = read(ENV_INSTRUMENT) {
            config.score.instrument = instrument
                .parse::<Instrument>()
                .map_err(|_| ConfigError::UnknownInstrument(instrument))?;
        }
        Ok(config)
    }
}

/// Configuration parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidLogLevel(String),
    InvalidTempo(String),
    UnknownInstrument(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLogLevel(value) => write!(
                f,
                "{ENV_LOG_LEVEL}=`{value}` is unsupported; expected trace|debug|info|warn|error"
            ),
            Self::InvalidTempo(value) => write!(
                f,
                "{ENV_TEMPO}=`{value}` is not an integer ({MIN_TEMPO}-{MAX_TEMPO})"
            ),
            Self::UnknownInstrument(value) => write!(
                f,
                "{ENV_INSTRUMENT}=`{value}` is unknown; expected Koto|Shamisen|Shakuhachi"
            ),
        }
    }
}

impl Error for ConfigError {}
