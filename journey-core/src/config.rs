//! Journey configuration.
//!
//! All timings, content, and tuning values the engines read. Built with
//! `with_*` setters starting from [`JourneyConfig::default`], which carries
//! the shipped content.

use crate::content::{self, Question, Track};
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;

/// Errors from configuration validation.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Memory game needs at least one symbol")]
    NoSymbols,

    #[error("Duplicate card symbol: {0}")]
    DuplicateSymbol(String),

    #[error("Voice message catalogue is empty")]
    EmptyCatalogue,

    #[error("No reflective questions configured")]
    NoQuestions,

    #[error("Duck level must be within [0, 1], got {0}")]
    InvalidDuckLevel(f32),

    #[error("{0} must be greater than zero")]
    ZeroInterval(&'static str),
}

/// Memory game tuning.
#[derive(Debug, Clone)]
pub struct GameSettings {
    /// Distinct card faces; the deck holds each twice.
    pub symbols: Vec<String>,
    /// How long a mismatched pair stays face up.
    pub settle_delay: Duration,
    /// Pause between the final match and the completion signal.
    pub celebration_delay: Duration,
    /// Fixed shuffle seed. `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            symbols: content::SYMBOLS.clone(),
            settle_delay: Duration::from_millis(800),
            celebration_delay: Duration::from_millis(500),
            seed: None,
        }
    }
}

/// Voice message player tuning.
#[derive(Debug, Clone)]
pub struct PlayerSettings {
    pub catalogue: Vec<Track>,
    /// Period of the progress sampling loop while a track plays.
    pub progress_interval: Duration,
    /// Background music volume while the voice section is mounted.
    pub duck_level: f32,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            catalogue: content::TRACKS.clone(),
            progress_interval: Duration::from_millis(16),
            duck_level: 0.7,
        }
    }
}

/// Configuration for a journey.
#[derive(Debug, Clone)]
pub struct JourneyConfig {
    pub game: GameSettings,
    pub player: PlayerSettings,
    pub questions: Vec<Question>,
    /// Letter typed out in the message section.
    pub letter: String,
    /// Delay between revealed letter characters.
    pub typing_interval: Duration,
    /// Quote saved with the closing memory.
    pub closing_quote: String,
    /// Store key for the closing memory.
    pub memory_key: String,
    /// Source of the looping background music.
    pub background_track: String,
}

impl Default for JourneyConfig {
    fn default() -> Self {
        Self {
            game: GameSettings::default(),
            player: PlayerSettings::default(),
            questions: content::QUESTIONS.clone(),
            letter: content::LETTER.to_string(),
            typing_interval: Duration::from_millis(35),
            closing_quote: content::CLOSING_QUOTE.to_string(),
            memory_key: content::MEMORY_KEY.to_string(),
            background_track: content::BACKGROUND_MUSIC.to_string(),
        }
    }
}

impl JourneyConfig {
    /// Create a config with the shipped content.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_symbols(mut self, symbols: Vec<String>) -> Self {
        self.game.symbols = symbols;
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.game.settle_delay = delay;
        self
    }

    pub fn with_celebration_delay(mut self, delay: Duration) -> Self {
        self.game.celebration_delay = delay;
        self
    }

    /// Shuffle decks deterministically.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.game.seed = Some(seed);
        self
    }

    pub fn with_catalogue(mut self, catalogue: Vec<Track>) -> Self {
        self.player.catalogue = catalogue;
        self
    }

    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.player.progress_interval = interval;
        self
    }

    pub fn with_duck_level(mut self, level: f32) -> Self {
        self.player.duck_level = level;
        self
    }

    pub fn with_questions(mut self, questions: Vec<Question>) -> Self {
        self.questions = questions;
        self
    }

    pub fn with_letter(mut self, letter: impl Into<String>) -> Self {
        self.letter = letter.into();
        self
    }

    pub fn with_typing_interval(mut self, interval: Duration) -> Self {
        self.typing_interval = interval;
        self
    }

    pub fn with_closing_quote(mut self, quote: impl Into<String>) -> Self {
        self.closing_quote = quote.into();
        self
    }

    pub fn with_background_track(mut self, source: impl Into<String>) -> Self {
        self.background_track = source.into();
        self
    }

    pub fn with_memory_key(mut self, key: impl Into<String>) -> Self {
        self.memory_key = key.into();
        self
    }

    /// Check the invariants the engines rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.game.symbols.is_empty() {
            return Err(ConfigError::NoSymbols);
        }
        let mut seen = HashSet::new();
        for symbol in &self.game.symbols {
            if !seen.insert(symbol) {
                return Err(ConfigError::DuplicateSymbol(symbol.clone()));
            }
        }
        if self.player.catalogue.is_empty() {
            return Err(ConfigError::EmptyCatalogue);
        }
        if self.questions.is_empty() {
            return Err(ConfigError::NoQuestions);
        }
        let level = self.player.duck_level;
        if !(0.0..=1.0).contains(&level) {
            return Err(ConfigError::InvalidDuckLevel(level));
        }
        if self.typing_interval.is_zero() {
            return Err(ConfigError::ZeroInterval("typing_interval"));
        }
        if self.player.progress_interval.is_zero() {
            return Err(ConfigError::ZeroInterval("progress_interval"));
        }
        Ok(())
    }
}
