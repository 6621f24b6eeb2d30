//! Headless journey interface for programmatic use.
//!
//! This module runs a journey without a renderer. It's designed for:
//! - Scripted walkthroughs of the whole journey
//! - Automated testing of the section flow
//!
//! # Example
//!
//! ```ignore
//! use journey_core::headless::{HeadlessConfig, HeadlessJourney};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut journey = HeadlessJourney::new(HeadlessConfig::default()).unwrap();
//!     for line in ["start", "flip 0", "flip 1", "status"] {
//!         println!("{}", journey.run_line(line).await);
//!     }
//! }
//! ```

use crate::audio::{AudioOutput, MediaBackend, MediaElement, PlaybackError};
use crate::config::{ConfigError, JourneyConfig};
use crate::journey::{Collaborators, JourneyNavigator, JourneyPhase};
use crate::persist::InMemoryStore;
use crate::sinks::LogNotifier;
use std::sync::Arc;
use thiserror::Error;
use tokio::time::Instant;
use tracing::info;

/// Errors from parsing a headless command line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Missing argument for {0}")]
    MissingArgument(&'static str),

    #[error("Invalid argument for {command}: {value}")]
    InvalidArgument { command: &'static str, value: String },
}

/// One scripted user action.
#[derive(Debug, Clone, PartialEq)]
pub enum HeadlessCommand {
    Start,
    Next,
    Prev,
    GoTo(i64),
    Flip(usize),
    NewGame,
    Answer(String),
    Skip,
    Play,
    Seek(f64),
    Track(usize),
    Ended,
    Save,
    Music,
    Status,
}

impl HeadlessCommand {
    /// Parse a line such as `flip 3` or `answer pantai di sore hari`.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_lowercase().as_str() {
            "" => Err(CommandError::Empty),
            "start" => Ok(Self::Start),
            "next" => Ok(Self::Next),
            "prev" => Ok(Self::Prev),
            "goto" => parse_arg("goto", rest).map(Self::GoTo),
            "flip" => parse_arg("flip", rest).map(Self::Flip),
            "new-game" => Ok(Self::NewGame),
            "answer" => Ok(Self::Answer(rest.to_string())),
            "skip" => Ok(Self::Skip),
            "play" => Ok(Self::Play),
            "seek" => parse_arg("seek", rest).map(Self::Seek),
            "track" => parse_arg("track", rest).map(Self::Track),
            "ended" => Ok(Self::Ended),
            "save" => Ok(Self::Save),
            "music" => Ok(Self::Music),
            "status" => Ok(Self::Status),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn parse_arg<T: std::str::FromStr>(command: &'static str, value: &str) -> Result<T, CommandError> {
    if value.is_empty() {
        return Err(CommandError::MissingArgument(command));
    }
    value.parse().map_err(|_| CommandError::InvalidArgument {
        command,
        value: value.to_string(),
    })
}

/// Configuration for a headless journey.
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    pub journey: JourneyConfig,
    /// Duration reported for every voice track.
    pub track_seconds: f64,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            journey: JourneyConfig::default(),
            track_seconds: 60.0,
        }
    }
}

impl HeadlessConfig {
    pub fn with_journey(mut self, journey: JourneyConfig) -> Self {
        self.journey = journey;
        self
    }

    pub fn with_track_seconds(mut self, seconds: f64) -> Self {
        self.track_seconds = seconds;
        self
    }
}

/// Background output with nowhere to play.
#[derive(Debug, Default)]
struct SilentOutput;

impl AudioOutput for SilentOutput {
    fn load(&mut self, _source: &str) {}

    fn play(&mut self) -> Result<(), PlaybackError> {
        Ok(())
    }

    fn pause(&mut self) {}

    fn set_volume(&mut self, _volume: f32) {}
}

/// Voice element driven by the tokio clock.
#[derive(Debug, Default)]
struct SimulatedMedia {
    offset: f64,
    started: Option<Instant>,
}

impl SimulatedMedia {
    fn elapsed(&self) -> f64 {
        self.started
            .map(|at| at.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}

impl MediaElement for SimulatedMedia {
    fn load(&mut self, _source: &str) {
        self.offset = 0.0;
        self.started = None;
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        if self.started.is_none() {
            self.started = Some(Instant::now());
        }
        Ok(())
    }

    fn pause(&mut self) {
        self.offset += self.elapsed();
        self.started = None;
    }

    fn current_time(&self) -> f64 {
        self.offset + self.elapsed()
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.offset = seconds;
        if self.started.is_some() {
            self.started = Some(Instant::now());
        }
    }

    fn is_paused(&self) -> bool {
        self.started.is_none()
    }
}

#[derive(Debug, Default)]
struct SimulatedBackend;

impl MediaBackend for SimulatedBackend {
    fn create_element(&self) -> Box<dyn MediaElement> {
        Box::new(SimulatedMedia::default())
    }
}

/// A journey with simulated collaborators.
pub struct HeadlessJourney {
    journey: JourneyNavigator,
    track_seconds: f64,
    store: Arc<InMemoryStore>,
}

impl HeadlessJourney {
    pub fn new(config: HeadlessConfig) -> Result<Self, ConfigError> {
        let store = Arc::new(InMemoryStore::new());
        let journey = JourneyNavigator::new(
            config.journey,
            Collaborators {
                background: Box::new(SilentOutput),
                media: Arc::new(SimulatedBackend),
                store: store.clone(),
                notifier: Arc::new(LogNotifier),
                exporter: None,
            },
        )?;
        Ok(Self {
            journey,
            track_seconds: config.track_seconds,
            store,
        })
    }

    pub fn journey(&self) -> &JourneyNavigator {
        &self.journey
    }

    pub fn journey_mut(&mut self) -> &mut JourneyNavigator {
        &mut self.journey
    }

    pub fn store(&self) -> &InMemoryStore {
        &self.store
    }

    /// Parse and run one line, returning a one-line report.
    ///
    /// Pending journey events are drained and logged afterwards.
    pub async fn run_line(&mut self, line: &str) -> String {
        let report = match HeadlessCommand::parse(line) {
            Ok(command) => self.execute(command).await,
            Err(e) => format!("[ERROR] {e}"),
        };
        for event in self.journey.drain_events() {
            info!(event = ?event, "headless: journey event");
        }
        report
    }

    /// Run a command, returning a one-line report.
    pub async fn execute(&mut self, command: HeadlessCommand) -> String {
        match command {
            HeadlessCommand::Start => {
                self.journey.start();
                self.after_navigation();
            }
            HeadlessCommand::Next => {
                self.journey.go_next();
                self.after_navigation();
            }
            HeadlessCommand::Prev => {
                self.journey.go_prev();
                self.after_navigation();
            }
            HeadlessCommand::GoTo(index) => {
                self.journey.go_to(index);
                self.after_navigation();
            }
            HeadlessCommand::Flip(index) => match self.journey.memory_game_mut() {
                Some(game) => return format!("[FLIP] {:?}", game.flip_card(index)),
                None => return "[ERROR] Memory game is not mounted".to_string(),
            },
            HeadlessCommand::NewGame => match self.journey.memory_game_mut() {
                Some(game) => game.new_game(),
                None => return "[ERROR] Memory game is not mounted".to_string(),
            },
            HeadlessCommand::Answer(text) => {
                if self.journey.questions().is_none() {
                    return "[ERROR] Questions are not mounted".to_string();
                }
                let recorded = self.journey.submit_answer(&text);
                return format!("[ANSWER] recorded={recorded}");
            }
            HeadlessCommand::Skip => match self.journey.message_mut() {
                Some(reveal) => reveal.skip(),
                None => return "[ERROR] Letter is not mounted".to_string(),
            },
            HeadlessCommand::Play => match self.journey.voice_player() {
                Some(player) => player.toggle_play(),
                None => return "[ERROR] Voice messages are not mounted".to_string(),
            },
            HeadlessCommand::Seek(seconds) => match self.journey.voice_player() {
                Some(player) => player.seek(seconds),
                None => return "[ERROR] Voice messages are not mounted".to_string(),
            },
            HeadlessCommand::Track(index) => match self.journey.voice_player() {
                Some(player) => {
                    player.select(index);
                    player.on_metadata_loaded(self.track_seconds);
                }
                None => return "[ERROR] Voice messages are not mounted".to_string(),
            },
            HeadlessCommand::Ended => match self.journey.voice_player() {
                Some(player) => {
                    let before = player.active_index();
                    player.on_ended();
                    if player.active_index() != before {
                        player.on_metadata_loaded(self.track_seconds);
                    }
                }
                None => return "[ERROR] Voice messages are not mounted".to_string(),
            },
            HeadlessCommand::Save => {
                return match self.journey.save_memory().await {
                    Ok(record) => format!("[SAVED] {} answers", record.answers.len()),
                    Err(e) => format!("[ERROR] {e}"),
                };
            }
            HeadlessCommand::Music => self.journey.toggle_music(),
            HeadlessCommand::Status => {}
        }
        self.status()
    }

    fn after_navigation(&mut self) {
        if let Some(player) = self.journey.voice_player() {
            if player.snapshot().duration_seconds == 0.0 {
                player.on_metadata_loaded(self.track_seconds);
            }
        }
    }

    /// One-line summary of where the journey is.
    pub fn status(&self) -> String {
        let journey = &self.journey;
        if journey.phase() == JourneyPhase::Opening {
            return "[STATUS] opening".to_string();
        }

        let mut line = format!(
            "[STATUS] section {}/{}",
            journey.section_index() + 1,
            journey.section_count()
        );
        if let Some(section) = journey.current_section() {
            line.push_str(&format!(" ({})", section.label()));
        }
        line.push_str(&format!(
            " music={} answers={}",
            if journey.is_music_playing() { "on" } else { "off" },
            journey.answers().len()
        ));

        if let Some(game) = journey.memory_game() {
            let snapshot = game.snapshot();
            line.push_str(&format!(
                " pairs={}/{} attempts={} phase={:?}",
                snapshot.pairs_found(),
                snapshot.total_pairs(),
                snapshot.attempts,
                snapshot.phase
            ));
        }
        if let Some(flow) = journey.questions() {
            match flow.current() {
                Some(question) => line.push_str(&format!(" question=\"{}\"", question.text)),
                None => line.push_str(" questions=done"),
            }
        }
        if let Some(reveal) = journey.message() {
            line.push_str(&format!(" letter_done={}", reveal.is_done()));
        }
        if let Some(player) = journey.voice_player() {
            let snapshot = player.snapshot();
            line.push_str(&format!(
                " track=\"{}\" playing={} at={}/{}",
                player.active_track().map(|t| t.title.as_str()).unwrap_or("-"),
                snapshot.is_playing,
                crate::audio::player::format_time(snapshot.position_seconds),
                crate::audio::player::format_time(snapshot.duration_seconds)
            ));
        }
        line
    }
}
