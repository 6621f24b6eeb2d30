//! Birthday journey engine.
//!
//! This crate provides:
//! - Section navigation over an opening screen and six journey sections
//! - A memory matching game with settle and celebration delays
//! - A voice message player with progress sampling and auto-advance
//! - Pointer parallax, the letter reveal, and the reflective questions
//! - Saving the closing memory to a local key-value store
//!
//! Renderers, stores, and audio elements are supplied by the host through
//! the traits in [`audio`], [`persist`], and [`sinks`].
//!
//! # Quick Start
//!
//! ```ignore
//! use journey_core::{Collaborators, JourneyConfig, JourneyNavigator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut journey = JourneyNavigator::new(JourneyConfig::default(), collaborators())?;
//!     journey.start();
//!
//!     if let Some(game) = journey.memory_game_mut() {
//!         game.flip_card(0);
//!     }
//!     journey.go_to(5);
//!     journey.save_memory().await?;
//!     Ok(())
//! }
//! ```

pub mod audio;
pub mod config;
pub mod content;
pub mod events;
pub mod headless;
pub mod journey;
pub mod memory_game;
pub mod parallax;
pub mod persist;
pub mod questions;
pub mod sinks;
pub mod testing;
pub mod timer;
pub mod typewriter;

// Primary public API
pub use audio::{AudioTrackController, BackgroundMusic, Ducking, PlaybackSnapshot};
pub use config::{ConfigError, JourneyConfig};
pub use events::JourneyEvent;
pub use headless::{HeadlessConfig, HeadlessJourney};
pub use journey::{
    ActiveSection, Collaborators, JourneyError, JourneyNavigator, JourneyPhase, Section,
    JOURNEY_SECTIONS,
};
pub use memory_game::{FlipOutcome, GamePhase, GameSnapshot, MemoryGame};
pub use parallax::{ParallaxOffset, ParallaxTracker};
pub use persist::{JsonFileStore, KeyValueStore, MemoryRecord, PersistError};
pub use questions::{AnswerRecord, QuestionFlow};
pub use testing::TestHarness;
