//! Seams to the host's audio elements.

use thiserror::Error;

/// Why a play request did not start playback.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("Playback blocked by the host (autoplay policy)")]
    Blocked,

    #[error("Media error: {0}")]
    Media(String),
}

/// The looping background music stream.
pub trait AudioOutput: Send {
    /// Point the stream at its looping source. Called once, on start.
    fn load(&mut self, source: &str);
    fn play(&mut self) -> Result<(), PlaybackError>;
    fn pause(&mut self);
    /// Volume in `[0, 1]`.
    fn set_volume(&mut self, volume: f32);
}

/// A single voice message element.
pub trait MediaElement: Send {
    /// Point the element at a new source. Playback stops.
    fn load(&mut self, source: &str);
    fn play(&mut self) -> Result<(), PlaybackError>;
    fn pause(&mut self);
    /// Playback cursor in seconds.
    fn current_time(&self) -> f64;
    fn set_current_time(&mut self, seconds: f64);
    fn is_paused(&self) -> bool;
}

/// Creates a voice element each time the voice section mounts.
pub trait MediaBackend: Send + Sync {
    fn create_element(&self) -> Box<dyn MediaElement>;
}
