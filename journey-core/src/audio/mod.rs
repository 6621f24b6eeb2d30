//! Audio: the shared background stream and the voice message player.

pub mod background;
pub mod media;
pub mod player;

pub use background::{BackgroundMusic, Ducking};
pub use media::{AudioOutput, MediaBackend, MediaElement, PlaybackError};
pub use player::{AudioTrackController, PlaybackSnapshot};
