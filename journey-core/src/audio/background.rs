//! The single background music stream.
//!
//! The navigator owns transport (play/pause). Other sections get a
//! [`Ducking`] handle, which can only lower and restore the volume.

use super::media::{AudioOutput, PlaybackError};
use crate::timer::lock;
use std::sync::{Arc, Mutex};
use tracing::debug;

const FULL_VOLUME: f32 = 1.0;

struct Stream {
    output: Box<dyn AudioOutput>,
    volume: f32,
}

/// Handle to the background stream. Cloning shares the same stream.
#[derive(Clone)]
pub struct BackgroundMusic {
    stream: Arc<Mutex<Stream>>,
}

impl BackgroundMusic {
    pub fn new(output: Box<dyn AudioOutput>) -> Self {
        Self {
            stream: Arc::new(Mutex::new(Stream {
                output,
                volume: FULL_VOLUME,
            })),
        }
    }

    pub(crate) fn load(&self, source: &str) {
        lock(&self.stream).output.load(source);
        debug!(source, "audio: background source loaded");
    }

    pub(crate) fn play(&self) -> Result<(), PlaybackError> {
        lock(&self.stream).output.play()
    }

    pub(crate) fn pause(&self) {
        lock(&self.stream).output.pause();
    }

    /// Current volume as last requested through this handle.
    pub fn volume(&self) -> f32 {
        lock(&self.stream).volume
    }

    /// Volume-only access for a foreground audio section.
    pub fn ducking(&self) -> Ducking {
        Ducking {
            stream: self.stream.clone(),
        }
    }
}

/// Lowers the background volume while foreground audio is around.
pub struct Ducking {
    stream: Arc<Mutex<Stream>>,
}

impl Ducking {
    pub fn set_duck_level(&self, level: f32) {
        let level = level.clamp(0.0, FULL_VOLUME);
        let mut stream = lock(&self.stream);
        stream.volume = level;
        stream.output.set_volume(level);
        debug!(level, "audio: background ducked");
    }

    pub fn restore(&self) {
        let mut stream = lock(&self.stream);
        stream.volume = FULL_VOLUME;
        stream.output.set_volume(FULL_VOLUME);
        debug!("audio: background volume restored");
    }
}
