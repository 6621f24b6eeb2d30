//! Voice message player over a fixed track catalogue.
//!
//! Exactly one track is active. `select` always lands stopped at position
//! zero with an unknown duration until the host reports metadata. While a
//! track plays, a sampling loop copies the element's cursor into the
//! playback state; pausing, selecting, ending, or dropping the controller
//! cancels the loop before anything else changes.

use super::background::Ducking;
use super::media::MediaElement;
use crate::config::PlayerSettings;
use crate::content::Track;
use crate::events::{emit, EventSender, JourneyEvent};
use crate::timer::{lock, Epoch, ScopedTimer, Tick};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info};

/// Read-only view of the player.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSnapshot {
    pub active_track_index: usize,
    pub is_playing: bool,
    pub position_seconds: f64,
    /// Zero until the active track's metadata has loaded.
    pub duration_seconds: f64,
}

impl PlaybackSnapshot {
    pub fn is_duration_known(&self) -> bool {
        self.duration_seconds > 0.0
    }
}

struct PlayerState {
    element: Box<dyn MediaElement>,
    active: usize,
    is_playing: bool,
    position: f64,
    duration: f64,
    epoch: Epoch,
    sampler: Option<ScopedTimer>,
}

impl PlayerState {
    /// Stop sampling and invalidate anything scheduled so far.
    fn halt(&mut self) {
        self.epoch.bump();
        self.sampler = None;
        self.is_playing = false;
    }

    fn clamp_to_duration(&self, seconds: f64) -> f64 {
        if !seconds.is_finite() {
            return 0.0;
        }
        seconds.clamp(0.0, self.duration)
    }
}

/// The voice message player.
///
/// Lowers the background music to the configured duck level for as long
/// as it exists. Must be used from within a tokio runtime.
pub struct AudioTrackController {
    state: Arc<Mutex<PlayerState>>,
    catalogue: Vec<Track>,
    progress_interval: Duration,
    ducking: Ducking,
    events: EventSender,
}

impl AudioTrackController {
    pub fn new(
        settings: &PlayerSettings,
        element: Box<dyn MediaElement>,
        ducking: Ducking,
        events: EventSender,
    ) -> Self {
        ducking.set_duck_level(settings.duck_level);

        let controller = Self {
            state: Arc::new(Mutex::new(PlayerState {
                element,
                active: 0,
                is_playing: false,
                position: 0.0,
                duration: 0.0,
                epoch: Epoch::default(),
                sampler: None,
            })),
            catalogue: settings.catalogue.clone(),
            progress_interval: settings.progress_interval,
            ducking,
            events,
        };
        controller.select(0);
        controller
    }

    pub fn catalogue(&self) -> &[Track] {
        &self.catalogue
    }

    /// The selected track, or `None` if the catalogue is empty.
    pub fn active_track(&self) -> Option<&Track> {
        self.catalogue.get(self.active_index())
    }

    pub fn active_index(&self) -> usize {
        lock(&self.state).active
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        let state = lock(&self.state);
        PlaybackSnapshot {
            active_track_index: state.active,
            is_playing: state.is_playing,
            position_seconds: state.position,
            duration_seconds: state.duration,
        }
    }

    /// Make `index` (clamped to the catalogue) the active track, stopped.
    pub fn select(&self, index: usize) {
        let index = index.min(self.catalogue.len().saturating_sub(1));
        let mut state = lock(&self.state);
        state.halt();
        state.element.pause();
        state.active = index;
        state.position = 0.0;
        state.duration = 0.0;
        if let Some(track) = self.catalogue.get(index) {
            state.element.load(&track.source);
            debug!(index, title = %track.title, "audio: track selected");
        }
    }

    /// Start or pause the active track.
    ///
    /// A rejected play request leaves the player stopped.
    pub fn toggle_play(&self) {
        let mut state = lock(&self.state);
        if state.is_playing {
            state.halt();
            state.element.pause();
            return;
        }

        if let Err(e) = state.element.play() {
            debug!(error = %e, "audio: play request rejected");
            return;
        }
        state.is_playing = true;
        let epoch = state.epoch.bump();
        state.sampler = Some(self.schedule_sampling(epoch));
    }

    fn schedule_sampling(&self, epoch: Epoch) -> ScopedTimer {
        let weak = Arc::downgrade(&self.state);
        ScopedTimer::every("audio.progress", self.progress_interval, move || {
            let Some(state) = weak.upgrade() else {
                return Tick::Stop;
            };
            let mut state = lock(&state);
            if state.epoch != epoch || !state.is_playing {
                return Tick::Stop;
            }

            let cursor = state.element.current_time();
            state.position = if state.duration > 0.0 {
                state.clamp_to_duration(cursor)
            } else {
                cursor.max(0.0)
            };

            let reached_end = state.duration > 0.0 && state.position >= state.duration;
            if state.element.is_paused() || reached_end {
                Tick::Stop
            } else {
                Tick::Continue
            }
        })
    }

    /// Move the cursor, clamped to `[0, duration]`.
    pub fn seek(&self, to_seconds: f64) {
        let mut state = lock(&self.state);
        let target = state.clamp_to_duration(to_seconds);
        state.element.set_current_time(target);
        state.position = target;
    }

    /// The host loaded the active track's metadata.
    pub fn on_metadata_loaded(&self, duration_seconds: f64) {
        let mut state = lock(&self.state);
        state.duration = if duration_seconds.is_finite() {
            duration_seconds.max(0.0)
        } else {
            0.0
        };
        state.position = state.clamp_to_duration(state.position);
    }

    /// The host reports the active track finished.
    ///
    /// Advances to the next track, stopped. The last track stays active.
    pub fn on_ended(&self) {
        let finished = {
            let mut state = lock(&self.state);
            state.halt();
            state.active
        };
        info!(index = finished, "audio: track ended");
        emit(&self.events, JourneyEvent::TrackEnded { index: finished });

        if self.has_next() {
            self.select(finished + 1);
        }
    }

    pub fn has_next(&self) -> bool {
        self.active_index() + 1 < self.catalogue.len()
    }

    pub fn has_previous(&self) -> bool {
        self.active_index() > 0
    }

    /// Select the following track. No-op on the last one.
    pub fn next(&self) {
        if self.has_next() {
            self.select(self.active_index() + 1);
        }
    }

    /// Select the preceding track. No-op on the first one.
    pub fn previous(&self) {
        if self.has_previous() {
            self.select(self.active_index() - 1);
        }
    }
}

impl Drop for AudioTrackController {
    fn drop(&mut self) {
        {
            let mut state = lock(&self.state);
            state.halt();
            state.element.pause();
        }
        self.ducking.restore();
    }
}

/// Format seconds as `m:ss` for progress labels.
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}
