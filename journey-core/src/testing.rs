//! Testing utilities for the journey.
//!
//! This module provides in-memory stand-ins for every collaborator:
//! - `RecordingOutput` and `MockMedia` for the audio elements
//! - `RecordingNotifier`, `StaticExporter`, `FailingExporter`, `FailingStore`
//! - `TestHarness` wiring them into a `JourneyNavigator`
//!
//! Every mock is a cheap clone over shared state, so a test can hand one
//! copy to the engine and keep another for assertions.

use crate::audio::{AudioOutput, MediaBackend, MediaElement, PlaybackError};
use crate::config::JourneyConfig;
use crate::journey::{Collaborators, JourneyNavigator};
use crate::persist::{InMemoryStore, KeyValueStore, PersistError};
use crate::questions::AnswerRecord;
use crate::sinks::{AnswerExporter, ExportArtifact, ExportError, Notification, Notifier};
use crate::timer::lock;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct OutputState {
    source: Option<String>,
    playing: bool,
    volume: Option<f32>,
    play_calls: usize,
    reject_play: bool,
}

/// Background output that records what it was asked to do.
#[derive(Debug, Clone, Default)]
pub struct RecordingOutput {
    state: Arc<Mutex<OutputState>>,
}

impl RecordingOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every play request fail, as a blocked autoplay would.
    pub fn rejecting() -> Self {
        let output = Self::default();
        lock(&output.state).reject_play = true;
        output
    }

    pub fn is_playing(&self) -> bool {
        lock(&self.state).playing
    }

    /// Last volume set, or `None` if never touched.
    pub fn volume(&self) -> Option<f32> {
        lock(&self.state).volume
    }

    pub fn play_calls(&self) -> usize {
        lock(&self.state).play_calls
    }

    /// Source loaded into the stream, if any.
    pub fn source(&self) -> Option<String> {
        lock(&self.state).source.clone()
    }
}

impl AudioOutput for RecordingOutput {
    fn load(&mut self, source: &str) {
        lock(&self.state).source = Some(source.to_string());
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        let mut state = lock(&self.state);
        state.play_calls += 1;
        if state.reject_play {
            return Err(PlaybackError::Blocked);
        }
        state.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        lock(&self.state).playing = false;
    }

    fn set_volume(&mut self, volume: f32) {
        lock(&self.state).volume = Some(volume);
    }
}

#[derive(Debug, Default)]
struct MediaState {
    source: Option<String>,
    loads: Vec<String>,
    playing: bool,
    time: f64,
    reject_play: bool,
}

/// Voice element whose clock the test moves by hand.
#[derive(Debug, Clone, Default)]
pub struct MockMedia {
    state: Arc<Mutex<MediaState>>,
}

impl MockMedia {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_reject_play(&self, reject: bool) {
        lock(&self.state).reject_play = reject;
    }

    /// Move the playback cursor forward, as if `seconds` had played.
    pub fn advance(&self, seconds: f64) {
        let mut state = lock(&self.state);
        if state.playing {
            state.time += seconds;
        }
    }

    pub fn source(&self) -> Option<String> {
        lock(&self.state).source.clone()
    }

    /// Every source loaded so far, in order.
    pub fn loads(&self) -> Vec<String> {
        lock(&self.state).loads.clone()
    }

    pub fn time(&self) -> f64 {
        lock(&self.state).time
    }

    pub fn playing(&self) -> bool {
        lock(&self.state).playing
    }
}

impl MediaElement for MockMedia {
    fn load(&mut self, source: &str) {
        let mut state = lock(&self.state);
        state.source = Some(source.to_string());
        state.loads.push(source.to_string());
        state.playing = false;
        state.time = 0.0;
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        let mut state = lock(&self.state);
        if state.reject_play {
            return Err(PlaybackError::Media("rejected".to_string()));
        }
        state.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        lock(&self.state).playing = false;
    }

    fn current_time(&self) -> f64 {
        lock(&self.state).time
    }

    fn set_current_time(&mut self, seconds: f64) {
        lock(&self.state).time = seconds;
    }

    fn is_paused(&self) -> bool {
        !lock(&self.state).playing
    }
}

/// Hands out `MockMedia` elements and remembers them.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    created: Arc<Mutex<Vec<MockMedia>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently created element.
    pub fn last(&self) -> Option<MockMedia> {
        lock(&self.created).last().cloned()
    }

    pub fn created(&self) -> usize {
        lock(&self.created).len()
    }
}

impl MediaBackend for MockBackend {
    fn create_element(&self) -> Box<dyn MediaElement> {
        let media = MockMedia::new();
        lock(&self.created).push(media.clone());
        Box::new(media)
    }
}

/// Collects notifications.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    seen: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        lock(&self.seen).clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        lock(&self.seen).push(notification);
    }
}

/// Exporter that always succeeds with a fixed file name.
#[derive(Debug, Clone)]
pub struct StaticExporter {
    pub file_name: String,
}

#[async_trait]
impl AnswerExporter for StaticExporter {
    async fn export(&self, _answers: &AnswerRecord) -> Result<ExportArtifact, ExportError> {
        Ok(ExportArtifact {
            file_name: self.file_name.clone(),
            location: None,
        })
    }
}

/// Exporter that always fails.
#[derive(Debug, Clone, Default)]
pub struct FailingExporter;

#[async_trait]
impl AnswerExporter for FailingExporter {
    async fn export(&self, _answers: &AnswerRecord) -> Result<ExportArtifact, ExportError> {
        Err(ExportError::Failed("renderer unavailable".to_string()))
    }
}

/// Store that rejects every write.
#[derive(Debug, Clone, Default)]
pub struct FailingStore;

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn set(&self, _key: &str, _value: String) -> Result<(), PersistError> {
        Err(PersistError::Unavailable("quota exceeded".to_string()))
    }

    async fn get(&self, _key: &str) -> Result<Option<String>, PersistError> {
        Ok(None)
    }
}

/// A navigator wired to mocks, plus handles to inspect them.
pub struct TestHarness {
    pub journey: JourneyNavigator,
    pub background: RecordingOutput,
    pub media: MockBackend,
    pub store: Arc<InMemoryStore>,
    pub notifier: RecordingNotifier,
}

impl TestHarness {
    /// Harness over the default content with a fixed shuffle seed.
    pub fn new() -> Self {
        Self::with_config(JourneyConfig::default().with_seed(7))
    }

    pub fn with_config(config: JourneyConfig) -> Self {
        Self::build(config, RecordingOutput::new(), None, None)
    }

    pub fn with_exporter(config: JourneyConfig, exporter: Arc<dyn AnswerExporter>) -> Self {
        Self::build(config, RecordingOutput::new(), Some(exporter), None)
    }

    pub fn with_store(config: JourneyConfig, store: Arc<dyn KeyValueStore>) -> Self {
        Self::build(config, RecordingOutput::new(), None, Some(store))
    }

    pub fn with_background(config: JourneyConfig, background: RecordingOutput) -> Self {
        Self::build(config, background, None, None)
    }

    fn build(
        config: JourneyConfig,
        background: RecordingOutput,
        exporter: Option<Arc<dyn AnswerExporter>>,
        store_override: Option<Arc<dyn KeyValueStore>>,
    ) -> Self {
        let media = MockBackend::new();
        let store = Arc::new(InMemoryStore::new());
        let notifier = RecordingNotifier::new();
        let collaborators = Collaborators {
            background: Box::new(background.clone()),
            media: Arc::new(media.clone()),
            store: store_override.unwrap_or_else(|| store.clone() as Arc<dyn KeyValueStore>),
            notifier: Arc::new(notifier.clone()),
            exporter,
        };
        let journey = match JourneyNavigator::new(config, collaborators) {
            Ok(journey) => journey,
            Err(e) => panic!("test harness config is invalid: {e}"),
        };

        Self {
            journey,
            background,
            media,
            store,
            notifier,
        }
    }

    /// Flip every pair of the mounted memory game, in deck order.
    pub fn solve_memory_game(&mut self) -> usize {
        let Some(game) = self.journey.memory_game_mut() else {
            return 0;
        };
        let cards = game.snapshot().cards;
        let mut done = vec![false; cards.len()];
        let mut pairs = 0;
        for first in 0..cards.len() {
            if done[first] {
                continue;
            }
            if let Some(second) = (first + 1..cards.len()).find(|&j| !done[j] && cards[j] == cards[first]) {
                game.flip_card(first);
                game.flip_card(second);
                done[first] = true;
                done[second] = true;
                pairs += 1;
            }
        }
        pairs
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
