//! JourneyNavigator - the single source of truth for which section is
//! visible.
//!
//! The navigator owns the background music, the recorded answers, and the
//! engine of the mounted section. Moving to another section drops the old
//! engine (cancelling its timers and restoring anything it borrowed) and
//! builds a fresh one, so a revisited section always starts over. Only
//! recorded answers survive navigation.

use crate::audio::{AudioOutput, AudioTrackController, BackgroundMusic, MediaBackend};
use crate::config::{ConfigError, JourneyConfig};
use crate::events::{self, EventReceiver, EventSender, JourneyEvent};
use crate::memory_game::MemoryGame;
use crate::parallax::{ParallaxOffset, ParallaxTracker};
use crate::persist::{self, KeyValueStore, MemoryRecord, PersistError};
use crate::questions::{AnswerRecord, QuestionFlow};
use crate::sinks::{AnswerExporter, ExportArtifact, ExportError, Notification, Notifier};
use crate::typewriter::TypewriterReveal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Parallax intensity of the opening screen.
pub const OPENING_PARALLAX: f64 = 12.0;

/// Errors from journey operations that reach outside the engine.
#[derive(Debug, Error)]
pub enum JourneyError {
    #[error("{expected:?} section is not mounted (current: {current:?})")]
    SectionUnavailable {
        expected: Section,
        current: Option<Section>,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

/// Identifies one journey run in logs.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JourneyId(Uuid);

impl JourneyId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JourneyId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for JourneyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JourneyId({})", &self.0.to_string()[..8])
    }
}

impl fmt::Display for JourneyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opening screen or the journey proper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JourneyPhase {
    Opening,
    Journey,
}

/// The journey sections, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Section {
    MemoryGame,
    Questions,
    Message,
    Gallery,
    VoiceMessages,
    Closing,
}

pub const JOURNEY_SECTIONS: [Section; 6] = [
    Section::MemoryGame,
    Section::Questions,
    Section::Message,
    Section::Gallery,
    Section::VoiceMessages,
    Section::Closing,
];

impl Section {
    /// Navigation dot label.
    pub fn label(&self) -> &'static str {
        match self {
            Section::MemoryGame => "Mini Game",
            Section::Questions => "Refleksi",
            Section::Message => "Pesan Hati",
            Section::Gallery => "Kenangan",
            Section::VoiceMessages => "Pesan Suara",
            Section::Closing => "Penutup",
        }
    }

    pub fn parallax_intensity(&self) -> f64 {
        match self {
            Section::MemoryGame => 8.0,
            Section::Questions => 10.0,
            Section::Message => 8.0,
            Section::Gallery => 6.0,
            Section::VoiceMessages => 8.0,
            Section::Closing => 10.0,
        }
    }
}

/// The mounted section and the engine it owns.
pub enum ActiveSection {
    MemoryGame(MemoryGame),
    Questions(QuestionFlow),
    Message(TypewriterReveal),
    Gallery,
    VoiceMessages(AudioTrackController),
    Closing,
}

impl ActiveSection {
    pub fn section(&self) -> Section {
        match self {
            ActiveSection::MemoryGame(_) => Section::MemoryGame,
            ActiveSection::Questions(_) => Section::Questions,
            ActiveSection::Message(_) => Section::Message,
            ActiveSection::Gallery => Section::Gallery,
            ActiveSection::VoiceMessages(_) => Section::VoiceMessages,
            ActiveSection::Closing => Section::Closing,
        }
    }
}

/// The outside world the journey talks to.
pub struct Collaborators {
    /// Output for the looping background music. It is handed
    /// [`JourneyConfig::background_track`] the first time the journey starts.
    pub background: Box<dyn AudioOutput>,
    /// Source of voice message elements.
    pub media: Arc<dyn MediaBackend>,
    /// Where the closing memory is saved.
    pub store: Arc<dyn KeyValueStore>,
    pub notifier: Arc<dyn Notifier>,
    pub exporter: Option<Arc<dyn AnswerExporter>>,
}

/// Drives the opening screen and the section sequence.
///
/// Must be used from within a tokio runtime: mounted engines spawn their
/// timers on it.
///
/// Engine signals ([`JourneyEvent`]) queue up until the host reads them
/// with [`try_next_event`](Self::try_next_event),
/// [`drain_events`](Self::drain_events) or [`next_event`](Self::next_event).
pub struct JourneyNavigator {
    id: JourneyId,
    config: JourneyConfig,
    phase: JourneyPhase,
    index: usize,
    answers: AnswerRecord,
    music: BackgroundMusic,
    music_playing: bool,
    active: Option<ActiveSection>,
    parallax: ParallaxTracker,
    media: Arc<dyn MediaBackend>,
    store: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn Notifier>,
    exporter: Option<Arc<dyn AnswerExporter>>,
    events_tx: EventSender,
    events_rx: EventReceiver,
}

impl JourneyNavigator {
    pub fn new(config: JourneyConfig, collaborators: Collaborators) -> Result<Self, ConfigError> {
        config.validate()?;
        let (events_tx, events_rx) = events::channel();
        Ok(Self {
            id: JourneyId::new(),
            config,
            phase: JourneyPhase::Opening,
            index: 0,
            answers: AnswerRecord::new(),
            music: BackgroundMusic::new(collaborators.background),
            music_playing: false,
            active: None,
            parallax: ParallaxTracker::new(OPENING_PARALLAX),
            media: collaborators.media,
            store: collaborators.store,
            notifier: collaborators.notifier,
            exporter: collaborators.exporter,
            events_tx,
            events_rx,
        })
    }

    pub fn id(&self) -> JourneyId {
        self.id
    }

    pub fn config(&self) -> &JourneyConfig {
        &self.config
    }

    pub fn phase(&self) -> JourneyPhase {
        self.phase
    }

    pub fn section_index(&self) -> usize {
        self.index
    }

    pub fn section_count(&self) -> usize {
        JOURNEY_SECTIONS.len()
    }

    /// The section at the current index, once the journey has started.
    pub fn current_section(&self) -> Option<Section> {
        self.active.as_ref().map(ActiveSection::section)
    }

    pub fn active_section(&self) -> Option<&ActiveSection> {
        self.active.as_ref()
    }

    pub fn has_previous(&self) -> bool {
        self.phase == JourneyPhase::Journey && self.index > 0
    }

    pub fn has_next(&self) -> bool {
        self.phase == JourneyPhase::Journey && self.index + 1 < JOURNEY_SECTIONS.len()
    }

    /// Leave the opening screen and begin at the first section.
    ///
    /// Background music is started best-effort; a rejected play request
    /// is ignored.
    pub fn start(&mut self) {
        let was_opening = self.phase == JourneyPhase::Opening;
        self.phase = JourneyPhase::Journey;

        if was_opening {
            self.music.load(&self.config.background_track);
        }
        if let Err(e) = self.music.play() {
            debug!(journey = %self.id, error = %e, "journey: background music did not start");
        }
        self.music_playing = true;

        info!(journey = %self.id, "journey: started");
        if was_opening || self.index != 0 {
            self.show(0);
        }
    }

    pub fn go_next(&mut self) {
        self.go_to(self.index as i64 + 1);
    }

    pub fn go_prev(&mut self) {
        self.go_to(self.index as i64 - 1);
    }

    /// Jump to `index`, clamped to the section range.
    pub fn go_to(&mut self, index: i64) {
        let last = JOURNEY_SECTIONS.len() as i64 - 1;
        let target = index.clamp(0, last) as usize;
        if self.phase == JourneyPhase::Opening {
            self.index = target;
            return;
        }
        if target != self.index || self.active.is_none() {
            self.show(target);
        }
    }

    fn show(&mut self, index: usize) {
        // Tear the old section down before the new one borrows anything.
        self.active = None;
        self.index = index;

        let section = JOURNEY_SECTIONS[index];
        let mounted = match section {
            Section::MemoryGame => {
                ActiveSection::MemoryGame(MemoryGame::new(&self.config.game, self.events_tx.clone()))
            }
            Section::Questions => {
                ActiveSection::Questions(QuestionFlow::new(self.config.questions.clone()))
            }
            Section::Message => ActiveSection::Message(TypewriterReveal::start(
                self.config.letter.clone(),
                self.config.typing_interval,
                self.events_tx.clone(),
            )),
            Section::Gallery => ActiveSection::Gallery,
            Section::VoiceMessages => ActiveSection::VoiceMessages(AudioTrackController::new(
                &self.config.player,
                self.media.create_element(),
                self.music.ducking(),
                self.events_tx.clone(),
            )),
            Section::Closing => ActiveSection::Closing,
        };
        self.active = Some(mounted);
        self.parallax.set_intensity(section.parallax_intensity());
        info!(journey = %self.id, index, section = ?section, "journey: section mounted");
    }

    /// Record (or overwrite) the answer to `question`.
    pub fn record_answer(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.answers.upsert(question, answer);
    }

    pub fn answers(&self) -> &AnswerRecord {
        &self.answers
    }

    /// Flip background music between playing and paused.
    ///
    /// The reported state changes immediately; the stream is not asked
    /// to confirm.
    pub fn toggle_music(&mut self) {
        if self.music_playing {
            self.music.pause();
        } else if let Err(e) = self.music.play() {
            debug!(journey = %self.id, error = %e, "journey: background music did not resume");
        }
        self.music_playing = !self.music_playing;
    }

    pub fn is_music_playing(&self) -> bool {
        self.music_playing
    }

    pub fn background_volume(&self) -> f32 {
        self.music.volume()
    }

    pub fn memory_game(&self) -> Option<&MemoryGame> {
        match &self.active {
            Some(ActiveSection::MemoryGame(game)) => Some(game),
            _ => None,
        }
    }

    pub fn memory_game_mut(&mut self) -> Option<&mut MemoryGame> {
        match &mut self.active {
            Some(ActiveSection::MemoryGame(game)) => Some(game),
            _ => None,
        }
    }

    pub fn questions(&self) -> Option<&QuestionFlow> {
        match &self.active {
            Some(ActiveSection::Questions(flow)) => Some(flow),
            _ => None,
        }
    }

    pub fn message(&self) -> Option<&TypewriterReveal> {
        match &self.active {
            Some(ActiveSection::Message(reveal)) => Some(reveal),
            _ => None,
        }
    }

    pub fn message_mut(&mut self) -> Option<&mut TypewriterReveal> {
        match &mut self.active {
            Some(ActiveSection::Message(reveal)) => Some(reveal),
            _ => None,
        }
    }

    pub fn voice_player(&self) -> Option<&AudioTrackController> {
        match &self.active {
            Some(ActiveSection::VoiceMessages(player)) => Some(player),
            _ => None,
        }
    }

    /// Submit an answer to the mounted question flow.
    ///
    /// Returns whether the answer was recorded. Blank answers advance the
    /// flow without being recorded.
    pub fn submit_answer(&mut self, answer: &str) -> bool {
        let Some(ActiveSection::Questions(flow)) = &mut self.active else {
            return false;
        };
        let captured = flow.submit(answer);
        let finished = flow.is_complete();

        let recorded = match captured {
            Some(captured) => {
                events::emit(
                    &self.events_tx,
                    JourneyEvent::AnswerCaptured {
                        question: captured.question.clone(),
                    },
                );
                self.answers.upsert(captured.question, captured.answer);
                true
            }
            None => false,
        };
        if finished {
            events::emit(&self.events_tx, JourneyEvent::QuestionsCompleted);
        }
        recorded
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.parallax.resize(width, height);
    }

    pub fn pointer_moved(&mut self, x: f64, y: f64) -> ParallaxOffset {
        self.parallax.pointer_moved(x, y)
    }

    pub fn parallax(&self) -> &ParallaxTracker {
        &self.parallax
    }

    /// Save the answers and the closing quote. Closing section only.
    pub async fn save_memory(&mut self) -> Result<MemoryRecord, JourneyError> {
        self.require(Section::Closing)?;

        let record = MemoryRecord::new(self.answers.clone(), self.config.closing_quote.clone());
        match persist::save_memory(self.store.as_ref(), &self.config.memory_key, &record).await {
            Ok(()) => {
                info!(journey = %self.id, answers = record.answers.len(), "journey: memory saved");
                self.notifier.notify(
                    Notification::success("Kenangan tersimpan! 💕")
                        .with_description("Momen indah ini telah disimpan untukmu."),
                );
                Ok(record)
            }
            Err(e) => {
                warn!(journey = %self.id, error = %e, "journey: memory save failed");
                self.notifier
                    .notify(Notification::failure("Gagal menyimpan kenangan"));
                Err(e.into())
            }
        }
    }

    /// Export the answers as an image. Only from the completed Q&A view.
    pub async fn export_answers(&mut self) -> Result<ExportArtifact, JourneyError> {
        let ready = self.questions().map(QuestionFlow::is_complete).unwrap_or(false);
        if !ready {
            return Err(JourneyError::SectionUnavailable {
                expected: Section::Questions,
                current: self.current_section(),
            });
        }

        let result = match &self.exporter {
            Some(exporter) => exporter.export(&self.answers).await,
            None => Err(ExportError::Unavailable),
        };
        match result {
            Ok(artifact) => {
                info!(journey = %self.id, file = %artifact.file_name, "journey: answers exported");
                self.notifier
                    .notify(Notification::success("Gambar berhasil diunduh"));
                Ok(artifact)
            }
            Err(e) => {
                warn!(journey = %self.id, error = %e, "journey: export failed");
                self.notifier.notify(
                    Notification::failure("Gagal mengunduh gambar").with_description(e.to_string()),
                );
                Err(e.into())
            }
        }
    }

    fn require(&self, expected: Section) -> Result<(), JourneyError> {
        let current = self.current_section();
        if current == Some(expected) {
            Ok(())
        } else {
            Err(JourneyError::SectionUnavailable { expected, current })
        }
    }

    /// Next pending event, if any.
    ///
    /// The queue is unbounded and only this navigator reads it. Hosts
    /// should poll it (or [`drain_events`](Self::drain_events)) after
    /// each input, otherwise events pile up for the whole session.
    pub fn try_next_event(&mut self) -> Option<JourneyEvent> {
        self.events_rx.try_recv().ok()
    }

    /// Take every pending event, oldest first.
    pub fn drain_events(&mut self) -> Vec<JourneyEvent> {
        let mut drained = Vec::new();
        while let Ok(event) = self.events_rx.try_recv() {
            drained.push(event);
        }
        drained
    }

    /// Wait for the next event.
    pub async fn next_event(&mut self) -> Option<JourneyEvent> {
        self.events_rx.recv().await
    }
}
