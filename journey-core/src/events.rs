//! Signals raised by section engines.
//!
//! Engines never know about section ordering; they only report what
//! happened. The navigator owns the receiving end.

use tokio::sync::mpsc;

/// Something a mounted section wants the outside world to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JourneyEvent {
    /// Every pair in the memory game was found.
    GameCompleted { attempts: u32 },
    /// A non-blank answer was captured for a question.
    AnswerCaptured { question: String },
    /// The last question was submitted.
    QuestionsCompleted,
    /// The letter is fully visible (typed out or skipped).
    MessageRevealed,
    /// A voice track played to its end.
    TrackEnded { index: usize },
}

pub type EventSender = mpsc::UnboundedSender<JourneyEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<JourneyEvent>;

/// Create a fresh event channel.
pub fn channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

/// Send, ignoring a receiver that has already gone away.
pub(crate) fn emit(sender: &EventSender, event: JourneyEvent) {
    let _ = sender.send(event);
}
