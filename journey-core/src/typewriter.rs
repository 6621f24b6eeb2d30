//! Letter reveal, one character per tick.

use crate::events::{emit, EventSender, JourneyEvent};
use crate::timer::{lock, ScopedTimer, Tick};
use std::sync::{Arc, Mutex};
use std::time::Duration;

struct RevealState {
    text: String,
    /// Characters (not bytes) revealed so far.
    shown: usize,
    total: usize,
    done_signalled: bool,
}

impl RevealState {
    fn finish(&mut self, events: &EventSender) {
        self.shown = self.total;
        if !self.done_signalled {
            self.done_signalled = true;
            emit(events, JourneyEvent::MessageRevealed);
        }
    }
}

/// Types out a letter at a fixed pace.
pub struct TypewriterReveal {
    state: Arc<Mutex<RevealState>>,
    timer: Option<ScopedTimer>,
    events: EventSender,
}

impl TypewriterReveal {
    /// Start revealing `text`, one character every `interval`.
    pub fn start(text: impl Into<String>, interval: Duration, events: EventSender) -> Self {
        let text = text.into();
        let total = text.chars().count();
        let state = Arc::new(Mutex::new(RevealState {
            text,
            shown: 0,
            total,
            done_signalled: false,
        }));

        if total == 0 {
            lock(&state).finish(&events);
            return Self {
                state,
                timer: None,
                events,
            };
        }

        let weak = Arc::downgrade(&state);
        let tick_events = events.clone();
        let timer = ScopedTimer::every("typewriter.reveal", interval, move || {
            let Some(state) = weak.upgrade() else {
                return Tick::Stop;
            };
            let mut state = lock(&state);
            if state.shown >= state.total {
                return Tick::Stop;
            }
            state.shown += 1;
            if state.shown == state.total {
                state.finish(&tick_events);
                Tick::Stop
            } else {
                Tick::Continue
            }
        });

        Self {
            state,
            timer: Some(timer),
            events,
        }
    }

    /// Reveal the rest immediately.
    pub fn skip(&mut self) {
        self.timer = None;
        lock(&self.state).finish(&self.events);
    }

    /// The part of the letter shown so far.
    pub fn visible_text(&self) -> String {
        let state = lock(&self.state);
        state.text.chars().take(state.shown).collect()
    }

    pub fn is_done(&self) -> bool {
        let state = lock(&self.state);
        state.shown >= state.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events;

    #[tokio::test(start_paused = true)]
    async fn test_reveals_one_char_per_tick() {
        let (tx, mut rx) = events::channel();
        let reveal = TypewriterReveal::start("héllo", Duration::from_millis(35), tx);

        assert_eq!(reveal.visible_text(), "");
        tokio::time::sleep(Duration::from_millis(36)).await;
        assert_eq!(reveal.visible_text(), "h");
        tokio::time::sleep(Duration::from_millis(35)).await;
        assert_eq!(reveal.visible_text(), "hé");

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(reveal.visible_text(), "héllo");
        assert!(reveal.is_done());
        assert_eq!(rx.try_recv().unwrap(), JourneyEvent::MessageRevealed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_skip_signals_once() {
        let (tx, mut rx) = events::channel();
        let mut reveal = TypewriterReveal::start("abcdef", Duration::from_millis(35), tx);
        tokio::time::sleep(Duration::from_millis(40)).await;

        reveal.skip();
        reveal.skip();
        assert_eq!(reveal.visible_text(), "abcdef");

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(rx.try_recv().unwrap(), JourneyEvent::MessageRevealed);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_still_reveals() {
        let (tx, mut rx) = events::channel();
        let reveal = TypewriterReveal::start("halo", Duration::ZERO, tx);

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(reveal.is_done());
        assert_eq!(reveal.visible_text(), "halo");
        assert_eq!(rx.try_recv().unwrap(), JourneyEvent::MessageRevealed);
    }
}
