//! Memory matching game engine.
//!
//! A deck of `2K` cards holds each of `K` symbols twice. The player flips
//! two cards at a time; equal symbols stay face up, unequal ones turn back
//! after a settle delay. Once every card is matched the engine waits a
//! short celebration delay, enters [`GamePhase::Complete`], and emits
//! [`JourneyEvent::GameCompleted`].
//!
//! Both delays run on [`ScopedTimer`]s owned by the game state. A call to
//! [`MemoryGame::new_game`] or dropping the game cancels them, and each
//! callback re-checks the game epoch before it writes.

use crate::config::GameSettings;
use crate::events::{emit, EventSender, JourneyEvent};
use crate::timer::{lock, Epoch, ScopedTimer};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;
use tracing::{debug, info};

/// One card in the deck.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemoryCard {
    pub symbol: String,
}

/// Where the game is in its flip cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No card is waiting for a partner.
    Idle,
    /// One card is face up.
    AwaitingSecondFlip,
    /// A mismatched pair is face up; further flips are ignored.
    Checking,
    /// Every pair was found. Terminal until `new_game`.
    Complete,
}

/// Result of a single flip request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipOutcome {
    /// Out of range, already face up, or the game is busy.
    Ignored,
    /// First card of a pair turned over.
    Revealed,
    /// Second card matched the first.
    Matched,
    /// Second card did not match; both turn back after the settle delay.
    Mismatched,
}

/// Read-only view of the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub cards: Vec<MemoryCard>,
    pub flipped: Vec<usize>,
    pub matched: BTreeSet<usize>,
    pub attempts: u32,
    pub phase: GamePhase,
}

impl GameSnapshot {
    /// Whether the card at `index` is currently shown face up.
    pub fn is_visible(&self, index: usize) -> bool {
        self.flipped.contains(&index) || self.matched.contains(&index)
    }

    /// Number of pairs found so far.
    pub fn pairs_found(&self) -> usize {
        self.matched.len() / 2
    }

    pub fn total_pairs(&self) -> usize {
        self.cards.len() / 2
    }
}

struct GameState {
    cards: Vec<MemoryCard>,
    flipped: Vec<usize>,
    matched: BTreeSet<usize>,
    attempts: u32,
    phase: GamePhase,
    epoch: Epoch,
    rng: StdRng,
    settle: Option<ScopedTimer>,
    celebration: Option<ScopedTimer>,
}

impl GameState {
    fn deal(&mut self, symbols: &[String]) {
        let mut cards: Vec<MemoryCard> = symbols
            .iter()
            .chain(symbols.iter())
            .map(|symbol| MemoryCard {
                symbol: symbol.clone(),
            })
            .collect();
        cards.shuffle(&mut self.rng);

        self.epoch.bump();
        self.settle = None;
        self.celebration = None;
        self.cards = cards;
        self.flipped.clear();
        self.matched.clear();
        self.attempts = 0;
        self.phase = GamePhase::Idle;
    }

    fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            cards: self.cards.clone(),
            flipped: self.flipped.clone(),
            matched: self.matched.clone(),
            attempts: self.attempts,
            phase: self.phase,
        }
    }
}

/// The memory game engine.
///
/// Must be driven from within a tokio runtime; the settle and celebration
/// delays are spawned tasks.
pub struct MemoryGame {
    state: Arc<Mutex<GameState>>,
    symbols: Vec<String>,
    settle_delay: Duration,
    celebration_delay: Duration,
    events: EventSender,
}

impl MemoryGame {
    /// Create a game with a freshly shuffled deck.
    pub fn new(settings: &GameSettings, events: EventSender) -> Self {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut state = GameState {
            cards: Vec::new(),
            flipped: Vec::with_capacity(2),
            matched: BTreeSet::new(),
            attempts: 0,
            phase: GamePhase::Idle,
            epoch: Epoch::default(),
            rng,
            settle: None,
            celebration: None,
        };
        state.deal(&settings.symbols);

        Self {
            state: Arc::new(Mutex::new(state)),
            symbols: settings.symbols.clone(),
            settle_delay: settings.settle_delay,
            celebration_delay: settings.celebration_delay,
            events,
        }
    }

    /// Reshuffle and start over, cancelling any pending delay.
    pub fn new_game(&mut self) {
        let mut state = lock(&self.state);
        state.deal(&self.symbols);
        debug!(cards = state.cards.len(), "memory_game: new deck dealt");
    }

    /// Turn over the card at `index`.
    pub fn flip_card(&mut self, index: usize) -> FlipOutcome {
        let mut state = lock(&self.state);

        if index >= state.cards.len()
            || matches!(state.phase, GamePhase::Checking | GamePhase::Complete)
            || state.flipped.contains(&index)
            || state.matched.contains(&index)
        {
            return FlipOutcome::Ignored;
        }

        state.flipped.push(index);
        if state.flipped.len() < 2 {
            state.phase = GamePhase::AwaitingSecondFlip;
            return FlipOutcome::Revealed;
        }

        state.attempts += 1;
        state.phase = GamePhase::Checking;
        let (first, second) = (state.flipped[0], state.flipped[1]);

        if state.cards[first] == state.cards[second] {
            state.matched.insert(first);
            state.matched.insert(second);
            state.flipped.clear();
            state.phase = GamePhase::Idle;

            if state.matched.len() == state.cards.len() {
                let epoch = state.epoch;
                state.celebration = Some(self.schedule_celebration(epoch));
            }
            FlipOutcome::Matched
        } else {
            let epoch = state.epoch;
            state.settle = Some(self.schedule_settle(epoch));
            FlipOutcome::Mismatched
        }
    }

    fn schedule_settle(&self, epoch: Epoch) -> ScopedTimer {
        let weak = Arc::downgrade(&self.state);
        ScopedTimer::after("memory_game.settle", self.settle_delay, move || {
            with_current(&weak, epoch, |state| {
                state.flipped.clear();
                state.phase = GamePhase::Idle;
            });
        })
    }

    fn schedule_celebration(&self, epoch: Epoch) -> ScopedTimer {
        let weak = Arc::downgrade(&self.state);
        let events = self.events.clone();
        ScopedTimer::after("memory_game.celebration", self.celebration_delay, move || {
            with_current(&weak, epoch, |state| {
                state.phase = GamePhase::Complete;
                info!(attempts = state.attempts, "memory_game: complete");
                emit(
                    &events,
                    JourneyEvent::GameCompleted {
                        attempts: state.attempts,
                    },
                );
            });
        })
    }

    pub fn snapshot(&self) -> GameSnapshot {
        lock(&self.state).snapshot()
    }

    pub fn phase(&self) -> GamePhase {
        lock(&self.state).phase
    }

    pub fn attempts(&self) -> u32 {
        lock(&self.state).attempts
    }

    pub fn is_complete(&self) -> bool {
        self.phase() == GamePhase::Complete
    }
}

impl Drop for MemoryGame {
    fn drop(&mut self) {
        let mut state = lock(&self.state);
        state.epoch.bump();
        state.settle = None;
        state.celebration = None;
    }
}

/// Run `f` against the game if it still exists and was not reset since
/// `epoch` was captured.
fn with_current(weak: &Weak<Mutex<GameState>>, epoch: Epoch, f: impl FnOnce(&mut GameState)) {
    let Some(state) = weak.upgrade() else {
        return;
    };
    let mut state = lock(&state);
    if state.epoch != epoch {
        debug!("memory_game: stale timer ignored");
        return;
    }
    f(&mut state);
}
