//! Primary-key allocation for fabricated entities.
//!
//! Each base model runs its own sequence. Ids start high so they never
//! collide with hand-written fixture ids, and `next_bank` jumps a model's
//! sequence to the next thousand so each test (or each cluster of entities)
//! gets a visually distinct id range. Negative mode hands out descending
//! negative ids for entities that must sort before real data.

use indexmap::IndexMap;
use parking_lot::Mutex;
use smol_str::SmolStr;

const START: i64 = 10_000;
const BANK: i64 = 1_000;

#[derive(Debug)]
struct State {
    counters: IndexMap<SmolStr, i64>,
    negative: bool,
}

/// Thread-safe monotonic id source, one counter per base model.
#[derive(Debug)]
pub struct IdAllocator {
    state: Mutex<State>,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator {
    /// Ascending ids, each model from 10 000.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                counters: IndexMap::new(),
                negative: false,
            }),
        }
    }

    /// Descending ids, each model from -10 000.
    pub fn negative() -> Self {
        Self {
            state: Mutex::new(State {
                counters: IndexMap::new(),
                negative: true,
            }),
        }
    }

    /// Hand out the next id for a model.
    pub fn next_id(&self, model: &str) -> i64 {
        let mut state = self.state.lock();
        let start = if state.negative { -START } else { START };
        let step = if state.negative { -1 } else { 1 };
        let counter = state.counters.entry(SmolStr::new(model)).or_insert(start);
        let id = *counter;
        *counter += step;
        id
    }

    /// Skip a model's sequence ahead to the next bank of one thousand.
    pub fn next_bank(&self, model: &str) {
        let mut state = self.state.lock();
        let negative = state.negative;
        let start = if negative { -START } else { START };
        let counter = state.counters.entry(SmolStr::new(model)).or_insert(start);
        *counter = if negative {
            (*counter / BANK - 1) * BANK
        } else {
            (*counter / BANK + 1) * BANK
        };
    }

    /// Forget every sequence; the next id per model starts over.
    pub fn reset(&self) {
        self.state.lock().counters.clear();
    }
}
