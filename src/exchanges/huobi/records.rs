//! Rolling candlestick windows.
//!
//! The kline endpoint re-serves a fixed trailing history on every poll, newest bar
//! first, and the newest bar keeps changing until its period closes. A
//! [`RecordWindow`] folds each poll into a chronological, bounded sequence: bars
//! newer than the held tail are appended, a bar at the tail timestamp replaces the
//! tail in place, and anything older is already known.

use crate::core::types::{KlineInterval, Record, Stock};
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};

/// What a single merge did to a window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub appended: usize,
    pub replaced: usize,
    pub evicted: usize,
}

impl MergeOutcome {
    pub const fn is_noop(&self) -> bool {
        self.appended == 0 && self.replaced == 0 && self.evicted == 0
    }
}

/// Chronological bars for one (stock, interval) pair, oldest at the front
#[derive(Debug, Clone, Default)]
pub struct RecordWindow {
    bars: VecDeque<Record>,
}

impl RecordWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Timestamp of the newest held bar
    pub fn last_time(&self) -> Option<i64> {
        self.bars.back().map(|bar| bar.time)
    }

    pub fn to_vec(&self) -> Vec<Record> {
        self.bars.iter().copied().collect()
    }

    /// Fold a newest-first batch into the window, then trim to `cap` from the front
    pub fn reconcile(&mut self, incoming_newest_first: &[Record], cap: usize) -> MergeOutcome {
        let mut outcome = MergeOutcome::default();

        let fresh = match self.last_time() {
            None => incoming_newest_first.len(),
            Some(last) => incoming_newest_first
                .iter()
                .take_while(|bar| bar.time >= last)
                .count(),
        };

        for bar in incoming_newest_first[..fresh].iter().rev() {
            match self.bars.back_mut() {
                Some(tail) if bar.time == tail.time => {
                    *tail = *bar;
                    outcome.replaced += 1;
                }
                Some(tail) if bar.time < tail.time => {
                    // vendor batch out of order; never let the tail move backwards
                    tracing::warn!(
                        time = bar.time,
                        tail = tail.time,
                        "skipping out-of-order kline bar"
                    );
                }
                _ => {
                    self.bars.push_back(*bar);
                    outcome.appended += 1;
                }
            }
        }

        while self.bars.len() > cap {
            self.bars.pop_front();
            outcome.evicted += 1;
        }

        outcome
    }
}

/// Per-connector store of record windows
#[derive(Debug, Default)]
pub struct RecordBook {
    windows: Mutex<HashMap<(Stock, KlineInterval), RecordWindow>>,
}

impl RecordBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a freshly fetched batch and return the resulting window, oldest first
    pub fn merge(
        &self,
        stock: Stock,
        interval: KlineInterval,
        incoming_newest_first: &[Record],
        cap: usize,
    ) -> (Vec<Record>, MergeOutcome) {
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);
        let window = windows.entry((stock, interval)).or_default();
        let outcome = window.reconcile(incoming_newest_first, cap);
        (window.to_vec(), outcome)
    }

    /// Current window without merging anything
    pub fn snapshot(&self, stock: Stock, interval: KlineInterval) -> Vec<Record> {
        self.windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(stock, interval))
            .map(RecordWindow::to_vec)
            .unwrap_or_default()
    }

    pub fn clear(&self) {
        self.windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
