//! Per-word timing history with linear undo/redo
//!
//! Each word owns an independent, bounded list of timing windows and a
//! cursor at the window currently applied. Writes truncate anything past
//! the cursor before appending; the oldest entry is evicted once the list
//! reaches its limit. Histories are created lazily on first write and are
//! never shared between words.

use serde::Serialize;
use std::collections::{HashMap, VecDeque};

use crate::model::{TimingWindow, WordId};

/// Bounded linear history for a single word
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimingHistory {
    entries: VecDeque<TimingWindow>,
    cursor: usize,
}

impl TimingHistory {
    fn with_entry(window: TimingWindow) -> Self {
        let mut entries = VecDeque::new();
        entries.push_back(window);
        Self { entries, cursor: 0 }
    }

    /// Window at the cursor
    pub fn current(&self) -> TimingWindow {
        // Never empty: histories are created with one entry and only grow
        self.entries[self.cursor]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    fn push(&mut self, window: TimingWindow, limit: usize) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push_back(window);
        while self.entries.len() > limit {
            self.entries.pop_front();
        }
        self.cursor = self.entries.len() - 1;
    }

    fn step_back(&mut self) -> Option<TimingWindow> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        Some(self.current())
    }

    fn step_forward(&mut self) -> Option<TimingWindow> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        Some(self.current())
    }
}

/// All word timing histories, keyed by word
#[derive(Debug, Clone)]
pub struct TimingLedger {
    histories: HashMap<WordId, TimingHistory>,
    limit: usize,
    min_gap: f64,
}

impl TimingLedger {
    pub fn new(limit: usize, min_gap: f64) -> Self {
        Self {
            histories: HashMap::new(),
            limit: limit.max(1),
            min_gap,
        }
    }

    /// Record the word's timing before any edit, so the first edit can be
    /// undone. Ignored once the word has a history.
    pub fn seed(&mut self, word_id: &WordId, start: f64, end: f64) -> bool {
        if self.histories.contains_key(word_id) {
            return false;
        }
        let window = TimingWindow::clamped(start, end, self.min_gap);
        self.histories
            .insert(word_id.clone(), TimingHistory::with_entry(window));
        true
    }

    /// Write a new current window, discarding any redo branch
    ///
    /// Returns the window actually stored after clamping.
    pub fn record(&mut self, word_id: &WordId, start: f64, end: f64) -> TimingWindow {
        let window = TimingWindow::clamped(start, end, self.min_gap);
        match self.histories.get_mut(word_id) {
            Some(history) => history.push(window, self.limit),
            None => {
                self.histories
                    .insert(word_id.clone(), TimingHistory::with_entry(window));
            }
        }
        window
    }

    /// Move the cursor back one entry. `None` at the start of history.
    pub fn undo(&mut self, word_id: &WordId) -> Option<TimingWindow> {
        self.histories.get_mut(word_id)?.step_back()
    }

    /// Move the cursor forward one entry. `None` at the end of history.
    pub fn redo(&mut self, word_id: &WordId) -> Option<TimingWindow> {
        self.histories.get_mut(word_id)?.step_forward()
    }

    pub fn current(&self, word_id: &WordId) -> Option<TimingWindow> {
        self.histories.get(word_id).map(TimingHistory::current)
    }

    pub fn history(&self, word_id: &WordId) -> Option<&TimingHistory> {
        self.histories.get(word_id)
    }

    pub fn can_undo(&self, word_id: &WordId) -> bool {
        self.histories.get(word_id).is_some_and(TimingHistory::can_undo)
    }

    pub fn can_redo(&self, word_id: &WordId) -> bool {
        self.histories.get(word_id).is_some_and(TimingHistory::can_redo)
    }

    /// Drop a word's history entirely
    pub fn forget(&mut self, word_id: &WordId) -> bool {
        self.histories.remove(word_id).is_some()
    }

    pub fn min_gap(&self) -> f64 {
        self.min_gap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> TimingLedger {
        TimingLedger::new(50, 0.01)
    }

    fn w(id: &str) -> WordId {
        WordId::from(id)
    }

    #[test]
    fn test_record_creates_history_lazily() {
        let mut ledger = ledger();
        assert!(ledger.current(&w("a")).is_none());

        let stored = ledger.record(&w("a"), 1.0, 2.0);
        assert_eq!(stored, TimingWindow { start: 1.0, end: 2.0 });
        assert_eq!(ledger.current(&w("a")), Some(stored));
        assert!(!ledger.can_undo(&w("a")));
    }

    #[test]
    fn test_record_clamps_end() {
        let mut ledger = ledger();
        let stored = ledger.record(&w("a"), 3.0, 1.0);
        assert!((stored.end - 3.01).abs() < 1e-9);
    }

    #[test]
    fn test_undo_redo_round_trip_at_every_depth() {
        let mut ledger = ledger();
        for i in 0..50 {
            ledger.record(&w("a"), i as f64, i as f64 + 0.5);
        }

        for depth in 1..50 {
            let before = ledger.current(&w("a")).unwrap();
            let undone = ledger.undo(&w("a")).unwrap();
            assert_ne!(undone, before, "depth {depth}");
            let redone = ledger.redo(&w("a")).unwrap();
            assert_eq!(redone, before, "depth {depth}");
            ledger.undo(&w("a"));
        }
    }

    #[test]
    fn test_undo_and_redo_are_noops_at_the_ends() {
        let mut ledger = ledger();
        ledger.record(&w("a"), 0.0, 1.0);
        assert!(ledger.undo(&w("a")).is_none());
        assert!(ledger.redo(&w("a")).is_none());
        assert_eq!(ledger.current(&w("a")), Some(TimingWindow { start: 0.0, end: 1.0 }));

        assert!(ledger.undo(&w("missing")).is_none());
        assert!(ledger.redo(&w("missing")).is_none());
    }

    #[test]
    fn test_fifty_first_write_evicts_oldest() {
        let mut ledger = ledger();
        for i in 0..51 {
            ledger.record(&w("a"), i as f64, i as f64 + 0.5);
        }
        let history = ledger.history(&w("a")).unwrap();
        assert_eq!(history.len(), 50);

        let mut steps = 0;
        let mut last = ledger.current(&w("a")).unwrap();
        while let Some(window) = ledger.undo(&w("a")) {
            last = window;
            steps += 1;
        }
        assert_eq!(steps, 49);
        // Entry 0 was evicted; the oldest reachable window is entry 1
        assert_eq!(last, TimingWindow { start: 1.0, end: 1.5 });
    }

    #[test]
    fn test_write_after_undo_discards_redo_branch() {
        let mut ledger = ledger();
        ledger.record(&w("a"), 0.0, 1.0);
        ledger.record(&w("a"), 1.0, 2.0);
        ledger.record(&w("a"), 2.0, 3.0);

        ledger.undo(&w("a"));
        ledger.undo(&w("a"));
        ledger.record(&w("a"), 5.0, 6.0);

        assert!(!ledger.can_redo(&w("a")));
        assert_eq!(ledger.history(&w("a")).unwrap().len(), 2);
        assert_eq!(ledger.undo(&w("a")), Some(TimingWindow { start: 0.0, end: 1.0 }));
    }

    #[test]
    fn test_histories_are_independent_per_word() {
        let mut ledger = ledger();
        ledger.record(&w("a"), 0.0, 1.0);
        ledger.record(&w("a"), 1.0, 2.0);
        ledger.record(&w("b"), 7.0, 8.0);

        ledger.undo(&w("a"));
        assert_eq!(ledger.current(&w("b")), Some(TimingWindow { start: 7.0, end: 8.0 }));
        assert!(!ledger.can_undo(&w("b")));
    }

    #[test]
    fn test_seed_only_applies_to_fresh_words() {
        let mut ledger = ledger();
        assert!(ledger.seed(&w("a"), 0.0, 0.4));
        ledger.record(&w("a"), 0.1, 0.5);
        assert!(!ledger.seed(&w("a"), 9.0, 9.5));

        assert_eq!(ledger.undo(&w("a")), Some(TimingWindow { start: 0.0, end: 0.4 }));
        assert!(ledger.forget(&w("a")));
        assert!(ledger.current(&w("a")).is_none());
    }
}
