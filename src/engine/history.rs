//! Bounded outcome history, most recent first

use std::collections::VecDeque;

use crate::common::types::Outcome;

/// Default number of outcomes retained
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Append-at-front log of recent outcomes
///
/// Index 0 is the newest outcome. When the log is full the oldest entry is
/// dropped; entries are never reordered.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<Outcome>,
    capacity: usize,
}

impl History {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Build from outcomes listed oldest first
    pub fn from_chronological<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = Outcome>,
    {
        let mut history = Self::new();
        for outcome in outcomes {
            history.push(outcome);
        }
        history
    }

    /// Record a new outcome as the most recent entry
    pub fn push(&mut self, outcome: Outcome) {
        self.entries.push_front(outcome);
        self.entries.truncate(self.capacity);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<&Outcome> {
        self.entries.front()
    }

    pub fn get(&self, index: usize) -> Option<&Outcome> {
        self.entries.get(index)
    }

    /// Iterate newest to oldest
    pub fn iter(&self) -> impl Iterator<Item = &Outcome> {
        self.entries.iter()
    }

    /// Iterate non-tie outcomes, newest to oldest
    pub fn non_ties(&self) -> impl Iterator<Item = &Outcome> {
        self.entries.iter().filter(|o| !o.category.is_tie())
    }

    /// Up to `n` most recent non-tie outcomes
    pub fn recent_non_ties(&self, n: usize) -> Vec<&Outcome> {
        self.non_ties().take(n).collect()
    }

    /// Nearest non-tie outcome strictly older than the latest entry
    pub fn last_non_tie_before_latest(&self) -> Option<&Outcome> {
        self.entries.iter().skip(1).find(|o| !o.category.is_tie())
    }

    /// Pattern string of the most recent outcomes (`PBTP...`)
    pub fn pattern(&self, n: usize) -> String {
        self.entries.iter().take(n).map(|o| o.category.initial()).collect()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::Category;

    fn outcome(category: Category, index: u64) -> Outcome {
        Outcome::new(category, 5, 5, index)
    }

    #[test]
    fn test_push_is_most_recent_first() {
        let mut history = History::new();
        history.push(outcome(Category::Player, 1));
        history.push(outcome(Category::Banker, 2));

        assert_eq!(history.latest().unwrap().sequence_index, 2);
        assert_eq!(history.get(1).unwrap().sequence_index, 1);
        assert_eq!(history.pattern(5), "BP");
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut history = History::new();
        for i in 0..60 {
            history.push(outcome(Category::Player, i));
        }
        assert_eq!(history.len(), 50);
        assert_eq!(history.latest().unwrap().sequence_index, 59);
        assert_eq!(history.get(49).unwrap().sequence_index, 10);
    }

    #[test]
    fn test_non_tie_views() {
        let history = History::from_chronological(vec![
            outcome(Category::Banker, 1),
            outcome(Category::Player, 2),
            outcome(Category::Tie, 3),
        ]);

        let recent: Vec<u64> = history
            .recent_non_ties(4)
            .iter()
            .map(|o| o.sequence_index)
            .collect();
        assert_eq!(recent, vec![2, 1]);
        assert_eq!(history.last_non_tie_before_latest().unwrap().sequence_index, 2);
    }

    #[test]
    fn test_empty_history() {
        let history = History::new();
        assert!(history.is_empty());
        assert!(history.latest().is_none());
        assert!(history.last_non_tie_before_latest().is_none());
        assert!(history.recent_non_ties(4).is_empty());
    }
}
