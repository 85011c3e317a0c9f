//! Duplicate filter between a feed and the engine

use tracing::trace;

use crate::common::types::Outcome;

/// Passes an outcome only when it differs from the last one delivered
///
/// Equality is category plus both scores. Accepted outcomes get a
/// monotonically increasing sequence index.
#[derive(Debug, Clone, Default)]
pub struct OutcomeDeduplicator {
    last: Option<Outcome>,
    next_index: u64,
}

impl OutcomeDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stamped outcome when it is new, `None` for a repeat
    pub fn accept(&mut self, candidate: Outcome) -> Option<Outcome> {
        if let Some(last) = &self.last {
            if last.same_result(&candidate) {
                trace!(%candidate, "Duplicate outcome skipped");
                return None;
            }
        }

        self.next_index += 1;
        let stamped = candidate.with_sequence_index(self.next_index);
        self.last = Some(stamped);
        Some(stamped)
    }

    pub fn last(&self) -> Option<&Outcome> {
        self.last.as_ref()
    }

    pub fn delivered(&self) -> u64 {
        self.next_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::Category;

    #[test]
    fn test_repeats_are_dropped() {
        let mut dedup = OutcomeDeduplicator::new();
        let a = Outcome::new(Category::Player, 8, 5, 0);

        let first = dedup.accept(a).unwrap();
        assert_eq!(first.sequence_index, 1);
        assert!(dedup.accept(a).is_none());
        assert!(dedup.accept(a.with_sequence_index(99)).is_none());
        assert_eq!(dedup.delivered(), 1);
    }

    #[test]
    fn test_changed_score_is_new() {
        let mut dedup = OutcomeDeduplicator::new();
        dedup.accept(Outcome::new(Category::Player, 8, 5, 0));
        let next = dedup.accept(Outcome::new(Category::Player, 8, 6, 0)).unwrap();
        assert_eq!(next.sequence_index, 2);

        // same result again after a different one is delivered again
        dedup.accept(Outcome::new(Category::Tie, 4, 4, 0));
        assert!(dedup.accept(Outcome::new(Category::Player, 8, 6, 0)).is_some());
        assert_eq!(dedup.last().map(|o| o.sequence_index), Some(4));
    }
}
