//! Run detector: bets that a streak of identical results continues

use tracing::debug;

use super::cascade::{Cascade, RetryTarget, TieWhileArmed};
use super::traits::Strategy;
use super::types::{Detection, StrategyContext, StrategyKind, StrategyStatus, Transition};
use crate::common::types::{Category, Outcome};
use crate::config::types::SequenceSettings;
use crate::engine::history::History;

/// Arms after `run_length` identical non-tie outcomes and predicts the
/// same category again. Ties while unarmed are ignored and do not break a
/// run; a tie while armed is a tie win and disarms.
#[derive(Debug, Clone)]
pub struct SequenceStrategy {
    cascade: Cascade,
    run_length: usize,
}

impl SequenceStrategy {
    pub fn new(settings: &SequenceSettings) -> Self {
        Self {
            cascade: Cascade::new(
                StrategyKind::Sequence,
                RetryTarget::Unchanged,
                TieWhileArmed::WinAndDisarm,
                settings.escalate_after,
            ),
            run_length: settings.run_length,
        }
    }

    fn detect(&self, history: &History) -> Option<Category> {
        let window = history.recent_non_ties(self.run_length);
        if self.run_length == 0 || window.len() < self.run_length {
            return None;
        }

        let first = window[0].category;
        debug!(pattern = %history.pattern(self.run_length + 2), "Checking for run");
        window.iter().all(|o| o.category == first).then_some(first)
    }
}

impl Default for SequenceStrategy {
    fn default() -> Self {
        Self::new(&SequenceSettings::default())
    }
}

impl Strategy for SequenceStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Sequence
    }

    fn consume(&mut self, outcome: &Outcome, ctx: &StrategyContext<'_>) -> Option<Transition> {
        if outcome.category.is_tie() {
            return self.cascade.on_tie(outcome);
        }
        if self.cascade.is_armed() {
            return self.cascade.resolve(outcome);
        }

        let category = self.detect(ctx.history)?;
        self.cascade.arm(category);
        Some(Transition::Armed {
            target: category,
            detection: Detection::Run {
                category,
                length: self.run_length,
            },
        })
    }

    fn status(&self) -> StrategyStatus {
        self.cascade.status()
    }

    fn reset_counters(&mut self) {
        self.cascade.reset_counters();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::types::{Attempt, Stage};

    struct Harness {
        history: History,
        strategy: SequenceStrategy,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                history: History::new(),
                strategy: SequenceStrategy::default(),
            }
        }

        fn feed(&mut self, category: Category) -> Option<Transition> {
            let outcome = Outcome::new(category, 7, 3, self.history.len() as u64);
            self.history.push(outcome);
            let ctx = StrategyContext::new(&self.history);
            let transition = self.strategy.consume(&outcome, &ctx);

            let status = self.strategy.status();
            if !status.armed {
                assert_eq!(status.target, None);
                assert_eq!(status.stage, Stage::None);
                assert_eq!(status.first_attempt_outcome, None);
            }
            transition
        }
    }

    #[test]
    fn test_four_identical_arm() {
        let mut h = Harness::new();
        for _ in 0..3 {
            assert!(h.feed(Category::Player).is_none());
        }
        let t = h.feed(Category::Player).unwrap();
        assert!(matches!(
            t,
            Transition::Armed {
                target: Category::Player,
                detection: Detection::Run { length: 4, .. }
            }
        ));
        let status = h.strategy.status();
        assert!(status.armed);
        assert_eq!(status.stage, Stage::FirstAttempt);
        assert_eq!(status.target, Some(Category::Player));
    }

    #[test]
    fn test_fifth_matching_is_first_attempt_win() {
        let mut h = Harness::new();
        for _ in 0..4 {
            h.feed(Category::Banker);
        }
        let t = h.feed(Category::Banker).unwrap();
        assert!(matches!(t, Transition::Win { attempt: Attempt::First, .. }));
        let status = h.strategy.status();
        assert!(!status.armed);
        assert_eq!(status.counters.wins_first_attempt, 1);
        assert_eq!(status.counters.total_wins, 1);
    }

    #[test]
    fn test_retry_then_loss() {
        let mut h = Harness::new();
        for _ in 0..4 {
            h.feed(Category::Player);
        }
        let t = h.feed(Category::Banker).unwrap();
        assert!(matches!(t, Transition::MovedToRetry { retry_target: Category::Player, .. }));
        assert_eq!(h.strategy.status().stage, Stage::Retry);

        let t = h.feed(Category::Banker).unwrap();
        assert!(matches!(
            t,
            Transition::Loss {
                expected: Category::Player,
                escalate: false,
                ..
            }
        ));
        let status = h.strategy.status();
        assert!(!status.armed);
        assert_eq!(status.counters.total_losses, 1);
        assert_eq!(status.counters.current_loss_streak, 1);
    }

    #[test]
    fn test_ties_do_not_break_run_when_unarmed() {
        let mut h = Harness::new();
        h.feed(Category::Player);
        h.feed(Category::Player);
        assert!(h.feed(Category::Tie).is_none());
        h.feed(Category::Player);
        let t = h.feed(Category::Player);
        assert!(matches!(t, Some(Transition::Armed { .. })));
        assert_eq!(h.strategy.status().counters.tie_wins, 0);
    }

    #[test]
    fn test_tie_while_armed_is_tie_win() {
        let mut h = Harness::new();
        for _ in 0..4 {
            h.feed(Category::Banker);
        }
        let t = h.feed(Category::Tie).unwrap();
        assert!(matches!(t, Transition::TieWin { still_armed: false, .. }));
        let status = h.strategy.status();
        assert!(!status.armed);
        assert_eq!(status.counters.tie_wins, 1);
        assert_eq!(status.counters.current_win_streak, 1);
    }

    #[test]
    fn test_mixed_history_does_not_arm() {
        let mut h = Harness::new();
        for c in [Category::Player, Category::Banker, Category::Player, Category::Player] {
            assert!(h.feed(c).is_none());
        }
    }

    #[test]
    fn test_two_losses_escalate() {
        let mut h = Harness::new();
        for _ in 0..4 {
            h.feed(Category::Player);
        }
        h.feed(Category::Banker);
        h.feed(Category::Banker);
        // history now ends B B: two more banker results re-arm on banker
        h.feed(Category::Banker);
        let t = h.feed(Category::Banker).unwrap();
        assert!(matches!(t, Transition::Armed { target: Category::Banker, .. }));
        h.feed(Category::Player);
        let t = h.feed(Category::Player).unwrap();
        assert!(matches!(t, Transition::Loss { escalate: true, .. }));
    }
}
