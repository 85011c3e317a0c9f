//! Alternation detector: bets that a strict `XYXY` pattern keeps flipping

use super::cascade::{Cascade, RetryTarget, TieWhileArmed};
use super::traits::Strategy;
use super::types::{Detection, StrategyContext, StrategyKind, StrategyStatus, Transition};
use crate::common::types::{Category, Outcome};
use crate::config::types::AlternationSettings;
use crate::engine::history::History;

const PATTERN_LENGTH: usize = 4;

/// Arms when the four most recent non-tie outcomes strictly alternate and
/// predicts the opposite of the latest one. The retry bets against whatever
/// the first attempt produced.
#[derive(Debug, Clone)]
pub struct AlternationStrategy {
    cascade: Cascade,
}

impl AlternationStrategy {
    pub fn new(settings: &AlternationSettings) -> Self {
        Self {
            cascade: Cascade::new(
                StrategyKind::Alternation,
                RetryTarget::OppositeOfFirstAttempt,
                TieWhileArmed::WinAndDisarm,
                settings.escalate_after,
            ),
        }
    }

    /// Returns the pattern oldest first when `r0..r3` alternate
    fn detect(history: &History) -> Option<Vec<Category>> {
        let recent: Vec<Category> = history
            .recent_non_ties(PATTERN_LENGTH)
            .iter()
            .map(|o| o.category)
            .collect();
        let [r0, r1, r2, r3] = <[Category; PATTERN_LENGTH]>::try_from(recent).ok()?;

        let alternating = r0 != r1 && r1 != r2 && r2 != r3 && r0 == r2 && r1 == r3;
        alternating.then(|| vec![r3, r2, r1, r0])
    }
}

impl Default for AlternationStrategy {
    fn default() -> Self {
        Self::new(&AlternationSettings::default())
    }
}

impl Strategy for AlternationStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Alternation
    }

    fn consume(&mut self, outcome: &Outcome, ctx: &StrategyContext<'_>) -> Option<Transition> {
        if outcome.category.is_tie() {
            return self.cascade.on_tie(outcome);
        }
        if self.cascade.is_armed() {
            return self.cascade.resolve(outcome);
        }

        let pattern = Self::detect(ctx.history)?;
        let target = pattern.last()?.opposite();
        self.cascade.arm(target);
        Some(Transition::Armed {
            target,
            detection: Detection::Alternating { pattern },
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
    use Category::{Banker as B, Player as P, Tie as T};

    fn feed_all(s: &mut AlternationStrategy, h: &mut History, seq: &[Category]) -> Vec<Option<Transition>> {
        seq.iter()
            .map(|&c| {
                let outcome = Outcome::new(c, 4, 2, h.len() as u64);
                h.push(outcome);
                let t = s.consume(&outcome, &StrategyContext::new(h));
                if !s.status().armed {
                    assert_eq!(s.status().stage, Stage::None);
                    assert_eq!(s.status().target, None);
                }
                t
            })
            .collect()
    }

    #[test]
    fn test_alternation_arms_against_latest() {
        let mut s = AlternationStrategy::default();
        let mut h = History::new();
        let out = feed_all(&mut s, &mut h, &[P, B, P, B]);
        assert!(out[..3].iter().all(Option::is_none));
        assert_eq!(
            out[3],
            Some(Transition::Armed {
                target: P,
                detection: Detection::Alternating {
                    pattern: vec![P, B, P, B]
                },
            })
        );
    }

    #[test]
    fn test_first_attempt_miss_flips_retry_target() {
        let mut s = AlternationStrategy::default();
        let mut h = History::new();
        feed_all(&mut s, &mut h, &[P, B, P, B]);

        let out = feed_all(&mut s, &mut h, &[B]);
        assert!(matches!(
            out[0],
            Some(Transition::MovedToRetry {
                expected: P,
                retry_target: P,
                ..
            })
        ));
        assert_eq!(s.status().first_attempt_outcome.map(|o| o.category), Some(B));

        let out = feed_all(&mut s, &mut h, &[P]);
        assert!(matches!(out[0], Some(Transition::Win { attempt: Attempt::Retry, .. })));
    }

    #[test]
    fn test_ties_are_filtered_before_windowing() {
        let mut s = AlternationStrategy::default();
        let mut h = History::new();
        let out = feed_all(&mut s, &mut h, &[B, T, P, B, T, P]);
        assert!(matches!(out[5], Some(Transition::Armed { target: B, .. })));
    }

    #[test]
    fn test_tie_while_armed_disarms() {
        let mut s = AlternationStrategy::default();
        let mut h = History::new();
        let out = feed_all(&mut s, &mut h, &[P, B, P, B, T]);
        assert!(matches!(out[4], Some(Transition::TieWin { still_armed: false, .. })));
        assert!(!s.status().armed);
        assert_eq!(s.status().counters.tie_wins, 1);
    }

    #[test]
    fn test_non_alternating_does_not_arm() {
        let mut s = AlternationStrategy::default();
        let mut h = History::new();
        let out = feed_all(&mut s, &mut h, &[P, P, B, P]);
        assert!(out.iter().all(Option::is_none));
    }

    #[test]
    fn test_two_losses_escalate() {
        let mut s = AlternationStrategy::default();
        let mut h = History::new();
        // arm on P B P B (target P), G0 gets B (retry P), G1 gets B: loss
        let out = feed_all(&mut s, &mut h, &[P, B, P, B, B, B]);
        assert!(matches!(out[5], Some(Transition::Loss { escalate: false, .. })));

        // B P B P arms on B; G0 gets P (retry B), G1 gets P: second loss
        let out = feed_all(&mut s, &mut h, &[P, B, P, P, P]);
        assert!(out[..2].iter().all(Option::is_none));
        assert!(matches!(out[2], Some(Transition::Armed { target: B, .. })));
        assert!(matches!(out[4], Some(Transition::Loss { escalate: true, .. })));
    }
}
