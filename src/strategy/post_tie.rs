//! Post-tie detector: bets that the side which won before a tie wins again

use super::cascade::{Cascade, RetryTarget, TieWhileArmed};
use super::traits::Strategy;
use super::types::{Detection, StrategyContext, StrategyKind, StrategyStatus, Transition};
use crate::common::types::Outcome;
use crate::config::types::PostTieSettings;

/// Arms on a tie, targeting the nearest earlier non-tie outcome.
///
/// Unlike the other strategies, further ties while armed are tie wins that
/// leave the prediction open.
#[derive(Debug, Clone)]
pub struct PostTieStrategy {
    cascade: Cascade,
}

impl PostTieStrategy {
    pub fn new(settings: &PostTieSettings) -> Self {
        Self {
            cascade: Cascade::new(
                StrategyKind::PostTie,
                RetryTarget::Unchanged,
                TieWhileArmed::WinAndStayArmed,
                settings.escalate_after,
            ),
        }
    }
}

impl Default for PostTieStrategy {
    fn default() -> Self {
        Self::new(&PostTieSettings::default())
    }
}

impl Strategy for PostTieStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::PostTie
    }

    fn consume(&mut self, outcome: &Outcome, ctx: &StrategyContext<'_>) -> Option<Transition> {
        if !outcome.category.is_tie() {
            return self.cascade.resolve(outcome);
        }
        if self.cascade.is_armed() {
            return self.cascade.on_tie(outcome);
        }

        let previous = ctx.history.last_non_tie_before_latest()?.category;
        self.cascade.arm(previous);
        Some(Transition::Armed {
            target: previous,
            detection: Detection::AfterTie {
                tie: *outcome,
                previous,
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
