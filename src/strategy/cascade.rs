//! Two-attempt (G0/G1) wager cascade shared by every strategy
//!
//! A strategy only decides *when* to arm and *what* to predict. Everything
//! after that (first attempt, retry, tie handling, counters and streaks)
//! is the same machine, parameterised by a retry-target rule, a tie rule
//! and an escalation threshold.

use tracing::{debug, info};

use super::types::{Attempt, Counters, Stage, StrategyKind, StrategyStatus, Transition};
use crate::common::types::{Category, Outcome};

/// How the retry's predicted category is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryTarget {
    /// Retry bets on the category predicted at detection time
    Unchanged,
    /// Retry bets against whatever the first attempt produced
    OppositeOfFirstAttempt,
}

/// What a tie does to an armed prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TieWhileArmed {
    /// Counts as a tie win and disarms
    WinAndDisarm,
    /// Counts as a tie win; the prediction stays pending
    WinAndStayArmed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    FirstAttempt {
        target: Category,
    },
    Retry {
        target: Category,
        first_attempt: Outcome,
    },
}

/// Cascade state plus the strategy's counters
#[derive(Debug, Clone)]
pub struct Cascade {
    kind: StrategyKind,
    phase: Phase,
    counters: Counters,
    retry_target: RetryTarget,
    tie_rule: TieWhileArmed,
    escalate_after: u32,
}

impl Cascade {
    pub fn new(
        kind: StrategyKind,
        retry_target: RetryTarget,
        tie_rule: TieWhileArmed,
        escalate_after: u32,
    ) -> Self {
        Self {
            kind,
            phase: Phase::Idle,
            counters: Counters::default(),
            retry_target,
            tie_rule,
            escalate_after,
        }
    }

    pub fn is_armed(&self) -> bool {
        !matches!(self.phase, Phase::Idle)
    }

    /// Category currently bet on (the retry target while retrying)
    pub fn target(&self) -> Option<Category> {
        match self.phase {
            Phase::Idle => None,
            Phase::FirstAttempt { target } | Phase::Retry { target, .. } => Some(target),
        }
    }

    pub fn stage(&self) -> Stage {
        match self.phase {
            Phase::Idle => Stage::None,
            Phase::FirstAttempt { .. } => Stage::FirstAttempt,
            Phase::Retry { .. } => Stage::Retry,
        }
    }

    pub fn first_attempt_outcome(&self) -> Option<Outcome> {
        match self.phase {
            Phase::Retry { first_attempt, .. } => Some(first_attempt),
            _ => None,
        }
    }

    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    /// Start a new prediction on `target`
    pub fn arm(&mut self, target: Category) {
        info!(strategy = %self.kind, %target, "Prediction armed");
        self.phase = Phase::FirstAttempt { target };
    }

    /// Handle a tie; `None` when nothing is armed
    pub fn on_tie(&mut self, outcome: &Outcome) -> Option<Transition> {
        if !self.is_armed() {
            return None;
        }

        self.counters.record_tie_win();
        let still_armed = match self.tie_rule {
            TieWhileArmed::WinAndDisarm => {
                self.disarm();
                false
            }
            TieWhileArmed::WinAndStayArmed => true,
        };

        info!(
            strategy = %self.kind,
            still_armed,
            streak = self.counters.current_win_streak,
            "Tie counted as a win"
        );

        Some(Transition::TieWin {
            outcome: *outcome,
            still_armed,
        })
    }

    /// Resolve a non-tie outcome against the pending prediction
    ///
    /// Returns `None` when nothing is armed.
    pub fn resolve(&mut self, outcome: &Outcome) -> Option<Transition> {
        match self.phase {
            Phase::Idle => None,
            Phase::FirstAttempt { target } => {
                if outcome.category == target {
                    Some(self.win(Attempt::First, outcome))
                } else {
                    let retry_target = match self.retry_target {
                        RetryTarget::Unchanged => target,
                        RetryTarget::OppositeOfFirstAttempt => outcome.category.opposite(),
                    };
                    debug!(
                        strategy = %self.kind,
                        expected = %target,
                        got = %outcome.category,
                        %retry_target,
                        "First attempt missed, moving to retry"
                    );
                    self.phase = Phase::Retry {
                        target: retry_target,
                        first_attempt: *outcome,
                    };
                    Some(Transition::MovedToRetry {
                        outcome: *outcome,
                        expected: target,
                        retry_target,
                    })
                }
            }
            Phase::Retry { target, .. } => {
                if outcome.category == target {
                    Some(self.win(Attempt::Retry, outcome))
                } else {
                    self.counters.record_loss();
                    self.disarm();
                    let escalate = self.counters.current_loss_streak >= self.escalate_after;
                    info!(
                        strategy = %self.kind,
                        expected = %target,
                        got = %outcome.category,
                        consecutive_losses = self.counters.current_loss_streak,
                        escalate,
                        "Prediction lost"
                    );
                    Some(Transition::Loss {
                        outcome: *outcome,
                        expected: target,
                        escalate,
                    })
                }
            }
        }
    }

    fn win(&mut self, attempt: Attempt, outcome: &Outcome) -> Transition {
        self.counters.record_win(attempt);
        self.disarm();
        info!(
            strategy = %self.kind,
            ?attempt,
            streak = self.counters.current_win_streak,
            "Prediction won"
        );
        Transition::Win {
            attempt,
            outcome: *outcome,
        }
    }

    fn disarm(&mut self) {
        self.phase = Phase::Idle;
    }

    /// Daily rollover: clear counters, keep the pending prediction
    pub fn reset_counters(&mut self) {
        self.counters.reset();
    }

    pub fn status(&self) -> StrategyStatus {
        StrategyStatus {
            kind: self.kind,
            name: self.kind.display_name().to_string(),
            armed: self.is_armed(),
            target: self.target(),
            stage: self.stage(),
            first_attempt_outcome: self.first_attempt_outcome(),
            counters: self.counters,
        }
    }
}
