use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::types::{Category, Channel, Outcome};
use crate::engine::history::History;

/// The closed set of strategy variants, in declaration order
///
/// The order matters: reports list strategies in this order and ranking
/// ties are broken by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Sequence,
    PostTie,
    Alternation,
    DynamicRatio,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::Sequence,
        StrategyKind::PostTie,
        StrategyKind::Alternation,
        StrategyKind::DynamicRatio,
    ];

    /// Parse a configuration or CLI name (`sequence`, `post_tie`, `post-tie`, ...)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "sequence" => Some(StrategyKind::Sequence),
            "post_tie" => Some(StrategyKind::PostTie),
            "alternation" => Some(StrategyKind::Alternation),
            "dynamic_ratio" => Some(StrategyKind::DynamicRatio),
            _ => None,
        }
    }

    /// Human-readable name
    pub fn display_name(self) -> &'static str {
        match self {
            StrategyKind::Sequence => "Sequence",
            StrategyKind::PostTie => "Post Tie",
            StrategyKind::Alternation => "Alternation",
            StrategyKind::DynamicRatio => "Dynamic Ratio",
        }
    }

    /// Upper-case label used as message prefix
    pub fn label(self) -> &'static str {
        match self {
            StrategyKind::Sequence => "SEQUENCE",
            StrategyKind::PostTie => "POST TIE",
            StrategyKind::Alternation => "ALTERNATION",
            StrategyKind::DynamicRatio => "DYNAMIC RATIO",
        }
    }

    /// Dedicated notification channel
    pub fn channel(self) -> Channel {
        match self {
            StrategyKind::Sequence => Channel::Sequence,
            StrategyKind::PostTie => Channel::PostTie,
            StrategyKind::Alternation => Channel::Alternation,
            StrategyKind::DynamicRatio => Channel::DynamicRatio,
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Position in the two-attempt wager cascade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    None,
    FirstAttempt,
    Retry,
}

/// Which attempt resolved a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attempt {
    First,
    Retry,
}

/// Win/loss bookkeeping for one strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    /// Wins on a matching outcome (first attempt or retry); tie wins excluded
    pub total_wins: u64,
    pub total_losses: u64,
    pub wins_first_attempt: u64,
    pub wins_retry: u64,
    pub losses_retry: u64,
    /// Ties that resolved an armed prediction favourably
    pub tie_wins: u64,
    pub current_win_streak: u32,
    pub best_win_streak: u32,
    pub current_loss_streak: u32,
}

impl Counters {
    /// Wins including tie wins
    pub fn wins_with_ties(&self) -> u64 {
        self.total_wins + self.tie_wins
    }

    /// Resolved predictions (wins, tie wins and losses)
    pub fn resolved(&self) -> u64 {
        self.wins_with_ties() + self.total_losses
    }

    pub(crate) fn record_win(&mut self, attempt: Attempt) {
        self.total_wins += 1;
        match attempt {
            Attempt::First => self.wins_first_attempt += 1,
            Attempt::Retry => self.wins_retry += 1,
        }
        self.bump_win_streak();
    }

    pub(crate) fn record_tie_win(&mut self) {
        self.tie_wins += 1;
        self.bump_win_streak();
    }

    pub(crate) fn record_loss(&mut self) {
        self.total_losses += 1;
        self.losses_retry += 1;
        self.current_win_streak = 0;
        self.current_loss_streak += 1;
    }

    fn bump_win_streak(&mut self) {
        self.current_win_streak += 1;
        self.current_loss_streak = 0;
        self.best_win_streak = self.best_win_streak.max(self.current_win_streak);
    }

    /// Daily reset: everything except the all-time best win streak
    pub(crate) fn reset(&mut self) {
        *self = Counters {
            best_win_streak: self.best_win_streak,
            ..Counters::default()
        };
    }
}

/// Read-only snapshot of a strategy, for reports and status queries
///
/// `armed == false` always comes with no target, `Stage::None` and no
/// first-attempt outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrategyStatus {
    pub kind: StrategyKind,
    pub name: String,
    pub armed: bool,
    pub target: Option<Category>,
    pub stage: Stage,
    pub first_attempt_outcome: Option<Outcome>,
    pub counters: Counters,
}

/// Why a strategy armed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    /// `length` identical non-tie outcomes in a row
    Run { category: Category, length: usize },
    /// A tie whose nearest earlier non-tie outcome was `previous`
    AfterTie { tie: Outcome, previous: Category },
    /// Strict alternation, oldest first (`P B P B`)
    Alternating { pattern: Vec<Category> },
    /// One side holds at least the threshold share of the window
    Imbalance {
        samples: usize,
        majority: Category,
        majority_pct: Decimal,
        minority_pct: Decimal,
    },
}

/// State change produced by one `consume` call
///
/// Transitions are pure decisions; turning them into text is done
/// separately by the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// A pattern was detected and a prediction is pending
    Armed { target: Category, detection: Detection },
    /// Matching outcome on the first attempt or the retry
    Win { attempt: Attempt, outcome: Outcome },
    /// Tie while armed; `still_armed` when the strategy keeps monitoring
    TieWin { outcome: Outcome, still_armed: bool },
    /// First attempt missed; the retry now targets `retry_target`
    MovedToRetry {
        outcome: Outcome,
        expected: Category,
        retry_target: Category,
    },
    /// Retry missed; the prediction is lost
    Loss {
        outcome: Outcome,
        expected: Category,
        escalate: bool,
    },
}

impl Transition {
    /// Whether this transition resolved a prediction favourably
    pub fn is_win(&self) -> bool {
        matches!(self, Transition::Win { .. } | Transition::TieWin { .. })
    }
}

/// Context provided to strategies by the coordinator
///
/// Strategies read the shared history through this handle and never keep
/// their own copy of it.
#[derive(Debug, Clone, Copy)]
pub struct StrategyContext<'a> {
    pub history: &'a History,
}

impl<'a> StrategyContext<'a> {
    pub fn new(history: &'a History) -> Self {
        Self { history }
    }
}
