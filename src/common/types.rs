//! Unified types shared by the feed, the engine and the notifiers

use serde::{Deserialize, Serialize};

use super::errors::{MonitorError, Result};

/// Result of a single Bac Bo round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Player,
    Banker,
    Tie,
}

impl Category {
    /// Parse a feed label (`player`, `banker`, `tie`, or their initials)
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "player" | "p" => Some(Category::Player),
            "banker" | "b" => Some(Category::Banker),
            "tie" | "t" => Some(Category::Tie),
            _ => None,
        }
    }

    pub fn is_tie(self) -> bool {
        matches!(self, Category::Tie)
    }

    /// The other non-tie side. A tie has no opposite and maps to itself.
    pub fn opposite(self) -> Self {
        match self {
            Category::Player => Category::Banker,
            Category::Banker => Category::Player,
            Category::Tie => Category::Tie,
        }
    }

    /// Single-letter form used in pattern strings (`PBPB`)
    pub fn initial(self) -> char {
        match self {
            Category::Player => 'P',
            Category::Banker => 'B',
            Category::Tie => 'T',
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Player => write!(f, "PLAYER"),
            Category::Banker => write!(f, "BANKER"),
            Category::Tie => write!(f, "TIE"),
        }
    }
}

/// A validated round outcome
///
/// Produced by an outcome source and never mutated afterwards. Scores are
/// unsigned, so an `Outcome` can only be built from well-formed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub category: Category,
    pub player_score: u32,
    pub banker_score: u32,
    /// Absolute difference between the two scores
    pub margin: u32,
    /// Ordinal assigned by the source at scrape time (not a round number)
    pub sequence_index: u64,
}

impl Outcome {
    pub fn new(category: Category, player_score: u32, banker_score: u32, sequence_index: u64) -> Self {
        Self {
            category,
            player_score,
            banker_score,
            margin: player_score.abs_diff(banker_score),
            sequence_index,
        }
    }

    /// Equality used for deduplication: category plus both scores
    pub fn same_result(&self, other: &Outcome) -> bool {
        self.category == other.category
            && self.player_score == other.player_score
            && self.banker_score == other.banker_score
    }

    pub fn with_sequence_index(mut self, sequence_index: u64) -> Self {
        self.sequence_index = sequence_index;
        self
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}-{}]", self.category, self.player_score, self.banker_score)
    }
}

/// Outcome as delivered by a feed, before validation
///
/// Feeds either report both scores, or only the winning `score` (the
/// losing side is then estimated two points lower, and a tie carries the
/// same score on both sides).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawOutcome {
    pub result: String,
    #[serde(default)]
    pub player_score: Option<i64>,
    #[serde(default)]
    pub banker_score: Option<i64>,
    #[serde(default)]
    pub score: Option<i64>,
}

impl RawOutcome {
    pub fn new(result: impl Into<String>, player_score: i64, banker_score: i64) -> Self {
        Self {
            result: result.into(),
            player_score: Some(player_score),
            banker_score: Some(banker_score),
            score: None,
        }
    }

    /// Validate into an [`Outcome`] with a placeholder sequence index
    pub fn validate(&self) -> Result<Outcome> {
        let category = Category::from_label(&self.result).ok_or_else(|| {
            MonitorError::MalformedOutcome(format!("unknown category '{}'", self.result))
        })?;

        let (player_score, banker_score) = match (self.player_score, self.banker_score, self.score) {
            (Some(player), Some(banker), _) => (to_score(player)?, to_score(banker)?),
            (_, _, Some(score)) => {
                let winner = to_score(score)?;
                match category {
                    Category::Player => (winner, estimated_loser(winner)?),
                    Category::Banker => (estimated_loser(winner)?, winner),
                    Category::Tie => (winner, winner),
                }
            }
            _ => {
                return Err(MonitorError::MalformedOutcome(format!(
                    "missing scores for '{}'",
                    self.result
                )))
            }
        };

        Ok(Outcome::new(category, player_score, banker_score, 0))
    }
}

/// Losing side estimated two points below the winner
fn estimated_loser(winner: u32) -> Result<u32> {
    winner
        .checked_sub(2)
        .ok_or_else(|| MonitorError::MalformedOutcome(format!("winning score {} too low", winner)))
}

fn to_score(value: i64) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| MonitorError::MalformedOutcome(format!("invalid score {}", value)))
}

impl TryFrom<RawOutcome> for Outcome {
    type Error = MonitorError;

    fn try_from(raw: RawOutcome) -> Result<Self> {
        raw.validate()
    }
}

/// Logical notification channel
///
/// One per strategy plus a general channel. Each maps to its own delivery
/// target; urgent messages go to the channel's secondary target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    General,
    Sequence,
    PostTie,
    Alternation,
    DynamicRatio,
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Channel::General => write!(f, "general"),
            Channel::Sequence => write!(f, "sequence"),
            Channel::PostTie => write!(f, "post_tie"),
            Channel::Alternation => write!(f, "alternation"),
            Channel::DynamicRatio => write!(f, "dynamic_ratio"),
        }
    }
}

/// A rendered message ready for a notification sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub channel: Channel,
    pub text: String,
    pub urgent: bool,
}

impl Notification {
    pub fn new(channel: Channel, text: impl Into<String>) -> Self {
        Self {
            channel,
            text: text.into(),
            urgent: false,
        }
    }

    pub fn urgent(channel: Channel, text: impl Into<String>) -> Self {
        Self {
            channel,
            text: text.into(),
            urgent: true,
        }
    }

    pub fn general(text: impl Into<String>) -> Self {
        Self::new(Channel::General, text)
    }
}
