//! Process-wide round and category bookkeeping

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::common::types::{Category, Outcome};
use crate::strategy::StrategyKind;

/// Per-category counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryCounts {
    pub player: u64,
    pub banker: u64,
    pub tie: u64,
}

impl CategoryCounts {
    pub fn get(&self, category: Category) -> u64 {
        match category {
            Category::Player => self.player,
            Category::Banker => self.banker,
            Category::Tie => self.tie,
        }
    }

    fn get_mut(&mut self, category: Category) -> &mut u64 {
        match category {
            Category::Player => &mut self.player,
            Category::Banker => &mut self.banker,
            Category::Tie => &mut self.tie,
        }
    }

    pub fn total(&self) -> u64 {
        self.player + self.banker + self.tie
    }
}

/// The most recent prediction won by any strategy
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WinRecord {
    pub category: Category,
    pub player_score: u32,
    pub banker_score: u32,
    pub strategy: StrategyKind,
    pub at: DateTime<Utc>,
}

/// Global tally owned by the coordinator
///
/// `round` and `totals` are daily figures; best scores and streaks survive
/// the daily reset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GlobalTally {
    pub round: u64,
    pub totals: CategoryCounts,
    pub best_player_score: u32,
    pub best_banker_score: u32,
    pub current_streaks: CategoryCounts,
    pub best_streaks: CategoryCounts,
    pub last_win: Option<WinRecord>,
    /// Day of month seen at the last rollover check
    pub last_day_checked: u32,
}

impl GlobalTally {
    pub fn new(today: u32) -> Self {
        Self {
            last_day_checked: today,
            ..Self::default()
        }
    }

    /// Count one outcome; returns the new round number
    pub fn record(&mut self, outcome: &Outcome) -> u64 {
        self.round += 1;
        *self.totals.get_mut(outcome.category) += 1;

        // an outcome extends its own streak and breaks the other two
        for category in [Category::Player, Category::Banker, Category::Tie] {
            let current = self.current_streaks.get_mut(category);
            if category == outcome.category {
                *current += 1;
            } else {
                *current = 0;
            }
        }
        let current = self.current_streaks.get(outcome.category);
        let best = self.best_streaks.get_mut(outcome.category);
        *best = (*best).max(current);

        if outcome.player_score > self.best_player_score {
            self.best_player_score = outcome.player_score;
            debug!(score = outcome.player_score, "New best player score");
        }
        if outcome.banker_score > self.best_banker_score {
            self.best_banker_score = outcome.banker_score;
            debug!(score = outcome.banker_score, "New best banker score");
        }

        self.round
    }

    pub fn record_win(&mut self, outcome: &Outcome, strategy: StrategyKind, at: DateTime<Utc>) {
        self.last_win = Some(WinRecord {
            category: outcome.category,
            player_score: outcome.player_score,
            banker_score: outcome.banker_score,
            strategy,
            at,
        });
    }

    /// Share of this day's rounds that went to `category`, in percent
    pub fn share(&self, category: Category) -> u64 {
        crate::report::rate::calc_rate(self.totals.get(category), self.round)
    }

    /// Daily rollover: round counter and category totals only
    pub fn reset_daily(&mut self, today: u32) {
        self.round = 0;
        self.totals = CategoryCounts::default();
        self.last_day_checked = today;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(category: Category, player: u32, banker: u32) -> Outcome {
        Outcome::new(category, player, banker, 0)
    }

    #[test]
    fn test_streaks_break_on_other_categories() {
        let mut tally = GlobalTally::new(1);
        tally.record(&outcome(Category::Player, 8, 4));
        tally.record(&outcome(Category::Player, 9, 5));
        tally.record(&outcome(Category::Tie, 6, 6));
        tally.record(&outcome(Category::Player, 7, 3));

        assert_eq!(tally.round, 4);
        assert_eq!(tally.totals.player, 3);
        assert_eq!(tally.totals.tie, 1);
        assert_eq!(tally.current_streaks.player, 1);
        assert_eq!(tally.current_streaks.tie, 0);
        assert_eq!(tally.best_streaks.player, 2);
        assert_eq!(tally.best_streaks.tie, 1);
    }

    #[test]
    fn test_best_scores_track_each_side() {
        let mut tally = GlobalTally::new(1);
        tally.record(&outcome(Category::Player, 11, 4));
        tally.record(&outcome(Category::Banker, 3, 9));
        assert_eq!(tally.best_player_score, 11);
        assert_eq!(tally.best_banker_score, 9);
    }

    #[test]
    fn test_daily_reset_keeps_records() {
        let mut tally = GlobalTally::new(1);
        tally.record(&outcome(Category::Banker, 2, 12));
        tally.record(&outcome(Category::Banker, 2, 10));
        tally.reset_daily(2);

        assert_eq!(tally.round, 0);
        assert_eq!(tally.totals, CategoryCounts::default());
        assert_eq!(tally.best_banker_score, 12);
        assert_eq!(tally.best_streaks.banker, 2);
        assert_eq!(tally.last_day_checked, 2);
    }

    #[test]
    fn test_share() {
        let mut tally = GlobalTally::new(1);
        assert_eq!(tally.share(Category::Player), 0);
        tally.record(&outcome(Category::Player, 8, 4));
        tally.record(&outcome(Category::Banker, 3, 9));
        tally.record(&outcome(Category::Banker, 3, 9));
        assert_eq!(tally.share(Category::Player), 33);
        assert_eq!(tally.share(Category::Banker), 67);
    }
}
