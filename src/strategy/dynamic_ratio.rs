//! Dynamic ratio detector: bets on mean reversion after an imbalance

use rust_decimal::Decimal;
use tracing::debug;

use super::cascade::{Cascade, RetryTarget, TieWhileArmed};
use super::traits::Strategy;
use super::types::{Detection, StrategyContext, StrategyKind, StrategyStatus, Transition};
use crate::common::types::{Category, Outcome};
use crate::config::types::DynamicRatioSettings;
use crate::engine::history::History;

/// Arms when one side holds at least `imbalance_threshold` percent of the
/// last `window_size` non-tie outcomes, predicting the minority side.
///
/// Nothing is evaluated until the history holds `window_size` entries and
/// at least `min_samples` of the window are non-ties.
#[derive(Debug, Clone)]
pub struct DynamicRatioStrategy {
    cascade: Cascade,
    window_size: usize,
    min_samples: usize,
    threshold: Decimal,
}

impl DynamicRatioStrategy {
    pub fn new(settings: &DynamicRatioSettings) -> Self {
        Self {
            cascade: Cascade::new(
                StrategyKind::DynamicRatio,
                RetryTarget::Unchanged,
                TieWhileArmed::WinAndDisarm,
                settings.escalate_after,
            ),
            window_size: settings.window_size,
            min_samples: settings.min_samples,
            threshold: settings.imbalance_threshold,
        }
    }

    fn detect(&self, history: &History) -> Option<Detection> {
        if history.len() < self.window_size {
            return None;
        }

        let window = history.recent_non_ties(self.window_size);
        let samples = window.len();
        if samples == 0 || samples < self.min_samples {
            return None;
        }

        let players = window
            .iter()
            .filter(|o| o.category == Category::Player)
            .count();
        let bankers = samples - players;

        let total = Decimal::from(samples as u64);
        let hundred = Decimal::from(100u32);
        let player_pct = Decimal::from(players as u64) * hundred / total;
        let banker_pct = Decimal::from(bankers as u64) * hundred / total;

        debug!(samples, %player_pct, %banker_pct, threshold = %self.threshold, "Ratio evaluated");

        let (majority, majority_pct, minority_pct) = if player_pct >= self.threshold {
            (Category::Player, player_pct, banker_pct)
        } else if banker_pct >= self.threshold {
            (Category::Banker, banker_pct, player_pct)
        } else {
            return None;
        };

        Some(Detection::Imbalance {
            samples,
            majority,
            majority_pct,
            minority_pct,
        })
    }
}

impl Default for DynamicRatioStrategy {
    fn default() -> Self {
        Self::new(&DynamicRatioSettings::default())
    }
}

impl Strategy for DynamicRatioStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::DynamicRatio
    }

    fn consume(&mut self, outcome: &Outcome, ctx: &StrategyContext<'_>) -> Option<Transition> {
        if outcome.category.is_tie() {
            return self.cascade.on_tie(outcome);
        }
        if self.cascade.is_armed() {
            return self.cascade.resolve(outcome);
        }

        let detection = self.detect(ctx.history)?;
        let target = match &detection {
            Detection::Imbalance { majority, .. } => majority.opposite(),
            _ => return None,
        };
        self.cascade.arm(target);
        Some(Transition::Armed { target, detection })
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
    use rust_decimal_macros::dec;

    fn history_of(seq: &[Category]) -> History {
        History::from_chronological(
            seq.iter()
                .enumerate()
                .map(|(i, &c)| Outcome::new(c, 5, 3, i as u64)),
        )
    }

    fn settings(threshold: Decimal) -> DynamicRatioSettings {
        DynamicRatioSettings {
            imbalance_threshold: threshold,
            ..DynamicRatioSettings::default()
        }
    }

    #[test]
    fn test_seventy_percent_arms_on_minority() {
        let mut seq = vec![Category::Banker; 6];
        seq.extend(vec![Category::Player; 14]);
        let history = history_of(&seq);
        let latest = *history.latest().unwrap();

        let mut s = DynamicRatioStrategy::default();
        let t = s.consume(&latest, &StrategyContext::new(&history)).unwrap();
        match t {
            Transition::Armed {
                target,
                detection:
                    Detection::Imbalance {
                        samples,
                        majority,
                        majority_pct,
                        minority_pct,
                    },
            } => {
                assert_eq!(target, Category::Banker);
                assert_eq!(majority, Category::Player);
                assert_eq!(samples, 20);
                assert_eq!(majority_pct, dec!(70));
                assert_eq!(minority_pct, dec!(30));
            }
            other => panic!("unexpected transition {:?}", other),
        }
        assert!(s.status().armed);
    }

    #[test]
    fn test_balanced_window_does_not_arm() {
        let seq: Vec<Category> = (0..20)
            .map(|i| if i % 2 == 0 { Category::Player } else { Category::Banker })
            .collect();
        let history = history_of(&seq);
        let latest = *history.latest().unwrap();

        let mut s = DynamicRatioStrategy::default();
        assert!(s.consume(&latest, &StrategyContext::new(&history)).is_none());
    }

    #[test]
    fn test_short_history_is_not_evaluated() {
        let history = history_of(&[Category::Player; 19]);
        let latest = *history.latest().unwrap();

        let mut s = DynamicRatioStrategy::default();
        assert!(s.consume(&latest, &StrategyContext::new(&history)).is_none());
    }

    #[test]
    fn test_too_few_non_tie_samples() {
        let mut seq = vec![Category::Tie; 11];
        seq.extend(vec![Category::Player; 9]);
        let history = history_of(&seq);
        let latest = *history.latest().unwrap();

        let mut s = DynamicRatioStrategy::default();
        assert!(s.consume(&latest, &StrategyContext::new(&history)).is_none());
    }

    #[test]
    fn test_threshold_is_inclusive() {
        // 13 of 20 = 65%
        let mut seq = vec![Category::Player; 7];
        seq.extend(vec![Category::Banker; 13]);
        let history = history_of(&seq);
        let latest = *history.latest().unwrap();

        let mut s = DynamicRatioStrategy::new(&settings(dec!(65)));
        let t = s.consume(&latest, &StrategyContext::new(&history));
        assert!(matches!(t, Some(Transition::Armed { target: Category::Player, .. })));

        let mut strict = DynamicRatioStrategy::new(&settings(dec!(66)));
        assert!(strict.consume(&latest, &StrategyContext::new(&history)).is_none());
    }

    #[test]
    fn test_armed_resolves_with_fixed_target() {
        let mut seq = vec![Category::Banker; 6];
        seq.extend(vec![Category::Player; 14]);
        let mut history = history_of(&seq);
        let latest = *history.latest().unwrap();
        let mut s = DynamicRatioStrategy::default();
        s.consume(&latest, &StrategyContext::new(&history));

        let miss = Outcome::new(Category::Player, 9, 1, 21);
        history.push(miss);
        let t = s.consume(&miss, &StrategyContext::new(&history));
        assert!(matches!(
            t,
            Some(Transition::MovedToRetry {
                retry_target: Category::Banker,
                ..
            })
        ));
    }
}
