//! Success-rate arithmetic and strategy ranking

use crate::strategy::{Stage, StrategyKind, StrategyStatus};

/// Percentage `wins / total`, rounded half up to a whole number
///
/// A zero total yields 0.
pub fn calc_rate(wins: u64, total: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    (wins.saturating_mul(200) + total) / (total * 2)
}

/// Lifetime success rate, tie wins included
pub fn success_rate(status: &StrategyStatus) -> u64 {
    calc_rate(status.counters.wins_with_ties(), status.counters.resolved())
}

/// First-attempt rate; a prediction currently in retry counts as a G0 miss
pub fn first_attempt_rate(status: &StrategyStatus) -> u64 {
    let pending_miss = u64::from(status.stage == Stage::Retry);
    let wins = status.counters.wins_first_attempt;
    calc_rate(wins, wins + pending_miss)
}

/// Retry rate over resolved retries
pub fn retry_rate(status: &StrategyStatus) -> u64 {
    let c = &status.counters;
    calc_rate(c.wins_retry, c.wins_retry + c.losses_retry)
}

/// One row of the ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ranked {
    pub kind: StrategyKind,
    pub rate: u64,
}

/// Strategies ordered by success rate, best first
///
/// Equal rates keep declaration order.
pub fn rank_strategies(statuses: &[StrategyStatus]) -> Vec<Ranked> {
    let mut ranked: Vec<Ranked> = statuses
        .iter()
        .map(|s| Ranked {
            kind: s.kind,
            rate: success_rate(s),
        })
        .collect();
    ranked.sort_by(|a, b| b.rate.cmp(&a.rate).then(a.kind.cmp(&b.kind)));
    ranked
}
