//! Fixed-size accounting blocks
//!
//! Each block records, per strategy, how many rounds produced a first-attempt
//! win, a retry win, a loss or a tie win. Counts are derived from changes in
//! the strategy's counters during the block, never copied from lifetime
//! totals.

use std::collections::{BTreeMap, VecDeque};

use serde::Serialize;
use tracing::info;

use crate::strategy::{Counters, StrategyKind};

/// One strategy's changes within a block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BlockTally {
    pub first_attempt_wins: u64,
    pub retry_wins: u64,
    pub losses: u64,
    pub tie_wins: u64,
}

impl BlockTally {
    /// Bump each field whose counter grew between `before` and `after`
    pub fn observe(&mut self, before: &Counters, after: &Counters) -> bool {
        let mut changed = false;
        if after.wins_first_attempt > before.wins_first_attempt {
            self.first_attempt_wins += 1;
            changed = true;
        }
        if after.wins_retry > before.wins_retry {
            self.retry_wins += 1;
            changed = true;
        }
        if after.total_losses > before.total_losses {
            self.losses += 1;
            changed = true;
        }
        if after.tie_wins > before.tie_wins {
            self.tie_wins += 1;
            changed = true;
        }
        changed
    }

    pub fn wins(&self) -> u64 {
        self.first_attempt_wins + self.retry_wins
    }

    pub fn wins_with_ties(&self) -> u64 {
        self.wins() + self.tie_wins
    }

    pub fn resolved(&self) -> u64 {
        self.wins_with_ties() + self.losses
    }

    pub fn merge(&mut self, other: &BlockTally) {
        self.first_attempt_wins += other.first_attempt_wins;
        self.retry_wins += other.retry_wins;
        self.losses += other.losses;
        self.tie_wins += other.tie_wins;
    }
}

/// A run of `block_size` rounds, `(start_round, end_round]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    pub start_round: u64,
    /// Set when the block is sealed
    pub end_round: Option<u64>,
    pub tallies: BTreeMap<StrategyKind, BlockTally>,
}

impl Block {
    /// Open a block with an empty tally for each registered strategy
    pub fn open(start_round: u64, kinds: &[StrategyKind]) -> Self {
        Self {
            start_round,
            end_round: None,
            tallies: kinds
                .iter()
                .map(|&kind| (kind, BlockTally::default()))
                .collect(),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.end_round.is_some()
    }

    pub fn tally(&self, kind: StrategyKind) -> BlockTally {
        self.tallies.get(&kind).copied().unwrap_or_default()
    }

    /// Strategies tracked by this block, in declaration order
    pub fn kinds(&self) -> impl Iterator<Item = StrategyKind> + '_ {
        self.tallies.keys().copied()
    }

    /// Rounds covered so far, as `first..=last` for display
    pub fn span(&self) -> (u64, u64) {
        (self.start_round + 1, self.end_round.unwrap_or(self.start_round))
    }
}

/// Compact view of the open block for status snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockSummary {
    pub start_round: u64,
    pub tallies: BTreeMap<StrategyKind, BlockTally>,
    pub closed_blocks: usize,
}

/// Owns the open block and the bounded list of sealed blocks
#[derive(Debug, Clone)]
pub struct BlockAggregator {
    current: Block,
    closed: VecDeque<Block>,
    max_closed: usize,
    kinds: Vec<StrategyKind>,
}

impl BlockAggregator {
    pub fn new(max_closed: usize, kinds: Vec<StrategyKind>) -> Self {
        Self {
            current: Block::open(0, &kinds),
            closed: VecDeque::new(),
            max_closed: max_closed.max(1),
            kinds,
        }
    }

    pub fn current(&self) -> &Block {
        &self.current
    }

    /// Record counter changes observed for one strategy this round
    pub fn observe(&mut self, kind: StrategyKind, before: &Counters, after: &Counters) -> bool {
        self.current
            .tallies
            .entry(kind)
            .or_default()
            .observe(before, after)
    }

    /// Seal the open block at `round` and open a fresh one
    pub fn close(&mut self, round: u64) -> Block {
        let fresh = Block::open(round, &self.kinds);
        let mut sealed = std::mem::replace(&mut self.current, fresh);
        sealed.end_round = Some(round);

        info!(
            start = sealed.start_round,
            end = round,
            retained = self.closed.len() + 1,
            "Block sealed"
        );

        self.closed.push_back(sealed.clone());
        while self.closed.len() > self.max_closed {
            self.closed.pop_front();
        }
        sealed
    }

    /// Up to `n` most recent sealed blocks, oldest first
    pub fn last(&self, n: usize) -> Vec<&Block> {
        let skip = self.closed.len().saturating_sub(n);
        self.closed.iter().skip(skip).collect()
    }

    pub fn closed_len(&self) -> usize {
        self.closed.len()
    }

    /// Drop all history and start over from round zero
    pub fn reset(&mut self) {
        self.current = Block::open(0, &self.kinds);
        self.closed.clear();
    }

    pub fn summary(&self) -> BlockSummary {
        BlockSummary {
            start_round: self.current.start_round,
            tallies: self.current.tallies.clone(),
            closed_blocks: self.closed.len(),
        }
    }
}
