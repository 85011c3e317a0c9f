//! Offline outcome source backed by a JSON file

use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::Path;
use tracing::{info, warn};

use super::dedup::OutcomeDeduplicator;
use crate::common::errors::Result;
use crate::common::traits::OutcomeSource;
use crate::common::types::{Outcome, RawOutcome};

/// Replays recorded outcomes, oldest first
///
/// Entries pass through the same duplicate filter as a live feed, so two
/// identical consecutive entries yield one outcome. Malformed entries are
/// skipped with a warning.
#[derive(Debug, Clone)]
pub struct ReplaySource {
    pending: VecDeque<RawOutcome>,
    dedup: OutcomeDeduplicator,
}

impl ReplaySource {
    pub fn new(entries: Vec<RawOutcome>) -> Self {
        Self {
            pending: entries.into(),
            dedup: OutcomeDeduplicator::new(),
        }
    }

    /// Load a JSON array of raw outcomes
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let entries: Vec<RawOutcome> = serde_json::from_str(&contents)?;
        info!(path = %path.display(), entries = entries.len(), "Replay file loaded");
        Ok(Self::new(entries))
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

#[async_trait]
impl OutcomeSource for ReplaySource {
    /// Yields the next distinct outcome, or `None` once the file is drained
    async fn poll_for_new_outcome(&mut self) -> Result<Option<Outcome>> {
        while let Some(raw) = self.pending.pop_front() {
            let outcome = match raw.validate() {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(error = %e, "Skipping malformed replay entry");
                    continue;
                }
            };
            if let Some(outcome) = self.dedup.accept(outcome) {
                return Ok(Some(outcome));
            }
        }
        Ok(None)
    }

    fn is_exhausted(&self) -> bool {
        self.pending.is_empty()
    }

    fn source_name(&self) -> &'static str {
        "replay"
    }
}
