//! Per-outcome orchestration
//!
//! One outcome is processed completely (tally, every strategy, block
//! accounting, scheduled reports) before the next is accepted. The
//! coordinator does no I/O; it returns the notifications to deliver.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, info};

use super::blocks::{BlockAggregator, BlockSummary};
use super::history::History;
use super::tally::GlobalTally;
use crate::common::types::{Notification, Outcome};
use crate::config::types::{AppConfig, EngineSettings};
use crate::report::render as report;
use crate::strategy::{self, render, BoxedStrategy, StrategyContext, StrategyStatus};

/// Round-count triggers for periodic reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSchedule {
    pub block_size: u64,
    pub summary_every: u64,
    pub detailed_every: u64,
    pub report_blocks: usize,
}

impl ReportSchedule {
    pub fn from_settings(settings: &EngineSettings) -> Self {
        Self {
            block_size: settings.block_size,
            summary_every: settings.summary_every,
            detailed_every: settings.detailed_every,
            report_blocks: settings.report_blocks,
        }
    }

    fn every(n: u64, round: u64) -> bool {
        n > 0 && round > 0 && round % n == 0
    }

    pub fn closes_block(&self, round: u64) -> bool {
        Self::every(self.block_size, round)
    }

    pub fn summary_due(&self, round: u64) -> bool {
        Self::every(self.summary_every, round)
    }

    pub fn detailed_due(&self, round: u64) -> bool {
        Self::every(self.detailed_every, round)
    }
}

impl Default for ReportSchedule {
    fn default() -> Self {
        Self::from_settings(&EngineSettings::default())
    }
}

/// Serializable snapshot of the whole engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonitorStatus {
    pub round: u64,
    pub strategies: Vec<String>,
    pub statuses: Vec<StrategyStatus>,
    pub tally: GlobalTally,
    pub open_block: BlockSummary,
    pub history_len: usize,
    pub day: NaiveDate,
}

/// Owns the strategies and all shared state
pub struct Coordinator {
    strategies: Vec<BoxedStrategy>,
    history: History,
    tally: GlobalTally,
    blocks: BlockAggregator,
    schedule: ReportSchedule,
    day: NaiveDate,
}

impl Coordinator {
    pub fn new(strategies: Vec<BoxedStrategy>, settings: &EngineSettings, today: NaiveDate) -> Self {
        let kinds = strategies.iter().map(|s| s.kind()).collect();
        Self {
            strategies,
            history: History::with_capacity(settings.history_capacity),
            tally: GlobalTally::new(today.day()),
            blocks: BlockAggregator::new(settings.max_closed_blocks, kinds),
            schedule: ReportSchedule::from_settings(settings),
            day: today,
        }
    }

    /// Coordinator with the strategies enabled in the configuration
    pub fn from_config(config: &AppConfig, today: NaiveDate) -> Self {
        Self::new(
            strategy::build_strategies(&config.strategies),
            &config.engine,
            today,
        )
    }

    /// Start-of-monitoring messages: one per strategy plus a general one
    pub fn start(&self) -> Vec<Notification> {
        info!(strategies = ?self.strategy_names(), "Monitoring started");
        let mut out: Vec<Notification> = self.strategies.iter().map(|s| s.announce_start()).collect();
        out.push(Notification::general(
            "🎲 Bac Bo monitor started! Watching results and sending general reports...",
        ));
        out
    }

    /// Process one outcome stamped with the current time
    pub fn consume(&mut self, outcome: Outcome) -> Vec<Notification> {
        self.consume_at(outcome, Utc::now())
    }

    /// Process one outcome; `now` stamps any win recorded this round
    pub fn consume_at(&mut self, outcome: Outcome, now: DateTime<Utc>) -> Vec<Notification> {
        let round = self.tally.record(&outcome);
        self.history.push(outcome);
        debug!(
            round,
            category = %outcome.category,
            player = outcome.player_score,
            banker = outcome.banker_score,
            pattern = %self.history.pattern(10),
            "Processing outcome"
        );

        let mut out = Vec::new();
        let ctx = StrategyContext::new(&self.history);

        for strategy in self.strategies.iter_mut() {
            let kind = strategy.kind();
            let before = strategy.status().counters;
            let transition = strategy.consume(&outcome, &ctx);
            let after = strategy.status().counters;

            self.blocks.observe(kind, &before, &after);

            if let Some(transition) = transition {
                if transition.is_win() {
                    self.tally.record_win(&outcome, kind, now);
                }
                out.extend(render::transition(kind, &transition, &after));
            }
        }

        out.extend(self.scheduled_reports(round));
        out
    }

    fn scheduled_reports(&mut self, round: u64) -> Vec<Notification> {
        let mut out = Vec::new();
        let closes_block = self.schedule.closes_block(round);
        let detailed = self.schedule.detailed_due(round);

        if closes_block {
            let sealed = self.blocks.close(round);
            for strategy in &self.strategies {
                out.push(report::block_report(&sealed, strategy.kind()));
            }
            out.push(report::block_overview(&sealed));
        }

        if detailed {
            let recent = self.blocks.last(self.schedule.report_blocks);
            if recent.is_empty() {
                debug!(round, "No sealed blocks for the multi-block report");
            } else {
                for strategy in &self.strategies {
                    out.push(report::multi_block_report(&recent, strategy.kind()));
                }
                out.push(report::multi_block_overview(&recent));
            }
        }

        let statuses = self.statuses();

        if closes_block {
            out.push(report::ranking_report(round, &statuses, &self.tally));
        }

        if self.schedule.summary_due(round) {
            for status in &statuses {
                out.push(report::summary_report(status, &self.tally));
            }
        }

        if detailed {
            out.push(report::detailed_report(round, &statuses, &self.tally));
        }

        if !out.is_empty() {
            info!(round, reports = out.len(), "Scheduled reports rendered");
        }
        out
    }

    /// Daily rollover check
    ///
    /// When the day of month differs from the last one checked, renders the
    /// daily report for the day that ended, then resets strategy counters,
    /// the daily tally and the block history.
    pub fn roll_day(&mut self, today: NaiveDate) -> Vec<Notification> {
        if today.day() == self.tally.last_day_checked {
            return Vec::new();
        }

        info!(from = %self.day, to = %today, "Day changed, sending daily report and resetting counters");

        let statuses = self.statuses();
        let daily = report::daily_report(self.day, &statuses, &self.tally);

        for strategy in self.strategies.iter_mut() {
            strategy.reset_counters();
        }
        self.tally.reset_daily(today.day());
        self.blocks.reset();
        self.day = today;

        vec![daily]
    }

    pub fn strategy_names(&self) -> Vec<String> {
        self.strategies.iter().map(|s| s.name().to_string()).collect()
    }

    pub fn statuses(&self) -> Vec<StrategyStatus> {
        self.strategies.iter().map(|s| s.status()).collect()
    }

    pub fn round(&self) -> u64 {
        self.tally.round
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn tally(&self) -> &GlobalTally {
        &self.tally
    }

    pub fn blocks(&self) -> &BlockAggregator {
        &self.blocks
    }

    pub fn status(&self) -> MonitorStatus {
        MonitorStatus {
            round: self.tally.round,
            strategies: self.strategy_names(),
            statuses: self.statuses(),
            tally: self.tally.clone(),
            open_block: self.blocks.summary(),
            history_len: self.history.len(),
            day: self.day,
        }
    }
}
