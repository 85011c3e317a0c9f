//! Outcome processing engine
//!
//! The [`Coordinator`] owns the shared [`History`], the [`GlobalTally`] and
//! the [`BlockAggregator`], and drives every strategy once per outcome.

pub mod blocks;
pub mod coordinator;
pub mod history;
pub mod tally;

pub use blocks::{Block, BlockAggregator, BlockSummary, BlockTally};
pub use coordinator::{Coordinator, MonitorStatus, ReportSchedule};
pub use history::History;
pub use tally::{CategoryCounts, GlobalTally, WinRecord};
