//! BacBoSignals Library
//!
//! Pattern-detection engine for a live Bac Bo results stream: four
//! strategies track a two-attempt (G0/G1) prediction cascade, a coordinator
//! keeps global and per-block statistics, and periodic reports go out
//! through a notification sink.

pub mod common;
pub mod config;
pub mod engine;
pub mod feed;
pub mod notify;
pub mod report;
pub mod strategy;

// Re-export commonly used types
pub use common::errors::{MonitorError, Result};
pub use common::traits::{BoxedSink, NotificationSink, OutcomeSource};
pub use common::types::{Category, Channel, Notification, Outcome, RawOutcome};
pub use config::types::AppConfig;
pub use engine::{Coordinator, History, MonitorStatus};
pub use feed::{HttpOutcomeSource, OutcomeDeduplicator, ReplaySource};
pub use notify::{LogNotifier, TelegramNotifier};

// Strategy types
pub use strategy::{
    build_strategies, AlternationStrategy, BoxedStrategy, Counters, DynamicRatioStrategy,
    PostTieStrategy, SequenceStrategy, Stage, Strategy, StrategyContext, StrategyKind,
    StrategyStatus, Transition,
};
