//! Pattern-detection strategies
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    PER OUTCOME (sync)                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Outcome pushed onto History                                │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  Strategy.consume(outcome, ctx) → Option<Transition>        │
//! │       │   detector decides when to arm                      │
//! │       │   Cascade tracks G0 / G1 and the counters           │
//! │       ▼                                                     │
//! │  render::transition() → Vec<Notification>                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`Strategy`]: Trait every detector implements
//! - [`Cascade`]: Shared two-attempt state machine
//! - [`Transition`]: Decision produced by one `consume` call
//! - [`StrategyStatus`]: Read-only snapshot for reports and status queries
//! - [`StrategyContext`]: Read-only state provided to strategies

mod alternation;
mod cascade;
mod dynamic_ratio;
mod post_tie;
pub mod render;
mod sequence;
mod traits;
mod types;

pub use alternation::AlternationStrategy;
pub use cascade::{Cascade, RetryTarget, TieWhileArmed};
pub use dynamic_ratio::DynamicRatioStrategy;
pub use post_tie::PostTieStrategy;
pub use sequence::SequenceStrategy;
pub use traits::{BoxedStrategy, Strategy};
pub use types::{
    Attempt,
    Counters,
    Detection,
    Stage,
    StrategyContext,
    StrategyKind,
    StrategyStatus,
    Transition,
};

use crate::config::types::StrategySettings;

/// Build the enabled strategies in declaration order
pub fn build_strategies(settings: &StrategySettings) -> Vec<BoxedStrategy> {
    settings
        .enabled_kinds()
        .into_iter()
        .map(|kind| -> BoxedStrategy {
            match kind {
                StrategyKind::Sequence => Box::new(SequenceStrategy::new(&settings.sequence)),
                StrategyKind::PostTie => Box::new(PostTieStrategy::new(&settings.post_tie)),
                StrategyKind::Alternation => {
                    Box::new(AlternationStrategy::new(&settings.alternation))
                }
                StrategyKind::DynamicRatio => {
                    Box::new(DynamicRatioStrategy::new(&settings.dynamic_ratio))
                }
            }
        })
        .collect()
}
