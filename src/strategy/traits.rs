use crate::common::types::{Notification, Outcome};
use crate::strategy::render;
use crate::strategy::types::{StrategyContext, StrategyKind, StrategyStatus, Transition};

/// Core strategy trait
///
/// Strategies receive every outcome after it has been added to the shared
/// history and decide whether a pattern implies a prediction, then track
/// that prediction through the two-attempt cascade.
///
/// # Implementation Notes
///
/// - `consume` is pure computation: no I/O, no blocking
/// - Internal state (cascade phase, counters) is owned by the strategy
/// - History comes from `StrategyContext` (read-only)
/// - Rendering is separate: `consume` returns a [`Transition`], the
///   coordinator turns it into text
///
/// # Example
///
/// ```ignore
/// struct AlwaysPlayer { cascade: Cascade }
///
/// impl Strategy for AlwaysPlayer {
///     fn kind(&self) -> StrategyKind { StrategyKind::Sequence }
///
///     fn consume(&mut self, outcome: &Outcome, ctx: &StrategyContext) -> Option<Transition> {
///         if outcome.category.is_tie() {
///             return self.cascade.on_tie(outcome);
///         }
///         self.cascade.resolve(outcome)
///     }
///
///     fn status(&self) -> StrategyStatus { self.cascade.status() }
///     fn reset_counters(&mut self) { self.cascade.reset_counters() }
/// }
/// ```
pub trait Strategy: Send + Sync {
    /// Which variant this is
    fn kind(&self) -> StrategyKind;

    /// Unique name of this strategy
    fn name(&self) -> &str {
        self.kind().display_name()
    }

    /// Called once per outcome, after it was pushed onto the history
    ///
    /// # Returns
    /// * `None` - nothing changed
    /// * `Some(transition)` - the state change this outcome caused
    fn consume(&mut self, outcome: &Outcome, ctx: &StrategyContext<'_>) -> Option<Transition>;

    /// Snapshot of the current state and counters
    fn status(&self) -> StrategyStatus;

    /// Daily rollover: zero the counters, keep the all-time best streak
    fn reset_counters(&mut self);

    /// Message announcing that this strategy is being monitored
    fn announce_start(&self) -> Notification {
        render::start_announcement(self.kind())
    }
}

/// Boxed strategy for dynamic dispatch
pub type BoxedStrategy = Box<dyn Strategy>;
