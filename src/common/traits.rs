//! Trait definitions for the collaborators around the engine

use async_trait::async_trait;

use super::errors::Result;
use super::types::{Notification, Outcome};

/// Source of round outcomes (live feed, replay file, ...)
///
/// Implementations must deduplicate: a call returns `None` when nothing new
/// arrived since the previous call, and the same outcome is never delivered
/// twice.
#[async_trait]
pub trait OutcomeSource: Send {
    /// Poll the source for the next new outcome, if any
    async fn poll_for_new_outcome(&mut self) -> Result<Option<Outcome>>;

    /// Whether the source can never produce another outcome
    ///
    /// Live feeds are never exhausted. Default implementation returns false.
    fn is_exhausted(&self) -> bool {
        false
    }

    /// Name of the source, for logging
    fn source_name(&self) -> &'static str;
}

/// Destination for rendered notifications
///
/// `send` must return quickly and never fail from the caller's point of
/// view. Delivery (and delivery errors) happen out of band, so nothing a
/// sink does can affect strategy or coordinator state.
pub trait NotificationSink: Send + Sync {
    fn send(&self, notification: Notification);

    /// Send a batch in order
    fn send_all(&self, notifications: Vec<Notification>) {
        for notification in notifications {
            self.send(notification);
        }
    }
}

/// Boxed sink for dynamic dispatch
pub type BoxedSink = Box<dyn NotificationSink>;
