//! Channel type definitions for inter-task communication

use tokio::sync::mpsc;

use super::types::{Notification, Outcome};

/// Default channel buffer size
pub const DEFAULT_CHANNEL_SIZE: usize = 1000;

/// Create a new outcome channel with the default buffer size
///
/// The receiving half is the single consumer that feeds the coordinator,
/// which serializes outcome processing.
pub fn create_outcome_channel() -> (mpsc::Sender<Outcome>, mpsc::Receiver<Outcome>) {
    mpsc::channel(DEFAULT_CHANNEL_SIZE)
}

/// Create a new notification channel with a custom buffer size
pub fn create_notification_channel_with_size(
    size: usize,
) -> (mpsc::Sender<Notification>, mpsc::Receiver<Notification>) {
    mpsc::channel(size)
}
