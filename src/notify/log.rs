//! Tracing-only sink, used when no Telegram route is configured

use tracing::{info, warn};

use crate::common::traits::NotificationSink;
use crate::common::types::Notification;

/// Writes every notification to the log instead of delivering it
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl NotificationSink for LogNotifier {
    fn send(&self, notification: Notification) {
        if notification.urgent {
            warn!(channel = %notification.channel, text = %notification.text, "Urgent notification");
        } else {
            info!(channel = %notification.channel, text = %notification.text, "Notification");
        }
    }
}
