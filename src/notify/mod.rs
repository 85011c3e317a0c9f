//! Notification sinks

pub mod log;
pub mod telegram;

pub use self::log::LogNotifier;
pub use self::telegram::{TelegramApi, TelegramNotifier};

use crate::common::errors::Result;
use crate::common::traits::BoxedSink;
use crate::config::types::TelegramConfig;

/// Telegram when a general route is configured, the log sink otherwise
pub fn build_sink(config: &TelegramConfig) -> Result<BoxedSink> {
    if config.is_enabled() {
        Ok(Box::new(TelegramNotifier::new(config.clone())?))
    } else {
        Ok(Box::new(LogNotifier))
    }
}
