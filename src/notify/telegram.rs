//! Telegram Bot API notification sink
//!
//! `send` only queues the message; a background worker resolves the route
//! for the message's channel and posts it. Delivery failures are logged
//! and go no further.

use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, error, info, instrument, warn};

use crate::common::channels::{create_notification_channel_with_size, DEFAULT_CHANNEL_SIZE};
use crate::common::errors::{MonitorError, Result};
use crate::common::traits::NotificationSink;
use crate::common::types::Notification;
use crate::config::types::TelegramConfig;

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Thin client for `sendMessage` with per-channel routing
#[derive(Debug, Clone)]
pub struct TelegramApi {
    client: Client,
    config: TelegramConfig,
}

impl TelegramApi {
    pub fn new(config: TelegramConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| MonitorError::Internal(e.to_string()))?;
        Ok(Self { client, config })
    }

    /// Post one notification to the chat its channel maps to
    #[instrument(skip(self, notification), fields(channel = %notification.channel, urgent = notification.urgent))]
    pub async fn deliver(&self, notification: &Notification) -> Result<()> {
        let route = self.config.route_for(notification.channel).ok_or_else(|| {
            MonitorError::Configuration(format!(
                "no Telegram route for channel {}",
                notification.channel
            ))
        })?;

        let url = format!(
            "{}/bot{}/sendMessage",
            self.config.api_url.trim_end_matches('/'),
            route.bot_token
        );
        let body = SendMessageRequest {
            chat_id: route.chat_for(notification.urgent),
            text: &notification.text,
        };

        let response = self.client.post(&url).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(MonitorError::InvalidResponse(format!(
                "Telegram returned status {}: {}",
                status, body
            )));
        }

        debug!(chat_id = body.chat_id, "Telegram message sent");
        Ok(())
    }
}

/// Fire-and-forget Telegram sink backed by a bounded queue
pub struct TelegramNotifier {
    /// Channel sender for queuing outbound notifications
    sender: mpsc::Sender<Notification>,
}

impl TelegramNotifier {
    /// Create the notifier and spawn its delivery worker
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(config: TelegramConfig) -> Result<Self> {
        Self::with_capacity(config, DEFAULT_CHANNEL_SIZE)
    }

    pub fn with_capacity(config: TelegramConfig, capacity: usize) -> Result<Self> {
        let api = TelegramApi::new(config)?;
        let (sender, receiver) = create_notification_channel_with_size(capacity);
        tokio::spawn(telegram_worker(api, receiver));
        Ok(Self { sender })
    }
}

impl NotificationSink for TelegramNotifier {
    fn send(&self, notification: Notification) {
        match self.sender.try_send(notification) {
            Ok(()) => {}
            Err(TrySendError::Full(dropped)) => {
                warn!(channel = %dropped.channel, "Telegram queue full, dropping notification");
            }
            Err(TrySendError::Closed(_)) => {
                warn!("Telegram notifier channel closed");
            }
        }
    }
}

/// Background worker that sends Telegram messages
async fn telegram_worker(api: TelegramApi, mut receiver: mpsc::Receiver<Notification>) {
    info!("Telegram notifier started");

    while let Some(notification) = receiver.recv().await {
        if let Err(e) = api.deliver(&notification).await {
            error!(error = %e, channel = %notification.channel, "Failed to send Telegram message");
        }
    }

    warn!("Telegram notifier worker shutting down");
}
