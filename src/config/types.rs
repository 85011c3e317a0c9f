//! Configuration types

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::common::types::Channel;
use crate::strategy::StrategyKind;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Outcome feed configuration
    #[serde(default)]
    pub feed: FeedConfig,
    /// Telegram delivery configuration
    #[serde(default)]
    pub telegram: TelegramConfig,
    /// Coordinator scheduling and retention
    #[serde(default)]
    pub engine: EngineSettings,
    /// Per-strategy tuning
    #[serde(default)]
    pub strategies: StrategySettings,
    /// General application settings
    #[serde(default)]
    pub settings: AppSettings,
}

/// Outcome feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// URL of the JSON results endpoint
    #[serde(default)]
    pub url: Option<String>,
    /// Delay between polls in milliseconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    /// Delay between day-change checks in milliseconds
    #[serde(default = "default_day_check_interval")]
    pub day_check_interval_ms: u64,
    /// Wait before the first poll in milliseconds
    #[serde(default = "default_startup_delay")]
    pub startup_delay_ms: u64,
    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: None,
            poll_interval_ms: default_poll_interval(),
            day_check_interval_ms: default_day_check_interval(),
            startup_delay_ms: default_startup_delay(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_poll_interval() -> u64 {
    8000
}

fn default_day_check_interval() -> u64 {
    60_000
}

fn default_startup_delay() -> u64 {
    5000
}

fn default_request_timeout() -> u64 {
    30
}

/// Bot token and chat targets for one channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteConfig {
    pub bot_token: String,
    pub chat_id: String,
    /// Secondary chat for urgent messages (loss-streak alerts)
    #[serde(default)]
    pub urgent_chat_id: Option<String>,
}

impl RouteConfig {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            urgent_chat_id: None,
        }
    }

    pub fn with_urgent_chat(mut self, chat_id: impl Into<String>) -> Self {
        self.urgent_chat_id = Some(chat_id.into());
        self
    }

    /// Chat id for a message, honouring the urgent flag when possible
    pub fn chat_for(&self, urgent: bool) -> &str {
        match (&self.urgent_chat_id, urgent) {
            (Some(urgent_chat), true) => urgent_chat,
            _ => &self.chat_id,
        }
    }
}

/// Telegram delivery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot API base URL
    #[serde(default = "default_telegram_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub general: Option<RouteConfig>,
    #[serde(default)]
    pub sequence: Option<RouteConfig>,
    #[serde(default)]
    pub post_tie: Option<RouteConfig>,
    #[serde(default)]
    pub alternation: Option<RouteConfig>,
    #[serde(default)]
    pub dynamic_ratio: Option<RouteConfig>,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_url: default_telegram_api_url(),
            general: None,
            sequence: None,
            post_tie: None,
            alternation: None,
            dynamic_ratio: None,
        }
    }
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}

impl TelegramConfig {
    /// Whether any delivery target is configured
    pub fn is_enabled(&self) -> bool {
        self.general.is_some()
    }

    /// Route for a channel, falling back to the general route
    pub fn route_for(&self, channel: Channel) -> Option<&RouteConfig> {
        let specific = match channel {
            Channel::General => None,
            Channel::Sequence => self.sequence.as_ref(),
            Channel::PostTie => self.post_tie.as_ref(),
            Channel::Alternation => self.alternation.as_ref(),
            Channel::DynamicRatio => self.dynamic_ratio.as_ref(),
        };
        specific.or(self.general.as_ref())
    }

    pub fn route_mut(&mut self, channel: Channel) -> &mut Option<RouteConfig> {
        match channel {
            Channel::General => &mut self.general,
            Channel::Sequence => &mut self.sequence,
            Channel::PostTie => &mut self.post_tie,
            Channel::Alternation => &mut self.alternation,
            Channel::DynamicRatio => &mut self.dynamic_ratio,
        }
    }
}

/// Coordinator scheduling and retention
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Number of outcomes kept in the shared history
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    /// Rounds per accounting block
    #[serde(default = "default_block_size")]
    pub block_size: u64,
    /// Rounds between per-strategy summaries
    #[serde(default = "default_summary_every")]
    pub summary_every: u64,
    /// Rounds between detailed and multi-block reports
    #[serde(default = "default_detailed_every")]
    pub detailed_every: u64,
    /// Closed blocks covered by the multi-block report
    #[serde(default = "default_report_blocks")]
    pub report_blocks: usize,
    /// Closed blocks retained before the oldest is dropped
    #[serde(default = "default_max_closed_blocks")]
    pub max_closed_blocks: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            history_capacity: default_history_capacity(),
            block_size: default_block_size(),
            summary_every: default_summary_every(),
            detailed_every: default_detailed_every(),
            report_blocks: default_report_blocks(),
            max_closed_blocks: default_max_closed_blocks(),
        }
    }
}

fn default_history_capacity() -> usize {
    50
}

fn default_block_size() -> u64 {
    50
}

fn default_summary_every() -> u64 {
    100
}

fn default_detailed_every() -> u64 {
    200
}

fn default_report_blocks() -> usize {
    4
}

fn default_max_closed_blocks() -> usize {
    96
}

/// Per-strategy tuning
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategySettings {
    #[serde(default)]
    pub sequence: SequenceSettings,
    #[serde(default)]
    pub post_tie: PostTieSettings,
    #[serde(default)]
    pub alternation: AlternationSettings,
    #[serde(default)]
    pub dynamic_ratio: DynamicRatioSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceSettings {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Identical non-tie outcomes needed to arm
    #[serde(default = "default_run_length")]
    pub run_length: usize,
    /// Consecutive retry losses before the urgent channel is used
    #[serde(default = "default_escalate_after")]
    pub escalate_after: u32,
}

impl Default for SequenceSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            run_length: default_run_length(),
            escalate_after: default_escalate_after(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostTieSettings {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_post_tie_escalate_after")]
    pub escalate_after: u32,
}

impl Default for PostTieSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            escalate_after: default_post_tie_escalate_after(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternationSettings {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_escalate_after")]
    pub escalate_after: u32,
}

impl Default for AlternationSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            escalate_after: default_escalate_after(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicRatioSettings {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Non-tie outcomes considered, most recent first
    #[serde(default = "default_window_size")]
    pub window_size: usize,
    /// Minimum non-tie samples before the ratio is evaluated
    #[serde(default = "default_min_samples")]
    pub min_samples: usize,
    /// Majority share (percent) that counts as an imbalance
    #[serde(default = "default_imbalance_threshold")]
    pub imbalance_threshold: Decimal,
    #[serde(default = "default_escalate_after")]
    pub escalate_after: u32,
}

impl Default for DynamicRatioSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            window_size: default_window_size(),
            min_samples: default_min_samples(),
            imbalance_threshold: default_imbalance_threshold(),
            escalate_after: default_escalate_after(),
        }
    }
}

impl StrategySettings {
    pub fn is_enabled(&self, kind: StrategyKind) -> bool {
        match kind {
            StrategyKind::Sequence => self.sequence.enabled,
            StrategyKind::PostTie => self.post_tie.enabled,
            StrategyKind::Alternation => self.alternation.enabled,
            StrategyKind::DynamicRatio => self.dynamic_ratio.enabled,
        }
    }

    /// Enabled strategies in declaration order
    pub fn enabled_kinds(&self) -> Vec<StrategyKind> {
        StrategyKind::ALL
            .into_iter()
            .filter(|&kind| self.is_enabled(kind))
            .collect()
    }

    /// Enable exactly the given strategies
    pub fn enable_only(&mut self, kinds: &[StrategyKind]) {
        self.sequence.enabled = kinds.contains(&StrategyKind::Sequence);
        self.post_tie.enabled = kinds.contains(&StrategyKind::PostTie);
        self.alternation.enabled = kinds.contains(&StrategyKind::Alternation);
        self.dynamic_ratio.enabled = kinds.contains(&StrategyKind::DynamicRatio);
    }
}

fn default_enabled() -> bool {
    true
}

fn default_run_length() -> usize {
    4
}

fn default_escalate_after() -> u32 {
    2
}

fn default_post_tie_escalate_after() -> u32 {
    1
}

fn default_window_size() -> usize {
    20
}

fn default_min_samples() -> usize {
    10
}

fn default_imbalance_threshold() -> Decimal {
    dec!(65)
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl AppSettings {
    /// Level to log at: the command-line value wins over the configured one
    pub fn effective_log_level<'a>(&'a self, cli: Option<&'a str>) -> &'a str {
        cli.unwrap_or(&self.log_level)
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.feed.poll_interval_ms, 8000);
        assert_eq!(config.engine.block_size, 50);
        assert_eq!(config.engine.report_blocks, 4);
        assert_eq!(config.strategies.sequence.run_length, 4);
        assert_eq!(config.strategies.post_tie.escalate_after, 1);
        assert_eq!(config.strategies.dynamic_ratio.imbalance_threshold, dec!(65));
        assert!(!config.telegram.is_enabled());
    }

    #[test]
    fn test_route_fallback() {
        let mut telegram = TelegramConfig::default();
        assert!(telegram.route_for(Channel::Sequence).is_none());

        telegram.general = Some(RouteConfig::new("main-token", "100"));
        telegram.post_tie = Some(RouteConfig::new("tie-token", "200").with_urgent_chat("201"));

        let sequence = telegram.route_for(Channel::Sequence).unwrap();
        assert_eq!(sequence.bot_token, "main-token");

        let post_tie = telegram.route_for(Channel::PostTie).unwrap();
        assert_eq!(post_tie.chat_for(false), "200");
        assert_eq!(post_tie.chat_for(true), "201");

        // no urgent chat configured: urgent goes to the normal chat
        assert_eq!(sequence.chat_for(true), "100");
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let json = r#"{
            "engine": { "block_size": 25 },
            "strategies": { "dynamic_ratio": { "imbalance_threshold": "70" } }
        }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.engine.block_size, 25);
        assert_eq!(config.engine.summary_every, 100);
        assert_eq!(config.strategies.dynamic_ratio.imbalance_threshold, dec!(70));
        assert_eq!(config.strategies.dynamic_ratio.window_size, 20);
    }

    #[test]
    fn test_strategies_can_be_disabled() {
        let json = r#"{ "strategies": { "sequence": { "enabled": false }, "alternation": { "enabled": false } } }"#;
        let mut config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(
            config.strategies.enabled_kinds(),
            vec![StrategyKind::PostTie, StrategyKind::DynamicRatio]
        );
        assert_eq!(config.strategies.sequence.run_length, 4);

        config.strategies.enable_only(&[StrategyKind::Sequence]);
        assert_eq!(config.strategies.enabled_kinds(), vec![StrategyKind::Sequence]);
    }

    #[test]
    fn test_configured_log_level_applies_without_cli_flag() {
        let config: AppConfig = serde_json::from_str(r#"{ "settings": { "log_level": "debug" } }"#).unwrap();
        assert_eq!(config.settings.effective_log_level(None), "debug");
        assert_eq!(config.settings.effective_log_level(Some("warn")), "warn");
        assert_eq!(AppSettings::default().effective_log_level(None), "info");
    }
}
