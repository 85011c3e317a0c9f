//! Configuration loader

use config::{Config, Environment, File};
use std::path::Path;
use tracing::debug;

use super::types::{AppConfig, RouteConfig};
use crate::common::errors::{MonitorError, Result};
use crate::common::types::Channel;

/// Environment suffix for each strategy channel's Telegram variables
const CHANNEL_ENV_SUFFIXES: [(Channel, &str); 4] = [
    (Channel::Sequence, "SEQUENCE"),
    (Channel::PostTie, "POST_TIE"),
    (Channel::Alternation, "ALTERNATION"),
    (Channel::DynamicRatio, "DYNAMIC_RATIO"),
];

/// Load configuration from file and environment variables
///
/// Priority (highest to lowest):
/// 1. Conventional variables (`FEED_URL`, `TELEGRAM_*`)
/// 2. Environment variables (prefixed with APP_, `__` as separator)
/// 3. Configuration file (TOML format)
/// 4. Default values
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    dotenvy::dotenv().ok();

    let mut builder = Config::builder();

    if let Some(path) = config_path {
        if Path::new(path).exists() {
            builder = builder.add_source(File::with_name(path).required(false));
        } else {
            debug!(path, "Configuration file not found, using defaults");
        }
    }

    builder = builder.add_source(
        Environment::with_prefix("APP")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder
        .build()
        .map_err(|e| MonitorError::Configuration(e.to_string()))?;

    let mut app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| MonitorError::Configuration(e.to_string()))?;

    apply_env_overrides(&mut app_config, |key| std::env::var(key).ok());
    validate(&app_config)?;

    Ok(app_config)
}

/// Load configuration from environment variables only
pub fn load_from_env() -> Result<AppConfig> {
    dotenvy::dotenv().ok();

    let mut app_config = AppConfig::default();
    apply_env_overrides(&mut app_config, |key| std::env::var(key).ok());
    validate(&app_config)?;

    Ok(app_config)
}

/// Fill feed URL and Telegram routes from the conventional variables
///
/// `lookup` abstracts the environment so the mapping can be tested.
/// `TELEGRAM_TOKEN` / `TELEGRAM_CHAT_ID` form the general route; each
/// strategy channel reads `TELEGRAM_TOKEN_<CHANNEL>`,
/// `TELEGRAM_CHAT_ID_<CHANNEL>` and `TELEGRAM_CHAT_ID_<CHANNEL>_URGENT`.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup("FEED_URL") {
        config.feed.url = Some(url);
    }

    if let (Some(token), Some(chat_id)) = (lookup("TELEGRAM_TOKEN"), lookup("TELEGRAM_CHAT_ID")) {
        config.telegram.general = Some(RouteConfig::new(token, chat_id));
    }

    for (channel, suffix) in CHANNEL_ENV_SUFFIXES {
        let token = lookup(&format!("TELEGRAM_TOKEN_{}", suffix));
        let chat_id = lookup(&format!("TELEGRAM_CHAT_ID_{}", suffix));

        if let (Some(token), Some(chat_id)) = (token, chat_id) {
            let mut route = RouteConfig::new(token, chat_id);
            route.urgent_chat_id = lookup(&format!("TELEGRAM_CHAT_ID_{}_URGENT", suffix));
            *config.telegram.route_mut(channel) = Some(route);
        }
    }
}

/// Check cross-field constraints; also run after CLI overrides
pub fn validate(config: &AppConfig) -> Result<()> {
    let engine = &config.engine;
    if engine.block_size == 0 || engine.summary_every == 0 || engine.detailed_every == 0 {
        return Err(MonitorError::Configuration(
            "report intervals must be greater than zero".to_string(),
        ));
    }
    if engine.history_capacity == 0 {
        return Err(MonitorError::Configuration(
            "history capacity must be greater than zero".to_string(),
        ));
    }

    if config.strategies.sequence.run_length < 2 {
        return Err(MonitorError::Configuration(
            "sequence run length must be at least 2".to_string(),
        ));
    }

    if config.strategies.enabled_kinds().is_empty() {
        return Err(MonitorError::Configuration(
            "at least one strategy must be enabled".to_string(),
        ));
    }

    let ratio = &config.strategies.dynamic_ratio;
    if ratio.min_samples == 0 || ratio.min_samples > ratio.window_size {
        return Err(MonitorError::Configuration(format!(
            "dynamic ratio needs 0 < min_samples ({}) <= window_size ({})",
            ratio.min_samples, ratio.window_size
        )));
    }
    if ratio.enabled && ratio.window_size > engine.history_capacity {
        return Err(MonitorError::Configuration(format!(
            "dynamic ratio window_size ({}) exceeds history capacity ({})",
            ratio.window_size, engine.history_capacity
        )));
    }

    if let Some(url) = &config.feed.url {
        url::Url::parse(url)
            .map_err(|e| MonitorError::Configuration(format!("invalid feed url '{}': {}", url, e)))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_env_overrides_build_routes() {
        let vars = env(&[
            ("FEED_URL", "https://feed.example.com/results"),
            ("TELEGRAM_TOKEN", "main"),
            ("TELEGRAM_CHAT_ID", "-100"),
            ("TELEGRAM_TOKEN_POST_TIE", "tie"),
            ("TELEGRAM_CHAT_ID_POST_TIE", "-200"),
            ("TELEGRAM_CHAT_ID_POST_TIE_URGENT", "-201"),
            // token without chat id is ignored
            ("TELEGRAM_TOKEN_SEQUENCE", "seq"),
        ]);

        let mut config = AppConfig::default();
        apply_env_overrides(&mut config, |key| vars.get(key).cloned());

        assert_eq!(config.feed.url.as_deref(), Some("https://feed.example.com/results"));
        assert_eq!(config.telegram.general, Some(RouteConfig::new("main", "-100")));
        assert_eq!(
            config.telegram.post_tie,
            Some(RouteConfig::new("tie", "-200").with_urgent_chat("-201"))
        );
        assert!(config.telegram.sequence.is_none());
    }

    #[test]
    fn test_validate_rejects_zero_block_size() {
        let mut config = AppConfig::default();
        config.engine.block_size = 0;
        assert!(matches!(validate(&config), Err(MonitorError::Configuration(_))));
    }

    #[test]
    fn test_validate_rejects_bad_ratio_window() {
        let mut config = AppConfig::default();
        config.strategies.dynamic_ratio.min_samples = 30;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_rejects_window_larger_than_history() {
        let mut config = AppConfig::default();
        config.strategies.dynamic_ratio.window_size = 60;
        assert!(matches!(validate(&config), Err(MonitorError::Configuration(_))));

        config.engine.history_capacity = 60;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_validate_requires_an_enabled_strategy() {
        let mut config = AppConfig::default();
        config.strategies.enable_only(&[]);
        assert!(matches!(validate(&config), Err(MonitorError::Configuration(_))));
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let mut config = AppConfig::default();
        config.feed.url = Some("not a url".to_string());
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = load_config(Some("does-not-exist.toml")).unwrap();
        assert_eq!(config.engine.block_size, 50);
    }

    #[test]
    fn test_load_from_env_keeps_engine_defaults() {
        let config = load_from_env().unwrap();
        assert_eq!(config.engine, crate::config::types::EngineSettings::default());
        assert_eq!(config.strategies.sequence.run_length, 4);
    }
}
