//! Common test utilities and fixtures

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use bacbo_signals::{Category, Notification, NotificationSink, Outcome};
use mockall::mock;

/// Outcome with plausible scores for its category
pub fn outcome(category: Category) -> Outcome {
    match category {
        Category::Player => Outcome::new(category, 9, 4, 0),
        Category::Banker => Outcome::new(category, 3, 8, 0),
        Category::Tie => Outcome::new(category, 6, 6, 0),
    }
}

/// Parse a compact pattern such as `"PPBT"` into outcomes
pub fn outcomes(pattern: &str) -> Vec<Outcome> {
    pattern
        .chars()
        .filter_map(|c| Category::from_label(&c.to_string()))
        .map(outcome)
        .collect()
}

/// Sink that keeps everything it is sent
#[derive(Clone, Default)]
pub struct RecordingSink {
    sent: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent().into_iter().map(|n| n.text).collect()
    }
}

impl NotificationSink for RecordingSink {
    fn send(&self, notification: Notification) {
        self.sent.lock().unwrap().push(notification);
    }
}

mock! {
    pub Sink {}

    impl NotificationSink for Sink {
        fn send(&self, notification: Notification);
    }
}

/// Sample feed bodies
pub mod feed_bodies {
    pub const PLAYER_LATEST: &str = r#"{
        "results": [
            {"result": "player", "player_score": 9, "banker_score": 4},
            {"result": "banker", "player_score": 3, "banker_score": 8}
        ]
    }"#;

    pub const WINNER_SCORE_ONLY: &str = r#"{
        "results": [
            {"result": "banker", "score": 11}
        ]
    }"#;

    pub const EMPTY: &str = r#"{"results": []}"#;

    pub const UNKNOWN_CATEGORY: &str = r#"{
        "results": [
            {"result": "dragon", "player_score": 5, "banker_score": 5}
        ]
    }"#;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcomes_pattern() {
        let parsed = outcomes("PBT");
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0].category, Category::Player);
        assert_eq!(parsed[2].category, Category::Tie);
    }
}
