//! Message rendering for strategy transitions
//!
//! Pure functions: a [`Transition`] plus the strategy's counters in, zero or
//! more [`Notification`]s out. Nothing here touches strategy state.

use super::types::{Attempt, Counters, Detection, StrategyKind, Transition};
use crate::common::types::{Category, Notification};
use crate::report::rate::calc_rate;

/// Start-of-monitoring message for one strategy
pub fn start_announcement(kind: StrategyKind) -> Notification {
    let rule = match kind {
        StrategyKind::Sequence => "Watching for runs of identical results",
        StrategyKind::PostTie => "Watching for ties, betting on the side that won before them",
        StrategyKind::Alternation => "Watching for strict alternation (P B P B)",
        StrategyKind::DynamicRatio => "Watching the recent distribution for imbalances",
    };
    Notification::new(
        kind.channel(),
        format!("🚀 {} started\n{}", kind.label(), rule),
    )
}

/// Render a transition into notifications for the strategy's channel
///
/// An escalated loss produces a second, urgent notification.
pub fn transition(kind: StrategyKind, transition: &Transition, counters: &Counters) -> Vec<Notification> {
    let channel = kind.channel();
    let label = kind.label();

    match transition {
        Transition::Armed { target, detection } => vec![Notification::new(
            channel,
            format!(
                "🎯 {}: signal detected\n{}\n👉 Bet on {} (G0, one retry G1)",
                label,
                describe(detection),
                target
            ),
        )],
        Transition::Win { attempt, outcome } => {
            let gale = match attempt {
                Attempt::First => "G0",
                Attempt::Retry => "G1",
            };
            vec![Notification::new(
                channel,
                format!(
                    "✅ {}: WIN on {}\nResult: {}\n{}\n{}",
                    label,
                    gale,
                    outcome,
                    streak_line(counters),
                    score_line(kind, counters)
                ),
            )]
        }
        Transition::TieWin {
            outcome,
            still_armed,
        } => {
            let tail = if *still_armed {
                "\nPrediction stays open"
            } else {
                ""
            };
            vec![Notification::new(
                channel,
                format!(
                    "🟡 {}: {} counted as a win{}\n{}\n{}",
                    label,
                    outcome,
                    tail,
                    streak_line(counters),
                    score_line(kind, counters)
                ),
            )]
        }
        Transition::MovedToRetry {
            outcome,
            expected,
            retry_target,
        } => vec![Notification::new(
            channel,
            format!(
                "🔄 {}: G0 missed (expected {}, got {})\n👉 Retry G1 on {}",
                label, expected, outcome, retry_target
            ),
        )],
        Transition::Loss {
            outcome,
            expected,
            escalate,
        } => {
            let mut out = vec![Notification::new(
                channel,
                format!(
                    "❌ {}: LOSS (expected {}, got {})\n{}",
                    label,
                    expected,
                    outcome,
                    score_line(kind, counters)
                ),
            )];
            if *escalate {
                out.push(Notification::urgent(
                    channel,
                    format!(
                        "🚨 {}: {} losses in a row\nLast: expected {}, got {}\n{}",
                        label,
                        counters.current_loss_streak,
                        expected,
                        outcome,
                        score_line(kind, counters)
                    ),
                ));
            }
            out
        }
    }
}

fn describe(detection: &Detection) -> String {
    match detection {
        Detection::Run { category, length } => format!("{} x {} in a row", length, category),
        Detection::AfterTie { tie, previous } => format!("{} after {}", tie, previous),
        Detection::Alternating { pattern } => {
            let letters: Vec<String> = pattern.iter().map(|c| c.initial().to_string()).collect();
            format!("Alternation {}", letters.join(" "))
        }
        Detection::Imbalance {
            samples,
            majority,
            majority_pct,
            minority_pct,
        } => format!(
            "{} {}% / {} {}% over the last {} results",
            majority,
            majority_pct.round_dp(1).normalize(),
            minority_of(*majority),
            minority_pct.round_dp(1).normalize(),
            samples
        ),
    }
}

fn minority_of(majority: Category) -> Category {
    majority.opposite()
}

fn streak_line(counters: &Counters) -> String {
    format!("🔥 {} WINS IN A ROW", counters.current_win_streak)
}

/// One-line counter summary appended to resolution messages
pub fn score_line(kind: StrategyKind, counters: &Counters) -> String {
    format!(
        "📊 {}: Wins: {} [G0={} G1={}] | Ties: {} | Losses: {} | Rate: {}%",
        kind.display_name(),
        counters.total_wins,
        counters.wins_first_attempt,
        counters.wins_retry,
        counters.tie_wins,
        counters.total_losses,
        calc_rate(counters.wins_with_ties(), counters.resolved())
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::{Channel, Outcome};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn counters() -> Counters {
        Counters {
            total_wins: 3,
            total_losses: 1,
            wins_first_attempt: 2,
            wins_retry: 1,
            losses_retry: 1,
            tie_wins: 1,
            current_win_streak: 2,
            best_win_streak: 3,
            current_loss_streak: 0,
        }
    }

    #[test]
    fn test_first_attempt_win_text() {
        let t = Transition::Win {
            attempt: Attempt::First,
            outcome: Outcome::new(Category::Player, 8, 6, 10),
        };
        let out = transition(StrategyKind::Sequence, &t, &counters());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].channel, Channel::Sequence);
        assert!(!out[0].urgent);
        assert_eq!(
            out[0].text,
            "✅ SEQUENCE: WIN on G0\nResult: PLAYER [8-6]\n🔥 2 WINS IN A ROW\n\
             📊 Sequence: Wins: 3 [G0=2 G1=1] | Ties: 1 | Losses: 1 | Rate: 80%"
        );
    }

    #[test]
    fn test_armed_alternation_text() {
        let t = Transition::Armed {
            target: Category::Player,
            detection: Detection::Alternating {
                pattern: vec![Category::Player, Category::Banker, Category::Player, Category::Banker],
            },
        };
        let out = transition(StrategyKind::Alternation, &t, &Counters::default());
        assert_eq!(
            out[0].text,
            "🎯 ALTERNATION: signal detected\nAlternation P B P B\n👉 Bet on PLAYER (G0, one retry G1)"
        );
    }

    #[test]
    fn test_imbalance_description() {
        let detection = Detection::Imbalance {
            samples: 20,
            majority: Category::Player,
            majority_pct: dec!(70.00),
            minority_pct: dec!(30.00),
        };
        assert_eq!(describe(&detection), "PLAYER 70% / BANKER 30% over the last 20 results");
    }

    #[test]
    fn test_escalated_loss_adds_urgent_message() {
        let mut c = counters();
        c.current_loss_streak = 2;
        let t = Transition::Loss {
            outcome: Outcome::new(Category::Banker, 4, 9, 3),
            expected: Category::Player,
            escalate: true,
        };
        let out = transition(StrategyKind::PostTie, &t, &c);
        assert_eq!(out.len(), 2);
        assert!(!out[0].urgent);
        assert!(out[1].urgent);
        assert_eq!(out[1].channel, Channel::PostTie);
        assert!(out[1].text.starts_with("🚨 POST TIE: 2 losses in a row"));
    }

    #[test]
    fn test_plain_loss_has_single_message() {
        let t = Transition::Loss {
            outcome: Outcome::new(Category::Banker, 4, 9, 3),
            expected: Category::Player,
            escalate: false,
        };
        assert_eq!(transition(StrategyKind::Sequence, &t, &counters()).len(), 1);
    }

    #[test]
    fn test_tie_win_still_armed() {
        let t = Transition::TieWin {
            outcome: Outcome::new(Category::Tie, 6, 6, 4),
            still_armed: true,
        };
        let out = transition(StrategyKind::PostTie, &t, &counters());
        assert!(out[0].text.starts_with("🟡 POST TIE: TIE [6-6] counted as a win\nPrediction stays open"));
    }

    #[test]
    fn test_start_announcement_channel() {
        let n = start_announcement(StrategyKind::DynamicRatio);
        assert_eq!(n.channel, Channel::DynamicRatio);
        assert!(n.text.starts_with("🚀 DYNAMIC RATIO started"));
    }
}
