//! Periodic report rendering
//!
//! Every function takes already-aggregated values and returns ready-to-send
//! [`Notification`]s. None of them hold or mutate state.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use chrono::NaiveDate;

use super::rate::{calc_rate, first_attempt_rate, rank_strategies, retry_rate, success_rate};
use crate::common::types::{Category, Notification};
use crate::engine::blocks::{Block, BlockTally};
use crate::engine::tally::GlobalTally;
use crate::strategy::{Stage, StrategyKind, StrategyStatus};

fn tally_lines(out: &mut String, tally: &BlockTally, indent: &str) {
    let _ = writeln!(
        out,
        "{indent}Wins: {} [G0={} G1={}]",
        tally.wins(),
        tally.first_attempt_wins,
        tally.retry_wins
    );
    let _ = writeln!(out, "{indent}Ties: {} (counted as wins)", tally.tie_wins);
    let _ = writeln!(out, "{indent}Losses: {}", tally.losses);
}

fn block_rate(tally: &BlockTally) -> u64 {
    calc_rate(tally.wins_with_ties(), tally.resolved())
}

fn compact(tally: &BlockTally) -> String {
    format!(
        "{} wins / {} losses / {} ties ({}%)",
        tally.wins(),
        tally.losses,
        tally.tie_wins,
        block_rate(tally)
    )
}

fn share_line(tally: &GlobalTally, category: Category) -> String {
    format!(
        "{}: {} ({}%)",
        category,
        tally.totals.get(category),
        tally.share(category)
    )
}

/// Report for one sealed block, sent to the strategy's channel
pub fn block_report(block: &Block, kind: StrategyKind) -> Notification {
    let (first, last) = block.span();
    let tally = block.tally(kind);

    let mut text = format!(
        "📊 {}: LAST {} ROUNDS ({} - {})\n\n✅ Results in this period:\n",
        kind.label(),
        last.saturating_sub(block.start_round),
        first,
        last
    );
    tally_lines(&mut text, &tally, "   ");
    let _ = write!(text, "\n💯 Hit rate in this period: {}%", block_rate(&tally));

    Notification::new(kind.channel(), text)
}

/// All strategies for one sealed block, sent to the general channel
pub fn block_overview(block: &Block) -> Notification {
    let (first, last) = block.span();
    let mut text = format!("📊 BLOCK REPORT (ROUNDS {} - {})\n", first, last);
    for kind in block.kinds() {
        let _ = write!(text, "\n🎲 {}: {}", kind.label(), compact(&block.tally(kind)));
    }
    Notification::general(text)
}

/// Strategies ranked by lifetime success rate with G0/G1 breakdown
pub fn ranking_report(round: u64, statuses: &[StrategyStatus], tally: &GlobalTally) -> Notification {
    let mut text = format!("📊 G0/G1 STATISTICS - ROUND #{} 📊\n\n", round);
    text.push_str("🏆 STRATEGY RANKING (overall hit rate):\n");
    for (position, ranked) in rank_strategies(statuses).iter().enumerate() {
        let _ = writeln!(
            text,
            "{}. {}: {}% hit rate",
            position + 1,
            ranked.kind.display_name(),
            ranked.rate
        );
    }

    for status in statuses {
        let c = &status.counters;
        let _ = write!(
            text,
            "\n🎲 {}:\n▶️ Total: {} wins / {} losses ({}% hit rate)\n\
             ▶️ G0: {} wins ({}%)\n▶️ G1: {} wins ({}%)\n▶️ Ties: {} (counted as wins)\n",
            status.kind.label(),
            c.wins_with_ties(),
            c.total_losses,
            success_rate(status),
            c.wins_first_attempt,
            first_attempt_rate(status),
            c.wins_retry,
            retry_rate(status),
            c.tie_wins
        );
    }

    let _ = write!(
        text,
        "\n📊 Overall:\n📌 Rounds: {}\n📌 {}\n📌 {}\n📌 {}\n\
         🎯 Best PLAYER score: {}\n🎯 Best BANKER score: {}\n\
         🔢 Longest PLAYER streak: {}\n🔢 Longest BANKER streak: {}\n🔢 Longest TIE streak: {}",
        tally.round,
        share_line(tally, Category::Player),
        share_line(tally, Category::Banker),
        share_line(tally, Category::Tie),
        tally.best_player_score,
        tally.best_banker_score,
        tally.best_streaks.player,
        tally.best_streaks.banker,
        tally.best_streaks.tie
    );

    Notification::general(text)
}

/// Mid-period summary for one strategy, sent to its channel
pub fn summary_report(status: &StrategyStatus, tally: &GlobalTally) -> Notification {
    let c = &status.counters;
    let mut text = format!(
        "📊 PARTIAL SUMMARY - {} (last {} rounds):\n\
         ✅ Wins: {} [G0={} G1={}] | Ties: {} | Losses: {}\n\
         🔄 Longest win streak: {}\n",
        status.kind.label(),
        tally.round,
        c.total_wins,
        c.wins_first_attempt,
        c.wins_retry,
        c.tie_wins,
        c.total_losses,
        c.best_win_streak
    );
    if c.current_win_streak > 0 {
        let _ = writeln!(text, "🔥 Current streak: {} win(s) in a row", c.current_win_streak);
    }

    // each channel gets the global figures its strategy reacts to
    match status.kind {
        StrategyKind::Sequence => {
            let _ = write!(
                text,
                "🔢 Longest PLAYER streak: {}\n🔢 Longest BANKER streak: {}",
                tally.best_streaks.player, tally.best_streaks.banker
            );
        }
        StrategyKind::PostTie => {
            let _ = write!(
                text,
                "🎲 Total ties: {} ({}%)\n🔢 Longest TIE streak: {}",
                tally.totals.tie,
                tally.share(Category::Tie),
                tally.best_streaks.tie
            );
        }
        StrategyKind::Alternation | StrategyKind::DynamicRatio => {
            let _ = write!(
                text,
                "✅ {}\n✅ {}",
                share_line(tally, Category::Player),
                share_line(tally, Category::Banker)
            );
        }
    }

    Notification::new(status.kind.channel(), text)
}

fn describe_state(status: &StrategyStatus) -> String {
    match (status.target, status.stage) {
        (Some(target), Stage::FirstAttempt) => format!("armed on {} (G0)", target),
        (Some(target), Stage::Retry) => format!("armed on {} (G1)", target),
        _ => "waiting for a signal".to_string(),
    }
}

/// Full per-strategy counters plus global figures, general channel
pub fn detailed_report(round: u64, statuses: &[StrategyStatus], tally: &GlobalTally) -> Notification {
    let mut text = format!("📋 DETAILED REPORT - ROUND #{}\n", round);

    for status in statuses {
        let c = &status.counters;
        let _ = write!(
            text,
            "\n🎲 {}\n\
             ▶️ Wins: {} (G0={} G1={}) | Ties: {} | Losses: {} (G1 losses={})\n\
             ▶️ Hit rate: {}% | G0: {}% | G1: {}%\n\
             ▶️ Win streak: {} (best {}) | Loss streak: {}\n\
             ▶️ State: {}\n",
            status.kind.label(),
            c.total_wins,
            c.wins_first_attempt,
            c.wins_retry,
            c.tie_wins,
            c.total_losses,
            c.losses_retry,
            success_rate(status),
            first_attempt_rate(status),
            retry_rate(status),
            c.current_win_streak,
            c.best_win_streak,
            c.current_loss_streak,
            describe_state(status)
        );
    }

    let _ = write!(
        text,
        "\n📊 Rounds today: {}\n📌 {}\n📌 {}\n📌 {}\n\
         🎯 Best scores: PLAYER {} | BANKER {}\n\
         🔢 Longest streaks: PLAYER {} | BANKER {} | TIE {}\n",
        tally.round,
        share_line(tally, Category::Player),
        share_line(tally, Category::Banker),
        share_line(tally, Category::Tie),
        tally.best_player_score,
        tally.best_banker_score,
        tally.best_streaks.player,
        tally.best_streaks.banker,
        tally.best_streaks.tie
    );

    match &tally.last_win {
        Some(win) => {
            let _ = write!(
                text,
                "🏁 Last win: {} with {} [{}-{}] at {}",
                win.strategy.display_name(),
                win.category,
                win.player_score,
                win.banker_score,
                win.at.format("%H:%M:%S UTC")
            );
        }
        None => text.push_str("🏁 Last win: none yet"),
    }

    Notification::general(text)
}

fn blocks_total(blocks: &[&Block], kind: StrategyKind) -> BlockTally {
    let mut total = BlockTally::default();
    for block in blocks {
        total.merge(&block.tally(kind));
    }
    total
}

fn rounds_covered(blocks: &[&Block]) -> u64 {
    blocks
        .iter()
        .map(|b| b.end_round.unwrap_or(b.start_round).saturating_sub(b.start_round))
        .sum()
}

/// Per-block history for one strategy, oldest block first
pub fn multi_block_report(blocks: &[&Block], kind: StrategyKind) -> Notification {
    let mut text = format!(
        "📊 LAST {} BLOCKS - {}\n\n",
        blocks.len(),
        kind.label()
    );

    for (index, block) in blocks.iter().enumerate() {
        let (first, last) = block.span();
        let tally = block.tally(kind);
        let _ = writeln!(text, "🔹 Block {} (rounds {}-{}):", index + 1, first, last);
        tally_lines(&mut text, &tally, "   ");
        let _ = writeln!(text, "   Rate: {}%\n", block_rate(&tally));
    }

    let total = blocks_total(blocks, kind);
    let _ = writeln!(text, "📈 TOTALS OVER THE LAST {} ROUNDS:", rounds_covered(blocks));
    tally_lines(&mut text, &total, "   ");
    let _ = write!(text, "   Overall rate: {}%", block_rate(&total));

    Notification::new(kind.channel(), text)
}

/// One line per strategy over the given blocks, general channel
pub fn multi_block_overview(blocks: &[&Block]) -> Notification {
    let mut text = format!("📊 LAST {} BLOCKS\n", blocks.len());
    let kinds: BTreeSet<StrategyKind> = blocks.iter().flat_map(|b| b.kinds()).collect();
    for kind in kinds {
        let _ = write!(
            text,
            "\n🎲 {}: {}",
            kind.label(),
            compact(&blocks_total(blocks, kind))
        );
    }
    Notification::general(text)
}

/// End-of-day report, sent before counters are reset
pub fn daily_report(date: NaiveDate, statuses: &[StrategyStatus], tally: &GlobalTally) -> Notification {
    let mut text = format!(
        "📅 DAILY REPORT - {}\n\n📊 Results:\n✅ {}\n✅ {}\n✅ {}\n\n💯 STRATEGY HIT RATES:\n",
        date.format("%d/%m/%Y"),
        share_line(tally, Category::Player),
        share_line(tally, Category::Banker),
        share_line(tally, Category::Tie)
    );

    for status in statuses {
        let _ = writeln!(
            text,
            "🎯 {}: {}% (Ties: {})",
            status.kind.display_name(),
            success_rate(status),
            status.counters.tie_wins
        );
    }

    let _ = write!(
        text,
        "\n🎯 Best PLAYER score: {}\n🎯 Best BANKER score: {}\n\
         🔢 Longest PLAYER streak: {}\n🔢 Longest BANKER streak: {}\n🔢 Longest TIE streak: {}\n\n\
         📈 Rounds analysed: {}\n\n🔄 Counters reset for the new day.",
        tally.best_player_score,
        tally.best_banker_score,
        tally.best_streaks.player,
        tally.best_streaks.banker,
        tally.best_streaks.tie,
        tally.round
    );

    Notification::general(text)
}
