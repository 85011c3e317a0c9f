//! Rate arithmetic and periodic report rendering

pub mod rate;
pub mod render;

pub use rate::{calc_rate, rank_strategies, Ranked};
