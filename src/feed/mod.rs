//! Outcome sources
//!
//! - [`HttpOutcomeSource`]: polls a JSON results endpoint
//! - [`ReplaySource`]: replays a recorded JSON file
//! - [`run_poller`]: drives a source on an interval for the live loop
//!
//! Both run candidates through [`OutcomeDeduplicator`] so the engine never
//! sees the same outcome twice in a row.

pub mod dedup;
pub mod http;
pub mod poller;
pub mod replay;

pub use dedup::OutcomeDeduplicator;
pub use http::{FeedResponse, HttpOutcomeSource};
pub use poller::{poller_exit, run_poller};
pub use replay::ReplaySource;
