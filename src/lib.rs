//! Async orchestration patterns on top of plain futures: sequencing,
//! fan-out/fan-in, racing and cancellable delays.
//!
//! Nothing here depends on a particular executor. Timers run on their own
//! threads (see [`basics::Sleep`]), so any `block_on` can drive these futures.

pub mod basics;
pub mod config;
pub mod error;
pub mod ops;
pub mod scenario;
pub mod two_ways;

pub use error::{AggregateError, Failure, OperationError};
pub use two_ways::{cancellable_delay::DelayOutcome, race::Winner};
