//! Leaf futures the orchestration patterns are built from: a timer and a
//! cooperative cancellation signal.

pub mod cancel;
pub mod sleep;

pub use cancel::{CancelToken, Cancelled};
pub use sleep::{sleep, Sleep};
