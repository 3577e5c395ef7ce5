//! The four patterns applied to the stand-in operations from [`crate::ops`].

use core::time::Duration;
use std::thread;

use futures_lite::{
    future::{self, BoxedLocal},
    FutureExt,
};

use crate::{
    basics::sleep,
    error::{AggregateError, OperationError},
    ops,
    two_ways::{
        cancellable_delay::{self, DelayOutcome},
        chain, join_all,
        race::{self, Winner},
    },
};

/// Fetch a result, feed it to the next operation, then feed both to a third.
#[tracing::instrument(level = "debug")]
pub async fn run(work: Duration) -> Result<String, OperationError> {
    let result = chain::auto::chain(
        ops::fetch_result(work),
        ops::something_else,
        ops::another_operation,
    )
    .await;

    match &result {
        Ok(out) => tracing::info!(%out, "chain finished"),
        Err(error) => tracing::warn!(%error, "chain aborted"),
    }
    result
}

/// Launch all three operations at once and collect their results in launch
/// order.
#[tracing::instrument(level = "debug")]
pub async fn run_all(work: Duration) -> Result<Vec<String>, AggregateError> {
    let launched: Vec<BoxedLocal<Result<String, OperationError>>> = vec![
        ops::fetch_result(work).boxed_local(),
        ops::something_else("Hello".to_string()).boxed_local(),
        ops::another_operation("Hello, ".to_string(), "World".to_string()).boxed_local(),
    ];

    let results = join_all::auto::join_all(launched).await?;
    tracing::info!(count = results.len(), "fan-in finished");
    Ok(results)
}

/// The losing side of [`race_two`], still running on its own thread.
#[must_use = "join the loser so it is not cut short when the process exits"]
#[derive(Debug)]
pub struct Loser {
    handle: thread::JoinHandle<()>,
}

impl Loser {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Block until the losing delay has run to completion.
    pub fn join(self) {
        if self.handle.join().is_err() {
            tracing::error!("race loser panicked");
        }
    }
}

/// Race two delays and report the winner as soon as it finishes. The loser
/// is neither awaited nor cancelled: it keeps running in the background
/// until the returned [`Loser`] is joined or completes on its own.
#[tracing::instrument(level = "debug")]
pub async fn race_two(delay_a: Duration, delay_b: Duration) -> (Winner, Loser) {
    let raced = race::auto::race(sleep(delay_a), sleep(delay_b)).await;
    let winner = raced.winner();
    tracing::info!(%winner, "race finished");

    let (race::Raced::A((), pending) | race::Raced::B((), pending)) = raced;
    let handle = thread::spawn(move || {
        future::block_on(pending);
        tracing::debug!("race loser finished");
    });
    (winner, Loser { handle })
}

/// Wait for `duration` unless `timeout` elapses first.
#[tracing::instrument(level = "debug")]
pub async fn delay(duration: Duration, timeout: Duration) -> DelayOutcome {
    let outcome = cancellable_delay::auto::delay(duration, timeout).await;
    tracing::info!(%outcome, "delay finished");
    outcome
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use futures_lite::future::block_on;

    use super::*;
    use crate::ops::{ANOTHER_OPERATION, FETCH_RESULT, SOMETHING_ELSE};

    const WORK: Duration = Duration::from_millis(10);

    #[test]
    fn run_returns_last_step() {
        for _ in 0..3 {
            assert_eq!(block_on(run(WORK)).unwrap(), ANOTHER_OPERATION);
        }
    }

    #[test]
    fn run_all_keeps_launch_order() {
        let results = block_on(run_all(Duration::from_millis(30))).unwrap();
        assert_eq!(results, [FETCH_RESULT, SOMETHING_ELSE, ANOTHER_OPERATION]);
    }

    #[test]
    fn race_two_reports_faster_side() {
        let fast = Duration::from_millis(5);
        let slow = Duration::from_millis(50);

        let (winner, loser) = block_on(race_two(fast, slow));
        assert_eq!(winner, Winner::A);
        loser.join();

        let (winner, loser) = block_on(race_two(slow, fast));
        assert_eq!(winner, Winner::B);
        loser.join();
    }

    #[test]
    fn race_two_loser_keeps_running() {
        let start = Instant::now();
        let (winner, loser) =
            block_on(race_two(Duration::from_millis(5), Duration::from_millis(150)));
        assert_eq!(winner, Winner::A);
        assert!(start.elapsed() < Duration::from_millis(150));

        loser.join();
        assert!(start.elapsed() >= Duration::from_millis(150));
    }

    #[test]
    fn delay_honours_timeout() {
        let start = Instant::now();
        let outcome = block_on(delay(Duration::from_secs(10), Duration::from_millis(100)));
        assert_eq!(outcome, DelayOutcome::Cancelled);
        assert!(start.elapsed() < Duration::from_secs(1));

        let outcome = block_on(delay(Duration::from_millis(100), Duration::from_secs(10)));
        assert_eq!(outcome, DelayOutcome::Completed);
    }
}
