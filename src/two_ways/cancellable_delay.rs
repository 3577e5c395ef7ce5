//! A delay that gives up once a timeout elapses or a [`CancelToken`] fires.
//!
//! `Pending -> {Completed, Cancelled}`, both terminal. The token and the
//! timeout are checked before the delay on every poll, so when both timers
//! have elapsed by the time the task is polled the outcome is still
//! [`DelayOutcome::Cancelled`]. Both timers
//! are dropped, and their threads released, as soon as an outcome is known.
//!
//! [`CancelToken`]: crate::basics::CancelToken

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayOutcome {
    Completed,
    Cancelled,
}

impl DelayOutcome {
    pub fn is_cancelled(self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl fmt::Display for DelayOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => f.write_str("completed"),
            Self::Cancelled => f.write_str("cancelled"),
        }
    }
}

pub mod auto {
    use core::time::Duration;

    use futures_lite::future;

    use super::DelayOutcome;
    use crate::basics::{sleep, CancelToken};

    /// Wait for `duration` unless `token` is cancelled first.
    pub async fn delay_or_cancel(duration: Duration, token: &CancelToken) -> DelayOutcome {
        future::or(
            async {
                token.cancelled().await;
                DelayOutcome::Cancelled
            },
            async {
                sleep(duration).await;
                DelayOutcome::Completed
            },
        )
        .await
    }

    /// Wait for `duration`, giving up once `timeout` has elapsed.
    pub async fn delay(duration: Duration, timeout: Duration) -> DelayOutcome {
        let token = CancelToken::new();
        // the deadline goes first so an expired timeout beats an expired delay.
        let deadline = async {
            sleep(timeout).await;
            token.cancel();
            DelayOutcome::Cancelled
        };
        future::or(deadline, delay_or_cancel(duration, &token)).await
    }
}

pub mod manual {
    use core::{
        future::Future,
        pin::Pin,
        task::{Context, Poll},
        time::Duration,
    };

    use super::DelayOutcome;
    use crate::basics::{sleep, CancelToken, Sleep};

    pub async fn delay_or_cancel(duration: Duration, token: &CancelToken) -> DelayOutcome {
        CancellableDelay {
            delay: Some(sleep(duration)),
            deadline: None,
            token: token.clone(),
        }
        .await
    }

    pub async fn delay(duration: Duration, timeout: Duration) -> DelayOutcome {
        CancellableDelay {
            delay: Some(sleep(duration)),
            deadline: Some(sleep(timeout)),
            token: CancelToken::new(),
        }
        .await
    }

    /// `delay` is `None` once an outcome has been produced.
    struct CancellableDelay {
        delay: Option<Sleep>,
        deadline: Option<Sleep>,
        token: CancelToken,
    }

    impl CancellableDelay {
        fn settle(&mut self, outcome: DelayOutcome) -> Poll<DelayOutcome> {
            self.delay = None;
            self.deadline = None;
            Poll::Ready(outcome)
        }
    }

    impl Future for CancellableDelay {
        type Output = DelayOutcome;

        fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
            let this = self.get_mut();
            assert!(this.delay.is_some(), "`CancellableDelay` polled after completion");

            if this.token.poll_cancelled(cx).is_ready() {
                return this.settle(DelayOutcome::Cancelled);
            }

            if let Some(deadline) = this.deadline.as_mut() {
                if Pin::new(deadline).poll(cx).is_ready() {
                    this.token.cancel();
                    return this.settle(DelayOutcome::Cancelled);
                }
            }

            if let Some(delay) = this.delay.as_mut() {
                if Pin::new(delay).poll(cx).is_ready() {
                    return this.settle(DelayOutcome::Completed);
                }
            }
            Poll::Pending
        }
    }
}

#[cfg(test)]
mod tests {
    use core::time::Duration;
    use std::{thread, time::Instant};

    use futures_lite::future::{block_on, poll_once};

    use super::{auto, manual, DelayOutcome};
    use crate::basics::{sleep::take_started_timers, CancelToken};

    fn timed(hand_written: bool, duration_ms: u64, timeout_ms: u64) -> (DelayOutcome, Duration) {
        let duration = Duration::from_millis(duration_ms);
        let timeout = Duration::from_millis(timeout_ms);
        let start = Instant::now();
        let outcome = if hand_written {
            block_on(manual::delay(duration, timeout))
        } else {
            block_on(auto::delay(duration, timeout))
        };
        (outcome, start.elapsed())
    }

    #[test]
    fn timeout_first_cancels() {
        for hand_written in [false, true] {
            let (outcome, elapsed) = timed(hand_written, 2_000, 100);
            assert_eq!(outcome, DelayOutcome::Cancelled);
            assert!(elapsed >= Duration::from_millis(100));
            assert!(elapsed < Duration::from_millis(1_000), "waited {elapsed:?}");
        }
    }

    #[test]
    fn duration_first_completes() {
        for hand_written in [false, true] {
            let (outcome, elapsed) = timed(hand_written, 100, 2_000);
            assert_eq!(outcome, DelayOutcome::Completed);
            assert!(elapsed >= Duration::from_millis(100));
            assert!(elapsed < Duration::from_millis(1_000), "waited {elapsed:?}");
        }
    }

    #[test]
    fn repeated_calls_are_independent() {
        for _ in 0..5 {
            assert_eq!(timed(true, 30, 500).0, DelayOutcome::Completed);
            assert_eq!(timed(false, 500, 30).0, DelayOutcome::Cancelled);
        }
    }

    #[test]
    fn already_cancelled_token_returns_immediately() {
        let token = CancelToken::new();
        token.cancel();

        let start = Instant::now();
        let long = Duration::from_secs(10);
        assert_eq!(block_on(auto::delay_or_cancel(long, &token)), DelayOutcome::Cancelled);
        assert_eq!(block_on(manual::delay_or_cancel(long, &token)), DelayOutcome::Cancelled);
        assert!(start.elapsed() < Duration::from_millis(500));
    }

    #[test]
    fn external_cancel_wakes_the_delay() {
        for hand_written in [false, true] {
            let token = CancelToken::new();
            let remote = token.clone();
            let canceller = thread::spawn(move || {
                thread::sleep(Duration::from_millis(30));
                remote.cancel();
            });

            let long = Duration::from_secs(10);
            let outcome = if hand_written {
                block_on(manual::delay_or_cancel(long, &token))
            } else {
                block_on(auto::delay_or_cancel(long, &token))
            };
            assert!(outcome.is_cancelled());
            canceller.join().unwrap();
        }
    }

    #[test]
    fn late_poll_with_both_timers_elapsed_cancels() {
        let duration = Duration::from_millis(50);
        let timeout = Duration::from_millis(10);

        let mut auto_delay = Box::pin(auto::delay(duration, timeout));
        let mut manual_delay = Box::pin(manual::delay(duration, timeout));
        assert_eq!(block_on(poll_once(auto_delay.as_mut())), None);
        assert_eq!(block_on(poll_once(manual_delay.as_mut())), None);

        thread::sleep(Duration::from_millis(150));

        assert_eq!(
            block_on(poll_once(auto_delay.as_mut())),
            Some(DelayOutcome::Cancelled)
        );
        assert_eq!(
            block_on(poll_once(manual_delay.as_mut())),
            Some(DelayOutcome::Cancelled)
        );
    }

    fn assert_timers_released() {
        let timers = take_started_timers();
        assert_eq!(timers.len(), 2, "expected the delay and the timeout timer");

        let start = Instant::now();
        while timers.iter().any(|t| t.is_alive()) {
            assert!(
                start.elapsed() < Duration::from_secs(1),
                "timer thread outlived the delay"
            );
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn timers_released_after_either_outcome() {
        take_started_timers();
        for hand_written in [false, true] {
            assert_eq!(timed(hand_written, 5_000, 20).0, DelayOutcome::Cancelled);
            assert_timers_released();

            assert_eq!(timed(hand_written, 20, 5_000).0, DelayOutcome::Completed);
            assert_timers_released();
        }
    }
}
