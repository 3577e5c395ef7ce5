use core::{
    future::Future,
    pin::Pin,
    task::{Context, Poll, Waker},
};

use std::sync::{Arc, Mutex};

/// Cooperative cancellation signal.
///
/// Cloning a token yields another handle to the same signal. Once
/// [`CancelToken::cancel`] is called the token stays cancelled and every task
/// waiting in [`CancelToken::cancelled`] is woken. Nothing is interrupted:
/// long-running calls are expected to take a token and check it at each of
/// their suspension points.
#[derive(Clone, Default)]
pub struct CancelToken {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    cancelled: bool,
    waiters: Vec<Waker>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the signal. Calling this more than once is a no-op.
    pub fn cancel(&self) {
        let waiters = {
            let mut inner = self.inner.lock().unwrap();
            if inner.cancelled {
                return;
            }
            inner.cancelled = true;
            std::mem::take(&mut inner.waiters)
        };

        tracing::debug!(waiters = waiters.len(), "cancellation requested");
        // wake outside the lock so woken tasks can poll us straight away.
        for waker in waiters {
            waker.wake();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.lock().unwrap().cancelled
    }

    /// Resolves once the token is cancelled.
    pub fn cancelled(&self) -> Cancelled<'_> {
        Cancelled { token: self }
    }

    /// Ready once cancelled, otherwise arranges for `cx` to be woken by
    /// [`CancelToken::cancel`].
    pub fn poll_cancelled(&self, cx: &mut Context<'_>) -> Poll<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.cancelled {
            return Poll::Ready(());
        }

        if !inner.waiters.iter().any(|w| w.will_wake(cx.waker())) {
            inner.waiters.push(cx.waker().clone());
        }
        Poll::Pending
    }
}

impl core::fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

pub struct Cancelled<'a> {
    token: &'a CancelToken,
}

impl Future for Cancelled<'_> {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.token.poll_cancelled(cx)
    }
}
