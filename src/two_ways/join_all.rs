//! Fan-out/fan-in: every operation is polled concurrently and the caller
//! resumes once all of them have settled. Outputs keep launch order no matter
//! which operation finishes first. A failure does not short-circuit the
//! others; it is reported through [`AggregateError`] once everything settled.

use crate::error::{AggregateError, Failure, OperationError};

fn gather<T>(outcomes: Vec<Result<T, OperationError>>) -> Result<Vec<T>, AggregateError> {
    let total = outcomes.len();
    let mut values = Vec::with_capacity(total);
    let mut failures = Vec::new();

    for (index, outcome) in outcomes.into_iter().enumerate() {
        match outcome {
            Ok(value) => values.push(value),
            Err(error) => {
                tracing::warn!(index, %error, "fan-in member failed");
                failures.push(Failure { index, error });
            }
        }
    }

    match AggregateError::new(total, failures) {
        Some(err) => Err(err),
        None => Ok(values),
    }
}

pub mod auto {
    use core::{future::Future, pin::Pin};

    use futures_lite::future;

    use crate::error::{AggregateError, OperationError};

    pub async fn join_all<T, F>(futures: Vec<F>) -> Result<Vec<T>, AggregateError>
    where
        F: Future<Output = Result<T, OperationError>>,
    {
        super::gather(settle(futures).await)
    }

    /// Splits the batch in half and zips the halves, so every future ends up
    /// polled by the same task.
    fn settle<'a, F>(mut futures: Vec<F>) -> Pin<Box<dyn Future<Output = Vec<F::Output>> + 'a>>
    where
        F: Future + 'a,
        F::Output: 'a,
    {
        Box::pin(async move {
            if futures.len() <= 1 {
                let mut outcomes = Vec::with_capacity(futures.len());
                if let Some(only) = futures.pop() {
                    outcomes.push(only.await);
                }
                return outcomes;
            }

            let right = futures.split_off(futures.len() / 2);
            let (mut outcomes, right) = future::zip(settle(futures), settle(right)).await;
            outcomes.extend(right);
            outcomes
        })
    }
}

pub mod manual {
    use core::{
        future::Future,
        mem,
        pin::Pin,
        task::{Context, Poll},
    };

    use crate::error::{AggregateError, OperationError};

    pub async fn join_all<T, F>(futures: Vec<F>) -> Result<Vec<T>, AggregateError>
    where
        F: Future<Output = Result<T, OperationError>>,
    {
        let slots = futures
            .into_iter()
            .map(|fut| Slot::Running(Box::pin(fut)))
            .collect();
        super::gather(JoinAll { slots }.await)
    }

    enum Slot<F: Future> {
        Running(Pin<Box<F>>),
        Settled(F::Output),
        Taken,
    }

    struct JoinAll<F: Future> {
        slots: Vec<Slot<F>>,
    }

    // futures are boxed and outputs are never pinned.
    impl<F: Future> Unpin for JoinAll<F> {}

    impl<F: Future> Future for JoinAll<F> {
        type Output = Vec<F::Output>;

        fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
            let mut pending = false;
            for slot in self.slots.iter_mut() {
                if let Slot::Running(fut) = slot {
                    match fut.as_mut().poll(cx) {
                        Poll::Ready(out) => *slot = Slot::Settled(out),
                        Poll::Pending => pending = true,
                    }
                }
            }
            if pending {
                return Poll::Pending;
            }

            let outcomes = self
                .slots
                .iter_mut()
                .map(|slot| match mem::replace(slot, Slot::Taken) {
                    Slot::Settled(out) => out,
                    _ => panic!("`JoinAll` polled after completion"),
                })
                .collect();
            Poll::Ready(outcomes)
        }
    }
}
