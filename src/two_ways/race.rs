//! Two futures are polled concurrently and the first to finish wins. `a` is
//! polled first, so when both are ready on the same poll `a` is reported.
//!
//! The loser is neither awaited nor dropped: it comes back inside [`Raced`]
//! still pending. Awaiting it lets it run to completion; dropping it cancels
//! it.

use core::{fmt, future::Future};

/// Which input of a race finished first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Winner {
    A,
    B,
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => f.write_str("A"),
            Self::B => f.write_str("B"),
        }
    }
}

/// Result of a race: the winner's output and the still-pending loser.
#[must_use = "dropping `Raced` cancels the losing future"]
pub enum Raced<A: Future, B: Future> {
    A(A::Output, B),
    B(B::Output, A),
}

impl<A: Future, B: Future> Raced<A, B> {
    pub fn winner(&self) -> Winner {
        match self {
            Self::A(..) => Winner::A,
            Self::B(..) => Winner::B,
        }
    }

    /// Wait for the loser as well, returning `(a, b)` outputs.
    pub async fn finish(self) -> (A::Output, B::Output) {
        match self {
            Self::A(a, loser) => (a, loser.await),
            Self::B(b, loser) => (loser.await, b),
        }
    }
}

impl<A, B> Raced<A, B>
where
    A: Future<Output = B::Output>,
    B: Future,
{
    /// The winning output, dropping the loser.
    pub fn into_output(self) -> A::Output {
        match self {
            Self::A(out, _) | Self::B(out, _) => out,
        }
    }
}

pub mod auto {
    use core::future::Future;

    use futures_lite::future;

    use super::Raced;

    enum First<A, B> {
        A(A),
        B(B),
    }

    pub async fn race<A, B>(mut a: A, mut b: B) -> Raced<A, B>
    where
        A: Future + Unpin,
        B: Future + Unpin,
    {
        let first = future::or(
            async { First::A((&mut a).await) },
            async { First::B((&mut b).await) },
        )
        .await;

        match first {
            First::A(out) => Raced::A(out, b),
            First::B(out) => Raced::B(out, a),
        }
    }
}

pub mod manual {
    use core::{
        future::Future,
        pin::Pin,
        task::{Context, Poll},
    };

    use super::Raced;

    pub async fn race<A, B>(a: A, b: B) -> Raced<A, B>
    where
        A: Future + Unpin,
        B: Future + Unpin,
    {
        Race {
            a: Some(a),
            b: Some(b),
        }
        .await
    }

    struct Race<A, B> {
        a: Option<A>,
        b: Option<B>,
    }

    impl<A, B> Future for Race<A, B>
    where
        A: Future + Unpin,
        B: Future + Unpin,
    {
        type Output = Raced<A, B>;

        fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
            let this = &mut *self;
            let (Some(a), Some(b)) = (this.a.as_mut(), this.b.as_mut()) else {
                panic!("`Race` polled after completion");
            };

            if let Poll::Ready(out) = Pin::new(a).poll(cx) {
                this.a = None;
                if let Some(loser) = this.b.take() {
                    return Poll::Ready(Raced::A(out, loser));
                }
            } else if let Poll::Ready(out) = Pin::new(b).poll(cx) {
                this.b = None;
                if let Some(loser) = this.a.take() {
                    return Poll::Ready(Raced::B(out, loser));
                }
            }
            Poll::Pending
        }
    }
}
