//! Three dependent steps run back to back. Step 2 receives step 1's output,
//! step 3 receives both. The first failure aborts the chain and is returned
//! unchanged; later steps are never constructed.

pub mod auto {
    use core::future::Future;

    pub async fn chain<A, B, C, E, F1, F2, Fut2, F3, Fut3>(
        first: F1,
        second: F2,
        third: F3,
    ) -> Result<C, E>
    where
        A: Clone,
        F1: Future<Output = Result<A, E>>,
        F2: FnOnce(A) -> Fut2,
        Fut2: Future<Output = Result<B, E>>,
        F3: FnOnce(A, B) -> Fut3,
        Fut3: Future<Output = Result<C, E>>,
    {
        let a = first.await?;
        let b = second(a.clone()).await?;
        third(a, b).await
    }
}

pub mod manual {
    use core::{
        future::Future,
        pin::Pin,
        task::{Context, Poll},
    };
    use std::task::ready;

    use pin_project::pin_project;

    pub async fn chain<A, B, C, E, F1, F2, Fut2, F3, Fut3>(
        first: F1,
        second: F2,
        third: F3,
    ) -> Result<C, E>
    where
        A: Clone,
        F1: Future<Output = Result<A, E>>,
        F2: FnOnce(A) -> Fut2,
        Fut2: Future<Output = Result<B, E>>,
        F3: FnOnce(A, B) -> Fut3,
        Fut3: Future<Output = Result<C, E>>,
    {
        Chain::<F1, F2, Fut2, F3, Fut3, A> {
            stage: Stage::First(first),
            second: Some(second),
            third: Some(third),
        }
        .await
    }

    #[pin_project(project = StageProj)]
    enum Stage<F1, Fut2, Fut3, A> {
        First(#[pin] F1),
        Second {
            first: Option<A>,
            #[pin]
            fut: Fut2,
        },
        Third(#[pin] Fut3),
        Done,
    }

    #[pin_project]
    struct Chain<F1, F2, Fut2, F3, Fut3, A> {
        #[pin]
        stage: Stage<F1, Fut2, Fut3, A>,
        second: Option<F2>,
        third: Option<F3>,
    }

    impl<A, B, C, E, F1, F2, Fut2, F3, Fut3> Future for Chain<F1, F2, Fut2, F3, Fut3, A>
    where
        A: Clone,
        F1: Future<Output = Result<A, E>>,
        F2: FnOnce(A) -> Fut2,
        Fut2: Future<Output = Result<B, E>>,
        F3: FnOnce(A, B) -> Fut3,
        Fut3: Future<Output = Result<C, E>>,
    {
        type Output = Result<C, E>;

        fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
            let mut this = self.project();
            loop {
                match this.stage.as_mut().project() {
                    StageProj::First(fut) => match ready!(fut.poll(cx)) {
                        Ok(a) => {
                            let second = this.second.take().expect("step 2 started twice");
                            let fut = second(a.clone());
                            this.stage.set(Stage::Second {
                                first: Some(a),
                                fut,
                            });
                        }
                        Err(e) => {
                            this.stage.set(Stage::Done);
                            return Poll::Ready(Err(e));
                        }
                    },
                    StageProj::Second { first, fut } => {
                        let result = ready!(fut.poll(cx));
                        let a = first.take().expect("step 1 output consumed twice");
                        match result {
                            Ok(b) => {
                                let third = this.third.take().expect("step 3 started twice");
                                this.stage.set(Stage::Third(third(a, b)));
                            }
                            Err(e) => {
                                this.stage.set(Stage::Done);
                                return Poll::Ready(Err(e));
                            }
                        }
                    }
                    StageProj::Third(fut) => {
                        let out = ready!(fut.poll(cx));
                        this.stage.set(Stage::Done);
                        return Poll::Ready(out);
                    }
                    StageProj::Done => panic!("`Chain` polled after completion"),
                }
            }
        }
    }
}
