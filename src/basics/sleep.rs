use core::{
    future::Future,
    pin::Pin,
    task::{Context, Poll, Waker},
    time::Duration,
};

use std::{
    sync::{Arc, Condvar, Mutex},
    thread,
    time::Instant,
};

use pin_project::pin_project;

/// Async sleep backed by a dedicated timer thread.
///
/// The thread parks on a condvar until the deadline passes, so dropping the
/// [`Sleep`] before it fires lets the thread exit early instead of lingering
/// for the full duration. A realistic implementation would register with a
/// reactor owning a timer wheel.
pub fn sleep(duration: Duration) -> Sleep {
    Sleep {
        duration,
        timer: None,
    }
}

#[derive(Default)]
struct State {
    waker: Option<Waker>,
    fired: bool,
    abandoned: bool,
}

#[derive(Default)]
struct Shared {
    state: Mutex<State>,
    wakeup: Condvar,
}

/// Owning handle to a running timer thread. Dropping it releases the thread.
struct Timer(Arc<Shared>);

impl Timer {
    fn start(duration: Duration, waker: Waker) -> Self {
        let shared = Arc::new(Shared::default());
        shared.state.lock().unwrap().waker = Some(waker);

        thread::spawn({
            let shared = Arc::clone(&shared);
            move || run_timer(&shared, Instant::now() + duration)
        });

        #[cfg(test)]
        watch::record(&shared);

        Self(shared)
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        let mut state = self.0.state.lock().unwrap();
        state.abandoned = true;
        state.waker = None;
        self.0.wakeup.notify_one();
    }
}

fn run_timer(shared: &Shared, deadline: Instant) {
    let mut state = shared.state.lock().unwrap();
    loop {
        if state.abandoned {
            return;
        }
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        state = shared.wakeup.wait_timeout(state, deadline - now).unwrap().0;
    }

    state.fired = true;
    let waker = state.waker.take();
    drop(state);
    if let Some(waker) = waker {
        waker.wake();
    }
}

/// Timers started by the current thread, so tests can check their threads
/// exit once the owning future settles.
#[cfg(test)]
pub(crate) mod watch {
    use std::{
        cell::RefCell,
        sync::{Arc, Weak},
    };

    use super::Shared;

    thread_local! {
        static STARTED: RefCell<Vec<TimerWatch>> = RefCell::new(Vec::new());
    }

    pub(crate) struct TimerWatch(Weak<Shared>);

    impl TimerWatch {
        /// False once both the owning `Sleep` and the timer thread are gone.
        pub(crate) fn is_alive(&self) -> bool {
            self.0.strong_count() > 0
        }
    }

    pub(super) fn record(shared: &Arc<Shared>) {
        STARTED.with(|started| started.borrow_mut().push(TimerWatch(Arc::downgrade(shared))));
    }

    pub(crate) fn take_started_timers() -> Vec<TimerWatch> {
        STARTED.with(|started| started.take())
    }
}

#[cfg(test)]
pub(crate) use watch::take_started_timers;

#[pin_project]
pub struct Sleep {
    duration: Duration,
    timer: Option<Timer>,
}

impl Sleep {
    /// How long this sleep waits once first polled.
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl Future for Sleep {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let duration = *this.duration;

        // the deadline is measured from the first poll, not from construction.
        let timer = this
            .timer
            .get_or_insert_with(|| Timer::start(duration, cx.waker().clone()));

        let mut state = timer.0.state.lock().unwrap();
        if state.fired {
            return Poll::Ready(());
        }

        // keep the most recent waker in case we moved between tasks.
        match &mut state.waker {
            Some(waker) => waker.clone_from(cx.waker()),
            None => state.waker = Some(cx.waker().clone()),
        }
        Poll::Pending
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use futures_lite::future::{block_on, or, poll_once};

    use super::*;

    #[test]
    fn works() {
        const DURATION: Duration = Duration::from_millis(50);
        let start = Instant::now();
        block_on(sleep(DURATION));
        assert!(start.elapsed() >= DURATION);
    }

    #[test]
    fn zero_duration_completes() {
        block_on(sleep(Duration::ZERO));
    }

    #[test]
    fn shorter_sleep_wins_without_waiting_for_longer() {
        let start = Instant::now();
        let shorter = or(
            async {
                sleep(Duration::from_millis(20)).await;
                "short"
            },
            async {
                sleep(Duration::from_secs(10)).await;
                "long"
            },
        );
        assert_eq!(block_on(shorter), "short");
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn dropping_sleep_releases_timer_thread() {
        let mut pending = sleep(Duration::from_secs(10));
        assert!(block_on(poll_once(&mut pending)).is_none());

        let shared = Arc::downgrade(&pending.timer.as_ref().unwrap().0);
        drop(pending);

        let start = Instant::now();
        while shared.strong_count() > 0 {
            assert!(
                start.elapsed() < Duration::from_secs(1),
                "timer thread outlived its sleep"
            );
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn unpolled_sleep_never_starts() {
        let pending = sleep(Duration::from_millis(5));
        assert!(pending.timer.is_none());
        assert_eq!(pending.duration(), Duration::from_millis(5));
    }
}
