use std::{
    future::Future,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

/// What a `cancel()` call observed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CancelOutcome {
    /// The cancel won: the callback had not fired and never will.
    Canceled,
    /// The timer had already fired (or was already canceled); the callback's
    /// fate was decided before this call.
    AlreadyResolved,
}

/// A one-shot, cancelable deadline.
///
/// The callback runs no earlier than `delay` after arming, on its own task.
/// Firing and cancellation are mutually exclusive: both sides race through a
/// single compare-and-swap on `resolved`, so exactly one of them wins even
/// when a cancel arrives while the deadline task is waking up.
pub struct DeadlineTimer {
    resolved: Arc<AtomicBool>,
    cancel: CancellationToken,
}

impl DeadlineTimer {
    /// Schedule `on_fire` to run once after `delay`, without blocking the caller.
    pub fn arm<F>(delay: Duration, on_fire: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let resolved = Arc::new(AtomicBool::new(false));
        let cancel = CancellationToken::new();

        let flag = Arc::clone(&resolved);
        let token = cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
              _ = token.cancelled() => {}
              _ = sleep(delay) => {
                if flag
                    .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
                    .is_ok()
                {
                    on_fire.await;
                }
              }
            }
        });

        Self { resolved, cancel }
    }

    /// Prevent a not-yet-fired callback from running.
    ///
    /// Safe to call at any time and any number of times; only the first call
    /// that beats the deadline observes `Canceled`.
    pub fn cancel(&self) -> CancelOutcome {
        if self
            .resolved
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            // Wake the deadline task so it releases whatever the callback captured.
            self.cancel.cancel();
            CancelOutcome::Canceled
        } else {
            CancelOutcome::AlreadyResolved
        }
    }

    /// Whether the race has been decided (either side).
    pub fn is_resolved(&self) -> bool {
        self.resolved.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[tokio::test]
    async fn fires_once_after_delay() {
        let fired = Arc::new(AtomicUsize::new(0));
        let f = Arc::clone(&fired);
        let timer = DeadlineTimer::arm(Duration::from_millis(10), async move {
            f.fetch_add(1, Ordering::SeqCst);
        });

        assert!(!timer.is_resolved());
        sleep(Duration::from_millis(80)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(timer.is_resolved());
        assert_eq!(timer.cancel(), CancelOutcome::AlreadyResolved);
    }

    #[tokio::test]
    async fn cancel_before_fire_suppresses_callback() {
        let fired = Arc::new(AtomicUsize::new(0));
        let f = Arc::clone(&fired);
        let timer = DeadlineTimer::arm(Duration::from_millis(50), async move {
            f.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(timer.cancel(), CancelOutcome::Canceled);
        sleep(Duration::from_millis(120)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn double_cancel_is_harmless() {
        let timer = DeadlineTimer::arm(Duration::from_millis(50), async {});
        assert_eq!(timer.cancel(), CancelOutcome::Canceled);
        assert_eq!(timer.cancel(), CancelOutcome::AlreadyResolved);
        assert_eq!(timer.cancel(), CancelOutcome::AlreadyResolved);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn cancel_racing_fire_has_exactly_one_winner() {
        for _ in 0..100 {
            let fired = Arc::new(AtomicUsize::new(0));
            let f = Arc::clone(&fired);
            let timer = Arc::new(DeadlineTimer::arm(Duration::from_micros(200), async move {
                f.fetch_add(1, Ordering::SeqCst);
            }));

            let t = Arc::clone(&timer);
            let outcome = tokio::spawn(async move { t.cancel() }).await.unwrap();

            // Let the deadline task settle, then check exclusivity: the round
            // ended in exactly one of {fired, canceled}.
            sleep(Duration::from_millis(5)).await;
            match outcome {
                CancelOutcome::Canceled => assert_eq!(fired.load(Ordering::SeqCst), 0),
                CancelOutcome::AlreadyResolved => assert_eq!(fired.load(Ordering::SeqCst), 1),
            }
        }
    }
}
