//! Loading-flag wrappers around store operations.
//!
//! [`run_command`] wraps mutations and may re-run a refetch afterwards;
//! [`run_query`] wraps reads and may trigger a dependent follow-up. Both hold
//! a [`LoadingGuard`] for the whole call, so the flag is released on return,
//! on panic and when the future is dropped mid-flight. The wrapped
//! operation's value is returned untouched.

use std::future::Future;
use std::sync::Mutex;

use clinic_core::OperationResult;
use tokio::sync::watch;

/// Whether a wrapped operation's value counts as success, which decides if
/// the refetch or follow-up runs.
pub trait Outcome {
    fn succeeded(&self) -> bool;
}

impl Outcome for OperationResult {
    fn succeeded(&self) -> bool {
        self.is_success()
    }
}

impl<T, E> Outcome for Result<T, E> {
    fn succeeded(&self) -> bool {
        self.is_ok()
    }
}

/// A skipped step (`None`) counts as success.
impl<T: Outcome> Outcome for Option<T> {
    fn succeeded(&self) -> bool {
        self.as_ref().is_none_or(Outcome::succeeded)
    }
}

/// Loading flag backed by an in-flight counter.
///
/// The published flag is `true` while at least one guarded call is running.
/// Each call moves the counter up and back down exactly once.
#[derive(Debug)]
pub struct LoadingTracker {
    in_flight: Mutex<usize>,
    flag: watch::Sender<bool>,
}

impl Default for LoadingTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadingTracker {
    pub fn new() -> Self {
        let (flag, _) = watch::channel(false);
        Self {
            in_flight: Mutex::new(0),
            flag,
        }
    }

    pub fn is_loading(&self) -> bool {
        *self.flag.borrow()
    }

    pub fn in_flight(&self) -> usize {
        *self.lock()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.flag.subscribe()
    }

    pub fn begin(&self) -> LoadingGuard<'_> {
        let mut count = self.lock();
        *count += 1;
        self.flag.send_if_modified(|flag| !std::mem::replace(flag, true));
        LoadingGuard { tracker: self }
    }

    fn end(&self) {
        let mut count = self.lock();
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.flag.send_if_modified(|flag| std::mem::replace(flag, false));
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, usize> {
        // The counter is a plain integer; a poisoned lock still holds a usable value.
        self.in_flight.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Releases one in-flight slot on drop.
#[must_use = "the loading flag is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct LoadingGuard<'a> {
    tracker: &'a LoadingTracker,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.tracker.end();
    }
}

/// Run a mutating operation under the loading flag, then `refetch` if the
/// operation succeeded. The refetch's own result is logged and discarded.
pub async fn run_command<T, Op, Re>(tracker: &LoadingTracker, op: Op, refetch: Option<Re>) -> T
where
    T: Outcome,
    Op: Future<Output = T>,
    Re: Future,
    Re::Output: Outcome,
{
    let _guard = tracker.begin();
    let value = op.await;
    if value.succeeded()
        && let Some(refetch) = refetch
        && !refetch.await.succeeded()
    {
        tracing::warn!("refetch after command did not succeed");
    }
    value
}

/// Run a read operation under the loading flag, then `follow_up` if the read
/// succeeded.
pub async fn run_query<T, Op, Fu>(tracker: &LoadingTracker, op: Op, follow_up: Option<Fu>) -> T
where
    T: Outcome,
    Op: Future<Output = T>,
    Fu: Future,
    Fu::Output: Outcome,
{
    let _guard = tracker.begin();
    let value = op.await;
    if value.succeeded()
        && let Some(follow_up) = follow_up
        && !follow_up.await.succeeded()
    {
        tracing::warn!("follow-up after query did not succeed");
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Ready;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    type NoFollowUp = Ready<OperationResult>;

    async fn explode() -> OperationResult {
        panic!("operation blew up")
    }

    #[tokio::test]
    async fn test_flag_true_only_while_running() {
        let tracker = LoadingTracker::new();
        assert!(!tracker.is_loading());

        let result = run_command(
            &tracker,
            async {
                assert!(tracker.is_loading());
                OperationResult::success("done", 200)
            },
            None::<NoFollowUp>,
        )
        .await;

        assert_eq!(result.message, "done");
        assert!(!tracker.is_loading());
        assert_eq!(tracker.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_value_propagates_unchanged() {
        let tracker = LoadingTracker::new();
        let value: Result<u32, String> =
            run_query(&tracker, async { Err("boom".to_string()) }, None::<NoFollowUp>).await;
        assert_eq!(value, Err("boom".to_string()));
        assert!(!tracker.is_loading());
    }

    #[tokio::test]
    async fn test_refetch_runs_only_after_success() {
        let tracker = LoadingTracker::new();
        let ran = AtomicBool::new(false);

        run_command(
            &tracker,
            async { OperationResult::error("nope", 400) },
            Some(async {
                ran.store(true, Ordering::SeqCst);
                OperationResult::success("refetched", 200)
            }),
        )
        .await;
        assert!(!ran.load(Ordering::SeqCst));

        run_command(
            &tracker,
            async { OperationResult::success("ok", 200) },
            Some(async {
                assert!(tracker.is_loading());
                ran.store(true, Ordering::SeqCst);
                OperationResult::success("refetched", 200)
            }),
        )
        .await;
        assert!(ran.load(Ordering::SeqCst));
        assert!(!tracker.is_loading());
    }

    #[tokio::test]
    async fn test_skipped_follow_up_is_not_a_failure() {
        let tracker = LoadingTracker::new();
        let value = run_query(
            &tracker,
            async { OperationResult::success("listed", 200) },
            Some(async { None::<OperationResult> }),
        )
        .await;
        assert!(value.is_success());
        assert!(None::<OperationResult>.succeeded());
        assert!(!Some(OperationResult::error("nope", 500)).succeeded());
    }

    #[tokio::test]
    async fn test_flag_released_on_panic() {
        let tracker = Arc::new(LoadingTracker::new());
        let inner = Arc::clone(&tracker);
        let handle = tokio::spawn(async move {
            run_command(&inner, explode(), None::<NoFollowUp>).await
        });
        assert!(handle.await.is_err());
        assert!(!tracker.is_loading());
        assert_eq!(tracker.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_flag_released_on_cancellation() {
        let tracker = LoadingTracker::new();
        let pending = run_query(
            &tracker,
            async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                OperationResult::success("late", 200)
            },
            None::<NoFollowUp>,
        );
        let timed_out = tokio::time::timeout(Duration::from_millis(20), pending).await;
        assert!(timed_out.is_err());
        assert!(!tracker.is_loading());
    }

    #[tokio::test]
    async fn test_overlapping_calls_keep_flag_until_last() {
        let tracker = LoadingTracker::new();
        let first = tracker.begin();
        let second = tracker.begin();
        assert_eq!(tracker.in_flight(), 2);
        drop(first);
        assert!(tracker.is_loading());
        drop(second);
        assert!(!tracker.is_loading());
    }

    #[tokio::test]
    async fn test_subscribers_see_transitions() {
        let tracker = LoadingTracker::new();
        let mut rx = tracker.subscribe();
        {
            let _guard = tracker.begin();
            assert!(rx.has_changed().unwrap());
            assert!(*rx.borrow_and_update());
        }
        assert!(rx.has_changed().unwrap());
        assert!(!*rx.borrow_and_update());
    }
}
