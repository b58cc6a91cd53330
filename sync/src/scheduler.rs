use std::time::Duration;

use futures_util::future::BoxFuture;

/// One-shot deferred execution on a neutral context. The task runs
/// exactly once, strictly after the delay, never inline with the
/// scheduling caller, and cannot be cancelled once scheduled.
/// Disconnects during the delay window are handled by liveness
/// re-checks inside the task, not by cancellation.
pub trait UpdateScheduler: Send + Sync {
    fn schedule_once(&self, delay: Duration, task: BoxFuture<'static, ()>);
}

/// Production scheduler: a spawned task that sleeps out the delay.
#[derive(Default)]
pub struct TokioScheduler;

impl UpdateScheduler for TokioScheduler {
    fn schedule_once(&self, delay: Duration, task: BoxFuture<'static, ()>) {
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_runs_after_delay_not_before() {
        let scheduler = TokioScheduler;
        let fired = Arc::new(AtomicBool::new(false));

        let flag = fired.clone();
        scheduler.schedule_once(
            Duration::from_millis(500),
            Box::pin(async move {
                flag.store(true, Ordering::SeqCst);
            }),
        );

        // Not inline with the caller, and not before the delay elapses
        assert!(!fired.load(Ordering::SeqCst));
        tokio::time::sleep(Duration::from_millis(499)).await;
        assert!(!fired.load(Ordering::SeqCst));

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(fired.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_task_fires_once() {
        let scheduler = TokioScheduler;
        let count = Arc::new(std::sync::atomic::AtomicUsize::new(0));

        for _ in 0..3 {
            let count = count.clone();
            scheduler.schedule_once(
                Duration::from_millis(100),
                Box::pin(async move {
                    count.fetch_add(1, Ordering::SeqCst);
                }),
            );
        }

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }
}
