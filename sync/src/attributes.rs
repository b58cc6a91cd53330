use futures_util::future::BoxFuture;
use tokio::task::JoinHandle;

use crate::roster::TrackedClient;

/// A display name still being computed. May never resolve, in which
/// case the continuation never runs and the prior rendered name stands.
pub type DeferredName = BoxFuture<'static, String>;

/// Computes a client's rendered display attributes. Team resolution is
/// cheap and cached; display names may depend on remote formatting
/// rules and resolve asynchronously.
pub trait AttributeResolver: Send + Sync {
    fn resolve_team(&self, client: &TrackedClient) -> String;

    fn resolve_display_name(&self, client: &TrackedClient) -> DeferredName;
}

/// Await a deferred name off-task and apply it only if the target still
/// exists. The stale-target case (the target disconnected before the
/// name resolved) is silently discarded, not logged — expected under
/// normal churn.
pub fn apply_if_live(
    name: DeferredName,
    still_live: impl Fn() -> bool + Send + 'static,
    apply: impl FnOnce(String) + Send + 'static,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let resolved = name.await;
        if still_live() {
            apply(resolved);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test]
    async fn test_applies_when_target_live() {
        let applied = Arc::new(Mutex::new(None));
        let sink = applied.clone();

        apply_if_live(
            Box::pin(futures_util::future::ready("Alice".to_string())),
            || true,
            move |name| *sink.lock().unwrap() = Some(name),
        )
        .await
        .unwrap();

        assert_eq!(applied.lock().unwrap().as_deref(), Some("Alice"));
    }

    #[tokio::test]
    async fn test_stale_target_is_discarded() {
        let applied = Arc::new(AtomicBool::new(false));
        let sink = applied.clone();

        apply_if_live(
            Box::pin(futures_util::future::ready("Alice".to_string())),
            || false,
            move |_| sink.store(true, Ordering::SeqCst),
        )
        .await
        .unwrap();

        assert!(!applied.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_liveness_checked_after_resolution() {
        // The target dies while the name is still resolving; the
        // continuation must observe the post-resolution state.
        let live = Arc::new(AtomicBool::new(true));
        let applied = Arc::new(AtomicBool::new(false));
        let (tx, rx) = tokio::sync::oneshot::channel::<String>();

        let probe = live.clone();
        let sink = applied.clone();
        let handle = apply_if_live(
            Box::pin(async move { rx.await.unwrap_or_default() }),
            move || probe.load(Ordering::SeqCst),
            move |_| sink.store(true, Ordering::SeqCst),
        );

        live.store(false, Ordering::SeqCst);
        tx.send("Alice".to_string()).unwrap();
        handle.await.unwrap();

        assert!(!applied.load(Ordering::SeqCst));
    }
}
