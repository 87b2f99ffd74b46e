//! Task spawner abstraction
//!
//! The relay runs its producer on a caller-supplied executor rather than a
//! global one, so the execution context stays explicit and injectable in
//! tests. [`TokioSpawner`] is the production implementation.

use futures::future::BoxFuture;

/// Executor handle used to run relay producer tasks
///
/// The relay owns no threads of its own; whoever constructs a
/// [`StreamService`](crate::core::relay::StreamService) decides where
/// producers run.
pub trait TaskSpawner: Send + Sync {
    /// Schedule a task to run to completion in the background
    fn spawn(&self, task: BoxFuture<'static, ()>);
}

/// Spawner backed by the ambient tokio runtime
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSpawner;

impl TaskSpawner for TokioSpawner {
    fn spawn(&self, task: BoxFuture<'static, ()>) {
        tokio::spawn(task);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_tokio_spawner_runs_task() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();

        TokioSpawner.spawn(
            async move {
                flag.store(true, Ordering::SeqCst);
            }
            .boxed(),
        );

        tokio::task::yield_now().await;
        assert!(ran.load(Ordering::SeqCst));
    }
}
