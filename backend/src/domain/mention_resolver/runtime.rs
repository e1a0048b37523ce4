//! Background executor seam for fire-and-forget profile lookups.

use std::sync::{Mutex, MutexGuard, PoisonError};

use futures_util::future::BoxFuture;
use tokio::runtime::{Handle, TryCurrentError};
use tokio::task::JoinHandle;
use tracing::warn;

/// Executor that runs resolution tasks without blocking the caller.
///
/// The resolver is invoked from synchronous parser callbacks, so it hands
/// work to an executor instead of awaiting it.
///
/// ```rust
/// use std::sync::Mutex;
///
/// use futures_util::future::BoxFuture;
/// use wiki_backend::domain::BackgroundExecutor;
///
/// #[derive(Default)]
/// struct CountingExecutor(Mutex<usize>);
///
/// impl BackgroundExecutor for CountingExecutor {
///     fn spawn(&self, _task: BoxFuture<'static, ()>) {
///         *self.0.lock().expect("counter mutex") += 1;
///     }
/// }
///
/// let executor = CountingExecutor::default();
/// executor.spawn(Box::pin(async {}));
/// assert_eq!(*executor.0.lock().expect("counter mutex"), 1);
/// ```
pub trait BackgroundExecutor: Send + Sync {
    /// Start `task` and return immediately.
    fn spawn(&self, task: BoxFuture<'static, ()>);
}

/// Tokio-backed executor that remembers the tasks it started.
pub struct TokioExecutor {
    handle: Handle,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl TokioExecutor {
    /// Spawn onto the runtime behind `handle`.
    pub fn new(handle: Handle) -> Self {
        Self {
            handle,
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Spawn onto the runtime the caller is running inside.
    ///
    /// # Errors
    ///
    /// Returns an error when called outside a Tokio runtime.
    pub fn current() -> Result<Self, TryCurrentError> {
        Handle::try_current().map(Self::new)
    }

    /// Number of started tasks that have not finished yet.
    pub fn pending(&self) -> usize {
        self.lock_tasks()
            .iter()
            .filter(|task| !task.is_finished())
            .count()
    }

    /// Wait for every started task, including ones spawned while waiting.
    pub async fn drain(&self) {
        loop {
            let batch = std::mem::take(&mut *self.lock_tasks());
            if batch.is_empty() {
                return;
            }
            for task in batch {
                if let Err(error) = task.await {
                    warn!(error = %error, "profile lookup task did not complete");
                }
            }
        }
    }

    fn lock_tasks(&self) -> MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BackgroundExecutor for TokioExecutor {
    fn spawn(&self, task: BoxFuture<'static, ()>) {
        let join = self.handle.spawn(task);
        let mut tasks = self.lock_tasks();
        tasks.retain(|task| !task.is_finished());
        tasks.push(join);
    }
}
