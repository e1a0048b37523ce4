//! Test utilities for the backend crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is only compiled when running tests or
//! when the `test-support` feature is enabled.

pub mod mentions {
    //! Deterministic doubles for the mention resolver's collaborators.

    use std::collections::{HashMap, VecDeque};
    use std::sync::{Mutex, MutexGuard, PoisonError};

    use async_trait::async_trait;
    use futures_util::future::BoxFuture;

    use crate::domain::AccountHandle;
    use crate::domain::BackgroundExecutor;
    use crate::domain::ports::{ProfileDiscoveryError, ProfileDiscoverySource};

    fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
        mutex.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Executor that queues tasks until the test chooses to run them.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use wiki_backend::domain::BackgroundExecutor;
    /// use wiki_backend::test_support::mentions::DeferredExecutor;
    ///
    /// # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
    /// let executor = DeferredExecutor::default();
    /// executor.spawn(Box::pin(async {}));
    /// assert_eq!(executor.pending(), 1);
    ///
    /// assert_eq!(executor.run_pending().await, 1);
    /// assert_eq!(executor.pending(), 0);
    /// # });
    /// ```
    #[derive(Default)]
    pub struct DeferredExecutor {
        queue: Mutex<VecDeque<BoxFuture<'static, ()>>>,
        spawned: Mutex<usize>,
    }

    impl DeferredExecutor {
        /// Number of queued tasks.
        pub fn pending(&self) -> usize {
            lock(&self.queue).len()
        }

        /// Total number of tasks ever spawned.
        pub fn spawned(&self) -> usize {
            *lock(&self.spawned)
        }

        /// Run queued tasks in spawn order and return how many ran.
        pub async fn run_pending(&self) -> usize {
            let mut ran = 0;
            loop {
                let next = lock(&self.queue).pop_front();
                let Some(task) = next else {
                    return ran;
                };
                task.await;
                ran += 1;
            }
        }
    }

    impl BackgroundExecutor for DeferredExecutor {
        fn spawn(&self, task: BoxFuture<'static, ()>) {
            lock(&self.queue).push_back(task);
            *lock(&self.spawned) += 1;
        }
    }

    /// Discovery source returning scripted results per handle.
    ///
    /// Unscripted handles fail with a transport error.
    #[derive(Default)]
    pub struct ScriptedDiscoverySource {
        responses: Mutex<HashMap<String, Result<String, ProfileDiscoveryError>>>,
        calls: Mutex<Vec<AccountHandle>>,
    }

    impl ScriptedDiscoverySource {
        /// Script the result returned for `handle`.
        #[must_use]
        pub fn with_response(
            self,
            handle: &str,
            response: Result<String, ProfileDiscoveryError>,
        ) -> Self {
            lock(&self.responses).insert(handle.to_owned(), response);
            self
        }

        /// Script a successful lookup for `handle`.
        #[must_use]
        pub fn with_profile(self, handle: &str, uri: &str) -> Self {
            self.with_response(handle, Ok(uri.to_owned()))
        }

        /// Handles looked up so far, in call order.
        pub fn calls(&self) -> Vec<AccountHandle> {
            lock(&self.calls).clone()
        }

        /// Number of lookups performed so far.
        pub fn call_count(&self) -> usize {
            lock(&self.calls).len()
        }
    }

    #[async_trait]
    impl ProfileDiscoverySource for ScriptedDiscoverySource {
        async fn discover_profile(
            &self,
            handle: &AccountHandle,
        ) -> Result<String, ProfileDiscoveryError> {
            lock(&self.calls).push(handle.clone());
            lock(&self.responses)
                .get(handle.as_str())
                .cloned()
                .unwrap_or_else(|| {
                    Err(ProfileDiscoveryError::transport(format!(
                        "no scripted response for {handle}"
                    )))
                })
        }
    }
}
