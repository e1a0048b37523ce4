//! In-memory mapping from account handles to profile URIs.
//!
//! The cache starts empty, is never evicted and is not persisted: every
//! process repopulates it as pages are rendered. Both operations are pure
//! in-memory work, so the lock is never held across network I/O.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::AccountHandle;

/// Concurrent handle-to-URI cache shared by every render.
///
/// Readers proceed in parallel; writers are serialised and never expose a
/// half-written entry.
///
/// # Examples
/// ```
/// use wiki_backend::domain::{AccountCache, AccountHandle};
///
/// let cache = AccountCache::new();
/// let handle: AccountHandle = "@alex@example.org".parse().expect("valid handle");
/// assert_eq!(cache.lookup(&handle), None);
///
/// cache.store(&handle, "https://example.org/@alex");
/// assert_eq!(cache.lookup(&handle).as_deref(), Some("https://example.org/@alex"));
/// ```
#[derive(Debug, Default)]
pub struct AccountCache {
    uris: RwLock<HashMap<AccountHandle, String>>,
}

impl AccountCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the URI stored for `handle`, if any.
    pub fn lookup(&self, handle: &AccountHandle) -> Option<String> {
        self.read().get(handle).cloned()
    }

    /// Store `uri` for `handle`, replacing any previous value.
    pub fn store(&self, handle: &AccountHandle, uri: impl Into<String>) {
        self.write().insert(handle.clone(), uri.into());
    }

    /// Number of handles seen so far.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Return `true` when no handle has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // A panicking writer cannot leave a torn entry behind: `insert` either
    // ran or it did not, so poisoned guards are safe to recover.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<AccountHandle, String>> {
        self.uris.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<AccountHandle, String>> {
        self.uris.write().unwrap_or_else(PoisonError::into_inner)
    }
}
