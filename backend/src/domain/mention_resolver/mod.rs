//! Inline account mentions with self-correcting profile links.
//!
//! A mention seen for the first time links to a guessed profile URI straight
//! away, so rendering never waits on the network. The guess is written to the
//! [`AccountCache`] before discovery starts; later mentions of the same handle
//! hit the cache instead of starting another lookup. When discovery succeeds
//! the entry is overwritten, and only renders that start afterwards see the
//! corrected URI.
//!
//! Lookup and store are separate critical sections. Two renders that both miss
//! before either stores the guess each start a lookup. The later guess store
//! is unconditional, so it can overwrite a correction that already landed;
//! the entry is corrected again only if that render's own lookup succeeds.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::markup::{InlineExtension, InlineMatch, InlineNode, LinkNode};
use crate::domain::ports::{ProfileDiscoveryError, ProfileDiscoverySource};
use crate::domain::{AccountCache, AccountHandle};

mod grammar;
mod runtime;

pub use grammar::{MentionToken, scan_mention};
pub use runtime::{BackgroundExecutor, TokioExecutor};

/// Recognises `@user@domain` mentions and resolves their profile links.
pub struct MentionResolver {
    cache: Arc<AccountCache>,
    source: Arc<dyn ProfileDiscoverySource>,
    executor: Arc<dyn BackgroundExecutor>,
}

impl MentionResolver {
    /// Build a resolver from its collaborators.
    /// ```rust,ignore
    /// let resolver = MentionResolver::new(cache, Arc::new(source), Arc::new(executor));
    /// ```
    pub fn new(
        cache: Arc<AccountCache>,
        source: Arc<dyn ProfileDiscoverySource>,
        executor: Arc<dyn BackgroundExecutor>,
    ) -> Self {
        Self {
            cache,
            source,
            executor,
        }
    }

    /// Shared cache backing this resolver.
    pub fn cache(&self) -> &Arc<AccountCache> {
        &self.cache
    }

    /// Recognise a mention at `offset` and build its link node.
    ///
    /// Returns `None` when the text at `offset` is not a valid mention.
    pub fn recognise(&self, text: &str, offset: usize) -> Option<InlineMatch> {
        let token = scan_mention(text, offset)?;
        let destination = self.profile_uri(&token.handle);
        Some(InlineMatch {
            consumed: token.consumed,
            node: mention_link(&token.handle, destination),
        })
    }

    /// Return the cached profile URI for `handle`.
    ///
    /// On a miss the guessed URI is stored first and a background lookup is
    /// started; the guess is returned without waiting for it.
    pub fn profile_uri(&self, handle: &AccountHandle) -> String {
        match self.cache.lookup(handle) {
            Some(uri) => uri,
            None => self.start_resolution(handle),
        }
    }

    /// Store the guess for a missed `handle`, spawn its lookup and return the
    /// guess.
    fn start_resolution(&self, handle: &AccountHandle) -> String {
        let guess = handle.guess_profile_uri();
        info!(handle = %handle, guess = %guess, "looking up account profile");
        self.cache.store(handle, guess.clone());

        let source = Arc::clone(&self.source);
        let cache = Arc::clone(&self.cache);
        let handle = handle.clone();
        self.executor.spawn(Box::pin(async move {
            resolve_profile(source.as_ref(), &cache, &handle).await;
        }));
        guess
    }
}

impl InlineExtension for MentionResolver {
    fn trigger(&self) -> char {
        crate::domain::account_handle::HANDLE_SIGIL
    }

    fn parse_inline(&self, text: &str, offset: usize) -> Option<InlineMatch> {
        self.recognise(text, offset)
    }
}

fn mention_link(handle: &AccountHandle, destination: String) -> InlineNode {
    InlineNode::Link(LinkNode {
        destination,
        title: handle.to_string(),
        children: vec![InlineNode::Text(handle.label().to_owned())],
    })
}

/// Discover the profile URI for `handle` and overwrite the cached guess.
///
/// Failures leave the cache untouched; nothing is retried.
async fn resolve_profile(
    source: &dyn ProfileDiscoverySource,
    cache: &AccountCache,
    handle: &AccountHandle,
) {
    match source.discover_profile(handle).await {
        Ok(uri) => {
            info!(handle = %handle, uri = %uri, "found account profile");
            cache.store(handle, uri);
        }
        Err(error @ ProfileDiscoveryError::NotFound { .. }) => {
            warn!(handle = %handle, error = %error, "could not find account profile link");
        }
        Err(error) => {
            warn!(handle = %handle, error = %error, "account profile lookup failed");
        }
    }
}

#[cfg(test)]
mod tests;
