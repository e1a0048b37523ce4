//! Driven port for resolving an account handle to its profile page.
//!
//! The domain owns the discovery document shape and the failure taxonomy so
//! the mention resolver can stay adapter-agnostic.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::AccountHandle;

/// Link relation marking the human-facing profile page.
pub const PROFILE_PAGE_REL: &str = "http://webfinger.net/rel/profile-page";

/// Media type a profile page link must advertise.
pub const PROFILE_PAGE_MEDIA_TYPE: &str = "text/html";

/// One link advertised by a discovery document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiscoveryLink {
    /// Link relation, usually a URI.
    pub rel: String,
    /// Media type of the link target.
    pub media_type: String,
    /// Target URI.
    pub href: String,
}

impl DiscoveryLink {
    /// Return whether this link points at the account's HTML profile page.
    pub fn is_profile_page(&self) -> bool {
        self.rel == PROFILE_PAGE_REL && self.media_type == PROFILE_PAGE_MEDIA_TYPE
    }
}

/// Decoded discovery document describing an account's public links.
///
/// Only `links` is consulted; the document never outlives one resolution.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiscoveryDocument {
    /// Resource the document describes, e.g. `acct:alex@example.org`.
    pub subject: String,
    /// Alternative URIs for the same account.
    pub aliases: Vec<String>,
    /// Links in document order.
    pub links: Vec<DiscoveryLink>,
}

impl DiscoveryDocument {
    /// Return the target of the first profile page link in document order.
    ///
    /// # Examples
    ///
    /// ```
    /// use wiki_backend::domain::ports::{DiscoveryDocument, DiscoveryLink};
    ///
    /// let document = DiscoveryDocument {
    ///     links: vec![DiscoveryLink {
    ///         rel: "http://webfinger.net/rel/profile-page".to_owned(),
    ///         media_type: "text/html".to_owned(),
    ///         href: "https://example.org/@alex".to_owned(),
    ///     }],
    ///     ..DiscoveryDocument::default()
    /// };
    /// assert_eq!(document.profile_page(), Some("https://example.org/@alex"));
    /// ```
    pub fn profile_page(&self) -> Option<&str> {
        self.links
            .iter()
            .find(|link| link.is_profile_page())
            .map(|link| link.href.as_str())
    }
}

define_port_error! {
    /// Errors surfaced while discovering an account's profile page.
    pub enum ProfileDiscoveryError {
        /// The request failed before a successful response body was read.
        Transport { message: String } =>
            "profile discovery transport failed: {message}",
        /// The response body is not a discovery document.
        Decode { message: String } =>
            "profile discovery response decode failed: {message}",
        /// The document decoded but has no profile page link.
        NotFound { subject: String } =>
            "no profile page link in discovery document for {subject:?}",
    }
}

/// Port for looking up the authoritative profile URI of an account.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileDiscoverySource: Send + Sync {
    /// Resolve `handle` to the URI of its human-facing profile page.
    ///
    /// Implementations perform exactly one attempt and never retry.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use wiki_backend::domain::AccountHandle;
    /// use wiki_backend::domain::ports::ProfileDiscoverySource;
    /// use wiki_backend::outbound::webfinger::WebFingerHttpSource;
    ///
    /// let source = WebFingerHttpSource::new()?;
    /// let handle: AccountHandle = "@alex@example.org".parse()?;
    /// let uri = source.discover_profile(&handle).await?;
    /// assert!(uri.starts_with("https://"));
    /// ```
    async fn discover_profile(&self, handle: &AccountHandle)
    -> Result<String, ProfileDiscoveryError>;
}
