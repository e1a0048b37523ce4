//! Reqwest-backed WebFinger discovery adapter.
//!
//! This adapter owns transport details only: URL construction, the fixed
//! request timeout, error-vs-success status mapping, and handing the body to
//! the WebFinger parser. It performs a single attempt per lookup.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use url::Url;

use super::parser::parse_profile_uri;
use crate::domain::AccountHandle;
use crate::domain::ports::{ProfileDiscoveryError, ProfileDiscoverySource};

/// Upper bound on one discovery exchange. Not configurable.
pub const DISCOVERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Default user-agent sent with discovery requests.
pub const DEFAULT_USER_AGENT: &str = "wiki-backend-webfinger/0.1";

const WEBFINGER_PATH: &str = "/.well-known/webfinger";
const ACCEPT_JRD: &str = "application/jrd+json, application/json";

/// Discovery source that performs HTTP GET requests against each account's
/// own domain.
pub struct WebFingerHttpSource {
    client: Client,
    user_agent: String,
}

impl WebFingerHttpSource {
    /// Build an adapter with the default user-agent.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_user_agent(DEFAULT_USER_AGENT)
    }

    /// Build an adapter sending `user_agent` with every request.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_user_agent(user_agent: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(DISCOVERY_TIMEOUT).build()?;
        Ok(Self {
            client,
            user_agent: user_agent.into(),
        })
    }
}

/// WebFinger endpoint for `handle`:
/// `https://{domain}/.well-known/webfinger?resource=acct:{user}@{domain}`.
///
/// # Errors
///
/// Returns [`ProfileDiscoveryError::Transport`] when the domain does not form
/// a valid URL host.
///
/// # Examples
/// ```
/// use wiki_backend::domain::AccountHandle;
/// use wiki_backend::outbound::webfinger::discovery_url;
///
/// let handle: AccountHandle = "@alex@example.org".parse().expect("valid handle");
/// let url = discovery_url(&handle).expect("valid url");
/// assert_eq!(
///     url.as_str(),
///     "https://example.org/.well-known/webfinger?resource=acct:alex@example.org"
/// );
/// ```
pub fn discovery_url(handle: &AccountHandle) -> Result<Url, ProfileDiscoveryError> {
    let mut url = Url::parse(&format!("https://{}{WEBFINGER_PATH}", handle.domain()))
        .map_err(|error| {
            ProfileDiscoveryError::transport(format!(
                "invalid discovery URL for {handle}: {error}"
            ))
        })?;
    url.set_query(Some(&format!("resource={}", handle.webfinger_resource())));
    Ok(url)
}

#[async_trait]
impl ProfileDiscoverySource for WebFingerHttpSource {
    async fn discover_profile(
        &self,
        handle: &AccountHandle,
    ) -> Result<String, ProfileDiscoveryError> {
        let url = discovery_url(handle)?;
        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, self.user_agent.as_str())
            .header(reqwest::header::ACCEPT, ACCEPT_JRD)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        parse_profile_uri(body.as_ref()).map_err(ProfileDiscoveryError::from)
    }
}

fn map_transport_error(error: reqwest::Error) -> ProfileDiscoveryError {
    ProfileDiscoveryError::transport(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ProfileDiscoveryError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };
    ProfileDiscoveryError::transport(message)
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
