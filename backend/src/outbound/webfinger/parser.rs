//! WebFinger response parsing and profile link extraction.

use thiserror::Error;

use super::dto::WebFingerDto;
use crate::domain::ports::{DiscoveryDocument, ProfileDiscoveryError};

/// Errors raised while extracting a profile URI from a WebFinger body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebFingerParseError {
    /// The body is not a WebFinger JSON document.
    #[error("invalid WebFinger JSON payload: {message}")]
    Decode {
        /// Decoder diagnostic.
        message: String,
    },
    /// The document decoded but holds no HTML profile page link.
    #[error("no profile page link in WebFinger document for {:?}", subject_of(.document))]
    NotFound {
        /// The document as decoded.
        document: DiscoveryDocument,
    },
}

fn subject_of(document: &DiscoveryDocument) -> &str {
    document.subject.as_str()
}

impl From<WebFingerParseError> for ProfileDiscoveryError {
    fn from(error: WebFingerParseError) -> Self {
        match error {
            WebFingerParseError::Decode { message } => Self::decode(message),
            WebFingerParseError::NotFound { document } => Self::not_found(document.subject),
        }
    }
}

/// Decode a WebFinger body into a discovery document.
///
/// # Errors
///
/// Returns [`WebFingerParseError::Decode`] when the body is not a JSON object
/// of the expected shape.
pub fn parse_webfinger(body: &[u8]) -> Result<DiscoveryDocument, WebFingerParseError> {
    let decoded: WebFingerDto =
        serde_json::from_slice(body).map_err(|error| WebFingerParseError::Decode {
            message: error.to_string(),
        })?;
    Ok(decoded.into_domain_document())
}

/// Extract the profile page URI from a WebFinger body.
///
/// The first link with relation `http://webfinger.net/rel/profile-page` and
/// type `text/html` wins.
///
/// # Errors
///
/// Returns [`WebFingerParseError::Decode`] for malformed bodies and
/// [`WebFingerParseError::NotFound`], carrying the decoded document, when no
/// link qualifies.
///
/// # Examples
/// ```
/// use wiki_backend::outbound::webfinger::parse_profile_uri;
///
/// let body = br#"{
///     "subject": "acct:alex@example.org",
///     "links": [{
///         "rel": "http://webfinger.net/rel/profile-page",
///         "type": "text/html",
///         "href": "https://example.org/@alex"
///     }]
/// }"#;
/// assert_eq!(
///     parse_profile_uri(body).as_deref(),
///     Ok("https://example.org/@alex")
/// );
/// ```
pub fn parse_profile_uri(body: &[u8]) -> Result<String, WebFingerParseError> {
    let document = parse_webfinger(body)?;
    match document.profile_page() {
        Some(href) => Ok(href.to_owned()),
        None => Err(WebFingerParseError::NotFound { document }),
    }
}
