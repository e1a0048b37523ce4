//! WebFinger outbound adapters.
//!
//! This module provides a thin HTTP implementation of the
//! `ProfileDiscoverySource` port plus the response parser it relies on.

mod dto;
mod http_source;
mod parser;

pub use http_source::{DEFAULT_USER_AGENT, DISCOVERY_TIMEOUT, WebFingerHttpSource, discovery_url};
pub use parser::{WebFingerParseError, parse_profile_uri, parse_webfinger};
