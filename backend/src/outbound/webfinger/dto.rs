//! DTOs for decoding WebFinger JSON responses.
//!
//! The parser decodes into these transport DTOs first, then maps into the
//! domain `DiscoveryDocument` in one pass. Missing fields decode as empty.

use serde::Deserialize;

use crate::domain::ports::{DiscoveryDocument, DiscoveryLink};

#[derive(Debug, Deserialize)]
pub(super) struct WebFingerDto {
    #[serde(default)]
    pub(super) subject: String,
    #[serde(default)]
    pub(super) aliases: Vec<String>,
    #[serde(default)]
    pub(super) links: Vec<WebFingerLinkDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct WebFingerLinkDto {
    #[serde(default)]
    pub(super) rel: String,
    #[serde(rename = "type", default)]
    pub(super) media_type: String,
    #[serde(default)]
    pub(super) href: String,
}

impl WebFingerDto {
    pub(super) fn into_domain_document(self) -> DiscoveryDocument {
        DiscoveryDocument {
            subject: self.subject,
            aliases: self.aliases,
            links: self
                .links
                .into_iter()
                .map(WebFingerLinkDto::into_domain_link)
                .collect(),
        }
    }
}

impl WebFingerLinkDto {
    fn into_domain_link(self) -> DiscoveryLink {
        DiscoveryLink {
            rel: self.rel,
            media_type: self.media_type,
            href: self.href,
        }
    }
}
