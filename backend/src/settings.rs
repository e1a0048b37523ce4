//! Mention resolver configuration loaded via OrthoConfig.

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::webfinger::DEFAULT_USER_AGENT;

/// Configuration values for the mention resolver and its binaries.
///
/// The discovery timeout has no setting; it is fixed in the HTTP adapter.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "WIKI_MENTIONS")]
pub struct MentionSettings {
    /// User-agent sent with WebFinger requests.
    pub user_agent: Option<String>,
    /// Emit logs as JSON lines instead of human-readable text.
    #[ortho_config(default = false)]
    pub json_logs: bool,
}

impl MentionSettings {
    /// Return the configured user-agent, falling back to the default.
    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }
}
