//! Account-mention resolver for the wiki backend.
//!
//! Markup mentions such as `@alex@example.org` become profile links. The first
//! render uses a guessed URI; a background WebFinger lookup corrects the shared
//! cache so later renders link to the authoritative profile page.

pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use domain::{AccountCache, AccountHandle, MentionResolver};
pub use settings::MentionSettings;
