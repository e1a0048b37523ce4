//! Domain primitives and orchestration for account mentions.
//!
//! Purpose: recognise `@user@domain` mentions in markup, link them to a
//! profile page immediately, and correct that link once discovery completes.
//! Nothing here performs I/O directly; network access sits behind
//! [`ports::ProfileDiscoverySource`] and task scheduling behind
//! [`BackgroundExecutor`].
//!
//! Public surface:
//! - AccountHandle: validated `@user@domain` identifier.
//! - AccountCache: concurrent handle-to-URI map shared by all renders.
//! - MentionResolver: inline extension producing profile links.
//! - BackgroundExecutor / TokioExecutor: fire-and-forget task seam.

pub mod account_cache;
pub mod account_handle;
pub mod markup;
pub mod mention_resolver;
pub mod ports;

pub use self::account_cache::AccountCache;
pub use self::account_handle::{AccountHandle, AccountHandleError};
pub use self::markup::{InlineExtension, InlineMatch, InlineNode, LinkNode};
pub use self::mention_resolver::{BackgroundExecutor, MentionResolver, TokioExecutor};
