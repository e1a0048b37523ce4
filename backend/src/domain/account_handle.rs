//! Canonical `@user@domain` account identifier.
//!
//! Handles are taken verbatim from markup: no case folding is applied, so
//! `@Alex@example.org` and `@alex@example.org` are distinct cache keys.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Leading sigil and user/domain separator.
pub const HANDLE_SIGIL: char = '@';

/// Return `true` for bytes allowed inside a handle body, separator included.
pub(crate) const fn is_handle_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'@' | b'.' | b'-')
}

/// Return `true` for bytes allowed in a user or domain part. Excludes `@`.
const fn is_part_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'-')
}

/// Return `true` for bytes trimmed from the end of a handle.
pub(crate) const fn is_trailing_punctuation(byte: u8) -> bool {
    matches!(byte, b'.' | b'-')
}

/// Account handle such as `@alex@example.org`.
///
/// ## Invariants
/// - `user` and `domain` are non-empty and contain only ASCII letters, digits,
///   `.` and `-`.
/// - `domain` does not end in `.` or `-`.
///
/// # Examples
/// ```
/// use wiki_backend::domain::AccountHandle;
///
/// let handle = AccountHandle::new("alex", "example.org").expect("valid handle");
/// assert_eq!(handle.as_str(), "@alex@example.org");
/// assert_eq!(handle.label(), "@alex");
/// assert_eq!(handle.guess_profile_uri(), "https://example.org/users/alex");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccountHandle {
    canonical: String,
    label: String,
    user: String,
    domain: String,
}

/// Validation errors returned when constructing an [`AccountHandle`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountHandleError {
    /// Input does not start with `@`.
    #[error("account handle must start with '@'")]
    MissingSigil,
    /// No `@` separates the user from the domain.
    #[error("account handle must contain an '@' between user and domain")]
    MissingSeparator,
    /// More than one separator follows the sigil.
    #[error("account handle must contain exactly one '@' after the sigil")]
    ExtraSeparator,
    /// User part is empty.
    #[error("account handle user must not be empty")]
    EmptyUser,
    /// Domain part is empty.
    #[error("account handle domain must not be empty")]
    EmptyDomain,
    /// A character outside letters, digits, `.` and `-` was found.
    #[error("account handle contains invalid character {0:?}")]
    InvalidCharacter(char),
    /// The domain ends in `.` or `-`.
    #[error("account handle must not end in '.' or '-'")]
    TrailingPunctuation,
}

impl AccountHandle {
    /// Build a handle from its user and domain parts.
    ///
    /// # Errors
    ///
    /// Returns [`AccountHandleError`] when either part is empty, contains a
    /// character outside the handle alphabet, or the domain ends in
    /// punctuation.
    pub fn new(user: &str, domain: &str) -> Result<Self, AccountHandleError> {
        if user.is_empty() {
            return Err(AccountHandleError::EmptyUser);
        }
        if domain.is_empty() {
            return Err(AccountHandleError::EmptyDomain);
        }
        validate_part(user)?;
        validate_part(domain)?;
        if domain.bytes().last().is_some_and(is_trailing_punctuation) {
            return Err(AccountHandleError::TrailingPunctuation);
        }

        Ok(Self {
            canonical: format!("{HANDLE_SIGIL}{user}{HANDLE_SIGIL}{domain}"),
            label: format!("{HANDLE_SIGIL}{user}"),
            user: user.to_owned(),
            domain: domain.to_owned(),
        })
    }

    /// Borrow the canonical `@user@domain` form.
    pub fn as_str(&self) -> &str {
        self.canonical.as_str()
    }

    /// User part without the sigil.
    pub fn user(&self) -> &str {
        self.user.as_str()
    }

    /// Domain part.
    pub fn domain(&self) -> &str {
        self.domain.as_str()
    }

    /// Visible link text: the sigil and the user, domain omitted.
    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    /// Deterministic best-guess profile URI used until discovery completes.
    pub fn guess_profile_uri(&self) -> String {
        format!("https://{}/users/{}", self.domain, self.user)
    }

    /// WebFinger resource identifier, `acct:user@domain`.
    pub fn webfinger_resource(&self) -> String {
        format!("acct:{}@{}", self.user, self.domain)
    }
}

fn validate_part(part: &str) -> Result<(), AccountHandleError> {
    let invalid = part
        .chars()
        .find(|ch| !u8::try_from(*ch).is_ok_and(is_part_byte));
    match invalid {
        Some(HANDLE_SIGIL) => Err(AccountHandleError::ExtraSeparator),
        Some(ch) => Err(AccountHandleError::InvalidCharacter(ch)),
        None => Ok(()),
    }
}

impl FromStr for AccountHandle {
    type Err = AccountHandleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s
            .strip_prefix(HANDLE_SIGIL)
            .ok_or(AccountHandleError::MissingSigil)?;
        let (user, domain) = body
            .split_once(HANDLE_SIGIL)
            .ok_or(AccountHandleError::MissingSeparator)?;
        Self::new(user, domain)
    }
}

impl fmt::Display for AccountHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for AccountHandle {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
