//! Scanner for inline `@user@domain` mentions.

use crate::domain::AccountHandle;
use crate::domain::account_handle::{is_handle_byte, is_trailing_punctuation};

const SIGIL: u8 = b'@';

/// A recognised mention and the span it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionToken {
    /// Bytes consumed from the sigil onwards, trailing punctuation excluded.
    pub consumed: usize,
    /// The mentioned account.
    pub handle: AccountHandle,
}

/// Scan a mention starting at `offset`, which must point at `@`.
///
/// Consumes the longest run of ASCII letters, digits, `@`, `.` and `-`, then
/// gives trailing `.` and `-` back to the surrounding prose. A run holding a
/// second separator is rejected outright, as is one without a separator or
/// with an empty user or domain.
///
/// # Examples
/// ```
/// use wiki_backend::domain::mention_resolver::scan_mention;
///
/// let text = "Write to @alex@example.org.";
/// let token = scan_mention(text, 9).expect("mention");
/// assert_eq!(token.consumed, "@alex@example.org".len());
/// assert_eq!(token.handle.as_str(), "@alex@example.org");
///
/// assert!(scan_mention("@a@b@c", 0).is_none());
/// ```
pub fn scan_mention(text: &str, offset: usize) -> Option<MentionToken> {
    let input = text.as_bytes().get(offset..)?;
    if input.first() != Some(&SIGIL) {
        return None;
    }

    let mut end = 1;
    let mut separator = None;
    for &byte in input.iter().skip(1).take_while(|byte| is_handle_byte(**byte)) {
        if byte == SIGIL {
            if separator.is_some() {
                return None;
            }
            separator = Some(end);
        }
        end += 1;
    }
    while end > 1 && input.get(end - 1).copied().is_some_and(is_trailing_punctuation) {
        end -= 1;
    }

    let separator = separator?;
    let user = std::str::from_utf8(input.get(1..separator)?).ok()?;
    let domain = std::str::from_utf8(input.get(separator + 1..end)?).ok()?;
    let handle = AccountHandle::new(user, domain).ok()?;
    Some(MentionToken {
        consumed: end,
        handle,
    })
}
