//! UTF-8-safe byte-budget truncation and the override merge protocol.
//!
//! All handshake limits are byte budgets, but the stored strings must stay
//! valid UTF-8. [`truncate_to_boundary`] cuts at the largest character
//! boundary that fits the budget, so a multi-byte sequence is dropped whole
//! rather than split. [`append_and_truncate`] builds on it to implement the
//! one-shot override merge: the existing value is preserved verbatim, a
//! `" / "` delimiter is reserved, and only the caller's suffix is truncated
//! to whatever budget remains.

use crate::error::HandshakeError;
use crate::limits::OVERRIDE_DELIMITER;

/// Truncates `value` to at most `max_bytes` bytes without splitting a
/// multi-byte character.
///
/// Returns the longest prefix of `value` that fits the budget and ends on a
/// character boundary. The result is therefore at most `max_bytes` long and
/// always valid UTF-8.
///
/// # Examples
///
/// ```
/// use handshake::truncate_to_boundary;
///
/// assert_eq!(truncate_to_boundary("metadata", 4), "meta");
/// // A naive byte cut at 4 would split the two-byte 'é'.
/// assert_eq!(truncate_to_boundary("caf\u{e9}s", 4), "caf");
/// assert_eq!(truncate_to_boundary("short", 64), "short");
/// ```
#[must_use]
pub fn truncate_to_boundary(value: &str, max_bytes: usize) -> &str {
    if value.len() <= max_bytes {
        return value;
    }
    let mut end = max_bytes;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}

/// Merges an override suffix into an existing field value under a byte budget.
///
/// Implements the append-and-truncate protocol shared by every overridable
/// handshake field:
///
/// - An absent or empty `suffix` leaves `existing` unchanged.
/// - Otherwise the result is `existing`, the `" / "` delimiter, then the
///   suffix truncated so the whole result fits in `max_len` bytes.
/// - If the existing value plus the delimiter already exceed `max_len`,
///   the merge is rejected with [`HandshakeError::FieldOverflow`] and the
///   field keeps its current value. `field` names the wire key for the
///   diagnostic.
///
/// # Examples
///
/// ```
/// use handshake::append_and_truncate;
///
/// let merged = append_and_truncate(Some("dbcore"), Some("wrapper"), 64, "driver.name").unwrap();
/// assert_eq!(merged.as_deref(), Some("dbcore / wrapper"));
///
/// let unchanged = append_and_truncate(Some("dbcore"), None, 64, "driver.name").unwrap();
/// assert_eq!(unchanged.as_deref(), Some("dbcore"));
/// ```
pub fn append_and_truncate(
    existing: Option<&str>,
    suffix: Option<&str>,
    max_len: usize,
    field: &'static str,
) -> Result<Option<String>, HandshakeError> {
    let Some(suffix) = suffix.filter(|s| !s.is_empty()) else {
        return Ok(existing.map(str::to_owned));
    };

    let prefix = existing.unwrap_or("");
    let Some(budget) = max_len.checked_sub(prefix.len() + OVERRIDE_DELIMITER.len()) else {
        return Err(HandshakeError::FieldOverflow {
            field,
            len: prefix.len(),
            max: max_len,
        });
    };

    let mut merged = String::with_capacity(prefix.len() + OVERRIDE_DELIMITER.len() + budget);
    merged.push_str(prefix);
    merged.push_str(OVERRIDE_DELIMITER);
    merged.push_str(truncate_to_boundary(suffix, budget));
    debug_assert!(merged.len() <= max_len);
    Ok(Some(merged))
}
