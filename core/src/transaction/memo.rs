//! Memo validity.
//!
//! Several chains use the memo field as a routing tag: exchanges and
//! custodians expect a numeric destination tag, and anything else is noise
//! at best and a phishing vector at worst. The pipeline's memo stage keeps
//! or drops whole records based on this predicate and looks no further.

/// Returns `true` if the memo is acceptable for a normalized record.
///
/// An absent or empty memo is always valid. A nonempty memo is valid only
/// if it parses as a number (destination-tag convention).
pub fn is_valid_memo(memo: Option<&str>) -> bool {
    match memo {
        None => true,
        Some(m) if m.is_empty() => true,
        Some(m) => m.parse::<f64>().is_ok(),
    }
}
