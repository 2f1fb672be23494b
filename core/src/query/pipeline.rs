//! The normalization pipeline.
//!
//! Takes the raw sequence one upstream capability call returned and turns it
//! into the page contract: unique ids, newest first, valid memos, matching
//! token, bounded length, direction annotated. Stage order is fixed —
//! dedup before sort (first occurrence in *input* order wins), filters
//! before truncation (a page must not lose records to truncation that a
//! filter would have dropped anyway).
//!
//! Two variants, deliberately not unified:
//!
//! - [`normalize_full`] — address and extended-key paths. All stages.
//! - [`normalize_trusted`] — account path. The account capability already
//!   returns ordered, deduplicated, `max_results`-limited data, so only the
//!   memo filter and direction annotation run locally.

use std::collections::HashSet;

use crate::config::TX_PER_PAGE;
use crate::transaction::Transaction;

// ---------------------------------------------------------------------------
// Entry Points
// ---------------------------------------------------------------------------

/// Full normalization for the address and extended-key paths.
///
/// `token` activates the token filter stage. `reference` enables direction
/// annotation; extended-key queries pass `None` because no single reference
/// address exists across the derived set.
pub fn normalize_full(
    txs: Vec<Transaction>,
    token: Option<&str>,
    reference: Option<&str>,
) -> Vec<Transaction> {
    let mut txs = dedup_by_id(txs);
    sort_by_timestamp_desc(&mut txs);
    txs.retain(Transaction::has_valid_memo);
    if let Some(token) = token {
        txs.retain(|tx| tx.token_id.as_deref() == Some(token));
    }
    truncate(&mut txs, TX_PER_PAGE);
    if let Some(reference) = reference {
        annotate_direction(&mut txs, reference);
    }
    txs
}

/// Trusted-upstream normalization for the account path.
///
/// No dedup, no sort, no truncation: the account capability's contract is
/// that its `max_results` parameter already produced an ordered, unique,
/// bounded sequence. Only the memo filter and direction annotation run.
pub fn normalize_trusted(mut txs: Vec<Transaction>, reference: &str) -> Vec<Transaction> {
    txs.retain(Transaction::has_valid_memo);
    annotate_direction(&mut txs, reference);
    txs
}

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

/// Drops records whose id was already seen, keeping the first occurrence in
/// input order. Overlapping upstream pagination windows repeat ids; the
/// earliest copy is the one the upstream considered freshest.
fn dedup_by_id(txs: Vec<Transaction>) -> Vec<Transaction> {
    let mut seen = HashSet::with_capacity(txs.len());
    txs.into_iter()
        .filter(|tx| seen.insert(tx.id.clone()))
        .collect()
}

/// Stable sort, newest first. Ties keep their post-dedup relative order;
/// there is no secondary tiebreak field.
fn sort_by_timestamp_desc(txs: &mut [Transaction]) {
    txs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

/// Keeps the head of the sequence, at most `max` records.
fn truncate(txs: &mut Vec<Transaction>, max: usize) {
    txs.truncate(max);
}

/// Sets each record's direction relative to the reference address.
fn annotate_direction(txs: &mut [Transaction], reference: &str) {
    for tx in txs {
        tx.direction = Some(tx.direction_for(reference));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
