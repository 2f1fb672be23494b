//! Core type definitions for normalized transactions.
//!
//! These are the wire-facing types of the query layer. They are deliberately
//! plain — owned strings and integers — because every record lives only for
//! the duration of one request pipeline and is then serialized and dropped.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Orientation of a transaction relative to one reference address.
///
/// Computed by the pipeline's annotation stage from membership of the
/// reference address in the sender and receiver sets. Extended-key queries
/// span many derived addresses, so no single reference exists and the
/// field stays unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// The reference address appears only among the receivers.
    Incoming,
    /// The reference address appears only among the senders.
    Outgoing,
    /// The reference address appears on both sides (self-transfer).
    Yourself,
    /// The reference address appears on neither side.
    Unknown,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Incoming => write!(f, "incoming"),
            Self::Outgoing => write!(f, "outgoing"),
            Self::Yourself => write!(f, "yourself"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// One normalized transaction record as reported by an upstream provider.
///
/// The `id` is opaque and unique within one logical result set; duplicates
/// can appear when upstream pagination windows overlap, and the pipeline's
/// dedup stage relies on first-occurrence order to resolve them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Opaque unique identifier (typically the on-chain hash).
    pub id: String,
    /// Chain handle this record came from (e.g., "devnet").
    pub chain: String,
    /// Unix timestamp in seconds.
    pub timestamp: i64,
    /// Free-text annotation attached by the chain protocol, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    /// Token identifier for token transfers; `None` for native transfers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,
    /// Addresses on the sending side.
    pub senders: Vec<String>,
    /// Addresses on the receiving side.
    pub receivers: Vec<String>,
    /// Direction relative to the queried address. Filled by the pipeline's
    /// annotation stage; never set for extended-key queries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
}

impl Transaction {
    /// Creates a record with the mandatory fields; participants, memo, and
    /// token are attached with the `with_*` methods below.
    pub fn new(id: impl Into<String>, chain: impl Into<String>, timestamp: i64) -> Self {
        Self {
            id: id.into(),
            chain: chain.into(),
            timestamp,
            memo: None,
            token_id: None,
            senders: Vec::new(),
            receivers: Vec::new(),
            direction: None,
        }
    }

    /// Adds a sending address.
    pub fn with_sender(mut self, address: impl Into<String>) -> Self {
        self.senders.push(address.into());
        self
    }

    /// Adds a receiving address.
    pub fn with_receiver(mut self, address: impl Into<String>) -> Self {
        self.receivers.push(address.into());
        self
    }

    /// Sets the memo.
    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }

    /// Sets the token identifier.
    pub fn with_token(mut self, token_id: impl Into<String>) -> Self {
        self.token_id = Some(token_id.into());
        self
    }

    /// Computes the direction of this transaction relative to `reference`.
    ///
    /// Membership of the reference address in the participant sets decides:
    /// sender only → outgoing, receiver only → incoming, both → yourself,
    /// neither → unknown.
    pub fn direction_for(&self, reference: &str) -> Direction {
        let sends = self.senders.iter().any(|a| a == reference);
        let receives = self.receivers.iter().any(|a| a == reference);
        match (sends, receives) {
            (true, true) => Direction::Yourself,
            (true, false) => Direction::Outgoing,
            (false, true) => Direction::Incoming,
            (false, false) => Direction::Unknown,
        }
    }

    /// Returns `true` if the memo passes the validity predicate.
    pub fn has_valid_memo(&self) -> bool {
        super::memo::is_valid_memo(self.memo.as_deref())
    }
}

// ---------------------------------------------------------------------------
// TransactionPage
// ---------------------------------------------------------------------------

/// One bounded, ordered page of normalized transactions.
///
/// Returned atomically — there is no partial or streaming variant. After
/// normalization `docs` is ordered by descending timestamp and holds at most
/// [`crate::config::TX_PER_PAGE`] records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionPage {
    /// Number of records in this page.
    pub total: usize,
    /// The records, newest first.
    pub docs: Vec<Transaction>,
}

impl TransactionPage {
    /// Wraps a normalized sequence into a page.
    pub fn new(docs: Vec<Transaction>) -> Self {
        Self {
            total: docs.len(),
            docs,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
