//! Capability resolution.
//!
//! Given what the client asked for (identifier kind, token filter or not)
//! and what the chain integration offers, pick the one capability to call —
//! or fail with a dispatch error before any upstream work happens.
//!
//! This is a pure function over the capability set. It contains no
//! chain-specific branching and must never grow any.

use std::sync::Arc;

use crate::chain::capabilities::{
    AccountTransactions, CapabilitySet, ExtendedKeyTransactions, PlainTransactions,
    TokenTransactions,
};
use crate::error::QueryError;

// ---------------------------------------------------------------------------
// QueryKind
// ---------------------------------------------------------------------------

/// The kind of identifier a request carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// A plain chain address.
    Address,
    /// An account handle.
    Account,
    /// An extended public key spanning many derived addresses.
    ExtendedKey,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// The capability resolution chose to invoke.
#[derive(Clone)]
pub enum Dispatch {
    Plain(Arc<dyn PlainTransactions>),
    Token(Arc<dyn TokenTransactions>),
    Account(Arc<dyn AccountTransactions>),
    ExtendedKey(Arc<dyn ExtendedKeyTransactions>),
}

impl std::fmt::Debug for Dispatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Dispatch").field(&self.name()).finish()
    }
}

impl Dispatch {
    /// Capability name, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Dispatch::Plain(_) => "plain-transactions",
            Dispatch::Token(_) => "token-transactions",
            Dispatch::Account(_) => "account-transactions",
            Dispatch::ExtendedKey(_) => "extended-key-transactions",
        }
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Resolves the capability to invoke for a request shape.
///
/// Rules:
/// - Address without token → plain-transactions
/// - Address with token → token-transactions
/// - Account → account-transactions (a token filter, if any, is passed
///   through to the upstream call, so it does not influence dispatch)
/// - Extended key → extended-key-transactions
///
/// A missing capability yields [`QueryError::NoCapability`], which the
/// mapper reports as internal: the gap is in the integration, not the data.
pub fn resolve(
    caps: &CapabilitySet,
    kind: QueryKind,
    token_present: bool,
) -> Result<Dispatch, QueryError> {
    match (kind, token_present) {
        (QueryKind::Address, false) => caps
            .plain
            .clone()
            .map(Dispatch::Plain)
            .ok_or(QueryError::NoCapability {
                operation: "plain-transactions",
            }),
        (QueryKind::Address, true) => caps
            .token
            .clone()
            .map(Dispatch::Token)
            .ok_or(QueryError::NoCapability {
                operation: "token-transactions",
            }),
        (QueryKind::Account, _) => caps
            .account
            .clone()
            .map(Dispatch::Account)
            .ok_or(QueryError::NoCapability {
                operation: "account-transactions",
            }),
        (QueryKind::ExtendedKey, _) => caps
            .extended_key
            .clone()
            .map(Dispatch::ExtendedKey)
            .ok_or(QueryError::NoCapability {
                operation: "extended-key-transactions",
            }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
