//! The four optional transaction capabilities a chain integration may offer.
//!
//! Each capability is one trait with one async method: the single upstream
//! call a query makes. A provider that cannot serve a request shape simply
//! does not implement the trait — and its integration leaves that
//! [`CapabilitySet`] slot as `None`.
//!
//! Retry, backoff, and timeouts belong to the provider behind these traits.
//! From the query layer's perspective a call either returns a sequence or a
//! [`SourceError`], exactly once.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use crate::error::SourceError;
use crate::transaction::Transaction;

// ---------------------------------------------------------------------------
// Capability Traits
// ---------------------------------------------------------------------------

/// Native-coin transaction history for a plain address.
#[async_trait]
pub trait PlainTransactions: Send + Sync {
    async fn transactions_by_address(&self, address: &str)
        -> Result<Vec<Transaction>, SourceError>;
}

/// Token-transfer history for a plain address, filtered upstream by token.
#[async_trait]
pub trait TokenTransactions: Send + Sync {
    async fn token_transactions_by_address(
        &self,
        address: &str,
        token_id: &str,
    ) -> Result<Vec<Transaction>, SourceError>;
}

/// Transaction history for an account handle.
///
/// Contract: the returned sequence is already ordered newest-first,
/// deduplicated, and limited to `max_results`. The query layer trusts this
/// and skips its own dedup/sort/truncate stages on the account path.
#[async_trait]
pub trait AccountTransactions: Send + Sync {
    async fn transactions_by_account(
        &self,
        account: &str,
        token_id: Option<&str>,
        max_results: usize,
    ) -> Result<Vec<Transaction>, SourceError>;
}

/// Transaction history for every address derived from an extended public key.
#[async_trait]
pub trait ExtendedKeyTransactions: Send + Sync {
    async fn transactions_by_extended_key(
        &self,
        xpub: &str,
    ) -> Result<Vec<Transaction>, SourceError>;
}

// ---------------------------------------------------------------------------
// CapabilitySet
// ---------------------------------------------------------------------------

/// The capabilities one chain integration actually implements.
///
/// Built with the `with_*` methods at registration time; a slot left `None`
/// means requests needing it fail resolution with a dispatch error before
/// any upstream call is made.
#[derive(Default, Clone)]
pub struct CapabilitySet {
    pub plain: Option<Arc<dyn PlainTransactions>>,
    pub token: Option<Arc<dyn TokenTransactions>>,
    pub account: Option<Arc<dyn AccountTransactions>>,
    pub extended_key: Option<Arc<dyn ExtendedKeyTransactions>>,
}

impl CapabilitySet {
    /// An empty set — useless until at least one capability is attached.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_plain(mut self, provider: Arc<dyn PlainTransactions>) -> Self {
        self.plain = Some(provider);
        self
    }

    pub fn with_token(mut self, provider: Arc<dyn TokenTransactions>) -> Self {
        self.token = Some(provider);
        self
    }

    pub fn with_account(mut self, provider: Arc<dyn AccountTransactions>) -> Self {
        self.account = Some(provider);
        self
    }

    pub fn with_extended_key(mut self, provider: Arc<dyn ExtendedKeyTransactions>) -> Self {
        self.extended_key = Some(provider);
        self
    }

    /// Names of the filled slots, for logs and the `chains` listing.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names = Vec::with_capacity(4);
        if self.plain.is_some() {
            names.push("plain-transactions");
        }
        if self.token.is_some() {
            names.push("token-transactions");
        }
        if self.account.is_some() {
            names.push("account-transactions");
        }
        if self.extended_key.is_some() {
            names.push("extended-key-transactions");
        }
        names
    }

    /// Returns `true` if no capability is attached.
    pub fn is_empty(&self) -> bool {
        self.names().is_empty()
    }
}

impl fmt::Debug for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilitySet")
            .field("capabilities", &self.names())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
