//! # Built-in Chain Integrations
//!
//! Real deployments wire chain integrations against actual indexers at
//! startup; this module ships two in-memory fixture chains so a bare
//! `prism-node run` serves meaningful responses for local development and
//! API-contract testing:
//!
//! - `devnet` — all four capabilities over a canned transaction set.
//! - `embernet` — plain-transactions only, useful for exercising the
//!   dispatch-failure paths (e.g., a token query returns an integration
//!   gap, exactly as it would against a production chain without a token
//!   indexer).

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use prism_core::chain::{
    AccountTransactions, CapabilitySet, ChainIntegration, ChainRegistry, ExtendedKeyTransactions,
    PlainTransactions, TokenTransactions,
};
use prism_core::error::{FailureKind, SourceError};
use prism_core::transaction::Transaction;

/// Address prefix the fixture chains accept. Anything else is rejected as
/// an invalid address, which exercises the client-error path end to end.
const FIXTURE_ADDRESS_PREFIX: &str = "d1";

/// Prefix of a well-formed fixture extended public key.
const FIXTURE_XPUB_PREFIX: &str = "dpub";

/// The one extended key the devnet fixture has data for.
pub const DEMO_XPUB: &str = "dpub6prismdemo";

// ---------------------------------------------------------------------------
// FixtureChain
// ---------------------------------------------------------------------------

/// An in-memory chain integration serving one canned transaction list.
pub struct FixtureChain {
    transactions: Vec<Transaction>,
}

impl FixtureChain {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self { transactions }
    }

    fn involving<'a>(&'a self, address: &'a str) -> impl Iterator<Item = &'a Transaction> {
        self.transactions.iter().filter(move |tx| {
            tx.senders.iter().any(|a| a == address) || tx.receivers.iter().any(|a| a == address)
        })
    }

    fn check_address(address: &str) -> Result<(), SourceError> {
        if address.starts_with(FIXTURE_ADDRESS_PREFIX) {
            Ok(())
        } else {
            Err(FailureKind::InvalidAddress.into())
        }
    }
}

#[async_trait]
impl PlainTransactions for FixtureChain {
    async fn transactions_by_address(
        &self,
        address: &str,
    ) -> Result<Vec<Transaction>, SourceError> {
        Self::check_address(address)?;
        Ok(self.involving(address).cloned().collect())
    }
}

#[async_trait]
impl TokenTransactions for FixtureChain {
    async fn token_transactions_by_address(
        &self,
        address: &str,
        token_id: &str,
    ) -> Result<Vec<Transaction>, SourceError> {
        Self::check_address(address)?;
        Ok(self
            .involving(address)
            .filter(|tx| tx.token_id.as_deref() == Some(token_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AccountTransactions for FixtureChain {
    async fn transactions_by_account(
        &self,
        account: &str,
        token_id: Option<&str>,
        max_results: usize,
    ) -> Result<Vec<Transaction>, SourceError> {
        Self::check_address(account)?;
        // This capability's contract: ordered newest-first, unique ids,
        // at most max_results records.
        let mut txs: Vec<Transaction> = self
            .involving(account)
            .filter(|tx| token_id.is_none() || tx.token_id.as_deref() == token_id)
            .cloned()
            .collect();
        txs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        txs.dedup_by(|a, b| a.id == b.id);
        txs.truncate(max_results);
        Ok(txs)
    }
}

#[async_trait]
impl ExtendedKeyTransactions for FixtureChain {
    async fn transactions_by_extended_key(
        &self,
        xpub: &str,
    ) -> Result<Vec<Transaction>, SourceError> {
        if !xpub.starts_with(FIXTURE_XPUB_PREFIX) {
            return Err(FailureKind::InvalidKey.into());
        }
        if xpub != DEMO_XPUB {
            return Err(FailureKind::NotFound.into());
        }
        Ok(self.transactions.clone())
    }
}

// ---------------------------------------------------------------------------
// Registry Construction
// ---------------------------------------------------------------------------

/// Canned devnet history: a few native transfers, a token transfer, a
/// self-transfer, and one overlapping-window duplicate so the pipeline has
/// something real to normalize.
fn devnet_transactions() -> Vec<Transaction> {
    let now = Utc::now().timestamp();
    vec![
        Transaction::new("f7a1c09", "devnet", now - 60)
            .with_sender("d1alice")
            .with_receiver("d1bob")
            .with_memo("7001"),
        Transaction::new("e3b4d55", "devnet", now - 600)
            .with_sender("d1bob")
            .with_receiver("d1alice"),
        // Same record again, as an overlapping upstream page would repeat it.
        Transaction::new("f7a1c09", "devnet", now - 60)
            .with_sender("d1alice")
            .with_receiver("d1bob")
            .with_memo("7001"),
        Transaction::new("a9c2e10", "devnet", now - 3_600)
            .with_sender("d1alice")
            .with_receiver("d1alice"),
        Transaction::new("b5f8021", "devnet", now - 7_200)
            .with_sender("d1carol")
            .with_receiver("d1alice")
            .with_token("d1usd"),
        Transaction::new("c4d7793", "devnet", now - 86_400)
            .with_sender("d1bob")
            .with_receiver("d1carol")
            .with_memo("see you at the thing"),
    ]
}

/// Small native-only history for the plain-only fixture chain.
fn embernet_transactions() -> Vec<Transaction> {
    let now = Utc::now().timestamp();
    vec![
        Transaction::new("0x91aa", "embernet", now - 120)
            .with_sender("d1ember")
            .with_receiver("d1ash"),
        Transaction::new("0x91ab", "embernet", now - 240)
            .with_sender("d1ash")
            .with_receiver("d1ember"),
    ]
}

/// Builds the registry a bare `prism-node run` starts with.
pub fn default_registry() -> ChainRegistry {
    let devnet = Arc::new(FixtureChain::new(devnet_transactions()));
    let embernet = Arc::new(FixtureChain::new(embernet_transactions()));

    let mut registry = ChainRegistry::new();
    registry.register(ChainIntegration::new(
        "devnet",
        CapabilitySet::new()
            .with_plain(devnet.clone())
            .with_token(devnet.clone())
            .with_account(devnet.clone())
            .with_extended_key(devnet),
    ));
    registry.register(ChainIntegration::new(
        "embernet",
        CapabilitySet::new().with_plain(embernet),
    ));
    registry
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
