//! End-to-end tests for the PRISM query layer.
//!
//! These exercise the full request flow the way the node glue drives it:
//! registry lookup, capability resolution, one upstream call against a mock
//! chain integration, normalization, and page assembly — for all three
//! operations and for the dispatch-failure and upstream-failure paths.
//!
//! Each test builds its own registry. No shared state, no ordering
//! dependencies.

use std::sync::Arc;

use async_trait::async_trait;

use prism_core::chain::{
    AccountTransactions, CapabilitySet, ChainIntegration, ChainRegistry, ExtendedKeyTransactions,
    PlainTransactions, TokenTransactions,
};
use prism_core::config::TX_PER_PAGE;
use prism_core::error::{FailureKind, ResponseClass, SourceError};
use prism_core::query;
use prism_core::transaction::{Direction, Transaction};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

/// A mock chain whose four capabilities all serve slices of one canned
/// transaction list, the way a real integration serves one indexer.
struct MockChain {
    transactions: Vec<Transaction>,
}

impl MockChain {
    fn involving<'a>(&'a self, address: &'a str) -> impl Iterator<Item = &'a Transaction> {
        self.transactions.iter().filter(move |tx| {
            tx.senders.iter().any(|a| a == address) || tx.receivers.iter().any(|a| a == address)
        })
    }
}

#[async_trait]
impl PlainTransactions for MockChain {
    async fn transactions_by_address(
        &self,
        address: &str,
    ) -> Result<Vec<Transaction>, SourceError> {
        Ok(self.involving(address).cloned().collect())
    }
}

#[async_trait]
impl TokenTransactions for MockChain {
    async fn token_transactions_by_address(
        &self,
        address: &str,
        token_id: &str,
    ) -> Result<Vec<Transaction>, SourceError> {
        Ok(self
            .involving(address)
            .filter(|tx| tx.token_id.as_deref() == Some(token_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AccountTransactions for MockChain {
    async fn transactions_by_account(
        &self,
        account: &str,
        token_id: Option<&str>,
        max_results: usize,
    ) -> Result<Vec<Transaction>, SourceError> {
        // Honors the capability contract: ordered, unique, limited.
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
impl ExtendedKeyTransactions for MockChain {
    async fn transactions_by_extended_key(
        &self,
        xpub: &str,
    ) -> Result<Vec<Transaction>, SourceError> {
        if xpub != "dpub6demo" {
            return Err(FailureKind::NotFound.into());
        }
        Ok(self.transactions.clone())
    }
}

fn tx(id: &str, ts: i64) -> Transaction {
    Transaction::new(id, "mocknet", ts)
}

/// A registry with one fully-capable mock chain plus one plain-only chain.
fn setup() -> ChainRegistry {
    let chain = Arc::new(MockChain {
        transactions: vec![
            tx("t1", 500).with_sender("m1alice").with_receiver("m1bob"),
            tx("t2", 300).with_sender("m1bob").with_receiver("m1alice"),
            // Overlapping upstream window repeats t1.
            tx("t1", 500).with_sender("m1alice").with_receiver("m1bob"),
            tx("t3", 400)
                .with_sender("m1alice")
                .with_receiver("m1carol")
                .with_token("m1gold"),
            tx("t4", 200)
                .with_sender("m1carol")
                .with_receiver("m1alice")
                .with_memo("not a destination tag"),
        ],
    });

    let mut registry = ChainRegistry::new();
    registry.register(ChainIntegration::new(
        "mocknet",
        CapabilitySet::new()
            .with_plain(chain.clone())
            .with_token(chain.clone())
            .with_account(chain.clone())
            .with_extended_key(chain.clone()),
    ));
    registry.register(ChainIntegration::new(
        "barebones",
        CapabilitySet::new().with_plain(chain),
    ));
    registry
}

// ---------------------------------------------------------------------------
// Address path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn address_flow_returns_a_normalized_annotated_page() {
    let registry = setup();
    let caps = registry.get("mocknet").unwrap().capabilities().clone();

    let page = query::transactions_by_address(&caps, "m1alice", None)
        .await
        .unwrap();

    // t1 deduplicated, t4 dropped by the memo filter, rest newest-first.
    let ids: Vec<&str> = page.docs.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["t1", "t3", "t2"]);
    assert_eq!(page.total, 3);
    assert_eq!(page.docs[0].direction, Some(Direction::Outgoing));
    assert_eq!(page.docs[2].direction, Some(Direction::Incoming));
    assert!(page.docs.len() <= TX_PER_PAGE);
}

#[tokio::test]
async fn address_flow_with_token_filter_narrows_to_that_token() {
    let registry = setup();
    let caps = registry.get("mocknet").unwrap().capabilities().clone();

    let page = query::transactions_by_address(&caps, "m1alice", Some("m1gold"))
        .await
        .unwrap();

    assert_eq!(page.total, 1);
    assert_eq!(page.docs[0].id, "t3");
    assert_eq!(page.docs[0].token_id.as_deref(), Some("m1gold"));
}

#[tokio::test]
async fn token_query_against_plain_only_chain_is_an_integration_gap() {
    let registry = setup();
    let caps = registry.get("barebones").unwrap().capabilities().clone();

    let err = query::transactions_by_address(&caps, "m1alice", Some("m1gold"))
        .await
        .unwrap_err();

    assert_eq!(err.response_class(), ResponseClass::Internal);
    assert_eq!(
        err.to_string(),
        "no token-transactions capability for this chain"
    );
}

// ---------------------------------------------------------------------------
// Account path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn account_flow_trusts_upstream_shape() {
    let registry = setup();
    let caps = registry.get("mocknet").unwrap().capabilities().clone();

    let page = query::transactions_by_account(&caps, "m1alice", None)
        .await
        .unwrap();

    // Upstream already ordered and deduplicated; memo filter still applies.
    let ids: Vec<&str> = page.docs.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["t1", "t3", "t2"]);
    assert!(page.docs.iter().all(|t| t.direction.is_some()));
}

// ---------------------------------------------------------------------------
// Extended-key path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn extended_key_flow_returns_page_without_directions() {
    let registry = setup();
    let caps = registry.get("mocknet").unwrap().capabilities().clone();

    let page = query::transactions_by_extended_key(&caps, "dpub6demo")
        .await
        .unwrap();

    assert!(page.total > 0);
    assert!(page.docs.iter().all(|t| t.direction.is_none()));
    // Still normalized: unique ids, newest first.
    assert_eq!(page.docs[0].id, "t1");
    let mut ids: Vec<&str> = page.docs.iter().map(|t| t.id.as_str()).collect();
    ids.dedup();
    assert_eq!(ids.len(), page.total);
}

#[tokio::test]
async fn unknown_extended_key_maps_to_not_found() {
    let registry = setup();
    let caps = registry.get("mocknet").unwrap().capabilities().clone();

    let err = query::transactions_by_extended_key(&caps, "dpub6nope")
        .await
        .unwrap_err();

    assert_eq!(err.response_class(), ResponseClass::NotFound);
}
