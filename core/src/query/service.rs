//! The three query operations exposed by the core.
//!
//! Each operation follows the same shape: reject empty identifiers before
//! any upstream work, resolve the capability, make the single upstream
//! call, run the appropriate pipeline variant, wrap the page. Failures
//! propagate untouched — classification happens at the transport boundary
//! via [`QueryError::response_class`].

use crate::chain::capabilities::CapabilitySet;
use crate::config::TX_PER_PAGE;
use crate::error::{FailureKind, QueryError};
use crate::query::pipeline;
use crate::query::resolver::{resolve, Dispatch, QueryKind};
use crate::transaction::{Transaction, TransactionPage};

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Transaction history for a plain address, optionally filtered by token.
///
/// Dispatches to plain-transactions, or token-transactions when a nonempty
/// token filter is present. Runs the full normalization pipeline with the
/// address as the direction reference.
pub async fn transactions_by_address(
    caps: &CapabilitySet,
    address: &str,
    token: Option<&str>,
) -> Result<TransactionPage, QueryError> {
    if address.trim().is_empty() {
        return Err(FailureKind::InvalidAddress.into());
    }
    let token = normalize_token(token);

    let dispatch = resolve(caps, QueryKind::Address, token.is_some())?;
    tracing::debug!(capability = dispatch.name(), address, "address query");

    let raw = fetch(dispatch, address, token).await?;
    let txs = pipeline::normalize_full(raw, token, Some(address));
    Ok(TransactionPage::new(txs))
}

/// Transaction history for an account handle.
///
/// The token filter (if any) and the page size are passed through to the
/// upstream call; the account capability's contract is to return ordered,
/// deduplicated, limited results, so only the trusted pipeline runs here.
pub async fn transactions_by_account(
    caps: &CapabilitySet,
    account: &str,
    token: Option<&str>,
) -> Result<TransactionPage, QueryError> {
    if account.trim().is_empty() {
        return Err(FailureKind::InvalidAddress.into());
    }
    let token = normalize_token(token);

    let dispatch = resolve(caps, QueryKind::Account, token.is_some())?;
    tracing::debug!(capability = dispatch.name(), account, "account query");

    let raw = fetch(dispatch, account, token).await?;
    let txs = pipeline::normalize_trusted(raw, account);
    Ok(TransactionPage::new(txs))
}

/// Transaction history for every address derived from an extended public key.
///
/// Runs the full normalization pipeline without direction annotation: the
/// result spans many derived addresses, so no single reference exists.
pub async fn transactions_by_extended_key(
    caps: &CapabilitySet,
    xpub: &str,
) -> Result<TransactionPage, QueryError> {
    if xpub.trim().is_empty() {
        return Err(FailureKind::InvalidKey.into());
    }

    let dispatch = resolve(caps, QueryKind::ExtendedKey, false)?;
    tracing::debug!(capability = dispatch.name(), "extended key query");

    let raw = fetch(dispatch, xpub, None).await?;
    let txs = pipeline::normalize_full(raw, None, None);
    Ok(TransactionPage::new(txs))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// An empty token parameter means "no filter". Transport glue hands the
/// query string through verbatim; the sentinel is normalized exactly once,
/// here, so dispatch and filtering agree on what "token present" means.
fn normalize_token(token: Option<&str>) -> Option<&str> {
    token.filter(|t| !t.trim().is_empty())
}

/// The single upstream call of a request.
async fn fetch(
    dispatch: Dispatch,
    identifier: &str,
    token: Option<&str>,
) -> Result<Vec<Transaction>, QueryError> {
    let capability = dispatch.name();
    let result = match dispatch {
        Dispatch::Plain(api) => api.transactions_by_address(identifier).await,
        Dispatch::Token(api) => {
            // The resolver only yields this dispatch when a token is present.
            api.token_transactions_by_address(identifier, token.unwrap_or_default())
                .await
        }
        Dispatch::Account(api) => {
            api.transactions_by_account(identifier, token, TX_PER_PAGE)
                .await
        }
        Dispatch::ExtendedKey(api) => api.transactions_by_extended_key(identifier).await,
    };

    result.map_err(|err| {
        tracing::warn!(capability, error = %err, "upstream capability call failed");
        QueryError::Source(err)
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::capabilities::{
        AccountTransactions, ExtendedKeyTransactions, PlainTransactions, TokenTransactions,
    };
    use crate::error::{ResponseClass, SourceError};
    use crate::transaction::Direction;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::sync::Arc;

    fn tx(id: &str, ts: i64) -> Transaction {
        Transaction::new(id, "devnet", ts)
    }

    /// Serves a canned sequence for any identifier.
    struct Static(Vec<Transaction>);

    #[async_trait]
    impl PlainTransactions for Static {
        async fn transactions_by_address(
            &self,
            _address: &str,
        ) -> Result<Vec<Transaction>, SourceError> {
            Ok(self.0.clone())
        }
    }

    #[async_trait]
    impl TokenTransactions for Static {
        async fn token_transactions_by_address(
            &self,
            _address: &str,
            _token_id: &str,
        ) -> Result<Vec<Transaction>, SourceError> {
            Ok(self.0.clone())
        }
    }

    #[async_trait]
    impl AccountTransactions for Static {
        async fn transactions_by_account(
            &self,
            _account: &str,
            _token_id: Option<&str>,
            _max_results: usize,
        ) -> Result<Vec<Transaction>, SourceError> {
            Ok(self.0.clone())
        }
    }

    #[async_trait]
    impl ExtendedKeyTransactions for Static {
        async fn transactions_by_extended_key(
            &self,
            _xpub: &str,
        ) -> Result<Vec<Transaction>, SourceError> {
            Ok(self.0.clone())
        }
    }

    /// Fails every call with the configured kind.
    struct Failing(FailureKind);

    #[async_trait]
    impl PlainTransactions for Failing {
        async fn transactions_by_address(
            &self,
            _address: &str,
        ) -> Result<Vec<Transaction>, SourceError> {
            Err(self.0.clone().into())
        }
    }

    /// Fails with an unclassified error.
    struct Flaky;

    #[async_trait]
    impl PlainTransactions for Flaky {
        async fn transactions_by_address(
            &self,
            _address: &str,
        ) -> Result<Vec<Transaction>, SourceError> {
            Err(SourceError::Other(anyhow!("connection reset by peer")))
        }
    }

    /// Panics if the upstream is ever reached. Used to prove identifier
    /// validation happens before any capability call.
    struct MustNotBeCalled;

    #[async_trait]
    impl PlainTransactions for MustNotBeCalled {
        async fn transactions_by_address(
            &self,
            _address: &str,
        ) -> Result<Vec<Transaction>, SourceError> {
            panic!("upstream called for an invalid identifier");
        }
    }

    #[async_trait]
    impl ExtendedKeyTransactions for MustNotBeCalled {
        async fn transactions_by_extended_key(
            &self,
            _xpub: &str,
        ) -> Result<Vec<Transaction>, SourceError> {
            panic!("upstream called for an invalid identifier");
        }
    }

    #[async_trait]
    impl AccountTransactions for MustNotBeCalled {
        async fn transactions_by_account(
            &self,
            _account: &str,
            _token_id: Option<&str>,
            _max_results: usize,
        ) -> Result<Vec<Transaction>, SourceError> {
            panic!("upstream called for an invalid identifier");
        }
    }

    fn caps_with_plain(provider: Arc<dyn PlainTransactions>) -> CapabilitySet {
        CapabilitySet::new().with_plain(provider)
    }

    // -- 1. Address path normalizes and annotates ----------------------------

    #[tokio::test]
    async fn address_query_dedups_sorts_and_annotates() {
        let provider = Arc::new(Static(vec![
            tx("b", 3).with_sender("you").with_receiver("me"),
            tx("a", 5).with_sender("me").with_receiver("you"),
            tx("a", 5).with_memo("dup"),
        ]));
        let page = transactions_by_address(&caps_with_plain(provider), "me", None)
            .await
            .unwrap();

        assert_eq!(page.total, 2);
        let ids: Vec<&str> = page.docs.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(page.docs[0].direction, Some(Direction::Outgoing));
        assert_eq!(page.docs[1].direction, Some(Direction::Incoming));
    }

    // -- 2. Empty identifiers never reach upstream ---------------------------

    #[tokio::test]
    async fn empty_address_is_rejected_before_any_upstream_call() {
        let caps = caps_with_plain(Arc::new(MustNotBeCalled));
        let err = transactions_by_address(&caps, "", None).await.unwrap_err();
        assert_eq!(err.response_class(), ResponseClass::BadRequest);

        // Whitespace-only counts as missing too.
        let err = transactions_by_address(&caps, "   ", None)
            .await
            .unwrap_err();
        assert_eq!(err.response_class(), ResponseClass::BadRequest);
    }

    #[tokio::test]
    async fn empty_account_is_rejected_before_any_upstream_call() {
        let caps = CapabilitySet::new().with_account(Arc::new(MustNotBeCalled));
        let err = transactions_by_account(&caps, "", None).await.unwrap_err();
        assert_eq!(err.response_class(), ResponseClass::BadRequest);
    }

    #[tokio::test]
    async fn empty_extended_key_is_rejected_before_any_upstream_call() {
        let caps = CapabilitySet::new().with_extended_key(Arc::new(MustNotBeCalled));
        let err = transactions_by_extended_key(&caps, "").await.unwrap_err();
        assert_eq!(err.response_class(), ResponseClass::BadRequest);
        assert_eq!(err.to_string(), "invalid extended public key");
    }

    // -- 3. Token filter shapes dispatch -------------------------------------

    #[tokio::test]
    async fn token_query_without_token_capability_is_internal() {
        let caps = caps_with_plain(Arc::new(Static(vec![tx("a", 1)])));
        let err = transactions_by_address(&caps, "me", Some("usdt"))
            .await
            .unwrap_err();
        assert_eq!(err.response_class(), ResponseClass::Internal);
        assert_ne!(err.response_class(), ResponseClass::NotFound);
    }

    #[tokio::test]
    async fn empty_token_string_means_no_filter() {
        // No token capability registered; an empty token parameter must fall
        // back to the plain capability instead of failing dispatch.
        let provider = Arc::new(Static(vec![tx("a", 1).with_token("usdt")]));
        let page = transactions_by_address(&caps_with_plain(provider), "me", Some(""))
            .await
            .unwrap();
        assert_eq!(page.total, 1);
    }

    #[tokio::test]
    async fn token_query_filters_to_the_requested_token() {
        let provider = Arc::new(Static(vec![
            tx("a", 5).with_token("usdt"),
            tx("b", 4).with_token("dai"),
            tx("c", 3),
        ]));
        let caps = CapabilitySet::new()
            .with_plain(Arc::new(MustNotBeCalled))
            .with_token(provider);
        let page = transactions_by_address(&caps, "me", Some("usdt"))
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.docs[0].id, "a");
    }

    // -- 4. Failure propagation ----------------------------------------------

    #[tokio::test]
    async fn source_unavailable_classifies_as_service_unavailable() {
        let caps = caps_with_plain(Arc::new(Failing(FailureKind::SourceUnavailable)));
        let err = transactions_by_address(&caps, "me", None).await.unwrap_err();
        assert_eq!(err.response_class(), ResponseClass::ServiceUnavailable);
    }

    #[tokio::test]
    async fn upstream_not_found_classifies_as_not_found() {
        let caps = caps_with_plain(Arc::new(Failing(FailureKind::NotFound)));
        let err = transactions_by_address(&caps, "me", None).await.unwrap_err();
        assert_eq!(err.response_class(), ResponseClass::NotFound);
    }

    #[tokio::test]
    async fn unclassified_upstream_failure_surfaces_as_internal_with_detail() {
        let caps = caps_with_plain(Arc::new(Flaky));
        let err = transactions_by_address(&caps, "me", None).await.unwrap_err();
        assert_eq!(err.response_class(), ResponseClass::Internal);
        assert!(err.to_string().contains("connection reset by peer"));
    }

    // -- 5. Account path trusts upstream -------------------------------------

    #[tokio::test]
    async fn account_query_passes_upstream_order_and_duplicates_through() {
        // Unsorted, duplicated input. The account path must not correct it.
        let provider = Arc::new(Static(vec![
            tx("a", 1).with_sender("acct"),
            tx("b", 9).with_receiver("acct"),
            tx("a", 1).with_sender("acct"),
        ]));
        let caps = CapabilitySet::new().with_account(provider);
        let page = transactions_by_account(&caps, "acct", None).await.unwrap();

        let ids: Vec<&str> = page.docs.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "a"]);
        assert_eq!(page.docs[0].direction, Some(Direction::Outgoing));
        assert_eq!(page.docs[1].direction, Some(Direction::Incoming));
    }

    // -- 6. Extended-key path skips direction --------------------------------

    #[tokio::test]
    async fn extended_key_query_normalizes_but_never_annotates() {
        let provider = Arc::new(Static(vec![
            tx("b", 3).with_sender("d1a"),
            tx("a", 5).with_receiver("d1b"),
            tx("b", 3),
        ]));
        let caps = CapabilitySet::new().with_extended_key(provider);
        let page = transactions_by_extended_key(&caps, "dpub6demo").await.unwrap();

        assert_eq!(page.total, 2);
        assert_eq!(page.docs[0].id, "a");
        assert!(page.docs.iter().all(|t| t.direction.is_none()));
    }
}
