//! # Query Layer
//!
//! The three read operations of the service and the machinery behind them.
//! Each request flows through the same linear composition:
//!
//! ```text
//! validate identifier → resolver → (one upstream capability call)
//!                                     → pipeline → page
//!                                     → error mapper (only on failure)
//! ```
//!
//! ## Architecture
//!
//! ```text
//! resolver.rs — pure (query kind, token presence, capability set) → dispatch
//! pipeline.rs — the two normalization variants and their fixed stage order
//! service.rs  — the three operations: by address, by account, by xpub
//! ```
//!
//! ## Design Decisions
//!
//! - Exactly one upstream call per request, and it is the only await point.
//!   No retry here — a failed call fails the request; backoff is the
//!   provider's business.
//! - The address/xpub path normalizes client-side; the account path trusts
//!   the upstream's ordering/limiting contract. These are two deliberately
//!   different pipelines, not one with flags bolted on.

pub mod pipeline;
pub mod resolver;
pub mod service;

pub use resolver::{resolve, Dispatch, QueryKind};
pub use service::{transactions_by_account, transactions_by_address, transactions_by_extended_key};
