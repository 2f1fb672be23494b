// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # PRISM — Core Query Layer
//!
//! PRISM is the read side of a multi-chain transaction aggregation service:
//! you hand it an address, an account handle, or an extended public key, and
//! it hands you back one clean, deduplicated, timestamp-ordered page of
//! transactions — no matter how messy the upstream chain integration's
//! output was.
//!
//! The interesting part lives in three small components that compose
//! linearly per request:
//!
//! 1. **Capability resolver** — every chain integration declares which of
//!    the four transaction capabilities it actually implements. Resolution
//!    is a pure function over that capability set; there is no
//!    chain-specific branching anywhere in this crate, and there never
//!    will be.
//! 2. **Normalization pipeline** — dedup, stable sort, memo and token
//!    filtering, truncation, direction annotation. Stage order is part of
//!    the contract. Reordering stages changes semantics, so don't.
//! 3. **Error mapper** — upstream failures collapse into a closed taxonomy
//!    and a total, compile-checked mapping to response classes. Nothing
//!    falls through, nothing gets swallowed.
//!
//! ## Architecture
//!
//! - **config** — Page-size and port constants. One home for magic numbers.
//! - **transaction** — The normalized transaction model and memo rules.
//! - **chain** — Capability traits, capability sets, and the chain registry.
//! - **query** — Resolver, pipeline, and the three query operations.
//! - **error** — The failure taxonomy and response classification.
//!
//! ## Design Philosophy
//!
//! 1. Capabilities over identities: "unsupported" is an absent value, not a
//!    stubbed method that throws.
//! 2. The pipeline is deterministic and synchronous; the single upstream
//!    call is the only await point per request.
//! 3. This crate retrieves nothing, persists nothing, authenticates nobody.
//!    Chain integrations do the fetching; we do the reconciling.

pub mod chain;
pub mod config;
pub mod error;
pub mod query;
pub mod transaction;
