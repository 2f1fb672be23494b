//! # Chain Integrations
//!
//! A chain integration is whatever code knows how to talk to one upstream
//! chain's data source. This crate never fetches anything itself; it only
//! defines the seams.
//!
//! ## Architecture
//!
//! ```text
//! capabilities.rs — the four optional transaction capabilities + CapabilitySet
//! registry.rs     — ChainIntegration and the handle-keyed ChainRegistry
//! ```
//!
//! ## Design Decisions
//!
//! - Dispatch is capability-based, never identity-based. An integration
//!   declares what it supports by *which* `CapabilitySet` slots it fills;
//!   "unsupported" is an explicit `None`, not a method that errors.
//! - The registry is built once at startup and shared immutably behind
//!   `Arc`. No locks, no interior mutability, nothing to race on.

pub mod capabilities;
pub mod registry;

pub use capabilities::{
    AccountTransactions, CapabilitySet, ExtendedKeyTransactions, PlainTransactions,
    TokenTransactions,
};
pub use registry::{ChainIntegration, ChainRegistry};
