//! # Service Configuration & Constants
//!
//! Every magic number in PRISM lives here. If you're hardcoding a constant
//! somewhere else, you're doing it wrong and you owe the team coffee.
//!
//! These values are immutable, globally visible configuration — read from
//! anywhere without synchronization, changed only by shipping a new build.

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Maximum number of transactions in one response page.
///
/// The normalization pipeline truncates to this after filtering; the
/// account-transactions capability receives it as `max_results` so the
/// upstream can limit server-side instead. 25 keeps responses small enough
/// for mobile clients polling on flaky connections.
pub const TX_PER_PAGE: usize = 25;

// ---------------------------------------------------------------------------
// Network Parameters
// ---------------------------------------------------------------------------

/// Default HTTP API port.
pub const DEFAULT_RPC_PORT: u16 = 9750;

/// Default metrics (Prometheus) port.
pub const DEFAULT_METRICS_PORT: u16 = 9751;
