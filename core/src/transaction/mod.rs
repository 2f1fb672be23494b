//! # Transaction Model
//!
//! The normalized transaction vocabulary shared by every chain integration
//! and the query pipeline. Upstream providers produce [`Transaction`] values
//! fresh for each request; the pipeline reconciles them; the page goes out;
//! nothing is kept.
//!
//! ## Architecture
//!
//! ```text
//! types.rs — Transaction, Direction, TransactionPage
//! memo.rs  — the memo-validity predicate used by the pipeline's filter stage
//! ```
//!
//! ## Design Decisions
//!
//! - Transaction ids are opaque strings. They are unique within one logical
//!   result set, but overlapping upstream windows can repeat them across
//!   responses — which is exactly why the pipeline deduplicates.
//! - Participants are *sets* of sender and receiver addresses, not a single
//!   from/to pair. UTXO chains routinely have several of each; direction is
//!   derived from set membership of one reference address.
//! - Timestamps are unix seconds as `i64`. There is no secondary ordering
//!   field; equal timestamps keep their relative upstream order.

pub mod memo;
pub mod types;

pub use memo::is_valid_memo;
pub use types::{Direction, Transaction, TransactionPage};
