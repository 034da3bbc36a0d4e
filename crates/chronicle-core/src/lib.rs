//! The Chronicle audit-trail core.
//!
//! An append-mostly audit-trail store, invoked as a callback module by an
//! external ledger runtime (the Ledger Host) that owns transaction
//! ordering, durability, and crash recovery. The core records discrete user
//! actions as immutable entries — at most one per user, insert-if-absent —
//! maintains a monotonically increasing global event counter, and answers
//! point and prefix queries with field-named JSON payloads.
//!
//! The core holds no state of its own: every invocation goes through the
//! [`chronicle_host::LedgerHost`] capability trait, and the host serialises
//! invocations, so no internal locking or threading is performed here.
//!
//! # Usage
//!
//! ```rust,ignore
//! use chronicle_core::dispatch;
//!
//! dispatch::bootstrap(&host, &args)?;
//! dispatch::record(&host, &args)?;
//! let payload = dispatch::query(&host, &key_args)?;
//! ```

pub mod counter;
pub mod dispatch;
mod error;
pub mod query;
pub mod schema;
pub mod store;

pub use error::AuditError;

#[cfg(test)]
mod tests;
