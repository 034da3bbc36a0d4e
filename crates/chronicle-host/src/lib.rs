//! Ledger Host capability contract for the Chronicle audit-trail core.
//!
//! The core never talks to storage directly: it is invoked as a callback
//! module by an external ledger runtime (the "Ledger Host") that owns
//! transaction ordering, durability, and crash recovery. This crate defines
//! the capability set the core consumes — table creation, keyed row
//! insert/lookup, a producer-style row feed, a small byte-valued state
//! store, and notification emission — as an object-safe trait, so any
//! backing runtime can be plugged in behind it.
//!
//! `chronicle-sqlite` provides the SQLite-backed implementation used by the
//! server and by tests.

mod error;
mod feed;

pub use error::HostError;
pub use feed::{RowFeed, RowSender};

use chronicle_types::ColumnSpec;

/// An ordered list of column values, positional per the owning table's
/// [`ColumnSpec`] order.
pub type Row = Vec<String>;

/// The capability set a Ledger Host provides to the audit-trail core.
///
/// Implementations are used one invocation at a time: the host serialises
/// calls into the core, and the core holds no state of its own across
/// invocations. Isolation across concurrent invocations from different
/// callers is the host's responsibility.
pub trait LedgerHost {
    /// Creates `table` with the given column layout.
    ///
    /// Creation is not idempotent: requesting a table that already exists is
    /// an error ([`HostError::TableExists`] for hosts that can detect it),
    /// surfaced to the caller rather than suppressed.
    fn create_table(&self, table: &str, columns: &[ColumnSpec]) -> Result<(), HostError>;

    /// Inserts a row, enforcing key uniqueness.
    ///
    /// Returns `Ok(true)` when the row was inserted and `Ok(false)` when a
    /// row with the same key already exists (nothing is written in that
    /// case — insert-if-absent, never upsert).
    fn insert_row(&self, table: &str, row: &Row) -> Result<bool, HostError>;

    /// Looks up the row whose key columns exactly match `key`.
    fn get_row(&self, table: &str, key: &str) -> Result<Option<Row>, HostError>;

    /// Returns a feed of rows whose key begins with `key_prefix`, in the
    /// order the host stored them. The feed closes when exhausted.
    fn get_rows(&self, table: &str, key_prefix: &str) -> Result<RowFeed, HostError>;

    /// Reads a state value, `None` when the key has never been written.
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, HostError>;

    /// Writes a state value, replacing any previous value.
    fn put_state(&self, key: &str, value: &[u8]) -> Result<(), HostError>;

    /// Emits a notification for the host to deliver to its subscribers.
    fn emit_notification(&self, topic: &str, payload: &[u8]) -> Result<(), HostError>;
}
