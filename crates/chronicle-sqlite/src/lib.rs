//! SQLite-backed Ledger Host for the Chronicle audit-trail core.
//!
//! Provides a [`chronicle_host::LedgerHost`] implementation over `rusqlite`,
//! plus connection pooling (via `r2d2`) with WAL-mode initialization and
//! embedded SQL migrations for the host's own tables (`host_state` for the
//! keyed state store, `host_notifications` for emitted notifications).
//!
//! The audit table itself is NOT created by migrations: it is created
//! through the host's `create_table` capability at bootstrap, exactly once,
//! and re-creating it is an error by design.

mod host;
mod migrations;
mod pool;

pub use host::SqliteHost;
pub use migrations::{run_migrations, MigrationError};
pub use pool::{create_pool, DbPool, PoolError, PoolSettings};
