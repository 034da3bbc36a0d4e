//! Error type for Ledger Host operations.

/// Errors reported by a Ledger Host implementation.
///
/// Note that "key already present" on insert is NOT an error at this
/// boundary — [`crate::LedgerHost::insert_row`] reports it as `Ok(false)`
/// and the core turns it into a business-level rejection.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// The backing storage failed.
    #[error("host storage error: {0}")]
    Storage(String),

    /// A table or column name was rejected by the host.
    #[error("invalid table or column name: {0}")]
    InvalidTable(String),

    /// Table creation was requested for a table that already exists.
    #[error("table '{0}' already exists")]
    TableExists(String),

    /// An I/O failure outside the storage engine proper.
    #[error("host I/O error: {0}")]
    Io(#[from] std::io::Error),
}
