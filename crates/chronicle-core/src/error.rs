//! Error taxonomy for audit-trail invocations.

use chronicle_host::HostError;

/// Errors that can result from an audit-trail invocation.
///
/// Every variant is returned to the invoking Ledger Host as a failed
/// invocation result; nothing is retried internally and no partial state is
/// rolled back. The host surfaces the message verbatim to whatever issued
/// the transaction.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    /// Wrong number of invocation arguments. Always caller-fixable and
    /// rejected before any state change.
    #[error("incorrect number of arguments: expected {expected}, got {got}")]
    Arguments {
        /// How many arguments the operation takes.
        expected: usize,
        /// How many arguments were supplied.
        got: usize,
    },

    /// The invocation named an operation this module does not provide.
    #[error("unknown operation '{0}', expecting bootstrap, record or query")]
    UnknownOperation(String),

    /// An entry for this user already exists. A normal, expected business
    /// outcome of the insert-if-absent discipline, not a crash.
    #[error("audit entry for user '{0}' already exists")]
    AlreadyExists(String),

    /// No entry exists for the queried user.
    #[error("no audit entry found for user '{0}'")]
    NotFound(String),

    /// The Ledger Host reported a storage or I/O failure. Opaque to this
    /// core and never retried here.
    #[error("store error: {0}")]
    Store(#[from] HostError),

    /// A row came back from the host with the wrong number of columns.
    #[error("corrupt audit row: expected 4 columns, got {0}")]
    CorruptRow(usize),

    /// The stored event counter is not a decimal integer. Malformed state
    /// is surfaced, never silently reset to zero.
    #[error("stored event counter is not an integer: '{0}'")]
    CounterCorrupt(String),

    /// The result payload could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
