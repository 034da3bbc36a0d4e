//! Insert-if-absent entry storage.

use chronicle_host::LedgerHost;
use chronicle_types::{AuditEntry, AUDIT_LOG_TABLE};

use crate::error::AuditError;

/// Inserts one audit entry, enforcing at most one entry per user.
///
/// Delegates to the host's row-insert primitive, which enforces key
/// uniqueness: a host response of "not inserted, no error" means the user
/// already has an entry and is surfaced as [`AuditError::AlreadyExists`].
/// A host failure aborts the invocation before any counter update.
///
/// # Errors
///
/// Returns [`AuditError::AlreadyExists`] on a duplicate user and
/// [`AuditError::Store`] on a host failure.
pub fn insert_entry(host: &dyn LedgerHost, entry: &AuditEntry) -> Result<(), AuditError> {
    let inserted = host.insert_row(AUDIT_LOG_TABLE, &entry.to_row())?;
    if !inserted {
        return Err(AuditError::AlreadyExists(entry.user.clone()));
    }
    tracing::debug!(user = %entry.user, operation = %entry.operation, "audit entry inserted");
    Ok(())
}
