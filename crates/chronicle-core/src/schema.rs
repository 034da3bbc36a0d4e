//! Audit table schema definition and creation.

use chronicle_host::LedgerHost;
use chronicle_types::{ColumnSpec, ColumnType, AUDIT_LOG_TABLE};

use crate::error::AuditError;

/// Returns the audit table's column layout, in column order.
///
/// `user` is the sole key column; the remaining three columns carry the
/// recorded action.
pub fn audit_log_columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::new("user", ColumnType::Text, true),
        ColumnSpec::new("operation", ColumnType::Text, false),
        ColumnSpec::new("description", ColumnType::Text, false),
        ColumnSpec::new("time", ColumnType::Text, false),
    ]
}

/// Creates the audit table through the host.
///
/// Called exactly once, at bootstrap. Creation is not idempotent: if the
/// host reports the table already exists, the failure is surfaced to the
/// caller rather than suppressed.
///
/// # Errors
///
/// Returns [`AuditError::Store`] when the host rejects the creation.
pub fn create_audit_table(host: &dyn LedgerHost) -> Result<(), AuditError> {
    let columns = audit_log_columns();
    host.create_table(AUDIT_LOG_TABLE, &columns)?;
    tracing::info!(table = AUDIT_LOG_TABLE, "audit table created");
    Ok(())
}
