//! Query resolution and result serialization.
//!
//! Two retrieval shapes are supported. Exact lookup returns the unique
//! matching entry — the correct semantics for the unique-on-user table,
//! where at most one match can ever exist. Prefix lookup drains a
//! producer-style row feed from the host into an ordered sequence; the
//! drain is blocking and runs to feed closure, never exiting early on a
//! count or a timeout.

use chronicle_host::{LedgerHost, Row};
use chronicle_types::{AuditEntry, AUDIT_LOG_TABLE};

use crate::error::AuditError;

/// Looks up the single entry recorded for `user`.
///
/// # Errors
///
/// Returns [`AuditError::NotFound`] when no entry exists for the user —
/// never an empty success payload — and [`AuditError::Store`] on a host
/// failure.
pub fn lookup_one(host: &dyn LedgerHost, user: &str) -> Result<AuditEntry, AuditError> {
    match host.get_row(AUDIT_LOG_TABLE, user)? {
        Some(row) => entry_from_row(row),
        None => Err(AuditError::NotFound(user.to_string())),
    }
}

/// Collects every entry whose user begins with `prefix`.
///
/// The host delivers candidates through a row feed; this drains the feed
/// completely, accumulating rows in the order received (no re-sorting), and
/// treats feed closure as the only termination signal. A feed that never
/// closes blocks the invocation — the invocation envelope owns any deadline.
///
/// # Errors
///
/// Returns [`AuditError::Store`] on a host failure and
/// [`AuditError::CorruptRow`] when a delivered row does not have exactly
/// four columns.
pub fn lookup_many(host: &dyn LedgerHost, prefix: &str) -> Result<Vec<AuditEntry>, AuditError> {
    let feed = host.get_rows(AUDIT_LOG_TABLE, prefix)?;

    let mut entries = Vec::new();
    for row in feed {
        entries.push(entry_from_row(row)?);
    }
    Ok(entries)
}

/// Encodes one entry as a field-named JSON payload.
///
/// # Errors
///
/// Returns [`AuditError::Serialization`] when encoding fails — a failed
/// encode is an error result, never a silent empty payload.
pub fn serialize_entry(entry: &AuditEntry) -> Result<Vec<u8>, AuditError> {
    Ok(serde_json::to_vec(entry)?)
}

/// Encodes a sequence of entries as a field-named JSON payload.
///
/// # Errors
///
/// Returns [`AuditError::Serialization`] when encoding fails.
pub fn serialize_entries(entries: &[AuditEntry]) -> Result<Vec<u8>, AuditError> {
    Ok(serde_json::to_vec(entries)?)
}

fn entry_from_row(row: Row) -> Result<AuditEntry, AuditError> {
    if row.len() != 4 {
        return Err(AuditError::CorruptRow(row.len()));
    }
    Ok(AuditEntry::from_args(&row))
}
