//! The invocation surface: bootstrap, record, and query.
//!
//! Each operation validates argument arity before doing anything else and
//! fails fast on a mismatch. The Ledger Host delivers one invocation at a
//! time; results are opaque byte payloads, errors carry a human-readable
//! message the host surfaces verbatim.

use chronicle_host::LedgerHost;
use chronicle_types::AuditEntry;

use crate::error::AuditError;
use crate::{counter, query, schema, store};

/// Topic on which record notifications are emitted.
pub const NOTIFICATION_TOPIC: &str = "audit";

/// Routes an invocation to the named operation.
///
/// # Errors
///
/// Returns [`AuditError::UnknownOperation`] for any operation name other
/// than `bootstrap`, `record` or `query`, plus whatever the routed
/// operation returns.
pub fn dispatch(
    host: &dyn LedgerHost,
    operation: &str,
    args: &[String],
) -> Result<Vec<u8>, AuditError> {
    match operation {
        "bootstrap" => bootstrap(host, args),
        "record" => record(host, args),
        "query" => query(host, args),
        other => Err(AuditError::UnknownOperation(other.to_string())),
    }
}

/// Creates the audit table. Invoked once per deployment.
///
/// Takes the same four arguments as `record` (user, operation, description,
/// time); they are logged but not stored. Creation is not idempotent —
/// bootstrapping twice is an error the caller must avoid.
///
/// # Errors
///
/// Returns [`AuditError::Arguments`] on an arity mismatch, before any
/// storage is touched, and [`AuditError::Store`] when table creation fails.
pub fn bootstrap(host: &dyn LedgerHost, args: &[String]) -> Result<Vec<u8>, AuditError> {
    expect_arity(args, 4)?;

    tracing::info!(
        user = %args[0],
        operation = %args[1],
        description = %args[2],
        time = %args[3],
        "bootstrapping audit log"
    );

    schema::create_audit_table(host)?;
    Ok(Vec::new())
}

/// Records one audit entry.
///
/// On a successful insert, the event counter is bumped exactly once and a
/// notification is emitted on [`NOTIFICATION_TOPIC`] carrying the
/// pre-increment counter value — in that order, after the insert. The
/// insert is not rolled back if a later step fails; atomicity across the
/// three steps is left to whatever transaction boundary the Ledger Host
/// wraps around the invocation.
///
/// # Errors
///
/// Returns [`AuditError::Arguments`] on an arity mismatch,
/// [`AuditError::AlreadyExists`] when the user already has an entry (the
/// counter does not advance in that case), and store-class errors from the
/// insert, bump, or emission.
pub fn record(host: &dyn LedgerHost, args: &[String]) -> Result<Vec<u8>, AuditError> {
    expect_arity(args, 4)?;
    let entry = AuditEntry::from_args(args);

    tracing::info!(
        user = %entry.user,
        operation = %entry.operation,
        "recording audit entry"
    );

    store::insert_entry(host, &entry)?;

    let new_value = counter::bump(host)?;
    let payload = format!("Event Counter is {}", new_value - 1);
    host.emit_notification(NOTIFICATION_TOPIC, payload.as_bytes())?;

    tracing::debug!(user = %entry.user, event_counter = new_value, "audit entry recorded");
    Ok(Vec::new())
}

/// Queries the entry recorded for one user.
///
/// # Errors
///
/// Returns [`AuditError::Arguments`] on an arity mismatch,
/// [`AuditError::NotFound`] when the user has no entry, and
/// [`AuditError::Serialization`] when the result cannot be encoded.
pub fn query(host: &dyn LedgerHost, args: &[String]) -> Result<Vec<u8>, AuditError> {
    expect_arity(args, 1)?;
    let user = &args[0];

    tracing::debug!(user = %user, "querying audit entry");

    let entry = query::lookup_one(host, user)?;
    query::serialize_entry(&entry)
}

fn expect_arity(args: &[String], expected: usize) -> Result<(), AuditError> {
    if args.len() != expected {
        return Err(AuditError::Arguments {
            expected,
            got: args.len(),
        });
    }
    Ok(())
}
