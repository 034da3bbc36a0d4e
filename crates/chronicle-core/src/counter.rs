//! Global event counter maintenance.
//!
//! The counter is an explicit keyed state value on the host, not a
//! process-global: every read-modify-write happens through the host's state
//! capability within a single invocation, so the core stays stateless across
//! invocations.

use chronicle_host::LedgerHost;
use chronicle_types::EVENT_COUNTER_KEY;

use crate::error::AuditError;

/// Increments the event counter by exactly one and returns the new value.
///
/// An absent counter reads as 0, so the first bump returns 1. Must be
/// invoked at most once per successful entry insertion and never on a
/// failed one. The read-then-write is one logical step within the
/// invocation; the host serialises invocations, so no other work can
/// interleave with it.
///
/// # Errors
///
/// Returns [`AuditError::CounterCorrupt`] when the stored value is not a
/// decimal integer, and [`AuditError::Store`] on a host failure.
pub fn bump(host: &dyn LedgerHost) -> Result<u64, AuditError> {
    let current = match host.get_state(EVENT_COUNTER_KEY)? {
        Some(bytes) => parse_counter(&bytes)?,
        None => 0,
    };
    let next = current + 1;
    host.put_state(EVENT_COUNTER_KEY, next.to_string().as_bytes())?;
    Ok(next)
}

fn parse_counter(bytes: &[u8]) -> Result<u64, AuditError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|_| AuditError::CounterCorrupt(String::from_utf8_lossy(bytes).into_owned()))?;
    text.parse::<u64>()
        .map_err(|_| AuditError::CounterCorrupt(text.to_string()))
}
