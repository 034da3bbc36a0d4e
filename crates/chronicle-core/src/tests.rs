//! Unit tests for the audit-trail core, run against the SQLite host.

use chronicle_host::LedgerHost;
use chronicle_sqlite::SqliteHost;
use chronicle_types::EVENT_COUNTER_KEY;
use rusqlite::Connection;

use crate::error::AuditError;
use crate::{dispatch, query};

/// Creates an in-memory SQLite connection with the host tables applied.
fn test_conn() -> Connection {
    let conn = Connection::open_in_memory().expect("should open in-memory db");
    chronicle_sqlite::run_migrations(&conn).expect("migrations should succeed");
    conn
}

fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn bootstrap_args() -> Vec<String> {
    args(&["admin", "init", "audit log deployed", "2024-01-01T00:00Z"])
}

fn record_args(user: &str) -> Vec<String> {
    args(&[user, "login", "user signed in", "2024-01-01T00:00Z"])
}

fn counter_state(host: &SqliteHost<'_>) -> Option<String> {
    host.get_state(EVENT_COUNTER_KEY)
        .expect("state read should succeed")
        .map(|bytes| String::from_utf8(bytes).expect("counter should be utf-8"))
}

fn notification_payloads(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT payload FROM host_notifications ORDER BY id ASC")
        .expect("should prepare notification query");
    let rows = stmt
        .query_map([], |row| row.get::<_, Vec<u8>>(0))
        .expect("should query notifications");
    rows.map(|r| String::from_utf8(r.expect("payload row")).expect("payload utf-8"))
        .collect()
}

// ── bootstrap ────────────────────────────────────────────────────────

#[test]
fn bootstrap_creates_audit_table() {
    let conn = test_conn();
    let host = SqliteHost::new(&conn);

    let payload = dispatch::bootstrap(&host, &bootstrap_args()).expect("bootstrap should succeed");
    assert!(payload.is_empty());

    let exists: bool = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'audit_log')",
            [],
            |row| row.get(0),
        )
        .expect("should query sqlite_master");
    assert!(exists, "audit_log table should exist after bootstrap");
}

#[test]
fn bootstrap_wrong_arity_touches_no_storage() {
    let conn = test_conn();
    let host = SqliteHost::new(&conn);

    let err = dispatch::bootstrap(&host, &args(&["admin", "init", "too-few"]))
        .expect_err("three arguments should be rejected");
    match err {
        AuditError::Arguments { expected, got } => {
            assert_eq!(expected, 4);
            assert_eq!(got, 3);
        }
        other => panic!("expected Arguments error, got {other:?}"),
    }

    let exists: bool = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'audit_log')",
            [],
            |row| row.get(0),
        )
        .expect("should query sqlite_master");
    assert!(!exists, "no table should be created on an arity error");
}

#[test]
fn bootstrap_twice_fails() {
    let conn = test_conn();
    let host = SqliteHost::new(&conn);

    dispatch::bootstrap(&host, &bootstrap_args()).expect("first bootstrap should succeed");
    let err = dispatch::bootstrap(&host, &bootstrap_args())
        .expect_err("re-creating the audit table should fail loudly");
    assert!(matches!(err, AuditError::Store(_)));
}

// ── record ───────────────────────────────────────────────────────────

#[test]
fn record_then_query_round_trips() {
    let conn = test_conn();
    let host = SqliteHost::new(&conn);
    dispatch::bootstrap(&host, &bootstrap_args()).expect("bootstrap");

    dispatch::record(
        &host,
        &args(&["alice", "login", "user signed in", "2024-01-01T00:00Z"]),
    )
    .expect("record should succeed");

    assert_eq!(counter_state(&host).as_deref(), Some("1"));
    assert_eq!(
        notification_payloads(&conn),
        vec!["Event Counter is 0".to_string()],
        "notification should report the pre-increment counter value"
    );

    let payload = dispatch::query(&host, &args(&["alice"])).expect("query should succeed");
    let value: serde_json::Value =
        serde_json::from_slice(&payload).expect("query payload should be JSON");
    assert_eq!(value["user"], "alice");
    assert_eq!(value["operation"], "login");
    assert_eq!(value["description"], "user signed in");
    assert_eq!(value["time"], "2024-01-01T00:00Z");
}

#[test]
fn duplicate_record_is_rejected_and_counter_holds() {
    let conn = test_conn();
    let host = SqliteHost::new(&conn);
    dispatch::bootstrap(&host, &bootstrap_args()).expect("bootstrap");

    dispatch::record(&host, &record_args("alice")).expect("first record should succeed");

    let err = dispatch::record(&host, &record_args("alice"))
        .expect_err("second record for the same user should fail");
    match err {
        AuditError::AlreadyExists(user) => assert_eq!(user, "alice"),
        other => panic!("expected AlreadyExists, got {other:?}"),
    }

    assert_eq!(
        counter_state(&host).as_deref(),
        Some("1"),
        "counter must not advance on a failed insert"
    );
    assert_eq!(
        notification_payloads(&conn).len(),
        1,
        "no notification should be emitted for a rejected insert"
    );
}

#[test]
fn counter_equals_number_of_successful_inserts() {
    let conn = test_conn();
    let host = SqliteHost::new(&conn);
    dispatch::bootstrap(&host, &bootstrap_args()).expect("bootstrap");

    let users = ["erin", "alice", "dave", "bob", "carol"];
    for user in users {
        dispatch::record(&host, &record_args(user)).expect("record should succeed");
    }

    assert_eq!(counter_state(&host).as_deref(), Some("5"));
    assert_eq!(
        notification_payloads(&conn).last().map(String::as_str),
        Some("Event Counter is 4")
    );
}

#[test]
fn record_wrong_arity_is_rejected() {
    let conn = test_conn();
    let host = SqliteHost::new(&conn);
    dispatch::bootstrap(&host, &bootstrap_args()).expect("bootstrap");

    let err = dispatch::record(&host, &args(&["alice", "login"]))
        .expect_err("two arguments should be rejected");
    assert!(matches!(
        err,
        AuditError::Arguments {
            expected: 4,
            got: 2
        }
    ));
    assert_eq!(counter_state(&host), None, "no state change on arity error");
}

#[test]
fn corrupt_counter_state_fails_the_record() {
    let conn = test_conn();
    let host = SqliteHost::new(&conn);
    dispatch::bootstrap(&host, &bootstrap_args()).expect("bootstrap");

    host.put_state(EVENT_COUNTER_KEY, b"not-a-number")
        .expect("state write should succeed");

    let err = dispatch::record(&host, &record_args("alice"))
        .expect_err("record should surface the corrupt counter");
    assert!(matches!(err, AuditError::CounterCorrupt(_)));

    // The insert itself is not rolled back: the counter bump follows the
    // insert with no compensating action, matching the documented
    // eventual-consistency gap.
    assert!(
        query::lookup_one(&host, "alice").is_ok(),
        "entry should remain stored after the failed bump"
    );
    assert!(
        notification_payloads(&conn).is_empty(),
        "no notification should be emitted when the bump fails"
    );
}

// ── query ────────────────────────────────────────────────────────────

#[test]
fn query_absent_user_returns_not_found() {
    let conn = test_conn();
    let host = SqliteHost::new(&conn);
    dispatch::bootstrap(&host, &bootstrap_args()).expect("bootstrap");

    let err = dispatch::query(&host, &args(&["ghost"]))
        .expect_err("absent user should not produce a success payload");
    match err {
        AuditError::NotFound(user) => assert_eq!(user, "ghost"),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn query_wrong_arity_is_rejected() {
    let conn = test_conn();
    let host = SqliteHost::new(&conn);
    dispatch::bootstrap(&host, &bootstrap_args()).expect("bootstrap");

    let err = dispatch::query(&host, &args(&["alice", "extra"]))
        .expect_err("two arguments should be rejected");
    assert!(matches!(
        err,
        AuditError::Arguments {
            expected: 1,
            got: 2
        }
    ));
}

#[test]
fn prefix_lookup_drains_matching_entries_in_order() {
    let conn = test_conn();
    let host = SqliteHost::new(&conn);
    dispatch::bootstrap(&host, &bootstrap_args()).expect("bootstrap");

    for user in ["alice", "alice2", "bob"] {
        dispatch::record(&host, &record_args(user)).expect("record should succeed");
    }

    let entries = query::lookup_many(&host, "alice").expect("prefix lookup should succeed");
    let users: Vec<&str> = entries.iter().map(|e| e.user.as_str()).collect();
    assert_eq!(
        users,
        vec!["alice", "alice2"],
        "matches only, in insertion order"
    );
}

#[test]
fn prefix_lookup_with_no_matches_is_empty() {
    let conn = test_conn();
    let host = SqliteHost::new(&conn);
    dispatch::bootstrap(&host, &bootstrap_args()).expect("bootstrap");
    dispatch::record(&host, &record_args("bob")).expect("record");

    let entries = query::lookup_many(&host, "alice").expect("prefix lookup should succeed");
    assert!(entries.is_empty());
}

#[test]
fn serialized_entries_are_field_named() {
    let conn = test_conn();
    let host = SqliteHost::new(&conn);
    dispatch::bootstrap(&host, &bootstrap_args()).expect("bootstrap");
    dispatch::record(&host, &record_args("alice")).expect("record");

    let entries = query::lookup_many(&host, "alice").expect("prefix lookup");
    let payload = query::serialize_entries(&entries).expect("serialisation should succeed");
    let value: serde_json::Value = serde_json::from_slice(&payload).expect("payload JSON");

    assert!(value.is_array());
    assert_eq!(value[0]["user"], "alice");
    assert_eq!(value[0]["operation"], "login");
}

// ── dispatch routing ─────────────────────────────────────────────────

#[test]
fn dispatch_routes_by_operation_name() {
    let conn = test_conn();
    let host = SqliteHost::new(&conn);

    dispatch::dispatch(&host, "bootstrap", &bootstrap_args()).expect("bootstrap via router");
    dispatch::dispatch(&host, "record", &record_args("alice")).expect("record via router");
    let payload =
        dispatch::dispatch(&host, "query", &args(&["alice"])).expect("query via router");
    assert!(!payload.is_empty());
}

#[test]
fn dispatch_rejects_unknown_operations() {
    let conn = test_conn();
    let host = SqliteHost::new(&conn);

    let err = dispatch::dispatch(&host, "upsert", &args(&["alice"]))
        .expect_err("unknown operation should be rejected");
    match err {
        AuditError::UnknownOperation(op) => assert_eq!(op, "upsert"),
        other => panic!("expected UnknownOperation, got {other:?}"),
    }
}
