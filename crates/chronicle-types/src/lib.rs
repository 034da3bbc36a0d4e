//! Shared types and constants for the Chronicle audit-trail store.
//!
//! This crate provides the foundational types used across all Chronicle
//! crates: the audit entry record, the column specifications that describe
//! the audit table, and the well-known storage keys.
//!
//! No crate in the workspace depends on anything *except* `chronicle-types`
//! for cross-cutting type definitions. This keeps the dependency graph clean
//! and prevents circular dependencies.

use serde::{Deserialize, Serialize};

/// Name of the table holding audit entries.
pub const AUDIT_LOG_TABLE: &str = "audit_log";

/// State key under which the global event counter is persisted.
pub const EVENT_COUNTER_KEY: &str = "event_counter";

/// One immutable record of a user action.
///
/// All four fields are caller-supplied strings. `user` is both the lookup
/// key for queries and the uniqueness key for inserts: at most one entry may
/// exist per user, and a second insert for the same user is rejected rather
/// than overwritten. `time` is an opaque time representation — Chronicle
/// never parses or validates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// The acting principal.
    pub user: String,
    /// The action performed.
    pub operation: String,
    /// Free-form detail about the action.
    pub description: String,
    /// Caller-supplied time representation (opaque).
    pub time: String,
}

impl AuditEntry {
    /// Builds an entry from the four positional invocation arguments, in
    /// `user, operation, description, time` order.
    ///
    /// Callers are expected to have checked arity already; this slices the
    /// first four arguments.
    pub fn from_args(args: &[String]) -> Self {
        Self {
            user: args[0].clone(),
            operation: args[1].clone(),
            description: args[2].clone(),
            time: args[3].clone(),
        }
    }

    /// Returns the entry's column values in table column order.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.user.clone(),
            self.operation.clone(),
            self.description.clone(),
            self.time.clone(),
        ]
    }
}

/// Storage type of a table column.
///
/// The audit table only uses text columns; the enum exists so the column
/// specification stays self-describing at the host boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// A UTF-8 string column.
    Text,
}

impl ColumnType {
    /// Returns the canonical label for this column type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "TEXT",
        }
    }
}

/// Specification of a single table column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Column name.
    pub name: &'static str,
    /// Storage type.
    pub column_type: ColumnType,
    /// Whether the column is part of the table's key.
    pub key: bool,
}

impl ColumnSpec {
    /// Convenience constructor.
    pub fn new(name: &'static str, column_type: ColumnType, key: bool) -> Self {
        Self {
            name,
            column_type,
            key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_from_args_preserves_order() {
        let args = vec![
            "alice".to_string(),
            "login".to_string(),
            "user signed in".to_string(),
            "2024-01-01T00:00Z".to_string(),
        ];
        let entry = AuditEntry::from_args(&args);
        assert_eq!(entry.user, "alice");
        assert_eq!(entry.operation, "login");
        assert_eq!(entry.description, "user signed in");
        assert_eq!(entry.time, "2024-01-01T00:00Z");
    }

    #[test]
    fn entry_row_round_trip() {
        let entry = AuditEntry {
            user: "bob".to_string(),
            operation: "delete".to_string(),
            description: "removed a file".to_string(),
            time: "2024-06-01T12:00Z".to_string(),
        };
        let row = entry.to_row();
        assert_eq!(row.len(), 4);
        let restored = AuditEntry::from_args(&row);
        assert_eq!(restored, entry);
    }

    #[test]
    fn entry_serialises_with_field_names() {
        let entry = AuditEntry {
            user: "alice".to_string(),
            operation: "login".to_string(),
            description: "user signed in".to_string(),
            time: "2024-01-01T00:00Z".to_string(),
        };
        let json = serde_json::to_value(&entry).expect("should serialise");
        assert_eq!(json["user"], "alice");
        assert_eq!(json["operation"], "login");
        assert_eq!(json["description"], "user signed in");
        assert_eq!(json["time"], "2024-01-01T00:00Z");
    }

    #[test]
    fn column_type_label() {
        assert_eq!(ColumnType::Text.as_str(), "TEXT");
    }
}
