//! Invocation API handlers.
//!
//! Each handler plays the Ledger Host's dispatch role: it receives an HTTP
//! request, builds the positional string arguments, and drives the audit
//! core's dispatch surface over one pooled connection inside
//! `spawn_blocking`. Core errors map onto HTTP statuses with the error
//! message surfaced verbatim in a JSON `error` field.

use crate::AppState;
use axum::{
    extract::{Extension, Path, Query},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chronicle_core::{dispatch, query, AuditError};
use chronicle_host::{HostError, LedgerHost};
use chronicle_sqlite::{DbPool, SqliteHost};
use chronicle_types::AuditEntry;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Request body for `POST /api/bootstrap` and `POST /api/audit/entries`.
#[derive(Debug, Deserialize)]
pub struct EntryRequest {
    /// The acting principal.
    pub user: String,
    /// The action performed.
    pub operation: String,
    /// Free-form detail about the action.
    pub description: String,
    /// Caller-supplied time representation (opaque).
    pub time: String,
}

impl EntryRequest {
    fn into_args(self) -> Vec<String> {
        vec![self.user, self.operation, self.description, self.time]
    }
}

/// Query parameters for `GET /api/audit/entries`.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Key prefix to match; an empty or absent prefix matches every entry.
    pub prefix: Option<String>,
}

/// Response wrapper for `GET /api/audit/entries`.
#[derive(Debug, Serialize, Deserialize)]
pub struct EntriesResponse {
    /// The matching entries in insertion order.
    pub entries: Vec<AuditEntry>,
    /// The number of entries returned.
    pub count: usize,
}

/// Handler for `POST /api/bootstrap`.
///
/// Creates the audit table. Bootstrap is not idempotent: invoking it twice
/// returns a store error.
pub async fn bootstrap_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(body): Json<EntryRequest>,
) -> Result<Json<serde_json::Value>, Response> {
    let invocation = Uuid::new_v4();
    tracing::info!(%invocation, user = %body.user, "bootstrap invocation");

    let args = body.into_args();
    run_dispatch(state.pool.clone(), move |host| {
        dispatch::bootstrap(host, &args)
    })
    .await?;

    Ok(Json(serde_json::json!({ "status": "ok" })))
}

/// Handler for `POST /api/audit/entries`.
///
/// Records one audit entry; `409 Conflict` when the user already has one.
pub async fn record_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(body): Json<EntryRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), Response> {
    let invocation = Uuid::new_v4();
    tracing::info!(%invocation, user = %body.user, operation = %body.operation, "record invocation");

    let args = body.into_args();
    run_dispatch(state.pool.clone(), move |host| dispatch::record(host, &args)).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "status": "recorded" })),
    ))
}

/// Handler for `GET /api/audit/entries/{user}`.
///
/// Returns the single entry recorded for the user, as the serialized
/// invocation payload; `404 Not Found` when no entry exists.
pub async fn query_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(user): Path<String>,
) -> Result<Response, Response> {
    let invocation = Uuid::new_v4();
    tracing::debug!(%invocation, user = %user, "query invocation");

    let args = vec![user];
    let payload =
        run_dispatch(state.pool.clone(), move |host| dispatch::query(host, &args)).await?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        payload,
    )
        .into_response())
}

/// Handler for `GET /api/audit/entries`.
///
/// Drains the multi-row feed for a key prefix and returns the entries in
/// insertion order.
pub async fn list_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<ListQuery>,
) -> Result<Json<EntriesResponse>, Response> {
    let invocation = Uuid::new_v4();
    let prefix = params.prefix.unwrap_or_default();
    tracing::debug!(%invocation, prefix = %prefix, "list invocation");

    let entries = run_dispatch(state.pool.clone(), move |host| {
        query::lookup_many(host, &prefix)
    })
    .await?;

    let count = entries.len();
    Ok(Json(EntriesResponse { entries, count }))
}

/// Runs one invocation against a pooled connection on the blocking pool.
async fn run_dispatch<T, F>(pool: DbPool, invoke: F) -> Result<T, Response>
where
    T: Send + 'static,
    F: FnOnce(&dyn LedgerHost) -> Result<T, AuditError> + Send + 'static,
{
    let result = tokio::task::spawn_blocking(move || {
        let conn = pool
            .get()
            .map_err(|e| AuditError::Store(HostError::Storage(e.to_string())))?;
        let host = SqliteHost::new(&conn);
        invoke(&host)
    })
    .await
    .map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": format!("task join error: {e}") })),
        )
            .into_response()
    })?;

    result.map_err(|e| error_response(&e))
}

/// Maps the core error taxonomy onto HTTP statuses.
fn error_response(err: &AuditError) -> Response {
    let status = match err {
        AuditError::Arguments { .. } | AuditError::UnknownOperation(_) => StatusCode::BAD_REQUEST,
        AuditError::AlreadyExists(_) => StatusCode::CONFLICT,
        AuditError::NotFound(_) => StatusCode::NOT_FOUND,
        AuditError::Store(_)
        | AuditError::CorruptRow(_)
        | AuditError::CounterCorrupt(_)
        | AuditError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (
        status,
        Json(serde_json::json!({ "error": err.to_string() })),
    )
        .into_response()
}
