use std::io::Cursor;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use crate::accounts::directory::{AccountDirectory, DirectoryError};
use crate::accounts::domain::AccountId;

use super::domain::DateWindow;
use super::import::{parse_rows, SalesImportError};
use super::ledger::SalesLedger;

/// Shared state for the sales endpoints.
#[derive(Clone)]
pub struct SalesState {
    pub directory: Arc<AccountDirectory>,
    pub ledger: Arc<SalesLedger>,
}

/// Router builder for upload, deletion, and window summaries.
pub fn sales_router(state: SalesState) -> Router {
    Router::new()
        .route("/api/v1/sales/upload", post(upload_handler))
        .route("/api/v1/sales/:account_id", axum::routing::delete(delete_handler))
        .route("/api/v1/sales/:account_id/summary", get(summary_handler))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct UploadRequest {
    account_id: String,
    csv: String,
}

#[derive(Debug, Default, Deserialize)]
struct WindowQuery {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

impl WindowQuery {
    fn window(&self) -> DateWindow {
        DateWindow::new(self.start, self.end)
    }
}

async fn upload_handler(
    State(state): State<SalesState>,
    axum::Json(request): axum::Json<UploadRequest>,
) -> Response {
    let account_id = AccountId(request.account_id);
    if let Err(error) = state.directory.get_account(&account_id) {
        return directory_error_response(error);
    }

    match parse_rows(Cursor::new(request.csv.into_bytes())) {
        Ok(rows) => {
            let ingested = state.ledger.append(&account_id, rows);
            let payload = json!({
                "account_id": account_id.0,
                "rows_ingested": ingested,
            });
            (StatusCode::ACCEPTED, axum::Json(payload)).into_response()
        }
        Err(error) => import_error_response(error),
    }
}

async fn delete_handler(
    State(state): State<SalesState>,
    Path(account_id): Path<String>,
    Query(query): Query<WindowQuery>,
) -> Response {
    let account_id = AccountId(account_id);
    if let Err(error) = state.directory.get_account(&account_id) {
        return directory_error_response(error);
    }

    let removed = state.ledger.delete(&account_id, &query.window());
    let payload = json!({
        "account_id": account_id.0,
        "rows_deleted": removed,
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

async fn summary_handler(
    State(state): State<SalesState>,
    Path(account_id): Path<String>,
    Query(query): Query<WindowQuery>,
) -> Response {
    let account_id = AccountId(account_id);
    if let Err(error) = state.directory.get_account(&account_id) {
        return directory_error_response(error);
    }

    let totals = state.ledger.aggregate(&account_id, &query.window());
    let payload = json!({
        "account_id": account_id.0,
        "totals": totals,
        "effective_commission_rate_bps": totals.effective_commission_rate_bps(),
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

fn directory_error_response(error: DirectoryError) -> Response {
    let status = match &error {
        DirectoryError::AccountNotFound => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

fn import_error_response(error: SalesImportError) -> Response {
    let payload = json!({ "error": error.to_string() });
    (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
}
