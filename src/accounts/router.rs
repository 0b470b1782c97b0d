use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Router,
};
use serde_json::json;

use crate::sales::SalesLedger;

use super::directory::{AccountDirectory, DirectoryError};
use super::domain::{AccountDraft, AccountId, CategoryDraft, CategoryId};

/// Shared state for the account endpoints. The ledger rides along so account
/// deletion can drop the affiliate's sales rows in the same call.
#[derive(Clone)]
pub struct AccountsState {
    pub directory: Arc<AccountDirectory>,
    pub ledger: Arc<SalesLedger>,
}

/// Router builder exposing account and category CRUD.
pub fn account_router(state: AccountsState) -> Router {
    Router::new()
        .route(
            "/api/v1/accounts",
            get(list_accounts_handler).post(add_account_handler),
        )
        .route(
            "/api/v1/accounts/:account_id",
            put(update_account_handler).delete(remove_account_handler),
        )
        .route(
            "/api/v1/categories",
            get(list_categories_handler).post(add_category_handler),
        )
        .route(
            "/api/v1/categories/:category_id",
            put(update_category_handler).delete(remove_category_handler),
        )
        .with_state(state)
}

async fn list_accounts_handler(State(state): State<AccountsState>) -> Response {
    (StatusCode::OK, axum::Json(state.directory.list_accounts())).into_response()
}

async fn add_account_handler(
    State(state): State<AccountsState>,
    axum::Json(draft): axum::Json<AccountDraft>,
) -> Response {
    match state.directory.add_account(draft) {
        Ok(account) => (StatusCode::CREATED, axum::Json(account)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn update_account_handler(
    State(state): State<AccountsState>,
    Path(account_id): Path<String>,
    axum::Json(draft): axum::Json<AccountDraft>,
) -> Response {
    match state.directory.update_account(&AccountId(account_id), draft) {
        Ok(account) => (StatusCode::OK, axum::Json(account)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn remove_account_handler(
    State(state): State<AccountsState>,
    Path(account_id): Path<String>,
) -> Response {
    let id = AccountId(account_id);
    match state.directory.remove_account(&id) {
        Ok(account) => {
            let rows_dropped = state.ledger.drop_account(&id);
            let payload = json!({
                "account_id": account.id.0,
                "account_code": account.account_code,
                "sales_rows_dropped": rows_dropped,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

async fn list_categories_handler(State(state): State<AccountsState>) -> Response {
    (StatusCode::OK, axum::Json(state.directory.list_categories())).into_response()
}

async fn add_category_handler(
    State(state): State<AccountsState>,
    axum::Json(draft): axum::Json<CategoryDraft>,
) -> Response {
    match state.directory.add_category(draft) {
        Ok(category) => (StatusCode::CREATED, axum::Json(category)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn update_category_handler(
    State(state): State<AccountsState>,
    Path(category_id): Path<String>,
    axum::Json(draft): axum::Json<CategoryDraft>,
) -> Response {
    match state
        .directory
        .update_category(&CategoryId(category_id), draft)
    {
        Ok(category) => (StatusCode::OK, axum::Json(category)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn remove_category_handler(
    State(state): State<AccountsState>,
    Path(category_id): Path<String>,
) -> Response {
    match state.directory.remove_category(&CategoryId(category_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: DirectoryError) -> Response {
    let status = match &error {
        DirectoryError::AccountNotFound | DirectoryError::CategoryNotFound => {
            StatusCode::NOT_FOUND
        }
        DirectoryError::DuplicateUsername(_) => StatusCode::CONFLICT,
        DirectoryError::EmptyUsername | DirectoryError::UnknownCategory => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
