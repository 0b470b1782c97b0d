use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use crate::accounts::directory::AccountDirectory;
use crate::incentives::service::{AuditSink, IncentiveService};
use crate::sales::domain::DateWindow;
use crate::sales::ledger::SalesLedger;

use super::{incentive_overview, performance_rows};

/// Shared state for report endpoints.
pub struct ReportsState<A> {
    pub directory: Arc<AccountDirectory>,
    pub ledger: Arc<SalesLedger>,
    pub service: Arc<IncentiveService<A>>,
}

impl<A> Clone for ReportsState<A> {
    fn clone(&self) -> Self {
        Self {
            directory: self.directory.clone(),
            ledger: self.ledger.clone(),
            service: self.service.clone(),
        }
    }
}

/// Router builder for the performance report and the incentive overview.
pub fn reports_router<A>(state: ReportsState<A>) -> Router
where
    A: AuditSink + 'static,
{
    Router::new()
        .route("/api/v1/reports/performance", post(performance_handler::<A>))
        .route(
            "/api/v1/reports/incentive-overview",
            post(overview_handler::<A>),
        )
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
struct WindowRequest {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

impl WindowRequest {
    fn window(&self) -> DateWindow {
        DateWindow::new(self.start, self.end)
    }
}

async fn performance_handler<A>(
    State(state): State<ReportsState<A>>,
    axum::Json(request): axum::Json<WindowRequest>,
) -> Response
where
    A: AuditSink + 'static,
{
    let rows = performance_rows(&state.directory, &state.ledger, &request.window());
    (StatusCode::OK, axum::Json(rows)).into_response()
}

async fn overview_handler<A>(
    State(state): State<ReportsState<A>>,
    axum::Json(request): axum::Json<WindowRequest>,
) -> Response
where
    A: AuditSink + 'static,
{
    match incentive_overview(
        &state.directory,
        &state.ledger,
        &state.service,
        &request.window(),
    ) {
        Ok(rows) => (StatusCode::OK, axum::Json(rows)).into_response(),
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
