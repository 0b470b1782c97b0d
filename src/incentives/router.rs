use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{EvaluationInput, RuleDraft, RuleId};
use super::repository::RuleRepositoryError;
use super::service::{AuditSink, IncentiveService, IncentiveServiceError};

/// Router builder exposing the administrative and evaluation endpoints.
pub fn incentive_router<A>(service: Arc<IncentiveService<A>>) -> Router
where
    A: AuditSink + 'static,
{
    Router::new()
        .route(
            "/api/v1/incentives/rules",
            get(list_handler::<A>).post(add_handler::<A>),
        )
        .route(
            "/api/v1/incentives/rules/:rule_id",
            put(update_handler::<A>).delete(remove_handler::<A>),
        )
        .route(
            "/api/v1/incentives/rules/:rule_id/status",
            post(status_handler::<A>),
        )
        .route("/api/v1/incentives/evaluate", post(evaluate_handler::<A>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
struct ListQuery {
    #[serde(default)]
    active_only: bool,
}

#[derive(Debug, Deserialize)]
struct StatusRequest {
    active: bool,
}

async fn list_handler<A>(
    State(service): State<Arc<IncentiveService<A>>>,
    Query(query): Query<ListQuery>,
) -> Response
where
    A: AuditSink + 'static,
{
    let rules = service.list_rules(query.active_only);
    (StatusCode::OK, axum::Json(rules)).into_response()
}

async fn add_handler<A>(
    State(service): State<Arc<IncentiveService<A>>>,
    axum::Json(draft): axum::Json<RuleDraft>,
) -> Response
where
    A: AuditSink + 'static,
{
    match service.add_rule(draft) {
        Ok(rule) => (StatusCode::CREATED, axum::Json(rule)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn update_handler<A>(
    State(service): State<Arc<IncentiveService<A>>>,
    Path(rule_id): Path<String>,
    axum::Json(draft): axum::Json<RuleDraft>,
) -> Response
where
    A: AuditSink + 'static,
{
    match service.update_rule(&RuleId(rule_id), draft) {
        Ok(rule) => (StatusCode::OK, axum::Json(rule)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn remove_handler<A>(
    State(service): State<Arc<IncentiveService<A>>>,
    Path(rule_id): Path<String>,
) -> Response
where
    A: AuditSink + 'static,
{
    match service.remove_rule(&RuleId(rule_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

async fn status_handler<A>(
    State(service): State<Arc<IncentiveService<A>>>,
    Path(rule_id): Path<String>,
    axum::Json(request): axum::Json<StatusRequest>,
) -> Response
where
    A: AuditSink + 'static,
{
    match service.set_rule_active(&RuleId(rule_id), request.active) {
        Ok(rule) => (StatusCode::OK, axum::Json(rule)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn evaluate_handler<A>(
    State(service): State<Arc<IncentiveService<A>>>,
    axum::Json(input): axum::Json<EvaluationInput>,
) -> Response
where
    A: AuditSink + 'static,
{
    match service.evaluate(input) {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: IncentiveServiceError) -> Response {
    let status = match &error {
        IncentiveServiceError::Repository(RuleRepositoryError::NotFound) => StatusCode::NOT_FOUND,
        IncentiveServiceError::Repository(RuleRepositoryError::Validation(_)) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        IncentiveServiceError::Input(_) => StatusCode::BAD_REQUEST,
        IncentiveServiceError::Audit(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
