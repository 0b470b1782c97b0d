use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use super::common::*;

fn json_request(method: &str, uri: &str, payload: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request builds")
}

#[tokio::test]
async fn evaluate_endpoint_returns_the_payout() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let request = json_request(
        "POST",
        "/api/v1/incentives/evaluate",
        json!({
            "account_id": "acct-000001",
            "commission_rate_bps": 650,
            "period_commission": 60_000,
            "period_revenue": 95_000_000,
        }),
    );

    let response = router.oneshot(request).await.expect("routes");
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json_body(response).await;
    assert_eq!(body["reason"], "eligible");
    assert_eq!(body["matched_tier_index"], 1);
    assert_eq!(body["incentive_amount"], 570_000);
}

#[tokio::test]
async fn evaluate_endpoint_rejects_negative_aggregates() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let request = json_request(
        "POST",
        "/api/v1/incentives/evaluate",
        json!({
            "account_id": "acct-000001",
            "commission_rate_bps": 650,
            "period_commission": -1,
            "period_revenue": 95_000_000,
        }),
    );

    let response = router.oneshot(request).await.expect("routes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn rule_creation_round_trips_through_the_api() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let request = json_request(
        "POST",
        "/api/v1/incentives/rules",
        serde_json::to_value(high_rule_draft()).expect("serializes"),
    );

    let response = router.clone().oneshot(request).await.expect("routes");
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = read_json_body(response).await;
    assert!(created["id"].as_str().expect("id assigned").starts_with("rule-"));

    let list = router
        .oneshot(
            Request::builder()
                .uri("/api/v1/incentives/rules?active_only=true")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("routes");
    let rules = read_json_body(list).await;
    assert_eq!(rules.as_array().expect("array").len(), 2);
}

#[tokio::test]
async fn malformed_rules_are_unprocessable() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let mut draft = standard_rule_draft();
    draft.tiers.clear();
    let request = json_request(
        "POST",
        "/api/v1/incentives/rules",
        serde_json::to_value(draft).expect("serializes"),
    );

    let response = router.oneshot(request).await.expect("routes");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert!(body["error"].as_str().expect("message").contains("tier"));
}

#[tokio::test]
async fn deleting_an_unknown_rule_is_not_found() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/v1/incentives/rules/rule-9999")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("routes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn status_endpoint_toggles_participation() {
    let (service, repository, _) = build_service();
    let rule = repository.list(false)[0].clone();
    let router = router_with_service(service);

    let request = json_request(
        "POST",
        &format!("/api/v1/incentives/rules/{}/status", rule.id.0),
        json!({ "active": false }),
    );

    let response = router.oneshot(request).await.expect("routes");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["is_active"], false);
    assert!(repository.list(true).is_empty());
}
