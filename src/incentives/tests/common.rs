use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::accounts::domain::AccountId;
use crate::incentives::domain::{EvaluationInput, EvaluationResult, IncentiveTier, RuleDraft};
use crate::incentives::repository::RuleRepository;
use crate::incentives::router::incentive_router;
use crate::incentives::service::{AuditError, AuditSink, IncentiveService};

/// The rule from the dashboard's standard band, truncated to three tiers so
/// the scenario arithmetic stays easy to eyeball.
pub(super) fn standard_rule_draft() -> RuleDraft {
    RuleDraft {
        name: "Standard Commission (5% - 7.99%)".to_string(),
        description: "Standard band".to_string(),
        min_commission_threshold: 50_000,
        commission_rate_min_bps: 500,
        commission_rate_max_bps: 799,
        base_revenue_threshold: 80_000_000,
        tiers: vec![
            IncentiveTier {
                revenue_threshold: 80_000_000,
                incentive_rate_bps: 40,
            },
            IncentiveTier {
                revenue_threshold: 90_000_000,
                incentive_rate_bps: 60,
            },
            IncentiveTier {
                revenue_threshold: 100_000_000,
                incentive_rate_bps: 80,
            },
        ],
        is_active: true,
    }
}

pub(super) fn high_rule_draft() -> RuleDraft {
    RuleDraft {
        name: "High Commission (8%+)".to_string(),
        description: "High band".to_string(),
        min_commission_threshold: 50_000,
        commission_rate_min_bps: 800,
        commission_rate_max_bps: 10_000,
        base_revenue_threshold: 50_000_000,
        tiers: vec![
            IncentiveTier {
                revenue_threshold: 50_000_000,
                incentive_rate_bps: 40,
            },
            IncentiveTier {
                revenue_threshold: 60_000_000,
                incentive_rate_bps: 60,
            },
        ],
        is_active: true,
    }
}

pub(super) fn input(rate_bps: u32, commission: i64, revenue: i64) -> EvaluationInput {
    EvaluationInput {
        account_id: AccountId("acct-000001".to_string()),
        commission_rate_bps: rate_bps,
        period_commission: commission,
        period_revenue: revenue,
    }
}

pub(super) fn repository_with_standard() -> RuleRepository {
    let repository = RuleRepository::new();
    repository.add(standard_rule_draft()).expect("valid rule");
    repository
}

#[derive(Default)]
pub(super) struct MemoryAudit {
    entries: Mutex<Vec<EvaluationResult>>,
}

impl MemoryAudit {
    pub(super) fn entries(&self) -> Vec<EvaluationResult> {
        self.entries.lock().expect("audit mutex poisoned").clone()
    }
}

impl AuditSink for MemoryAudit {
    fn record(&self, outcome: &EvaluationResult) -> Result<(), AuditError> {
        self.entries
            .lock()
            .expect("audit mutex poisoned")
            .push(outcome.clone());
        Ok(())
    }
}

pub(super) fn build_service() -> (
    IncentiveService<MemoryAudit>,
    Arc<RuleRepository>,
    Arc<MemoryAudit>,
) {
    let repository = Arc::new(repository_with_standard());
    let audit = Arc::new(MemoryAudit::default());
    let service = IncentiveService::new(repository.clone(), audit.clone());
    (service, repository, audit)
}

pub(super) fn router_with_service(service: IncentiveService<MemoryAudit>) -> axum::Router {
    incentive_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
