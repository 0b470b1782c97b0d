use std::sync::Arc;

use tracing::info;

use super::domain::{EvaluationInput, EvaluationResult, IncentiveRule, RuleDraft, RuleId};
use super::evaluation::{self, InvalidEvaluationInput};
use super::repository::{RuleRepository, RuleRepositoryError};

/// Outbound hook that records eligible payouts for the audit trail.
pub trait AuditSink: Send + Sync {
    fn record(&self, outcome: &EvaluationResult) -> Result<(), AuditError>;
}

/// Audit dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("audit sink unavailable: {0}")]
    Unavailable(String),
}

/// Sink used by the binary: payouts land in the structured log stream.
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, outcome: &EvaluationResult) -> Result<(), AuditError> {
        info!(
            account = %outcome.account_id,
            rule = outcome.matched_rule_id.as_ref().map(|id| id.0.as_str()),
            tier = outcome.matched_tier_index,
            amount = outcome.incentive_amount,
            "incentive payout recorded"
        );
        Ok(())
    }
}

/// Facade composing the rule repository, the evaluator, and the audit sink.
pub struct IncentiveService<A> {
    rules: Arc<RuleRepository>,
    audit: Arc<A>,
}

impl<A> IncentiveService<A>
where
    A: AuditSink + 'static,
{
    pub fn new(rules: Arc<RuleRepository>, audit: Arc<A>) -> Self {
        Self { rules, audit }
    }

    pub fn rules(&self) -> &RuleRepository {
        &self.rules
    }

    pub fn add_rule(&self, draft: RuleDraft) -> Result<IncentiveRule, IncentiveServiceError> {
        Ok(self.rules.add(draft)?)
    }

    pub fn update_rule(
        &self,
        id: &RuleId,
        draft: RuleDraft,
    ) -> Result<IncentiveRule, IncentiveServiceError> {
        Ok(self.rules.update(id, draft)?)
    }

    pub fn remove_rule(&self, id: &RuleId) -> Result<(), IncentiveServiceError> {
        Ok(self.rules.remove(id)?)
    }

    pub fn set_rule_active(
        &self,
        id: &RuleId,
        active: bool,
    ) -> Result<IncentiveRule, IncentiveServiceError> {
        Ok(self.rules.set_active(id, active)?)
    }

    pub fn list_rules(&self, active_only: bool) -> Vec<IncentiveRule> {
        self.rules.list(active_only)
    }

    /// Run one evaluation against a consistent snapshot of the active rules.
    /// Eligible outcomes are forwarded to the audit sink.
    pub fn evaluate(
        &self,
        input: EvaluationInput,
    ) -> Result<EvaluationResult, IncentiveServiceError> {
        let snapshot = self.rules.snapshot_active();
        let result = evaluation::evaluate(&input, &snapshot)?;

        if result.is_eligible() {
            self.audit.record(&result)?;
        }

        Ok(result)
    }
}

/// Error raised by the incentive service.
#[derive(Debug, thiserror::Error)]
pub enum IncentiveServiceError {
    #[error(transparent)]
    Repository(#[from] RuleRepositoryError),
    #[error(transparent)]
    Input(#[from] InvalidEvaluationInput),
    #[error(transparent)]
    Audit(#[from] AuditError),
}
