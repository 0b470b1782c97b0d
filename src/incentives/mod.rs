//! Tiered incentive rules and the evaluator that turns period aggregates
//! into payable bonus amounts.

pub mod catalog;
pub mod domain;
pub mod evaluation;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    EvaluationInput, EvaluationReason, EvaluationResult, IncentiveRule, IncentiveTier, RuleDraft,
    RuleId, RuleValidationError,
};
pub use evaluation::{evaluate, InvalidEvaluationInput};
pub use repository::{RuleRepository, RuleRepositoryError};
pub use router::incentive_router;
pub use service::{AuditError, AuditSink, IncentiveService, IncentiveServiceError, TracingAuditSink};
