use super::common::*;
use crate::incentives::domain::{EvaluationReason, RuleId};
use crate::incentives::repository::RuleRepositoryError;
use crate::incentives::service::IncentiveServiceError;

#[test]
fn eligible_outcomes_reach_the_audit_sink() {
    let (service, _, audit) = build_service();

    let result = service
        .evaluate(input(650, 60_000, 95_000_000))
        .expect("evaluates");

    assert_eq!(result.reason, EvaluationReason::Eligible);
    let entries = audit.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0], result);
}

#[test]
fn ineligible_outcomes_are_not_audited() {
    let (service, _, audit) = build_service();

    let result = service
        .evaluate(input(650, 40_000, 95_000_000))
        .expect("evaluates");

    assert_eq!(result.reason, EvaluationReason::BelowMinimumCommission);
    assert!(audit.entries().is_empty());
}

#[test]
fn invalid_input_surfaces_as_an_input_error() {
    let (service, _, audit) = build_service();

    let result = service.evaluate(input(650, 60_000, -5));
    assert!(matches!(result, Err(IncentiveServiceError::Input(_))));
    assert!(audit.entries().is_empty());
}

#[test]
fn admin_operations_delegate_to_the_repository() {
    let (service, repository, _) = build_service();

    let added = service.add_rule(high_rule_draft()).expect("adds");
    assert_eq!(service.list_rules(false).len(), 2);

    let toggled = service.set_rule_active(&added.id, false).expect("toggles");
    assert!(!toggled.is_active);
    assert_eq!(service.list_rules(true).len(), 1);

    service.remove_rule(&added.id).expect("removes");
    assert_eq!(repository.list(false).len(), 1);

    let missing = service.remove_rule(&RuleId("rule-9999".to_string()));
    assert!(matches!(
        missing,
        Err(IncentiveServiceError::Repository(
            RuleRepositoryError::NotFound
        ))
    ));
}

#[test]
fn rule_edits_change_subsequent_evaluations() {
    let (service, _, _) = build_service();
    let rule = service.list_rules(true)[0].clone();

    let mut changes = standard_rule_draft();
    changes.min_commission_threshold = 70_000;
    service.update_rule(&rule.id, changes).expect("updates");

    let result = service
        .evaluate(input(650, 60_000, 95_000_000))
        .expect("evaluates");
    assert_eq!(result.reason, EvaluationReason::BelowMinimumCommission);
}
