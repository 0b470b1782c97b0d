use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use super::domain::{IncentiveRule, RuleDraft, RuleId, RuleValidationError};

static RULE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_rule_id() -> RuleId {
    let id = RULE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    RuleId(format!("rule-{id:04}"))
}

/// In-memory store of incentive rules with write-time validation.
///
/// Administrative writes take the write lock; evaluation paths read a cloned
/// snapshot so they never observe a partially applied edit.
#[derive(Debug, Default)]
pub struct RuleRepository {
    rules: RwLock<Vec<IncentiveRule>>,
}

/// Error enumeration for repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RuleRepositoryError {
    #[error(transparent)]
    Validation(#[from] RuleValidationError),
    #[error("incentive rule not found")]
    NotFound,
}

impl RuleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a repository from persisted records, re-validating every rule
    /// and the non-overlap invariant across the active set.
    pub fn from_records(records: Vec<IncentiveRule>) -> Result<Self, RuleRepositoryError> {
        let mut accepted: Vec<IncentiveRule> = Vec::with_capacity(records.len());
        for rule in records {
            let draft = RuleDraft {
                name: rule.name.clone(),
                description: rule.description.clone(),
                min_commission_threshold: rule.min_commission_threshold,
                commission_rate_min_bps: rule.commission_rate_min_bps,
                commission_rate_max_bps: rule.commission_rate_max_bps,
                base_revenue_threshold: rule.base_revenue_threshold,
                tiers: rule.tiers.clone(),
                is_active: rule.is_active,
            };
            draft.validate()?;
            if rule.is_active {
                ensure_band_free(&accepted, &draft, None)?;
            }
            accepted.push(rule);
        }

        Ok(Self {
            rules: RwLock::new(accepted),
        })
    }

    /// Dump every rule (active and dormant) for the persistence adapter.
    pub fn records(&self) -> Vec<IncentiveRule> {
        self.read().clone()
    }

    /// Validate and store a new rule, assigning it a fresh id.
    pub fn add(&self, draft: RuleDraft) -> Result<IncentiveRule, RuleRepositoryError> {
        draft.validate()?;

        let mut rules = self.write();
        if draft.is_active {
            ensure_band_free(&rules, &draft, None)?;
        }

        let rule = draft.into_rule(next_rule_id());
        rules.push(rule.clone());
        Ok(rule)
    }

    /// Replace an existing rule, re-validating as if newly added but with the
    /// rule itself excluded from the overlap check.
    pub fn update(&self, id: &RuleId, draft: RuleDraft) -> Result<IncentiveRule, RuleRepositoryError> {
        draft.validate()?;

        let mut rules = self.write();
        let position = rules
            .iter()
            .position(|rule| &rule.id == id)
            .ok_or(RuleRepositoryError::NotFound)?;

        if draft.is_active {
            ensure_band_free(&rules, &draft, Some(id))?;
        }

        let rule = draft.into_rule(id.clone());
        rules[position] = rule.clone();
        Ok(rule)
    }

    /// Delete a rule. Evaluations already recorded elsewhere are unaffected.
    pub fn remove(&self, id: &RuleId) -> Result<(), RuleRepositoryError> {
        let mut rules = self.write();
        let position = rules
            .iter()
            .position(|rule| &rule.id == id)
            .ok_or(RuleRepositoryError::NotFound)?;
        rules.remove(position);
        Ok(())
    }

    /// Toggle a rule's participation in evaluation without deleting history.
    /// Re-activation re-checks the overlap invariant against the active set.
    pub fn set_active(&self, id: &RuleId, active: bool) -> Result<IncentiveRule, RuleRepositoryError> {
        let mut rules = self.write();
        let position = rules
            .iter()
            .position(|rule| &rule.id == id)
            .ok_or(RuleRepositoryError::NotFound)?;

        if active {
            let candidate = &rules[position];
            if let Some(existing) = rules.iter().find(|rule| {
                rule.is_active
                    && rule.id != *id
                    && rule.band_overlaps(
                        candidate.commission_rate_min_bps,
                        candidate.commission_rate_max_bps,
                    )
            }) {
                return Err(RuleValidationError::OverlappingBand {
                    existing: existing.id.clone(),
                }
                .into());
            }
        }

        rules[position].is_active = active;
        Ok(rules[position].clone())
    }

    /// The active rule whose band contains `rate_bps`, if any. At most one
    /// can match because overlap is rejected at write time.
    pub fn find_by_commission_rate(&self, rate_bps: u32) -> Option<IncentiveRule> {
        self.read()
            .iter()
            .find(|rule| rule.is_active && rule.band_contains(rate_bps))
            .cloned()
    }

    /// Rules ordered by band lower bound for stable listings.
    pub fn list(&self, active_only: bool) -> Vec<IncentiveRule> {
        let mut rules: Vec<IncentiveRule> = self
            .read()
            .iter()
            .filter(|rule| !active_only || rule.is_active)
            .cloned()
            .collect();
        rules.sort_by_key(|rule| rule.commission_rate_min_bps);
        rules
    }

    /// Consistent clone of the active set for a single evaluation pass.
    pub fn snapshot_active(&self) -> Vec<IncentiveRule> {
        self.read()
            .iter()
            .filter(|rule| rule.is_active)
            .cloned()
            .collect()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<IncentiveRule>> {
        self.rules.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Vec<IncentiveRule>> {
        self.rules.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn ensure_band_free(
    rules: &[IncentiveRule],
    draft: &RuleDraft,
    exclude: Option<&RuleId>,
) -> Result<(), RuleRepositoryError> {
    let collision = rules.iter().find(|rule| {
        rule.is_active
            && exclude != Some(&rule.id)
            && rule.band_overlaps(draft.commission_rate_min_bps, draft.commission_rate_max_bps)
    });

    match collision {
        Some(existing) => Err(RuleValidationError::OverlappingBand {
            existing: existing.id.clone(),
        }
        .into()),
        None => Ok(()),
    }
}
