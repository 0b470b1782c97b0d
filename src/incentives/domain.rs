use std::fmt;

use serde::{Deserialize, Serialize};

use crate::accounts::domain::AccountId;

/// Identifier wrapper for incentive rules, stable for the rule's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleId(pub String);

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One rung of a rule's revenue ladder.
///
/// `revenue_threshold` is whole IDR; `incentive_rate_bps` is basis points
/// (0.4% = 40), so payout math stays in integer space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncentiveTier {
    pub revenue_threshold: i64,
    pub incentive_rate_bps: u32,
}

/// A validated incentive rule: an eligibility band over commission rates plus
/// an ascending revenue tier ladder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncentiveRule {
    pub id: RuleId,
    pub name: String,
    pub description: String,
    pub min_commission_threshold: i64,
    pub commission_rate_min_bps: u32,
    pub commission_rate_max_bps: u32,
    pub base_revenue_threshold: i64,
    pub tiers: Vec<IncentiveTier>,
    pub is_active: bool,
}

impl IncentiveRule {
    /// Whether this rule's commission-rate band contains `rate_bps`.
    /// Bounds are inclusive: a 5%–7.99% band admits exactly 7.99%.
    pub fn band_contains(&self, rate_bps: u32) -> bool {
        self.commission_rate_min_bps <= rate_bps && rate_bps <= self.commission_rate_max_bps
    }

    pub fn band_overlaps(&self, min_bps: u32, max_bps: u32) -> bool {
        self.commission_rate_min_bps <= max_bps && min_bps <= self.commission_rate_max_bps
    }
}

/// Administrator-submitted rule shape, validated before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDraft {
    pub name: String,
    pub description: String,
    pub min_commission_threshold: i64,
    pub commission_rate_min_bps: u32,
    pub commission_rate_max_bps: u32,
    pub base_revenue_threshold: i64,
    pub tiers: Vec<IncentiveTier>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl RuleDraft {
    /// Structural validation: band orientation, non-negative money, and the
    /// tier ladder invariants (strictly increasing thresholds, non-decreasing
    /// rates). Band overlap against the active set is checked by the
    /// repository, which owns the set.
    pub fn validate(&self) -> Result<(), RuleValidationError> {
        if self.commission_rate_min_bps > self.commission_rate_max_bps {
            return Err(RuleValidationError::InvertedRateBand {
                min_bps: self.commission_rate_min_bps,
                max_bps: self.commission_rate_max_bps,
            });
        }

        if self.min_commission_threshold < 0 || self.base_revenue_threshold < 0 {
            return Err(RuleValidationError::NegativeThreshold);
        }

        if self.tiers.is_empty() {
            return Err(RuleValidationError::EmptyTiers);
        }

        for (index, tier) in self.tiers.iter().enumerate() {
            if tier.revenue_threshold < 0 {
                return Err(RuleValidationError::NegativeThreshold);
            }
            if index == 0 {
                continue;
            }
            let previous = &self.tiers[index - 1];
            if tier.revenue_threshold <= previous.revenue_threshold {
                return Err(RuleValidationError::UnorderedTiers { index });
            }
            if tier.incentive_rate_bps < previous.incentive_rate_bps {
                return Err(RuleValidationError::DecreasingRate { index });
            }
        }

        Ok(())
    }

    pub(crate) fn into_rule(self, id: RuleId) -> IncentiveRule {
        IncentiveRule {
            id,
            name: self.name,
            description: self.description,
            min_commission_threshold: self.min_commission_threshold,
            commission_rate_min_bps: self.commission_rate_min_bps,
            commission_rate_max_bps: self.commission_rate_max_bps,
            base_revenue_threshold: self.base_revenue_threshold,
            tiers: self.tiers,
            is_active: self.is_active,
        }
    }
}

/// Rejections raised when a rule definition is malformed or would collide
/// with the active set. Never coerced; the write fails outright.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleValidationError {
    #[error("rule must define at least one tier")]
    EmptyTiers,
    #[error("tier {index} threshold must exceed the previous tier's threshold")]
    UnorderedTiers { index: usize },
    #[error("tier {index} rate falls below the previous tier's rate")]
    DecreasingRate { index: usize },
    #[error("commission rate band is inverted ({min_bps} bps > {max_bps} bps)")]
    InvertedRateBand { min_bps: u32, max_bps: u32 },
    #[error("monetary thresholds must be non-negative")]
    NegativeThreshold,
    #[error("commission rate band overlaps active rule {existing}")]
    OverlappingBand { existing: RuleId },
}

/// Aggregated performance for one account over an evaluation period.
///
/// `commission_rate_bps` is the account's nominal commission rate, not a
/// ratio derived from the two aggregates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationInput {
    pub account_id: AccountId,
    pub commission_rate_bps: u32,
    pub period_commission: i64,
    pub period_revenue: i64,
}

/// Outcome of evaluating one input against the active rule set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub account_id: AccountId,
    pub matched_rule_id: Option<RuleId>,
    pub matched_tier_index: Option<usize>,
    pub incentive_amount: i64,
    pub reason: EvaluationReason,
}

impl EvaluationResult {
    pub(crate) fn ineligible(
        account_id: AccountId,
        matched_rule_id: Option<RuleId>,
        reason: EvaluationReason,
    ) -> Self {
        Self {
            account_id,
            matched_rule_id,
            matched_tier_index: None,
            incentive_amount: 0,
            reason,
        }
    }

    pub fn is_eligible(&self) -> bool {
        self.reason == EvaluationReason::Eligible
    }
}

/// Why an evaluation paid out, or why it did not. Ineligibility is a normal
/// business outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EvaluationReason {
    Eligible,
    BelowMinimumCommission,
    BelowBaseRevenue,
    NoMatchingRateBand,
}

impl EvaluationReason {
    pub const fn label(self) -> &'static str {
        match self {
            EvaluationReason::Eligible => "eligible",
            EvaluationReason::BelowMinimumCommission => "below-minimum-commission",
            EvaluationReason::BelowBaseRevenue => "below-base-revenue",
            EvaluationReason::NoMatchingRateBand => "no-matching-rate-band",
        }
    }
}
