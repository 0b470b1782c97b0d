//! Pure flat-tier incentive math. No I/O, no repository mutation; safe to
//! call concurrently against any consistent snapshot of the active rules.

use super::domain::{EvaluationInput, EvaluationReason, EvaluationResult, IncentiveRule};

/// Rejections for malformed aggregates. Distinct from ineligibility, which is
/// a representable result rather than an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidEvaluationInput {
    #[error("period commission is negative ({0})")]
    NegativeCommission(i64),
    #[error("period revenue is negative ({0})")]
    NegativeRevenue(i64),
}

/// Evaluate one account's period aggregates against the active rule set.
///
/// The matched tier is the highest rung whose threshold does not exceed the
/// period revenue; revenue landing exactly on a threshold reaches that rung.
/// The matched tier's rate applies to the whole revenue amount (flat-tier
/// model, not tax-bracket style).
pub fn evaluate(
    input: &EvaluationInput,
    active_rules: &[IncentiveRule],
) -> Result<EvaluationResult, InvalidEvaluationInput> {
    if input.period_commission < 0 {
        return Err(InvalidEvaluationInput::NegativeCommission(
            input.period_commission,
        ));
    }
    if input.period_revenue < 0 {
        return Err(InvalidEvaluationInput::NegativeRevenue(input.period_revenue));
    }

    let Some(rule) = active_rules
        .iter()
        .find(|rule| rule.is_active && rule.band_contains(input.commission_rate_bps))
    else {
        return Ok(EvaluationResult::ineligible(
            input.account_id.clone(),
            None,
            EvaluationReason::NoMatchingRateBand,
        ));
    };

    if input.period_commission < rule.min_commission_threshold {
        return Ok(EvaluationResult::ineligible(
            input.account_id.clone(),
            Some(rule.id.clone()),
            EvaluationReason::BelowMinimumCommission,
        ));
    }

    if input.period_revenue < rule.base_revenue_threshold {
        return Ok(EvaluationResult::ineligible(
            input.account_id.clone(),
            Some(rule.id.clone()),
            EvaluationReason::BelowBaseRevenue,
        ));
    }

    // Tiers are validated ascending, so the last threshold at or below the
    // revenue is the matched rung. Revenue past the base threshold can still
    // sit under the first rung when the base is configured below it.
    let matched = rule
        .tiers
        .iter()
        .rposition(|tier| tier.revenue_threshold <= input.period_revenue);

    let Some(tier_index) = matched else {
        return Ok(EvaluationResult::ineligible(
            input.account_id.clone(),
            Some(rule.id.clone()),
            EvaluationReason::BelowBaseRevenue,
        ));
    };

    let tier = &rule.tiers[tier_index];
    Ok(EvaluationResult {
        account_id: input.account_id.clone(),
        matched_rule_id: Some(rule.id.clone()),
        matched_tier_index: Some(tier_index),
        incentive_amount: payout(input.period_revenue, tier.incentive_rate_bps),
        reason: EvaluationReason::Eligible,
    })
}

/// Integer payout: `amount * bps / 10_000`, widened so large IDR revenues
/// cannot overflow the intermediate product.
fn payout(revenue: i64, rate_bps: u32) -> i64 {
    let product = i128::from(revenue) * i128::from(rate_bps) / 10_000;
    product as i64
}
