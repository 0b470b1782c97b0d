//! Starter rule catalog seeded at startup so a fresh instance evaluates the
//! same bands the dashboard ships with.

use super::domain::{IncentiveTier, RuleDraft};

const IDR_MILLION: i64 = 1_000_000;

/// The two shipped bands: standard commission (5%–7.99%) and high
/// commission (8% and up). Bands are disjoint so both can be active.
pub fn starter_rules() -> Vec<RuleDraft> {
    vec![standard_commission(), high_commission()]
}

fn standard_commission() -> RuleDraft {
    RuleDraft {
        name: "Standard Commission (5% - 7.99%)".to_string(),
        description: "Incentives for accounts with commission rates between 5% and 7.99%"
            .to_string(),
        min_commission_threshold: 50_000,
        commission_rate_min_bps: 500,
        commission_rate_max_bps: 799,
        base_revenue_threshold: 80 * IDR_MILLION,
        tiers: ladder(80, 10),
        is_active: true,
    }
}

fn high_commission() -> RuleDraft {
    RuleDraft {
        name: "High Commission (8%+)".to_string(),
        description: "Incentives for accounts with commission rates of 8% and above".to_string(),
        min_commission_threshold: 50_000,
        commission_rate_min_bps: 800,
        commission_rate_max_bps: 10_000,
        base_revenue_threshold: 50 * IDR_MILLION,
        tiers: ladder(50, 10),
        is_active: true,
    }
}

/// Six rungs starting at `first_million`, stepping by `step_million`, paying
/// 0.4% / 0.6% / 0.8% / 1.0% / 1.2% / 1.5%.
fn ladder(first_million: i64, step_million: i64) -> Vec<IncentiveTier> {
    const RATES_BPS: [u32; 6] = [40, 60, 80, 100, 120, 150];

    RATES_BPS
        .iter()
        .enumerate()
        .map(|(step, &rate)| IncentiveTier {
            revenue_threshold: (first_million + step as i64 * step_million) * IDR_MILLION,
            incentive_rate_bps: rate,
        })
        .collect()
}
