use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::accounts::domain::AccountId;

/// One uploaded day of performance for one account. Amounts are whole IDR.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySales {
    pub account_id: AccountId,
    pub date: NaiveDate,
    pub clicks: u32,
    pub orders: u32,
    pub gross_commission: i64,
    pub products_sold: u32,
    pub total_purchases: i64,
    pub new_buyers: u32,
}

/// A parsed upload row before it is attached to an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailySalesRow {
    pub date: NaiveDate,
    pub clicks: u32,
    pub orders: u32,
    pub gross_commission: i64,
    pub products_sold: u32,
    pub total_purchases: i64,
    pub new_buyers: u32,
}

impl DailySalesRow {
    pub(crate) fn attach(self, account_id: AccountId) -> DailySales {
        DailySales {
            account_id,
            date: self.date,
            clicks: self.clicks,
            orders: self.orders,
            gross_commission: self.gross_commission,
            products_sold: self.products_sold,
            total_purchases: self.total_purchases,
            new_buyers: self.new_buyers,
        }
    }
}

/// Sums over a date window; the aggregation feed the incentive evaluator
/// consumes (`commission` and `revenue`) plus the counters the dashboard
/// reports alongside them.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodTotals {
    pub commission: i64,
    pub revenue: i64,
    pub clicks: u64,
    pub orders: u64,
    pub products_sold: u64,
    pub new_buyers: u64,
}

impl PeriodTotals {
    pub fn absorb(&mut self, row: &DailySales) {
        self.commission += row.gross_commission;
        self.revenue += row.total_purchases;
        self.clicks += u64::from(row.clicks);
        self.orders += u64::from(row.orders);
        self.products_sold += u64::from(row.products_sold);
        self.new_buyers += u64::from(row.new_buyers);
    }

    /// Realized commission/revenue ratio in basis points, for reporting only.
    /// The incentive engine matches on the account's nominal rate instead.
    pub fn effective_commission_rate_bps(&self) -> Option<u32> {
        if self.revenue <= 0 {
            return None;
        }
        let bps = i128::from(self.commission) * 10_000 / i128::from(self.revenue);
        u32::try_from(bps).ok()
    }
}

/// Half-open-ended date window; `None` bounds mean unbounded on that side.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateWindow {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        if let Some(start) = self.start {
            if date < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if date > end {
                return false;
            }
        }
        true
    }
}
