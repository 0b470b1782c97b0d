//! Dashboard summaries composed from the directory, the ledger, and the
//! incentive engine.

pub mod router;

use serde::Serialize;

use crate::accounts::directory::AccountDirectory;
use crate::accounts::domain::{Account, AccountId};
use crate::incentives::domain::{EvaluationInput, EvaluationResult};
use crate::incentives::service::{AuditSink, IncentiveService, IncentiveServiceError};
use crate::sales::domain::{DateWindow, PeriodTotals};
use crate::sales::ledger::SalesLedger;

pub use router::{reports_router, ReportsState};

/// One account's aggregate performance over a reporting window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountPerformanceRow {
    pub account_id: AccountId,
    pub username: String,
    pub account_code: String,
    pub totals: PeriodTotals,
    pub effective_commission_rate_bps: Option<u32>,
}

/// Aggregate every registered account over the window, including accounts
/// with no rows in it (their totals are zero), mirroring the reports tab.
pub fn performance_rows(
    directory: &AccountDirectory,
    ledger: &SalesLedger,
    window: &DateWindow,
) -> Vec<AccountPerformanceRow> {
    directory
        .list_accounts()
        .into_iter()
        .map(|account| {
            let totals = ledger.aggregate(&account.id, window);
            AccountPerformanceRow {
                effective_commission_rate_bps: totals.effective_commission_rate_bps(),
                account_id: account.id,
                username: account.username,
                account_code: account.account_code,
                totals,
            }
        })
        .collect()
}

/// One account's incentive standing in the overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountIncentiveRow {
    pub account_id: AccountId,
    pub username: String,
    pub account_code: String,
    pub commission_rate_bps: u32,
    pub totals: PeriodTotals,
    pub evaluation: EvaluationResult,
}

/// Run the evaluator for every active account using ledger aggregates over
/// the window and the account's nominal commission rate.
pub fn incentive_overview<A>(
    directory: &AccountDirectory,
    ledger: &SalesLedger,
    service: &IncentiveService<A>,
    window: &DateWindow,
) -> Result<Vec<AccountIncentiveRow>, IncentiveServiceError>
where
    A: AuditSink + 'static,
{
    let mut rows = Vec::new();
    for account in directory.active_accounts() {
        rows.push(overview_row(account, ledger, service, window)?);
    }
    Ok(rows)
}

fn overview_row<A>(
    account: Account,
    ledger: &SalesLedger,
    service: &IncentiveService<A>,
    window: &DateWindow,
) -> Result<AccountIncentiveRow, IncentiveServiceError>
where
    A: AuditSink + 'static,
{
    let totals = ledger.aggregate(&account.id, window);
    let evaluation = service.evaluate(EvaluationInput {
        account_id: account.id.clone(),
        commission_rate_bps: account.commission_rate_bps,
        period_commission: totals.commission,
        period_revenue: totals.revenue,
    })?;

    Ok(AccountIncentiveRow {
        account_id: account.id,
        username: account.username,
        account_code: account.account_code,
        commission_rate_bps: account.commission_rate_bps,
        totals,
        evaluation,
    })
}
