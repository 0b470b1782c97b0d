//! End-to-end scenarios for the incentive pipeline: accounts feed the ledger,
//! the ledger feeds period aggregates, and the evaluator prices the period
//! against the starter rule catalog.

use std::sync::Arc;

use chrono::NaiveDate;

use affiliate_ops::accounts::{AccountDirectory, AccountDraft, AccountStatus, PaymentPriority};
use affiliate_ops::incentives::{
    catalog, EvaluationReason, IncentiveService, RuleRepository, TracingAuditSink,
};
use affiliate_ops::reports::incentive_overview;
use affiliate_ops::sales::{DailySalesRow, DateWindow, SalesLedger};

fn seeded_service() -> IncentiveService<TracingAuditSink> {
    let repository = Arc::new(RuleRepository::new());
    for draft in catalog::starter_rules() {
        repository.add(draft).expect("starter catalog is valid");
    }
    IncentiveService::new(repository, Arc::new(TracingAuditSink))
}

fn account_draft(username: &str, rate_bps: u32, status: AccountStatus) -> AccountDraft {
    AccountDraft {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        phone: "+62 812-3456-7890".to_string(),
        status,
        payment_priority: PaymentPriority::Disetujui,
        category_id: None,
        commission_rate_bps: rate_bps,
    }
}

fn day(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 12, day).expect("valid date")
}

fn sales_row(date: NaiveDate, commission: i64, purchases: i64) -> DailySalesRow {
    DailySalesRow {
        date,
        clicks: 1_200,
        orders: 40,
        gross_commission: commission,
        products_sold: 60,
        total_purchases: purchases,
        new_buyers: 20,
    }
}

#[test]
fn december_period_pays_the_second_tier() {
    let directory = AccountDirectory::new();
    let ledger = SalesLedger::new();
    let service = seeded_service();

    let account = directory
        .add_account(account_draft("john_affiliate", 650, AccountStatus::Active))
        .expect("account registers");

    // 95M IDR revenue lands between the 90M and 100M rungs of the 5-7.99% band.
    ledger.append(
        &account.id,
        vec![
            sales_row(day(1), 3_200_000, 50_000_000),
            sales_row(day(2), 2_900_000, 45_000_000),
        ],
    );

    let window = DateWindow::new(Some(day(1)), Some(day(31)));
    let rows = incentive_overview(&directory, &ledger, &service, &window).expect("evaluates");

    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.totals.revenue, 95_000_000);
    assert_eq!(row.evaluation.reason, EvaluationReason::Eligible);
    assert_eq!(row.evaluation.matched_tier_index, Some(1));
    assert_eq!(row.evaluation.incentive_amount, 570_000);
}

#[test]
fn accounts_without_uploads_miss_the_base_threshold() {
    let directory = AccountDirectory::new();
    let ledger = SalesLedger::new();
    let service = seeded_service();

    directory
        .add_account(account_draft("jane_marketer", 650, AccountStatus::Active))
        .expect("account registers");

    let rows = incentive_overview(&directory, &ledger, &service, &DateWindow::default())
        .expect("evaluates");

    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0].evaluation.reason,
        EvaluationReason::BelowBaseRevenue
    );
    assert_eq!(rows[0].evaluation.incentive_amount, 0);
}

#[test]
fn inactive_accounts_stay_out_of_the_overview() {
    let directory = AccountDirectory::new();
    let ledger = SalesLedger::new();
    let service = seeded_service();

    directory
        .add_account(account_draft("dormant_seller", 650, AccountStatus::Inactive))
        .expect("account registers");
    directory
        .add_account(account_draft("john_affiliate", 650, AccountStatus::Active))
        .expect("account registers");

    let rows = incentive_overview(&directory, &ledger, &service, &DateWindow::default())
        .expect("evaluates");

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].username, "john_affiliate");
}

#[test]
fn low_rate_accounts_fall_outside_every_band() {
    let directory = AccountDirectory::new();
    let ledger = SalesLedger::new();
    let service = seeded_service();

    let account = directory
        .add_account(account_draft("low_rate", 300, AccountStatus::Active))
        .expect("account registers");
    ledger.append(&account.id, vec![sales_row(day(1), 6_000_000, 95_000_000)]);

    let rows = incentive_overview(&directory, &ledger, &service, &DateWindow::default())
        .expect("evaluates");

    assert_eq!(
        rows[0].evaluation.reason,
        EvaluationReason::NoMatchingRateBand
    );
    assert_eq!(rows[0].evaluation.matched_rule_id, None);
}

#[test]
fn high_band_accounts_use_their_own_ladder() {
    let directory = AccountDirectory::new();
    let ledger = SalesLedger::new();
    let service = seeded_service();

    let account = directory
        .add_account(account_draft("premium_seller", 850, AccountStatus::Active))
        .expect("account registers");
    // 65M revenue clears the high band's 60M rung (0.6%) but not 70M.
    ledger.append(&account.id, vec![sales_row(day(3), 5_500_000, 65_000_000)]);

    let rows = incentive_overview(&directory, &ledger, &service, &DateWindow::default())
        .expect("evaluates");

    let evaluation = &rows[0].evaluation;
    assert_eq!(evaluation.reason, EvaluationReason::Eligible);
    assert_eq!(evaluation.matched_tier_index, Some(1));
    assert_eq!(evaluation.incentive_amount, 390_000);
}

#[test]
fn window_bounds_exclude_out_of_period_uploads() {
    let directory = AccountDirectory::new();
    let ledger = SalesLedger::new();
    let service = seeded_service();

    let account = directory
        .add_account(account_draft("john_affiliate", 650, AccountStatus::Active))
        .expect("account registers");
    ledger.append(
        &account.id,
        vec![
            sales_row(day(1), 3_200_000, 50_000_000),
            sales_row(day(2), 2_900_000, 45_000_000),
            sales_row(day(20), 3_000_000, 40_000_000),
        ],
    );

    // Without day 20 the period only reaches the 90M rung.
    let window = DateWindow::new(Some(day(1)), Some(day(10)));
    let rows = incentive_overview(&directory, &ledger, &service, &window).expect("evaluates");
    assert_eq!(rows[0].totals.revenue, 95_000_000);
    assert_eq!(rows[0].evaluation.matched_tier_index, Some(1));

    // The full month crosses 130M and tops out the ladder.
    let rows = incentive_overview(&directory, &ledger, &service, &DateWindow::default())
        .expect("evaluates");
    assert_eq!(rows[0].totals.revenue, 135_000_000);
    assert_eq!(rows[0].evaluation.matched_tier_index, Some(5));
    // 135,000,000 * 1.5% = 2,025,000
    assert_eq!(rows[0].evaluation.incentive_amount, 2_025_000);
}
