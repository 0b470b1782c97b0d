//! Daily sales ingestion and aggregation: the data the dashboard uploads per
//! affiliate per day, and the period totals the incentive engine consumes.

pub mod domain;
pub mod import;
pub mod ledger;
pub mod router;

pub use domain::{DailySales, DailySalesRow, DateWindow, PeriodTotals};
pub use import::{parse_rows, SalesImportError};
pub use ledger::SalesLedger;
pub use router::{sales_router, SalesState};
