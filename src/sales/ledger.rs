use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::accounts::domain::AccountId;

use super::domain::{DailySales, DailySalesRow, DateWindow, PeriodTotals};

/// In-memory sales ledger: one row per account per day. Re-uploading a day
/// replaces the previous row for that account and date.
#[derive(Debug, Default)]
pub struct SalesLedger {
    rows: RwLock<Vec<DailySales>>,
}

impl SalesLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest parsed upload rows for an account. Returns the number of rows
    /// now stored for the upload (replacements included).
    pub fn append(&self, account_id: &AccountId, upload: Vec<DailySalesRow>) -> usize {
        let mut rows = self.write();
        let count = upload.len();
        for row in upload {
            let replaced = rows
                .iter()
                .position(|existing| &existing.account_id == account_id && existing.date == row.date);
            let entry = row.attach(account_id.clone());
            match replaced {
                Some(position) => rows[position] = entry,
                None => rows.push(entry),
            }
        }
        count
    }

    /// Delete an account's rows inside the window. Returns rows removed.
    pub fn delete(&self, account_id: &AccountId, window: &DateWindow) -> usize {
        let mut rows = self.write();
        let before = rows.len();
        rows.retain(|row| &row.account_id != account_id || !window.contains(row.date));
        before - rows.len()
    }

    /// Drop every row for an account, used when the account itself goes away.
    pub fn drop_account(&self, account_id: &AccountId) -> usize {
        self.delete(account_id, &DateWindow::default())
    }

    pub fn rows_for(&self, account_id: &AccountId, window: &DateWindow) -> Vec<DailySales> {
        let mut rows: Vec<DailySales> = self
            .read()
            .iter()
            .filter(|row| &row.account_id == account_id && window.contains(row.date))
            .cloned()
            .collect();
        rows.sort_by_key(|row| row.date);
        rows
    }

    /// Sum an account's rows over the window into period totals.
    pub fn aggregate(&self, account_id: &AccountId, window: &DateWindow) -> PeriodTotals {
        let mut totals = PeriodTotals::default();
        for row in self.read().iter() {
            if &row.account_id == account_id && window.contains(row.date) {
                totals.absorb(row);
            }
        }
        totals
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<DailySales>> {
        self.rows.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<DailySales>> {
        self.rows.write().unwrap_or_else(PoisonError::into_inner)
    }
}
