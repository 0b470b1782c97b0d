use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for affiliate accounts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(pub String);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for product categories.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryId(pub String);

/// Whether an affiliate currently participates in reporting and payouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Inactive,
}

impl AccountStatus {
    pub const fn label(self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Inactive => "inactive",
        }
    }
}

/// Payout-priority flag carried over from the finance workflow. The labels
/// are the Indonesian terms the back office uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentPriority {
    /// Payment data approved; pays in the normal cycle.
    Disetujui,
    /// Prioritized payout.
    Utamakan,
    /// Default handling.
    Standar,
}

/// A registered affiliate account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub status: AccountStatus,
    pub payment_priority: PaymentPriority,
    pub account_code: String,
    pub category_id: Option<CategoryId>,
    /// Nominal commission rate in basis points (7.5% = 750); this is the
    /// rate the incentive engine matches rule bands against.
    pub commission_rate_bps: u32,
    pub registered_on: NaiveDate,
}

/// Submission shape for creating or replacing an account. Ids, codes, and
/// registration dates are assigned by the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountDraft {
    pub username: String,
    pub email: String,
    pub phone: String,
    pub status: AccountStatus,
    pub payment_priority: PaymentPriority,
    pub category_id: Option<CategoryId>,
    pub commission_rate_bps: u32,
}

/// A product category affiliates are grouped under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDraft {
    pub name: String,
    pub description: String,
}
