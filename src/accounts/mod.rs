//! Affiliate account and category management.

pub mod directory;
pub mod domain;
pub mod router;

pub use directory::{AccountDirectory, DirectoryError};
pub use domain::{
    Account, AccountDraft, AccountId, AccountStatus, Category, CategoryDraft, CategoryId,
    PaymentPriority,
};
pub use router::{account_router, AccountsState};
