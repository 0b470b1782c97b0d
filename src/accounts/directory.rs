use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Local;

use super::domain::{
    Account, AccountDraft, AccountId, AccountStatus, Category, CategoryDraft, CategoryId,
};

/// Error enumeration for directory operations.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("account not found")]
    AccountNotFound,
    #[error("category not found")]
    CategoryNotFound,
    #[error("username '{0}' is already registered")]
    DuplicateUsername(String),
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("account references an unknown category")]
    UnknownCategory,
}

#[derive(Debug, Default)]
struct DirectoryState {
    accounts: Vec<Account>,
    categories: Vec<Category>,
    account_sequence: u64,
    category_sequence: u64,
}

/// In-memory registry of affiliate accounts and their categories. Writes are
/// serialized through the lock; readers see whole entries only.
#[derive(Debug, Default)]
pub struct AccountDirectory {
    state: RwLock<DirectoryState>,
}

impl AccountDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_account(&self, draft: AccountDraft) -> Result<Account, DirectoryError> {
        let mut state = self.write();
        validate_account_draft(&state, &draft, None)?;

        state.account_sequence += 1;
        let sequence = state.account_sequence;
        let account = Account {
            id: AccountId(format!("acct-{sequence:06}")),
            account_code: format!("AC{sequence:03}"),
            username: draft.username,
            email: draft.email,
            phone: draft.phone,
            status: draft.status,
            payment_priority: draft.payment_priority,
            category_id: draft.category_id,
            commission_rate_bps: draft.commission_rate_bps,
            registered_on: Local::now().date_naive(),
        };
        state.accounts.push(account.clone());
        Ok(account)
    }

    pub fn update_account(
        &self,
        id: &AccountId,
        draft: AccountDraft,
    ) -> Result<Account, DirectoryError> {
        let mut state = self.write();
        validate_account_draft(&state, &draft, Some(id))?;

        let position = state
            .accounts
            .iter()
            .position(|account| &account.id == id)
            .ok_or(DirectoryError::AccountNotFound)?;

        let existing = &state.accounts[position];
        let updated = Account {
            id: existing.id.clone(),
            account_code: existing.account_code.clone(),
            registered_on: existing.registered_on,
            username: draft.username,
            email: draft.email,
            phone: draft.phone,
            status: draft.status,
            payment_priority: draft.payment_priority,
            category_id: draft.category_id,
            commission_rate_bps: draft.commission_rate_bps,
        };
        state.accounts[position] = updated.clone();
        Ok(updated)
    }

    pub fn remove_account(&self, id: &AccountId) -> Result<Account, DirectoryError> {
        let mut state = self.write();
        let position = state
            .accounts
            .iter()
            .position(|account| &account.id == id)
            .ok_or(DirectoryError::AccountNotFound)?;
        Ok(state.accounts.remove(position))
    }

    pub fn get_account(&self, id: &AccountId) -> Result<Account, DirectoryError> {
        self.read()
            .accounts
            .iter()
            .find(|account| &account.id == id)
            .cloned()
            .ok_or(DirectoryError::AccountNotFound)
    }

    pub fn list_accounts(&self) -> Vec<Account> {
        self.read().accounts.clone()
    }

    pub fn active_accounts(&self) -> Vec<Account> {
        self.read()
            .accounts
            .iter()
            .filter(|account| account.status == AccountStatus::Active)
            .cloned()
            .collect()
    }

    pub fn add_category(&self, draft: CategoryDraft) -> Result<Category, DirectoryError> {
        let mut state = self.write();
        state.category_sequence += 1;
        let category = Category {
            id: CategoryId(format!("cat-{:04}", state.category_sequence)),
            name: draft.name,
            description: draft.description,
        };
        state.categories.push(category.clone());
        Ok(category)
    }

    pub fn update_category(
        &self,
        id: &CategoryId,
        draft: CategoryDraft,
    ) -> Result<Category, DirectoryError> {
        let mut state = self.write();
        let category = state
            .categories
            .iter_mut()
            .find(|category| &category.id == id)
            .ok_or(DirectoryError::CategoryNotFound)?;
        category.name = draft.name;
        category.description = draft.description;
        Ok(category.clone())
    }

    /// Delete a category and detach any accounts still pointing at it.
    pub fn remove_category(&self, id: &CategoryId) -> Result<(), DirectoryError> {
        let mut state = self.write();
        let position = state
            .categories
            .iter()
            .position(|category| &category.id == id)
            .ok_or(DirectoryError::CategoryNotFound)?;
        state.categories.remove(position);

        for account in &mut state.accounts {
            if account.category_id.as_ref() == Some(id) {
                account.category_id = None;
            }
        }
        Ok(())
    }

    pub fn list_categories(&self) -> Vec<Category> {
        self.read().categories.clone()
    }

    fn read(&self) -> RwLockReadGuard<'_, DirectoryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, DirectoryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn validate_account_draft(
    state: &DirectoryState,
    draft: &AccountDraft,
    exclude: Option<&AccountId>,
) -> Result<(), DirectoryError> {
    if draft.username.trim().is_empty() {
        return Err(DirectoryError::EmptyUsername);
    }

    let duplicate = state.accounts.iter().any(|account| {
        exclude != Some(&account.id) && account.username.eq_ignore_ascii_case(&draft.username)
    });
    if duplicate {
        return Err(DirectoryError::DuplicateUsername(draft.username.clone()));
    }

    if let Some(category_id) = &draft.category_id {
        let known = state
            .categories
            .iter()
            .any(|category| &category.id == category_id);
        if !known {
            return Err(DirectoryError::UnknownCategory);
        }
    }

    Ok(())
}
