//! Ports the banking core consumes. Storage-agnostic; implementations live in
//! infrastructure crates.

use std::sync::Arc;

use corebank_core::{AccountId, StoreError};

use crate::account::{Account, NewAccount};
use crate::transfer::TransferOrder;

/// Durable keyed storage of accounts.
pub trait AccountStore: Send + Sync {
    /// Lookup by id. `Ok(None)` is an ordinary miss, not a storage failure.
    fn find_account(&self, id: AccountId) -> Result<Option<Account>, StoreError>;

    /// Persist a new account; the store assigns the id.
    fn insert_account(&self, new: NewAccount) -> Result<Account, StoreError>;
}

/// Durable append-only storage of transfer records, plus the transactional
/// boundary of the whole subsystem.
pub trait LedgerStore: Send + Sync {
    /// Every transfer touching the account, in either role, ordered by
    /// creation time ascending.
    fn transfers_for_account(&self, id: AccountId) -> Result<Vec<TransferOrder>, StoreError>;

    /// Commit one transfer: both updated account rows plus the ledger append,
    /// all-or-nothing.
    ///
    /// Implementations must check each snapshot's [`Account::version`] against
    /// the stored row and reject stale snapshots with [`StoreError::Conflict`];
    /// on success both rows are written at `version + 1`. This is what
    /// serializes concurrent transfers over a shared account.
    fn commit_transfer(
        &self,
        debited: &Account,
        credited: &Account,
        order: &TransferOrder,
    ) -> Result<(), StoreError>;
}

// Shared stores work wherever a store is expected.

impl<T: AccountStore + ?Sized> AccountStore for Arc<T> {
    fn find_account(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        (**self).find_account(id)
    }

    fn insert_account(&self, new: NewAccount) -> Result<Account, StoreError> {
        (**self).insert_account(new)
    }
}

impl<T: LedgerStore + ?Sized> LedgerStore for Arc<T> {
    fn transfers_for_account(&self, id: AccountId) -> Result<Vec<TransferOrder>, StoreError> {
        (**self).transfers_for_account(id)
    }

    fn commit_transfer(
        &self,
        debited: &Account,
        credited: &Account,
        order: &TransferOrder,
    ) -> Result<(), StoreError> {
        (**self).commit_transfer(debited, credited, order)
    }
}
