use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use corebank_banking::account::{Account, NewAccount};
use corebank_banking::store::{AccountStore, LedgerStore};
use corebank_banking::transfer::TransferOrder;
use corebank_core::{AccountId, CustomerId, StoreError};
use corebank_customers::{Customer, CustomerStore};

#[derive(Debug, Default)]
struct BankState {
    customers: HashMap<CustomerId, Customer>,
    accounts: HashMap<AccountId, Account>,
    /// Append-only; append order is creation order, so reads come back
    /// oldest-first without sorting.
    transfers: Vec<TransferOrder>,
    next_account_id: i64,
}

/// In-memory store implementing all three ports over one lock.
///
/// Intended for tests/dev and embedding. A single write-lock scope realizes
/// the atomic transfer commit; the per-row version check realizes the
/// serialization of concurrent transfers over a shared account.
#[derive(Debug, Default)]
pub struct InMemoryBankStore {
    state: RwLock<BankState>,
}

impl InMemoryBankStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BankState>, StoreError> {
        self.state
            .read()
            .map_err(|_| StoreError::storage("lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BankState>, StoreError> {
        self.state
            .write()
            .map_err(|_| StoreError::storage("lock poisoned"))
    }

    /// Append a ledger record without touching account rows. Exists so the
    /// integration suite can fabricate a diverged ledger.
    #[cfg(test)]
    pub(crate) fn append_ledger_record(&self, order: TransferOrder) {
        self.state.write().unwrap().transfers.push(order);
    }
}

impl AccountStore for InMemoryBankStore {
    fn find_account(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        Ok(self.read()?.accounts.get(&id).cloned())
    }

    fn insert_account(&self, new: NewAccount) -> Result<Account, StoreError> {
        let mut state = self.write()?;
        state.next_account_id += 1;
        let account = Account::create(AccountId::new(state.next_account_id), new);
        state.accounts.insert(account.id_typed(), account.clone());
        Ok(account)
    }
}

impl LedgerStore for InMemoryBankStore {
    fn transfers_for_account(&self, id: AccountId) -> Result<Vec<TransferOrder>, StoreError> {
        Ok(self
            .read()?
            .transfers
            .iter()
            .filter(|t| t.account_from() == id || t.account_to() == id)
            .cloned()
            .collect())
    }

    fn commit_transfer(
        &self,
        debited: &Account,
        credited: &Account,
        order: &TransferOrder,
    ) -> Result<(), StoreError> {
        let mut state = self.write()?;

        // Validate both rows before writing either; nothing below can fail.
        for snapshot in [debited, credited] {
            let account_id = snapshot.id_typed();
            let stored = state
                .accounts
                .get(&account_id)
                .ok_or(StoreError::UnknownAccount { account_id })?;
            if stored.version() != snapshot.version() {
                return Err(StoreError::Conflict {
                    account_id,
                    expected: snapshot.version(),
                    actual: stored.version(),
                });
            }
        }

        for snapshot in [debited, credited] {
            let row = snapshot.at_version(snapshot.version() + 1);
            state.accounts.insert(row.id_typed(), row);
        }
        state.transfers.push(order.clone());
        Ok(())
    }
}

impl CustomerStore for InMemoryBankStore {
    fn find_customer(&self, id: CustomerId) -> Result<Option<Customer>, StoreError> {
        Ok(self.read()?.customers.get(&id).cloned())
    }

    fn insert_customer(&self, customer: Customer) -> Result<Customer, StoreError> {
        self.write()?.customers.insert(customer.id, customer.clone());
        Ok(customer)
    }

    fn customers(&self) -> Result<Vec<Customer>, StoreError> {
        let mut customers: Vec<_> = self.read()?.customers.values().cloned().collect();
        customers.sort_by_key(|c| c.id);
        Ok(customers)
    }
}
