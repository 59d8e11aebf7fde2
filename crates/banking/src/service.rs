//! Banking service: account opening, transfer orchestration, and balance
//! reconstruction over the store ports.

use chrono::Utc;

use corebank_core::{AccountId, AccountRole, BankError, BankResult, CustomerId, StoreError};
use corebank_customers::CustomerStore;

use crate::account::{Account, NewAccount};
use crate::store::{AccountStore, LedgerStore};
use crate::transfer::TransferOrder;

/// Upper bound on optimistic-concurrency retries for one transfer request.
/// Past this the conflict is surfaced to the caller.
const MAX_COMMIT_ATTEMPTS: u32 = 5;

/// The banking service.
///
/// Stateless over a store implementing all three ports; safe to share across
/// threads. Concurrent transfers over a shared account serialize through the
/// store's version check: a commit built on stale snapshots is rejected and
/// retried here with fresh ones.
#[derive(Debug, Clone)]
pub struct Bank<S> {
    store: S,
}

impl<S> Bank<S>
where
    S: AccountStore + LedgerStore + CustomerStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Open an account for an existing customer.
    ///
    /// The opening balance is validated before any store interaction; a
    /// negative one is rejected with nothing persisted.
    pub fn open_account(
        &self,
        customer_id: CustomerId,
        opening_balance_cents: i64,
    ) -> BankResult<Account> {
        let new = NewAccount::open(customer_id, opening_balance_cents, Utc::now())?;

        self.store
            .find_customer(customer_id)?
            .ok_or(BankError::CustomerNotFound(customer_id))?;

        let account = self.store.insert_account(new)?;
        tracing::info!(
            account_id = %account.id_typed(),
            customer_id = %customer_id,
            opening_balance_cents,
            "opened bank account"
        );
        Ok(account)
    }

    /// The stored account snapshot (running balance included).
    pub fn account(&self, account_id: AccountId) -> BankResult<Account> {
        self.store
            .find_account(account_id)?
            .ok_or_else(|| BankError::account_not_found(account_id, None))
    }

    /// Move `amount_cents` from one account to another and append the
    /// resulting transfer order.
    ///
    /// Validation order: self-transfer (before any lookup), non-positive
    /// amount, source lookup, destination lookup, sufficient source balance.
    /// Both deltas are applied to snapshots before anything is written, so the
    /// store commit is genuinely all-or-nothing: either both rows and the
    /// ledger record change durably, or nothing does.
    pub fn transfer(
        &self,
        account_from: AccountId,
        account_to: AccountId,
        amount_cents: i64,
    ) -> BankResult<TransferOrder> {
        if account_from == account_to {
            return Err(BankError::SelfTransferNotAllowed(account_from));
        }
        if amount_cents <= 0 {
            return Err(BankError::TransferAmountTooLow(amount_cents));
        }

        let mut attempt = 0;
        loop {
            attempt += 1;

            let source = self
                .store
                .find_account(account_from)?
                .ok_or_else(|| {
                    BankError::account_not_found(account_from, Some(AccountRole::Debit))
                })?;
            let destination = self
                .store
                .find_account(account_to)?
                .ok_or_else(|| {
                    BankError::account_not_found(account_to, Some(AccountRole::Credit))
                })?;

            let debited = source.with_delta(-amount_cents)?;
            let credited = destination.with_delta(amount_cents)?;
            let order = TransferOrder::record(account_from, account_to, amount_cents, Utc::now())?;

            match self.store.commit_transfer(&debited, &credited, &order) {
                Ok(()) => {
                    tracing::info!(
                        transfer_id = %order.id_typed(),
                        account_from = %account_from,
                        account_to = %account_to,
                        amount_cents,
                        "transfer committed"
                    );
                    return Ok(order);
                }
                Err(StoreError::Conflict {
                    account_id,
                    expected,
                    actual,
                }) if attempt < MAX_COMMIT_ATTEMPTS => {
                    tracing::warn!(
                        account_id = %account_id,
                        expected,
                        actual,
                        attempt,
                        "transfer commit conflicted; retrying with fresh snapshots"
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Every transfer touching the account, in either role, oldest first.
    pub fn transfer_history(&self, account_id: AccountId) -> BankResult<Vec<TransferOrder>> {
        // Distinguish "no transfers" from "no such account".
        self.account(account_id)?;
        Ok(self.store.transfers_for_account(account_id)?)
    }

    /// Recompute the account's balance from its opening balance and full
    /// transfer history.
    ///
    /// Whenever the account and ledger stores are consistent this equals the
    /// stored running balance exactly; the integration suite leans on that as
    /// an executable consistency check.
    pub fn live_balance(&self, account_id: AccountId) -> BankResult<i64> {
        let account = self.account(account_id)?;
        let transfers = self.store.transfers_for_account(account_id)?;

        let mut total = account.opening_balance_cents() as i128;
        for transfer in &transfers {
            total += transfer.signed_amount_for(account_id)? as i128;
        }
        i64::try_from(total).map_err(|_| BankError::BalanceOverflow { account_id })
    }
}
