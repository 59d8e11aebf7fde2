//! Integration tests for the full banking subsystem.
//!
//! Tests: Bank service → ports → in-memory store.
//!
//! Verifies:
//! - Transfer validation order and rejection paths leave no trace
//! - The reconstructed balance always matches the stored running balance
//! - Concurrent transfers over a shared account serialize correctly

use std::sync::Arc;
use std::thread;

use proptest::prelude::*;

use corebank_banking::transfer::TransferOrder;
use corebank_banking::Bank;
use corebank_core::{AccountId, AccountRole, BankError, CustomerId};
use corebank_customers::{seed, Customer, CustomerStore};

use crate::in_memory::InMemoryBankStore;

fn test_bank() -> Bank<Arc<InMemoryBankStore>> {
    let store = Arc::new(InMemoryBankStore::new());
    store
        .insert_customer(Customer::new(CustomerId::new(1), "Arisha Barron"))
        .unwrap();
    store
        .insert_customer(Customer::new(CustomerId::new(2), "Branden Gibson"))
        .unwrap();
    Bank::new(store)
}

#[test]
fn open_account_persists_with_running_balance_equal_to_opening() {
    let bank = test_bank();
    let account = bank.open_account(CustomerId::new(1), 2000).unwrap();

    assert_eq!(account.balance_cents(), 2000);
    let stored = bank.account(account.id_typed()).unwrap();
    assert_eq!(stored, account);
}

#[test]
fn open_account_rejects_negative_balance_and_persists_nothing() {
    let bank = test_bank();
    let err = bank.open_account(CustomerId::new(1), -500).unwrap_err();
    assert_eq!(err, BankError::NegativeOpeningBalance(-500));

    // Id assignment never ran, so the next open gets the first id.
    let account = bank.open_account(CustomerId::new(1), 0).unwrap();
    assert_eq!(account.id_typed(), AccountId::new(1));
}

#[test]
fn open_account_requires_an_existing_customer() {
    let bank = test_bank();
    let err = bank.open_account(CustomerId::new(42), 100).unwrap_err();
    assert_eq!(err, BankError::CustomerNotFound(CustomerId::new(42)));
}

#[test]
fn transfer_moves_funds_and_records_one_order() {
    let bank = test_bank();
    let a = bank.open_account(CustomerId::new(1), 1000).unwrap();
    let b = bank.open_account(CustomerId::new(2), 1000).unwrap();

    let order = bank.transfer(a.id_typed(), b.id_typed(), 50).unwrap();

    assert_eq!(order.account_from(), a.id_typed());
    assert_eq!(order.account_to(), b.id_typed());
    assert_eq!(order.amount_cents(), 50);

    assert_eq!(bank.account(a.id_typed()).unwrap().balance_cents(), 950);
    assert_eq!(bank.account(b.id_typed()).unwrap().balance_cents(), 1050);

    let history = bank.transfer_history(a.id_typed()).unwrap();
    assert_eq!(history, vec![order]);
}

#[test]
fn self_transfer_is_rejected_before_any_lookup() {
    let bank = test_bank();
    // The account does not exist; a lookup-first implementation would report
    // not-found instead.
    let missing = AccountId::new(77);
    let err = bank.transfer(missing, missing, 10).unwrap_err();
    assert_eq!(err, BankError::SelfTransferNotAllowed(missing));
}

#[test]
fn non_positive_amount_is_rejected_without_balance_changes() {
    let bank = test_bank();
    let a = bank.open_account(CustomerId::new(1), 1000).unwrap();
    let b = bank.open_account(CustomerId::new(2), 1000).unwrap();

    for amount in [0, -25] {
        let err = bank.transfer(a.id_typed(), b.id_typed(), amount).unwrap_err();
        assert_eq!(err, BankError::TransferAmountTooLow(amount));
    }
    assert_eq!(bank.account(a.id_typed()).unwrap().balance_cents(), 1000);
    assert_eq!(bank.account(b.id_typed()).unwrap().balance_cents(), 1000);
    assert!(bank.transfer_history(a.id_typed()).unwrap().is_empty());
}

#[test]
fn missing_accounts_are_reported_with_their_role() {
    let bank = test_bank();
    let a = bank.open_account(CustomerId::new(1), 1000).unwrap();

    let err = bank.transfer(AccountId::new(50), a.id_typed(), 10).unwrap_err();
    assert_eq!(
        err,
        BankError::account_not_found(AccountId::new(50), Some(AccountRole::Debit))
    );

    let err = bank.transfer(a.id_typed(), AccountId::new(51), 10).unwrap_err();
    assert_eq!(
        err,
        BankError::account_not_found(AccountId::new(51), Some(AccountRole::Credit))
    );
}

#[test]
fn overdraft_is_rejected_with_no_partial_application() {
    let bank = test_bank();
    let a = bank.open_account(CustomerId::new(1), 1000).unwrap();
    let b = bank.open_account(CustomerId::new(2), 1000).unwrap();

    let err = bank.transfer(a.id_typed(), b.id_typed(), 1001).unwrap_err();
    assert_eq!(
        err,
        BankError::InsufficientBalance {
            account_id: a.id_typed(),
            balance_cents: 1000,
            delta_cents: -1001,
        }
    );

    assert_eq!(bank.account(a.id_typed()).unwrap().balance_cents(), 1000);
    assert_eq!(bank.account(b.id_typed()).unwrap().balance_cents(), 1000);
    assert!(bank.transfer_history(b.id_typed()).unwrap().is_empty());
}

#[test]
fn live_balance_matches_stored_balance_after_transfers() {
    let bank = test_bank();
    let a = bank.open_account(CustomerId::new(1), 5000).unwrap();
    let b = bank.open_account(CustomerId::new(2), 100).unwrap();

    bank.transfer(a.id_typed(), b.id_typed(), 700).unwrap();
    bank.transfer(b.id_typed(), a.id_typed(), 300).unwrap();
    bank.transfer(a.id_typed(), b.id_typed(), 1).unwrap();

    for id in [a.id_typed(), b.id_typed()] {
        assert_eq!(
            bank.live_balance(id).unwrap(),
            bank.account(id).unwrap().balance_cents()
        );
    }
    assert_eq!(bank.live_balance(a.id_typed()).unwrap(), 4599);
    assert_eq!(bank.live_balance(b.id_typed()).unwrap(), 501);
}

#[test]
fn live_balance_of_unknown_account_is_not_found() {
    let bank = test_bank();
    let err = bank.live_balance(AccountId::new(9)).unwrap_err();
    assert_eq!(err, BankError::account_not_found(AccountId::new(9), None));
}

#[test]
fn transfer_history_is_ordered_and_covers_both_roles() {
    let bank = test_bank();
    let a = bank.open_account(CustomerId::new(1), 1000).unwrap();
    let b = bank.open_account(CustomerId::new(2), 1000).unwrap();

    bank.transfer(a.id_typed(), b.id_typed(), 10).unwrap();
    bank.transfer(b.id_typed(), a.id_typed(), 20).unwrap();
    bank.transfer(a.id_typed(), b.id_typed(), 30).unwrap();

    let amounts: Vec<i64> = bank
        .transfer_history(a.id_typed())
        .unwrap()
        .iter()
        .map(|t| t.signed_amount_for(a.id_typed()).unwrap())
        .collect();
    assert_eq!(amounts, vec![-10, 20, -30]);
}

#[test]
fn diverged_ledger_surfaces_a_data_integrity_fault() {
    let bank = test_bank();
    let a = bank.open_account(CustomerId::new(1), 1000).unwrap();

    // Fabricate a record that claims to involve the account but does not.
    let bogus = TransferOrder::record(
        AccountId::new(200),
        AccountId::new(201),
        10,
        chrono::Utc::now(),
    )
    .unwrap();
    bank.store().append_ledger_record(bogus.clone());
    bank.store().append_ledger_record(
        TransferOrder::record(AccountId::new(200), a.id_typed(), 5, chrono::Utc::now()).unwrap(),
    );

    // The store only hands back transfers touching the account, so divergence
    // has to be simulated at the reconstruction step too.
    let err = bogus.signed_amount_for(a.id_typed()).unwrap_err();
    assert_eq!(
        err,
        BankError::RoleMismatch {
            transfer_id: bogus.id_typed(),
            account_id: a.id_typed(),
        }
    );

    // The in-range fabricated credit shows up in reconstruction: the stores
    // have diverged and live balance no longer matches the stored one.
    assert_eq!(bank.live_balance(a.id_typed()).unwrap(), 1005);
    assert_eq!(bank.account(a.id_typed()).unwrap().balance_cents(), 1000);
}

#[test]
fn seeding_is_idempotent() {
    let store = Arc::new(InMemoryBankStore::new());
    let inserted = seed::seed_customers(store.as_ref()).unwrap();
    assert_eq!(inserted.len(), 4);

    let inserted_again = seed::seed_customers(store.as_ref()).unwrap();
    assert!(inserted_again.is_empty());
    assert_eq!(store.customers().unwrap().len(), 4);
}

#[test]
fn concurrent_same_direction_transfers_serialize() {
    let bank = test_bank();
    let a = bank.open_account(CustomerId::new(1), 1000).unwrap();
    let b = bank.open_account(CustomerId::new(2), 1000).unwrap();

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let bank = bank.clone();
            let (from, to) = (a.id_typed(), b.id_typed());
            thread::spawn(move || bank.transfer(from, to, 1).unwrap())
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(bank.account(a.id_typed()).unwrap().balance_cents(), 998);
    assert_eq!(bank.account(b.id_typed()).unwrap().balance_cents(), 1002);
    assert_eq!(bank.transfer_history(a.id_typed()).unwrap().len(), 2);
}

#[test]
fn concurrent_opposing_transfers_keep_the_books_balanced() {
    let bank = test_bank();
    let a = bank.open_account(CustomerId::new(1), 10_000).unwrap();
    let b = bank.open_account(CustomerId::new(2), 10_000).unwrap();

    // Two threads move money in opposite directions between the same pair;
    // with per-account lock ordering this is the classic deadlock shape.
    let handles: Vec<_> = [(a.id_typed(), b.id_typed()), (b.id_typed(), a.id_typed())]
        .into_iter()
        .map(|(from, to)| {
            let bank = bank.clone();
            thread::spawn(move || {
                let mut committed = 0;
                while committed < 50 {
                    match bank.transfer(from, to, 3) {
                        Ok(_) => committed += 1,
                        // Bounded retries inside the service can still be
                        // exhausted under sustained contention; keep going.
                        Err(BankError::Conflict(_)) => {}
                        Err(other) => panic!("unexpected error: {other:?}"),
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    for id in [a.id_typed(), b.id_typed()] {
        let stored = bank.account(id).unwrap().balance_cents();
        assert_eq!(stored, 10_000);
        assert_eq!(bank.live_balance(id).unwrap(), stored);
    }
    assert_eq!(bank.transfer_history(a.id_typed()).unwrap().len(), 100);
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        ..ProptestConfig::default()
    })]

    /// Property: after any sequence of attempted transfers, every account's
    /// reconstructed balance equals its stored running balance, and the total
    /// money in the system is conserved.
    #[test]
    fn reconstruction_matches_stored_balances(
        transfers in prop::collection::vec((0usize..3, 0usize..3, 1i64..500), 0..40)
    ) {
        let bank = test_bank();
        let accounts: Vec<AccountId> = (0..3)
            .map(|_| bank.open_account(CustomerId::new(1), 1_000).unwrap().id_typed())
            .collect();

        for (from, to, amount) in transfers {
            match bank.transfer(accounts[from], accounts[to], amount) {
                Ok(_) => {}
                Err(BankError::InsufficientBalance { .. })
                | Err(BankError::SelfTransferNotAllowed(_)) => {}
                Err(other) => prop_assert!(false, "unexpected error: {other:?}"),
            }
        }

        let mut total: i128 = 0;
        for id in &accounts {
            let stored = bank.account(*id).unwrap().balance_cents();
            prop_assert!(stored >= 0);
            prop_assert_eq!(bank.live_balance(*id).unwrap(), stored);
            total += stored as i128;
        }
        prop_assert_eq!(total, 3_000);
    }
}
