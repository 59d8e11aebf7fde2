use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use corebank_core::{AccountId, BankError, BankResult, Entity, TransferId};

/// An immutable record of one committed transfer.
///
/// Append-only: once recorded it never transitions (no pending/cancelled/
/// reversed states). Construction through [`TransferOrder::record`] guarantees
/// the two structural invariants: a strictly positive amount and distinct
/// debit/credit accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferOrder {
    id: TransferId,
    account_from: AccountId,
    account_to: AccountId,
    amount_cents: i64,
    created_at: DateTime<Utc>,
}

impl TransferOrder {
    pub fn record(
        account_from: AccountId,
        account_to: AccountId,
        amount_cents: i64,
        created_at: DateTime<Utc>,
    ) -> BankResult<Self> {
        if account_from == account_to {
            return Err(BankError::SelfTransferNotAllowed(account_from));
        }
        if amount_cents <= 0 {
            return Err(BankError::TransferAmountTooLow(amount_cents));
        }
        Ok(Self {
            id: TransferId::new(),
            account_from,
            account_to,
            amount_cents,
            created_at,
        })
    }

    pub fn id_typed(&self) -> TransferId {
        self.id
    }

    pub fn account_from(&self) -> AccountId {
        self.account_from
    }

    pub fn account_to(&self) -> AccountId {
        self.account_to
    }

    pub fn amount_cents(&self) -> i64 {
        self.amount_cents
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Signed contribution of this transfer to the given account's balance:
    /// `+amount` in the credit role, `-amount` in the debit role.
    ///
    /// A record matching neither role means the ledger and account stores have
    /// diverged; that surfaces as [`BankError::RoleMismatch`], deliberately
    /// distinct from an ordinary not-found.
    pub fn signed_amount_for(&self, account_id: AccountId) -> BankResult<i64> {
        if account_id == self.account_to {
            Ok(self.amount_cents)
        } else if account_id == self.account_from {
            Ok(-self.amount_cents)
        } else {
            Err(BankError::RoleMismatch {
                transfer_id: self.id,
                account_id,
            })
        }
    }
}

impl Entity for TransferOrder {
    type Id = TransferId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
