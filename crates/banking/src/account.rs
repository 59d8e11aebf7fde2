use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use corebank_core::{AccountId, BankError, BankResult, CustomerId, Entity};

/// Details of a bank account the store has not yet assigned an id to.
///
/// Constructed through [`NewAccount::open`], which is the only place the
/// non-negative opening balance rule is checked; everything downstream can
/// rely on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAccount {
    customer_id: CustomerId,
    opening_balance_cents: i64,
    opened_at: DateTime<Utc>,
}

impl NewAccount {
    pub fn open(
        customer_id: CustomerId,
        opening_balance_cents: i64,
        opened_at: DateTime<Utc>,
    ) -> BankResult<Self> {
        if opening_balance_cents < 0 {
            return Err(BankError::NegativeOpeningBalance(opening_balance_cents));
        }
        Ok(Self {
            customer_id,
            opening_balance_cents,
            opened_at,
        })
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn opening_balance_cents(&self) -> i64 {
        self.opening_balance_cents
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }
}

/// A bank account snapshot.
///
/// All monetary fields are integer minor currency units (cents); a value of
/// 2000 means 20.00. Opening balance and opening time are immutable after
/// creation. The running balance changes only through [`Account::with_delta`],
/// which returns a new snapshot instead of mutating in place, so shared-state
/// synchronization lives entirely in the storage layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    id: AccountId,
    customer_id: CustomerId,
    opening_balance_cents: i64,
    balance_cents: i64,
    opened_at: DateTime<Utc>,
    version: u64,
}

impl Account {
    /// Materialize a freshly opened account once the store has assigned it an
    /// id. The running balance starts equal to the opening balance.
    pub fn create(id: AccountId, new: NewAccount) -> Self {
        Self {
            id,
            customer_id: new.customer_id,
            opening_balance_cents: new.opening_balance_cents,
            balance_cents: new.opening_balance_cents,
            opened_at: new.opened_at,
            version: 0,
        }
    }

    pub fn id_typed(&self) -> AccountId {
        self.id
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn opening_balance_cents(&self) -> i64 {
        self.opening_balance_cents
    }

    pub fn balance_cents(&self) -> i64 {
        self.balance_cents
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    /// Optimistic-concurrency token. Bumped by the store on every committed
    /// row update; a commit carrying a stale version is rejected.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Balance engine: apply a signed delta (negative = debit, positive =
    /// credit) as a value transition.
    ///
    /// The arithmetic runs in `i128` so the non-negativity check is exact; no
    /// floating point anywhere near money. On failure the snapshot is
    /// untouched and the error carries enough to explain the rejection.
    pub fn with_delta(&self, delta_cents: i64) -> BankResult<Account> {
        let next = self.balance_cents as i128 + delta_cents as i128;
        if next < 0 {
            return Err(BankError::InsufficientBalance {
                account_id: self.id,
                balance_cents: self.balance_cents,
                delta_cents,
            });
        }
        let balance_cents =
            i64::try_from(next).map_err(|_| BankError::BalanceOverflow { account_id: self.id })?;
        Ok(Self {
            balance_cents,
            ..self.clone()
        })
    }

    /// Same snapshot at a different version. Used by stores when committing a
    /// row update; not part of the domain surface.
    pub fn at_version(&self, version: u64) -> Account {
        Self {
            version,
            ..self.clone()
        }
    }
}

impl Entity for Account {
    type Id = AccountId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
