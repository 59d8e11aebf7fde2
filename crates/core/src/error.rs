//! Domain error model.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::id::{AccountId, CustomerId, TransferId};

/// Result type used across the domain layer.
pub type BankResult<T> = Result<T, BankError>;

/// Role an account plays within a single transfer order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    /// Source of the transfer (funds leave this account).
    Debit,
    /// Destination of the transfer (funds enter this account).
    Credit,
}

impl core::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AccountRole::Debit => f.write_str("debit"),
            AccountRole::Credit => f.write_str("credit"),
        }
    }
}

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// invariants, conflicts). Infrastructure concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BankError {
    /// An account lookup missed; `role` identifies which side of a transfer
    /// asked for it, when the lookup happened inside a transfer.
    #[error("bank account '{account_id}' not found{}", role_suffix(.role))]
    AccountNotFound {
        account_id: AccountId,
        role: Option<AccountRole>,
    },

    /// A customer lookup missed.
    #[error("customer '{0}' not found")]
    CustomerNotFound(CustomerId),

    /// Source and destination of a transfer are the same account.
    #[error("transfers within the same bank account '{0}' are not allowed")]
    SelfTransferNotAllowed(AccountId),

    /// Transfer amounts must be strictly positive.
    #[error("transfer amount of {0} cents is too low; it must be positive")]
    TransferAmountTooLow(i64),

    /// Accounts cannot be opened owing money.
    #[error("cannot open a bank account with negative balance ({0} cents)")]
    NegativeOpeningBalance(i64),

    /// Applying the delta would drive the balance below zero.
    #[error(
        "insufficient balance on account '{account_id}': balance {balance_cents} cents, \
         attempted delta {delta_cents} cents"
    )]
    InsufficientBalance {
        account_id: AccountId,
        balance_cents: i64,
        delta_cents: i64,
    },

    /// Applying the delta would overflow the balance representation.
    #[error("balance overflow on account '{account_id}'")]
    BalanceOverflow { account_id: AccountId },

    /// A ledger record references the queried account in neither role.
    ///
    /// This signals the account and ledger stores have diverged; it is a
    /// data-integrity fault, deliberately distinct from `AccountNotFound`.
    #[error("transfer '{transfer_id}' references account '{account_id}' in neither role")]
    RoleMismatch {
        transfer_id: TransferId,
        account_id: AccountId,
    },

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A conflict occurred (e.g. stale version / optimistic concurrency).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The storage collaborator failed.
    #[error("storage failure: {0}")]
    Storage(String),
}

/// Error surfaced by storage collaborators.
///
/// Separate from [`BankError`] so store implementations do not get to invent
/// business failures; everything they report folds into the domain taxonomy
/// through the `From` impl below.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Optimistic concurrency check failed: the committed snapshot is stale.
    #[error(
        "stale snapshot for account '{account_id}': expected version {expected}, found {actual}"
    )]
    Conflict {
        account_id: AccountId,
        expected: u64,
        actual: u64,
    },

    /// A row the commit requires does not exist.
    #[error("account '{account_id}' is not persisted")]
    UnknownAccount { account_id: AccountId },

    /// The storage backend itself failed (poisoned lock, IO, ...).
    #[error("storage failure: {0}")]
    Storage(String),
}

impl StoreError {
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

impl From<StoreError> for BankError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { .. } => BankError::Conflict(err.to_string()),
            StoreError::UnknownAccount { account_id } => {
                BankError::account_not_found(account_id, None)
            }
            StoreError::Storage(msg) => BankError::Storage(msg),
        }
    }
}

fn role_suffix(role: &Option<AccountRole>) -> String {
    match role {
        Some(role) => format!(" ({role} account)"),
        None => String::new(),
    }
}

impl BankError {
    pub fn account_not_found(account_id: AccountId, role: Option<AccountRole>) -> Self {
        Self::AccountNotFound { account_id, role }
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}
