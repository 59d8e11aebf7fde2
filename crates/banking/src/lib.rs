//! Banking module: accounts, transfer orders, and the services over them.
//!
//! THE CORE of the system. Balance mutation is expressed as a value transition
//! ([`Account::with_delta`]), transfer orders are append-only facts, and the
//! live balance of an account is re-derivable from its transfer history at any
//! time. Pure domain logic plus the ports it consumes; no IO, no HTTP.

pub mod account;
pub mod service;
pub mod store;
pub mod transfer;

pub use account::{Account, NewAccount};
pub use service::Bank;
pub use store::{AccountStore, LedgerStore};
pub use transfer::TransferOrder;
