//! Customer records.
//!
//! Thin by design: customers exist so accounts have an owner. The interesting
//! invariants all live in `corebank-banking`.

pub mod customer;
pub mod seed;

pub use customer::{Customer, CustomerStore};
