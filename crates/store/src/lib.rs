//! Store implementations for the banking core.
//!
//! Currently in-memory only; the ports live in `corebank-banking::store` and
//! `corebank-customers`, so swapping in a relational backend is a new impl
//! here, not a domain change.

pub mod in_memory;

#[cfg(test)]
mod integration_tests;

pub use in_memory::InMemoryBankStore;
