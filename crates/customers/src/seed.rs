//! Startup seed data.
//!
//! The bundled document mirrors the customers the service has always shipped
//! with; seeding is idempotent so repeated startups leave existing rows alone.

use corebank_core::{BankError, BankResult};

use crate::customer::{Customer, CustomerStore};

/// Customers pre-populated on a fresh deployment.
pub const SEED_CUSTOMERS_JSON: &str = r#"[
  { "id": 1, "name": "Arisha Barron" },
  { "id": 2, "name": "Branden Gibson" },
  { "id": 3, "name": "Rhonda Church" },
  { "id": 4, "name": "Georgina Hazel" }
]"#;

/// Parse a seed document (a JSON array of customers).
pub fn parse_customers(json: &str) -> BankResult<Vec<Customer>> {
    serde_json::from_str(json).map_err(|e| BankError::storage(format!("malformed seed data: {e}")))
}

/// Insert the bundled seed customers, skipping ids that already exist.
/// Returns the customers actually inserted.
pub fn seed_customers<S: CustomerStore>(store: &S) -> BankResult<Vec<Customer>> {
    let mut inserted = Vec::new();
    for customer in parse_customers(SEED_CUSTOMERS_JSON)? {
        if store.find_customer(customer.id)?.is_some() {
            continue;
        }
        let customer = store.insert_customer(customer)?;
        tracing::debug!(customer_id = %customer.id, name = %customer.name, "seeded customer");
        inserted.push(customer);
    }
    Ok(inserted)
}
