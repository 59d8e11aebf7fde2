use serde::{Deserialize, Serialize};

use corebank_core::{CustomerId, Entity, StoreError};

/// A bank customer. Referenced by accounts through [`CustomerId`]; no embedded
/// object graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
}

impl Customer {
    pub fn new(id: CustomerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl Entity for Customer {
    type Id = CustomerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Durable keyed storage of customers.
pub trait CustomerStore: Send + Sync {
    fn find_customer(&self, id: CustomerId) -> Result<Option<Customer>, StoreError>;

    /// Insert, replacing any existing row with the same id.
    fn insert_customer(&self, customer: Customer) -> Result<Customer, StoreError>;

    /// All customers, ordered by id.
    fn customers(&self) -> Result<Vec<Customer>, StoreError>;
}

impl<T: CustomerStore + ?Sized> CustomerStore for std::sync::Arc<T> {
    fn find_customer(&self, id: CustomerId) -> Result<Option<Customer>, StoreError> {
        (**self).find_customer(id)
    }

    fn insert_customer(&self, customer: Customer) -> Result<Customer, StoreError> {
        (**self).insert_customer(customer)
    }

    fn customers(&self) -> Result<Vec<Customer>, StoreError> {
        (**self).customers()
    }
}
