//! Record model for customer round-trips.
//!
//! Field names on the wire are snake_case and match the Rust field names, so
//! no per-field renames are needed. Optional values are always `Option<T>`:
//! `None` means the field is absent, which is not the same as `Some("")`.

pub mod address;
pub mod customer;

use serde::{Deserialize, Serialize};

pub use address::Address;
pub use customer::Customer;

/// The top-level payload: a list of customers under the `customers` key.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CustomerCollection {
    /// Customers in generation order.
    pub customers: Vec<Customer>,
}

impl CustomerCollection {
    /// Wrap a list of customers.
    #[must_use]
    pub const fn new(customers: Vec<Customer>) -> Self {
        Self { customers }
    }

    /// Number of customers in the collection.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.customers.len()
    }

    /// Whether the collection holds no customers.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    /// Iterate over the customers in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Customer> {
        self.customers.iter()
    }

    /// Position and ID of the first customer whose default address is not
    /// listed in its `addresses`.
    #[must_use]
    pub fn first_inconsistent_customer(&self) -> Option<(usize, i64)> {
        self.customers
            .iter()
            .enumerate()
            .find(|(_, customer)| !customer.has_consistent_default_address())
            .map(|(index, customer)| (index, customer.id))
    }
}

impl From<Vec<Customer>> for CustomerCollection {
    fn from(customers: Vec<Customer>) -> Self {
        Self::new(customers)
    }
}

impl<'a> IntoIterator for &'a CustomerCollection {
    type Item = &'a Customer;
    type IntoIter = std::slice::Iter<'a, Customer>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
