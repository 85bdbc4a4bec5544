//! Customer record.

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Address;

/// A customer with its addresses.
///
/// `default_address` is owned by the customer and is also listed in
/// `addresses`. Decoding rejects customers where that does not hold.
// Allow: the customer record carries independent boolean flags
// (accepts_marketing, verified_email, tax_exempt) that cannot be grouped.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// Customer ID.
    pub id: i64,
    /// Email address.
    pub email: Option<String>,
    /// Whether the customer accepts email marketing.
    pub accepts_marketing: bool,
    /// Creation timestamp.
    pub created_at: Option<DateTime<FixedOffset>>,
    /// Last update timestamp.
    pub updated_at: Option<DateTime<FixedOffset>>,
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// Total orders count.
    pub orders_count: i32,
    /// Account state (e.g. "enabled", "invited").
    pub state: Option<String>,
    /// Total amount spent. Serialized as a decimal string.
    pub total_spent: Option<Decimal>,
    /// ID of the most recent order.
    pub last_order_id: Option<i64>,
    /// Name of the most recent order (e.g. "#1001").
    pub last_order_name: Option<String>,
    /// Staff note.
    pub note: Option<String>,
    /// Whether the email address has been verified.
    pub verified_email: bool,
    /// Multipass login identifier.
    pub multipass_identifier: Option<String>,
    /// Whether the customer is tax exempt.
    pub tax_exempt: bool,
    /// Comma-separated tags.
    pub tags: Option<String>,
    /// Default shipping address.
    pub default_address: Address,
    /// All addresses, including the default one.
    pub addresses: Vec<Address>,
}

impl Customer {
    /// Whether `default_address` appears in `addresses`.
    #[must_use]
    pub fn has_consistent_default_address(&self) -> bool {
        self.addresses.contains(&self.default_address)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn minimal_customer() -> Customer {
        let address = Address {
            city: Some("Ottawa".to_string()),
            ..Address::default()
        };
        Customer {
            id: 42,
            email: None,
            accepts_marketing: false,
            created_at: None,
            updated_at: None,
            first_name: None,
            last_name: None,
            orders_count: 0,
            state: None,
            total_spent: None,
            last_order_id: None,
            last_order_name: None,
            note: None,
            verified_email: false,
            multipass_identifier: None,
            tax_exempt: false,
            tags: None,
            default_address: address.clone(),
            addresses: vec![address],
        }
    }

    #[test]
    fn test_consistent_default_address() {
        let customer = minimal_customer();
        assert!(customer.has_consistent_default_address());
    }

    #[test]
    fn test_inconsistent_default_address() {
        let mut customer = minimal_customer();
        customer.addresses.clear();
        assert!(!customer.has_consistent_default_address());

        customer.addresses.push(Address {
            city: Some("Toronto".to_string()),
            ..Address::default()
        });
        assert!(!customer.has_consistent_default_address());
    }

    #[test]
    fn test_total_spent_is_string_on_wire() {
        let mut customer = minimal_customer();
        customer.total_spent = Some(Decimal::new(12_345, 2));
        let value = serde_json::to_value(&customer).unwrap();
        assert_eq!(value["total_spent"], json!("123.45"));
    }

    #[test]
    fn test_timestamp_keeps_offset() {
        let mut customer = minimal_customer();
        customer.created_at = Some(DateTime::parse_from_rfc3339("2024-03-01T10:15:00-05:00").unwrap());
        let value = serde_json::to_value(&customer).unwrap();
        assert_eq!(value["created_at"], json!("2024-03-01T10:15:00-05:00"));

        let parsed: Customer = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.created_at.unwrap().offset().local_minus_utc(), -5 * 3600);
    }

    #[test]
    fn test_missing_optional_field_is_absent() {
        let mut value = serde_json::to_value(minimal_customer()).unwrap();
        value.as_object_mut().unwrap().remove("email");

        let parsed: Customer = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.email, None);
    }

    #[test]
    fn test_missing_required_field_is_rejected() {
        let mut value = serde_json::to_value(minimal_customer()).unwrap();
        value.as_object_mut().unwrap().remove("orders_count");

        assert!(serde_json::from_value::<Customer>(value).is_err());
    }
}
