//! Mailing address owned by a customer.

use serde::{Deserialize, Serialize};

/// Mailing address.
///
/// Addresses have no identity of their own; they only exist as the
/// `default_address` or an entry in `addresses` of a [`Customer`](super::Customer).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Address {
    /// First name of the recipient.
    pub first_name: Option<String>,
    /// Last name of the recipient.
    pub last_name: Option<String>,
    /// Company name.
    pub company: Option<String>,
    /// First line of the address.
    pub address1: Option<String>,
    /// Second line of the address.
    pub address2: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Province or state name.
    pub province: Option<String>,
    /// Province or state code.
    pub province_code: Option<String>,
    /// Postal/ZIP code.
    pub zip: Option<String>,
    /// Country name.
    pub country: Option<String>,
    /// Country code (ISO 3166-1 alpha-2).
    pub country_code: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Latitude in degrees.
    pub latitude: Option<f32>,
    /// Longitude in degrees.
    pub longitude: Option<f32>,
    /// Display name of the recipient.
    pub name: Option<String>,
}

impl Address {
    /// Build the display name from first and last name.
    ///
    /// Returns `None` when both parts are absent.
    #[must_use]
    pub fn display_name(first_name: Option<&str>, last_name: Option<&str>) -> Option<String> {
        match (first_name, last_name) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(part), None) | (None, Some(part)) => Some(part.to_owned()),
            (None, None) => None,
        }
    }

    /// Coordinates that JSON cannot represent (NaN or infinite).
    pub(crate) fn non_finite_coordinates(&self) -> impl Iterator<Item = &'static str> {
        [("latitude", self.latitude), ("longitude", self.longitude)]
            .into_iter()
            .filter(|(_, value)| value.is_some_and(|v| !v.is_finite()))
            .map(|(field, _)| field)
    }
}
