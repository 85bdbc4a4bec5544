//! JSON codec for customer collections.
//!
//! # Absent fields
//!
//! With `omit_absent_fields` enabled, `None` values are removed from the
//! output entirely; otherwise they are written as explicit `null`. Decoding
//! maps both a missing key and an explicit `null` back to `None`, so absence
//! survives a round-trip under either setting and never turns into an empty
//! string or zero.
//!
//! # Determinism
//!
//! Encoding goes through [`serde_json::Value`], whose objects keep their keys
//! in a stable order, so the same collection always encodes to the same bytes.

use serde_json::Value;
use serde_json::error::Category;
use thiserror::Error;

use crate::model::CustomerCollection;

/// Errors raised while encoding a collection.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// A coordinate is NaN or infinite, which JSON cannot carry.
    ///
    /// `serde_json` would write such a value as `null`, which decodes as an
    /// absent coordinate, so it is rejected instead.
    #[error("customer {customer}: {field} is not a finite number")]
    NonFiniteCoordinate {
        /// ID of the customer owning the address.
        customer: i64,
        /// Wire name of the offending field.
        field: &'static str,
    },

    /// The serializer itself failed.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while decoding bytes into a collection.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The bytes are not well-formed JSON (syntax error or truncated input).
    #[error("malformed JSON: {0}")]
    Malformed(#[source] serde_json::Error),

    /// The JSON is well-formed but does not have the expected shape, such as
    /// a missing `customers` wrapper or a missing required field.
    #[error("unexpected JSON shape: {0}")]
    Shape(#[source] serde_json::Error),

    /// A customer's default address is not listed in its addresses.
    #[error("customer {id} at index {index}: default_address is not listed in addresses")]
    DefaultAddressMissing {
        /// Position of the customer in the collection.
        index: usize,
        /// Customer ID.
        id: i64,
    },
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            Category::Data => Self::Shape(err),
            Category::Syntax | Category::Eof | Category::Io => Self::Malformed(err),
        }
    }
}

/// Encodes and decodes customer collections.
pub trait Codec {
    /// Encode a collection to bytes.
    ///
    /// # Errors
    ///
    /// Returns `EncodeError` if a value cannot be represented in the wire format.
    fn encode(&self, collection: &CustomerCollection) -> Result<Vec<u8>, EncodeError>;

    /// Decode bytes into a collection.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError` if the bytes are malformed, do not have the
    /// expected shape, or break the default address invariant.
    fn decode(&self, bytes: &[u8]) -> Result<CustomerCollection, DecodeError>;
}

/// The JSON wire codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonCodec {
    omit_absent_fields: bool,
}

impl JsonCodec {
    /// Create a codec.
    ///
    /// When `omit_absent_fields` is true, absent values are left out of the
    /// output instead of being written as `null`.
    #[must_use]
    pub const fn new(omit_absent_fields: bool) -> Self {
        Self { omit_absent_fields }
    }

    /// Whether absent values are left out of the output.
    #[must_use]
    pub const fn omits_absent_fields(&self) -> bool {
        self.omit_absent_fields
    }
}

impl Default for JsonCodec {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Codec for JsonCodec {
    fn encode(&self, collection: &CustomerCollection) -> Result<Vec<u8>, EncodeError> {
        reject_non_finite_coordinates(collection)?;

        let mut value = serde_json::to_value(collection)?;
        if self.omit_absent_fields {
            strip_nulls(&mut value);
        }

        Ok(serde_json::to_vec(&value)?)
    }

    fn decode(&self, bytes: &[u8]) -> Result<CustomerCollection, DecodeError> {
        let collection: CustomerCollection = serde_json::from_slice(bytes)?;

        if let Some((index, id)) = collection.first_inconsistent_customer() {
            return Err(DecodeError::DefaultAddressMissing { index, id });
        }

        Ok(collection)
    }
}

fn reject_non_finite_coordinates(collection: &CustomerCollection) -> Result<(), EncodeError> {
    for customer in collection {
        let addresses = std::iter::once(&customer.default_address).chain(&customer.addresses);
        for address in addresses {
            if let Some(field) = address.non_finite_coordinates().next() {
                return Err(EncodeError::NonFiniteCoordinate {
                    customer: customer.id,
                    field,
                });
            }
        }
    }
    Ok(())
}

/// Remove every `null` member from objects, recursively.
fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, member| !member.is_null());
            map.values_mut().for_each(strip_nulls);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_nulls),
        _ => {}
    }
}
