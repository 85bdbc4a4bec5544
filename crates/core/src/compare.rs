//! Verification of a decoded collection against the collection it came from.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use serde_json::Value;
use thiserror::Error;

use crate::model::CustomerCollection;

/// A decoded collection that does not match its original.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Mismatch {
    /// The number of customers changed.
    #[error("expected {expected} customer records, decoded {actual}")]
    Count {
        /// Customers in the original collection.
        expected: usize,
        /// Customers in the decoded collection.
        actual: usize,
    },

    /// A field differs between original and decoded record.
    #[error("decoded value differs from original at {path}")]
    Field {
        /// Wire path of the first difference, e.g. `customers[3].default_address.province`.
        path: String,
    },
}

/// Check that `decoded` matches `original`.
///
/// The record count is always compared. With `strict` set, the collections
/// must also render to the same wire values field by field, including which
/// optional fields are present. Timestamp offsets and decimal scale count:
/// `-05:00` and `Z` for the same instant, or `10.5` and `10.50`, differ.
///
/// # Errors
///
/// Returns the first [`Mismatch`] found.
pub fn verify_roundtrip(
    original: &CustomerCollection,
    decoded: &CustomerCollection,
    strict: bool,
) -> Result<(), Mismatch> {
    if original.len() != decoded.len() {
        return Err(Mismatch::Count {
            expected: original.len(),
            actual: decoded.len(),
        });
    }

    if !strict {
        return Ok(());
    }

    if let Some(path) = first_difference(original, decoded) {
        return Err(Mismatch::Field { path });
    }
    // Wire values agree but the records do not, e.g. a NaN coordinate.
    if original != decoded {
        return Err(Mismatch::Field {
            path: "customers".to_string(),
        });
    }

    Ok(())
}

/// Wire path of the first difference between two collections.
///
/// Both sides are rendered with explicit `null`s so that an absent field on
/// one side and a present field on the other show up as a difference.
#[must_use]
pub fn first_difference(
    original: &CustomerCollection,
    decoded: &CustomerCollection,
) -> Option<String> {
    let left = serde_json::to_value(original).ok()?;
    let right = serde_json::to_value(decoded).ok()?;
    let mut path = String::new();
    diff_values(&left, &right, &mut path).then_some(path)
}

/// Walk both values in step; on the first difference leave its path in `path`
/// and return true.
fn diff_values(left: &Value, right: &Value, path: &mut String) -> bool {
    if left == right {
        return false;
    }

    match (left, right) {
        (Value::Object(l), Value::Object(r)) => {
            let keys: BTreeSet<&String> = l.keys().chain(r.keys()).collect();
            for key in keys {
                let len = path.len();
                if !path.is_empty() {
                    path.push('.');
                }
                path.push_str(key);

                let l_member = l.get(key).unwrap_or(&Value::Null);
                let r_member = r.get(key).unwrap_or(&Value::Null);
                if diff_values(l_member, r_member, path) {
                    return true;
                }
                path.truncate(len);
            }
            // Only reachable when the maps differ in ways `get` cannot see.
            true
        }
        (Value::Array(l), Value::Array(r)) => {
            for (index, (l_item, r_item)) in l.iter().zip(r).enumerate() {
                let len = path.len();
                let _ = write!(path, "[{index}]");
                if diff_values(l_item, r_item, path) {
                    return true;
                }
                path.truncate(len);
            }
            let _ = write!(path, "[{}]", l.len().min(r.len()));
            true
        }
        _ => true,
    }
}
