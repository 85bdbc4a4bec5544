//! Fake customer data generator.
//!
//! Produces randomized but structurally valid customers. Every optional field
//! is subject to an [`OmissionPolicy`] that decides how often it is left
//! absent, keyed by the field's wire path (`"address.province"`,
//! `"customer.note"`, ...).
//!
//! # Example
//!
//! ```
//! use customer_roundtrip_core::{CustomerSource, FakeCustomerGenerator, GeneratorConfig};
//!
//! let config = GeneratorConfig {
//!     seed: Some(7),
//!     ..GeneratorConfig::default()
//! };
//! let mut generator = FakeCustomerGenerator::new(config).unwrap();
//! let batch = generator.generate_batch(3).unwrap();
//!
//! assert_eq!(batch.len(), 3);
//! assert!(batch.iter().all(|c| c.addresses.last() == Some(&c.default_address)));
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::model::{Address, Customer};

/// Omission probability for optional fields without an override.
pub const DEFAULT_OMISSION_PROBABILITY: f64 = 0.2;
/// Omission probability for `address.province`.
pub const PROVINCE_OMISSION_PROBABILITY: f64 = 0.7;
/// Omission probability for `address.address2`.
pub const ADDRESS2_OMISSION_PROBABILITY: f64 = 0.9;

/// Earliest generated `created_at` (2015-01-01T00:00:00Z).
const EARLIEST_CREATED_AT: i64 = 1_420_070_400;
/// Latest generated `created_at` (2026-01-01T00:00:00Z).
const LATEST_CREATED_AT: i64 = 1_767_225_600;
/// Upper bound on the gap between `created_at` and `updated_at` (two years).
const MAX_UPDATE_GAP_SECS: i64 = 2 * 365 * 24 * 3600;

const FIRST_NAMES: &[&str] = &[
    "Ada", "Grace", "Linus", "Margaret", "Alan", "Barbara", "Dennis", "Frances", "Ken", "Radia",
    "Edsger", "Hedy", "Niklaus", "Karen", "Tim", "Shafi",
];
const LAST_NAMES: &[&str] = &[
    "Lovelace", "Hopper", "Torvalds", "Hamilton", "Turing", "Liskov", "Ritchie", "Allen",
    "Thompson", "Perlman", "Dijkstra", "Lamarr", "Wirth", "Jones", "Berners-Lee", "Goldwasser",
];
const COMPANIES: &[&str] = &[
    "Pineapple Provisions",
    "Northwind Traders",
    "Acme Corporation",
    "Globex",
    "Initech",
    "Umbrella Goods",
    "Stark Supply Co.",
];
const STREETS: &[&str] = &[
    "Main St", "Queen St W", "Elm Ave", "Maple Dr", "Harbour Rd", "King St E", "Oak Blvd",
    "Sunset Way",
];
const CITIES: &[&str] = &[
    "Ottawa", "Toronto", "Halifax", "Vancouver", "Portland", "Austin", "Denver", "Boston",
];
const PROVINCES: &[(&str, &str)] = &[
    ("Ontario", "ON"),
    ("Nova Scotia", "NS"),
    ("British Columbia", "BC"),
    ("Quebec", "QC"),
    ("Oregon", "OR"),
    ("Texas", "TX"),
    ("Colorado", "CO"),
    ("Massachusetts", "MA"),
];
const COUNTRIES: &[(&str, &str)] = &[
    ("Canada", "CA"),
    ("United States", "US"),
    ("Mexico", "MX"),
    ("United Kingdom", "GB"),
];
const EMAIL_DOMAINS: &[&str] = &["example.com", "example.org", "mail.test", "shop.invalid"];
const STATES: &[&str] = &["disabled", "invited", "enabled", "declined"];
const TAGS: &[&str] = &["vip", "wholesale", "newsletter", "returning", "local", "gift"];
const NOTE_WORDS: &[&str] = &[
    "prefers", "weekend", "delivery", "leave", "at", "side", "door", "allergic", "to", "nuts",
    "call", "before", "shipping",
];

/// Errors raised when the generator configuration cannot produce valid records.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    /// An omission probability is outside `[0, 1]`.
    #[error("omission probability for {field} must be within [0, 1], got {probability}")]
    InvalidProbability {
        /// Field the probability applies to (`"*"` for the default).
        field: String,
        /// The rejected probability.
        probability: f64,
    },

    /// The extra address range is inverted.
    #[error("extra address range is empty: min {min} > max {max}")]
    InvalidAddressRange {
        /// Minimum extra addresses.
        min: usize,
        /// Maximum extra addresses.
        max: usize,
    },

    /// A generated timestamp could not be represented.
    #[error("timestamp {0} is out of range")]
    TimestampOutOfRange(i64),
}

/// Per-field omission probabilities.
///
/// Fields are identified by `<record>.<wire name>`, for example
/// `"address.province"` or `"customer.total_spent"`.
#[derive(Debug, Clone, PartialEq)]
pub struct OmissionPolicy {
    default: f64,
    overrides: BTreeMap<String, f64>,
}

impl OmissionPolicy {
    /// A policy that omits every optional field with the same probability.
    #[must_use]
    pub const fn uniform(probability: f64) -> Self {
        Self {
            default: probability,
            overrides: BTreeMap::new(),
        }
    }

    /// Set the omission probability for one field.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, probability: f64) -> Self {
        self.overrides.insert(field.into(), probability);
        self
    }

    /// Omission probability for a field.
    #[must_use]
    pub fn probability(&self, field: &str) -> f64 {
        self.overrides.get(field).copied().unwrap_or(self.default)
    }

    /// Check that every probability is within `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::InvalidProbability` for the first bad entry.
    pub fn validate(&self) -> Result<(), GenerationError> {
        std::iter::once(("*", self.default))
            .chain(self.overrides.iter().map(|(k, v)| (k.as_str(), *v)))
            .find(|(_, p)| !(0.0..=1.0).contains(p))
            .map_or(Ok(()), |(field, probability)| {
                Err(GenerationError::InvalidProbability {
                    field: field.to_owned(),
                    probability,
                })
            })
    }
}

impl Default for OmissionPolicy {
    fn default() -> Self {
        Self::uniform(DEFAULT_OMISSION_PROBABILITY)
            .with("address.province", PROVINCE_OMISSION_PROBABILITY)
            .with("address.address2", ADDRESS2_OMISSION_PROBABILITY)
    }
}

/// Generator configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Omission probabilities for optional fields.
    pub omission: OmissionPolicy,
    /// RNG seed. `None` seeds from the operating system.
    pub seed: Option<u64>,
    /// Minimum number of addresses besides the default one.
    pub min_extra_addresses: usize,
    /// Maximum number of addresses besides the default one.
    pub max_extra_addresses: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            omission: OmissionPolicy::default(),
            seed: None,
            min_extra_addresses: 0,
            max_extra_addresses: 2,
        }
    }
}

impl GeneratorConfig {
    /// Check the configuration.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError` if a probability or the address range is invalid.
    pub fn validate(&self) -> Result<(), GenerationError> {
        self.omission.validate()?;
        if self.min_extra_addresses > self.max_extra_addresses {
            return Err(GenerationError::InvalidAddressRange {
                min: self.min_extra_addresses,
                max: self.max_extra_addresses,
            });
        }
        Ok(())
    }
}

/// Something that produces customers for a round-trip run.
pub trait CustomerSource {
    /// Produce one customer with a default address that is also listed in
    /// its addresses.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError` if no valid customer can be produced.
    fn generate_customer(&mut self) -> Result<Customer, GenerationError>;

    /// Produce `count` customers in order.
    ///
    /// # Errors
    ///
    /// Returns the first `GenerationError` encountered.
    fn generate_batch(&mut self, count: usize) -> Result<Vec<Customer>, GenerationError> {
        (0..count).map(|_| self.generate_customer()).collect()
    }
}

/// Random customer generator driven by a [`GeneratorConfig`].
#[derive(Debug)]
pub struct FakeCustomerGenerator {
    config: GeneratorConfig,
    rng: StdRng,
}

impl FakeCustomerGenerator {
    /// Create a generator.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError` if the configuration is invalid.
    pub fn new(config: GeneratorConfig) -> Result<Self, GenerationError> {
        config.validate()?;
        let rng = config
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        Ok(Self { config, rng })
    }

    /// Roll the omission dice for `field`, producing the value if it stays.
    fn maybe<T>(&mut self, field: &str, value: impl FnOnce(&mut StdRng) -> T) -> Option<T> {
        let probability = self.config.omission.probability(field);
        if self.rng.random_bool(probability) {
            None
        } else {
            Some(value(&mut self.rng))
        }
    }

    fn address(&mut self) -> Address {
        let first_name = self.maybe("address.first_name", |rng| pick(rng, FIRST_NAMES).to_owned());
        let last_name = self.maybe("address.last_name", |rng| pick(rng, LAST_NAMES).to_owned());
        let (province, province_code) = *PROVINCES.choose(&mut self.rng).unwrap_or(&("", ""));
        let (country, country_code) = *COUNTRIES.choose(&mut self.rng).unwrap_or(&("", ""));
        let name = Address::display_name(first_name.as_deref(), last_name.as_deref());

        Address {
            company: self.maybe("address.company", |rng| pick(rng, COMPANIES).to_owned()),
            address1: self.maybe("address.address1", |rng| {
                format!("{} {}", rng.random_range(1..=9999), pick(rng, STREETS))
            }),
            address2: self.maybe("address.address2", |rng| {
                format!("Unit {}", rng.random_range(1..=400))
            }),
            city: self.maybe("address.city", |rng| pick(rng, CITIES).to_owned()),
            province: self.maybe("address.province", |_| province.to_owned()),
            province_code: self.maybe("address.province_code", |_| province_code.to_owned()),
            zip: self.maybe("address.zip", |rng| {
                format!("{:05}", rng.random_range(0..100_000))
            }),
            country: self.maybe("address.country", |_| country.to_owned()),
            country_code: self.maybe("address.country_code", |_| country_code.to_owned()),
            phone: self.maybe("address.phone", random_phone),
            latitude: self.maybe("address.latitude", |rng| rng.random_range(-90.0_f32..=90.0)),
            longitude: self.maybe("address.longitude", |rng| {
                rng.random_range(-180.0_f32..=180.0)
            }),
            name: name.and_then(|name| self.maybe("address.name", |_| name)),
            first_name,
            last_name,
        }
    }

    fn timestamps(
        &mut self,
    ) -> Result<(Option<DateTime<FixedOffset>>, Option<DateTime<FixedOffset>>), GenerationError>
    {
        let created_secs = self
            .rng
            .random_range(EARLIEST_CREATED_AT..LATEST_CREATED_AT);
        let updated_secs = created_secs + self.rng.random_range(0..=MAX_UPDATE_GAP_SECS);
        // Whole and half-hour offsets between UTC-12:00 and UTC+14:00.
        let offset_secs = self.rng.random_range(-24..=28) * 1800;

        let created_at = self
            .maybe("customer.created_at", |_| to_timestamp(created_secs, offset_secs))
            .transpose()?;
        let updated_at = self
            .maybe("customer.updated_at", |_| to_timestamp(updated_secs, offset_secs))
            .transpose()?;
        Ok((created_at, updated_at))
    }
}

impl CustomerSource for FakeCustomerGenerator {
    fn generate_customer(&mut self) -> Result<Customer, GenerationError> {
        let (created_at, updated_at) = self.timestamps()?;
        let first_name = self.maybe("customer.first_name", |rng| pick(rng, FIRST_NAMES).to_owned());
        let last_name = self.maybe("customer.last_name", |rng| pick(rng, LAST_NAMES).to_owned());
        let email = self.maybe("customer.email", |rng| {
            format!(
                "{}.{}{}@{}",
                pick(rng, FIRST_NAMES),
                pick(rng, LAST_NAMES),
                rng.random_range(1..1000),
                pick(rng, EMAIL_DOMAINS)
            )
            .to_lowercase()
        });

        let extra = self
            .rng
            .random_range(self.config.min_extra_addresses..=self.config.max_extra_addresses);
        let mut addresses: Vec<Address> = (0..extra).map(|_| self.address()).collect();
        let default_address = self.address();
        addresses.push(default_address.clone());

        Ok(Customer {
            id: self.rng.random_range(1_000_000_000_000..10_000_000_000_000),
            email,
            accepts_marketing: self.rng.random_bool(0.5),
            created_at,
            updated_at,
            first_name,
            last_name,
            orders_count: self.rng.random_range(0..500),
            state: self.maybe("customer.state", |rng| pick(rng, STATES).to_owned()),
            total_spent: self.maybe("customer.total_spent", |rng| {
                Decimal::new(rng.random_range(0..10_000_000), 2)
            }),
            last_order_id: self.maybe("customer.last_order_id", |rng| {
                rng.random_range(1_000_000_000_000..10_000_000_000_000)
            }),
            last_order_name: self.maybe("customer.last_order_name", |rng| {
                format!("#{}", rng.random_range(1001..100_000))
            }),
            note: self.maybe("customer.note", random_note),
            verified_email: self.rng.random_bool(0.5),
            multipass_identifier: self.maybe("customer.multipass_identifier", |rng| {
                uuid::Builder::from_random_bytes(rng.random())
                    .into_uuid()
                    .to_string()
            }),
            tax_exempt: self.rng.random_bool(0.1),
            tags: self.maybe("customer.tags", random_tags),
            default_address,
            addresses,
        })
    }
}

fn pick(rng: &mut StdRng, pool: &[&'static str]) -> &'static str {
    pool.choose(rng).copied().unwrap_or_default()
}

fn random_phone(rng: &mut StdRng) -> String {
    format!(
        "+1-{}-{:03}-{:04}",
        rng.random_range(200..1000),
        rng.random_range(0..1000),
        rng.random_range(0..10_000)
    )
}

fn random_note(rng: &mut StdRng) -> String {
    let words = rng.random_range(3..=8);
    NOTE_WORDS
        .choose_multiple(rng, words)
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

fn random_tags(rng: &mut StdRng) -> String {
    let count = rng.random_range(0..=3);
    TAGS.choose_multiple(rng, count)
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
}

fn to_timestamp(secs: i64, offset_secs: i32) -> Result<DateTime<FixedOffset>, GenerationError> {
    let offset = FixedOffset::east_opt(offset_secs).ok_or(GenerationError::TimestampOutOfRange(secs))?;
    DateTime::from_timestamp(secs, 0)
        .map(|utc| utc.with_timezone(&offset))
        .ok_or(GenerationError::TimestampOutOfRange(secs))
}
