//! Generator and codec end to end, without the harness loop.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use customer_roundtrip_core::{
    Codec, CustomerCollection, CustomerSource, DecodeError, FakeCustomerGenerator,
    GeneratorConfig, JsonCodec, Mismatch, OmissionPolicy, verify_roundtrip,
};
use customer_roundtrip_integration_tests::seeded_generator;

// ============================================================================
// Scenario: 50 customers round-trip
// ============================================================================

#[test]
fn test_fifty_customers_roundtrip() {
    let collection = CustomerCollection::new(seeded_generator(50).generate_batch(50).unwrap());

    for omit in [true, false] {
        let codec = JsonCodec::new(omit);
        let decoded = codec.decode(&codec.encode(&collection).unwrap()).unwrap();

        assert_eq!(decoded.len(), 50);
        for (original, decoded) in collection.iter().zip(decoded.iter()) {
            assert_eq!(decoded.default_address, original.default_address);
            assert_eq!(decoded.addresses.last(), Some(&decoded.default_address));
        }
        assert_eq!(verify_roundtrip(&collection, &decoded, true), Ok(()));
    }
}

// ============================================================================
// Scenario: absent province stays absent
// ============================================================================

#[test]
fn test_absent_province_stays_absent() {
    let config = GeneratorConfig {
        omission: OmissionPolicy::default().with("address.province", 1.0),
        seed: Some(2),
        ..GeneratorConfig::default()
    };
    let mut generator = FakeCustomerGenerator::new(config).unwrap();
    let collection = CustomerCollection::new(generator.generate_batch(10).unwrap());

    for omit in [true, false] {
        let codec = JsonCodec::new(omit);
        let bytes = codec.encode(&collection).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(!text.contains("\"province\":\"\""));

        let decoded = codec.decode(&bytes).unwrap();
        for customer in &decoded {
            assert_eq!(customer.default_address.province, None);
            assert!(customer.addresses.iter().all(|a| a.province.is_none()));
        }
    }
}

#[test]
fn test_explicit_null_and_missing_key_decode_the_same() {
    let collection = CustomerCollection::new(seeded_generator(3).generate_batch(5).unwrap());
    let omitted = JsonCodec::new(true).encode(&collection).unwrap();
    let explicit = JsonCodec::new(false).encode(&collection).unwrap();

    assert!(omitted.len() < explicit.len());
    assert_eq!(
        JsonCodec::default().decode(&omitted).unwrap(),
        JsonCodec::default().decode(&explicit).unwrap()
    );
}

#[test]
fn test_empty_string_is_not_absent() {
    let mut collection = CustomerCollection::new(seeded_generator(4).generate_batch(1).unwrap());
    let customer = collection.customers.first_mut().unwrap();
    customer.note = Some(String::new());
    customer.tags = None;

    let codec = JsonCodec::new(true);
    let decoded = codec.decode(&codec.encode(&collection).unwrap()).unwrap();
    let customer = decoded.customers.first().unwrap();

    assert_eq!(customer.note.as_deref(), Some(""));
    assert_eq!(customer.tags, None);
}

// ============================================================================
// Scenario: truncated bytes
// ============================================================================

#[test]
fn test_truncated_encoding_fails_to_decode() {
    let collection = CustomerCollection::new(seeded_generator(5).generate_batch(20).unwrap());
    let codec = JsonCodec::default();
    let bytes = codec.encode(&collection).unwrap();

    let err = codec.decode(&bytes[..bytes.len() / 2]).unwrap_err();
    assert!(matches!(err, DecodeError::Malformed(_)));
}

#[test]
fn test_corrupted_byte_fails_to_decode() {
    let collection = CustomerCollection::new(seeded_generator(6).generate_batch(3).unwrap());
    let codec = JsonCodec::default();
    let mut bytes = codec.encode(&collection).unwrap();
    // The first byte is the opening brace of the wrapper object.
    bytes[0] = b'[';

    assert!(codec.decode(&bytes).is_err());
}

#[test]
fn test_detached_default_address_is_rejected() {
    let mut collection = CustomerCollection::new(seeded_generator(7).generate_batch(4).unwrap());
    collection.customers[2].addresses.pop();
    let bytes = JsonCodec::default().encode(&collection).unwrap();

    let err = JsonCodec::default().decode(&bytes).unwrap_err();
    assert!(matches!(err, DecodeError::DefaultAddressMissing { index: 2, .. }));
}

#[test]
fn test_count_mismatch_detected() {
    let collection = CustomerCollection::new(seeded_generator(8).generate_batch(3).unwrap());
    let mut decoded = collection.clone();
    decoded.customers.pop();

    assert_eq!(
        verify_roundtrip(&collection, &decoded, false),
        Err(Mismatch::Count {
            expected: 3,
            actual: 2
        })
    );
}
