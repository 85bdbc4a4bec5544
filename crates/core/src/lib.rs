//! Customer Round-Trip Core - record model, generator and codec.
//!
//! This crate provides everything a round-trip run needs that does not touch
//! the filesystem:
//! - `model` - Customer, Address and the `customers` collection wrapper
//! - `generator` - Randomized but structurally valid customer records
//! - `codec` - JSON encoding and decoding with configurable absent-field handling
//! - `compare` - Verification of a decoded collection against its original
//!
//! # Architecture
//!
//! The core crate contains only types, traits and pure transformations - no
//! file I/O and no logging setup. The harness that drives it lives in the
//! `cli` crate.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod codec;
pub mod compare;
pub mod generator;
pub mod model;

pub use codec::{Codec, DecodeError, EncodeError, JsonCodec};
pub use compare::{Mismatch, verify_roundtrip};
pub use generator::{
    CustomerSource, FakeCustomerGenerator, GenerationError, GeneratorConfig, OmissionPolicy,
};
pub use model::{Address, Customer, CustomerCollection};
