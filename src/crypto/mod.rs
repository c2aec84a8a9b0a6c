//! Cryptographic utilities
//!
//! Only hashing is needed: signer identity comes from the caller address,
//! so there is no key management here.

pub mod hash;

pub use hash::{sha256, sha256_concat, sha256_hex};
