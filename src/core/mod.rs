//! Core primitives shared by the wallet, factory and token ledger

pub mod address;

pub use address::{Address, AddressError, ADDRESS_LEN};
