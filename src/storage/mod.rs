//! Storage module for wallet state persistence

pub mod persistence;

pub use persistence::{Snapshot, Storage, StorageConfig, StorageError};
