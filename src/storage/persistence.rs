//! State persistence layer
//!
//! Saves and loads the factory (with every wallet it created) together
//! with the token ledger as one JSON snapshot.

use crate::multisig::MultisigFactory;
use crate::token::TokenManager;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Everything that survives between CLI invocations
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub factory: MultisigFactory,
    pub tokens: TokenManager,
}

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub state_file: String,
    pub backup_enabled: bool,
    pub max_backups: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".multisig_data"),
            state_file: "state.json".to_string(),
            backup_enabled: true,
            max_backups: 5,
        }
    }
}

/// Snapshot storage manager
pub struct Storage {
    config: StorageConfig,
}

impl Storage {
    /// Create a new storage manager, creating the data directory if needed
    pub fn new(config: StorageConfig) -> Result<Self, StorageError> {
        fs::create_dir_all(&config.data_dir)?;
        Ok(Self { config })
    }

    /// Create with default configuration
    pub fn with_defaults() -> Result<Self, StorageError> {
        Self::new(StorageConfig::default())
    }

    /// Path of the state file
    pub fn state_path(&self) -> PathBuf {
        self.config.data_dir.join(&self.config.state_file)
    }

    fn backup_path(&self, index: usize) -> PathBuf {
        self.config
            .data_dir
            .join(format!("{}.backup.{}", self.config.state_file, index))
    }

    /// Save a snapshot to disk
    pub fn save(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        let path = self.state_path();

        if self.config.backup_enabled && self.config.max_backups > 0 && path.exists() {
            self.rotate_backups()?;
            fs::copy(&path, self.backup_path(0))?;
        }

        // Write to temporary file first
        let temp_path = self.config.data_dir.join(format!("{}.tmp", self.config.state_file));
        let file = fs::File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, snapshot)?;
        writer.into_inner().map_err(|e| e.into_error())?.sync_all()?;

        // Atomic rename
        fs::rename(&temp_path, &path)?;

        log::debug!("State saved to {}", path.display());

        Ok(())
    }

    /// Load the snapshot from disk
    pub fn load(&self) -> Result<Snapshot, StorageError> {
        let path = self.state_path();

        if !path.exists() {
            return Err(StorageError::InvalidData(format!(
                "State file not found: {}",
                path.display()
            )));
        }

        read_snapshot(&path)
    }

    /// Check if a saved snapshot exists
    pub fn exists(&self) -> bool {
        self.state_path().exists()
    }

    /// Delete the saved snapshot
    pub fn delete(&self) -> Result<(), StorageError> {
        let path = self.state_path();
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Shift backups up by one, dropping the oldest
    fn rotate_backups(&self) -> Result<(), StorageError> {
        let oldest = self.backup_path(self.config.max_backups - 1);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }

        for i in (0..self.config.max_backups - 1).rev() {
            let current = self.backup_path(i);
            if current.exists() {
                fs::rename(&current, self.backup_path(i + 1))?;
            }
        }

        Ok(())
    }

    /// Load backup `backup_index`, 0 being the most recent
    pub fn restore_backup(&self, backup_index: usize) -> Result<Snapshot, StorageError> {
        let backup_path = self.backup_path(backup_index);

        if !backup_path.exists() {
            return Err(StorageError::InvalidData(format!(
                "Backup {} not found",
                backup_index
            )));
        }

        let snapshot = read_snapshot(&backup_path)?;
        log::info!("Restored state from backup {}", backup_index);
        Ok(snapshot)
    }

    /// List available backups
    pub fn list_backups(&self) -> Vec<usize> {
        (0..self.config.max_backups)
            .filter(|i| self.backup_path(*i).exists())
            .collect()
    }
}

fn read_snapshot(path: &Path) -> Result<Snapshot, StorageError> {
    let file = fs::File::open(path)?;
    let reader = BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Address;
    use crate::token::TokenLedger;

    fn storage_in(dir: &Path, max_backups: usize) -> Storage {
        let config = StorageConfig {
            data_dir: dir.to_path_buf(),
            max_backups,
            ..Default::default()
        };
        Storage::new(config).unwrap()
    }

    fn populated() -> (Snapshot, Address, Address) {
        let owner = Address::from_seed("owner");
        let signers = [Address::from_seed("addr1"), Address::from_seed("addr2")];
        let mut snapshot = Snapshot::default();

        let token = snapshot
            .tokens
            .create_token("Clown Token".into(), "CTK".into(), 18, 1_000_000, owner)
            .unwrap()
            .address;
        let wallet = snapshot.factory.create_wallet(2, &signers, owner).unwrap();
        snapshot
            .tokens
            .transfer(&token, &owner, &wallet, 500)
            .unwrap();
        snapshot
            .factory
            .wallet_mut(&wallet)
            .unwrap()
            .initiate_transfer(&owner, signers[0], 100, token)
            .unwrap();

        (snapshot, wallet, token)
    }

    #[test]
    fn test_save_load_snapshot() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = storage_in(temp_dir.path(), 5);
        let (snapshot, wallet, token) = populated();

        storage.save(&snapshot).unwrap();
        assert!(storage.exists());

        let mut loaded = storage.load().unwrap();
        assert_eq!(loaded.factory.counter(), 1);
        assert_eq!(loaded.factory.get_clone(1), Ok(wallet));
        assert_eq!(loaded.tokens.balance_of(&token, &wallet), Ok(500));

        // Pending proposal survives and can still be approved
        let signer = Address::from_seed("addr1");
        let restored = loaded.factory.wallet_mut(&wallet).unwrap();
        assert_eq!(restored.tx_counter(), 1);
        assert_eq!(restored.transaction(1).unwrap().approval_count(), 1);
        restored.approve(&signer, 1, &mut loaded.tokens).unwrap();
        assert_eq!(loaded.tokens.balance_of(&token, &signer), Ok(100));
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = storage_in(temp_dir.path(), 5);

        assert!(!storage.exists());
        assert!(matches!(storage.load(), Err(StorageError::InvalidData(_))));
    }

    #[test]
    fn test_backup_rotation() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = storage_in(temp_dir.path(), 3);
        let mut snapshot = Snapshot::default();
        let owner = Address::from_seed("owner");

        for i in 0..5u128 {
            snapshot
                .tokens
                .create_token(format!("Token {}", i), "TKN".into(), 0, i + 1, owner)
                .unwrap();
            storage.save(&snapshot).unwrap();
        }

        assert_eq!(storage.list_backups(), vec![0, 1, 2]);

        // Most recent backup holds the state before the last save
        assert_eq!(storage.load().unwrap().tokens.count(), 5);
        assert_eq!(storage.restore_backup(0).unwrap().tokens.count(), 4);
        assert_eq!(storage.restore_backup(2).unwrap().tokens.count(), 2);
        assert!(matches!(
            storage.restore_backup(3),
            Err(StorageError::InvalidData(_))
        ));
    }

    #[test]
    fn test_delete() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = storage_in(temp_dir.path(), 5);

        storage.save(&Snapshot::default()).unwrap();
        assert!(storage.exists());
        storage.delete().unwrap();
        assert!(!storage.exists());
        storage.delete().unwrap();
    }

    #[test]
    fn test_corrupt_state_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = storage_in(temp_dir.path(), 5);
        fs::write(storage.state_path(), "{ not json").unwrap();

        assert!(matches!(
            storage.load(),
            Err(StorageError::SerializationError(_))
        ));
    }
}
