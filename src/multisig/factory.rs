//! Wallet factory
//!
//! Deploys independent [`MultisigWallet`] instances and keeps a registry of
//! them by sequential id, starting at 1.

use crate::core::Address;
use crate::multisig::wallet::{MultisigError, MultisigWallet};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Creates wallets and tracks them by clone id
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MultisigFactory {
    /// Address wallet addresses are derived from
    address: Address,
    /// Clone id -> wallet address
    registry: BTreeMap<u64, Address>,
    /// Created wallets by address
    wallets: HashMap<Address, MultisigWallet>,
    /// Number of wallets created, also the highest valid id
    counter: u64,
}

impl Default for MultisigFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl MultisigFactory {
    pub fn new() -> Self {
        Self::with_address(Address::from_seed("multisig-factory"))
    }

    pub fn with_address(address: Address) -> Self {
        Self {
            address,
            registry: BTreeMap::new(),
            wallets: HashMap::new(),
            counter: 0,
        }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Deploy a wallet for `signers ∪ {owner}` and register it
    ///
    /// The counter only moves when construction succeeds.
    pub fn create_wallet(
        &mut self,
        quorum: u32,
        signers: &[Address],
        owner: Address,
    ) -> Result<Address, MultisigError> {
        let id = self.counter + 1;
        let address = Address::derive(&self.address, id);
        let wallet = MultisigWallet::new(address, quorum, signers, owner)?;

        self.counter = id;
        self.registry.insert(id, address);
        self.wallets.insert(address, wallet);

        log::info!("Clone {} deployed at {}", id, address);

        Ok(address)
    }

    /// Address of clone `id`
    pub fn get_clone(&self, id: u64) -> Result<Address, MultisigError> {
        self.registry
            .get(&id)
            .copied()
            .ok_or(MultisigError::CloneNotFound(id))
    }

    pub fn counter(&self) -> u64 {
        self.counter
    }

    /// All clone addresses in id order
    pub fn clones(&self) -> Vec<Address> {
        self.registry.values().copied().collect()
    }

    pub fn wallet(&self, address: &Address) -> Option<&MultisigWallet> {
        self.wallets.get(address)
    }

    pub fn wallet_mut(&mut self, address: &Address) -> Option<&mut MultisigWallet> {
        self.wallets.get_mut(address)
    }
}
