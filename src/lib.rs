//! Multisig wallet: quorum-approved token wallets in Rust
//!
//! This crate provides:
//! - Multi-signature wallets where every transfer, withdrawal, quorum change
//!   and signer-set change is a proposal that needs `quorum` approvals
//! - A factory that deploys independent wallets and indexes them by id
//! - A fungible token ledger the wallets hold balances in
//! - JSON persistence with backup rotation
//!
//! # Example
//!
//! ```rust
//! use multisig_wallet::core::Address;
//! use multisig_wallet::multisig::{ApprovalStatus, MultisigFactory};
//! use multisig_wallet::token::{TokenLedger, TokenManager};
//!
//! let owner = Address::from_seed("owner");
//! let alice = Address::from_seed("alice");
//! let bob = Address::from_seed("bob");
//!
//! // A token, fully held by the owner
//! let mut tokens = TokenManager::new();
//! let token = tokens
//!     .create_token("Clown Token".into(), "CTK".into(), 18, 1_000, owner)
//!     .unwrap()
//!     .address;
//!
//! // A 2-of-3 wallet funded by the owner
//! let mut factory = MultisigFactory::new();
//! let address = factory.create_wallet(2, &[alice, bob], owner).unwrap();
//! tokens.transfer(&token, &owner, &address, 500).unwrap();
//!
//! // The proposer's approval counts, so one more executes it
//! let wallet = factory.wallet_mut(&address).unwrap();
//! let id = wallet.initiate_transfer(&owner, alice, 100, token).unwrap();
//! let status = wallet.approve(&bob, id, &mut tokens).unwrap();
//!
//! assert_eq!(status, ApprovalStatus::Executed);
//! assert_eq!(tokens.balance_of(&token, &alice), Ok(100));
//! ```

pub mod cli;
pub mod core;
pub mod crypto;
pub mod multisig;
pub mod storage;
pub mod token;

// Re-export commonly used types
pub use crate::core::Address;
pub use multisig::{
    Action, ApprovalStatus, MultisigError, MultisigFactory, MultisigWallet, Proposal,
    ProposalKind, WalletConfig, MIN_QUORUM,
};
pub use storage::{Snapshot, Storage, StorageConfig};
pub use token::{Token, TokenError, TokenLedger, TokenManager, TokenMetadata};
