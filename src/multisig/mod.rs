//! Multi-signature wallets
//!
//! A [`MultisigWallet`] only moves tokens or changes its own configuration
//! after `quorum` of its signers approve a proposal. Wallets are deployed
//! through a [`MultisigFactory`].
//!
//! # Example
//!
//! ```
//! use multisig_wallet::core::Address;
//! use multisig_wallet::multisig::{ApprovalStatus, MultisigFactory};
//! use multisig_wallet::token::TokenManager;
//!
//! let owner = Address::from_seed("owner");
//! let alice = Address::from_seed("alice");
//! let bob = Address::from_seed("bob");
//!
//! let mut tokens = TokenManager::new();
//! let mut factory = MultisigFactory::new();
//! let address = factory.create_wallet(2, &[alice, bob], owner)?;
//!
//! let wallet = factory.wallet_mut(&address).unwrap();
//! let id = wallet.initiate_update_quorum(&owner, 3)?;
//! assert_eq!(wallet.approve(&alice, id, &mut tokens)?, ApprovalStatus::Executed);
//! assert_eq!(wallet.quorum(), 3);
//! # Ok::<(), multisig_wallet::multisig::MultisigError>(())
//! ```

pub mod factory;
pub mod transaction;
pub mod wallet;

pub use factory::MultisigFactory;
pub use transaction::{Action, ApprovalStatus, Proposal, ProposalKind};
pub use wallet::{MultisigError, MultisigWallet, WalletConfig, MIN_QUORUM};
