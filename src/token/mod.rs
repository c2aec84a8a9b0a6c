//! Fungible token ledger
//!
//! Wallets hold balances here and move them when a transfer or withdrawal
//! proposal reaches quorum. The wallet only sees the [`TokenLedger`] trait.
//!
//! # Example
//!
//! ```
//! use multisig_wallet::core::Address;
//! use multisig_wallet::token::{TokenLedger, TokenManager};
//!
//! let mut tokens = TokenManager::new();
//! let creator = Address::from_seed("creator");
//! let token = tokens
//!     .create_token("Clown Token".to_string(), "CTK".to_string(), 18, 1_000_000, creator)
//!     .unwrap();
//!
//! let wallet = Address::from_seed("wallet");
//! tokens.transfer(&token.address, &creator, &wallet, 1000).unwrap();
//! assert_eq!(tokens.balance_of(&token.address, &wallet).unwrap(), 1000);
//! ```

pub mod ledger;
pub mod manager;
pub mod token;

pub use ledger::TokenLedger;
pub use manager::TokenManager;
pub use token::{Token, TokenError, TokenMetadata, TransferEvent, MAX_TRANSFER_HISTORY};
