//! Fungible token held and moved by multisig wallets
//!
//! A deliberately small ERC-20 style ledger: fixed supply credited to the
//! creator, balances per address and plain transfers.

use crate::core::Address;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Number of transfer events kept per token
pub const MAX_TRANSFER_HISTORY: usize = 100;

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: u128, need: u128 },
    #[error("Invalid amount: amount must be greater than 0")]
    InvalidAmount,
    #[error("Token not found: {0}")]
    TokenNotFound(Address),
    #[error("Token already exists: {0}")]
    TokenAlreadyExists(Address),
    #[error("Invalid address: cannot transfer to self")]
    SelfTransfer,
    #[error("Invalid symbol: must be 1-10 characters")]
    InvalidSymbol,
    #[error("Invalid name: must be 1-50 characters")]
    InvalidName,
    #[error("Invalid decimals: must be 0-18")]
    InvalidDecimals,
    #[error("Invalid supply: must be greater than 0")]
    InvalidSupply,
}

/// Token metadata (immutable after creation)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TokenMetadata {
    /// Token name (e.g., "Clown Token")
    pub name: String,
    /// Token symbol (e.g., "CTK")
    pub symbol: String,
    /// Decimal places
    pub decimals: u8,
    /// Total supply (fixed at creation)
    pub total_supply: u128,
    /// Creator address, receives the whole supply
    pub creator: Address,
    /// Timestamp when created
    pub created_at: DateTime<Utc>,
}

impl TokenMetadata {
    /// Create new token metadata with validation
    pub fn new(
        name: String,
        symbol: String,
        decimals: u8,
        total_supply: u128,
        creator: Address,
    ) -> Result<Self, TokenError> {
        if name.is_empty() || name.chars().count() > 50 {
            return Err(TokenError::InvalidName);
        }

        if symbol.is_empty() || symbol.chars().count() > 10 {
            return Err(TokenError::InvalidSymbol);
        }

        if decimals > 18 {
            return Err(TokenError::InvalidDecimals);
        }

        if total_supply == 0 {
            return Err(TokenError::InvalidSupply);
        }

        Ok(Self {
            name,
            symbol,
            decimals,
            total_supply,
            creator,
            created_at: Utc::now(),
        })
    }
}

/// Transfer event (recorded when tokens move)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TransferEvent {
    pub token: Address,
    pub from: Address,
    pub to: Address,
    pub amount: u128,
    pub timestamp: DateTime<Utc>,
}

/// A fungible token
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Token {
    /// Unique token address
    pub address: Address,
    /// Token metadata
    pub metadata: TokenMetadata,
    /// Balances: holder -> amount
    balances: HashMap<Address, u128>,
    /// Most recent transfers, oldest first
    pub transfer_history: Vec<TransferEvent>,
}

impl Token {
    /// Create a new token with all supply allocated to the creator
    pub fn new(address: Address, metadata: TokenMetadata) -> Self {
        let mut balances = HashMap::new();
        balances.insert(metadata.creator, metadata.total_supply);

        Self {
            address,
            metadata,
            balances,
            transfer_history: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn symbol(&self) -> &str {
        &self.metadata.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.metadata.decimals
    }

    pub fn total_supply(&self) -> u128 {
        self.metadata.total_supply
    }

    /// Get balance of an address
    pub fn balance_of(&self, holder: &Address) -> u128 {
        self.balances.get(holder).copied().unwrap_or(0)
    }

    /// Number of addresses holding a non-zero balance
    pub fn holder_count(&self) -> usize {
        self.balances.values().filter(|&&b| b > 0).count()
    }

    /// Move `amount` from `from` to `to`
    ///
    /// Balances are only touched once every check has passed.
    pub fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<TransferEvent, TokenError> {
        if amount == 0 {
            return Err(TokenError::InvalidAmount);
        }

        if from == to {
            return Err(TokenError::SelfTransfer);
        }

        let from_balance = self.balance_of(from);
        if from_balance < amount {
            return Err(TokenError::InsufficientBalance {
                have: from_balance,
                need: amount,
            });
        }

        // Supply is fixed, so the recipient side cannot overflow
        self.balances.insert(*from, from_balance - amount);
        *self.balances.entry(*to).or_insert(0) += amount;

        let event = TransferEvent {
            token: self.address,
            from: *from,
            to: *to,
            amount,
            timestamp: Utc::now(),
        };

        self.transfer_history.push(event.clone());
        if self.transfer_history.len() > MAX_TRANSFER_HISTORY {
            self.transfer_history.remove(0);
        }

        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_token() -> Token {
        let metadata = TokenMetadata::new(
            "Test Token".to_string(),
            "TST".to_string(),
            18,
            1_000_000,
            Address::from_seed("creator"),
        )
        .unwrap();

        Token::new(Address::from_seed("token"), metadata)
    }

    #[test]
    fn test_token_creation() {
        let token = create_test_token();

        assert_eq!(token.name(), "Test Token");
        assert_eq!(token.symbol(), "TST");
        assert_eq!(token.decimals(), 18);
        assert_eq!(token.total_supply(), 1_000_000);
        assert_eq!(token.balance_of(&Address::from_seed("creator")), 1_000_000);
        assert_eq!(token.holder_count(), 1);
    }

    #[test]
    fn test_metadata_validation() {
        let creator = Address::from_seed("c");

        assert!(matches!(
            TokenMetadata::new("".to_string(), "TST".to_string(), 18, 1000, creator),
            Err(TokenError::InvalidName)
        ));
        assert!(matches!(
            TokenMetadata::new("Test".to_string(), "TOOLONGSYMBOL".to_string(), 18, 1000, creator),
            Err(TokenError::InvalidSymbol)
        ));
        assert!(matches!(
            TokenMetadata::new("Test".to_string(), "TST".to_string(), 19, 1000, creator),
            Err(TokenError::InvalidDecimals)
        ));
        assert!(matches!(
            TokenMetadata::new("Test".to_string(), "TST".to_string(), 18, 0, creator),
            Err(TokenError::InvalidSupply)
        ));
    }

    #[test]
    fn test_transfer() {
        let mut token = create_test_token();
        let creator = Address::from_seed("creator");
        let recipient = Address::from_seed("recipient");

        let event = token.transfer(&creator, &recipient, 1000).unwrap();

        assert_eq!(event.from, creator);
        assert_eq!(event.to, recipient);
        assert_eq!(event.amount, 1000);
        assert_eq!(token.balance_of(&creator), 999_000);
        assert_eq!(token.balance_of(&recipient), 1000);
        assert_eq!(token.holder_count(), 2);
        assert_eq!(token.transfer_history.len(), 1);
    }

    #[test]
    fn test_failed_transfer_leaves_balances() {
        let mut token = create_test_token();
        let creator = Address::from_seed("creator");
        let recipient = Address::from_seed("recipient");

        let result = token.transfer(&creator, &recipient, 2_000_000);
        assert_eq!(
            result,
            Err(TokenError::InsufficientBalance {
                have: 1_000_000,
                need: 2_000_000
            })
        );
        assert_eq!(token.balance_of(&creator), 1_000_000);
        assert_eq!(token.balance_of(&recipient), 0);
        assert!(token.transfer_history.is_empty());

        assert_eq!(token.transfer(&creator, &recipient, 0), Err(TokenError::InvalidAmount));
        assert_eq!(token.transfer(&creator, &creator, 10), Err(TokenError::SelfTransfer));
    }

    #[test]
    fn test_history_is_bounded() {
        let mut token = create_test_token();
        let creator = Address::from_seed("creator");
        let recipient = Address::from_seed("recipient");

        for _ in 0..(MAX_TRANSFER_HISTORY + 5) {
            token.transfer(&creator, &recipient, 1).unwrap();
        }

        assert_eq!(token.transfer_history.len(), MAX_TRANSFER_HISTORY);
        assert_eq!(
            token.balance_of(&recipient),
            (MAX_TRANSFER_HISTORY + 5) as u128
        );
    }
}
