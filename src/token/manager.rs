//! Token manager for creating tokens and routing transfers
//!
//! This is the ledger multisig wallets execute against.

use crate::core::Address;
use crate::token::ledger::TokenLedger;
use crate::token::token::{Token, TokenError, TokenMetadata, TransferEvent};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Manages all tokens in the system
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TokenManager {
    /// All tokens by address
    tokens: HashMap<Address, Token>,
    /// Deployment counter for address generation
    nonce: u64,
}

impl TokenManager {
    /// Create a new token manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new token
    ///
    /// All tokens are initially allocated to the creator.
    pub fn create_token(
        &mut self,
        name: String,
        symbol: String,
        decimals: u8,
        total_supply: u128,
        creator: Address,
    ) -> Result<Token, TokenError> {
        let metadata = TokenMetadata::new(name, symbol, decimals, total_supply, creator)?;

        let address = Address::derive(&creator, self.nonce);
        if self.tokens.contains_key(&address) {
            return Err(TokenError::TokenAlreadyExists(address));
        }
        self.nonce += 1;

        let token = Token::new(address, metadata);
        self.tokens.insert(address, token.clone());

        log::info!(
            "Token created: {} ({}) at {}",
            token.name(),
            token.symbol(),
            address
        );

        Ok(token)
    }

    /// Get a token by address
    pub fn get(&self, address: &Address) -> Option<&Token> {
        self.tokens.get(address)
    }

    /// List all tokens, ordered by address
    pub fn list(&self) -> Vec<&Token> {
        let mut tokens: Vec<&Token> = self.tokens.values().collect();
        tokens.sort_by_key(|t| t.address);
        tokens
    }

    /// Get token count
    pub fn count(&self) -> usize {
        self.tokens.len()
    }

    /// Check if a token exists
    pub fn exists(&self, address: &Address) -> bool {
        self.tokens.contains_key(address)
    }

    /// Get transfer history for a token
    pub fn history(&self, token_address: &Address) -> Result<&[TransferEvent], TokenError> {
        let token = self
            .tokens
            .get(token_address)
            .ok_or(TokenError::TokenNotFound(*token_address))?;

        Ok(&token.transfer_history)
    }
}

impl TokenLedger for TokenManager {
    fn balance_of(&self, token: &Address, holder: &Address) -> Result<u128, TokenError> {
        let token = self
            .tokens
            .get(token)
            .ok_or(TokenError::TokenNotFound(*token))?;

        Ok(token.balance_of(holder))
    }

    fn transfer(
        &mut self,
        token: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<TransferEvent, TokenError> {
        let entry = self
            .tokens
            .get_mut(token)
            .ok_or(TokenError::TokenNotFound(*token))?;

        let event = entry.transfer(from, to, amount)?;
        log::debug!(
            "{} {} moved {} -> {}",
            amount,
            entry.symbol(),
            from.short(),
            to.short()
        );
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(manager: &mut TokenManager, symbol: &str, creator: Address) -> Token {
        manager
            .create_token(
                format!("{} Token", symbol),
                symbol.to_string(),
                18,
                1_000_000,
                creator,
            )
            .unwrap()
    }

    #[test]
    fn test_manager_creation() {
        let manager = TokenManager::new();
        assert_eq!(manager.count(), 0);
    }

    #[test]
    fn test_token_creation() {
        let mut manager = TokenManager::new();
        let creator = Address::from_seed("creator");

        let token = create(&mut manager, "TST", creator);

        assert_eq!(token.address, Address::derive(&creator, 0));
        assert!(manager.exists(&token.address));
        assert_eq!(manager.balance_of(&token.address, &creator).unwrap(), 1_000_000);
        assert_eq!(manager.count(), 1);
    }

    #[test]
    fn test_same_creator_gets_distinct_addresses() {
        let mut manager = TokenManager::new();
        let creator = Address::from_seed("alice");

        let first = create(&mut manager, "TK1", creator);
        let second = create(&mut manager, "TK2", creator);

        assert_ne!(first.address, second.address);
        assert_eq!(manager.list().len(), 2);
    }

    #[test]
    fn test_transfer_via_ledger() {
        let mut manager = TokenManager::new();
        let creator = Address::from_seed("creator");
        let recipient = Address::from_seed("recipient");
        let token = create(&mut manager, "TST", creator);

        manager
            .transfer(&token.address, &creator, &recipient, 1000)
            .unwrap();

        assert_eq!(manager.balance_of(&token.address, &creator).unwrap(), 999_000);
        assert_eq!(manager.balance_of(&token.address, &recipient).unwrap(), 1000);
        assert_eq!(manager.history(&token.address).unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_token() {
        let mut manager = TokenManager::new();
        let missing = Address::from_seed("missing");
        let from = Address::from_seed("from");
        let to = Address::from_seed("to");

        assert_eq!(
            manager.transfer(&missing, &from, &to, 100),
            Err(TokenError::TokenNotFound(missing))
        );
        assert_eq!(
            manager.balance_of(&missing, &from),
            Err(TokenError::TokenNotFound(missing))
        );
        assert!(manager.history(&missing).is_err());
    }
}
