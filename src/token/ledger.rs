//! Boundary between wallets and whatever keeps token balances

use crate::core::Address;
use crate::token::token::{TokenError, TransferEvent};

/// Balance and transfer operations a wallet needs from a token ledger
///
/// A failed `transfer` must leave every balance untouched; the wallet relies
/// on that to roll back the approval that triggered it.
pub trait TokenLedger {
    /// Balance of `holder` in `token`
    fn balance_of(&self, token: &Address, holder: &Address) -> Result<u128, TokenError>;

    /// Move `amount` of `token` from `from` to `to`
    fn transfer(
        &mut self,
        token: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<TransferEvent, TokenError>;
}
