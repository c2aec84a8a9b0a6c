//! Multi-signature wallet engine
//!
//! A wallet holds token balances and a signer set. Nothing changes until a
//! proposal collects `quorum` distinct approvals; the approval that reaches
//! quorum runs the proposal's action in the same call. The quorum and the
//! signer set are themselves changed through proposals.

use crate::core::Address;
use crate::multisig::transaction::{Action, ApprovalStatus, Proposal};
use crate::token::{TokenError, TokenLedger};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Smallest quorum a wallet may run with
pub const MIN_QUORUM: u32 = 2;

/// Errors related to multisig operations
///
/// Every error leaves the wallet exactly as it was before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MultisigError {
    #[error("Not a valid signer: {0}")]
    NotAValidSigner(Address),
    #[error("Zero value not allowed")]
    ZeroValueNotAllowed,
    #[error("Zero address not allowed")]
    ZeroAddressNotAllowed,
    #[error("Quorum too small: {0}, minimum is {}", MIN_QUORUM)]
    QuorumTooSmall(u32),
    #[error("Quorum {quorum} cannot be more than {signers} valid signers")]
    QuorumCannotBeMoreThanValidSigners { quorum: u32, signers: u32 },
    #[error("Already a valid signer: {0}")]
    AlreadyAValidSigner(Address),
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(u64),
    #[error("Signer {0} cannot sign transaction twice")]
    CantSignTransactionTwice(Address),
    #[error("Transaction already completed: {0}")]
    TransactionAlreadyCompleted(u64),
    #[error("Execution failed: {0}")]
    ExecutionFailed(#[from] TokenError),
    #[error("Clone not found: {0}")]
    CloneNotFound(u64),
}

/// Quorum and signer set of one wallet
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WalletConfig {
    /// Approvals required to execute a proposal
    quorum: u32,
    /// Addresses allowed to initiate and approve
    signers: BTreeSet<Address>,
    /// Maintained alongside `signers`
    signer_count: u32,
}

impl WalletConfig {
    /// Create a configuration from `signers` plus `owner`
    ///
    /// Duplicate addresses (including the owner appearing in `signers`)
    /// collapse into one signer.
    pub fn new(quorum: u32, signers: &[Address], owner: Address) -> Result<Self, MultisigError> {
        if owner.is_zero() || signers.iter().any(Address::is_zero) {
            return Err(MultisigError::ZeroAddressNotAllowed);
        }

        let mut set: BTreeSet<Address> = signers.iter().copied().collect();
        set.insert(owner);
        let signer_count = set.len() as u32;

        Self::validate_quorum(quorum, signer_count)?;

        Ok(Self {
            quorum,
            signers: set,
            signer_count,
        })
    }

    pub fn quorum(&self) -> u32 {
        self.quorum
    }

    pub fn signer_count(&self) -> u32 {
        self.signer_count
    }

    pub fn is_signer(&self, address: &Address) -> bool {
        self.signers.contains(address)
    }

    /// Signers in address order
    pub fn signers(&self) -> impl Iterator<Item = &Address> {
        self.signers.iter()
    }

    /// Description like "3-of-5"
    pub fn description(&self) -> String {
        format!("{}-of-{}", self.quorum, self.signer_count)
    }

    fn validate_quorum(quorum: u32, signer_count: u32) -> Result<(), MultisigError> {
        if quorum == 0 {
            return Err(MultisigError::ZeroValueNotAllowed);
        }
        if quorum < MIN_QUORUM {
            return Err(MultisigError::QuorumTooSmall(quorum));
        }
        if quorum > signer_count {
            return Err(MultisigError::QuorumCannotBeMoreThanValidSigners {
                quorum,
                signers: signer_count,
            });
        }
        Ok(())
    }

    fn ensure_can_add(&self, signer: &Address) -> Result<(), MultisigError> {
        if signer.is_zero() {
            return Err(MultisigError::ZeroAddressNotAllowed);
        }
        if self.is_signer(signer) {
            return Err(MultisigError::AlreadyAValidSigner(*signer));
        }
        Ok(())
    }

    fn ensure_can_remove(&self, signer: &Address) -> Result<(), MultisigError> {
        if !self.is_signer(signer) {
            return Err(MultisigError::NotAValidSigner(*signer));
        }
        let remaining = self.signer_count - 1;
        if remaining < self.quorum {
            return Err(MultisigError::QuorumCannotBeMoreThanValidSigners {
                quorum: self.quorum,
                signers: remaining,
            });
        }
        Ok(())
    }

    fn set_quorum(&mut self, quorum: u32) -> Result<(), MultisigError> {
        Self::validate_quorum(quorum, self.signer_count)?;
        self.quorum = quorum;
        Ok(())
    }

    fn add_signer(&mut self, signer: Address) -> Result<(), MultisigError> {
        self.ensure_can_add(&signer)?;
        self.signers.insert(signer);
        self.signer_count += 1;
        Ok(())
    }

    fn remove_signer(&mut self, signer: &Address) -> Result<(), MultisigError> {
        self.ensure_can_remove(signer)?;
        self.signers.remove(signer);
        self.signer_count -= 1;
        Ok(())
    }
}

/// A multi-signature wallet instance
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MultisigWallet {
    /// Address the wallet holds balances under
    address: Address,
    /// Quorum and signers
    config: WalletConfig,
    /// Proposal ledger by id, append-only
    transactions: BTreeMap<u64, Proposal>,
    /// Id of the latest proposal, 0 when none exist
    tx_counter: u64,
    /// Creation timestamp
    created_at: DateTime<Utc>,
}

impl MultisigWallet {
    /// Create a wallet at `address` with `signers ∪ {owner}`
    pub fn new(
        address: Address,
        quorum: u32,
        signers: &[Address],
        owner: Address,
    ) -> Result<Self, MultisigError> {
        if address.is_zero() {
            return Err(MultisigError::ZeroAddressNotAllowed);
        }

        let config = WalletConfig::new(quorum, signers, owner)?;

        log::info!(
            "Multisig wallet {} created ({})",
            address,
            config.description()
        );

        Ok(Self {
            address,
            config,
            transactions: BTreeMap::new(),
            tx_counter: 0,
            created_at: Utc::now(),
        })
    }

    // =========================================================================
    // Read accessors
    // =========================================================================

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    pub fn quorum(&self) -> u32 {
        self.config.quorum
    }

    pub fn no_of_valid_signers(&self) -> u32 {
        self.config.signer_count
    }

    pub fn valid_signers(&self, address: &Address) -> bool {
        self.config.is_signer(address)
    }

    /// All signers in address order
    pub fn signers(&self) -> Vec<Address> {
        self.config.signers().copied().collect()
    }

    /// Id of the latest proposal
    pub fn tx_counter(&self) -> u64 {
        self.tx_counter
    }

    pub fn transaction(&self, id: u64) -> Option<&Proposal> {
        self.transactions.get(&id)
    }

    /// All proposals in id order
    pub fn transactions(&self) -> impl Iterator<Item = &Proposal> {
        self.transactions.values()
    }

    /// Proposals still collecting approvals
    pub fn pending_transactions(&self) -> impl Iterator<Item = &Proposal> {
        self.transactions.values().filter(|p| !p.is_completed())
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Wallet balance of `token`
    pub fn token_balance<L>(&self, ledger: &L, token: &Address) -> Result<u128, MultisigError>
    where
        L: TokenLedger + ?Sized,
    {
        Ok(ledger.balance_of(token, &self.address)?)
    }

    // =========================================================================
    // Initiation
    // =========================================================================

    /// Propose paying `amount` of `token` to `recipient`
    pub fn initiate_transfer(
        &mut self,
        caller: &Address,
        recipient: Address,
        amount: u128,
        token: Address,
    ) -> Result<u64, MultisigError> {
        self.ensure_signer(caller)?;
        if amount == 0 {
            return Err(MultisigError::ZeroValueNotAllowed);
        }
        if recipient.is_zero() || token.is_zero() {
            return Err(MultisigError::ZeroAddressNotAllowed);
        }

        let action = Action::Transfer {
            recipient,
            token,
            amount,
        };
        Ok(self.push_proposal(action, *caller, *caller))
    }

    /// Propose paying `amount` of `token` from the wallet to the caller
    pub fn initiate_withdraw(
        &mut self,
        caller: &Address,
        amount: u128,
        token: Address,
    ) -> Result<u64, MultisigError> {
        self.ensure_signer(caller)?;
        if amount == 0 {
            return Err(MultisigError::ZeroValueNotAllowed);
        }
        if token.is_zero() {
            return Err(MultisigError::ZeroAddressNotAllowed);
        }

        let action = Action::Withdraw {
            recipient: *caller,
            token,
            amount,
        };
        let sender = self.address;
        Ok(self.push_proposal(action, *caller, sender))
    }

    /// Propose a new quorum
    pub fn initiate_update_quorum(
        &mut self,
        caller: &Address,
        new_quorum: u32,
    ) -> Result<u64, MultisigError> {
        self.ensure_signer(caller)?;
        WalletConfig::validate_quorum(new_quorum, self.config.signer_count)?;

        Ok(self.push_proposal(Action::UpdateQuorum { new_quorum }, *caller, *caller))
    }

    /// Propose adding `new_signer`
    pub fn initiate_update_valid_signers(
        &mut self,
        caller: &Address,
        new_signer: Address,
    ) -> Result<u64, MultisigError> {
        self.ensure_signer(caller)?;
        self.config.ensure_can_add(&new_signer)?;

        Ok(self.push_proposal(
            Action::UpdateSigners { signer: new_signer },
            *caller,
            *caller,
        ))
    }

    /// Propose removing `signer`
    pub fn initiate_delete_signer(
        &mut self,
        caller: &Address,
        signer: Address,
    ) -> Result<u64, MultisigError> {
        self.ensure_signer(caller)?;
        self.config.ensure_can_remove(&signer)?;

        Ok(self.push_proposal(Action::DeleteSigner { signer }, *caller, *caller))
    }

    // =========================================================================
    // Approval
    // =========================================================================

    /// Approve proposal `id` as `caller`
    ///
    /// If this approval brings the proposal to the wallet's current quorum,
    /// its action runs against `ledger` before anything is recorded. When the
    /// action fails the call returns the error and the approval is dropped, so
    /// the same signer can retry later.
    pub fn approve<L>(
        &mut self,
        caller: &Address,
        id: u64,
        ledger: &mut L,
    ) -> Result<ApprovalStatus, MultisigError>
    where
        L: TokenLedger + ?Sized,
    {
        self.ensure_signer(caller)?;

        let proposal = self
            .transactions
            .get_mut(&id)
            .ok_or(MultisigError::InvalidTransaction(id))?;

        if proposal.is_completed() {
            return Err(MultisigError::TransactionAlreadyCompleted(id));
        }
        if proposal.has_approved(caller) {
            return Err(MultisigError::CantSignTransactionTwice(*caller));
        }

        // Quorum is read at approval time: a completed quorum update applies
        // to proposals created before it
        let quorum = self.config.quorum;
        let approvals = proposal.approval_count() + 1;

        if approvals < quorum {
            proposal.record_approval(*caller);
            log::debug!(
                "Proposal {} approved by {} ({}/{})",
                id,
                caller.short(),
                approvals,
                quorum
            );
            return Ok(ApprovalStatus::Pending { approvals, quorum });
        }

        if let Err(err) = Self::execute(&mut self.config, &self.address, &proposal.action, ledger)
        {
            log::warn!(
                "Proposal {} reached quorum but failed to execute: {}",
                id,
                err
            );
            return Err(err);
        }

        proposal.record_approval(*caller);
        proposal.mark_completed();

        log::info!(
            "Proposal {} ({}) executed on wallet {} with {} approvals",
            id,
            proposal.kind(),
            self.address.short(),
            approvals
        );

        Ok(ApprovalStatus::Executed)
    }

    fn ensure_signer(&self, caller: &Address) -> Result<(), MultisigError> {
        if !self.config.is_signer(caller) {
            return Err(MultisigError::NotAValidSigner(*caller));
        }
        Ok(())
    }

    fn push_proposal(&mut self, action: Action, proposer: Address, sender: Address) -> u64 {
        self.tx_counter += 1;
        let id = self.tx_counter;

        log::info!(
            "Proposal {} ({}) initiated on wallet {} by {}",
            id,
            action.kind(),
            self.address.short(),
            proposer.short()
        );

        self.transactions
            .insert(id, Proposal::new(id, action, proposer, sender));
        id
    }

    /// Run an action; on error nothing has changed
    fn execute<L>(
        config: &mut WalletConfig,
        wallet: &Address,
        action: &Action,
        ledger: &mut L,
    ) -> Result<(), MultisigError>
    where
        L: TokenLedger + ?Sized,
    {
        match action {
            Action::Transfer {
                recipient,
                token,
                amount,
            }
            | Action::Withdraw {
                recipient,
                token,
                amount,
            } => {
                ledger.transfer(token, wallet, recipient, *amount)?;
            }
            Action::UpdateQuorum { new_quorum } => config.set_quorum(*new_quorum)?,
            Action::UpdateSigners { signer } => config.add_signer(*signer)?,
            Action::DeleteSigner { signer } => config.remove_signer(signer)?,
        }
        Ok(())
    }
}
