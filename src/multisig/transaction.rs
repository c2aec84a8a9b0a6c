//! Proposals awaiting approval from wallet signers
//!
//! One proposal type covers value movement and self-governance; what runs on
//! completion is decided by its [`Action`].

use crate::core::Address;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Discriminant of an [`Action`]
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ProposalKind {
    Transfer,
    Withdraw,
    UpdateQuorum,
    UpdateSigners,
    DeleteSigner,
}

impl fmt::Display for ProposalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProposalKind::Transfer => "transfer",
            ProposalKind::Withdraw => "withdraw",
            ProposalKind::UpdateQuorum => "update-quorum",
            ProposalKind::UpdateSigners => "add-signer",
            ProposalKind::DeleteSigner => "delete-signer",
        };
        f.write_str(name)
    }
}

/// What a proposal does once it collects quorum
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Pay `amount` of `token` from the wallet to `recipient`
    Transfer {
        recipient: Address,
        token: Address,
        amount: u128,
    },
    /// Pay `amount` of `token` from the wallet to the signer who asked for it
    Withdraw {
        recipient: Address,
        token: Address,
        amount: u128,
    },
    /// Replace the wallet quorum
    UpdateQuorum { new_quorum: u32 },
    /// Add a signer
    UpdateSigners { signer: Address },
    /// Remove a signer
    DeleteSigner { signer: Address },
}

impl Action {
    pub fn kind(&self) -> ProposalKind {
        match self {
            Action::Transfer { .. } => ProposalKind::Transfer,
            Action::Withdraw { .. } => ProposalKind::Withdraw,
            Action::UpdateQuorum { .. } => ProposalKind::UpdateQuorum,
            Action::UpdateSigners { .. } => ProposalKind::UpdateSigners,
            Action::DeleteSigner { .. } => ProposalKind::DeleteSigner,
        }
    }
}

/// Result of a successful approve call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApprovalStatus {
    /// Approval recorded, quorum not reached yet
    Pending { approvals: u32, quorum: u32 },
    /// Approval reached quorum and the action ran
    Executed,
}

/// A proposal in a wallet's append-only ledger
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Proposal {
    /// 1-based id, unique within the wallet
    pub id: u64,
    /// Action run on completion
    pub action: Action,
    /// Signer who initiated the proposal
    pub proposer: Address,
    /// Account funds leave from on record: the wallet for withdrawals,
    /// otherwise the proposer
    pub sender: Address,
    /// Signers that approved, the proposer included
    approvals: BTreeSet<Address>,
    /// Cached `approvals.len()`
    approval_count: u32,
    /// Set once the action has run; terminal
    completed: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Execution timestamp
    pub executed_at: Option<DateTime<Utc>>,
}

impl Proposal {
    /// Create a proposal; initiating counts as the proposer's approval
    pub fn new(id: u64, action: Action, proposer: Address, sender: Address) -> Self {
        let mut approvals = BTreeSet::new();
        approvals.insert(proposer);

        Self {
            id,
            action,
            proposer,
            sender,
            approvals,
            approval_count: 1,
            completed: false,
            created_at: Utc::now(),
            executed_at: None,
        }
    }

    pub fn kind(&self) -> ProposalKind {
        self.action.kind()
    }

    /// Transfer recipient, withdrawing signer, the wallet itself for quorum
    /// updates, or the signer being added/removed
    pub fn target(&self, wallet: &Address) -> Address {
        match &self.action {
            Action::Transfer { recipient, .. } | Action::Withdraw { recipient, .. } => *recipient,
            Action::UpdateQuorum { .. } => *wallet,
            Action::UpdateSigners { signer } | Action::DeleteSigner { signer } => *signer,
        }
    }

    /// Token involved; `None` for governance proposals
    pub fn asset(&self) -> Option<Address> {
        match &self.action {
            Action::Transfer { token, .. } | Action::Withdraw { token, .. } => Some(*token),
            _ => None,
        }
    }

    /// Amount moved, or the proposed quorum for quorum updates
    pub fn amount(&self) -> u128 {
        match &self.action {
            Action::Transfer { amount, .. } | Action::Withdraw { amount, .. } => *amount,
            Action::UpdateQuorum { new_quorum } => u128::from(*new_quorum),
            Action::UpdateSigners { .. } | Action::DeleteSigner { .. } => 0,
        }
    }

    pub fn approvals(&self) -> &BTreeSet<Address> {
        &self.approvals
    }

    pub fn approval_count(&self) -> u32 {
        self.approval_count
    }

    pub fn has_approved(&self, signer: &Address) -> bool {
        self.approvals.contains(signer)
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Record an approval; returns the new count
    ///
    /// Callers check for duplicates and completion first.
    pub(crate) fn record_approval(&mut self, signer: Address) -> u32 {
        if self.approvals.insert(signer) {
            self.approval_count += 1;
        }
        self.approval_count
    }

    pub(crate) fn mark_completed(&mut self) {
        self.completed = true;
        self.executed_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wallet() -> Address {
        Address::from_seed("wallet")
    }

    #[test]
    fn test_new_proposal_counts_proposer() {
        let proposer = Address::from_seed("owner");
        let proposal = Proposal::new(
            1,
            Action::UpdateQuorum { new_quorum: 4 },
            proposer,
            proposer,
        );

        assert_eq!(proposal.approval_count(), 1);
        assert!(proposal.has_approved(&proposer));
        assert!(!proposal.is_completed());
        assert!(proposal.executed_at.is_none());
    }

    #[test]
    fn test_flattened_fields() {
        let proposer = Address::from_seed("owner");
        let recipient = Address::from_seed("s1");
        let token = Address::from_seed("token");

        let transfer = Proposal::new(
            1,
            Action::Transfer {
                recipient,
                token,
                amount: 100,
            },
            proposer,
            proposer,
        );
        assert_eq!(transfer.kind(), ProposalKind::Transfer);
        assert_eq!(transfer.target(&wallet()), recipient);
        assert_eq!(transfer.asset(), Some(token));
        assert_eq!(transfer.amount(), 100);

        let quorum = Proposal::new(2, Action::UpdateQuorum { new_quorum: 4 }, proposer, proposer);
        assert_eq!(quorum.target(&wallet()), wallet());
        assert_eq!(quorum.asset(), None);
        assert_eq!(quorum.amount(), 4);

        let removal = Proposal::new(3, Action::DeleteSigner { signer: recipient }, proposer, proposer);
        assert_eq!(removal.target(&wallet()), recipient);
        assert_eq!(removal.amount(), 0);
    }

    #[test]
    fn test_record_approval_ignores_repeats() {
        let proposer = Address::from_seed("owner");
        let signer = Address::from_seed("s1");
        let mut proposal = Proposal::new(
            1,
            Action::UpdateSigners {
                signer: Address::from_seed("new"),
            },
            proposer,
            proposer,
        );

        assert_eq!(proposal.record_approval(signer), 2);
        assert_eq!(proposal.record_approval(signer), 2);
        assert_eq!(proposal.approvals().len(), 2);
    }

    #[test]
    fn test_action_serializes_with_kind_tag() {
        let action = Action::UpdateQuorum { new_quorum: 3 };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["update_quorum"]["new_quorum"], 3);
    }
}
