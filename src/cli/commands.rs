//! CLI commands for the multisig wallet
//!
//! Implements all command handlers for the CLI interface. Accounts are
//! given either as `0x`-prefixed addresses or as seed labels, which are
//! turned into addresses with [`Address::from_seed`].

use crate::core::Address;
use crate::multisig::{ApprovalStatus, MultisigWallet, Proposal};
use crate::storage::{Snapshot, Storage, StorageConfig};
use crate::token::TokenLedger;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Application state
pub struct AppState {
    pub snapshot: Snapshot,
    pub storage: Storage,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Load saved state, or start from an empty one
    pub fn new(data_dir: PathBuf) -> CliResult<Self> {
        let storage = Storage::new(StorageConfig {
            data_dir: data_dir.clone(),
            ..Default::default()
        })?;

        let snapshot = if storage.exists() {
            storage.load()?
        } else {
            println!("🆕 No saved state, starting fresh...");
            let snapshot = Snapshot::default();
            storage.save(&snapshot)?;
            snapshot
        };

        Ok(Self {
            snapshot,
            storage,
            data_dir,
        })
    }

    /// Save the current state
    pub fn save(&self) -> CliResult<()> {
        self.storage.save(&self.snapshot)?;
        Ok(())
    }

    fn wallet(&self, address: &Address) -> CliResult<&MultisigWallet> {
        self.snapshot
            .factory
            .wallet(address)
            .ok_or_else(|| format!("Wallet not found: {}", address).into())
    }
}

/// Parse an account argument: `0x...` is an address, anything else a seed label
pub fn parse_account(input: &str) -> CliResult<Address> {
    let input = input.trim();
    if input.starts_with("0x") || input.starts_with("0X") {
        Ok(Address::from_str(input)?)
    } else if input.is_empty() {
        Err("Empty account".into())
    } else {
        Ok(Address::from_seed(input))
    }
}

/// Parse a comma-separated account list
pub fn parse_accounts(input: &str) -> CliResult<Vec<Address>> {
    input
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(parse_account)
        .collect()
}

/// Initialize the data directory
pub fn cmd_init(data_dir: &Path, force: bool) -> CliResult<()> {
    let storage = Storage::new(StorageConfig {
        data_dir: data_dir.to_path_buf(),
        ..Default::default()
    })?;

    if storage.exists() && !force {
        println!("⚠️  State already exists at {:?}", data_dir);
        println!("   Use --force to reinitialize (this will delete existing data)");
        return Ok(());
    }

    let snapshot = Snapshot::default();
    storage.save(&snapshot)?;

    println!("✅ Multisig state initialized!");
    println!("   📁 Data directory: {:?}", data_dir);
    println!("   🏭 Factory: {}", snapshot.factory.address());

    Ok(())
}

/// Print the address derived from a seed label
pub fn cmd_address(seed: &str) -> CliResult<()> {
    println!("{}", Address::from_seed(seed));
    Ok(())
}

// =============================================================================
// Tokens
// =============================================================================

/// Create a token, crediting the whole supply to `creator`
pub fn cmd_token_create(
    state: &mut AppState,
    name: &str,
    symbol: &str,
    decimals: u8,
    supply: u128,
    creator: &str,
) -> CliResult<Address> {
    let creator = parse_account(creator)?;
    let token = state.snapshot.tokens.create_token(
        name.to_string(),
        symbol.to_string(),
        decimals,
        supply,
        creator,
    )?;
    state.save()?;

    println!("🪙 Token created!");
    println!("   📍 Address: {}", token.address);
    println!("   🏷️  {} ({})", token.name(), token.symbol());
    println!("   💰 Supply: {} to {}", token.total_supply(), creator);

    Ok(token.address)
}

/// Move tokens directly between two accounts
pub fn cmd_token_transfer(
    state: &mut AppState,
    token: &str,
    from: &str,
    to: &str,
    amount: u128,
) -> CliResult<()> {
    let token = parse_account(token)?;
    let from = parse_account(from)?;
    let to = parse_account(to)?;

    state.snapshot.tokens.transfer(&token, &from, &to, amount)?;
    state.save()?;

    println!("📤 Transferred {} from {} to {}", amount, from, to);
    Ok(())
}

/// Show a holder's balance of a token
pub fn cmd_token_balance(state: &AppState, token: &str, holder: &str) -> CliResult<u128> {
    let token = parse_account(token)?;
    let holder = parse_account(holder)?;
    let balance = state.snapshot.tokens.balance_of(&token, &holder)?;

    println!("💰 Balance of {}: {}", holder, balance);
    Ok(balance)
}

/// List all tokens
pub fn cmd_token_list(state: &AppState) -> CliResult<()> {
    let tokens = state.snapshot.tokens.list();

    if tokens.is_empty() {
        println!("📭 No tokens found. Create one with: multisig token create");
        return Ok(());
    }

    println!("🪙 Tokens:");
    for token in tokens {
        println!(
            "   {} {} ({}) | supply {} | {} holders",
            token.address,
            token.name(),
            token.symbol(),
            token.total_supply(),
            token.holder_count()
        );
    }

    Ok(())
}

// =============================================================================
// Wallets
// =============================================================================

/// Deploy a wallet through the factory
pub fn cmd_wallet_create(
    state: &mut AppState,
    quorum: u32,
    signers: &str,
    owner: &str,
) -> CliResult<Address> {
    let signers = parse_accounts(signers)?;
    let owner = parse_account(owner)?;

    let address = state
        .snapshot
        .factory
        .create_wallet(quorum, &signers, owner)?;
    state.save()?;

    let wallet = state.wallet(&address)?;
    println!("🔐 Multisig wallet created!");
    println!("   🆔 Clone id: {}", state.snapshot.factory.counter());
    println!("   📍 Address: {}", address);
    println!("   🔧 Config: {}", wallet.config().description());

    Ok(address)
}

/// List wallets in creation order
pub fn cmd_wallet_list(state: &AppState) -> CliResult<()> {
    let clones = state.snapshot.factory.clones();

    if clones.is_empty() {
        println!("📭 No wallets found. Create one with: multisig wallet create");
        return Ok(());
    }

    println!("📋 Wallets:");
    for (i, address) in clones.iter().enumerate() {
        let wallet = state.wallet(address)?;
        println!(
            "   #{} {} ({}) - {} proposals",
            i + 1,
            address,
            wallet.config().description(),
            wallet.tx_counter()
        );
    }

    Ok(())
}

/// Show a wallet's configuration and balances
pub fn cmd_wallet_info(state: &AppState, wallet: &str) -> CliResult<()> {
    let address = parse_account(wallet)?;
    let wallet = state.wallet(&address)?;

    println!("🔐 Wallet {}", address);
    println!("   ├─ Quorum: {}", wallet.quorum());
    println!("   ├─ Signers: {}", wallet.no_of_valid_signers());
    for signer in wallet.signers() {
        println!("   │  └─ {}", signer);
    }
    println!("   ├─ Proposals: {}", wallet.tx_counter());
    println!(
        "   ├─ Pending: {}",
        wallet.pending_transactions().count()
    );
    println!("   └─ Balances:");
    for token in state.snapshot.tokens.list() {
        let balance = wallet.token_balance(&state.snapshot.tokens, &token.address)?;
        if balance > 0 {
            println!("      └─ {} {}", balance, token.symbol());
        }
    }

    Ok(())
}

// =============================================================================
// Proposals
// =============================================================================

/// What a `propose` command asks for
#[derive(Debug, Clone)]
pub enum ProposeRequest {
    Transfer {
        recipient: String,
        token: String,
        amount: u128,
    },
    Withdraw {
        token: String,
        amount: u128,
    },
    Quorum {
        quorum: u32,
    },
    AddSigner {
        signer: String,
    },
    RemoveSigner {
        signer: String,
    },
}

/// Initiate a proposal on a wallet
pub fn cmd_propose(
    state: &mut AppState,
    wallet: &str,
    caller: &str,
    request: ProposeRequest,
) -> CliResult<u64> {
    let address = parse_account(wallet)?;
    let caller = parse_account(caller)?;
    let wallet = state
        .snapshot
        .factory
        .wallet_mut(&address)
        .ok_or_else(|| format!("Wallet not found: {}", address))?;

    let id = match request {
        ProposeRequest::Transfer {
            recipient,
            token,
            amount,
        } => wallet.initiate_transfer(
            &caller,
            parse_account(&recipient)?,
            amount,
            parse_account(&token)?,
        )?,
        ProposeRequest::Withdraw { token, amount } => {
            wallet.initiate_withdraw(&caller, amount, parse_account(&token)?)?
        }
        ProposeRequest::Quorum { quorum } => wallet.initiate_update_quorum(&caller, quorum)?,
        ProposeRequest::AddSigner { signer } => {
            wallet.initiate_update_valid_signers(&caller, parse_account(&signer)?)?
        }
        ProposeRequest::RemoveSigner { signer } => {
            wallet.initiate_delete_signer(&caller, parse_account(&signer)?)?
        }
    };

    let quorum = wallet.quorum();
    state.save()?;

    println!("📝 Proposal {} created", id);
    println!("   Approvals: 1/{} (proposer counted)", quorum);

    Ok(id)
}

/// Approve a proposal, executing it once quorum is reached
pub fn cmd_approve(
    state: &mut AppState,
    wallet: &str,
    caller: &str,
    id: u64,
) -> CliResult<ApprovalStatus> {
    let address = parse_account(wallet)?;
    let caller = parse_account(caller)?;
    let snapshot = &mut state.snapshot;
    let wallet = snapshot
        .factory
        .wallet_mut(&address)
        .ok_or_else(|| format!("Wallet not found: {}", address))?;

    let status = wallet.approve(&caller, id, &mut snapshot.tokens)?;
    state.save()?;

    match status {
        ApprovalStatus::Pending { approvals, quorum } => {
            println!("✍️  Proposal {} approved ({}/{})", id, approvals, quorum);
        }
        ApprovalStatus::Executed => {
            println!("✅ Proposal {} reached quorum and was executed", id);
        }
    }

    Ok(status)
}

fn print_proposal(proposal: &Proposal, wallet: &Address) {
    let status = if proposal.is_completed() {
        "executed"
    } else {
        "pending"
    };

    println!("📄 Proposal {} ({}, {})", proposal.id, proposal.kind(), status);
    println!("   ├─ Proposer: {}", proposal.proposer);
    println!("   ├─ Sender: {}", proposal.sender);
    println!("   ├─ Target: {}", proposal.target(wallet));
    if let Some(asset) = proposal.asset() {
        println!("   ├─ Token: {}", asset);
    }
    println!("   ├─ Amount: {}", proposal.amount());
    println!("   ├─ Approvals: {}", proposal.approval_count());
    for signer in proposal.approvals() {
        println!("   │  └─ {}", signer);
    }
    println!(
        "   └─ Created: {}",
        proposal.created_at.format("%Y-%m-%d %H:%M:%S")
    );
}

/// Show one proposal
pub fn cmd_tx_show(state: &AppState, wallet: &str, id: u64) -> CliResult<()> {
    let address = parse_account(wallet)?;
    let proposal = state
        .wallet(&address)?
        .transaction(id)
        .ok_or_else(|| format!("Proposal {} not found", id))?;

    print_proposal(proposal, &address);
    Ok(())
}

/// List proposals, optionally only the pending ones
pub fn cmd_tx_list(state: &AppState, wallet: &str, pending_only: bool) -> CliResult<()> {
    let address = parse_account(wallet)?;
    let wallet = state.wallet(&address)?;

    let proposals: Vec<&Proposal> = if pending_only {
        wallet.pending_transactions().collect()
    } else {
        wallet.transactions().collect()
    };

    if proposals.is_empty() {
        println!("📭 No proposals");
        return Ok(());
    }

    println!("📋 Proposals (quorum {}):", wallet.quorum());
    for p in proposals {
        println!(
            "   #{} {} | {} approvals | {}",
            p.id,
            p.kind(),
            p.approval_count(),
            if p.is_completed() { "executed" } else { "pending" }
        );
    }

    Ok(())
}
