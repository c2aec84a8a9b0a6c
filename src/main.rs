//! Multisig wallet CLI application
//!
//! A command-line interface for deploying multisig wallets and driving
//! their proposals.

use clap::{Parser, Subcommand};
use multisig_wallet::cli::{self, AppState, ProposeRequest};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "multisig")]
#[command(version)]
#[command(about = "Multi-signature token wallets with quorum approval", long_about = None)]
struct Cli {
    /// Data directory for wallet state
    #[arg(short, long, default_value = ".multisig_data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory
    Init {
        /// Overwrite existing state
        #[arg(long)]
        force: bool,
    },

    /// Print the address derived from a seed label
    Address {
        #[arg(short, long)]
        seed: String,
    },

    /// Token operations
    Token {
        #[command(subcommand)]
        action: TokenCommands,
    },

    /// Wallet operations
    Wallet {
        #[command(subcommand)]
        action: WalletCommands,
    },

    /// Create a proposal on a wallet
    Propose {
        /// Wallet address
        #[arg(short, long)]
        wallet: String,

        /// Signer initiating the proposal (address or seed label)
        #[arg(short, long)]
        caller: String,

        #[command(subcommand)]
        action: ProposeCommands,
    },

    /// Approve a proposal
    Approve {
        /// Wallet address
        #[arg(short, long)]
        wallet: String,

        /// Approving signer (address or seed label)
        #[arg(short, long)]
        caller: String,

        /// Proposal id
        #[arg(short, long)]
        id: u64,
    },

    /// Inspect proposals
    Tx {
        #[command(subcommand)]
        action: TxCommands,
    },
}

#[derive(Subcommand)]
enum TokenCommands {
    /// Create a new token
    Create {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        symbol: String,

        #[arg(long, default_value = "18")]
        decimals: u8,

        /// Total supply, credited to the creator
        #[arg(long)]
        supply: u128,

        /// Creator account (address or seed label)
        #[arg(short, long)]
        creator: String,
    },

    /// Transfer tokens between accounts
    Transfer {
        #[arg(short, long)]
        token: String,

        #[arg(short, long)]
        from: String,

        #[arg(long)]
        to: String,

        #[arg(short, long)]
        amount: u128,
    },

    /// Show a holder's balance
    Balance {
        #[arg(short, long)]
        token: String,

        #[arg(long)]
        holder: String,
    },

    /// List all tokens
    List,
}

#[derive(Subcommand)]
enum WalletCommands {
    /// Deploy a new multisig wallet
    Create {
        /// Approvals required to execute a proposal
        #[arg(short, long)]
        quorum: u32,

        /// Signers (comma-separated)
        #[arg(short, long)]
        signers: String,

        /// Owner, added as a signer
        #[arg(short, long)]
        owner: String,
    },

    /// List all wallets
    List,

    /// Show wallet details
    Info {
        #[arg(short, long)]
        wallet: String,
    },
}

#[derive(Subcommand)]
enum ProposeCommands {
    /// Pay tokens from the wallet to a recipient
    Transfer {
        #[arg(short, long)]
        recipient: String,

        #[arg(short, long)]
        token: String,

        #[arg(short, long)]
        amount: u128,
    },

    /// Pay tokens from the wallet to the caller
    Withdraw {
        #[arg(short, long)]
        token: String,

        #[arg(short, long)]
        amount: u128,
    },

    /// Change the quorum
    Quorum {
        #[arg(short, long)]
        quorum: u32,
    },

    /// Add a signer
    AddSigner {
        #[arg(short, long)]
        signer: String,
    },

    /// Remove a signer
    RemoveSigner {
        #[arg(short, long)]
        signer: String,
    },
}

#[derive(Subcommand)]
enum TxCommands {
    /// Show one proposal
    Show {
        #[arg(short, long)]
        wallet: String,

        #[arg(short, long)]
        id: u64,
    },

    /// List proposals of a wallet
    List {
        #[arg(short, long)]
        wallet: String,

        /// Only proposals still collecting approvals
        #[arg(long)]
        pending: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Commands that don't need loaded state
    match &cli.command {
        Commands::Init { force } => return cli::cmd_init(&cli.data_dir, *force),
        Commands::Address { seed } => return cli::cmd_address(seed),
        _ => {}
    }

    let mut state = AppState::new(cli.data_dir.clone())?;

    match cli.command {
        Commands::Init { .. } | Commands::Address { .. } => unreachable!(),

        Commands::Token { action } => match action {
            TokenCommands::Create {
                name,
                symbol,
                decimals,
                supply,
                creator,
            } => {
                cli::cmd_token_create(&mut state, &name, &symbol, decimals, supply, &creator)?;
            }
            TokenCommands::Transfer {
                token,
                from,
                to,
                amount,
            } => {
                cli::cmd_token_transfer(&mut state, &token, &from, &to, amount)?;
            }
            TokenCommands::Balance { token, holder } => {
                cli::cmd_token_balance(&state, &token, &holder)?;
            }
            TokenCommands::List => {
                cli::cmd_token_list(&state)?;
            }
        },

        Commands::Wallet { action } => match action {
            WalletCommands::Create {
                quorum,
                signers,
                owner,
            } => {
                cli::cmd_wallet_create(&mut state, quorum, &signers, &owner)?;
            }
            WalletCommands::List => {
                cli::cmd_wallet_list(&state)?;
            }
            WalletCommands::Info { wallet } => {
                cli::cmd_wallet_info(&state, &wallet)?;
            }
        },

        Commands::Propose {
            wallet,
            caller,
            action,
        } => {
            let request = match action {
                ProposeCommands::Transfer {
                    recipient,
                    token,
                    amount,
                } => ProposeRequest::Transfer {
                    recipient,
                    token,
                    amount,
                },
                ProposeCommands::Withdraw { token, amount } => {
                    ProposeRequest::Withdraw { token, amount }
                }
                ProposeCommands::Quorum { quorum } => ProposeRequest::Quorum { quorum },
                ProposeCommands::AddSigner { signer } => ProposeRequest::AddSigner { signer },
                ProposeCommands::RemoveSigner { signer } => {
                    ProposeRequest::RemoveSigner { signer }
                }
            };
            cli::cmd_propose(&mut state, &wallet, &caller, request)?;
        }

        Commands::Approve { wallet, caller, id } => {
            cli::cmd_approve(&mut state, &wallet, &caller, id)?;
        }

        Commands::Tx { action } => match action {
            TxCommands::Show { wallet, id } => {
                cli::cmd_tx_show(&state, &wallet, id)?;
            }
            TxCommands::List { wallet, pending } => {
                cli::cmd_tx_list(&state, &wallet, pending)?;
            }
        },
    }

    Ok(())
}
