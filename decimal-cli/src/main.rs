//! Decimal CLI - wallet operations on Decimal chain from the command line.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand};
use decimal_sdk::wallet::{DEFAULT_WORD_COUNT, is_valid_address};
use decimal_sdk::{Account, ChainConfig, DecimalClient, DerivationMode, generate_wallet};
use serde_json::json;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Decimal CLI - wallet for Decimal chain
#[derive(Parser, Debug)]
#[command(name = "decimal")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// JSON-RPC endpoint (overrides the configured list)
    #[arg(long, global = true, env = "DECIMAL_RPC_URL")]
    rpc_url: Option<String>,

    /// Path to a JSON chain configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Mnemonic and derivation options shared by signing commands.
#[derive(ClapArgs, Debug)]
pub struct KeyArgs {
    /// BIP39 mnemonic of the sending wallet
    #[arg(long, env = "DECIMAL_MNEMONIC", hide_env_values = true)]
    mnemonic: String,

    /// BIP39 passphrase
    #[arg(long, env = "DECIMAL_PASSPHRASE", hide_env_values = true)]
    passphrase: Option<String>,

    /// Derive with BIP44 m/44'/60'/0'/0/<index> instead of the legacy scheme
    #[arg(long)]
    bip44_index: Option<u32>,
}

impl KeyArgs {
    fn derivation(&self) -> DerivationMode {
        self.bip44_index
            .map_or_else(DerivationMode::default, |index| DerivationMode::Bip44 {
                index,
            })
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the address derived from a mnemonic
    Address(KeyArgs),
    /// Generate a new wallet
    NewWallet {
        /// Number of mnemonic words
        #[arg(long, default_value_t = DEFAULT_WORD_COUNT)]
        words: usize,
        /// Derive with BIP44 m/44'/60'/0'/0/<index> instead of the legacy scheme
        #[arg(long)]
        bip44_index: Option<u32>,
    },
    /// Native coin balance of an address
    Balance {
        /// Address to query
        address: String,
    },
    /// Token balance of an address
    TokenBalance {
        /// Token symbol in the registry
        symbol: String,
        /// Address to query
        address: String,
    },
    /// Send native coin
    Send {
        #[command(flatten)]
        key: KeyArgs,
        /// Recipient address
        to: String,
        /// Amount, e.g. 1.5
        amount: String,
        /// Message attached to the transaction
        #[arg(long)]
        message: Option<String>,
    },
    /// Send a token by registry symbol
    SendToken {
        #[command(flatten)]
        key: KeyArgs,
        /// Token symbol in the registry
        symbol: String,
        /// Recipient address
        to: String,
        /// Amount, e.g. 1.5
        amount: String,
    },
    /// Pay a prize in native coin (with a note) or a token
    Prize {
        #[command(flatten)]
        key: KeyArgs,
        /// Winner address
        winner: String,
        /// Coin symbol; the native symbol sends native coin
        coin: String,
        /// Amount, e.g. 1.5
        amount: String,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("decimal_sdk=debug,decimal=debug")
    } else {
        EnvFilter::new("decimal_sdk=warn,decimal=info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_config(args: &Args) -> anyhow::Result<ChainConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            ChainConfig::from_json(&json)?
        }
        None => ChainConfig::default(),
    };
    if let Some(url) = &args.rpc_url {
        config = config.with_rpc_url(url.clone());
    }
    config.validate()?;
    debug!(chain_id = config.chain_id, urls = ?config.rpc_urls, "configuration loaded");
    Ok(config)
}

async fn connect(args: &Args) -> anyhow::Result<DecimalClient> {
    let config = load_config(args)?;
    DecimalClient::connect(config)
        .await
        .context("no rpc endpoint reachable")
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(args: Args) -> anyhow::Result<()> {
    match &args.command {
        Command::Address(key) => {
            let mut builder = Account::builder()
                .mnemonic(key.mnemonic.as_str())
                .derivation(key.derivation());
            if let Some(passphrase) = &key.passphrase {
                builder = builder.passphrase(passphrase.as_str());
            }
            let account = builder.build()?;
            print_json(&json!({
                "address": account.address_string(),
                "public_key": account.public_key().to_hex(),
            }))
        }
        Command::NewWallet { words, bip44_index } => {
            let mode = bip44_index
                .map_or_else(DerivationMode::default, |index| DerivationMode::Bip44 {
                    index,
                });
            print_json(&generate_wallet(*words, &mode)?)
        }
        Command::Balance { address } => {
            anyhow::ensure!(is_valid_address(address), "invalid address: {address}");
            let client = connect(&args).await?;
            print_json(&client.native_balance(address).await?)
        }
        Command::TokenBalance { symbol, address } => {
            let client = connect(&args).await?;
            print_json(&client.token_balance_by_symbol(symbol, address).await?)
        }
        Command::Send {
            key,
            to,
            amount,
            message,
        } => {
            let client = connect(&args).await?.with_derivation(key.derivation());
            let outcome = client
                .send_native(&key.mnemonic, to, amount, message.as_deref())
                .await?;
            print_json(&outcome)
        }
        Command::SendToken {
            key,
            symbol,
            to,
            amount,
        } => {
            let client = connect(&args).await?.with_derivation(key.derivation());
            let outcome = client
                .send_token_by_symbol(&key.mnemonic, symbol, to, amount)
                .await?;
            print_json(&outcome)
        }
        Command::Prize {
            key,
            winner,
            coin,
            amount,
        } => {
            let client = connect(&args).await?.with_derivation(key.derivation());
            let outcome = client
                .send_prize(&key.mnemonic, winner, coin, amount)
                .await?;
            print_json(&outcome)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);
    run(args).await
}
