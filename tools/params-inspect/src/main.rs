//! CLI inspector for Dankcoin chain parameters
//!
//! Resolves a network from the command line flags, builds and verifies every
//! parameter set, selects the requested one and prints what was asked for.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use dank_params::{ChainParams, ChainParamsRegistry, Hash256, NetworkSelection};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "params-inspect")]
#[command(about = "Dankcoin chain parameter inspector", long_about = None)]
struct Cli {
    #[command(flatten)]
    network: NetworkFlags,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct NetworkFlags {
    /// Use the public test network
    #[arg(long, global = true)]
    testnet: bool,

    /// Use the local regression test network
    #[arg(long, global = true)]
    regtest: bool,

    /// Use the in-process unit test network
    #[arg(long, global = true)]
    unittest: bool,
}

impl From<&NetworkFlags> for NetworkSelection {
    fn from(flags: &NetworkFlags) -> Self {
        NetworkSelection {
            testnet: flags.testnet,
            regtest: flags.regtest,
            unittest: flags.unittest,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the selected network's parameters
    Show {
        /// Dump the full parameter set as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the genesis block and confirm it verified
    Genesis,

    /// Look up or check a checkpoint
    Checkpoint {
        /// Block height
        #[arg(long)]
        height: u32,

        /// Block hash to check against the checkpoint at this height
        #[arg(long)]
        hash: Option<String>,
    },

    /// Estimate verification progress at a height
    Progress {
        /// Block height
        #[arg(long)]
        height: u32,

        /// Unix time to estimate at (defaults to now)
        #[arg(long)]
        now: Option<i64>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let registry = ChainParamsRegistry::new().context("building chain parameters")?;
    let network = registry
        .select_from(&NetworkSelection::from(&cli.network))
        .context("resolving network flags")?;
    let params = registry.active()?;
    info!("Active network: {}", network);

    match cli.command {
        Commands::Show { json } => show(&params, json)?,
        Commands::Genesis => show_genesis(&params),
        Commands::Checkpoint { height, hash } => check_checkpoint(&params, height, hash.as_deref())?,
        Commands::Progress { height, now } => {
            let now = now.unwrap_or_else(|| chrono::Utc::now().timestamp());
            show_progress(&params, height, now);
        }
    }

    Ok(())
}

fn show(params: &ChainParams, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", params.to_json_pretty()?);
        return Ok(());
    }

    println!("network:            {}", params.network_name());
    println!("message start:      {}", hex::encode(params.message_start));
    println!("default port:       {}", params.default_port);
    println!("pow limit:          {}", params.pow_limit);
    println!("halving interval:   {}", params.subsidy_halving_interval);
    println!(
        "majority:           {}/{}/{}",
        params.majority.enforce_block_upgrade,
        params.majority.reject_block_outdated,
        params.majority.to_check_block_upgrade
    );
    println!("retarget interval:  {} blocks", params.difficulty_adjustment_interval());
    match params.enforce_v2_after_height {
        Some(height) => println!("v2 enforced after:  {}", height),
        None => println!("v2 enforced after:  supermajority"),
    }
    println!("genesis:            {}", params.genesis_hash());
    println!("checkpoints:        {}", params.checkpoints.len());
    println!("dns seeds:          {}", params.dns_seeds.len());
    for seed in &params.dns_seeds {
        println!("  {} ({})", seed.host, seed.name);
    }
    println!("fixed seeds:        {}", params.fixed_seeds.len());
    Ok(())
}

fn show_genesis(params: &ChainParams) {
    let header = params.genesis.header();
    println!("hash:        {}", params.genesis_hash());
    println!("merkle root: {}", params.genesis.merkle_root());
    println!("version:     {}", header.version);
    println!("time:        {}", header.time);
    println!("bits:        {:#010x}", header.bits);
    println!("nonce:       {}", header.nonce);
    println!("coinbase:    {}", params.genesis.coinbase().txid());
    info!("✅ Genesis block verified");
}

fn check_checkpoint(params: &ChainParams, height: u32, hash: Option<&str>) -> anyhow::Result<()> {
    match hash {
        Some(hash) => {
            let hash: Hash256 = hash.parse()?;
            if params.checkpoints.check_block(height, &hash) {
                info!("✅ Block {} at height {} passes checkpoints", hash, height);
            } else {
                warn!("❌ Block {} conflicts with the checkpoint at height {}", hash, height);
                anyhow::bail!("checkpoint mismatch at height {}", height);
            }
        }
        None => match params.checkpoint_at(height) {
            Some(hash) => println!("{}", hash),
            None => {
                let last = params.checkpoints.last_checkpoint(|_| true);
                match last {
                    Some((last_height, _)) => {
                        println!("no checkpoint at height {} (last checkpoint: {})", height, last_height)
                    }
                    None => println!("no checkpoints"),
                }
            }
        },
    }
    Ok(())
}

fn show_progress(params: &ChainParams, height: u32, now: i64) {
    let progress = params.estimate_progress(height, now);
    println!("{:.2}%", progress * 100.0);
}
