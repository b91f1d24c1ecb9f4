pub mod command;
pub mod utils;

use clap::Parser;

use command::Command;

/// Flags shared by every subcommand.
#[derive(Debug, Parser)]
pub struct ConfigOverride {
    /// NEAR network to target. One of: mainnet, testnet.
    #[clap(short, long, global = true, default_value = "testnet")]
    pub env: String,
    /// Override the JSON-RPC endpoint implied by `--env`.
    #[clap(long, global = true)]
    pub rpc_url: Option<String>,
}

/// Prepare, upload, deploy, and manage an NFT collection on NEAR from the
/// command line. Signing is delegated to the `near` binary and its
/// credential store.
#[derive(Debug, Parser)]
#[clap(version)]
pub struct Opts {
    #[clap(flatten)]
    pub cfg_override: ConfigOverride,
    #[clap(subcommand)]
    pub command: Command,
}
