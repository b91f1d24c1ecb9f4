use clap::Parser;
use mars_minter_cli::Opts;
use mars_minter_sdk::near::NetworkEnv;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let opts = Opts::parse();
    let env = NetworkEnv::from_str(&opts.cfg_override.env)?;
    tracing::debug!(%env, "network selected");

    opts.command
        .process(env, opts.cfg_override.rpc_url.as_deref())
        .await
}
