use clap::Parser;
use mars_minter_sdk::near::NetworkEnv;
use std::path::PathBuf;

mod deploy_contract;
mod update_media_uri;
mod upload_assets;
mod verify_assets;
mod whitelist;

#[derive(Debug, Parser)]
pub enum Command {
    /// Check that the images and metadata directories form a complete,
    /// well-formed collection of the declared size.
    #[clap(name = "verify_assets")]
    VerifyAssets {
        /// Path of the folder containing assets
        #[clap(short, long)]
        directory: String,
        /// Number of assets
        #[clap(short, long)]
        number: u64,
    },

    /// Upload the images and metadata as one flat directory and save the
    /// resulting content address into the config file.
    #[clap(name = "upload_assets")]
    UploadAssets {
        /// Path of the folder containing assets
        #[clap(short, long)]
        directory: String,
        /// Path of the config file
        #[clap(short, long)]
        config: String,
    },

    /// Deploy the contract and initialize it from the values present in
    /// the config file. Does nothing if the account already has code.
    #[clap(name = "deploy_contract")]
    DeployContract {
        /// Path of the config file
        #[clap(short, long)]
        config: String,
        /// Path of the contract wasm to deploy
        #[clap(long, default_value = "./programs/mars-minter.wasm")]
        wasm: PathBuf,
    },

    /// Converge on-chain whitelist allowances toward the provided JSON
    /// map of account id to allowance.
    #[clap(name = "whitelist")]
    Whitelist {
        /// Path of the json file containing addresses with allocation
        #[clap(long = "wl-json")]
        wl_json: String,
        /// Path of the config file
        #[clap(short, long)]
        config: String,
    },

    /// Converge per-token media URIs toward the provided JSON array,
    /// indexed by token id.
    #[clap(name = "update_media_uri")]
    UpdateMediaUri {
        /// Path of the json file containing media URIs
        #[clap(long = "media-uri-json")]
        media_uri_json: String,
        /// Path of the config file
        #[clap(short, long)]
        config: String,
    },
}

impl Command {
    pub async fn process(&self, env: NetworkEnv, rpc_url: Option<&str>) -> anyhow::Result<()> {
        match self {
            Command::VerifyAssets { directory, number } => {
                verify_assets::process(directory, *number).await
            }
            Command::UploadAssets { directory, config } => {
                upload_assets::process(directory, config).await
            }
            Command::DeployContract { config, wasm } => {
                deploy_contract::process(env, rpc_url, config, wasm).await
            }
            Command::Whitelist { wl_json, config } => {
                whitelist::process(env, rpc_url, wl_json, config).await
            }
            Command::UpdateMediaUri {
                media_uri_json,
                config,
            } => update_media_uri::process(env, rpc_url, media_uri_json, config).await,
        }
    }
}
