use crate::utils;
use mars_minter_sdk::constants::{EMPTY_CODE_HASH, INIT_METHOD};
use mars_minter_sdk::models::InitArgs;
use mars_minter_sdk::near::{ContractClient, NetworkEnv};
use mars_minter_sdk::verify::validate_configuration_file;
use std::path::Path;

pub(super) async fn process(
    env: NetworkEnv,
    rpc_url: Option<&str>,
    config_path: &str,
    wasm: &Path,
) -> anyhow::Result<()> {
    let (raw, config) = utils::load_config(config_path)?;
    validate_configuration_file(&raw)?;
    let init_args = InitArgs::from_config(&config)?;

    let client = utils::client_for(env, rpc_url, &config.wallet_authority);
    let code_hash = client.account_code_hash(&config.wallet_authority).await?;
    if code_hash == EMPTY_CODE_HASH {
        client
            .deploy(&config.wallet_authority, wasm, INIT_METHOD, &init_args)
            .await?;
        println!("Contract is deployed 🚀");
    } else {
        println!("Contract is already deployed!!");
    }
    Ok(())
}
