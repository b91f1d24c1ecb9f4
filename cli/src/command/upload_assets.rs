use crate::utils;
use anyhow::anyhow;
use mars_minter_sdk::fs::LocalFs;
use mars_minter_sdk::upload::{collect_asset_files, StorageClient};

pub(super) async fn process(directory: &str, config_path: &str) -> anyhow::Result<()> {
    println!("\n === Uploading assets ===");
    let base_dir = utils::expanded_path(directory);
    let (_, mut config) = utils::load_config(config_path)?;
    let api_key = config
        .nft_storage_api_key
        .clone()
        .ok_or_else(|| anyhow!("config is missing nftStorageApiKey"))?;

    let files = collect_asset_files(&LocalFs, &base_dir).await?;
    let spinner = utils::spinner(format!("uploading {} files", files.len()));
    let cid = StorageClient::new(api_key).upload_directory(files).await?;
    spinner.finish_and_clear();

    config.ipfs_link = Some(cid.clone());
    let rendered = serde_json::to_string_pretty(&config)?;
    std::fs::write(utils::expanded_path(config_path), rendered)?;
    println!("\n === Finished upload & saved content address {} ===\n", cid);
    Ok(())
}
