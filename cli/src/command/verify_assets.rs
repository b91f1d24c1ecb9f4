use crate::utils;
use mars_minter_sdk::fs::LocalFs;
use mars_minter_sdk::verify::verify_assets;

pub(super) async fn process(directory: &str, number: u64) -> anyhow::Result<()> {
    println!("\n === Verifying assets ===");
    let base_dir = utils::expanded_path(directory);
    verify_assets(&LocalFs, &base_dir, number).await?;
    println!("\n === Verifying successful ===");
    Ok(())
}
