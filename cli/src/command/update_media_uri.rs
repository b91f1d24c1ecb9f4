use crate::utils;
use mars_minter_sdk::constants::RECONCILE_TIMEOUT;
use mars_minter_sdk::near::{MediaUriStore, NetworkEnv};
use mars_minter_sdk::reconcile::reconcile_batch;

pub(super) async fn process(
    env: NetworkEnv,
    rpc_url: Option<&str>,
    media_uri_json_path: &str,
    config_path: &str,
) -> anyhow::Result<()> {
    let (_, config) = utils::load_config(config_path)?;
    let uris: Vec<String> = serde_json::from_str(&utils::read_expanded(media_uri_json_path)?)?;
    if uris.len() as u64 != config.size {
        anyhow::bail!(
            "media URI list has {} entries but the configured collection size is {}",
            uris.len(),
            config.size
        );
    }
    // Token ids are the array indices.
    let desired: Vec<(String, String)> = uris
        .into_iter()
        .enumerate()
        .map(|(index, uri)| (index.to_string(), uri))
        .collect();

    let client = utils::client_for(env, rpc_url, &config.wallet_authority);
    let store = MediaUriStore::new(&client, &config.wallet_authority);

    println!("Reconciling {} media URIs", desired.len());
    let spinner = utils::spinner("waiting for the batch to settle".to_string());
    let reports = reconcile_batch(&store, desired, RECONCILE_TIMEOUT).await;
    spinner.finish_and_clear();

    let failed = utils::report_outcomes(&reports);
    println!("Done: {} ok, {} failed", reports.len() - failed, failed);
    Ok(())
}
