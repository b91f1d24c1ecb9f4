use crate::utils;
use mars_minter_sdk::constants::RECONCILE_TIMEOUT;
use mars_minter_sdk::near::{NetworkEnv, WhitelistStore};
use mars_minter_sdk::reconcile::reconcile_batch;
use std::collections::BTreeMap;

pub(super) async fn process(
    env: NetworkEnv,
    rpc_url: Option<&str>,
    wl_json_path: &str,
    config_path: &str,
) -> anyhow::Result<()> {
    let (_, config) = utils::load_config(config_path)?;
    let allowances: BTreeMap<String, u64> =
        serde_json::from_str(&utils::read_expanded(wl_json_path)?)?;
    let desired: Vec<(String, u64)> = allowances.into_iter().collect();

    let client = utils::client_for(env, rpc_url, &config.wallet_authority);
    let store = WhitelistStore::new(&client, &config.wallet_authority);

    println!("Reconciling {} whitelist entries", desired.len());
    let spinner = utils::spinner("waiting for the batch to settle".to_string());
    let reports = reconcile_batch(&store, desired, RECONCILE_TIMEOUT).await;
    spinner.finish_and_clear();

    let failed = utils::report_outcomes(&reports);
    println!("Done: {} ok, {} failed", reports.len() - failed, failed);
    Ok(())
}
