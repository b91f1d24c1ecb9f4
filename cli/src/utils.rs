use indicatif::ProgressBar;
use mars_minter_sdk::models::CollectionConfig;
use mars_minter_sdk::near::{NearCli, NetworkEnv};
use mars_minter_sdk::reconcile::{Outcome, Report};
use serde_json::Value;
use std::fmt::Display;
use std::path::PathBuf;
use std::time::Duration;

/// Expand `~` in a user-supplied path.
pub fn expanded_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

pub fn read_expanded(path: &str) -> anyhow::Result<String> {
    Ok(std::fs::read_to_string(expanded_path(path))?)
}

/// Load the launch config both as a raw value (for schema validation) and
/// in its typed form.
pub fn load_config(path: &str) -> anyhow::Result<(Value, CollectionConfig)> {
    let raw: Value = serde_json::from_str(&read_expanded(path)?)?;
    let config: CollectionConfig = serde_json::from_value(raw.clone())?;
    Ok((raw, config))
}

pub fn client_for(env: NetworkEnv, rpc_url: Option<&str>, signer_id: &str) -> NearCli {
    let client = NearCli::new(env, signer_id);
    match rpc_url {
        Some(url) => client.with_rpc_url(url),
        None => client,
    }
}

pub fn spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

/// Print one line per reconciliation report and return the failure count.
/// Per-key failures never fail the invoking command.
pub fn report_outcomes<K: Display>(reports: &[Report<K>]) -> usize {
    let mut failed = 0;
    for report in reports {
        match &report.outcome {
            Outcome::Unchanged => println!("  {} unchanged", report.key),
            Outcome::Confirmed => println!("  {} updated ✔", report.key),
            Outcome::Failed(error) => {
                failed += 1;
                println!("  {} FAILED: {}", report.key, error);
            }
            Outcome::TimedOut => {
                failed += 1;
                println!("  {} FAILED: timed out", report.key);
            }
        }
    }
    failed
}
