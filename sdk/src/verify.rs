//! Pre-flight checks on a local collection directory and its launch config.

use crate::constants::{IMAGES_SUBDIR, IMAGE_EXTENSIONS, METADATA_EXTENSION, METADATA_SUBDIR};
use crate::error::Error;
use crate::fs::AssetSource;
use crate::models::MinterResult;
use crate::schema::{self, CONFIGURATION_SCHEMA, METADATA_SCHEMA};
use rand::seq::SliceRandom;
use serde_json::{Map, Value};
use std::path::Path;

pub(crate) fn has_image_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| IMAGE_EXTENSIONS.contains(&ext))
}

fn has_metadata_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext == METADATA_EXTENSION)
}

/// Shallow sanity check of a collection directory: image and metadata
/// counts must agree with each other and with the declared collection
/// size, and one metadata file picked at random must match the metadata
/// schema.
///
/// Image and metadata filenames are not paired by identifier; count
/// equality is the extent of the audit. This is a fast spot-check, not an
/// exhaustive one.
pub async fn verify_assets(
    source: &dyn AssetSource,
    base_dir: &Path,
    expected_count: u64,
) -> MinterResult<()> {
    let metadata_dir = base_dir.join(METADATA_SUBDIR);
    let image_names = source.list_dir(&base_dir.join(IMAGES_SUBDIR)).await?;
    let metadata_names = source.list_dir(&metadata_dir).await?;

    let image_count = image_names
        .iter()
        .filter(|name| has_image_extension(name))
        .count();
    let metadata: Vec<&String> = metadata_names
        .iter()
        .filter(|name| has_metadata_extension(name))
        .collect();

    if image_count != metadata.len() {
        return Err(Error::CountMismatch(format!(
            "found {} image files but {} metadata files",
            image_count,
            metadata.len()
        )));
    }
    if image_count as u64 != expected_count {
        return Err(Error::CountMismatch(format!(
            "declared collection size is {} but found {} asset pairs",
            expected_count, image_count
        )));
    }

    // Spot-check one metadata file picked uniformly at random.
    if let Some(sample) = metadata.choose(&mut rand::thread_rng()) {
        let raw = source.read_file(&metadata_dir.join(sample.as_str())).await?;
        let value: Value = serde_json::from_slice(&raw)?;
        let validation = schema::validate(&value, &METADATA_SCHEMA);
        if !validation.is_valid() {
            return Err(Error::SchemaViolation(validation.errors));
        }
        tracing::debug!(count = image_count, sample = %sample, "asset set verified");
    }

    Ok(())
}

/// True when every entry is within [0, 100] and the entries sum to
/// exactly 100. Each rejection is logged with the offending account.
pub fn is_valid_payout(payout: &Map<String, Value>) -> bool {
    let mut total = 0.0;
    for (account, value) in payout {
        let percent = match value.as_f64() {
            Some(percent) => percent,
            None => {
                tracing::warn!(%account, "payout entry is not a number");
                return false;
            }
        };
        if !(0.0..=100.0).contains(&percent) {
            tracing::warn!(%account, percent, "payout percentage out of range");
            return false;
        }
        total += percent;
    }
    if total != 100.0 {
        tracing::warn!(total, "payout percentages must sum to exactly 100");
        return false;
    }
    true
}

/// Validate the raw config file: schema first, then both payout maps.
/// Short-circuits on the first failing class; the error carries the full
/// diagnostic for it. The config is valid as a whole or not at all.
pub fn validate_configuration_file(config: &Value) -> MinterResult<()> {
    let validation = schema::validate(config, &CONFIGURATION_SCHEMA);
    if !validation.is_valid() {
        return Err(Error::SchemaViolation(validation.errors));
    }
    for name in ["initialsPayout", "royaltiesPayout"] {
        match config.get(name).and_then(Value::as_object) {
            Some(payout) if is_valid_payout(payout) => {}
            _ => return Err(Error::PayoutInvalid(format!("issue in {}", name))),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_map(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn payout_summing_to_100_is_valid() {
        assert!(is_valid_payout(&as_map(json!({ "a.near": 60, "b.near": 40 }))));
        assert!(is_valid_payout(&as_map(json!({ "a.near": 0, "b.near": 100 }))));
    }

    #[test]
    fn payout_not_summing_to_100_is_invalid() {
        assert!(!is_valid_payout(&as_map(json!({ "a.near": 60, "b.near": 30 }))));
    }

    #[test]
    fn payout_entry_above_100_is_invalid() {
        assert!(!is_valid_payout(&as_map(json!({ "a.near": 101 }))));
    }

    #[test]
    fn payout_entry_below_zero_is_invalid() {
        assert!(!is_valid_payout(&as_map(json!({ "a.near": -1, "b.near": 101 }))));
    }

    #[test]
    fn non_numeric_payout_entry_is_invalid() {
        assert!(!is_valid_payout(&as_map(json!({ "a.near": "60" }))));
    }

    #[test]
    fn image_extension_filter() {
        assert!(has_image_extension("1.png"));
        assert!(has_image_extension("2.jpg"));
        assert!(!has_image_extension("3.gif"));
        assert!(!has_image_extension("png"));
        assert!(!has_image_extension(".DS_Store"));
    }

    #[test]
    fn configuration_file_validation_covers_both_payouts() {
        let mut config = json!({
            "walletAuthority": "minter.near",
            "collectionName": "Mars Rocks",
            "symbol": "ROCK",
            "description": "Rocks from Mars",
            "size": 3,
            "costInNear": 2.5,
            "premintStartDate": "2022-05-01T00:00:00Z",
            "publicMintStartDate": "2022-05-02T00:00:00Z",
            "initialsPayout": { "a.near": 60, "b.near": 40 },
            "royaltiesPayout": { "a.near": 100 },
            "royaltiesPercent": 5,
            "ipfsLink": "bafybeigdyrzt",
        });
        assert!(validate_configuration_file(&config).is_ok());

        config["royaltiesPayout"] = json!({ "a.near": 99 });
        match validate_configuration_file(&config) {
            Err(Error::PayoutInvalid(message)) => assert_eq!(message, "issue in royaltiesPayout"),
            other => panic!("expected PayoutInvalid, got {:?}", other),
        }

        config["initialsPayout"] = json!({ "a.near": 101 });
        match validate_configuration_file(&config) {
            Err(Error::PayoutInvalid(message)) => assert_eq!(message, "issue in initialsPayout"),
            other => panic!("expected PayoutInvalid, got {:?}", other),
        }
    }

    #[test]
    fn configuration_schema_failure_takes_precedence() {
        let config = json!({ "walletAuthority": "minter.near" });
        match validate_configuration_file(&config) {
            Err(Error::SchemaViolation(errors)) => assert!(!errors.is_empty()),
            other => panic!("expected SchemaViolation, got {:?}", other),
        }
    }
}
