use crate::constants::IPFS_GATEWAY_SUFFIX;
use crate::error::Error;
use crate::near::near_to_yocto;
use bytes::Bytes;
use chrono::DateTime;
use reqwest::multipart::Part;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub type MinterResult<T> = Result<T, Error>;

/// The launch configuration file, camelCase on disk. Fields this tool does
/// not interpret are preserved through `extra` so the write-back after an
/// upload does not drop them.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionConfig {
    pub wallet_authority: String,
    pub collection_name: String,
    pub symbol: String,
    pub description: String,
    pub size: u64,
    pub cost_in_near: serde_json::Number,
    pub premint_start_date: String,
    pub public_mint_start_date: String,
    pub initials_payout: BTreeMap<String, u32>,
    pub royalties_payout: BTreeMap<String, u32>,
    pub royalties_percent: u32,
    /// Content address of the uploaded asset directory, written back by
    /// the upload step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipfs_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nft_storage_api_key: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One token's metadata record. Extra fields are permitted.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NftMetadata {
    pub title: String,
    pub description: String,
    pub attributes: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Serialize)]
pub struct RoyaltyArgs {
    pub accounts: BTreeMap<String, u32>,
    pub percent: u32,
}

/// Payload for the contract's one-shot `new_default_meta` initializer.
#[derive(Clone, Debug, Serialize)]
pub struct InitArgs {
    pub owner_id: String,
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub description: String,
    pub size: u64,
    pub base_cost: String,
    pub min_cost: String,
    pub premint_start_epoch: i64,
    pub mint_start_epoch: i64,
    pub royalties: RoyaltyArgs,
    pub initial_royalties: RoyaltyArgs,
}

impl InitArgs {
    /// Derive the initializer payload from a validated config. Costs are
    /// scaled to yoctoNEAR strings, start dates to unix epochs, and the
    /// base URI is built from the uploaded content address.
    pub fn from_config(config: &CollectionConfig) -> MinterResult<Self> {
        let cid = config
            .ipfs_link
            .as_deref()
            .filter(|cid| !cid.is_empty())
            .ok_or(Error::MissingContentAddress)?;
        let cost = near_to_yocto(&config.cost_in_near.to_string())?;
        Ok(Self {
            owner_id: config.wallet_authority.clone(),
            name: config.collection_name.clone(),
            symbol: config.symbol.clone(),
            uri: format!("https://{}{}/", cid, IPFS_GATEWAY_SUFFIX),
            description: config.description.clone(),
            size: config.size,
            base_cost: cost.to_string(),
            min_cost: cost.to_string(),
            premint_start_epoch: parse_start_date(&config.premint_start_date)?,
            mint_start_epoch: parse_start_date(&config.public_mint_start_date)?,
            royalties: RoyaltyArgs {
                accounts: config.royalties_payout.clone(),
                percent: config.royalties_percent,
            },
            initial_royalties: RoyaltyArgs {
                accounts: config.initials_payout.clone(),
                percent: 100,
            },
        })
    }
}

fn parse_start_date(raw: &str) -> MinterResult<i64> {
    Ok(DateTime::parse_from_rfc3339(raw)?.timestamp())
}

/// On-disk or in-memory contents of one upload part.
#[derive(Clone, Debug)]
pub enum Payload {
    File(PathBuf),
    Bytes(Bytes),
}

/// A file name paired with its [`Payload`], the unit handed to the upload
/// client.
#[derive(Clone, Debug)]
pub struct AssetFile {
    pub name: String,
    pub data: Payload,
}

impl AssetFile {
    pub fn file<T: AsRef<Path>>(name: String, path: T) -> Self {
        Self {
            name,
            data: Payload::File(path.as_ref().to_owned()),
        }
    }

    pub fn bytes<T: Into<Bytes>>(name: String, data: T) -> Self {
        Self {
            name,
            data: Payload::Bytes(data.into()),
        }
    }

    pub(crate) async fn to_form_part(&self) -> MinterResult<Part> {
        match &self.data {
            Payload::File(path) => {
                let file = tokio::fs::File::open(path).await?;
                let size = file.metadata().await?.len();
                Ok(Part::stream_with_length(file, size).file_name(self.name.clone()))
            }
            Payload::Bytes(data) => {
                let size = data.len() as u64;
                Ok(Part::stream_with_length(Bytes::clone(data), size).file_name(self.name.clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_fixture() -> CollectionConfig {
        CollectionConfig {
            wallet_authority: "minter.near".to_string(),
            collection_name: "Mars Rocks".to_string(),
            symbol: "ROCK".to_string(),
            description: "Rocks from Mars".to_string(),
            size: 3,
            cost_in_near: serde_json::Number::from_f64(2.5).unwrap(),
            premint_start_date: "2022-05-01T00:00:00Z".to_string(),
            public_mint_start_date: "2022-05-02T00:00:00Z".to_string(),
            initials_payout: BTreeMap::from([("a.near".to_string(), 60), ("b.near".to_string(), 40)]),
            royalties_payout: BTreeMap::from([("a.near".to_string(), 100)]),
            royalties_percent: 5,
            ipfs_link: Some("bafybeigdyrzt".to_string()),
            nft_storage_api_key: None,
            extra: Map::new(),
        }
    }

    #[test]
    fn init_args_are_derived_from_config() {
        let args = InitArgs::from_config(&config_fixture()).unwrap();
        assert_eq!(args.owner_id, "minter.near");
        assert_eq!(args.uri, "https://bafybeigdyrzt.ipfs.dweb.link/");
        assert_eq!(args.base_cost, "2500000000000000000000000");
        assert_eq!(args.min_cost, args.base_cost);
        assert_eq!(args.premint_start_epoch, 1651363200);
        assert_eq!(args.mint_start_epoch, 1651449600);
        assert_eq!(args.royalties.percent, 5);
        assert_eq!(args.initial_royalties.percent, 100);
    }

    #[test]
    fn init_args_require_a_content_address() {
        let mut config = config_fixture();
        config.ipfs_link = None;
        assert!(matches!(
            InitArgs::from_config(&config),
            Err(Error::MissingContentAddress)
        ));
    }

    #[test]
    fn config_round_trip_preserves_unknown_fields() {
        let raw = serde_json::json!({
            "walletAuthority": "minter.near",
            "collectionName": "Mars Rocks",
            "symbol": "ROCK",
            "description": "Rocks from Mars",
            "size": 3,
            "costInNear": 1,
            "premintStartDate": "2022-05-01T00:00:00Z",
            "publicMintStartDate": "2022-05-02T00:00:00Z",
            "initialsPayout": { "a.near": 100 },
            "royaltiesPayout": { "a.near": 100 },
            "royaltiesPercent": 5,
            "twitter": "@marsrocks",
        });
        let config: CollectionConfig = serde_json::from_value(raw).unwrap();
        assert_eq!(config.extra["twitter"], "@marsrocks");
        let written = serde_json::to_value(&config).unwrap();
        assert_eq!(written["twitter"], "@marsrocks");
        assert!(written.get("ipfsLink").is_none());
    }
}
