//! # Mars Minter SDK
//! Building blocks for launching an NFT collection on NEAR: asset set
//! verification, config validation, content-addressed uploads, contract
//! deployment, and idempotent reconciliation of on-chain whitelist
//! allowances and per-token media URIs.
//!
//! ## Basic Usage
//!
//! ```ignore
//!    let client = NearCli::new(NetworkEnv::Testnet, "minter.near");
//!    let store = WhitelistStore::new(&client, "minter.near");
//!
//!    let reports = reconcile_batch(&store, desired, RECONCILE_TIMEOUT).await;
//! ```
//!
pub mod constants;
pub mod error;
pub mod fs;
pub mod models;
pub mod near;
pub mod reconcile;
pub mod schema;
pub mod upload;
pub mod verify;

pub use error::Error;
pub use models::MinterResult;
