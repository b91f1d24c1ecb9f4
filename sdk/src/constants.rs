use std::time::Duration;

/// HTTP endpoint of the content-addressed storage service used for
/// directory uploads.
pub const STORAGE_UPLOAD_ENDPOINT: &str = "https://api.nft.storage";

/// Gateway suffix used to build the collection base URI from a CID.
pub const IPFS_GATEWAY_SUFFIX: &str = ".ipfs.dweb.link";

/// Code hash the RPC reports for an account with no deployed contract.
pub const EMPTY_CODE_HASH: &str = "11111111111111111111111111111111";

/// Gas attached to whitelist and media-URI function calls (30 TGas).
pub const DEFAULT_FUNCTION_CALL_GAS: u64 = 30_000_000_000_000;

/// One NEAR is 10^24 yoctoNEAR.
pub const YOCTO_DECIMALS: usize = 24;

/// Contract initializer invoked together with the deploy action.
pub const INIT_METHOD: &str = "new_default_meta";

/// Upper bound on a single key's read-write-reread cycle.
pub const RECONCILE_TIMEOUT: Duration = Duration::from_secs(60);

pub const IMAGES_SUBDIR: &str = "images";
pub const METADATA_SUBDIR: &str = "jsons";
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg"];
pub const METADATA_EXTENSION: &str = "json";

pub const TESTNET_RPC_URL: &str = "https://rpc.testnet.near.org";
pub const MAINNET_RPC_URL: &str = "https://rpc.mainnet.near.org";
