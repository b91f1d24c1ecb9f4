//! NEAR access: JSON-RPC for reads, the `near` command-line binary (and
//! its credential store) for signed writes and deployment.

use crate::constants::{DEFAULT_FUNCTION_CALL_GAS, MAINNET_RPC_URL, TESTNET_RPC_URL, YOCTO_DECIMALS};
use crate::error::Error;
use crate::models::{InitArgs, MinterResult};
use crate::reconcile::RemoteStore;
use async_trait::async_trait;
use base64::Engine as _;
use serde::Deserialize;
use serde_json::{json, Value};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tokio::process::Command;

/// Target NEAR network.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NetworkEnv {
    Testnet,
    Mainnet,
}

impl NetworkEnv {
    pub fn name(&self) -> &'static str {
        match self {
            NetworkEnv::Testnet => "testnet",
            NetworkEnv::Mainnet => "mainnet",
        }
    }

    pub fn rpc_url(&self) -> &'static str {
        match self {
            NetworkEnv::Testnet => TESTNET_RPC_URL,
            NetworkEnv::Mainnet => MAINNET_RPC_URL,
        }
    }
}

impl fmt::Display for NetworkEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NetworkEnv {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "testnet" => Ok(NetworkEnv::Testnet),
            "mainnet" => Ok(NetworkEnv::Mainnet),
            other => Err(Error::UnknownNetwork(other.to_string())),
        }
    }
}

/// What this tool needs from the chain, injected so commands are testable
/// without the `near` binary or a live RPC endpoint.
#[async_trait]
pub trait ContractClient: Send + Sync {
    /// Invoke a view method. `Ok(None)` means the contract reported no
    /// value for these arguments, e.g. an account that was never
    /// whitelisted; transport failures are `Err`.
    async fn view(&self, contract_id: &str, method: &str, args: Value)
        -> MinterResult<Option<Value>>;

    /// Invoke a state-changing method as the configured signer.
    async fn call(&self, contract_id: &str, method: &str, args: Value, gas: u64)
        -> MinterResult<()>;

    /// Code hash currently deployed on `account_id`.
    async fn account_code_hash(&self, account_id: &str) -> MinterResult<String>;

    /// One-shot deploy plus initializer call on `account_id`.
    async fn deploy(
        &self,
        account_id: &str,
        wasm_path: &Path,
        init_method: &str,
        init_args: &InitArgs,
    ) -> MinterResult<()>;
}

#[derive(Debug, Deserialize)]
struct CallFunctionResponse {
    result: Vec<u8>,
}

/// [`ContractClient`] backed by a public JSON-RPC endpoint for reads and
/// the `near` binary for writes.
pub struct NearCli {
    env: NetworkEnv,
    signer_id: String,
    rpc_url: String,
    http_client: reqwest::Client,
}

impl NearCli {
    pub fn new(env: NetworkEnv, signer_id: impl Into<String>) -> Self {
        Self {
            env,
            signer_id: signer_id.into(),
            rpc_url: env.rpc_url().to_string(),
            http_client: reqwest::Client::new(),
        }
    }

    /// Point reads at a different RPC endpoint than the network default.
    pub fn with_rpc_url(mut self, rpc_url: impl Into<String>) -> Self {
        self.rpc_url = rpc_url.into();
        self
    }

    async fn rpc_query(&self, params: Value) -> MinterResult<Value> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": "dontcare",
            "method": "query",
            "params": params,
        });
        let response = self.http_client.post(&self.rpc_url).json(&body).send().await?;
        Ok(response.json::<Value>().await?)
    }

    fn near_command(&self) -> Command {
        let mut command = Command::new("near");
        command.env("NEAR_ENV", self.env.name());
        command
    }
}

async fn run_checked(mut command: Command) -> MinterResult<()> {
    let rendered = format!("{:?}", command.as_std());
    tracing::debug!(command = %rendered, "running near cli");
    let output = command.output().await?;
    if !output.status.success() {
        return Err(Error::CommandFailed {
            command: rendered,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    Ok(())
}

fn rpc_error(error: &Value) -> Error {
    Error::RpcError {
        code: error.get("code").and_then(Value::as_i64).unwrap_or(0),
        message: error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown RPC error")
            .to_string(),
    }
}

#[async_trait]
impl ContractClient for NearCli {
    async fn view(
        &self,
        contract_id: &str,
        method: &str,
        args: Value,
    ) -> MinterResult<Option<Value>> {
        let reply = self
            .rpc_query(json!({
                "request_type": "call_function",
                "finality": "final",
                "account_id": contract_id,
                "method_name": method,
                "args_base64": base64::engine::general_purpose::STANDARD.encode(args.to_string()),
            }))
            .await?;
        if let Some(error) = reply.get("error") {
            // Contract-side failures (unknown account, method panic) read
            // as "no value"; the stores map that onto their baseline.
            tracing::debug!(%contract_id, method, ?error, "view call reported no value");
            return Ok(None);
        }
        let outcome: CallFunctionResponse = serde_json::from_value(reply["result"].clone())?;
        if outcome.result.is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&outcome.result)?))
    }

    async fn call(
        &self,
        contract_id: &str,
        method: &str,
        args: Value,
        gas: u64,
    ) -> MinterResult<()> {
        let mut command = self.near_command();
        command
            .arg("call")
            .arg(contract_id)
            .arg(method)
            .arg(args.to_string())
            .arg("--accountId")
            .arg(&self.signer_id)
            .arg("--gas")
            .arg(gas.to_string());
        run_checked(command).await
    }

    async fn account_code_hash(&self, account_id: &str) -> MinterResult<String> {
        let reply = self
            .rpc_query(json!({
                "request_type": "view_account",
                "finality": "final",
                "account_id": account_id,
            }))
            .await?;
        if let Some(error) = reply.get("error") {
            return Err(rpc_error(error));
        }
        reply["result"]["code_hash"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                Error::UnexpectedResponse("view_account reply missing code_hash".to_string())
            })
    }

    async fn deploy(
        &self,
        account_id: &str,
        wasm_path: &Path,
        init_method: &str,
        init_args: &InitArgs,
    ) -> MinterResult<()> {
        let args = serde_json::to_value(init_args)?;
        let mut command = self.near_command();
        command
            .arg("deploy")
            .arg(account_id)
            .arg(wasm_path)
            .arg(init_method)
            .arg(args.to_string())
            .arg("--accountId")
            .arg(account_id);
        run_checked(command).await
    }
}

/// Whitelist allowances keyed by account id. Accounts the contract has
/// never seen read back as a zero allowance.
pub struct WhitelistStore<'a> {
    client: &'a dyn ContractClient,
    contract_id: &'a str,
}

impl<'a> WhitelistStore<'a> {
    pub fn new(client: &'a dyn ContractClient, contract_id: &'a str) -> Self {
        Self {
            client,
            contract_id,
        }
    }
}

#[async_trait]
impl RemoteStore for WhitelistStore<'_> {
    type Key = String;
    type Value = u64;

    async fn read_current(&self, key: &String) -> MinterResult<u64> {
        let value = self
            .client
            .view(
                self.contract_id,
                "get_wl_allowance",
                json!({ "account_id": key }),
            )
            .await?;
        Ok(value.and_then(|v| v.as_u64()).unwrap_or(0))
    }

    async fn write_desired(&self, key: &String, value: &u64) -> MinterResult<()> {
        self.client
            .call(
                self.contract_id,
                "add_whitelist_account",
                json!({ "account_id": key, "allowance": value }),
                DEFAULT_FUNCTION_CALL_GAS,
            )
            .await
    }
}

/// Per-token media URIs keyed by token id. An unset URI reads back as the
/// empty string; writing an empty string removes the URI.
pub struct MediaUriStore<'a> {
    client: &'a dyn ContractClient,
    contract_id: &'a str,
}

impl<'a> MediaUriStore<'a> {
    pub fn new(client: &'a dyn ContractClient, contract_id: &'a str) -> Self {
        Self {
            client,
            contract_id,
        }
    }
}

#[async_trait]
impl RemoteStore for MediaUriStore<'_> {
    type Key = String;
    type Value = String;

    async fn read_current(&self, key: &String) -> MinterResult<String> {
        let value = self
            .client
            .view(
                self.contract_id,
                "get_token_media",
                json!({ "token_id": key }),
            )
            .await?;
        Ok(value
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default())
    }

    async fn write_desired(&self, key: &String, value: &String) -> MinterResult<()> {
        if value.is_empty() {
            self.client
                .call(
                    self.contract_id,
                    "remove_media_uri",
                    json!({ "token_id": key }),
                    DEFAULT_FUNCTION_CALL_GAS,
                )
                .await
        } else {
            self.client
                .call(
                    self.contract_id,
                    "add_media_uri",
                    json!({ "token_id": key, "media": value }),
                    DEFAULT_FUNCTION_CALL_GAS,
                )
                .await
        }
    }
}

/// Convert a decimal NEAR amount such as `"2.5"` to yoctoNEAR.
pub fn near_to_yocto(amount: &str) -> MinterResult<u128> {
    let amount = amount.trim();
    let invalid = || Error::InvalidAmount(amount.to_string());
    let (whole, frac) = match amount.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (amount, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return Err(invalid());
    }
    if frac.len() > YOCTO_DECIMALS {
        return Err(invalid());
    }
    let whole: u128 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid())?
    };
    let mut yocto = whole
        .checked_mul(10u128.pow(YOCTO_DECIMALS as u32))
        .ok_or_else(invalid)?;
    if !frac.is_empty() {
        let scale = 10u128.pow((YOCTO_DECIMALS - frac.len()) as u32);
        let frac: u128 = frac.parse().map_err(|_| invalid())?;
        yocto = yocto.checked_add(frac * scale).ok_or_else(invalid)?;
    }
    Ok(yocto)
}
