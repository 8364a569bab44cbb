use anyhow::Error;
use base64::{Engine, engine::general_purpose::STANDARD};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::debug;

/// JSON-RPC "invalid params", returned by `getTokenAccountBalance` for unknown accounts
const INVALID_PARAMS: i64 = -32602;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("error: rpc call failed with code {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("error: missing `{0}` in rpc response")]
    MissingField(&'static str),
    #[error("error: account {0} not found")]
    AccountNotFound(String),
}

/// blocking Solana JSON-RPC client
#[derive(Debug, Clone)]
pub struct SolanaRpc {
    url: String,
}

impl SolanaRpc {
    pub fn new(url: impl Into<String>) -> Self {
        SolanaRpc { url: url.into() }
    }

    pub fn call(&self, method: &str, params: Value) -> Result<Value, Error> {
        debug!(method, url = %self.url, "solana rpc call");
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params
        });

        let req = ureq::post(self.url.as_str())
            .send_json(body)?
            .body_mut()
            .read_to_string()?;
        let res: Value = serde_json::from_str(&req)?;
        Ok(rpc_result(res)?)
    }

    /// raw data of an account, `None` if it does not exist
    pub fn account_data(&self, address: &str) -> Result<Option<Vec<u8>>, Error> {
        let res = self.call(
            "getAccountInfo",
            json!([address, { "encoding": "base64" }]),
        )?;
        match res.get("value") {
            Some(Value::Null) | None => Ok(None),
            Some(account) => Ok(Some(account_bytes(account)?)),
        }
    }

    /// (address, data) of every account of `program` matching `filters`
    pub fn program_accounts(
        &self,
        program: &str,
        filters: Vec<Value>,
        data_slice: Option<(usize, usize)>,
    ) -> Result<Vec<(String, Vec<u8>)>, Error> {
        let mut config = json!({
            "encoding": "base64",
            "filters": filters,
        });
        if let Some((offset, length)) = data_slice {
            config["dataSlice"] = json!({ "offset": offset, "length": length });
        }
        let res = self.call("getProgramAccounts", json!([program, config]))?;
        let accounts = res
            .as_array()
            .ok_or(RpcError::MissingField("result"))?;

        let mut out = Vec::with_capacity(accounts.len());
        for entry in accounts {
            let Some(pubkey) = entry.get("pubkey").and_then(|v| v.as_str()) else {
                continue;
            };
            let Some(account) = entry.get("account") else {
                continue;
            };
            out.push((pubkey.to_string(), account_bytes(account)?));
        }
        Ok(out)
    }

    /// (supply, decimals) of an SPL mint; absent or malformed fields are `None`
    pub fn token_supply(&self, mint: &str) -> Result<(Option<u64>, Option<u8>), Error> {
        let res = self.call("getTokenSupply", json!([mint]))?;
        Ok(token_supply_fields(&res))
    }

    /// balance of an SPL token account in base units, `None` if the account is missing
    pub fn token_account_balance(&self, account: &str) -> Result<Option<u64>, Error> {
        match self.call("getTokenAccountBalance", json!([account])) {
            Ok(res) => Ok(res.get("value").and_then(token_amount)),
            Err(err) => match err.downcast_ref::<RpcError>() {
                Some(RpcError::Rpc { code, .. }) if *code == INVALID_PARAMS => Ok(None),
                _ => Err(err),
            },
        }
    }
}

/// unwraps a JSON-RPC envelope into its `result`
pub fn rpc_result(mut res: Value) -> Result<Value, RpcError> {
    if let Some(err) = res.get("error") {
        return Err(RpcError::Rpc {
            code: err.get("code").and_then(|v| v.as_i64()).unwrap_or_default(),
            message: err
                .get("message")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
        });
    }
    match res.get_mut("result") {
        Some(result) => Ok(result.take()),
        None => Err(RpcError::MissingField("result")),
    }
}

/// decodes an account's `["<base64>", "base64"]` data field
pub fn account_bytes(account: &Value) -> Result<Vec<u8>, Error> {
    let encoded = account
        .get("data")
        .and_then(|v| v.get(0))
        .and_then(|v| v.as_str())
        .ok_or(RpcError::MissingField("data"))?;
    Ok(STANDARD.decode(encoded)?)
}

fn token_supply_fields(result: &Value) -> (Option<u64>, Option<u8>) {
    let Some(value) = result.get("value") else {
        return (None, None);
    };
    let decimals = value
        .get("decimals")
        .and_then(|v| v.as_u64())
        .and_then(|d| u8::try_from(d).ok());
    (token_amount(value), decimals)
}

/// token amounts are u64 encoded as decimal strings
fn token_amount(value: &Value) -> Option<u64> {
    value
        .get("amount")
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse::<u64>().ok())
}

/// memcmp filter against a base58 account key
pub fn memcmp_key(offset: usize, key: &str) -> Value {
    json!({ "memcmp": { "offset": offset, "bytes": key } })
}

/// memcmp filter against raw bytes
pub fn memcmp_bytes(offset: usize, bytes: &[u8]) -> Value {
    json!({ "memcmp": { "offset": offset, "bytes": STANDARD.encode(bytes), "encoding": "base64" } })
}
