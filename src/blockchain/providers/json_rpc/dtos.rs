use ethers::types::U256;
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize, Debug)]
pub struct JsonRpcResponse<T> {
    #[allow(dead_code)]
    #[serde(default)]
    id: Value,

    #[allow(dead_code)]
    jsonrpc: String,

    result: Option<T>,

    error: Option<JsonRpcErrorObject>,
}

impl<T> JsonRpcResponse<T> {
    /// `Ok(None)` is a successful call answered with `null`.
    pub fn into_result(self) -> Result<Option<T>, JsonRpcErrorObject> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.result),
        }
    }
}

#[derive(Deserialize, Debug, thiserror::Error)]
#[error("JSON-RPC error {code}: {message}")]
pub struct JsonRpcErrorObject {
    pub code: i64,
    pub message: String,
}

/// The only field of `eth_getBlockByNumber` the estimation reads.
#[derive(Deserialize, Debug)]
pub struct BlockHeaderFees {
    #[serde(rename(deserialize = "baseFeePerGas"), default)]
    pub base_fee_per_gas: Option<U256>,
}
