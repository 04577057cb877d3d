pub mod dtos;

use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::anyhow;
use async_trait::async_trait;
use ethers::types::U256;
use reqwest_middleware::ClientWithMiddleware;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::blockchain::providers::json_rpc::dtos::{BlockHeaderFees, JsonRpcResponse};
use crate::blockchain::providers::{
    BlockchainProviderError, EvmBlockchainProvider, FeeHistory, NewestBlock, Result,
};

const GET_BLOCK_BY_NUMBER: &str = "eth_getBlockByNumber";
const FEE_HISTORY: &str = "eth_feeHistory";

/// [`EvmBlockchainProvider`] that talks plain JSON-RPC over HTTP.
///
/// The HTTP client is handed in by the caller so retry or tracing middleware can be stacked on
/// it without this type knowing.
pub struct JsonRpcEvmBlockchainProvider {
    endpoint: String,
    http_client: ClientWithMiddleware,
    request_id: AtomicU64,
}

impl JsonRpcEvmBlockchainProvider {
    pub fn new(endpoint: impl Into<String>, http_client: ClientWithMiddleware) -> Self {
        Self {
            endpoint: endpoint.into(),
            http_client,
            request_id: AtomicU64::new(1),
        }
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<Option<T>> {
        let body = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": self.request_id.fetch_add(1, Ordering::Relaxed),
        });

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                BlockchainProviderError::Unknown(
                    anyhow!(e).context(format!("Error calling {method}")),
                )
            })?;

        let response_status = response.status();
        let response_body = response.text().await.map_err(|e| {
            BlockchainProviderError::Unknown(anyhow!(e).context("Error obtaining http response"))
        })?;

        if !response_status.is_success() {
            return Err(BlockchainProviderError::Unknown(anyhow!(
                "{} failed with status {}. Response: {}",
                method,
                response_status,
                response_body
            )));
        }

        let response: JsonRpcResponse<T> = serde_json::from_str(&response_body).map_err(|e| {
            BlockchainProviderError::Unknown(anyhow!(e).context(format!(
                "Error deserializing {method} response. Response Body: {response_body:?}"
            )))
        })?;

        response.into_result().map_err(|e| {
            BlockchainProviderError::Unknown(anyhow!(e).context(format!("{method} was rejected")))
        })
    }
}

#[async_trait]
impl EvmBlockchainProvider for JsonRpcEvmBlockchainProvider {
    async fn get_base_fee_per_gas(&self, block: NewestBlock) -> Result<U256> {
        let header: BlockHeaderFees = self
            .call(GET_BLOCK_BY_NUMBER, json!([block.to_rpc_param(), false]))
            .await?
            .ok_or_else(|| {
                BlockchainProviderError::MalformedResponse(format!("block {block} not found"))
            })?;

        header
            .base_fee_per_gas
            .ok_or_else(|| BlockchainProviderError::MissingBaseFee(block.to_string()))
    }

    async fn get_fee_history<'percentiles>(
        &self,
        block_count: u64,
        newest_block: NewestBlock,
        reward_percentiles: &'percentiles [f64],
    ) -> Result<FeeHistory> {
        let params = json!([
            format!("{block_count:#x}"),
            newest_block.to_rpc_param(),
            reward_percentiles,
        ]);

        self.call(FEE_HISTORY, params).await?.ok_or_else(|| {
            BlockchainProviderError::MalformedResponse(format!("{FEE_HISTORY} returned null"))
        })
    }
}
