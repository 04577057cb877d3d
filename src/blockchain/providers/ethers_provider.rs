use anyhow::anyhow;
use async_trait::async_trait;
use ethers::providers::Middleware;
use ethers::types::{BlockNumber, U256};

use crate::blockchain::providers::{
    BlockchainProviderError, EvmBlockchainProvider, FeeHistory, NewestBlock, Result,
};

/// [`EvmBlockchainProvider`] backed by any ethers middleware stack, e.g. a
/// `Provider<Http>` or a `Provider<RetryClient<Http>>` configured by the caller.
pub struct MiddlewareEvmBlockchainProvider<M: Middleware> {
    client: M,
}

impl<M: Middleware> MiddlewareEvmBlockchainProvider<M> {
    pub fn new(client: M) -> Self {
        Self { client }
    }

    pub fn inner(&self) -> &M {
        &self.client
    }
}

#[async_trait]
impl<M> EvmBlockchainProvider for MiddlewareEvmBlockchainProvider<M>
where
    M: Middleware + 'static,
{
    async fn get_base_fee_per_gas(&self, block: NewestBlock) -> Result<U256> {
        let block_number: BlockNumber = block.into();

        let fetched = self
            .client
            .get_block(block_number)
            .await
            .map_err(|e| {
                BlockchainProviderError::Unknown(
                    anyhow!(e).context(format!("Unable to get {block} block")),
                )
            })?
            .ok_or_else(|| {
                BlockchainProviderError::MalformedResponse(format!("block {block} not found"))
            })?;

        fetched
            .base_fee_per_gas
            .ok_or_else(|| BlockchainProviderError::MissingBaseFee(block.to_string()))
    }

    async fn get_fee_history<'percentiles>(
        &self,
        block_count: u64,
        newest_block: NewestBlock,
        reward_percentiles: &'percentiles [f64],
    ) -> Result<FeeHistory> {
        let history = self
            .client
            .fee_history(block_count, newest_block.into(), reward_percentiles)
            .await
            .map_err(|e| {
                BlockchainProviderError::Unknown(
                    anyhow!(e).context("Error getting historical fees"),
                )
            })?;

        if history.oldest_block > U256::from(u64::MAX) {
            return Err(BlockchainProviderError::MalformedResponse(format!(
                "oldest block {} does not fit in 64 bits",
                history.oldest_block
            )));
        }

        Ok(FeeHistory {
            oldest_block: history.oldest_block.as_u64(),
            base_fee_per_gas: history.base_fee_per_gas,
            gas_used_ratio: history.gas_used_ratio,
            reward: history.reward,
        })
    }
}
