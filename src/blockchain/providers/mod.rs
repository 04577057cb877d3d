pub mod ethers_provider;
pub mod json_rpc;

use async_trait::async_trait;
use common::deserializers::quantity::quantity_u64;
use ethers::types::{BlockNumber, U256};
use serde::Deserialize;
use serde_json::Value;

pub type Result<T> = std::result::Result<T, BlockchainProviderError>;

#[derive(Debug, thiserror::Error)]
pub enum BlockchainProviderError {
    #[error("{0:#}")]
    Unknown(anyhow::Error),

    #[error("block {0} has no base fee per gas, the chain does not support EIP-1559")]
    MissingBaseFee(String),

    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
}

/// Read-only access to the chain data the fee estimation needs.
///
/// Implementations wrap an already connected client, the caller owns the connection and any
/// timeout or retry policy attached to it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EvmBlockchainProvider: Sync + Send {
    /// Gets the `baseFeePerGas` of `block`. Fails with
    /// [`BlockchainProviderError::MissingBaseFee`] on blocks produced before London.
    async fn get_base_fee_per_gas(&self, block: NewestBlock) -> Result<U256>;

    /// Gets the historical information of gas spent from `newest_block` to `newest_block` -
    /// `block_count`.
    ///
    /// # Arguments
    /// - `block_count` - Number of blocks requested.
    /// - `newest_block` - Highest block requested in the range. `NewestBlock::Pending`
    /// includes the block being built.
    /// - `reward_percentiles` - An increasing array of percentiles to sample each block priority
    /// fees.
    ///
    /// # Returns
    /// - `oldest_block` - The lowest block number returned.
    /// - `base_fee_per_gas` - An array of block base fee per gas.
    /// - `gas_used_ratio` - An array of gas used ratio.
    /// - `reward`- An array containing the effective priority fees per gas by percentiles.
    ///
    /// # Example
    /// ```rust,ignore
    /// // Tips at the 10th, 50th and 90th percentile of the last three blocks
    /// provider
    ///      .get_fee_history(3, NewestBlock::Pending, &[10.0, 50.0, 90.0])
    ///      .await
    /// ```
    ///
    /// For more information:
    /// https://ethereum.github.io/execution-apis/api-documentation/
    async fn get_fee_history<'percentiles>(
        &self,
        block_count: u64,
        newest_block: NewestBlock,
        reward_percentiles: &'percentiles [f64],
    ) -> Result<FeeHistory>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewestBlock {
    BlockNumber(u64),
    Latest,
    Pending,
}

impl NewestBlock {
    /// Block tag as JSON-RPC expects it in `params`.
    pub fn to_rpc_param(self) -> Value {
        match self {
            NewestBlock::BlockNumber(n) => Value::from(format!("{n:#x}")),
            NewestBlock::Latest => Value::from("latest"),
            NewestBlock::Pending => Value::from("pending"),
        }
    }
}

impl std::fmt::Display for NewestBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NewestBlock::BlockNumber(n) => write!(f, "{n}"),
            NewestBlock::Latest => f.write_str("latest"),
            NewestBlock::Pending => f.write_str("pending"),
        }
    }
}

impl From<NewestBlock> for BlockNumber {
    fn from(value: NewestBlock) -> Self {
        match value {
            NewestBlock::BlockNumber(n) => BlockNumber::Number(n.into()),
            NewestBlock::Latest => BlockNumber::Latest,
            NewestBlock::Pending => BlockNumber::Pending,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[cfg_attr(test, derive(PartialEq))]
pub struct FeeHistory {
    #[serde(deserialize_with = "quantity_u64", rename(deserialize = "oldestBlock"))]
    pub oldest_block: u64,

    #[serde(rename(deserialize = "baseFeePerGas"), default)]
    pub base_fee_per_gas: Vec<U256>,

    #[serde(rename(deserialize = "gasUsedRatio"), default)]
    pub gas_used_ratio: Vec<f64>,

    #[serde(default)]
    pub reward: Vec<Vec<U256>>,
}
