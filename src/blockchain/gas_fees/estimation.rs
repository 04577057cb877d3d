use std::str::FromStr;

use crate::blockchain::providers::{EvmBlockchainProvider, NewestBlock};
use crate::result::error::{FeeEstimationError, Result};

use super::{
    models::{EstimatedFees, SpeedModes, SpeedTier},
    price_calculator::process_fee_history,
};

pub const DEFAULT_SPEED: SpeedTier = SpeedTier::Normal;
pub const DEFAULT_BLOCK_COUNT: u64 = 3;

/// Nodes refuse (or silently truncate) `eth_feeHistory` ranges above this.
pub const MAX_BLOCK_COUNT: u64 = 1024;

const NEWEST_BLOCK: NewestBlock = NewestBlock::Pending;

/// Estimates EIP-1559 fees by averaging the tips paid in the most recent blocks.
///
/// The estimator only owns its percentile table. The provider is borrowed for the duration of
/// a call, so one estimator can serve any number of chains and concurrent calls.
#[derive(Debug, Clone, Default)]
pub struct FeeEstimator {
    modes: SpeedModes,
}

impl FeeEstimator {
    pub fn new(modes: SpeedModes) -> Self {
        Self { modes }
    }

    pub fn modes(&self) -> &SpeedModes {
        &self.modes
    }

    /// Same as [`FeeEstimator::estimate_for`] but takes the speed by name (`"slow"`, `"normal"`
    /// or `"fast"`).
    pub async fn estimate(
        &self,
        provider: &dyn EvmBlockchainProvider,
        speed: &str,
        nb_blocks: u64,
    ) -> Result<EstimatedFees> {
        let speed = SpeedTier::from_str(speed)
            .map_err(|_| FeeEstimationError::InvalidArgument(format!("invalid speed: {speed}")))?;

        self.estimate_for(provider, speed, nb_blocks).await
    }

    /// Looks at the tips paid in the last `nb_blocks` blocks up to the pending one, sampled at
    /// the percentiles of `speed`, and returns:
    /// - `max_priority_fee_per_gas`: the average of every sample, rounded down.
    /// - `max_fee_per_gas`: the above plus twice the pending base fee.
    ///
    /// Arguments are validated before the provider is touched. Provider failures are returned
    /// unchanged inside [`FeeEstimationError::Provider`].
    pub async fn estimate_for(
        &self,
        provider: &dyn EvmBlockchainProvider,
        speed: SpeedTier,
        nb_blocks: u64,
    ) -> Result<EstimatedFees> {
        validate_block_count(nb_blocks)?;
        let percentiles = self.modes.percentiles_for(speed);

        let base_fee = provider.get_base_fee_per_gas(NEWEST_BLOCK).await?;
        tracing::debug!(speed = %speed, base_fee = %base_fee, "Fetched pending base fee");

        let fee_history = provider
            .get_fee_history(nb_blocks, NEWEST_BLOCK, percentiles)
            .await?;

        let fees = process_fee_history(&fee_history.reward, base_fee)?;
        tracing::debug!(
            speed = %speed,
            nb_blocks,
            oldest_block = fee_history.oldest_block,
            max_priority_fee_per_gas = %fees.max_priority_fee_per_gas,
            max_fee_per_gas = %fees.max_fee_per_gas,
            "Estimated gas fees"
        );

        Ok(fees)
    }
}

fn validate_block_count(nb_blocks: u64) -> Result<()> {
    if nb_blocks == 0 {
        return Err(FeeEstimationError::InvalidArgument(
            "nb_blocks must be at least 1".to_owned(),
        ));
    }

    if nb_blocks > MAX_BLOCK_COUNT {
        return Err(FeeEstimationError::InvalidArgument(format!(
            "nb_blocks must be at most {MAX_BLOCK_COUNT}, got {nb_blocks}"
        )));
    }

    Ok(())
}

/// Estimates with the default percentile table. Use [`DEFAULT_SPEED`] and
/// [`DEFAULT_BLOCK_COUNT`] for the usual arguments.
///
/// ```rust,ignore
/// let fees = estimate_gas_fees(&provider, "normal", 3).await?;
/// let tx = fees.apply_to(Eip1559TransactionRequest::new().to(recipient).value(amount));
/// ```
pub async fn estimate_gas_fees(
    provider: &dyn EvmBlockchainProvider,
    speed: &str,
    nb_blocks: u64,
) -> Result<EstimatedFees> {
    FeeEstimator::default()
        .estimate(provider, speed, nb_blocks)
        .await
}
