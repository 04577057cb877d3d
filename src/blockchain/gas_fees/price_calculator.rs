use ethers::types::U256;

use super::models::EstimatedFees;

/// Base fee can move by at most 12.5% per block, doubling it leaves room for several full
/// blocks in a row. Whatever is not burned gets refunded to the sender.
const BASE_FEE_MULTIPLIER: u64 = 2;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FeeHistoryProcessingError {
    #[error("the reward array was empty, check the RPC response")]
    NoRewardSamples,

    #[error("overflow while computing {0}")]
    Overflow(&'static str),
}

/// Integer mean of every tip sample of every block, rounded down.
pub fn average_reward(reward: &[Vec<U256>]) -> Result<U256, FeeHistoryProcessingError> {
    let (sum, count) = reward
        .iter()
        .flatten()
        .try_fold((U256::zero(), 0u64), |(sum, count), sample| {
            sum.checked_add(*sample).map(|sum| (sum, count + 1))
        })
        .ok_or(FeeHistoryProcessingError::Overflow("the reward sum"))?;

    if count == 0 {
        return Err(FeeHistoryProcessingError::NoRewardSamples);
    }

    Ok(sum / U256::from(count))
}

pub fn process_fee_history(
    reward: &[Vec<U256>],
    base_fee_per_gas: U256,
) -> Result<EstimatedFees, FeeHistoryProcessingError> {
    let max_priority_fee_per_gas = average_reward(reward)?;

    let next_base_fee = base_fee_per_gas
        .checked_mul(U256::from(BASE_FEE_MULTIPLIER))
        .ok_or(FeeHistoryProcessingError::Overflow("the next base fee"))?;

    let max_fee_per_gas = max_priority_fee_per_gas
        .checked_add(next_base_fee)
        .ok_or(FeeHistoryProcessingError::Overflow("max_fee_per_gas"))?;

    Ok(EstimatedFees {
        max_priority_fee_per_gas,
        max_fee_per_gas,
    })
}
