//! FeeEstimationError is what every estimation entry point fails with. It separates mistakes in
//! the caller's input from failures of the chain data provider, which are passed through as is.

use crate::blockchain::gas_fees::price_calculator::FeeHistoryProcessingError;
use crate::blockchain::providers::BlockchainProviderError;

pub type Result<T> = std::result::Result<T, FeeEstimationError>;

#[derive(Debug, thiserror::Error)]
pub enum FeeEstimationError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Provider(#[from] BlockchainProviderError),
}

impl From<FeeHistoryProcessingError> for FeeEstimationError {
    /// Processing only fails when the provider answered with data that cannot be averaged, so
    /// it is reported as a provider problem.
    fn from(value: FeeHistoryProcessingError) -> Self {
        FeeEstimationError::Provider(BlockchainProviderError::MalformedResponse(
            value.to_string(),
        ))
    }
}
