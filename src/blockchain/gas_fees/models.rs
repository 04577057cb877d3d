use ethers::types::{Eip1559TransactionRequest, U256};
use serde::{self, Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::result::error::FeeEstimationError;

/// How fast the transaction should be picked up. Each tier samples the tips paid in recent
/// blocks at a different set of percentiles (see [`SpeedModes`]).
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SpeedTier {
    /// Under a minute
    Slow,
    /// Under 30 seconds
    #[default]
    Normal,
    /// Under 10 seconds
    Fast,
}

/// Reward percentiles sampled from each block for every [`SpeedTier`].
///
/// Example: `[25.0, 50.0, 75.0]` picks the transactions at the 25%, 50% and 75% marks of the
/// block, ordered by effective tip and weighted by gas used.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedModes {
    slow: Vec<f64>,
    normal: Vec<f64>,
    fast: Vec<f64>,
}

impl Default for SpeedModes {
    fn default() -> Self {
        Self {
            slow: vec![10.0, 20.0, 30.0, 40.0, 50.0],
            normal: vec![10.0, 30.0, 50.0, 70.0, 90.0],
            fast: vec![50.0, 60.0, 70.0, 80.0, 90.0],
        }
    }
}

impl SpeedModes {
    pub fn new(
        slow: Vec<f64>,
        normal: Vec<f64>,
        fast: Vec<f64>,
    ) -> Result<Self, FeeEstimationError> {
        validate_percentiles(SpeedTier::Slow, &slow)?;
        validate_percentiles(SpeedTier::Normal, &normal)?;
        validate_percentiles(SpeedTier::Fast, &fast)?;

        Ok(Self { slow, normal, fast })
    }

    /// Replaces the percentiles of the tiers that have `Some` override, keeping the rest.
    pub fn with_overrides(
        self,
        slow: Option<Vec<f64>>,
        normal: Option<Vec<f64>>,
        fast: Option<Vec<f64>>,
    ) -> Result<Self, FeeEstimationError> {
        Self::new(
            slow.unwrap_or(self.slow),
            normal.unwrap_or(self.normal),
            fast.unwrap_or(self.fast),
        )
    }

    pub fn percentiles_for(&self, speed: SpeedTier) -> &[f64] {
        match speed {
            SpeedTier::Slow => &self.slow,
            SpeedTier::Normal => &self.normal,
            SpeedTier::Fast => &self.fast,
        }
    }
}

fn validate_percentiles(speed: SpeedTier, percentiles: &[f64]) -> Result<(), FeeEstimationError> {
    if percentiles.is_empty() {
        return Err(FeeEstimationError::InvalidArgument(format!(
            "percentiles for speed {speed} are empty"
        )));
    }

    if let Some(out_of_range) = percentiles
        .iter()
        .find(|p| !(0.0..=100.0).contains(*p))
    {
        return Err(FeeEstimationError::InvalidArgument(format!(
            "percentile {out_of_range} for speed {speed} is not within [0, 100]"
        )));
    }

    if percentiles.windows(2).any(|pair| pair[0] > pair[1]) {
        return Err(FeeEstimationError::InvalidArgument(format!(
            "percentiles for speed {speed} must be in increasing order"
        )));
    }

    Ok(())
}

/// EIP-1559 fee bid, serialized with the field names of a transaction request so it can be
/// merged straight into one.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EstimatedFees {
    pub max_priority_fee_per_gas: U256,
    pub max_fee_per_gas: U256,
}

impl EstimatedFees {
    pub fn apply_to(&self, request: Eip1559TransactionRequest) -> Eip1559TransactionRequest {
        request
            .max_priority_fee_per_gas(self.max_priority_fee_per_gas)
            .max_fee_per_gas(self.max_fee_per_gas)
    }
}
