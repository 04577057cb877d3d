use common::deserializers::percentiles::percentiles_option;
use serde::{self, Deserialize};

use crate::blockchain::gas_fees::estimation::{DEFAULT_BLOCK_COUNT, DEFAULT_SPEED};
use crate::blockchain::gas_fees::models::SpeedModes;
use crate::result::error::FeeEstimationError;

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    /// JSON-RPC endpoint of the EVM node.
    pub evm_rpc_endpoint: String,

    /// Speed used when none is given, `slow`, `normal` or `fast`.
    #[serde(default = "default_speed")]
    pub default_speed: String,

    /// Number of blocks sampled when none is given.
    #[serde(default = "default_block_count")]
    pub default_block_count: u64,

    /// Comma separated percentiles replacing the ones of the `slow` tier.
    #[serde(default, deserialize_with = "percentiles_option")]
    pub slow_percentiles: Option<Vec<f64>>,

    /// Comma separated percentiles replacing the ones of the `normal` tier.
    #[serde(default, deserialize_with = "percentiles_option")]
    pub normal_percentiles: Option<Vec<f64>>,

    /// Comma separated percentiles replacing the ones of the `fast` tier.
    #[serde(default, deserialize_with = "percentiles_option")]
    pub fast_percentiles: Option<Vec<f64>>,
}

fn default_speed() -> String {
    DEFAULT_SPEED.to_string()
}

fn default_block_count() -> u64 {
    DEFAULT_BLOCK_COUNT
}

impl Config {
    /// Default tier table with the configured overrides applied.
    pub fn speed_modes(&self) -> Result<SpeedModes, FeeEstimationError> {
        SpeedModes::default().with_overrides(
            self.slow_percentiles.clone(),
            self.normal_percentiles.clone(),
            self.fast_percentiles.clone(),
        )
    }
}
