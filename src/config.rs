use super::core::constants::{
    DEFAULT_CACHE_TTL_MS, DEFAULT_MAX_HOPS, DEFAULT_MAX_HOPS_LIMIT, DEFAULT_MAX_PATHS,
};
use super::core::types::{AmountEstimation, DiscoveryConfig};
use super::types::RouterConfig;
use num_bigint::BigUint;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Duration;

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            working_dir: "working_dir".to_string(),
            pool_snapshot_file: "pools.json".to_string(),
            chain_id: 1,
            listen_addr: "127.0.0.1:3000".to_string(),
            max_hops: DEFAULT_MAX_HOPS,
            max_hops_limit: DEFAULT_MAX_HOPS_LIMIT,
            max_paths: DEFAULT_MAX_PATHS,
            cache_enabled: true,
            cache_ttl_ms: DEFAULT_CACHE_TTL_MS,
            min_liquidity: 0,
            low_liquidity_threshold: 1_000_000,
            // USDC
            bridge_token: "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48".to_string(),
            amount_estimation: AmountEstimation::FinalOutput,
            refresh_interval_secs: 30,
        }
    }
}

impl RouterConfig {
    // Helper method to load from a specific path
    pub fn load_from(path: PathBuf) -> Result<Self, Box<dyn Error>> {
        let config: Self = confy::load_path(path)?;
        Ok(config)
    }

    pub fn pool_snapshot_path(&self) -> PathBuf {
        Path::new(self.working_dir.as_str()).join(self.pool_snapshot_file.as_str())
    }
}

impl From<&RouterConfig> for DiscoveryConfig {
    fn from(config: &RouterConfig) -> Self {
        Self {
            chain_id: config.chain_id,
            max_hops: config.max_hops,
            max_hops_limit: config.max_hops_limit,
            max_paths: config.max_paths,
            cache_enabled: config.cache_enabled,
            cache_ttl: Duration::from_millis(config.cache_ttl_ms),
            min_liquidity: BigUint::from(config.min_liquidity),
            low_liquidity_threshold: BigUint::from(config.low_liquidity_threshold),
            amount_estimation: config.amount_estimation,
        }
    }
}
