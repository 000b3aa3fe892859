use super::constants::{
    now_millis, BASE_SWAP_GAS, DEFAULT_CACHE_TTL_MS, DEFAULT_MAX_HOPS, DEFAULT_MAX_HOPS_LIMIT,
    DEFAULT_MAX_PATHS, GAS_PER_HOP,
};
use super::scoring::efficiency_score;
use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Token {
    pub address: String,
    pub symbol: String,
    pub decimals: u8,
}

impl Token {
    pub fn new(address: &str, symbol: &str, decimals: u8) -> Self {
        Self {
            address: address.to_string(),
            symbol: symbol.to_string(),
            decimals,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeeFraction {
    pub numerator: u64,
    pub denominator: u64,
}

/// SAMM risk parameters. `c` is scaled by 1_000_000 and bounds
/// `amount_in / reserve_in` for a single trade.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SammParams {
    pub beta1: i64,
    pub rmin: u64,
    pub rmax: u64,
    pub c: u64,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PoolStatus {
    #[default]
    Active,
    Paused,
    Inactive,
}

/// One shard: a constant-product pool over an unordered token pair.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Pool {
    pub address: String,
    pub token0: Token,
    pub token1: Token,
    pub reserve0: BigUint,
    pub reserve1: BigUint,
    pub total_supply: BigUint,
    pub trade_fee: FeeFraction,
    pub owner_fee: FeeFraction,
    pub samm: SammParams,
    #[serde(default)]
    pub status: PoolStatus,
    pub chain_id: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SwapHop {
    pub pool_address: String,
    pub token_in: Token,
    pub token_out: Token,
    pub amount_in: BigUint,
    pub amount_out: BigUint,
    pub fee: BigUint,
    pub price_impact: f64,
    pub smallest_shard: bool,
    pub position: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SwapPath {
    pub hops: Vec<SwapHop>,
    pub total_amount_in: BigUint,
    pub amount_out: BigUint,
    pub total_fee: BigUint,
    pub total_price_impact: f64,
    pub efficiency_score: f64,
    pub estimated_gas: u64,
    pub chain_id: u64,
    pub created_at: u64,
}

impl SwapPath {
    /// Aggregates an ordered, non-empty hop sequence into a scored path.
    pub fn from_hops(mut hops: Vec<SwapHop>, chain_id: u64) -> Option<Self> {
        let first = hops.first()?;
        let total_amount_in = first.amount_in.clone();
        let amount_out = hops.last()?.amount_out.clone();

        let mut total_fee = BigUint::zero();
        let mut total_price_impact = 0.0;
        for (position, hop) in hops.iter_mut().enumerate() {
            hop.position = position;
            total_fee += &hop.fee;
            total_price_impact += hop.price_impact;
        }

        let mut path = Self {
            estimated_gas: BASE_SWAP_GAS + GAS_PER_HOP * hops.len() as u64,
            hops,
            total_amount_in,
            amount_out,
            total_fee,
            total_price_impact,
            efficiency_score: 0.0,
            chain_id,
            created_at: now_millis(),
        };
        path.efficiency_score = efficiency_score(&path);
        Some(path)
    }

    pub fn hop_count(&self) -> usize {
        self.hops.len()
    }

    pub fn age(&self, now: u64) -> Duration {
        Duration::from_millis(now.saturating_sub(self.created_at))
    }
}

#[derive(Clone, Debug)]
pub struct PathDiscoveryRequest {
    pub token_in: String,
    pub token_out: String,
    pub amount_out: BigUint,
    pub chain_id: u64,
    pub max_hops: Option<usize>,
    pub slippage_tolerance: Option<f64>,
}

impl PathDiscoveryRequest {
    pub fn new(token_in: &str, token_out: &str, amount_out: BigUint, chain_id: u64) -> Self {
        Self {
            token_in: token_in.to_string(),
            token_out: token_out.to_string(),
            amount_out,
            chain_id,
            max_hops: None,
            slippage_tolerance: None,
        }
    }

    /// `max_hops` is the resolved bound, the request's own or the engine default.
    pub fn cache_key(&self, max_hops: usize) -> String {
        format!(
            "{}-{}-{}-{}-{}",
            self.token_in, self.token_out, self.amount_out, self.chain_id, max_hops
        )
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct SearchMetadata {
    pub search_time: Duration,
    pub paths_evaluated: usize,
    pub pools_considered: usize,
    pub chain_id: u64,
    pub cache_hit: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct PathDiscoveryResult {
    pub paths: Vec<SwapPath>,
    pub best_path: Option<SwapPath>,
    pub metadata: SearchMetadata,
}

/// How the required amount at intermediate tokens is estimated for multi-hop routes.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AmountEstimation {
    /// Price every hop for the final desired output during expansion.
    #[default]
    FinalOutput,
    /// Solve each hop backward from the final output, then re-check forward.
    Backward,
}

#[derive(Clone, Debug)]
pub struct DiscoveryConfig {
    pub chain_id: u64,
    pub max_hops: usize,
    pub max_hops_limit: usize,
    pub max_paths: usize,
    pub cache_enabled: bool,
    pub cache_ttl: Duration,
    pub min_liquidity: BigUint,
    pub low_liquidity_threshold: BigUint,
    pub amount_estimation: AmountEstimation,
}

impl DiscoveryConfig {
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            max_hops: DEFAULT_MAX_HOPS,
            max_hops_limit: DEFAULT_MAX_HOPS_LIMIT,
            max_paths: DEFAULT_MAX_PATHS,
            cache_enabled: true,
            cache_ttl: Duration::from_millis(DEFAULT_CACHE_TTL_MS),
            min_liquidity: BigUint::zero(),
            low_liquidity_threshold: BigUint::zero(),
            amount_estimation: AmountEstimation::default(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EngineStats {
    pub total_searches: u64,
    pub total_paths_found: u64,
    pub average_search_time_ms: f64,
    pub cache_hits: u64,
}
