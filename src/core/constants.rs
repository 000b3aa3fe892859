use std::time::{SystemTime, UNIX_EPOCH};

// c and fee rates are integers scaled by this factor
pub const C_SCALE: u64 = 1_000_000;
pub const FEE_RATE_SCALE: u64 = 1_000_000;

// Slippage tolerance is applied in basis points
pub const BPS_SCALE: u64 = 10_000;

pub const BASE_SWAP_GAS: u64 = 21_000;
pub const GAS_PER_HOP: u64 = 90_000;

pub const DEFAULT_MAX_HOPS: usize = 3;
// Upper bound on a request-supplied max hop count
pub const DEFAULT_MAX_HOPS_LIMIT: usize = 6;
pub const DEFAULT_MAX_PATHS: usize = 10;
pub const DEFAULT_CACHE_TTL_MS: u64 = 30_000;

// Scoring weights
pub const SCORE_BASE: f64 = 100.0;
pub const EXTRA_HOP_PENALTY: f64 = 10.0;
pub const PRICE_IMPACT_WEIGHT: f64 = 2.0;
pub const SMALLEST_SHARD_BONUS: f64 = 5.0;

// Validation thresholds and success-probability multipliers
pub const HOP_IMPACT_WARN_PCT: f64 = 5.0;
pub const PATH_IMPACT_WARN_PCT: f64 = 10.0;
pub const LOW_LIQUIDITY_FACTOR: f64 = 0.8;
pub const C_THRESHOLD_FACTOR: f64 = 0.9;
pub const HOP_IMPACT_FACTOR: f64 = 0.85;
pub const PATH_IMPACT_FACTOR: f64 = 0.7;

pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
