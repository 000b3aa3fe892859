use crate::core::types::AmountEstimation;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct RouterConfig {
    pub working_dir: String,
    pub pool_snapshot_file: String,
    pub chain_id: u64,
    pub listen_addr: String,
    pub max_hops: usize,
    // Largest max hop count a request may ask for
    pub max_hops_limit: usize,
    pub max_paths: usize,
    pub cache_enabled: bool,
    pub cache_ttl_ms: u64,
    // Sum of both reserves, in smallest units
    pub min_liquidity: u64,
    pub low_liquidity_threshold: u64,
    pub bridge_token: String,
    pub amount_estimation: AmountEstimation,
    pub refresh_interval_secs: u64,
}

#[derive(Serialize, Deserialize, ToSchema, IntoParams, Clone, Debug)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PathQuery {
    #[schema(example = "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48")]
    pub token_in: String,

    #[schema(example = "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2")]
    pub token_out: String,

    #[schema(example = "1000000000000000000")]
    pub amount_out: String,

    #[schema(example = 1)]
    pub chain_id: u64,

    #[schema(example = 3, nullable = true)]
    pub max_hops: Option<usize>,

    #[schema(example = 0.5, nullable = true)]
    pub slippage_tolerance: Option<f64>,
}

#[derive(Serialize, Deserialize, ToSchema, IntoParams, Clone, Debug)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ShardQuery {
    pub token_in: String,
    pub token_out: String,
    pub amount_out: String,
    /// Bridging token for cross-pool quotes, defaults to the configured one
    #[schema(nullable = true)]
    pub bridge_token: Option<String>,
}

#[derive(Serialize, Deserialize, ToSchema, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ResponseHop {
    pub pool_address: String,
    pub token_in: String,
    pub token_out: String,
    pub token_in_symbol: String,
    pub token_out_symbol: String,
    pub amount_in: String,
    pub amount_out: String,
    pub fee: String,
    pub price_impact: f64,
    pub smallest_shard: bool,
    pub position: usize,
}

#[derive(Serialize, Deserialize, ToSchema, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePath {
    pub hops: Vec<ResponseHop>,
    pub total_amount_in: String,
    pub amount_out: String,
    pub total_fee: String,
    pub total_price_impact: f64,
    pub efficiency_score: f64,
    pub estimated_gas: u64,
    pub chain_id: u64,
    pub created_at: u64,
    #[schema(nullable = true)]
    pub max_amount_in: Option<String>,
}

#[derive(Serialize, Deserialize, ToSchema, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    pub search_time: f64,
    pub paths_evaluated: usize,
    pub pools_considered: usize,
    pub chain_id: u64,
    pub cache_hit: bool,
}

#[derive(Serialize, Deserialize, ToSchema, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PathResponse {
    pub paths: Vec<ResponsePath>,
    #[schema(nullable = true)]
    pub best_path: Option<ResponsePath>,
    pub metadata: ResponseMetadata,
}

#[derive(Serialize, Deserialize, ToSchema, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ResponseShard {
    pub pool_address: String,
    pub amount_in: String,
    pub fee: String,
    pub price_impact: f64,
    pub max_admissible_input: String,
    pub within_threshold: bool,
    pub smallest: bool,
}

#[derive(Serialize, Deserialize, ToSchema, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ShardComparisonResponse {
    pub token_in: String,
    pub token_out: String,
    pub amount_out: String,
    pub shards: Vec<ResponseShard>,
    #[schema(nullable = true)]
    pub best_shard: Option<ResponseShard>,
    /// Whether the cheapest admissible shard is also the smallest one
    pub c_smaller_better: bool,
}

#[derive(Serialize, Deserialize, ToSchema, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CrossPoolResponse {
    pub token_in: String,
    pub token_out: String,
    pub amount_out: String,
    pub amount_in: String,
    pub total_fee: String,
    pub via_bridge: bool,
    pub steps: Vec<ResponseHop>,
}

#[derive(Serialize, Deserialize, ToSchema, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_searches: u64,
    pub total_paths_found: u64,
    pub average_search_time_ms: f64,
    pub cache_hits: u64,
    pub tokens: usize,
    pub pools: usize,
    pub last_rebuilt: u64,
}
