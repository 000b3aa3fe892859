use super::core::error::DiscoveryError;
use super::core::indexer::pool::read_pool_snapshot;
use super::core::paths::PathDiscoveryEngine;
use super::core::shard::{max_admissible_input, ShardQuote};
use super::core::swap_math::apply_slippage;
use super::core::types::{PathDiscoveryRequest, SwapHop, SwapPath};
use super::types::{
    CrossPoolResponse, PathQuery, PathResponse, ResponseHop, ResponseMetadata, ResponsePath,
    ResponseShard, RouterConfig, ShardComparisonResponse, ShardQuery, StatsResponse,
};
use anyhow::Result;
use log::info;
use num_bigint::BigUint;
use num_traits::Zero;
use std::str::FromStr;

pub fn parse_amount(amount: &str) -> Result<BigUint, DiscoveryError> {
    BigUint::from_str(amount.trim()).map_err(|_| DiscoveryError::InvalidAmount(amount.to_string()))
}

fn validate_pair_query(params: &ShardQuery) -> Result<BigUint, DiscoveryError> {
    if params.token_in.trim().is_empty() || params.token_out.trim().is_empty() {
        return Err(DiscoveryError::InvalidTokenPair(
            "input and output tokens are required".to_string(),
        ));
    }
    if params.token_in == params.token_out {
        return Err(DiscoveryError::InvalidTokenPair(
            "input and output tokens are identical".to_string(),
        ));
    }
    let amount_out = parse_amount(&params.amount_out)?;
    if amount_out.is_zero() {
        return Err(DiscoveryError::NonPositiveAmount);
    }
    Ok(amount_out)
}

/// Reloads the pool snapshot and rebuilds the engine's graph. Returns the pool count.
pub fn refresh_pool_data(config: &RouterConfig, engine: &PathDiscoveryEngine) -> Result<usize> {
    let snapshot_path = config.pool_snapshot_path();
    let pools = read_pool_snapshot(&snapshot_path)?;
    let pool_count = pools.len();
    engine.rebuild(pools);
    info!("Loaded {} pools from {}", pool_count, snapshot_path.display());
    Ok(pool_count)
}

pub fn get_paths(
    engine: &PathDiscoveryEngine,
    params: PathQuery,
) -> Result<PathResponse, DiscoveryError> {
    let request = PathDiscoveryRequest {
        amount_out: parse_amount(&params.amount_out)?,
        token_in: params.token_in,
        token_out: params.token_out,
        chain_id: params.chain_id,
        max_hops: params.max_hops,
        slippage_tolerance: params.slippage_tolerance,
    };
    let result = engine.discover_paths(&request)?;

    let slippage = request.slippage_tolerance;
    Ok(PathResponse {
        paths: result
            .paths
            .iter()
            .map(|path| build_response_path(path, slippage))
            .collect(),
        best_path: result
            .best_path
            .as_ref()
            .map(|path| build_response_path(path, slippage)),
        metadata: ResponseMetadata {
            search_time: result.metadata.search_time.as_secs_f64() * 1000.0,
            paths_evaluated: result.metadata.paths_evaluated,
            pools_considered: result.metadata.pools_considered,
            chain_id: result.metadata.chain_id,
            cache_hit: result.metadata.cache_hit,
        },
    })
}

pub fn get_best_shard(
    engine: &PathDiscoveryEngine,
    params: ShardQuery,
) -> Result<ShardComparisonResponse, DiscoveryError> {
    let amount_out = validate_pair_query(&params)?;
    let quotes = engine.compare_pair_shards(&params.token_in, &params.token_out, &amount_out)?;

    let shards: Vec<ResponseShard> = quotes
        .iter()
        .map(|shard| build_response_shard(shard, &params.token_in))
        .collect();
    let best_shard = shards.iter().find(|shard| shard.within_threshold).cloned();
    let c_smaller_better = best_shard.as_ref().is_some_and(|shard| shard.smallest);

    Ok(ShardComparisonResponse {
        token_in: params.token_in,
        token_out: params.token_out,
        amount_out: amount_out.to_string(),
        shards,
        best_shard,
        c_smaller_better,
    })
}

pub fn get_cross_pool_quote(
    config: &RouterConfig,
    engine: &PathDiscoveryEngine,
    params: ShardQuery,
) -> Result<Option<CrossPoolResponse>, DiscoveryError> {
    let amount_out = validate_pair_query(&params)?;
    let bridge_token = params
        .bridge_token
        .clone()
        .unwrap_or_else(|| config.bridge_token.clone());

    let quote = engine.quote_via_bridge(
        &params.token_in,
        &params.token_out,
        &amount_out,
        &bridge_token,
    )?;
    Ok(quote.map(|quote| CrossPoolResponse {
        token_in: params.token_in,
        token_out: params.token_out,
        amount_out: amount_out.to_string(),
        amount_in: quote.total_amount_in.to_string(),
        total_fee: quote.total_fee.to_string(),
        via_bridge: quote.via_bridge,
        steps: quote.steps.iter().map(build_response_hop).collect(),
    }))
}

pub fn get_stats(engine: &PathDiscoveryEngine) -> StatsResponse {
    let stats = engine.get_stats();
    let graph = engine.graph();
    StatsResponse {
        total_searches: stats.total_searches,
        total_paths_found: stats.total_paths_found,
        average_search_time_ms: stats.average_search_time_ms,
        cache_hits: stats.cache_hits,
        tokens: graph.token_count(),
        pools: graph.pool_count(),
        last_rebuilt: graph.last_rebuilt,
    }
}

fn build_response_path(path: &SwapPath, slippage: Option<f64>) -> ResponsePath {
    ResponsePath {
        hops: path.hops.iter().map(build_response_hop).collect(),
        total_amount_in: path.total_amount_in.to_string(),
        amount_out: path.amount_out.to_string(),
        total_fee: path.total_fee.to_string(),
        total_price_impact: path.total_price_impact,
        efficiency_score: path.efficiency_score,
        estimated_gas: path.estimated_gas,
        chain_id: path.chain_id,
        created_at: path.created_at,
        max_amount_in: slippage
            .map(|tolerance| apply_slippage(&path.total_amount_in, tolerance).to_string()),
    }
}

fn build_response_hop(hop: &SwapHop) -> ResponseHop {
    ResponseHop {
        pool_address: hop.pool_address.clone(),
        token_in: hop.token_in.address.clone(),
        token_out: hop.token_out.address.clone(),
        token_in_symbol: hop.token_in.symbol.clone(),
        token_out_symbol: hop.token_out.symbol.clone(),
        amount_in: hop.amount_in.to_string(),
        amount_out: hop.amount_out.to_string(),
        fee: hop.fee.to_string(),
        price_impact: hop.price_impact,
        smallest_shard: hop.smallest_shard,
        position: hop.position,
    }
}

fn build_response_shard(shard: &ShardQuote, token_in: &str) -> ResponseShard {
    ResponseShard {
        pool_address: shard.pool.address.clone(),
        amount_in: shard.quote.amount_in.to_string(),
        fee: shard.quote.fee.to_string(),
        price_impact: shard.quote.price_impact,
        max_admissible_input: max_admissible_input(&shard.pool, token_in).to_string(),
        within_threshold: shard.within_threshold,
        smallest: shard.smallest,
    }
}
