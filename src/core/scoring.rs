use super::constants::{
    C_THRESHOLD_FACTOR, EXTRA_HOP_PENALTY, HOP_IMPACT_FACTOR, HOP_IMPACT_WARN_PCT,
    LOW_LIQUIDITY_FACTOR, PATH_IMPACT_FACTOR, PATH_IMPACT_WARN_PCT, PRICE_IMPACT_WEIGHT,
    SCORE_BASE, SMALLEST_SHARD_BONUS,
};
use super::shard::validate_c_threshold;
use super::token_graph::TokenGraph;
use super::types::SwapPath;
use num_bigint::BigUint;
use serde::Serialize;
use std::cmp::Ordering;

/// Heuristic in [0, 100]: fewer hops, lower price impact and smallest-shard
/// selections score higher.
pub fn efficiency_score(path: &SwapPath) -> f64 {
    let extra_hops = path.hops.len().saturating_sub(1) as f64;
    let smallest_shard_hops = path.hops.iter().filter(|hop| hop.smallest_shard).count() as f64;

    let score = SCORE_BASE - EXTRA_HOP_PENALTY * extra_hops
        - PRICE_IMPACT_WEIGHT * path.total_price_impact
        + SMALLEST_SHARD_BONUS * smallest_shard_hops;

    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, SCORE_BASE)
}

// Score descending, then total fee ascending, then hop count ascending
fn compare_paths(a: &SwapPath, b: &SwapPath) -> Ordering {
    b.efficiency_score
        .total_cmp(&a.efficiency_score)
        .then_with(|| a.total_fee.cmp(&b.total_fee))
        .then_with(|| a.hop_count().cmp(&b.hop_count()))
}

pub fn rank_paths(paths: &mut [SwapPath]) {
    paths.sort_by(compare_paths);
}

#[derive(Clone, Debug, Serialize)]
pub struct PathValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub success_probability: f64,
}

/// Re-checks a previously discovered path against the pools in `graph`.
pub fn validate_path(
    path: &SwapPath,
    graph: &TokenGraph,
    max_hops: usize,
    low_liquidity_threshold: &BigUint,
) -> PathValidation {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut success_probability = 1.0;

    if path.hops.is_empty() {
        errors.push("path has no hops".to_string());
    }
    if path.hops.len() > max_hops {
        errors.push(format!(
            "path has {} hops, maximum is {}",
            path.hops.len(),
            max_hops
        ));
    }

    for hop in &path.hops {
        let pool = match graph.pool(&hop.pool_address) {
            Some(pool) => pool,
            None => {
                errors.push(format!("pool {} is no longer listed", hop.pool_address));
                continue;
            }
        };

        if !pool.is_active() {
            errors.push(format!("pool {} is not active", pool.address));
        }
        if &pool.total_liquidity() < low_liquidity_threshold {
            warnings.push(format!("pool {} has low liquidity", pool.address));
            success_probability *= LOW_LIQUIDITY_FACTOR;
        }
        if !validate_c_threshold(pool, &hop.amount_in, &hop.token_in.address) {
            warnings.push(format!(
                "hop {} exceeds the c-threshold of pool {}",
                hop.position, pool.address
            ));
            success_probability *= C_THRESHOLD_FACTOR;
        }
        if hop.price_impact > HOP_IMPACT_WARN_PCT {
            warnings.push(format!(
                "hop {} has price impact {:.2}%",
                hop.position, hop.price_impact
            ));
            success_probability *= HOP_IMPACT_FACTOR;
        }
    }

    if path.total_price_impact > PATH_IMPACT_WARN_PCT {
        warnings.push(format!(
            "total price impact {:.2}% is high",
            path.total_price_impact
        ));
        success_probability *= PATH_IMPACT_FACTOR;
    }

    PathValidation {
        is_valid: errors.is_empty(),
        errors,
        warnings,
        success_probability: f64::max(success_probability, 0.0),
    }
}
