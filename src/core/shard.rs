use super::constants::C_SCALE;
use super::error::QuoteError;
use super::swap_math::{quote, SwapQuote};
use super::types::Pool;
use num_bigint::BigUint;
use num_traits::Zero;
use std::sync::Arc;

/// Accepts iff `amount_in / reserve_in <= c / 1_000_000`.
///
/// Compared as `amount_in * 1_000_000 <= c * reserve_in` so no precision is lost.
/// A zero input-side reserve, or a token the pool does not trade, is rejected.
pub fn validate_c_threshold(pool: &Pool, amount_in: &BigUint, input_token: &str) -> bool {
    let reserve_in = match pool.reserve_of(input_token) {
        Some(reserve) if !reserve.is_zero() => reserve,
        _ => return false,
    };
    amount_in * BigUint::from(C_SCALE) <= BigUint::from(pool.samm.c) * reserve_in
}

/// Largest input admissible by the pool's c-threshold for `input_token`.
pub fn max_admissible_input(pool: &Pool, input_token: &str) -> BigUint {
    pool.reserve_of(input_token)
        .map(|reserve| reserve * BigUint::from(pool.samm.c) / BigUint::from(C_SCALE))
        .unwrap_or_default()
}

#[derive(Clone, Debug)]
pub struct ShardQuote {
    pub pool: Arc<Pool>,
    pub quote: SwapQuote,
    pub within_threshold: bool,
    // Smallest input-side reserve among two or more candidates
    pub smallest: bool,
}

/// Quotes every candidate shard of one pair, cheapest first.
///
/// Shards that cannot cover `desired_out` are left out. A malformed pool
/// record aborts the scan.
pub fn compare_shards(
    candidates: &[Arc<Pool>],
    token_in: &str,
    token_out: &str,
    desired_out: &BigUint,
) -> Result<Vec<ShardQuote>, QuoteError> {
    let smallest = smallest_shard(candidates, token_in);
    let mut quotes = Vec::with_capacity(candidates.len());

    for pool in candidates {
        let quote = match quote(pool, token_in, token_out, desired_out) {
            Ok(quote) => quote,
            Err(err) if err.is_malformed_pool() => return Err(err),
            Err(_) => continue,
        };
        let within_threshold = validate_c_threshold(pool, &quote.amount_in, token_in);
        quotes.push(ShardQuote {
            smallest: smallest.as_deref() == Some(pool.address.as_str()),
            pool: Arc::clone(pool),
            quote,
            within_threshold,
        });
    }

    quotes.sort_by(|a, b| a.quote.amount_in.cmp(&b.quote.amount_in));
    Ok(quotes)
}

/// Minimum-input shard that satisfies its own c-threshold.
pub fn select_shard(
    candidates: &[Arc<Pool>],
    token_in: &str,
    token_out: &str,
    desired_out: &BigUint,
) -> Result<Option<ShardQuote>, QuoteError> {
    Ok(compare_shards(candidates, token_in, token_out, desired_out)?
        .into_iter()
        .find(|shard| shard.within_threshold && !shard.quote.amount_in.is_zero()))
}

fn smallest_shard(candidates: &[Arc<Pool>], token_in: &str) -> Option<String> {
    if candidates.len() < 2 {
        return None;
    }
    candidates
        .iter()
        .filter_map(|pool| pool.reserve_of(token_in).map(|reserve| (reserve, pool)))
        .min_by(|a, b| a.0.cmp(b.0))
        .map(|(_, pool)| pool.address.clone())
}
