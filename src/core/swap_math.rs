//! Constant-product pricing for exact-output swaps.
//!
//! All amount arithmetic is floor division on `BigUint`, matching on-chain
//! settlement. Price impact is the only floating-point value and is for
//! display and scoring.

use super::constants::{BPS_SCALE, FEE_RATE_SCALE};
use super::error::QuoteError;
use super::types::{FeeFraction, Pool};
use num_bigint::BigUint;
use num_traits::Zero;

#[derive(Clone, Debug, PartialEq)]
pub struct SwapQuote {
    pub amount_in_before_fee: BigUint,
    pub fee: BigUint,
    pub amount_in: BigUint,
    pub price_impact: f64,
}

/// Input needed to take `desired_out` from the pool without fees:
/// `floor(reserve_in * desired_out / (reserve_out - desired_out))`.
///
/// Returns `None` when `desired_out >= reserve_out`.
pub fn amount_in_before_fee(
    reserve_in: &BigUint,
    reserve_out: &BigUint,
    desired_out: &BigUint,
) -> Option<BigUint> {
    if desired_out >= reserve_out {
        return None;
    }
    let numerator = reserve_in * desired_out;
    let denominator = reserve_out - desired_out;
    Some(numerator / denominator)
}

pub fn fee_rate_scaled(fee: &FeeFraction) -> Option<BigUint> {
    if fee.denominator == 0 {
        return None;
    }
    Some(BigUint::from(fee.numerator) * BigUint::from(FEE_RATE_SCALE) / BigUint::from(fee.denominator))
}

pub fn price_impact(
    reserve_in: &BigUint,
    reserve_out: &BigUint,
    desired_out: &BigUint,
    amount_in: &BigUint,
) -> f64 {
    if reserve_in.is_zero() || amount_in.is_zero() {
        return 0.0;
    }
    let spot_price = Pool::to_f64(reserve_out) / Pool::to_f64(reserve_in);
    if spot_price == 0.0 || !spot_price.is_finite() {
        return 0.0;
    }
    let execution_price = Pool::to_f64(desired_out) / Pool::to_f64(amount_in);
    (execution_price - spot_price).abs() / spot_price * 100.0
}

/// Prices an exact-output swap of `token_in` for `desired_out` of `token_out`.
pub fn quote(
    pool: &Pool,
    token_in: &str,
    token_out: &str,
    desired_out: &BigUint,
) -> Result<SwapQuote, QuoteError> {
    let (reserve_in, reserve_out) =
        pool.reserves_for(token_in).ok_or_else(|| QuoteError::UnknownToken {
            pool: pool.address.clone(),
            token: token_in.to_string(),
        })?;
    if pool.other_token(token_in).map(|t| t.address.as_str()) != Some(token_out) {
        return Err(QuoteError::UnknownToken {
            pool: pool.address.clone(),
            token: token_out.to_string(),
        });
    }
    let fee_rate = fee_rate_scaled(&pool.trade_fee)
        .ok_or_else(|| QuoteError::ZeroFeeDenominator(pool.address.clone()))?;
    if desired_out.is_zero() {
        return Err(QuoteError::ZeroOutput);
    }

    let before_fee = amount_in_before_fee(reserve_in, reserve_out, desired_out)
        .ok_or_else(|| QuoteError::InsufficientReserve(pool.address.clone()))?;
    let fee = &before_fee * fee_rate / BigUint::from(FEE_RATE_SCALE);
    let amount_in = &before_fee + &fee;
    let price_impact = price_impact(reserve_in, reserve_out, desired_out, &amount_in);

    Ok(SwapQuote {
        amount_in_before_fee: before_fee,
        fee,
        amount_in,
        price_impact,
    })
}

/// Upper bound on input after applying a percentage slippage tolerance.
pub fn apply_slippage(amount_in: &BigUint, tolerance_pct: f64) -> BigUint {
    let tolerance_bps = (tolerance_pct * 100.0).round().max(0.0) as u64;
    amount_in * BigUint::from(BPS_SCALE + tolerance_bps) / BigUint::from(BPS_SCALE)
}
