mod common;

use common::{fee_free, pool, with_c, DAI, USDC, WETH};
use num_bigint::BigUint;
use samm_router::core::error::QuoteError;
use samm_router::core::shard::{
    compare_shards, max_admissible_input, select_shard, validate_c_threshold,
};
use samm_router::core::swap_math::{amount_in_before_fee, apply_slippage, quote};
use samm_router::core::types::FeeFraction;
use std::sync::Arc;

#[test]
fn quote_worked_example() {
    let pool = pool("0xp1", WETH, USDC, 100, 100);
    let quote = quote(&pool, WETH, USDC, &BigUint::from(10u32)).unwrap();

    assert_eq!(quote.amount_in_before_fee, BigUint::from(11u32));
    assert_eq!(quote.fee, BigUint::from(0u32));
    assert_eq!(quote.amount_in, BigUint::from(11u32));
    // spot 1.0, execution 10/11
    assert!((quote.price_impact - 9.0909).abs() < 1e-3);
}

#[test]
fn quote_charges_floor_fee() {
    let pool = pool("0xp1", WETH, USDC, 1_000_000, 1_000_000);
    let quote = quote(&pool, USDC, WETH, &BigUint::from(100_000u32)).unwrap();

    // floor(1_000_000 * 100_000 / 900_000) = 111_111, fee rate 2500 / 1e6
    assert_eq!(quote.amount_in_before_fee, BigUint::from(111_111u32));
    assert_eq!(quote.fee, BigUint::from(277u32));
    assert_eq!(quote.amount_in, BigUint::from(111_388u32));
}

#[test]
fn floor_division_stays_within_one_unit_of_the_invariant() {
    for reserve_in in [1u64, 7, 100, 997, 1_000_003] {
        for reserve_out in [2u64, 13, 100, 1_024, 5_000_000] {
            for desired_out in [1u64, 3, 50, 999, 4_999_999] {
                if desired_out >= reserve_out {
                    continue;
                }
                let (r_in, r_out, d_out) = (
                    BigUint::from(reserve_in),
                    BigUint::from(reserve_out),
                    BigUint::from(desired_out),
                );
                let a = amount_in_before_fee(&r_in, &r_out, &d_out).unwrap();
                let k = &r_in * &r_out;
                let remaining = &r_out - &d_out;

                assert!((&r_in + &a) * &remaining <= k);
                assert!((&r_in + &a + 1u32) * &remaining > k);
            }
        }
    }
}

#[test]
fn quote_rejects_output_at_or_above_reserve() {
    let pool = pool("0xp1", WETH, USDC, 100, 100);
    assert_eq!(
        quote(&pool, WETH, USDC, &BigUint::from(100u32)),
        Err(QuoteError::InsufficientReserve("0xp1".to_string()))
    );
    assert_eq!(
        quote(&pool, WETH, USDC, &BigUint::from(0u32)),
        Err(QuoteError::ZeroOutput)
    );
}

#[test]
fn quote_flags_malformed_pools() {
    let mut broken = pool("0xp1", WETH, USDC, 100, 100);
    broken.trade_fee = FeeFraction {
        numerator: 25,
        denominator: 0,
    };
    let err = quote(&broken, WETH, USDC, &BigUint::from(10u32)).unwrap_err();
    assert!(err.is_malformed_pool());

    let healthy = pool("0xp2", WETH, USDC, 100, 100);
    let err = quote(&healthy, WETH, DAI, &BigUint::from(10u32)).unwrap_err();
    assert!(matches!(err, QuoteError::UnknownToken { .. }));
}

#[test]
fn c_threshold_worked_example() {
    let pool = with_c(pool("0xp1", WETH, USDC, 100, 100), 10_400);

    assert_eq!(max_admissible_input(&pool, WETH), BigUint::from(1u32));
    assert!(validate_c_threshold(&pool, &BigUint::from(1u32), WETH));
    assert!(!validate_c_threshold(&pool, &BigUint::from(11u32), WETH));
}

#[test]
fn c_threshold_boundary_is_inclusive() {
    let pool = with_c(pool("0xp1", WETH, USDC, 100, 100), 100_000);

    assert!(validate_c_threshold(&pool, &BigUint::from(10u32), WETH));
    assert!(!validate_c_threshold(&pool, &BigUint::from(11u32), WETH));
}

#[test]
fn c_threshold_rejects_zero_reserve() {
    let pool = pool("0xp1", WETH, USDC, 0, 100);
    assert!(!validate_c_threshold(&pool, &BigUint::from(0u32), WETH));
    assert!(!validate_c_threshold(&pool, &BigUint::from(1u32), DAI));
}

#[test]
fn select_shard_prefers_cheapest_admissible_shard() {
    let small = Arc::new(fee_free(pool("0xsmall", WETH, USDC, 1_000, 1_000)));
    let large = Arc::new(fee_free(pool("0xlarge", WETH, USDC, 10_000, 10_000)));
    let shards = vec![Arc::clone(&small), Arc::clone(&large)];
    let desired = BigUint::from(100u32);

    let ranked = compare_shards(&shards, WETH, USDC, &desired).unwrap();
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].pool.address, "0xlarge");
    assert_eq!(ranked[0].quote.amount_in, BigUint::from(101u32));
    assert_eq!(ranked[1].quote.amount_in, BigUint::from(111u32));
    assert!(ranked[1].smallest);

    let selected = select_shard(&shards, WETH, USDC, &desired).unwrap().unwrap();
    assert_eq!(selected.pool.address, "0xlarge");
    assert!(!selected.smallest);
}

#[test]
fn select_shard_skips_shards_over_their_threshold() {
    let small = Arc::new(fee_free(pool("0xsmall", WETH, USDC, 1_000, 1_000)));
    // max admissible input 50
    let large = Arc::new(with_c(
        fee_free(pool("0xlarge", WETH, USDC, 10_000, 10_000)),
        5_000,
    ));
    let shards = vec![small, large];

    let selected = select_shard(&shards, WETH, USDC, &BigUint::from(100u32))
        .unwrap()
        .unwrap();
    assert_eq!(selected.pool.address, "0xsmall");
    assert!(selected.smallest);

    let none = select_shard(&shards[1..], WETH, USDC, &BigUint::from(100u32)).unwrap();
    assert!(none.is_none());
}

#[test]
fn slippage_bound_uses_basis_points() {
    assert_eq!(
        apply_slippage(&BigUint::from(1_000u32), 0.5),
        BigUint::from(1_005u32)
    );
    assert_eq!(
        apply_slippage(&BigUint::from(999u32), 1.0),
        BigUint::from(1_008u32)
    );
}
