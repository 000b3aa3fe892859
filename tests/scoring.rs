mod common;

use common::{token, CHAIN_ID, DAI, USDC, WETH};
use num_bigint::BigUint;
use samm_router::core::scoring::{efficiency_score, rank_paths};
use samm_router::core::types::{SwapHop, SwapPath};

fn hop(token_in: &str, token_out: &str, fee: u64, price_impact: f64, smallest: bool) -> SwapHop {
    SwapHop {
        pool_address: format!("{}-{}", token_in, token_out),
        token_in: token(token_in),
        token_out: token(token_out),
        amount_in: BigUint::from(1_000u32),
        amount_out: BigUint::from(900u32),
        fee: BigUint::from(fee),
        price_impact,
        smallest_shard: smallest,
        position: 0,
    }
}

fn path(hops: Vec<SwapHop>) -> SwapPath {
    SwapPath::from_hops(hops, CHAIN_ID).unwrap()
}

#[test]
fn score_penalises_hops_and_impact() {
    let scored = path(vec![
        hop(WETH, USDC, 3, 1.0, true),
        hop(USDC, DAI, 2, 2.0, false),
    ]);
    // 100 - 10 * 1 - 2 * 3.0 + 5 * 1
    assert!((scored.efficiency_score - 89.0).abs() < 1e-9);
    assert_eq!(scored.total_fee, BigUint::from(5u32));
    assert_eq!(scored.hops[1].position, 1);
    assert_eq!(scored.estimated_gas, 21_000 + 2 * 90_000);
}

#[test]
fn score_is_clamped() {
    assert_eq!(path(vec![hop(WETH, USDC, 0, 60.0, false)]).efficiency_score, 0.0);
    assert_eq!(path(vec![hop(WETH, USDC, 0, 0.0, true)]).efficiency_score, 100.0);
}

#[test]
fn empty_hop_list_is_not_a_path() {
    assert!(SwapPath::from_hops(Vec::new(), CHAIN_ID).is_none());
}

#[test]
fn ranking_breaks_ties_on_fee_then_hops() {
    let expensive = path(vec![hop(WETH, DAI, 10, 0.0, false)]);
    let cheap = path(vec![hop(WETH, DAI, 4, 0.0, false)]);
    let mut two_hops = path(vec![
        hop(WETH, USDC, 2, 0.0, false),
        hop(USDC, DAI, 2, 0.0, false),
    ]);
    // Same score and fee as `cheap`, one more hop
    two_hops.efficiency_score = cheap.efficiency_score;
    let highest_fee = path(vec![hop(WETH, DAI, 50, 0.0, true)]);
    let mut worse = cheap.clone();
    worse.efficiency_score = 42.0;

    let mut paths = vec![
        worse.clone(),
        two_hops.clone(),
        expensive.clone(),
        cheap.clone(),
        highest_fee.clone(),
    ];
    rank_paths(&mut paths);

    let order: Vec<(f64, BigUint, usize)> = paths
        .iter()
        .map(|p| (p.efficiency_score, p.total_fee.clone(), p.hop_count()))
        .collect();
    assert_eq!(
        order,
        vec![
            (100.0, BigUint::from(4u32), 1),
            (100.0, BigUint::from(4u32), 2),
            (100.0, BigUint::from(10u32), 1),
            (100.0, BigUint::from(50u32), 1),
            (42.0, BigUint::from(4u32), 1),
        ]
    );
    assert_eq!(efficiency_score(&paths[0]), 100.0);
}
