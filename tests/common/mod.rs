#![allow(dead_code)]

use num_bigint::BigUint;
use samm_router::core::paths::PathDiscoveryEngine;
use samm_router::core::types::{
    DiscoveryConfig, FeeFraction, Pool, PoolStatus, SammParams, Token,
};

pub const CHAIN_ID: u64 = 1;

pub const WETH: &str = "0x0a";
pub const USDC: &str = "0x0b";
pub const DAI: &str = "0x0c";
pub const WBTC: &str = "0x0d";

pub fn token(address: &str) -> Token {
    let symbol = match address {
        WETH => "WETH",
        USDC => "USDC",
        DAI => "DAI",
        WBTC => "WBTC",
        _ => "TKN",
    };
    Token::new(address, symbol, 18)
}

/// Constant-product shard with a 0.25% trade fee and c = 1 (any trade up to the reserve).
pub fn pool(address: &str, token0: &str, token1: &str, reserve0: u64, reserve1: u64) -> Pool {
    Pool {
        address: address.to_string(),
        token0: token(token0),
        token1: token(token1),
        reserve0: BigUint::from(reserve0),
        reserve1: BigUint::from(reserve1),
        total_supply: BigUint::from(reserve0.min(reserve1)),
        trade_fee: FeeFraction {
            numerator: 25,
            denominator: 10_000,
        },
        owner_fee: FeeFraction {
            numerator: 5,
            denominator: 10_000,
        },
        samm: SammParams {
            beta1: -1_050_000,
            rmin: 1_000,
            rmax: 12_000,
            c: 1_000_000,
        },
        status: PoolStatus::Active,
        chain_id: CHAIN_ID,
    }
}

pub fn fee_free(mut pool: Pool) -> Pool {
    pool.trade_fee = FeeFraction {
        numerator: 0,
        denominator: 1,
    };
    pool
}

pub fn with_c(mut pool: Pool, c: u64) -> Pool {
    pool.samm.c = c;
    pool
}

pub fn engine_with(pools: Vec<Pool>) -> PathDiscoveryEngine {
    engine_with_config(pools, DiscoveryConfig::new(CHAIN_ID))
}

pub fn engine_with_config(pools: Vec<Pool>, config: DiscoveryConfig) -> PathDiscoveryEngine {
    let engine = PathDiscoveryEngine::new(config);
    engine.rebuild(pools);
    engine
}
