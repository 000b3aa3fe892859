mod common;

use common::{engine_with, pool, CHAIN_ID, DAI, USDC, WETH};
use num_bigint::BigUint;
use samm_router::core::cache::PathCache;
use samm_router::core::indexer::pool::{read_pool_snapshot, write_pool_snapshot};
use samm_router::core::token_graph::{pair_key, SharedTokenGraph, TokenGraph};
use samm_router::core::types::{AmountEstimation, DiscoveryConfig, PathDiscoveryRequest};
use samm_router::orchestrator::refresh_pool_data;
use samm_router::types::RouterConfig;
use std::fs;
use std::path::PathBuf;
use std::thread::sleep;
use std::time::Duration;

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("samm-router-{}-{}", name, std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn pair_key_is_order_independent() {
    assert_eq!(pair_key(WETH, USDC), pair_key(USDC, WETH));
    assert_ne!(pair_key(WETH, USDC), pair_key(WETH, DAI));
}

#[test]
fn build_indexes_pools_in_both_directions() {
    let mut foreign = pool("0xp4", WETH, DAI, 1_000, 1_000);
    foreign.chain_id = CHAIN_ID + 1;
    let graph = TokenGraph::build(
        CHAIN_ID,
        vec![
            pool("0xp1", WETH, USDC, 100, 200),
            pool("0xp2", USDC, WETH, 300, 400),
            pool("0xp3", USDC, DAI, 10, 20),
            foreign,
        ],
    );

    assert_eq!(graph.token_count(), 3);
    assert_eq!(graph.pool_count(), 3);
    assert_eq!(graph.pools_between(WETH, USDC).len(), 2);
    assert_eq!(graph.pools_between(USDC, WETH).len(), 2);
    assert!(graph.pools_between(WETH, DAI).is_empty());
    assert!(graph.pool("0xp4").is_none());

    let weth = &graph.nodes[WETH];
    assert_eq!(weth.neighbors[USDC].len(), 2);
    assert_eq!(weth.pool_count, 2);
    assert_eq!(weth.total_liquidity, BigUint::from(1_000u32));
    let usdc = &graph.nodes[USDC];
    assert_eq!(usdc.neighbors.len(), 2);
    assert_eq!(usdc.total_liquidity, BigUint::from(1_030u32));

    let pairs = graph.list_tradable_pairs();
    assert_eq!(pairs.len(), 2);
}

#[test]
fn rebuild_swaps_whole_snapshot() {
    let shared = SharedTokenGraph::new(CHAIN_ID);
    shared.rebuild(vec![pool("0xp1", WETH, USDC, 100, 100)]);
    let before = shared.snapshot();

    shared.rebuild(vec![pool("0xp3", USDC, DAI, 100, 100)]);
    let after = shared.snapshot();

    // Readers holding the old snapshot keep a complete view of it
    assert!(before.pool("0xp1").is_some());
    assert!(before.pool("0xp3").is_none());
    assert!(after.pool("0xp1").is_none());
    assert!(after.nodes.get(WETH).is_none());
    assert_eq!(after.chain_id, CHAIN_ID);
}

#[test]
fn path_cache_evicts_whole_entry_once_stale() {
    let engine = engine_with(vec![pool("0xp1", WETH, USDC, 1_000, 1_000)]);
    let request = PathDiscoveryRequest::new(WETH, USDC, BigUint::from(10u32), CHAIN_ID);
    let paths = engine.discover_paths(&request).unwrap().paths;

    let cache = PathCache::new(Duration::from_millis(100));
    assert!(cache.get(&request, 3).is_none());
    cache.put(&request, 3, paths.clone());
    assert_eq!(cache.get(&request, 3).map(|p| p.len()), Some(paths.len()));

    let other = PathDiscoveryRequest::new(WETH, USDC, BigUint::from(11u32), CHAIN_ID);
    assert!(cache.get(&other, 3).is_none());
    // A different hop bound is a different entry
    assert!(cache.get(&request, 2).is_none());

    sleep(Duration::from_millis(150));
    assert!(cache.get(&request, 3).is_none());
    assert!(cache.is_empty());

    cache.put(&request, 3, paths);
    cache.clear();
    assert_eq!(cache.len(), 0);
}

#[test]
fn stale_eviction_never_drops_a_fresh_entry() {
    let engine = engine_with(vec![pool("0xp1", WETH, USDC, 1_000, 1_000)]);
    let request = PathDiscoveryRequest::new(WETH, USDC, BigUint::from(10u32), CHAIN_ID);
    let fresh = engine.discover_paths(&request).unwrap().paths;
    let mut stale = fresh.clone();
    for path in &mut stale {
        path.created_at = 0;
    }

    let cache = PathCache::new(Duration::from_secs(60));
    for _ in 0..200 {
        cache.put(&request, 3, stale.clone());
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..50 {
                        cache.get(&request, 3);
                    }
                });
            }
            scope.spawn(|| cache.put(&request, 3, fresh.clone()));
        });

        // Readers racing the put may only evict the stale entry
        assert_eq!(cache.get(&request, 3).map(|p| p.len()), Some(fresh.len()));
    }
}

#[test]
fn snapshot_round_trip_feeds_rebuild() {
    let dir = temp_dir("snapshot");
    let config = RouterConfig {
        working_dir: dir.to_string_lossy().to_string(),
        chain_id: CHAIN_ID,
        ..RouterConfig::default()
    };
    let pools = vec![
        pool("0xp1", WETH, USDC, 1_000, 2_000),
        pool("0xp2", USDC, DAI, 3_000, 4_000),
    ];
    write_pool_snapshot(config.pool_snapshot_path(), &pools).unwrap();

    let loaded = read_pool_snapshot(config.pool_snapshot_path()).unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].reserve1, BigUint::from(2_000u32));
    assert_eq!(loaded[1].samm, pools[1].samm);

    let engine = engine_with(vec![]);
    assert_eq!(refresh_pool_data(&config, &engine).unwrap(), 2);
    assert_eq!(engine.graph().pool_count(), 2);

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn missing_snapshot_keeps_previous_graph() {
    let config = RouterConfig {
        working_dir: temp_dir("missing").join("nowhere").to_string_lossy().to_string(),
        ..RouterConfig::default()
    };
    let engine = engine_with(vec![pool("0xp1", WETH, USDC, 1_000, 1_000)]);

    assert!(refresh_pool_data(&config, &engine).is_err());
    assert_eq!(engine.graph().pool_count(), 1);
}

#[test]
fn config_defaults_load_and_project() {
    let path = temp_dir("config").join("router_config.toml");
    let _ = fs::remove_file(&path);

    let config = RouterConfig::load_from(path.clone()).unwrap();
    assert_eq!(config.max_hops, 3);
    assert_eq!(config.max_paths, 10);
    assert_eq!(config.max_hops_limit, 6);
    assert_eq!(config.amount_estimation, AmountEstimation::FinalOutput);
    assert!(path.exists());

    let discovery = DiscoveryConfig::from(&config);
    assert_eq!(discovery.chain_id, config.chain_id);
    assert_eq!(discovery.cache_ttl, Duration::from_millis(config.cache_ttl_ms));
    assert_eq!(discovery.max_hops_limit, config.max_hops_limit);
    assert_eq!(
        discovery.low_liquidity_threshold,
        BigUint::from(config.low_liquidity_threshold)
    );
}
