use super::constants::now_millis;
use super::types::{Pool, Token};
use arc_swap::ArcSwap;
use log::{debug, info};
use num_bigint::BigUint;
use num_traits::Zero;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Canonical key for an unordered token pair: the two addresses in lexicographic order.
pub fn pair_key(token_a: &str, token_b: &str) -> String {
    if token_a <= token_b {
        format!("{}:{}", token_a, token_b)
    } else {
        format!("{}:{}", token_b, token_a)
    }
}

#[derive(Clone, Debug)]
pub struct TokenGraphNode {
    pub token: Token,
    // neighbor address -> pools connecting the two tokens, in registry order
    pub neighbors: BTreeMap<String, Vec<Arc<Pool>>>,
    pub total_liquidity: BigUint,
    pub pool_count: usize,
}

impl TokenGraphNode {
    fn new(token: Token) -> Self {
        Self {
            token,
            neighbors: BTreeMap::new(),
            total_liquidity: BigUint::zero(),
            pool_count: 0,
        }
    }
}

/// Immutable adjacency snapshot over one chain's pools.
#[derive(Clone, Debug)]
pub struct TokenGraph {
    pub chain_id: u64,
    pub nodes: HashMap<String, TokenGraphNode>,
    pub pairs: BTreeMap<String, Vec<Arc<Pool>>>,
    pub pools: HashMap<String, Arc<Pool>>,
    pub last_rebuilt: u64,
}

impl TokenGraph {
    pub fn empty(chain_id: u64) -> Self {
        Self {
            chain_id,
            nodes: HashMap::new(),
            pairs: BTreeMap::new(),
            pools: HashMap::new(),
            last_rebuilt: now_millis(),
        }
    }

    /// Builds a graph from a full pool list. Pools on another chain are skipped.
    pub fn build(chain_id: u64, pools: Vec<Pool>) -> Self {
        let mut graph = Self::empty(chain_id);
        let mut skipped = 0;

        for pool in pools {
            if pool.chain_id != chain_id {
                skipped += 1;
                continue;
            }
            graph.add_pool(Arc::new(pool));
        }

        if skipped > 0 {
            debug!("Skipped {} pools not on chain {}", skipped, chain_id);
        }
        graph
    }

    fn add_pool(&mut self, pool: Arc<Pool>) {
        let liquidity = pool.total_liquidity();

        // Add both directions since the pair is unordered
        for (token, other) in [(&pool.token0, &pool.token1), (&pool.token1, &pool.token0)] {
            let node = self
                .nodes
                .entry(token.address.clone())
                .or_insert_with(|| TokenGraphNode::new(token.clone()));
            node.neighbors
                .entry(other.address.clone())
                .or_default()
                .push(Arc::clone(&pool));
            node.total_liquidity += &liquidity;
            node.pool_count += 1;
        }

        self.pairs
            .entry(pair_key(&pool.token0.address, &pool.token1.address))
            .or_default()
            .push(Arc::clone(&pool));
        self.pools.insert(pool.address.clone(), pool);
    }

    pub fn token(&self, address: &str) -> Option<&Token> {
        self.nodes.get(address).map(|node| &node.token)
    }

    pub fn pools_between(&self, token_a: &str, token_b: &str) -> &[Arc<Pool>] {
        self.pairs
            .get(&pair_key(token_a, token_b))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn pool(&self, address: &str) -> Option<&Arc<Pool>> {
        self.pools.get(address)
    }

    /// One representative (token0, token1) per non-empty pair bucket.
    pub fn list_tradable_pairs(&self) -> Vec<(Token, Token)> {
        self.pairs
            .values()
            .filter_map(|pools| pools.first())
            .map(|pool| (pool.token0.clone(), pool.token1.clone()))
            .collect()
    }

    pub fn token_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }
}

/// Published graph for one chain. Readers always see a complete snapshot;
/// `rebuild` builds the replacement off to the side and swaps it in.
pub struct SharedTokenGraph {
    chain_id: u64,
    current: ArcSwap<TokenGraph>,
}

impl SharedTokenGraph {
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            current: ArcSwap::from_pointee(TokenGraph::empty(chain_id)),
        }
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn rebuild(&self, pools: Vec<Pool>) {
        let graph = TokenGraph::build(self.chain_id, pools);
        info!(
            "Rebuilt token graph for chain {}: {} tokens, {} pools, {} pairs",
            self.chain_id,
            graph.token_count(),
            graph.pool_count(),
            graph.pairs.len()
        );
        self.current.store(Arc::new(graph));
    }

    pub fn snapshot(&self) -> Arc<TokenGraph> {
        self.current.load_full()
    }
}
