use super::cache::PathCache;
use super::error::{DiscoveryError, QuoteError};
use super::scoring::{rank_paths, validate_path, PathValidation};
use super::shard::{compare_shards, select_shard, validate_c_threshold, ShardQuote};
use super::token_graph::{SharedTokenGraph, TokenGraph};
use super::types::{
    AmountEstimation, DiscoveryConfig, EngineStats, PathDiscoveryRequest, PathDiscoveryResult,
    Pool, SearchMetadata, SwapHop, SwapPath, Token,
};
use log::debug;
use num_bigint::BigUint;
use num_traits::Zero;
use serde::Serialize;
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// One traversal edge before pricing: every eligible shard of the pair is kept.
#[derive(Clone, Debug)]
struct Leg {
    token_in: Token,
    token_out: Token,
    shards: Vec<Arc<Pool>>,
}

#[derive(Clone, Debug)]
struct Frontier {
    token: Token,
    legs: Vec<Leg>,
    // Priced hops, only tracked with AmountEstimation::FinalOutput
    hops: Vec<SwapHop>,
    visited: HashSet<String>,
}

#[derive(Default)]
struct SearchCounters {
    paths_evaluated: usize,
    pools_considered: usize,
}

#[derive(Default)]
struct DiscoveryStats {
    total_searches: AtomicU64,
    total_paths_found: AtomicU64,
    total_search_micros: AtomicU64,
    cache_hits: AtomicU64,
}

/// Result of routing through a bridging token when no direct pair is usable.
#[derive(Clone, Debug, Serialize)]
pub struct BridgeQuote {
    pub steps: Vec<SwapHop>,
    pub total_amount_in: BigUint,
    pub total_fee: BigUint,
    pub via_bridge: bool,
}

pub struct PathDiscoveryEngine {
    graph: SharedTokenGraph,
    config: DiscoveryConfig,
    cache: PathCache,
    stats: DiscoveryStats,
}

impl PathDiscoveryEngine {
    pub fn new(config: DiscoveryConfig) -> Self {
        Self {
            graph: SharedTokenGraph::new(config.chain_id),
            cache: PathCache::new(config.cache_ttl),
            config,
            stats: DiscoveryStats::default(),
        }
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// Replaces the token graph from a full pool list. Cached paths were priced
    /// against the previous reserves and are dropped.
    pub fn rebuild(&self, pools: Vec<Pool>) {
        self.graph.rebuild(pools);
        self.cache.clear();
    }

    pub fn graph(&self) -> Arc<TokenGraph> {
        self.graph.snapshot()
    }

    pub fn discover_paths(
        &self,
        request: &PathDiscoveryRequest,
    ) -> Result<PathDiscoveryResult, DiscoveryError> {
        let started = Instant::now();
        let graph = self.graph.snapshot();
        let (token_in, token_out) = self.validate_request(request, &graph)?;
        let max_hops = request.max_hops.unwrap_or(self.config.max_hops);
        self.stats.total_searches.fetch_add(1, Ordering::Relaxed);

        if self.config.cache_enabled {
            if let Some(paths) = self.cache.get(request, max_hops) {
                self.stats.cache_hits.fetch_add(1, Ordering::Relaxed);
                debug!("Path cache hit for {}", request.cache_key(max_hops));
                return Ok(PathDiscoveryResult {
                    best_path: paths.first().cloned(),
                    paths,
                    metadata: SearchMetadata {
                        search_time: started.elapsed(),
                        paths_evaluated: 0,
                        pools_considered: 0,
                        chain_id: request.chain_id,
                        cache_hit: true,
                    },
                });
            }
        }

        let mut counters = SearchCounters::default();
        let mut paths = self.direct_paths(&graph, &token_in, &token_out, request, &mut counters)?;
        paths.extend(self.multi_hop_paths(
            &graph,
            &token_in,
            &token_out,
            request,
            max_hops,
            &mut counters,
        )?);

        rank_paths(&mut paths);
        paths.truncate(self.config.max_paths);

        if self.config.cache_enabled && !paths.is_empty() {
            self.cache.put(request, max_hops, paths.clone());
        }

        let search_time = started.elapsed();
        self.stats
            .total_paths_found
            .fetch_add(paths.len() as u64, Ordering::Relaxed);
        self.stats
            .total_search_micros
            .fetch_add(search_time.as_micros() as u64, Ordering::Relaxed);
        debug!(
            "Discovered {} paths {} -> {} in {:?} ({} evaluated, {} pools considered)",
            paths.len(),
            token_in.symbol,
            token_out.symbol,
            search_time,
            counters.paths_evaluated,
            counters.pools_considered
        );

        Ok(PathDiscoveryResult {
            best_path: paths.first().cloned(),
            paths,
            metadata: SearchMetadata {
                search_time,
                paths_evaluated: counters.paths_evaluated,
                pools_considered: counters.pools_considered,
                chain_id: request.chain_id,
                cache_hit: false,
            },
        })
    }

    fn validate_request(
        &self,
        request: &PathDiscoveryRequest,
        graph: &TokenGraph,
    ) -> Result<(Token, Token), DiscoveryError> {
        if request.token_in.trim().is_empty() || request.token_out.trim().is_empty() {
            return Err(DiscoveryError::InvalidTokenPair(
                "input and output tokens are required".to_string(),
            ));
        }
        if request.token_in == request.token_out {
            return Err(DiscoveryError::InvalidTokenPair(
                "input and output tokens are identical".to_string(),
            ));
        }
        if request.amount_out.is_zero() {
            return Err(DiscoveryError::NonPositiveAmount);
        }
        if request.chain_id != self.config.chain_id {
            return Err(DiscoveryError::ChainMismatch {
                requested: request.chain_id,
                configured: self.config.chain_id,
            });
        }
        if let Some(requested) = request.max_hops {
            if requested > self.config.max_hops_limit {
                return Err(DiscoveryError::MaxHopsTooLarge {
                    requested,
                    limit: self.config.max_hops_limit,
                });
            }
        }
        if let Some(tolerance) = request.slippage_tolerance {
            if !(0.0..100.0).contains(&tolerance) {
                return Err(DiscoveryError::InvalidSlippage(tolerance));
            }
        }

        // Tokens unknown to the graph are valid requests with no routes
        let resolve = |address: &str| {
            graph
                .token(address)
                .cloned()
                .unwrap_or_else(|| Token::new(address, "", 0))
        };
        Ok((resolve(&request.token_in), resolve(&request.token_out)))
    }

    fn eligible_shards(&self, candidates: &[Arc<Pool>]) -> Vec<Arc<Pool>> {
        candidates
            .iter()
            .filter(|pool| {
                pool.is_active()
                    && pool.chain_id == self.config.chain_id
                    && pool.total_liquidity() >= self.config.min_liquidity
            })
            .cloned()
            .collect()
    }

    fn direct_paths(
        &self,
        graph: &TokenGraph,
        token_in: &Token,
        token_out: &Token,
        request: &PathDiscoveryRequest,
        counters: &mut SearchCounters,
    ) -> Result<Vec<SwapPath>, DiscoveryError> {
        let candidates = graph.pools_between(&token_in.address, &token_out.address);
        counters.pools_considered += candidates.len();
        let shards = self.eligible_shards(candidates);
        let quotes = compare_shards(
            &shards,
            &token_in.address,
            &token_out.address,
            &request.amount_out,
        )?;

        // Quotes are cheapest first, so the first admissible one is the selected shard
        let mut selected = false;
        let mut paths = Vec::new();
        for shard in quotes {
            counters.paths_evaluated += 1;
            if !shard.within_threshold || shard.quote.amount_in.is_zero() {
                continue;
            }
            let mut hop = hop_from_shard(shard, token_in, token_out, &request.amount_out, 0);
            hop.smallest_shard &= !selected;
            selected = true;
            paths.extend(SwapPath::from_hops(vec![hop], request.chain_id));
        }
        Ok(paths)
    }

    fn multi_hop_paths(
        &self,
        graph: &TokenGraph,
        token_in: &Token,
        token_out: &Token,
        request: &PathDiscoveryRequest,
        max_hops: usize,
        counters: &mut SearchCounters,
    ) -> Result<Vec<SwapPath>, DiscoveryError> {
        let mut paths = Vec::new();
        if max_hops < 2 {
            return Ok(paths);
        }

        let mut queue = VecDeque::new();
        queue.push_back(Frontier {
            token: token_in.clone(),
            legs: Vec::new(),
            hops: Vec::new(),
            visited: HashSet::from([token_in.address.clone()]),
        });

        while let Some(frontier) = queue.pop_front() {
            let node = match graph.nodes.get(&frontier.token.address) {
                Some(node) => node,
                None => continue,
            };
            let depth = frontier.legs.len() + 1;

            for (neighbor, candidates) in &node.neighbors {
                if frontier.visited.contains(neighbor) {
                    continue;
                }
                let completes = neighbor == &token_out.address;
                // Single-hop routes belong to the direct search
                if completes && depth == 1 {
                    continue;
                }
                if !completes && depth >= max_hops {
                    continue;
                }

                counters.pools_considered += candidates.len();
                let shards = self.eligible_shards(candidates);
                if shards.is_empty() {
                    continue;
                }
                let next_token = match graph.token(neighbor) {
                    Some(token) => token.clone(),
                    None => continue,
                };

                let mut hops = frontier.hops.clone();
                if self.config.amount_estimation == AmountEstimation::FinalOutput {
                    let shard = select_shard(
                        &shards,
                        &frontier.token.address,
                        neighbor,
                        &request.amount_out,
                    )?;
                    match shard {
                        Some(shard) => hops.push(hop_from_shard(
                            shard,
                            &frontier.token,
                            &next_token,
                            &request.amount_out,
                            depth - 1,
                        )),
                        None => continue,
                    }
                }

                let mut legs = frontier.legs.clone();
                legs.push(Leg {
                    token_in: frontier.token.clone(),
                    token_out: next_token.clone(),
                    shards,
                });

                if completes {
                    counters.paths_evaluated += 1;
                    let priced = match self.config.amount_estimation {
                        AmountEstimation::FinalOutput => Some(hops),
                        AmountEstimation::Backward => price_backward(&legs, &request.amount_out)?,
                    };
                    if let Some(hops) = priced {
                        paths.extend(SwapPath::from_hops(hops, request.chain_id));
                    }
                } else {
                    let mut visited = frontier.visited.clone();
                    visited.insert(neighbor.clone());
                    queue.push_back(Frontier {
                        token: next_token,
                        legs,
                        hops,
                        visited,
                    });
                }
            }
        }

        Ok(paths)
    }

    /// Quotes every shard of the pair for `amount_out`, cheapest first.
    pub fn compare_pair_shards(
        &self,
        token_in: &str,
        token_out: &str,
        amount_out: &BigUint,
    ) -> Result<Vec<ShardQuote>, DiscoveryError> {
        let graph = self.graph.snapshot();
        let shards = self.eligible_shards(graph.pools_between(token_in, token_out));
        Ok(compare_shards(&shards, token_in, token_out, amount_out)?)
    }

    /// Direct quote when the pair has an admissible shard, otherwise a two-step
    /// quote through `bridge_token`. `None` when neither route is admissible.
    pub fn quote_via_bridge(
        &self,
        token_in: &str,
        token_out: &str,
        amount_out: &BigUint,
        bridge_token: &str,
    ) -> Result<Option<BridgeQuote>, DiscoveryError> {
        let graph = self.graph.snapshot();
        let token = |address: &str| {
            graph
                .token(address)
                .cloned()
                .unwrap_or_else(|| Token::new(address, "", 0))
        };
        let (token_in, token_out, bridge) = (token(token_in), token(token_out), token(bridge_token));

        let direct = Leg {
            shards: self.eligible_shards(graph.pools_between(&token_in.address, &token_out.address)),
            token_in: token_in.clone(),
            token_out: token_out.clone(),
        };
        if let Some(steps) = price_backward(&[direct], amount_out)? {
            return Ok(Some(bridge_quote(steps, false)));
        }

        if bridge.address == token_in.address || bridge.address == token_out.address {
            return Ok(None);
        }
        let legs = [
            Leg {
                shards: self.eligible_shards(graph.pools_between(&token_in.address, &bridge.address)),
                token_in,
                token_out: bridge.clone(),
            },
            Leg {
                shards: self.eligible_shards(graph.pools_between(&bridge.address, &token_out.address)),
                token_in: bridge,
                token_out,
            },
        ];
        Ok(price_backward(&legs, amount_out)?.map(|steps| bridge_quote(steps, true)))
    }

    pub fn validate_path(&self, path: &SwapPath) -> PathValidation {
        validate_path(
            path,
            &self.graph.snapshot(),
            self.config.max_hops,
            &self.config.low_liquidity_threshold,
        )
    }

    pub fn get_stats(&self) -> EngineStats {
        let total_searches = self.stats.total_searches.load(Ordering::Relaxed);
        let computed = total_searches - self.stats.cache_hits.load(Ordering::Relaxed).min(total_searches);
        let total_micros = self.stats.total_search_micros.load(Ordering::Relaxed);
        EngineStats {
            total_searches,
            total_paths_found: self.stats.total_paths_found.load(Ordering::Relaxed),
            average_search_time_ms: if computed == 0 {
                0.0
            } else {
                total_micros as f64 / computed as f64 / 1000.0
            },
            cache_hits: self.stats.cache_hits.load(Ordering::Relaxed),
        }
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

fn hop_from_shard(
    shard: ShardQuote,
    token_in: &Token,
    token_out: &Token,
    amount_out: &BigUint,
    position: usize,
) -> SwapHop {
    SwapHop {
        pool_address: shard.pool.address.clone(),
        token_in: token_in.clone(),
        token_out: token_out.clone(),
        amount_in: shard.quote.amount_in,
        amount_out: amount_out.clone(),
        fee: shard.quote.fee,
        price_impact: shard.quote.price_impact,
        smallest_shard: shard.smallest,
        position,
    }
}

/// Two-pass pricing over a complete leg sequence.
///
/// The backward pass starts from the final desired output and selects a shard
/// per leg, the required input of each leg becoming the output of the previous
/// one. The forward pass re-checks every hop's c-threshold with the amounts
/// it will actually carry.
fn price_backward(legs: &[Leg], amount_out: &BigUint) -> Result<Option<Vec<SwapHop>>, QuoteError> {
    let mut required = amount_out.clone();
    let mut hops = Vec::with_capacity(legs.len());

    for (position, leg) in legs.iter().enumerate().rev() {
        let shard = match select_shard(
            &leg.shards,
            &leg.token_in.address,
            &leg.token_out.address,
            &required,
        )? {
            Some(shard) => shard,
            None => return Ok(None),
        };
        let hop = hop_from_shard(shard, &leg.token_in, &leg.token_out, &required, position);
        required = hop.amount_in.clone();
        hops.push(hop);
    }
    hops.reverse();

    for (hop, leg) in hops.iter().zip(legs) {
        let admissible = leg
            .shards
            .iter()
            .find(|pool| pool.address == hop.pool_address)
            .map(|pool| validate_c_threshold(pool, &hop.amount_in, &hop.token_in.address))
            .unwrap_or(false);
        if hop.amount_in.is_zero() || !admissible {
            return Ok(None);
        }
    }
    Ok(Some(hops))
}

fn bridge_quote(steps: Vec<SwapHop>, via_bridge: bool) -> BridgeQuote {
    let total_amount_in = steps
        .first()
        .map(|hop| hop.amount_in.clone())
        .unwrap_or_default();
    let total_fee = steps.iter().map(|hop| &hop.fee).sum();
    BridgeQuote {
        steps,
        total_amount_in,
        total_fee,
        via_bridge,
    }
}
