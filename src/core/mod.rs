pub mod cache;
pub mod constants;
pub mod error;
pub mod indexer;
pub mod paths;
pub mod pool;
pub mod scoring;
pub mod shard;
pub mod swap_math;
pub mod token_graph;
pub mod types;
pub use anyhow::{Context, Result};
