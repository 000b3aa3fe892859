use super::types::Pool;
use super::Result;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// Pools are wrapped in an object so the snapshot format can grow fields
#[derive(Serialize, Deserialize, Debug, Clone)]
struct PoolList {
    pools: Vec<Pool>,
}

pub fn write_pool_snapshot<P: AsRef<Path>>(snapshot_path: P, pools: &[Pool]) -> Result<()> {
    let pool_list = PoolList {
        pools: pools.to_vec(),
    };
    let json = serde_json::to_string_pretty(&pool_list)?;

    fs::write(snapshot_path, json)?;
    Ok(())
}

pub fn read_pool_snapshot<P: AsRef<Path>>(snapshot_path: P) -> Result<Vec<Pool>> {
    let snapshot_path = snapshot_path.as_ref();
    let pool_list_json = fs::read_to_string(snapshot_path).with_context(|| {
        format!("Couldn't read pool snapshot {}", snapshot_path.display())
    })?;
    let pool_list: PoolList = serde_json::from_str(&pool_list_json)
        .context("Couldn't parse pool snapshot".to_string())?;
    Ok(pool_list.pools)
}
