//! Single-hop and bounded multi-hop symlink resolution.

use std::collections::HashSet;

use crate::entry::Entry;
use crate::error::{Error, Result};
use crate::path::normalize;
use crate::store::StorageEngine;

/// Bounded hop count for symlink chains.
pub const MAX_LINK_DEPTH: u32 = 40;

/// Terminal result of resolution: the final path and whatever is stored
/// there. A broken link resolves to an absent entry at its target path.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub path: String,
    pub entry: Option<Entry>,
}

/// One hop: if the entry at `path` is a symlink, return its target and
/// whatever lives there; otherwise the entry itself.
pub async fn resolve_single(engine: &dyn StorageEngine, path: &str) -> Result<Resolved> {
    match engine.get(path).await? {
        Some(Entry::Symlink(link)) => {
            let target = normalize(&link.target);
            let entry = engine.get(&target).await?;
            Ok(Resolved {
                path: target,
                entry,
            })
        }
        other => Ok(Resolved {
            path: path.to_string(),
            entry: other,
        }),
    }
}

/// Follows symlink targets to completion, tracking visited paths.
///
/// Raises `LinkCycle` when a path repeats or the hop count exceeds
/// `MAX_LINK_DEPTH`. Cycles are detected here, lazily, not at link
/// creation time.
pub async fn resolve_fully(engine: &dyn StorageEngine, path: &str) -> Result<Resolved> {
    let mut visited: HashSet<String> = HashSet::new();
    let mut current = path.to_string();
    let mut hops = 0u32;
    loop {
        match engine.get(&current).await? {
            Some(Entry::Symlink(link)) => {
                if !visited.insert(current.clone()) || hops >= MAX_LINK_DEPTH {
                    return Err(Error::link_cycle(path));
                }
                hops += 1;
                current = normalize(&link.target);
            }
            entry => {
                return Ok(Resolved {
                    path: current,
                    entry,
                });
            }
        }
    }
}
