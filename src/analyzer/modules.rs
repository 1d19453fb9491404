//! Module-to-asset matching
//!
//! Determines, for each retained asset, the set of modules that belong to it
//! by intersecting chunk memberships. Child assets (from nested sub-builds)
//! resolve their module pool through the owning child stats object instead of
//! the top-level one.

use std::collections::HashSet;

use crate::analyzer::stats::{strip_query, RawAsset, RawModule, RawStats};

/// Collect the ordered module list belonging to one asset.
///
/// The pool is every chunk's modules plus the top-level module list,
/// deduplicated by id (first occurrence wins). A module belongs to the asset
/// when its chunk set intersects the asset's. Child assets use the child
/// stats object whose `assetsByChunkName` references them; when no such child
/// exists the asset contributes no modules.
pub fn asset_modules<'a>(stats: &'a RawStats, asset: &RawAsset) -> Vec<&'a RawModule> {
    let pool_source = if asset.is_child {
        find_child_bundles(stats, &asset.name)
    } else {
        Some(stats)
    };

    let Some(source) = pool_source else {
        return Vec::new();
    };

    module_pool(source)
        .into_iter()
        .filter(|module| asset_has_module(asset, module))
        .collect()
}

/// Deduplicated module pool of one stats object, in first-seen order.
///
/// Records without an id are kept unconditionally; uniqueness is only
/// defined for ids that are present.
pub fn module_pool(stats: &RawStats) -> Vec<&RawModule> {
    let mut seen = HashSet::new();
    let mut pool = Vec::new();

    let candidates = stats
        .chunks
        .iter()
        .flat_map(|chunk| chunk.modules.iter())
        .chain(stats.modules.iter());

    for module in candidates {
        match &module.id {
            Some(id) => {
                if seen.insert(id) {
                    pool.push(module);
                }
            }
            None => pool.push(module),
        }
    }

    pool
}

fn asset_has_module(asset: &RawAsset, module: &RawModule) -> bool {
    module
        .chunks
        .iter()
        .any(|chunk| asset.chunks.contains(chunk))
}

/// Locate the child stats object owning the named asset, if any
fn find_child_bundles<'a>(stats: &'a RawStats, asset_name: &str) -> Option<&'a RawStats> {
    stats.children.iter().find(|child| {
        child
            .assets_by_chunk_name
            .values()
            .flat_map(|entry| entry.names())
            .any(|name| strip_query(name) == asset_name)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::stats::{ChunkAssets, RawChunk, StatId};

    fn module(id: i64, name: &str, size: u64, chunks: &[i64]) -> RawModule {
        RawModule {
            id: Some(StatId::Num(id)),
            name: name.to_string(),
            size,
            chunks: chunks.iter().map(|&c| StatId::Num(c)).collect(),
            modules: None,
        }
    }

    fn asset(name: &str, chunks: &[i64]) -> RawAsset {
        RawAsset {
            name: name.to_string(),
            size: 0,
            chunks: chunks.iter().map(|&c| StatId::Num(c)).collect(),
            is_child: false,
        }
    }

    #[test]
    fn test_module_pool_dedups_by_id_first_wins() {
        let stats = RawStats {
            chunks: vec![
                RawChunk {
                    modules: vec![module(1, "./a.js", 10, &[0]), module(2, "./b.js", 20, &[0])],
                },
                RawChunk {
                    modules: vec![module(1, "./a-duplicate.js", 99, &[1])],
                },
            ],
            modules: vec![module(3, "./c.js", 30, &[0])],
            ..Default::default()
        };

        let pool = module_pool(&stats);
        let names: Vec<_> = pool.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["./a.js", "./b.js", "./c.js"]);
    }

    #[test]
    fn test_module_pool_keeps_idless_records() {
        let mut anonymous = module(0, "./x.js", 5, &[0]);
        anonymous.id = None;
        let mut anonymous2 = module(0, "./y.js", 5, &[0]);
        anonymous2.id = None;

        let stats = RawStats {
            modules: vec![anonymous, anonymous2],
            ..Default::default()
        };

        assert_eq!(module_pool(&stats).len(), 2);
    }

    #[test]
    fn test_asset_modules_filters_by_chunk_intersection() {
        let stats = RawStats {
            chunks: vec![RawChunk {
                modules: vec![
                    module(1, "./a.js", 10, &[0]),
                    module(2, "./b.js", 20, &[1]),
                    module(3, "./c.js", 30, &[0, 1]),
                ],
            }],
            ..Default::default()
        };

        let target = asset("bundle.js", &[0]);
        let matched = asset_modules(&stats, &target);
        let names: Vec<_> = matched.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["./a.js", "./c.js"]);
    }

    #[test]
    fn test_asset_modules_no_match_yields_empty_list() {
        let stats = RawStats {
            modules: vec![module(1, "./a.js", 10, &[5])],
            ..Default::default()
        };

        let target = asset("bundle.js", &[0]);
        assert!(asset_modules(&stats, &target).is_empty());
    }

    #[test]
    fn test_asset_modules_child_asset_uses_child_pool() {
        let mut child_map = std::collections::HashMap::new();
        child_map.insert(
            "entry".to_string(),
            ChunkAssets::One("child.js".to_string()),
        );

        let stats = RawStats {
            modules: vec![module(1, "./top-level.js", 10, &[0])],
            children: vec![RawStats {
                modules: vec![module(7, "./nested.js", 40, &[0])],
                assets_by_chunk_name: child_map,
                ..Default::default()
            }],
            ..Default::default()
        };

        let mut target = asset("child.js", &[0]);
        target.is_child = true;

        let matched = asset_modules(&stats, &target);
        let names: Vec<_> = matched.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["./nested.js"]);
    }

    #[test]
    fn test_asset_modules_child_asset_without_owner_contributes_nothing() {
        let stats = RawStats {
            modules: vec![module(1, "./top-level.js", 10, &[0])],
            ..Default::default()
        };

        let mut target = asset("child.js", &[0]);
        target.is_child = true;

        assert!(asset_modules(&stats, &target).is_empty());
    }

    #[test]
    fn test_find_child_bundles_matches_query_suffixed_names() {
        let mut child_map = std::collections::HashMap::new();
        child_map.insert(
            "entry".to_string(),
            ChunkAssets::Many(vec!["other.js".to_string(), "child.js?v=1".to_string()]),
        );

        let stats = RawStats {
            children: vec![RawStats {
                assets_by_chunk_name: child_map,
                ..Default::default()
            }],
            ..Default::default()
        };

        assert!(find_child_bundles(&stats, "child.js").is_some());
        assert!(find_child_bundles(&stats, "missing.js").is_none());
    }
}
