//! Chart data projection
//!
//! Walks a finalized composition tree and emits the externally consumed
//! chart-data shape. Field names are the wire contract used by rendering
//! layers and must stay stable.

use serde::Serialize;

use crate::analyzer::attribution::BundleSources;
use crate::analyzer::stats::RawAsset;
use crate::analyzer::tree::{gzip_len, CompositionTree, TreeNode};
use crate::error::BundlemapError;

/// Chart record for one asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartItem {
    /// Asset filename
    pub label: String,
    /// Always true for top-level records
    pub is_asset: bool,
    /// Aggregate declared size; the asset's own size when no module matched
    pub stat_size: u64,
    /// Byte length of the asset's real source, when attributed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parsed_size: Option<u64>,
    /// Gzip size of the asset's real source, when attributed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gzip_size: Option<u64>,
    /// Nested folder/module groups in tree insertion order
    pub groups: Vec<ChartGroup>,
}

/// Chart record for one folder or module node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartGroup {
    /// Node name (folder segment, possibly merged, or module filename)
    pub label: String,
    /// Full path from the tree root
    pub path: String,
    /// Declared size
    pub stat_size: u64,
    /// Parsed size, present only when source was attributed below this node
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parsed_size: Option<u64>,
    /// Gzip size, present only when source was attributed below this node
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gzip_size: Option<u64>,
    /// Nested groups; absent for modules without nested members
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<ChartGroup>>,
}

/// Project one asset's finalized tree into its chart record.
///
/// `stat_size` falls back to the asset's declared size when no module
/// matched the asset. Asset-level parsed/gzip sizes come from the attributed
/// full bundle source when present.
pub fn project_asset(
    asset: &RawAsset,
    tree: &CompositionTree,
    sources: Option<&BundleSources>,
) -> Result<ChartItem, BundlemapError> {
    let stat_size = if tree.is_empty() {
        asset.size
    } else {
        tree.stat_size()
    };

    let bundle_src = sources.and_then(|s| s.bundles.get(&asset.name));
    let parsed_size = bundle_src.map(|src| src.len() as u64);
    let gzip_size = match bundle_src {
        Some(src) => Some(gzip_len(src.as_bytes()).map_err(|source| {
            BundlemapError::Compression {
                label: asset.name.clone(),
                source,
            }
        })?),
        None => None,
    };

    let groups = tree
        .root()
        .children()
        .values()
        .map(|node| project_node(node, tree.root().name()))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ChartItem {
        label: asset.name.clone(),
        is_asset: true,
        stat_size,
        parsed_size,
        gzip_size,
        groups,
    })
}

fn project_node(node: &TreeNode, parent_path: &str) -> Result<ChartGroup, BundlemapError> {
    let path = format!("{}/{}", parent_path, node.name());

    let parsed_size = node.has_source().then(|| node.parsed_size());
    let gzip_size = node
        .gzip_size()
        .map_err(|source| BundlemapError::Compression {
            label: path.clone(),
            source,
        })?;

    let groups = if node.is_folder() || !node.children().is_empty() {
        Some(
            node.children()
                .values()
                .map(|child| project_node(child, &path))
                .collect::<Result<Vec<_>, _>>()?,
        )
    } else {
        None
    };

    Ok(ChartGroup {
        label: node.name().to_string(),
        path,
        stat_size: node.stat_size(),
        parsed_size,
        gzip_size,
        groups,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::stats::{RawModule, StatId};
    use crate::analyzer::tree::ModuleSourceMap;
    use std::collections::HashMap;

    fn module(id: i64, name: &str, size: u64) -> RawModule {
        RawModule {
            id: Some(StatId::Num(id)),
            name: name.to_string(),
            size,
            chunks: vec![StatId::Num(0)],
            modules: None,
        }
    }

    fn asset(name: &str, size: u64) -> RawAsset {
        RawAsset {
            name: name.to_string(),
            size,
            chunks: vec![StatId::Num(0)],
            is_child: false,
        }
    }

    #[test]
    fn test_project_asset_without_bundle_dir_has_stat_sizes_only() {
        let mut tree = CompositionTree::new();
        tree.insert(&module(1, "./a.js", 50), None);
        tree.insert(&module(2, "./b.js", 91), None);
        tree.merge_nested_folders();

        let item = project_asset(&asset("bundle.js", 141), &tree, None)
            .expect("projection should succeed");

        assert_eq!(item.label, "bundle.js");
        assert!(item.is_asset);
        assert_eq!(item.stat_size, 141);
        assert_eq!(item.parsed_size, None);
        assert_eq!(item.gzip_size, None);
        assert_eq!(item.groups.len(), 2);
        assert_eq!(item.groups[0].stat_size, 50);
        assert_eq!(item.groups[1].stat_size, 91);
    }

    #[test]
    fn test_project_asset_empty_tree_falls_back_to_declared_size() {
        let tree = CompositionTree::new();
        let item = project_asset(&asset("bundle.js", 4096), &tree, None)
            .expect("projection should succeed");

        assert_eq!(item.stat_size, 4096);
        assert!(item.groups.is_empty());
    }

    #[test]
    fn test_project_asset_uses_attributed_bundle_source() {
        let mut tree = CompositionTree::new();
        tree.insert(&module(1, "./a.js", 50), None);

        let mut bundles = HashMap::new();
        bundles.insert("bundle.js".to_string(), "var a=1;var b=2;".to_string());
        let sources = BundleSources {
            bundles,
            parsed_modules: ModuleSourceMap::new(),
        };

        let item = project_asset(&asset("bundle.js", 141), &tree, Some(&sources))
            .expect("projection should succeed");

        assert_eq!(item.parsed_size, Some(16));
        assert!(item.gzip_size.expect("gzip size should be present") > 0);
    }

    #[test]
    fn test_project_groups_carry_paths_from_root() {
        let mut tree = CompositionTree::new();
        tree.insert(&module(1, "./src/app/a.js", 50), None);
        tree.merge_nested_folders();

        let item = project_asset(&asset("bundle.js", 50), &tree, None)
            .expect("projection should succeed");

        assert_eq!(item.groups[0].label, "src/app");
        assert_eq!(item.groups[0].path, "./src/app");
        let nested = item.groups[0]
            .groups
            .as_ref()
            .expect("folder group should have groups");
        assert_eq!(nested[0].path, "./src/app/a.js");
        assert_eq!(nested[0].groups, None);
    }

    #[test]
    fn test_project_preserves_insertion_order_not_alphabetical() {
        let mut tree = CompositionTree::new();
        tree.insert(&module(1, "./z.js", 1), None);
        tree.insert(&module(2, "./a.js", 2), None);
        tree.merge_nested_folders();

        let item = project_asset(&asset("bundle.js", 3), &tree, None)
            .expect("projection should succeed");

        let labels: Vec<_> = item.groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["z.js", "a.js"]);
    }

    #[test]
    fn test_project_concatenated_module_emits_nested_groups() {
        let mut concat = module(1, "./entry.js", 60);
        concat.modules = Some(vec![module(3, "./x.js", 10)]);

        let mut tree = CompositionTree::new();
        tree.insert(&concat, None);
        tree.merge_nested_folders();

        let item = project_asset(&asset("bundle.js", 60), &tree, None)
            .expect("projection should succeed");

        let entry = &item.groups[0];
        assert_eq!(entry.label, "entry.js");
        let nested = entry
            .groups
            .as_ref()
            .expect("concatenated module should carry groups");
        assert_eq!(nested.len(), 1);
        assert_eq!(nested[0].label, "x.js");
    }

    #[test]
    fn test_project_same_tree_twice_is_identical() {
        let mut sources_map = ModuleSourceMap::new();
        sources_map.insert(StatId::Num(1), "var a=1;".to_string());

        let mut tree = CompositionTree::new();
        tree.insert(&module(1, "./src/a.js", 50), Some(&sources_map));
        tree.merge_nested_folders();

        let target = asset("bundle.js", 50);
        let first = project_asset(&target, &tree, None).expect("first projection");
        let second = project_asset(&target, &tree, None).expect("second projection");
        assert_eq!(first, second);
    }

    #[test]
    fn test_chart_item_serializes_with_camel_case_wire_names() {
        let mut tree = CompositionTree::new();
        tree.insert(&module(1, "./a.js", 50), None);

        let item = project_asset(&asset("bundle.js", 50), &tree, None)
            .expect("projection should succeed");
        let value = serde_json::to_value(&item).expect("should serialize");

        assert_eq!(value["label"], "bundle.js");
        assert_eq!(value["isAsset"], true);
        assert_eq!(value["statSize"], 50);
        // Absent metrics are omitted from the wire shape, not null.
        assert!(value.get("parsedSize").is_none());
        assert!(value.get("gzipSize").is_none());
        assert_eq!(value["groups"][0]["path"], "./a.js");
    }
}
