//! Stats-to-tree composition engine
//!
//! Turns a bundler's stats object into treemap chart data:
//! - Stats normalization and asset filtering
//! - Module-to-asset matching via chunk membership
//! - Real-source attribution from bundle files on disk
//! - Per-asset composition trees with three size metrics
//! - Chart-data projection

pub mod attribution;
pub mod chart;
pub mod exclude;
pub mod modules;
pub mod paths;
pub mod report;
pub mod stats;
pub mod tree;

pub use attribution::{BundleParser, BundleSources, FlatBundleParser, ParsedBundle};
pub use chart::{ChartGroup, ChartItem};
pub use exclude::ExcludeMatcher;
pub use stats::{RawAsset, RawModule, RawStats, StatId};
pub use tree::CompositionTree;

use std::path::PathBuf;

use log::error;
use serde::{Deserialize, Serialize};

use crate::error::BundlemapError;

/// Display hint selecting which size metric a report leads with.
///
/// Does not affect computed values; reports fall back to declared sizes when
/// the requested metric is unavailable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SizeKind {
    /// Declared sizes from the stats file
    Stat,
    /// Real parsed (minified) source sizes
    #[default]
    Parsed,
    /// Gzip-compressed sizes
    Gzip,
}

/// Options for one analysis run
#[derive(Debug, Default)]
pub struct AnalyzerOptions {
    /// Exclusion rules applied to asset filenames (OR-combined)
    pub exclude_assets: Vec<ExcludeMatcher>,
    /// Bundle output directory; enables real-source attribution when set
    pub bundle_dir: Option<PathBuf>,
    /// Display hint for reports
    pub default_sizes: SizeKind,
}

/// Composition pipeline for one stats snapshot at a time
pub struct BundleAnalyzer<P: BundleParser = FlatBundleParser> {
    options: AnalyzerOptions,
    parser: P,
}

impl BundleAnalyzer {
    /// Create an analyzer using the default whole-file bundle parser
    pub fn new(options: AnalyzerOptions) -> Self {
        BundleAnalyzer {
            options,
            parser: FlatBundleParser::new(),
        }
    }
}

impl<P: BundleParser + Sync> BundleAnalyzer<P> {
    /// Create an analyzer with a custom bundle parser
    pub fn with_parser(options: AnalyzerOptions, parser: P) -> Self {
        BundleAnalyzer { options, parser }
    }

    /// Options of this analyzer
    pub fn options(&self) -> &AnalyzerOptions {
        &self.options
    }

    /// Run the full composition pipeline over one stats snapshot.
    ///
    /// Returns `Ok(None)` when no asset survives filtering or no asset could
    /// be projected; callers treat that as "nothing to analyze", not an
    /// error. A gzip failure aborts only the affected asset's projection;
    /// the remaining assets are still reported.
    pub fn analyze(&self, raw: RawStats) -> Result<Option<Vec<ChartItem>>, BundlemapError> {
        let stats = stats::normalize(raw, &self.options.exclude_assets);
        if stats.assets.is_empty() {
            return Ok(None);
        }

        let sources = self
            .options
            .bundle_dir
            .as_deref()
            .and_then(|dir| attribution::attribute_sources(dir, &stats.assets, &self.parser));

        let mut items = Vec::with_capacity(stats.assets.len());
        for asset in &stats.assets {
            let mut tree = CompositionTree::new();
            for module in modules::asset_modules(&stats, asset) {
                tree.insert(module, sources.as_ref().map(|s| &s.parsed_modules));
            }
            tree.merge_nested_folders();

            match chart::project_asset(asset, &tree, sources.as_ref()) {
                Ok(item) => items.push(item),
                Err(err) => {
                    error!("Skipping chart data for {}: {}", asset.name, err);
                }
            }
        }

        if items.is_empty() {
            Ok(None)
        } else {
            Ok(Some(items))
        }
    }
}
