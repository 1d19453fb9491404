//! Real-source attribution for bundle assets
//!
//! When the bundle output directory is available on disk, each retained
//! asset's file is handed to a [`BundleParser`], which yields the asset's
//! full minified source plus per-module source slices. Assets that cannot be
//! read or parsed degrade to stats-declared sizes; when every asset fails,
//! the whole run degrades the same way.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::warn;
use rayon::prelude::*;

use crate::analyzer::stats::{RawAsset, StatId};
use crate::analyzer::tree::ModuleSourceMap;
use crate::infra::{FileSystem, RealFileSystem};

/// Parse result for one bundle file
pub struct ParsedBundle {
    /// Full source text of the asset
    pub src: String,
    /// Module id to the module's exact source slice within the asset
    pub modules: HashMap<StatId, String>,
}

/// Collaborator that maps a bundle file to its source and module slices.
///
/// The real module-boundary parser lives outside this crate; implementations
/// fail with a recoverable error when an asset cannot be read or parsed, and
/// the attributor skips that asset.
pub trait BundleParser {
    /// Parse the bundle file at `path`
    fn parse_bundle(&self, path: &Path) -> anyhow::Result<ParsedBundle>;
}

/// Fallback parser attributing the whole file's text to the asset.
///
/// Produces no per-module slices, so module-level sizes stay stats-declared
/// while asset-level parsed/gzip sizes reflect the real file.
pub struct FlatBundleParser<FS: FileSystem = RealFileSystem> {
    fs: FS,
}

impl FlatBundleParser {
    /// Create a parser reading from the real filesystem
    pub fn new() -> Self {
        FlatBundleParser { fs: RealFileSystem }
    }
}

impl Default for FlatBundleParser {
    fn default() -> Self {
        Self::new()
    }
}

impl<FS: FileSystem> FlatBundleParser<FS> {
    /// Create a parser reading through a custom filesystem
    pub fn with_fs(fs: FS) -> Self {
        FlatBundleParser { fs }
    }
}

impl<FS: FileSystem> BundleParser for FlatBundleParser<FS> {
    fn parse_bundle(&self, path: &Path) -> anyhow::Result<ParsedBundle> {
        let src = self.fs.read_to_string(path)?;
        Ok(ParsedBundle {
            src,
            modules: HashMap::new(),
        })
    }
}

/// Attributed sources for one analysis run
pub struct BundleSources {
    /// Asset name to the asset's full source text
    pub bundles: HashMap<String, String>,
    /// Module id to source slice, merged across all parsed assets
    pub parsed_modules: ModuleSourceMap,
}

/// Attempt source attribution for every retained asset.
///
/// Assets are parsed independently (in parallel); results merge in retained
/// asset order, so id collisions across assets resolve to the later asset.
/// Returns `None` when no asset could be parsed at all.
pub fn attribute_sources<P: BundleParser + Sync>(
    bundle_dir: &Path,
    assets: &[RawAsset],
    parser: &P,
) -> Option<BundleSources> {
    let parsed: Vec<Option<(String, ParsedBundle)>> = assets
        .par_iter()
        .map(|asset| {
            let path: PathBuf = bundle_dir.join(&asset.name);
            match parser.parse_bundle(&path) {
                Ok(bundle) => Some((asset.name.clone(), bundle)),
                Err(err) => {
                    warn!("Error parsing bundle asset {}: {}", path.display(), err);
                    None
                }
            }
        })
        .collect();

    let mut bundles = HashMap::new();
    let mut parsed_modules = ModuleSourceMap::new();
    for (name, bundle) in parsed.into_iter().flatten() {
        bundles.insert(name, bundle.src);
        parsed_modules.extend(bundle.modules);
    }

    if bundles.is_empty() {
        warn!("No bundles were parsed. Analysis will use module sizes from the stats file.");
        return None;
    }

    Some(BundleSources {
        bundles,
        parsed_modules,
    })
}
