//! Raw bundle stats model and normalization
//!
//! Deserializes the bundler's stats JSON into a tolerant typed model and
//! repairs the known shape quirks (content nested under `children`,
//! query-suffixed asset names) into one flat asset list ready for matching.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analyzer::exclude::ExcludeMatcher;

/// Filename extensions recognized as bundle output files
pub const BUNDLE_EXTENSIONS: [&str; 4] = [".js", ".mjs", ".gz", ".br"];

/// Opaque chunk/module identifier as found in stats JSON (number or string)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatId {
    /// Numeric identifier
    Num(i64),
    /// String identifier
    Str(String),
}

impl fmt::Display for StatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatId::Num(n) => write!(f, "{}", n),
            StatId::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for StatId {
    fn from(n: i64) -> Self {
        StatId::Num(n)
    }
}

impl From<&str> for StatId {
    fn from(s: &str) -> Self {
        StatId::Str(s.to_string())
    }
}

/// One build output file as recorded in the stats object
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawAsset {
    /// Output filename, possibly carrying a `?query` suffix
    pub name: String,
    /// Declared byte count from the stats output
    pub size: u64,
    /// Chunk ids this asset was built from
    pub chunks: Vec<StatId>,
    /// Set during normalization for assets sourced from a child sub-build
    #[serde(skip)]
    pub is_child: bool,
}

/// One chunk entry; only its module list matters for composition
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawChunk {
    /// Modules recorded under this chunk
    pub modules: Vec<RawModule>,
}

/// One source module as recorded by the bundler
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawModule {
    /// Opaque identifier, used for dedup and source-slice lookup
    pub id: Option<StatId>,
    /// Path-like readable identifier (e.g. `./src/a.js`)
    pub name: String,
    /// Declared byte count
    pub size: u64,
    /// Chunk ids this module is part of
    pub chunks: Vec<StatId>,
    /// Nested members, present only for concatenated modules
    pub modules: Option<Vec<RawModule>>,
}

/// Value of an `assetsByChunkName` entry: one filename or several
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ChunkAssets {
    /// Single asset filename
    One(String),
    /// Multiple asset filenames
    Many(Vec<String>),
}

impl ChunkAssets {
    /// Iterate the asset filenames of this entry
    pub fn names(&self) -> impl Iterator<Item = &str> {
        match self {
            ChunkAssets::One(name) => std::slice::from_ref(name).iter().map(String::as_str),
            ChunkAssets::Many(names) => names[..].iter().map(String::as_str),
        }
    }
}

/// A build-stats object, possibly carrying nested child sub-builds
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawStats {
    /// Build output files
    pub assets: Vec<RawAsset>,
    /// Chunks with their module lists
    pub chunks: Vec<RawChunk>,
    /// Top-level module list (some bundler versions emit it here)
    pub modules: Vec<RawModule>,
    /// Nested sub-build stats
    pub children: Vec<RawStats>,
    /// Chunk name to asset filename(s) mapping
    pub assets_by_chunk_name: HashMap<String, ChunkAssets>,
}

impl RawStats {
    /// Parse a stats object from a JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Strip a trailing `?query` fragment from an asset filename
pub fn strip_query(name: &str) -> &str {
    match name.split_once('?') {
        Some((base, _)) => base,
        None => name,
    }
}

/// Whether a filename matches the recognized bundle-file extension set
pub fn has_bundle_extension(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    BUNDLE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Normalize a raw stats object into a flat, filtered asset list.
///
/// Handles the three stats shapes seen in the wild:
/// - content directly at top level,
/// - everything nested under `children` (the first child becomes the working
///   object, later children's assets are appended flagged as child assets),
/// - top-level content plus additional `children` (all child assets appended,
///   flagged as child assets).
///
/// Asset names have `?query` suffixes stripped before filtering. Retained
/// assets match a bundle extension, reference at least one chunk, and pass
/// every exclusion matcher.
pub fn normalize(stats: RawStats, exclude: &[ExcludeMatcher]) -> RawStats {
    let mut stats = flatten_children(stats);

    for asset in &mut stats.assets {
        if let Some(base) = asset.name.split_once('?').map(|(base, _)| base) {
            asset.name = base.to_string();
        }
    }

    stats.assets.retain(|asset| {
        has_bundle_extension(&asset.name)
            && !asset.chunks.is_empty()
            && !exclude.iter().any(|m| m.matches(&asset.name))
    });

    stats
}

/// Flatten `children` sub-builds into a single working stats object
fn flatten_children(mut stats: RawStats) -> RawStats {
    if stats.children.is_empty() {
        return stats;
    }

    if stats.assets.is_empty() {
        // All content lives in children: promote the first child, append the
        // assets of the rest flagged as child assets.
        let mut children = std::mem::take(&mut stats.children);
        let mut working = children.remove(0);
        for child in children {
            for mut asset in child.assets {
                asset.is_child = true;
                working.assets.push(asset);
            }
        }
        working
    } else {
        // Top-level content plus child bundles: the main object also carries
        // every child asset.
        let mut child_assets = Vec::new();
        for child in &stats.children {
            for asset in &child.assets {
                let mut asset = asset.clone();
                asset.is_child = true;
                child_assets.push(asset);
            }
        }
        stats.assets.extend(child_assets);
        stats
    }
}
