//! Composition tree
//!
//! A rooted tree mirroring original source file paths. Folders aggregate
//! their children; leaves are modules, and a leaf may itself own a nested
//! sub-tree when the bundler concatenated other modules into it. Trees are
//! built once per asset per analysis run, normalized with a single folder
//! merge pass, projected to chart data, and discarded.

use std::cell::OnceCell;
use std::collections::HashMap;
use std::io;
use std::io::Write;

use flate2::write::GzEncoder;
use flate2::Compression;
use indexmap::IndexMap;

use crate::analyzer::paths::module_path_parts;
use crate::analyzer::stats::{RawModule, StatId};

/// Module id to real source text, produced by source attribution
pub type ModuleSourceMap = HashMap<StatId, String>;

/// Gzip-compressed byte length of a byte slice
pub fn gzip_len(bytes: &[u8]) -> io::Result<u64> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes)?;
    let compressed = encoder.finish()?;
    Ok(compressed.len() as u64)
}

/// One node of the composition tree
pub enum TreeNode {
    /// Folder with aggregated size
    Folder(Folder),
    /// Module leaf, possibly owning a nested sub-tree (concatenated module)
    Module(ModuleNode),
}

impl TreeNode {
    /// Node name (folder segment or module filename)
    pub fn name(&self) -> &str {
        match self {
            TreeNode::Folder(folder) => &folder.name,
            TreeNode::Module(module) => &module.name,
        }
    }

    /// Declared size: folders live-sum their children, leaves report their
    /// stats-declared size
    pub fn stat_size(&self) -> u64 {
        match self {
            TreeNode::Folder(folder) => folder.stat_size(),
            TreeNode::Module(module) => module.stat_size(),
        }
    }

    /// Parsed size, memoized on first read
    pub fn parsed_size(&self) -> u64 {
        match self {
            TreeNode::Folder(folder) => folder.parsed_size(),
            TreeNode::Module(module) => module.parsed_size(),
        }
    }

    /// Gzip size of this node's source string, memoized on first successful
    /// read; `None` when no source is attributed anywhere below this node
    pub fn gzip_size(&self) -> io::Result<Option<u64>> {
        match self {
            TreeNode::Folder(folder) => folder.gzip_size(),
            TreeNode::Module(module) => module.gzip_size(),
        }
    }

    /// Whether any real source text is attributed at or below this node
    pub fn has_source(&self) -> bool {
        self.source().is_some()
    }

    /// Direct children (empty for plain leaves)
    pub fn children(&self) -> &IndexMap<String, TreeNode> {
        match self {
            TreeNode::Folder(folder) => &folder.children,
            TreeNode::Module(module) => &module.children,
        }
    }

    /// Whether this node is a folder
    pub fn is_folder(&self) -> bool {
        matches!(self, TreeNode::Folder(_))
    }

    fn source(&self) -> Option<&str> {
        match self {
            TreeNode::Folder(folder) => folder.source(),
            TreeNode::Module(module) => module.source(),
        }
    }
}

/// Folder node: no size of its own, always the live sum of its children
pub struct Folder {
    name: String,
    children: IndexMap<String, TreeNode>,
    src_cache: OnceCell<Option<String>>,
    parsed_cache: OnceCell<u64>,
    gzip_cache: OnceCell<u64>,
}

impl Folder {
    fn new(name: impl Into<String>) -> Self {
        Folder {
            name: name.into(),
            children: IndexMap::new(),
            src_cache: OnceCell::new(),
            parsed_cache: OnceCell::new(),
            gzip_cache: OnceCell::new(),
        }
    }

    /// Folder name; after merging this may span several path segments
    /// (e.g. `node_modules/lodash`)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Direct children in insertion order
    pub fn children(&self) -> &IndexMap<String, TreeNode> {
        &self.children
    }

    /// Live sum of the children's declared sizes, never cached
    pub fn stat_size(&self) -> u64 {
        self.children.values().map(TreeNode::stat_size).sum()
    }

    /// Sum of the children's parsed sizes, memoized
    pub fn parsed_size(&self) -> u64 {
        *self
            .parsed_cache
            .get_or_init(|| self.children.values().map(TreeNode::parsed_size).sum())
    }

    /// Gzip size of the concatenated descendant source, memoized
    pub fn gzip_size(&self) -> io::Result<Option<u64>> {
        if let Some(cached) = self.gzip_cache.get() {
            return Ok(Some(*cached));
        }
        let Some(src) = self.source() else {
            return Ok(None);
        };
        let size = gzip_len(src.as_bytes())?;
        Ok(Some(*self.gzip_cache.get_or_init(|| size)))
    }

    /// Concatenation of descendant sources in tree order, memoized;
    /// `None` when no descendant carries source text
    fn source(&self) -> Option<&str> {
        self.src_cache
            .get_or_init(|| concat_child_sources(&self.children))
            .as_deref()
    }

    /// Collapse chains of single-child folders into one `a/b`-named folder
    fn collapse_single_child_chains(&mut self) {
        while self.children.len() == 1 {
            let only_is_folder = matches!(self.children.values().next(), Some(TreeNode::Folder(_)));
            if !only_is_folder {
                break;
            }
            if let Some((_, TreeNode::Folder(only))) = self.children.swap_remove_index(0) {
                self.name.push('/');
                self.name.push_str(&only.name);
                self.children = only.children;
            }
        }
        for child in self.children.values_mut() {
            if let TreeNode::Folder(folder) = child {
                folder.collapse_single_child_chains();
            }
        }
    }
}

/// Module leaf node
pub struct ModuleNode {
    name: String,
    size: u64,
    src: Option<String>,
    children: IndexMap<String, TreeNode>,
    src_cache: OnceCell<Option<String>>,
    parsed_cache: OnceCell<u64>,
    gzip_cache: OnceCell<u64>,
}

impl ModuleNode {
    /// Module filename
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared size from the stats record
    pub fn stat_size(&self) -> u64 {
        self.size
    }

    /// Nested members (non-empty only for concatenated modules)
    pub fn children(&self) -> &IndexMap<String, TreeNode> {
        &self.children
    }

    /// Byte length of the attributed source, or the nested members' sum for
    /// concatenated modules without their own source; memoized
    pub fn parsed_size(&self) -> u64 {
        *self.parsed_cache.get_or_init(|| match &self.src {
            Some(src) => src.len() as u64,
            None => self.children.values().map(TreeNode::parsed_size).sum(),
        })
    }

    /// Gzip size of this module's source string, memoized
    pub fn gzip_size(&self) -> io::Result<Option<u64>> {
        if let Some(cached) = self.gzip_cache.get() {
            return Ok(Some(*cached));
        }
        let Some(src) = self.source() else {
            return Ok(None);
        };
        let size = gzip_len(src.as_bytes())?;
        Ok(Some(*self.gzip_cache.get_or_init(|| size)))
    }

    fn source(&self) -> Option<&str> {
        if let Some(src) = &self.src {
            return Some(src);
        }
        if self.children.is_empty() {
            return None;
        }
        self.src_cache
            .get_or_init(|| concat_child_sources(&self.children))
            .as_deref()
    }
}

fn concat_child_sources(children: &IndexMap<String, TreeNode>) -> Option<String> {
    let mut found = false;
    let mut buf = String::new();
    for child in children.values() {
        if let Some(src) = child.source() {
            found = true;
            buf.push_str(src);
        }
    }
    found.then_some(buf)
}

/// Composition tree for one asset, rooted at `.`
pub struct CompositionTree {
    root: Folder,
}

impl Default for CompositionTree {
    fn default() -> Self {
        Self::new()
    }
}

impl CompositionTree {
    /// Create an empty tree
    pub fn new() -> Self {
        CompositionTree {
            root: Folder::new("."),
        }
    }

    /// Insert one module record by its path-like identifier.
    ///
    /// Records whose identifier yields no usable path segments are skipped
    /// silently. A leaf occupying a folder position is replaced by a new
    /// folder, discarding the leaf; this mirrors how unusual dynamic-import
    /// identifiers collide and is intentional.
    pub fn insert(&mut self, module: &RawModule, sources: Option<&ModuleSourceMap>) {
        insert_into(&mut self.root.children, module, sources);
    }

    /// One-shot normalization pass collapsing redundant single-child folder
    /// chains. Apply exactly once, after all insertions and before reading
    /// aggregate sizes for projection.
    pub fn merge_nested_folders(&mut self) {
        for child in self.root.children.values_mut() {
            if let TreeNode::Folder(folder) = child {
                folder.collapse_single_child_chains();
            }
        }
    }

    /// Whether no module was inserted
    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    /// Aggregate declared size of the whole tree
    pub fn stat_size(&self) -> u64 {
        self.root.stat_size()
    }

    /// The root folder
    pub fn root(&self) -> &Folder {
        &self.root
    }
}

fn insert_into(
    children: &mut IndexMap<String, TreeNode>,
    module: &RawModule,
    sources: Option<&ModuleSourceMap>,
) {
    let Some(parts) = module_path_parts(&module.name) else {
        return;
    };
    let Some((file_name, folders)) = parts.split_last() else {
        return;
    };

    let mut current = children;
    for segment in folders {
        let node = current
            .entry(segment.clone())
            .or_insert_with(|| TreeNode::Folder(Folder::new(segment.clone())));
        if let TreeNode::Module(_) = node {
            // A module already occupies this name; the folder wins and the
            // leaf's data is dropped.
            *node = TreeNode::Folder(Folder::new(segment.clone()));
        }
        let TreeNode::Folder(folder) = node else {
            unreachable!("folder position holds a folder after replacement");
        };
        current = &mut folder.children;
    }

    let leaf = build_leaf(file_name, module, sources);
    current.insert(file_name.clone(), TreeNode::Module(leaf));
}

fn build_leaf(name: &str, module: &RawModule, sources: Option<&ModuleSourceMap>) -> ModuleNode {
    let src = module
        .id
        .as_ref()
        .and_then(|id| sources.and_then(|map| map.get(id)))
        .cloned();

    let mut leaf = ModuleNode {
        name: name.to_string(),
        size: module.size,
        src,
        children: IndexMap::new(),
        src_cache: OnceCell::new(),
        parsed_cache: OnceCell::new(),
        gzip_cache: OnceCell::new(),
    };

    if let Some(members) = &module.modules {
        for member in members {
            insert_into(&mut leaf.children, member, sources);
        }
    }

    leaf
}
