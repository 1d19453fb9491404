//! Test fixture helpers for stats files and bundle directories

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

/// Stats JSON for one asset `bundle.js` (141 bytes) built from two modules
pub fn two_module_stats_json() -> &'static str {
    r#"{
        "assets": [{"name": "bundle.js", "size": 141, "chunks": [0]}],
        "chunks": [{"modules": [
            {"id": 1, "name": "./src/a.js", "size": 50, "chunks": [0]},
            {"id": 2, "name": "./src/b.js", "size": 91, "chunks": [0]}
        ]}]
    }"#
}

/// Stats JSON where all content lives under `children`
pub fn children_only_stats_json() -> &'static str {
    r#"{
        "children": [
            {
                "assets": [{"name": "main.js", "size": 100, "chunks": [0]}],
                "modules": [{"id": 1, "name": "./main-src.js", "size": 100, "chunks": [0]}]
            },
            {
                "assets": [{"name": "worker.js", "size": 40, "chunks": [0]}],
                "assetsByChunkName": {"worker": "worker.js"},
                "modules": [{"id": 2, "name": "./worker-src.js", "size": 40, "chunks": [0]}]
            }
        ]
    }"#
}

/// Stats JSON with one concatenated module owning two nested members
pub fn concatenated_stats_json() -> &'static str {
    r#"{
        "assets": [{"name": "bundle.js", "size": 90, "chunks": [0]}],
        "chunks": [{"modules": [
            {"id": 1, "name": "./src/entry.js", "size": 90, "chunks": [0], "modules": [
                {"id": 3, "name": "./x.js", "size": 10},
                {"id": 4, "name": "./y.js", "size": 80}
            ]}
        ]}]
    }"#
}

/// Write a stats file into a fresh temp dir; returns (dir, stats path)
pub fn write_stats_file(json: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("should create temp dir");
    let path = dir.path().join("stats.json");
    fs::write(&path, json).expect("should write stats file");
    (dir, path)
}

/// Create a bundle dir containing the named files with given contents
pub fn write_bundle_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().expect("should create temp dir");
    for (name, contents) in files {
        fs::write(dir.path().join(name), contents).expect("should write bundle file");
    }
    dir
}
