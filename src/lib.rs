#![warn(missing_docs)]
#![warn(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! bundlemap library
//!
//! This library turns a bundler's stats JSON (a graph of chunks, assets and
//! modules) into a normalized hierarchical size report per output asset,
//! rendered as treemap chart data at three size metrics: declared, parsed
//! and gzip. It can be used programmatically in addition to the CLI
//! interface.
//!
//! # Basic Example
//!
//! Composing chart data from a stats snapshot:
//!
//! ```
//! use bundlemap::analyzer::{AnalyzerOptions, BundleAnalyzer, RawStats};
//!
//! let stats = RawStats::from_json(r#"{
//!     "assets": [{"name": "bundle.js", "size": 141, "chunks": [0]}],
//!     "chunks": [{"modules": [
//!         {"id": 1, "name": "./a.js", "size": 50, "chunks": [0]},
//!         {"id": 2, "name": "./b.js", "size": 91, "chunks": [0]}
//!     ]}]
//! }"#)?;
//!
//! let analyzer = BundleAnalyzer::new(AnalyzerOptions::default());
//! let chart = analyzer.analyze(stats)?.expect("assets should match");
//!
//! assert_eq!(chart[0].label, "bundle.js");
//! assert_eq!(chart[0].stat_size, 141);
//! assert_eq!(chart[0].groups.len(), 2);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! # Advanced Example: Live Updates
//!
//! Rebroadcasting recomputed chart data to subscribers:
//!
//! ```
//! use bundlemap::analyzer::{AnalyzerOptions, BundleAnalyzer, RawStats};
//! use bundlemap::live::ReportStateChannel;
//!
//! let channel = ReportStateChannel::new(BundleAnalyzer::new(AnalyzerOptions::default()));
//! let (_token, updates) = channel.subscribe();
//!
//! let stats = RawStats::from_json(r#"{
//!     "assets": [{"name": "bundle.js", "size": 10, "chunks": [0]}]
//! }"#)?;
//! channel.recompute(stats)?;
//!
//! let update = updates.try_recv()?;
//! assert_eq!(update.event, "chartDataUpdated");
//! # Ok::<(), anyhow::Error>(())
//! ```

/// Stats-to-tree composition engine
pub mod analyzer;
/// Command handlers for CLI operations
pub mod cmd;
/// Error types with contextual suggestions
pub mod error;
/// Shared formatting utilities
pub mod fmt;
/// Infrastructure traits for filesystem access
pub mod infra;
/// Live report state channel
pub mod live;
