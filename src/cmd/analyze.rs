//! Analyze command implementation
//!
//! Reads a stats JSON file, runs the composition pipeline and emits either a
//! console report or the raw chart-data JSON.

use std::path::PathBuf;

use anyhow::{Context, Result};
use console::style;

use crate::analyzer::{
    report, AnalyzerOptions, BundleAnalyzer, ExcludeMatcher, RawStats, SizeKind,
};
use crate::error::BundlemapError;
use crate::fmt::{MICROSCOPE, WARNING};

/// Run bundle composition analysis over a stats file.
///
/// With `--json` the chart-data array is printed instead of the console
/// report; `--output` additionally writes it to a file. An empty result is
/// reported as "nothing to analyze" and is not an error.
pub fn cmd_analyze(
    stats_file: &str,
    bundle_dir: Option<&str>,
    exclude: &[String],
    default_sizes: SizeKind,
    json: bool,
    output: Option<&str>,
) -> Result<()> {
    let stats_path = PathBuf::from(stats_file);
    let raw = std::fs::read_to_string(&stats_path).map_err(|source| {
        BundlemapError::StatsNotFound {
            path: stats_path.clone(),
            source,
        }
    })?;
    let stats = RawStats::from_json(&raw).map_err(|source| BundlemapError::StatsParse {
        path: stats_path.clone(),
        source,
    })?;

    let exclude_assets = exclude
        .iter()
        .map(|pattern| {
            ExcludeMatcher::pattern(pattern).map_err(|source| {
                BundlemapError::InvalidExcludePattern {
                    pattern: pattern.clone(),
                    source,
                }
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let options = AnalyzerOptions {
        exclude_assets,
        bundle_dir: bundle_dir.map(PathBuf::from),
        default_sizes,
    };

    if !json {
        println!(
            "{} {} Bundle Composition Analysis",
            MICROSCOPE,
            style("bundlemap").bold()
        );
        println!("   Stats: {}", stats_path.display());
        if let Some(dir) = &options.bundle_dir {
            println!("   Bundles: {}", dir.display());
        }
    }

    let analyzer = BundleAnalyzer::new(options);
    let Some(items) = analyzer.analyze(stats)? else {
        println!(
            "{} {}",
            WARNING,
            style("Nothing to analyze: no assets matched the filters").yellow()
        );
        return Ok(());
    };

    if let Some(output_path) = output {
        let serialized =
            serde_json::to_string_pretty(&items).context("Failed to serialize chart data")?;
        std::fs::write(output_path, serialized).map_err(|source| BundlemapError::Io {
            context: format!("writing chart data to {}", output_path),
            source,
        })?;
        if !json {
            println!("   Chart data written to {}", output_path);
        }
    }

    if json {
        let serialized =
            serde_json::to_string_pretty(&items).context("Failed to serialize chart data")?;
        println!("{}", serialized);
    } else {
        report::print_report(&items, default_sizes);
    }

    Ok(())
}
