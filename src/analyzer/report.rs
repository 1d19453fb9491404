//! Console report formatting
//!
//! Renders the chart-data array as an indented tree with human-readable
//! sizes and per-node shares of the owning asset.

use console::style;

use crate::analyzer::chart::{ChartGroup, ChartItem};
use crate::analyzer::SizeKind;
use crate::fmt::{format_bytes, CHART, PACKAGE};

/// Print the chart-data report to stdout
pub fn print_report(items: &[ChartItem], default_sizes: SizeKind) {
    println!();
    println!("{} {}", CHART, style("Bundle Composition").bold().underlined());
    println!();

    for item in items {
        print_asset(item, default_sizes);
        println!();
    }
}

fn print_asset(item: &ChartItem, default_sizes: SizeKind) {
    let mut summary = format!("{} stat", format_bytes(item.stat_size));
    if let Some(parsed) = item.parsed_size {
        summary.push_str(&format!(" | {} parsed", format_bytes(parsed)));
    }
    if let Some(gzip) = item.gzip_size {
        summary.push_str(&format!(" | {} gzip", format_bytes(gzip)));
    }

    println!(
        "{} {}  {}",
        PACKAGE,
        style(&item.label).bold(),
        style(summary).cyan()
    );

    let total = asset_metric(item, default_sizes).max(1);
    for group in &item.groups {
        print_group(group, default_sizes, total, 1);
    }
}

fn print_group(group: &ChartGroup, default_sizes: SizeKind, total: u64, depth: usize) {
    let size = group_metric(group, default_sizes);
    let percentage = (size as f64 / total as f64) * 100.0;

    println!(
        "{}{} ({:.1}%)  {}",
        "  ".repeat(depth),
        style(&group.label).dim(),
        percentage,
        format_bytes(size)
    );

    if let Some(children) = &group.groups {
        for child in children {
            print_group(child, default_sizes, total, depth + 1);
        }
    }
}

/// Metric value for the asset record, falling back to declared size
fn asset_metric(item: &ChartItem, kind: SizeKind) -> u64 {
    match kind {
        SizeKind::Stat => item.stat_size,
        SizeKind::Parsed => item.parsed_size.unwrap_or(item.stat_size),
        SizeKind::Gzip => item.gzip_size.unwrap_or(item.stat_size),
    }
}

fn group_metric(group: &ChartGroup, kind: SizeKind) -> u64 {
    match kind {
        SizeKind::Stat => group.stat_size,
        SizeKind::Parsed => group.parsed_size.unwrap_or(group.stat_size),
        SizeKind::Gzip => group.gzip_size.unwrap_or(group.stat_size),
    }
}
