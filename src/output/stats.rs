//! Statistics display for pipeline results
//!
//! This module renders the per-category counts of a pipeline run.

use crate::record::{PageKind, PipelineResult, PipelineStats};

/// One line of the statistics table
#[derive(Debug, Clone, PartialEq)]
pub struct StatLine {
    pub kind: PageKind,
    pub count: usize,
    pub percentage: f64,
}

/// Builds the per-kind breakdown, sorted by count (descending)
pub fn stat_lines(stats: &PipelineStats) -> Vec<StatLine> {
    let mut lines: Vec<StatLine> = PageKind::ALL
        .iter()
        .map(|kind| {
            let count = stats.get(*kind);
            let percentage = if stats.total > 0 {
                (count as f64 / stats.total as f64) * 100.0
            } else {
                0.0
            };
            StatLine {
                kind: *kind,
                count,
                percentage,
            }
        })
        .collect();

    lines.sort_by(|a, b| b.count.cmp(&a.count));
    lines
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(result: &PipelineResult) {
    let stats = &result.stats;

    println!("=== Site Census ===\n");
    println!("Overview:");
    println!("  Total pages: {}", stats.total);

    let synthetic = result.records.values().filter(|r| r.synthetic).count();
    let failed = result.records.values().filter(|r| r.error.is_some()).count();
    println!("  Synthetic (coverage) records: {}", synthetic);
    println!("  Extraction failures: {}", failed);
    println!();

    println!("Pages by Category:");
    for line in stat_lines(stats) {
        println!("  {}: {} ({:.1}%)", line.kind, line.count, line.percentage);
    }
    println!();
}
