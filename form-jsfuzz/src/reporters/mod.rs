// form-jsfuzz/src/reporters/mod.rs
//! Reporters for summarizing mutation results

use crate::error::FuzzResult;
use crate::mutators::MutationStats;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the summary file written into the artifacts directory
pub const SUMMARY_FILE: &str = "try_catch_results.txt";

/// Outcome of mutating one unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationReport {
    /// Name of the unit, usually its corpus file name
    pub unit: String,
    pub stats: MutationStats,
}

impl MutationReport {
    pub fn new(unit: impl Into<String>, stats: MutationStats) -> Self {
        Self {
            unit: unit.into(),
            stats,
        }
    }
}

/// Render the summary of a run
pub fn summarize(reports: &[MutationReport]) -> String {
    let mut totals = MutationStats::default();
    let mut annotated = Vec::new();
    let mut untouched = Vec::new();
    for report in reports {
        let stats = &report.stats;
        totals.decisions += stats.decisions;
        totals.skipped += stats.skipped;
        totals.wrapped_now += stats.wrapped_now;
        totals.deferred += stats.deferred;
        totals.wrapped_late += stats.wrapped_late;
        if stats.parameters_deviated {
            annotated.push(report.unit.as_str());
        }
        if stats.wrapped() == 0 {
            untouched.push(report.unit.as_str());
        }
    }

    // Writing into a String cannot fail.
    let mut out = String::new();
    let _ = writeln!(out, "=== Try/Catch Mutation Results ===");
    let _ = writeln!(out, "Total units: {}", reports.len());
    let _ = writeln!(out, "Wrap decisions: {}", totals.decisions);
    let _ = writeln!(out, "\nDecision counts:");
    let _ = writeln!(out, "  skipped: {}", totals.skipped);
    let _ = writeln!(out, "  wrapped now: {}", totals.wrapped_now);
    let _ = writeln!(out, "  deferred: {}", totals.deferred);
    let _ = writeln!(out, "  wrapped at exit: {}", totals.wrapped_late);
    let _ = writeln!(out, "Wrappers inserted: {}", totals.wrapped());

    if !annotated.is_empty() {
        let _ = writeln!(out, "\nUnits with resampled probabilities:");
        for unit in &annotated {
            let _ = writeln!(out, "  {}", unit);
        }
    }
    if !untouched.is_empty() {
        let _ = writeln!(out, "\nUnits without wrappers:");
        for unit in &untouched {
            let _ = writeln!(out, "  {}", unit);
        }
    }
    out
}

/// Print the summary of a run and save it to `artifacts_dir` if given.
/// Returns the path of the saved summary.
pub fn report_mutation_results(
    reports: &[MutationReport],
    artifacts_dir: Option<&Path>,
) -> FuzzResult<Option<PathBuf>> {
    let summary = summarize(reports);
    println!("\n{}", summary);

    let Some(dir) = artifacts_dir else {
        return Ok(None);
    };
    fs::create_dir_all(dir)?;
    let path = dir.join(SUMMARY_FILE);
    fs::write(&path, &summary)?;
    println!("Results saved to {}", path.display());
    Ok(Some(path))
}
