//! Operator-facing batch summary.

use crate::scheduler::BatchReport;

/// Print the outcome of one run: freshly processed, skipped, and errored
/// talks. Purely presentational.
pub fn print_summary(report: &BatchReport) {
    if !report.processed.is_empty() {
        println!("Processed {} talk(s):", report.processed.len());
        for talk in &report.processed {
            println!("  {}", talk.handle);
        }
    }

    if !report.skipped.is_empty() {
        println!("Skipped {} already-built talk(s):", report.skipped.len());
        for talk in &report.skipped {
            println!("  {}", talk.handle);
        }
    }

    if report.processed.is_empty() && report.skipped.is_empty() {
        println!("No talks found to process.");
    }

    if !report.errors.is_empty() {
        println!("{} error(s):", report.errors.len());
        for error in &report.errors {
            println!("  - {error}");
        }
    }
}
