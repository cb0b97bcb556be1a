//! Output formatting and styling module.
//!
//! Provides a centralized interface for all CLI output, including colored
//! messages, the progress bar shown while an operation runs, and the summary
//! table printed once it finishes.

use crate::progress::ProgressObserver;
use crate::report::{Report, RunSummary, SummaryValue};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

/// Manages all CLI output with consistent styling and formatting.
///
/// This struct provides methods for:
/// - Success messages (green with ✓)
/// - Error messages (red with ✗)
/// - Warning messages (yellow with ⚠)
/// - Summary tables with run counters
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tidyfolder::output::OutputFormatter;
    /// OutputFormatter::success("All files are organized by their extension");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Creates a progress bar whose length is set by the first update.
    pub fn create_progress_bar(message: &str) -> ProgressBar {
        let pb = ProgressBar::new(0);
        if let Ok(style) =
            ProgressStyle::default_bar().template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("█▓░"));
        }
        pb.set_message(message.to_string());
        pb
    }

    /// Prints a warning for every move that had to pick a new name, and an
    /// error line for every file that could not be processed.
    pub fn report_details<R: Report + ?Sized>(report: &R) {
        for record in report.moves().iter().filter(|r| r.renamed) {
            Self::warning(&format!(
                "File already exists at destination: {}, renamed to {}",
                record
                    .destination
                    .parent()
                    .unwrap_or(&record.destination)
                    .join(record.source.file_name().unwrap_or_default())
                    .display(),
                record.destination.display()
            ));
        }

        Self::report_failures(report);
    }

    /// Prints an error line on stderr for every file that could not be
    /// processed.
    pub fn report_failures<R: Report + ?Sized>(report: &R) {
        for failure in report.failures() {
            Self::error(&format!("{}: {}", failure.path.display(), failure.reason));
        }
    }

    /// Prints a run summary as a two-column table.
    ///
    /// Nested counts (such as files per year) are listed indented below
    /// their label.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tidyfolder::output::OutputFormatter;
    /// use tidyfolder::report::RunSummary;
    ///
    /// let mut summary = RunSummary::new();
    /// summary.push_count("Images", 8);
    /// summary.push_count("Documents", 15);
    /// OutputFormatter::summary_table(&summary);
    /// ```
    pub fn summary_table(summary: &RunSummary) {
        Self::header("SUMMARY");

        if summary.is_empty() {
            println!("Nothing to organize.");
            return;
        }

        let label_width = summary
            .iter()
            .flat_map(|(label, value)| {
                let nested = match value {
                    SummaryValue::Count(_) => 0,
                    SummaryValue::Breakdown(map) => {
                        map.keys().map(|k| k.len() + 2).max().unwrap_or(0)
                    }
                };
                [label.len(), nested]
            })
            .max()
            .unwrap_or(0)
            .max(5);

        println!("{}", "-".repeat(label_width + 10));
        for (label, value) in summary.iter() {
            match value {
                SummaryValue::Count(count) => {
                    println!(
                        "{:<width$} | {}",
                        label,
                        count.to_string().green(),
                        width = label_width
                    );
                }
                SummaryValue::Breakdown(map) => {
                    println!("{:<width$} |", label.bold(), width = label_width);
                    for (key, count) in map {
                        let file_word = if *count == 1 { "file" } else { "files" };
                        println!(
                            "{:<width$} | {} {}",
                            format!("  {}", key),
                            count.to_string().green(),
                            file_word,
                            width = label_width
                        );
                    }
                }
            }
        }
        println!("{}", "-".repeat(label_width + 10));
    }
}

/// Drives an `indicatif` progress bar from operation progress.
pub struct ProgressBarObserver {
    bar: ProgressBar,
}

impl ProgressBarObserver {
    pub fn new(message: &str) -> Self {
        Self {
            bar: OutputFormatter::create_progress_bar(message),
        }
    }

    /// Clears the bar once the run is over.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressObserver for ProgressBarObserver {
    fn item_processed(&mut self, current: usize, total: usize, _label: &str) {
        self.bar.set_length(total as u64);
        self.bar.set_position(current as u64);
    }
}
