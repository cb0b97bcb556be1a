//! Command-line interface module for tidyfolder.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing and validation
//! - Loading settings and the category table
//! - Dispatching to the selected operation
//! - Presenting progress and the run summary

use crate::config::Settings;
use crate::file_category::CategoryTable;
use crate::file_organizer::{FileOrganizer, OrganizeResult};
use crate::organizer::{Organizer, UNIQUE_FOLDER};
use crate::output::{OutputFormatter, ProgressBarObserver};
use crate::progress::{NoProgress, ProgressObserver};
use crate::report::{Report, RunSummary};
use clap::{ArgGroup, Parser};
use std::path::{Path, PathBuf};

/// Organize the files of a folder.
#[derive(Debug, Parser)]
#[command(name = "tidyfolder", version, about)]
#[command(group(
    ArgGroup::new("mode")
        .required(true)
        .args(["extension", "creation", "unique", "flatten"])
))]
pub struct Cli {
    /// Path of the folder to organize (quote it if it has spaces)
    pub folder: PathBuf,

    /// Organize files by extension
    #[arg(short = 'e', long)]
    pub extension: bool,

    /// Organize files by creation year
    #[arg(short = 'c', long)]
    pub creation: bool,

    /// Move only unique files
    #[arg(short = 'u', long)]
    pub unique: bool,

    /// Flatten all subfolders
    #[arg(short = 'f', long)]
    pub flatten: bool,

    /// Remove empty folders after flattening
    #[arg(short = 'r', long = "remove-folders", requires = "flatten")]
    pub remove_folders: bool,

    /// Category table to use instead of file_categories.json
    #[arg(long, value_name = "PATH")]
    pub categories: Option<PathBuf>,

    /// Settings file to use instead of the default lookup
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Do not show a progress bar
    #[arg(short, long)]
    pub quiet: bool,

    /// Log every file as it is handled
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// The operation selected on the command line.
    pub fn operation(&self) -> OrganizeCommand {
        if self.extension {
            OrganizeCommand::ByExtension
        } else if self.creation {
            OrganizeCommand::ByCreationYear
        } else if self.unique {
            OrganizeCommand::UniqueCopies
        } else {
            OrganizeCommand::Flatten {
                remove_empty_folders: self.remove_folders,
            }
        }
    }

    pub fn options(&self) -> RunOptions {
        RunOptions {
            categories_path: self.categories.clone(),
            config_path: self.config.clone(),
            json: self.json,
            show_progress: !self.quiet && !self.json,
        }
    }
}

/// Represents a CLI command to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrganizeCommand {
    /// Move files into category folders by extension.
    ByExtension,
    /// Move files into folders named after their creation year.
    ByCreationYear,
    /// Move the first copy of each distinct content into "Unique Files".
    UniqueCopies,
    /// Pull every file out of the subfolders.
    Flatten {
        /// Delete subfolders left empty afterwards.
        remove_empty_folders: bool,
    },
}

/// Everything besides the command that shapes a run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub categories_path: Option<PathBuf>,
    pub config_path: Option<PathBuf>,
    pub json: bool,
    pub show_progress: bool,
}

/// Runs one command against `dir_path`.
///
/// Settings, the category table and the target folder are all checked
/// before anything is moved; any problem with them is returned as an error
/// and the folder is left untouched. Per-file problems are reported but do
/// not make the run fail.
///
/// # Examples
///
/// ```no_run
/// use tidyfolder::cli::{run_cli, OrganizeCommand, RunOptions};
/// use std::path::Path;
///
/// let result = run_cli(
///     OrganizeCommand::ByExtension,
///     Path::new("/path/to/directory"),
///     &RunOptions::default(),
/// );
/// match result {
///     Ok(summary) => println!("{:?}", summary),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(
    command: OrganizeCommand,
    dir_path: &Path,
    options: &RunOptions,
) -> Result<RunSummary, String> {
    let organizer = build_organizer(options)?;

    FileOrganizer::validate_base_path(dir_path)
        .map_err(|_| format!("'{}' is not a valid folder.", dir_path.display()))?;

    let mut progress_bar = options
        .show_progress
        .then(|| ProgressBarObserver::new(progress_message(command)));
    let mut no_progress = NoProgress;
    let observer: &mut dyn ProgressObserver = match progress_bar.as_mut() {
        Some(bar) => bar,
        None => &mut no_progress,
    };

    let outcome: OrganizeResult<(Box<dyn Report>, String)> = match command {
        OrganizeCommand::ByExtension => organizer
            .categorize_by_extension(dir_path, observer)
            .map(|report| boxed(report, "All files are organized by their extension")),
        OrganizeCommand::ByCreationYear => organizer
            .group_by_creation_year(dir_path, observer)
            .map(|report| boxed(report, "All files are organized by creation year")),
        OrganizeCommand::UniqueCopies => {
            organizer.separate_unique(dir_path, observer).map(|report| {
                let message = unique_done_message(dir_path, report.unique_files());
                boxed(report, &message)
            })
        }
        OrganizeCommand::Flatten {
            remove_empty_folders,
        } => organizer
            .flatten(dir_path, remove_empty_folders, observer)
            .map(|report| boxed(report, "Folder successfully flattened")),
    };

    if let Some(bar) = &progress_bar {
        bar.finish();
    }

    let (report, done_message) = outcome.map_err(|e| e.to_string())?;
    let summary = report.summary();

    let complete = report.failures().is_empty();

    if options.json {
        // stdout carries only the JSON document.
        OutputFormatter::report_failures(report.as_ref());
        let rendered = serde_json::to_string_pretty(&summary)
            .map_err(|e| format!("Could not render summary: {}", e))?;
        println!("{}", rendered);
        return Ok(summary);
    }

    OutputFormatter::report_details(report.as_ref());
    if complete {
        OutputFormatter::success(&done_message);
    }
    OutputFormatter::summary_table(&summary);
    if !complete {
        OutputFormatter::warning(
            "Some files could not be organized. Files already moved stay where they are; please review errors above.",
        );
    }
    Ok(summary)
}

fn boxed<R: Report + 'static>(report: R, done_message: &str) -> (Box<dyn Report>, String) {
    (Box::new(report), done_message.to_string())
}

/// Loads settings, filters and the category table.
fn build_organizer(options: &RunOptions) -> Result<Organizer, String> {
    let settings = Settings::load(options.config_path.as_deref())
        .map_err(|e| format!("Error loading configuration: {}", e))?;

    let filters = settings
        .filters
        .compile()
        .map_err(|e| format!("Error compiling filters: {}", e))?;

    let categories_path = options
        .categories_path
        .as_deref()
        .or(settings.categories_file.as_deref());
    let categories = CategoryTable::locate_and_load(categories_path)
        .map_err(|e| format!("Error loading file categories: {}", e))?;
    tracing::debug!(extensions = categories.len(), "loaded category table");

    Ok(Organizer::new(categories).with_filters(filters))
}

/// `Unique Files` only exists once something was moved into it.
fn unique_done_message(dir_path: &Path, unique_files: usize) -> String {
    if unique_files == 0 {
        "No files to move".to_string()
    } else {
        format!(
            "All unique files moved to {}",
            dir_path.join(UNIQUE_FOLDER).display()
        )
    }
}

fn progress_message(command: OrganizeCommand) -> &'static str {
    match command {
        OrganizeCommand::ByExtension => "Organizing files by extension...",
        OrganizeCommand::ByCreationYear => "Organizing files by creation year...",
        OrganizeCommand::UniqueCopies => "Separating unique files...",
        OrganizeCommand::Flatten { .. } => "Extracting files from sub folders...",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_selectors_map_to_commands() {
        let cli = Cli::try_parse_from(["tidyfolder", "dir", "-e"]).unwrap();
        assert_eq!(cli.operation(), OrganizeCommand::ByExtension);

        let cli = Cli::try_parse_from(["tidyfolder", "dir", "--creation"]).unwrap();
        assert_eq!(cli.operation(), OrganizeCommand::ByCreationYear);

        let cli = Cli::try_parse_from(["tidyfolder", "dir", "-u"]).unwrap();
        assert_eq!(cli.operation(), OrganizeCommand::UniqueCopies);

        let cli = Cli::try_parse_from(["tidyfolder", "dir", "-f", "-r"]).unwrap();
        assert_eq!(
            cli.operation(),
            OrganizeCommand::Flatten {
                remove_empty_folders: true
            }
        );
        assert_eq!(cli.folder, PathBuf::from("dir"));
    }

    #[test]
    fn test_selector_is_required() {
        assert!(Cli::try_parse_from(["tidyfolder", "dir"]).is_err());
    }

    #[test]
    fn test_selectors_are_mutually_exclusive() {
        assert!(Cli::try_parse_from(["tidyfolder", "dir", "-e", "-u"]).is_err());
    }

    #[test]
    fn test_remove_folders_requires_flatten() {
        assert!(Cli::try_parse_from(["tidyfolder", "dir", "-e", "-r"]).is_err());
    }

    #[test]
    fn test_unique_done_message_names_folder_only_when_used() {
        let dir = Path::new("/data");
        assert_eq!(unique_done_message(dir, 0), "No files to move");
        assert!(unique_done_message(dir, 2).ends_with(&format!(
            "{}",
            dir.join(UNIQUE_FOLDER).display()
        )));
    }

    #[test]
    fn test_json_disables_progress() {
        let cli = Cli::try_parse_from(["tidyfolder", "dir", "-e", "--json"]).unwrap();
        let options = cli.options();
        assert!(options.json);
        assert!(!options.show_progress);
    }
}
