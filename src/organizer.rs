//! The four folder operations.
//!
//! Each operation makes one pass over a listing taken when it starts. A file
//! that cannot be handled is recorded as an [`ItemFailure`] and the pass moves
//! on; nothing is rolled back, so a report always tells how many files were
//! moved and how many were not. Only problems with the target folder itself
//! abort a run, and they do so before anything is touched.

use crate::config::CompiledFilters;
use crate::digest::file_digest;
use crate::file_category::CategoryTable;
use crate::file_organizer::{FileOrganizer, MoveRecord, OrganizeError, OrganizeResult};
use crate::progress::ProgressObserver;
use crate::report::{
    DedupReport, ExtensionReport, FlattenReport, FolderCleanup, ItemFailure, YearReport,
};
use crate::timestamps::{CreationTimeSource, FsCreationTime};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Subfolder receiving the first copy of every distinct content.
pub const UNIQUE_FOLDER: &str = "Unique Files";

/// Organizes the contents of a folder.
pub struct Organizer {
    categories: CategoryTable,
    filters: CompiledFilters,
    creation_time: Box<dyn CreationTimeSource>,
}

impl Organizer {
    /// Creates an organizer that processes every file and reads creation
    /// times from file metadata.
    pub fn new(categories: CategoryTable) -> Self {
        Self {
            categories,
            filters: CompiledFilters::default(),
            creation_time: Box::new(FsCreationTime),
        }
    }

    /// Restricts every operation to files accepted by `filters`.
    pub fn with_filters(mut self, filters: CompiledFilters) -> Self {
        self.filters = filters;
        self
    }

    /// Replaces the creation-time lookup.
    pub fn with_creation_time_source(
        mut self,
        source: impl CreationTimeSource + 'static,
    ) -> Self {
        self.creation_time = Box::new(source);
        self
    }

    /// Moves every top-level file into the folder its extension maps to.
    pub fn categorize_by_extension(
        &self,
        base_path: &Path,
        observer: &mut dyn ProgressObserver,
    ) -> OrganizeResult<ExtensionReport> {
        let files = self.list_top_level_files(base_path)?;
        info!(folder = %base_path.display(), files = files.len(), "organizing by extension");

        let mut report = ExtensionReport::default();
        let total = files.len();

        for (index, file_path) in files.iter().enumerate() {
            let name = file_label(file_path);
            let folder = self.categories.folder_for(&name);

            match move_into(file_path, &base_path.join(folder)) {
                Ok(record) => {
                    *report.per_category.entry(folder.to_string()).or_insert(0) += 1;
                    report.moves.push(record);
                }
                Err(e) => report.failures.push(failure(file_path, e)),
            }
            observer.item_processed(index + 1, total, &name);
        }

        Ok(report)
    }

    /// Moves every top-level file into a folder named after the year it was
    /// created in.
    pub fn group_by_creation_year(
        &self,
        base_path: &Path,
        observer: &mut dyn ProgressObserver,
    ) -> OrganizeResult<YearReport> {
        let files = self.list_top_level_files(base_path)?;
        info!(folder = %base_path.display(), files = files.len(), "organizing by creation year");

        let mut report = YearReport::default();
        let total = files.len();

        for (index, file_path) in files.iter().enumerate() {
            let name = file_label(file_path);

            let outcome = self
                .creation_time
                .created_year(file_path)
                .ok_or_else(|| OrganizeError::CreationTimeUnavailable(file_path.clone()))
                .and_then(|year| {
                    let year_dir = base_path.join(year.to_string());
                    let created = FileOrganizer::ensure_dir(&year_dir)?;
                    if created {
                        report.year_folders_created += 1;
                    }
                    let record = FileOrganizer::safe_move(file_path, &year_dir)?;
                    Ok((year, record))
                });

            match outcome {
                Ok((year, record)) => {
                    log_move(&record);
                    *report.per_year.entry(year).or_insert(0) += 1;
                    report.moves.push(record);
                }
                Err(e) => report.failures.push(failure(file_path, e)),
            }
            observer.item_processed(index + 1, total, &name);
        }

        Ok(report)
    }

    /// Moves the first file of every distinct content into
    /// [`UNIQUE_FOLDER`]; later files with already seen content stay where
    /// they are.
    pub fn separate_unique(
        &self,
        base_path: &Path,
        observer: &mut dyn ProgressObserver,
    ) -> OrganizeResult<DedupReport> {
        let files = self.list_top_level_files(base_path)?;
        info!(folder = %base_path.display(), files = files.len(), "separating unique files");

        let unique_dir = base_path.join(UNIQUE_FOLDER);
        let mut seen: HashSet<String> = HashSet::new();
        let mut report = DedupReport::default();
        let total = files.len();

        for (index, file_path) in files.iter().enumerate() {
            let name = file_label(file_path);

            match file_digest(file_path) {
                Ok(digest) if seen.contains(&digest) => {
                    debug!(file = %file_path.display(), "duplicate content, left in place");
                    report.duplicates.push(file_path.clone());
                }
                Ok(digest) => match move_into(file_path, &unique_dir) {
                    Ok(record) => {
                        seen.insert(digest);
                        report.moves.push(record);
                    }
                    Err(e) => report.failures.push(failure(file_path, e)),
                },
                Err(e) => report.failures.push(failure(file_path, e)),
            }
            observer.item_processed(index + 1, total, &name);
        }

        Ok(report)
    }

    /// Moves every file found below the subfolders of `base_path` into
    /// `base_path` itself, deepest folders first.
    ///
    /// With `remove_empty_folders`, every subfolder left empty afterwards is
    /// deleted, deepest first. Folders still holding something are kept.
    pub fn flatten(
        &self,
        base_path: &Path,
        remove_empty_folders: bool,
        observer: &mut dyn ProgressObserver,
    ) -> OrganizeResult<FlattenReport> {
        FileOrganizer::validate_base_path(base_path)?;

        let mut report = FlattenReport::default();
        let mut files: Vec<PathBuf> = Vec::new();
        let mut folders: Vec<PathBuf> = Vec::new();

        for entry in WalkDir::new(base_path)
            .min_depth(1)
            .contents_first(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(base_path).to_path_buf();
                    report.failures.push(failure(&path, e));
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                folders.push(entry.into_path());
            } else if entry.depth() > 1 && entry.path().is_file() {
                let rel_path = entry.path().strip_prefix(base_path).unwrap_or(entry.path());
                if self.filters.should_include(rel_path) {
                    files.push(entry.into_path());
                }
            }
        }

        info!(folder = %base_path.display(), files = files.len(), "flattening");
        let total = files.len();

        for (index, file_path) in files.iter().enumerate() {
            match FileOrganizer::safe_move(file_path, base_path) {
                Ok(record) => {
                    log_move(&record);
                    report.moves.push(record);
                }
                Err(e) => report.failures.push(failure(file_path, e)),
            }
            observer.item_processed(index + 1, total, &file_label(file_path));
        }

        if remove_empty_folders {
            report.cleanup = Some(remove_empty(&folders));
        }

        Ok(report)
    }

    /// Files directly inside `base_path` that pass the filters, sorted by
    /// name. Directories are never listed.
    fn list_top_level_files(&self, base_path: &Path) -> OrganizeResult<Vec<PathBuf>> {
        FileOrganizer::validate_base_path(base_path)?;

        let entries = fs::read_dir(base_path).map_err(|source| OrganizeError::ReadDirFailed {
            path: base_path.to_path_buf(),
            source,
        })?;

        let mut files: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| {
                path.file_name()
                    .is_some_and(|name| self.filters.should_include(Path::new(name)))
            })
            .collect();
        files.sort();
        Ok(files)
    }
}

/// Creates `dest_dir` when needed, then safe-moves `file_path` into it.
fn move_into(file_path: &Path, dest_dir: &Path) -> OrganizeResult<MoveRecord> {
    FileOrganizer::ensure_dir(dest_dir)?;
    let record = FileOrganizer::safe_move(file_path, dest_dir)?;
    log_move(&record);
    Ok(record)
}

/// Removes each folder that is empty, in the given (deepest first) order.
fn remove_empty(folders: &[PathBuf]) -> FolderCleanup {
    let mut cleanup = FolderCleanup::default();
    for folder in folders {
        // remove_dir refuses non-empty folders.
        match fs::remove_dir(folder) {
            Ok(()) => {
                debug!(folder = %folder.display(), "removed empty folder");
                cleanup.removed.push(folder.clone());
            }
            Err(e) => {
                debug!(folder = %folder.display(), error = %e, "folder kept");
                cleanup.kept.push(folder.clone());
            }
        }
    }
    cleanup
}

fn log_move(record: &MoveRecord) {
    if record.renamed {
        debug!(
            from = %record.source.display(),
            to = %record.destination.display(),
            "destination taken, renamed"
        );
    } else {
        debug!(from = %record.source.display(), to = %record.destination.display(), "moved");
    }
}

fn failure(path: &Path, error: impl std::fmt::Display) -> ItemFailure {
    warn!(file = %path.display(), error = %error, "skipping");
    ItemFailure::new(path, error)
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
