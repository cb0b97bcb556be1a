//! Per-run reports and the label → count summaries derived from them.

use crate::file_organizer::MoveRecord;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;
use std::path::PathBuf;

pub const FILES_MOVED: &str = "Files Moved";
pub const FILES_NOT_MOVED: &str = "Files Not Moved";
pub const TOTAL_YEARS_FOLDER: &str = "Total Years Folder";
pub const FILES_IN_YEAR: &str = "Files In Year";
pub const UNIQUE_FILES: &str = "Unique Files";
pub const DUPLICATE_FILES: &str = "Duplicate Files (Files Not Moved)";
pub const FOLDERS_REMOVED: &str = "Folders Removed";
pub const FOLDERS_KEPT: &str = "Folders Kept";

/// A file the run could not process, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    pub path: PathBuf,
    pub reason: String,
}

impl ItemFailure {
    pub fn new(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// One value of a [`RunSummary`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryValue {
    Count(usize),
    Breakdown(BTreeMap<String, usize>),
}

impl Serialize for SummaryValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SummaryValue::Count(n) => serializer.serialize_u64(*n as u64),
            SummaryValue::Breakdown(map) => map.serialize(serializer),
        }
    }
}

/// Ordered label → count mapping handed back to the caller for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    entries: Vec<(String, SummaryValue)>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_count(&mut self, label: impl Into<String>, count: usize) {
        self.entries.push((label.into(), SummaryValue::Count(count)));
    }

    pub fn push_breakdown(&mut self, label: impl Into<String>, counts: BTreeMap<String, usize>) {
        self.entries
            .push((label.into(), SummaryValue::Breakdown(counts)));
    }

    pub fn get(&self, label: &str) -> Option<&SummaryValue> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v)
    }

    /// The plain count stored under `label`.
    pub fn count(&self, label: &str) -> Option<usize> {
        match self.get(label)? {
            SummaryValue::Count(n) => Some(*n),
            SummaryValue::Breakdown(_) => None,
        }
    }

    /// The nested counts stored under `label`.
    pub fn breakdown(&self, label: &str) -> Option<&BTreeMap<String, usize>> {
        match self.get(label)? {
            SummaryValue::Breakdown(map) => Some(map),
            SummaryValue::Count(_) => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SummaryValue)> {
        self.entries.iter().map(|(l, v)| (l.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for RunSummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, value) in &self.entries {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

/// Common view over the four operation reports.
pub trait Report {
    /// Transient label → count summary.
    fn summary(&self) -> RunSummary;
    /// Every file that was moved.
    fn moves(&self) -> &[MoveRecord];
    /// Every file that could not be processed.
    fn failures(&self) -> &[ItemFailure];

    fn files_moved(&self) -> usize {
        self.moves().len()
    }

    fn files_not_moved(&self) -> usize {
        self.failures().len()
    }
}

/// Outcome of categorizing by extension.
#[derive(Debug, Default)]
pub struct ExtensionReport {
    /// Files moved into each category folder.
    pub per_category: BTreeMap<String, usize>,
    pub moves: Vec<MoveRecord>,
    pub failures: Vec<ItemFailure>,
}

impl Report for ExtensionReport {
    fn summary(&self) -> RunSummary {
        let mut summary = RunSummary::new();
        for (category, count) in &self.per_category {
            summary.push_count(category.clone(), *count);
        }
        if !self.failures.is_empty() {
            summary.push_count(FILES_NOT_MOVED, self.failures.len());
        }
        summary
    }

    fn moves(&self) -> &[MoveRecord] {
        &self.moves
    }

    fn failures(&self) -> &[ItemFailure] {
        &self.failures
    }
}

/// Outcome of grouping by creation year.
#[derive(Debug, Default)]
pub struct YearReport {
    /// Year folders that did not exist before this run.
    pub year_folders_created: usize,
    /// Files moved into each year folder.
    pub per_year: BTreeMap<i32, usize>,
    pub moves: Vec<MoveRecord>,
    pub failures: Vec<ItemFailure>,
}

impl Report for YearReport {
    fn summary(&self) -> RunSummary {
        let mut summary = RunSummary::new();
        summary.push_count(TOTAL_YEARS_FOLDER, self.year_folders_created);
        summary.push_count(FILES_MOVED, self.moves.len());
        summary.push_count(FILES_NOT_MOVED, self.failures.len());
        summary.push_breakdown(
            FILES_IN_YEAR,
            self.per_year
                .iter()
                .map(|(year, count)| (year.to_string(), *count))
                .collect(),
        );
        summary
    }

    fn moves(&self) -> &[MoveRecord] {
        &self.moves
    }

    fn failures(&self) -> &[ItemFailure] {
        &self.failures
    }
}

/// Outcome of separating unique copies.
#[derive(Debug, Default)]
pub struct DedupReport {
    /// Files left in place because their content was already seen.
    pub duplicates: Vec<PathBuf>,
    pub moves: Vec<MoveRecord>,
    pub failures: Vec<ItemFailure>,
}

impl DedupReport {
    pub fn unique_files(&self) -> usize {
        self.moves.len()
    }

    pub fn duplicate_files(&self) -> usize {
        self.duplicates.len()
    }
}

impl Report for DedupReport {
    fn summary(&self) -> RunSummary {
        let mut summary = RunSummary::new();
        summary.push_count(UNIQUE_FILES, self.unique_files());
        summary.push_count(DUPLICATE_FILES, self.duplicate_files());
        if !self.failures.is_empty() {
            summary.push_count(FILES_NOT_MOVED, self.failures.len());
        }
        summary
    }

    fn moves(&self) -> &[MoveRecord] {
        &self.moves
    }

    fn failures(&self) -> &[ItemFailure] {
        &self.failures
    }
}

/// Outcome of flattening a tree.
#[derive(Debug, Default)]
pub struct FlattenReport {
    pub moves: Vec<MoveRecord>,
    pub failures: Vec<ItemFailure>,
    /// Present only when empty folder removal was requested.
    pub cleanup: Option<FolderCleanup>,
}

/// Subfolders handled by the empty folder removal pass.
#[derive(Debug, Default)]
pub struct FolderCleanup {
    pub removed: Vec<PathBuf>,
    /// Folders left behind because they still hold something.
    pub kept: Vec<PathBuf>,
}

impl Report for FlattenReport {
    fn summary(&self) -> RunSummary {
        let mut summary = RunSummary::new();
        summary.push_count(FILES_MOVED, self.moves.len());
        summary.push_count(FILES_NOT_MOVED, self.failures.len());
        if let Some(cleanup) = &self.cleanup {
            summary.push_count(FOLDERS_REMOVED, cleanup.removed.len());
            summary.push_count(FOLDERS_KEPT, cleanup.kept.len());
        }
        summary
    }

    fn moves(&self) -> &[MoveRecord] {
        &self.moves
    }

    fn failures(&self) -> &[ItemFailure] {
        &self.failures
    }
}
