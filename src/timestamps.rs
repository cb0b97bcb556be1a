//! Creation-time lookup.
//!
//! Not every platform or filesystem records when a file was created, so the
//! lookup is a capability that may come back empty.

use chrono::{DateTime, Datelike, Local};
use std::fs;
use std::path::Path;

/// Reports when a file was created.
pub trait CreationTimeSource {
    /// Returns `None` when the creation time cannot be determined.
    fn created(&self, path: &Path) -> Option<DateTime<Local>>;

    /// Calendar year (local time) the file was created in.
    fn created_year(&self, path: &Path) -> Option<i32> {
        self.created(path).map(|t| t.year())
    }
}

/// Reads the creation ("birth") time from file metadata.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsCreationTime;

impl CreationTimeSource for FsCreationTime {
    fn created(&self, path: &Path) -> Option<DateTime<Local>> {
        let created = fs::metadata(path).ok()?.created().ok()?;
        Some(DateTime::<Local>::from(created))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    struct Fixed(i32);

    impl CreationTimeSource for Fixed {
        fn created(&self, _path: &Path) -> Option<DateTime<Local>> {
            Local.with_ymd_and_hms(self.0, 6, 15, 12, 0, 0).single()
        }
    }

    #[test]
    fn test_created_year_from_source() {
        assert_eq!(Fixed(2021).created_year(Path::new("any")), Some(2021));
    }

    #[test]
    fn test_fs_source_missing_file() {
        assert!(FsCreationTime.created(Path::new("/non/existent/file")).is_none());
    }

    #[test]
    fn test_fs_source_matches_metadata() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("new.txt");
        fs::write(&path, "x").unwrap();

        // Birth time is not available everywhere; when it is, it must agree
        // with the metadata.
        match fs::metadata(&path).unwrap().created() {
            Ok(t) => assert_eq!(
                FsCreationTime.created_year(&path),
                Some(DateTime::<Local>::from(t).year())
            ),
            Err(_) => assert!(FsCreationTime.created(&path).is_none()),
        }
    }
}
