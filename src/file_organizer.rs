/// Collision-safe file moves.
///
/// Every operation relocates files through [`FileOrganizer::safe_move`], which
/// never overwrites: when the destination name is taken, a numeric suffix is
/// appended before the extension (`report.pdf` → `report_1.pdf`).
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A completed move of a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    /// Where the file was before the move.
    pub source: PathBuf,
    /// Where the file ended up.
    pub destination: PathBuf,
    /// True when the destination name received a numeric suffix.
    pub renamed: bool,
}

/// Errors that can occur during file organization.
#[derive(Debug, thiserror::Error)]
pub enum OrganizeError {
    /// The base directory path is invalid or doesn't exist.
    #[error("Invalid folder {}: {source}", .path.display())]
    InvalidBasePath { path: PathBuf, source: io::Error },
    /// Failed to create a destination directory.
    #[error("Failed to create directory {}: {source}", .path.display())]
    DirectoryCreationFailed { path: PathBuf, source: io::Error },
    /// Failed to move a file to its destination.
    #[error("Failed to move {} to {}: {source}", .file.display(), .destination.display())]
    FileMoveFailure {
        file: PathBuf,
        destination: PathBuf,
        source: io::Error,
    },
    /// Failed to read a file while computing its digest.
    #[error("Failed to hash {}: {source}", .path.display())]
    DigestFailed { path: PathBuf, source: io::Error },
    /// The platform could not report when the file was created.
    #[error("Creation time unavailable for {}", .0.display())]
    CreationTimeUnavailable(PathBuf),
    /// Walking the directory tree failed.
    #[error("Failed to read directory {}: {source}", .path.display())]
    ReadDirFailed { path: PathBuf, source: io::Error },
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Splits a file name into stem and extension (without its dot). Leading
/// dots of the name never start an extension.
///
/// The name is never re-encoded, so names that are not valid UTF-8 keep
/// their exact bytes.
///
/// ```
/// use std::ffi::OsStr;
/// use tidyfolder::file_organizer::split_file_name;
///
/// assert_eq!(
///     split_file_name(OsStr::new("a.tar.gz")),
///     (OsStr::new("a.tar"), Some(OsStr::new("gz")))
/// );
/// assert_eq!(split_file_name(OsStr::new(".bashrc")), (OsStr::new(".bashrc"), None));
/// assert_eq!(split_file_name(OsStr::new("README")), (OsStr::new("README"), None));
/// ```
pub fn split_file_name(name: &OsStr) -> (&OsStr, Option<&OsStr>) {
    let bytes = name.as_encoded_bytes();
    let body = match bytes.iter().position(|&b| b != b'.') {
        Some(start) => &bytes[start..],
        None => return (name, None),
    };
    if !body.contains(&b'.') {
        return (name, None);
    }

    let path = Path::new(name);
    match (path.file_stem(), path.extension()) {
        (Some(stem), Some(ext)) => (stem, Some(ext)),
        _ => (name, None),
    }
}

/// `<stem>_<counter>.<ext>`, or `<stem>_<counter>` without an extension.
fn suffixed_name(name: &OsStr, counter: u64) -> OsString {
    let (stem, ext) = split_file_name(name);
    let mut candidate = stem.to_os_string();
    candidate.push(format!("_{}", counter));
    if let Some(ext) = ext {
        candidate.push(".");
        candidate.push(ext);
    }
    candidate
}

/// Any directory entry occupies a name, including a dangling symlink.
fn is_taken(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Moves files between folders without ever overwriting.
pub struct FileOrganizer;

impl FileOrganizer {
    /// Checks that `base_path` exists and is a directory.
    pub fn validate_base_path(base_path: &Path) -> OrganizeResult<()> {
        let metadata = fs::metadata(base_path).map_err(|source| OrganizeError::InvalidBasePath {
            path: base_path.to_path_buf(),
            source,
        })?;

        if !metadata.is_dir() {
            return Err(OrganizeError::InvalidBasePath {
                path: base_path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::InvalidInput, "not a directory"),
            });
        }
        Ok(())
    }

    /// Creates `path` (and missing parents) unless it already is a directory.
    ///
    /// Returns `true` when the directory was created by this call.
    pub fn ensure_dir(path: &Path) -> OrganizeResult<bool> {
        if path.is_dir() {
            return Ok(false);
        }
        fs::create_dir_all(path).map_err(|source| OrganizeError::DirectoryCreationFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(true)
    }

    /// Picks the first free name for `file_name` inside `dest_dir`:
    /// the name itself, then `<stem>_1<ext>`, `<stem>_2<ext>`, ...
    pub fn resolve_destination(dest_dir: &Path, file_name: &OsStr) -> (PathBuf, bool) {
        let direct = dest_dir.join(file_name);
        if !is_taken(&direct) {
            return (direct, false);
        }

        let mut counter: u64 = 1;
        loop {
            let candidate = dest_dir.join(suffixed_name(file_name, counter));
            if !is_taken(&candidate) {
                return (candidate, true);
            }
            counter += 1;
        }
    }

    /// Moves `file_path` into `dest_dir`, renaming on collision.
    ///
    /// The destination directory must already exist. On failure the source
    /// file is left where it was.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use tidyfolder::file_organizer::FileOrganizer;
    /// use std::path::Path;
    ///
    /// let record = FileOrganizer::safe_move(
    ///     Path::new("/downloads/photo.jpg"),
    ///     Path::new("/downloads/Images"),
    /// );
    /// match record {
    ///     Ok(r) if r.renamed => println!("renamed to {}", r.destination.display()),
    ///     Ok(_) => println!("moved"),
    ///     Err(e) => eprintln!("{}", e),
    /// }
    /// ```
    pub fn safe_move(file_path: &Path, dest_dir: &Path) -> OrganizeResult<MoveRecord> {
        let file_name = file_path
            .file_name()
            .ok_or_else(|| OrganizeError::FileMoveFailure {
                file: file_path.to_path_buf(),
                destination: dest_dir.to_path_buf(),
                source: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "file has no name component",
                ),
            })?;

        let (destination, renamed) = Self::resolve_destination(dest_dir, file_name);

        Self::relocate(file_path, &destination).map_err(|source| OrganizeError::FileMoveFailure {
            file: file_path.to_path_buf(),
            destination: destination.clone(),
            source,
        })?;

        Ok(MoveRecord {
            source: file_path.to_path_buf(),
            destination,
            renamed,
        })
    }

    /// Renames, falling back to copy-and-remove when a plain rename is not
    /// possible (e.g. across filesystems).
    fn relocate(from: &Path, to: &Path) -> io::Result<()> {
        let rename_err = match fs::rename(from, to) {
            Ok(()) => return Ok(()),
            Err(e) => e,
        };

        if !from.is_file() {
            return Err(rename_err);
        }

        if let Err(copy_err) = fs::copy(from, to) {
            let _ = fs::remove_file(to);
            return Err(copy_err);
        }

        if let Err(remove_err) = fs::remove_file(from) {
            // Source must stay the only copy.
            let _ = fs::remove_file(to);
            return Err(remove_err);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn split(name: &str) -> (&str, Option<&str>) {
        let (stem, ext) = split_file_name(OsStr::new(name));
        (
            stem.to_str().unwrap(),
            ext.map(|e| e.to_str().unwrap()),
        )
    }

    #[test]
    fn test_split_file_name() {
        assert_eq!(split("photo.jpg"), ("photo", Some("jpg")));
        assert_eq!(split("a.b.c"), ("a.b", Some("c")));
        assert_eq!(split("noext"), ("noext", None));
        assert_eq!(split(".hidden"), (".hidden", None));
        assert_eq!(split("..weird"), ("..weird", None));
        assert_eq!(split(".config.toml"), (".config", Some("toml")));
        assert_eq!(split("trailing."), ("trailing", Some("")));
    }

    #[test]
    fn test_suffixed_name() {
        assert_eq!(suffixed_name(OsStr::new("report.pdf"), 2), "report_2.pdf");
        assert_eq!(suffixed_name(OsStr::new(".bashrc"), 1), ".bashrc_1");
        assert_eq!(suffixed_name(OsStr::new("README"), 3), "README_3");
        assert_eq!(suffixed_name(OsStr::new("trailing."), 1), "trailing_1.");
    }

    #[test]
    fn test_safe_move_without_collision() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        let dest = base_path.join("dest");
        fs::create_dir(&dest).unwrap();

        let file_path = base_path.join("test.txt");
        fs::write(&file_path, "test content").unwrap();

        let record = FileOrganizer::safe_move(&file_path, &dest).expect("Failed to move file");

        assert!(!record.renamed);
        assert_eq!(record.destination, dest.join("test.txt"));
        assert!(!file_path.exists());
        assert_eq!(fs::read_to_string(dest.join("test.txt")).unwrap(), "test content");
    }

    #[test]
    fn test_safe_move_never_overwrites() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        let dest = base_path.join("dest");
        fs::create_dir(&dest).unwrap();
        fs::write(dest.join("report.pdf"), "first").unwrap();
        fs::write(dest.join("report_1.pdf"), "second").unwrap();

        let file_path = base_path.join("report.pdf");
        fs::write(&file_path, "third").unwrap();

        let record = FileOrganizer::safe_move(&file_path, &dest).expect("Failed to move file");

        assert!(record.renamed);
        assert_eq!(record.destination, dest.join("report_2.pdf"));
        assert_eq!(fs::read_to_string(dest.join("report.pdf")).unwrap(), "first");
        assert_eq!(fs::read_to_string(dest.join("report_1.pdf")).unwrap(), "second");
        assert_eq!(fs::read_to_string(dest.join("report_2.pdf")).unwrap(), "third");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_safe_move_keeps_non_utf8_names() {
        use std::os::unix::ffi::OsStrExt;

        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        let dest = base_path.join("dest");
        fs::create_dir(&dest).unwrap();

        let name = OsStr::from_bytes(b"caf\xe9.txt");
        fs::write(base_path.join(name), "first").unwrap();
        let record = FileOrganizer::safe_move(&base_path.join(name), &dest).unwrap();
        assert!(!record.renamed);
        assert_eq!(record.destination, dest.join(name));

        fs::write(base_path.join(name), "second").unwrap();
        let record = FileOrganizer::safe_move(&base_path.join(name), &dest).unwrap();
        assert!(record.renamed);
        assert_eq!(record.destination, dest.join(OsStr::from_bytes(b"caf\xe9_1.txt")));

        assert_eq!(fs::read_to_string(dest.join(name)).unwrap(), "first");
        assert_eq!(fs::read_to_string(&record.destination).unwrap(), "second");
    }

    #[cfg(unix)]
    #[test]
    fn test_safe_move_treats_dangling_symlink_as_taken() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        let dest = base_path.join("dest");
        fs::create_dir(&dest).unwrap();
        std::os::unix::fs::symlink("/nonexistent/target", dest.join("a.txt")).unwrap();

        let file_path = base_path.join("a.txt");
        fs::write(&file_path, "content").unwrap();

        let record = FileOrganizer::safe_move(&file_path, &dest).unwrap();

        assert!(record.renamed);
        assert_eq!(record.destination, dest.join("a_1.txt"));
        let link = fs::symlink_metadata(dest.join("a.txt")).unwrap();
        assert!(link.file_type().is_symlink());
        assert_eq!(fs::read_to_string(dest.join("a_1.txt")).unwrap(), "content");
    }

    #[test]
    fn test_safe_move_missing_source_fails() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();

        let result = FileOrganizer::safe_move(&base_path.join("ghost.txt"), base_path);
        assert!(matches!(result, Err(OrganizeError::FileMoveFailure { .. })));
    }

    #[test]
    fn test_ensure_dir_reports_creation() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dir = temp_dir.path().join("Images");

        assert!(FileOrganizer::ensure_dir(&dir).unwrap());
        assert!(!FileOrganizer::ensure_dir(&dir).unwrap());
        assert!(dir.is_dir());
    }

    #[test]
    fn test_validate_base_path() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file_path = temp_dir.path().join("plain.txt");
        fs::write(&file_path, "x").unwrap();

        assert!(FileOrganizer::validate_base_path(temp_dir.path()).is_ok());
        assert!(FileOrganizer::validate_base_path(&file_path).is_err());
        assert!(FileOrganizer::validate_base_path(Path::new("/non/existent/path")).is_err());
    }
}
