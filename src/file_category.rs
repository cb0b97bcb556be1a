/// Extension-to-folder categorization.
///
/// The category table is an external JSON object mapping lowercase file
/// extensions (without the dot) to the name of the folder files with that
/// extension are moved into:
///
/// ```json
/// { "jpg": "Images", "pdf": "Documents", "mp3": "Music" }
/// ```
///
/// # Examples
///
/// ```
/// use tidyfolder::file_category::CategoryTable;
///
/// let table = CategoryTable::from_json_str(r#"{ "png": "Images" }"#).unwrap();
/// assert_eq!(table.folder_for("holiday.PNG"), "Images");
/// assert_eq!(table.folder_for("notes.xyz"), "Other");
/// assert_eq!(table.folder_for("Makefile"), "Other");
/// ```
use crate::config::{ConfigError, user_config_dir};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Folder used for extensions the table does not know.
pub const FALLBACK_CATEGORY: &str = "Other";

/// Extension key given to file names without a dot.
pub const NO_EXTENSION_KEY: &str = "other";

/// Default file name of the category table.
pub const CATEGORIES_FILE: &str = "file_categories.json";

/// Maps lowercase extensions to category folder names.
#[derive(Debug, Clone, Default)]
pub struct CategoryTable {
    folders: HashMap<String, String>,
}

impl CategoryTable {
    /// Builds a table from `(extension, folder)` pairs. Extensions are
    /// lowercased and stripped of a leading dot.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let folders = pairs
            .into_iter()
            .map(|(ext, folder)| (normalize_key(ext.as_ref()), folder.into()))
            .collect();
        Self { folders }
    }

    /// Parses a table from a JSON object document.
    ///
    /// Fails if the document is not an object of non-empty strings, or if a
    /// folder name would escape the target directory.
    pub fn from_json_str(json: &str) -> Result<Self, String> {
        let raw: HashMap<String, String> =
            serde_json::from_str(json).map_err(|e| format!("JSON parse error: {}", e))?;

        for (ext, folder) in &raw {
            let trimmed = folder.trim();
            if trimmed.is_empty() {
                return Err(format!("extension '{}' maps to an empty folder name", ext));
            }
            if trimmed == "." || trimmed == ".." || trimmed.contains(['/', '\\']) {
                return Err(format!(
                    "extension '{}' maps to '{}', which is not a plain folder name",
                    ext, folder
                ));
            }
        }

        Ok(Self::from_pairs(raw))
    }

    /// Loads the table from a specific file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ConfigError::CategoriesNotFound(vec![path.to_path_buf()])
            } else {
                ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        Self::from_json_str(&content).map_err(|reason| ConfigError::CategoriesInvalid {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Locates and loads the category table.
    ///
    /// The first candidate that exists wins:
    /// 1. `explicit` (command line or settings file); it must exist
    /// 2. `./file_categories.json`
    /// 3. `~/.config/tidyfolder/file_categories.json`
    ///
    /// There is no built-in fallback table: a missing table is an error.
    pub fn locate_and_load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }

        let mut candidates = vec![PathBuf::from(CATEGORIES_FILE)];
        if let Some(dir) = user_config_dir() {
            candidates.push(dir.join(CATEGORIES_FILE));
        }

        match candidates.iter().find(|p| p.is_file()) {
            Some(path) => Self::load_from_file(path),
            None => Err(ConfigError::CategoriesNotFound(candidates)),
        }
    }

    /// Returns the configured folder for an extension, if any.
    pub fn lookup(&self, extension: &str) -> Option<&str> {
        self.folders.get(&normalize_key(extension)).map(String::as_str)
    }

    /// Returns the category folder for a file name, falling back to
    /// [`FALLBACK_CATEGORY`].
    pub fn folder_for(&self, file_name: &str) -> &str {
        self.lookup(&extension_key(file_name))
            .unwrap_or(FALLBACK_CATEGORY)
    }

    pub fn len(&self) -> usize {
        self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }
}

fn normalize_key(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}

/// Derives the lookup key for a file name: the lowercase text after the
/// last dot, or [`NO_EXTENSION_KEY`] when the name has no dot.
///
/// ```
/// use tidyfolder::file_category::extension_key;
///
/// assert_eq!(extension_key("Report.PDF"), "pdf");
/// assert_eq!(extension_key("archive.tar.gz"), "gz");
/// assert_eq!(extension_key("README"), "other");
/// ```
pub fn extension_key(file_name: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((_, ext)) => ext.to_lowercase(),
        None => NO_EXTENSION_KEY.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_table() -> CategoryTable {
        CategoryTable::from_pairs([
            ("jpg", "Images"),
            ("png", "Images"),
            ("pdf", "Documents"),
            ("mp3", "Music"),
        ])
    }

    #[test]
    fn test_extension_key() {
        assert_eq!(extension_key("photo.JPG"), "jpg");
        assert_eq!(extension_key("a.b.c.Txt"), "txt");
        assert_eq!(extension_key("noext"), "other");
        assert_eq!(extension_key(".bashrc"), "bashrc");
        assert_eq!(extension_key("trailing."), "");
    }

    #[test]
    fn test_folder_for_known_extensions() {
        let table = sample_table();
        assert_eq!(table.folder_for("a.jpg"), "Images");
        assert_eq!(table.folder_for("b.PNG"), "Images");
        assert_eq!(table.folder_for("c.pdf"), "Documents");
    }

    #[test]
    fn test_folder_for_unmapped_defaults_to_other() {
        let table = sample_table();
        assert_eq!(table.folder_for("c.xyz"), "Other");
        assert_eq!(table.folder_for("Makefile"), "Other");
        assert_eq!(table.folder_for("trailing."), "Other");
    }

    #[test]
    fn test_no_extension_uses_other_key_when_mapped() {
        let table = CategoryTable::from_pairs([("other", "Misc")]);
        assert_eq!(table.folder_for("LICENSE"), "Misc");
    }

    #[test]
    fn test_keys_are_normalized() {
        let table = CategoryTable::from_pairs([(".JPEG", "Images")]);
        assert_eq!(table.lookup("jpeg"), Some("Images"));
        assert_eq!(table.lookup("JPEG"), Some("Images"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_from_json_str_rejects_bad_documents() {
        assert!(CategoryTable::from_json_str("not json").is_err());
        assert!(CategoryTable::from_json_str(r#"["jpg", "Images"]"#).is_err());
        assert!(CategoryTable::from_json_str(r#"{ "jpg": 3 }"#).is_err());
        assert!(CategoryTable::from_json_str(r#"{ "jpg": "  " }"#).is_err());
        assert!(CategoryTable::from_json_str(r#"{ "jpg": "../up" }"#).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join(CATEGORIES_FILE);
        fs::write(&path, r#"{ "txt": "Text" }"#).unwrap();

        let table = CategoryTable::locate_and_load(Some(&path)).unwrap();
        assert_eq!(table.folder_for("notes.txt"), "Text");
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let result = CategoryTable::locate_and_load(Some(Path::new("/non/existent/cats.json")));
        assert!(matches!(result, Err(ConfigError::CategoriesNotFound(_))));
    }

    #[test]
    fn test_load_malformed_file_is_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join(CATEGORIES_FILE);
        fs::write(&path, "{ broken").unwrap();

        let result = CategoryTable::load_from_file(&path);
        assert!(matches!(result, Err(ConfigError::CategoriesInvalid { .. })));
    }
}
