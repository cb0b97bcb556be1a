//! Content digests used to recognise identical files.

use crate::file_organizer::{OrganizeError, OrganizeResult};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Read buffer size; bounds memory use regardless of file size.
pub const CHUNK_SIZE: usize = 64 * 1024;

/// SHA-256 of a file's full content, as lowercase hex.
pub fn file_digest(path: &Path) -> OrganizeResult<String> {
    let to_err = |source| OrganizeError::DigestFailed {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(to_err)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];

    loop {
        let bytes_read = file.read(&mut buffer).map_err(to_err)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_known_digest() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("abc.txt");
        fs::write(&path, "abc").unwrap();

        assert_eq!(
            file_digest(&path).unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_digest_spans_multiple_chunks() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let a = temp_dir.path().join("a.bin");
        let b = temp_dir.path().join("b.bin");

        let mut content = vec![7u8; CHUNK_SIZE * 2 + 10];
        fs::write(&a, &content).unwrap();
        *content.last_mut().unwrap() = 8;
        fs::write(&b, &content).unwrap();

        assert_ne!(file_digest(&a).unwrap(), file_digest(&b).unwrap());
    }

    #[test]
    fn test_digest_is_name_independent() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let a = temp_dir.path().join("one.txt");
        let b = temp_dir.path().join("two.dat");
        fs::write(&a, "same bytes").unwrap();
        fs::write(&b, "same bytes").unwrap();

        assert_eq!(file_digest(&a).unwrap(), file_digest(&b).unwrap());
    }

    #[test]
    fn test_missing_file_is_error() {
        let result = file_digest(Path::new("/non/existent/file"));
        assert!(matches!(result, Err(OrganizeError::DigestFailed { .. })));
    }
}
