/// Input file validation, run before anything touches the filesystem.
use crate::error::{Result, TilerError};
use constants::format::{FormatInfo, find_format};
use std::path::Path;

/// Checks that `path` is an existing LAS/LAZ file and returns its format.
pub fn validate_input(path: &Path) -> Result<&'static FormatInfo> {
    if !path.is_file() {
        return Err(TilerError::NotFound(path.to_path_buf()));
    }

    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_string())
        .unwrap_or_default();

    find_format(&extension).ok_or_else(|| TilerError::UnsupportedFormat {
        path: path.to_path_buf(),
        extension,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = validate_input(&dir.path().join("missing.las"));
        assert!(matches!(result, Err(TilerError::NotFound(_))));
    }

    #[test]
    fn directory_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = validate_input(dir.path());
        assert!(matches!(result, Err(TilerError::NotFound(_))));
    }

    #[test]
    fn rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cloud.ply");
        fs::write(&path, b"ply").unwrap();

        match validate_input(&path) {
            Err(TilerError::UnsupportedFormat { extension, .. }) => assert_eq!(extension, "ply"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn accepts_las_and_laz_in_any_case() {
        let dir = tempfile::tempdir().unwrap();
        for (name, compressed) in [("a.las", false), ("b.LAZ", true), ("c.Las", false)] {
            let path = dir.path().join(name);
            fs::write(&path, b"").unwrap();
            let format = validate_input(&path).unwrap();
            assert_eq!(format.compressed, compressed);
        }
    }
}
