use docqa_core::Upload;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Reads `paths` into uploads. Unreadable files are skipped and returned
/// alongside the reason so the caller can report them.
pub fn read_uploads(paths: &[PathBuf]) -> (Vec<Upload>, Vec<(PathBuf, String)>) {
    let mut uploads = Vec::with_capacity(paths.len());
    let mut skipped = Vec::new();
    for path in paths {
        match fs::read(path) {
            Ok(bytes) => uploads.push(Upload {
                name: display_name(path),
                bytes,
            }),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unreadable upload");
                skipped.push((path.clone(), e.to_string()));
            }
        }
    }
    (uploads, skipped)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreadable_paths_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("notes.txt");
        fs::write(&good, "hello").unwrap();
        let missing = dir.path().join("gone.pdf");

        let (uploads, skipped) = read_uploads(&[missing.clone(), good]);
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].name, "notes.txt");
        assert_eq!(uploads[0].bytes, b"hello");
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].0, missing);
    }
}
