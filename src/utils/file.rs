use crate::models::error::Error;
use camino::Utf8Path;
use tracing::warn;
use walkdir::WalkDir;

/// Recursively copies a directory tree from source to destination.
/// Creates all necessary directories and overwrites existing files.
pub fn copy_recursive(src: &Utf8Path, dst: &Utf8Path) -> Result<(), Error> {
    std::fs::create_dir_all(dst)?;

    for entry in WalkDir::new(src) {
        let entry = entry?;
        let path = Utf8Path::from_path(entry.path())
            .ok_or_else(|| Error::ParseError(format!("invalid UTF-8 path: {:?}", entry.path())))?;
        let rel = path
            .strip_prefix(src)
            .map_err(|e| Error::ParseError(e.to_string()))?;
        let target = dst.join(rel);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(path, &target)?;
        }
    }

    Ok(())
}

/// Removes a single materialized entry, file or directory tree.
pub fn remove_path(path: &Utf8Path) -> Result<(), Error> {
    let meta = std::fs::symlink_metadata(path)?;
    if meta.is_dir() {
        std::fs::remove_dir_all(path)?;
    } else {
        std::fs::remove_file(path)?;
    }
    Ok(())
}

/// Best-effort recursive deletion of a directory tree. Individual
/// failures are logged and counted, never fatal; returns how many
/// entries could not be removed.
pub fn remove_tree_best_effort(root: &Utf8Path) -> usize {
    let mut failed = 0;

    for entry in WalkDir::new(root)
        .contents_first(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let result = if entry.file_type().is_dir() {
            std::fs::remove_dir(entry.path())
        } else {
            std::fs::remove_file(entry.path())
        };
        if let Err(e) = result {
            warn!("failed to remove {:?}: {e}", entry.path());
            failed += 1;
        }
    }

    failed
}
