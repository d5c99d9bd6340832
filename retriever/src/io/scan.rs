//! Non-recursive directory scanning for the user lib directory.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{RetrievalError, io_error};

/// List the regular files directly inside `dir`, lexically sorted.
///
/// Subdirectories are excluded and the scan never descends into them. The
/// sort keeps resolution reproducible across runs on an unchanged filesystem
/// snapshot. A missing or unreadable directory is an error.
pub fn scan_user_lib_directory(dir: &Path) -> Result<Vec<PathBuf>, RetrievalError> {
    let entries = fs::read_dir(dir).map_err(|err| io_error("read user lib directory", dir, err))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| io_error("read user lib directory", dir, err))?;
        let file_type = entry
            .file_type()
            .map_err(|err| io_error("inspect entry in", dir, err))?;
        if file_type.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();

    debug!(dir = %dir.display(), count = files.len(), "scanned user lib directory");
    Ok(files)
}

/// Whether a path names a jar bundle.
pub fn is_jar(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("jar"))
}

/// Canonicalize for path-equality checks, falling back to the path as given
/// when it cannot be resolved (e.g. a class-path entry that does not exist).
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
