//! Deterministic assembly of the user classpath attached to a job graph.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Compute the ordered, deduplicated classpath for the given jar files.
///
/// Input order (the directory scan order) is preserved. Jars already active
/// on the class path are dropped, as are duplicates. Each surviving path is
/// expressed relative to `working_directory` when it is a descendant of it,
/// kept absolute otherwise, and rendered as a `file:` URL.
///
/// Callers pass pre-normalized paths; this function performs no I/O.
pub fn assemble_classpath(
    jar_files: &[PathBuf],
    active_jars: &[PathBuf],
    working_directory: &Path,
) -> Vec<String> {
    let active: BTreeSet<&Path> = active_jars.iter().map(PathBuf::as_path).collect();
    let mut seen = BTreeSet::new();
    let mut classpath = Vec::new();

    for jar in jar_files {
        if active.contains(jar.as_path()) {
            continue;
        }
        let url = to_url_string(relativize(jar, working_directory));
        if seen.insert(url.clone()) {
            classpath.push(url);
        }
    }

    classpath
}

/// Express `path` relative to `base` when it is a descendant, else keep it
/// unchanged. Relative descriptor entries stay portable across hosts that
/// mount the container image at different roots.
fn relativize<'a>(path: &'a Path, base: &Path) -> &'a Path {
    path.strip_prefix(base).unwrap_or(path)
}

/// Render a filesystem path as the `file:` URL form used in descriptors.
///
/// Relative entries must stay relative, which rules out WHATWG URL types;
/// the descriptor therefore carries plain `file:`-prefixed strings with
/// forward slashes.
pub fn to_url_string(path: &Path) -> String {
    let rendered = path.to_string_lossy().replace('\\', "/");
    format!("file:{rendered}")
}
