//! Discovery of jars already active on the running process's class path.

use std::env;
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

use tracing::debug;

use crate::error::RetrievalError;

/// Environment variable holding the process class path, platform
/// path-separator delimited.
pub const CLASS_PATH_ENV: &str = "CLASS_PATH";

/// Source of the jar artifacts already active on the effective class path.
///
/// Production code supplies [`ClassPathJarSource`]; tests supply literal
/// lists. Implementations must preserve the order in which entries were
/// encountered and must not deduplicate.
pub trait JarSource {
    fn get(&self) -> Result<Vec<PathBuf>, RetrievalError>;
}

/// Default source backed by the [`CLASS_PATH_ENV`] variable.
///
/// The variable is read once at construction and never mutated; each
/// retrieval works against that snapshot.
#[derive(Debug, Clone)]
pub struct ClassPathJarSource {
    raw: OsString,
}

impl ClassPathJarSource {
    pub fn from_env() -> Self {
        Self {
            raw: env::var_os(CLASS_PATH_ENV).unwrap_or_default(),
        }
    }

    pub fn from_raw(raw: impl Into<OsString>) -> Self {
        Self { raw: raw.into() }
    }
}

impl JarSource for ClassPathJarSource {
    fn get(&self) -> Result<Vec<PathBuf>, RetrievalError> {
        let jars = split_class_path(&self.raw);
        debug!(count = jars.len(), "collected jars from class path variable");
        Ok(jars)
    }
}

/// Split a delimited class-path list into the existing regular files it names.
///
/// Empty segments (shell-assembled class paths often contain them) and
/// segments that are not existing regular files are dropped silently;
/// directories are excluded. Malformed or empty input yields an empty list,
/// never an error. Entries are not deduplicated.
fn split_class_path(raw: &OsStr) -> Vec<PathBuf> {
    env::split_paths(raw)
        .filter(|entry| !entry.as_os_str().is_empty())
        .filter(|entry| entry.is_file())
        .collect()
}
