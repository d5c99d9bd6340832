//! Error taxonomy for job-graph retrieval.
//!
//! Every failure aborts the retrieval pipeline at the step it occurs; nothing
//! is retried and no partial descriptor is produced. Operational tooling greps
//! the rendered messages, so the `EntryPointNotFound` and `EntryClassNotFound`
//! phrasings are load-bearing and must not be reworded.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RetrievalError {
    /// No explicit job class was given and no candidate jar declares one.
    #[error(
        "Failed to find job JAR on class path in user lib directory {}. Provide the job class name explicitly.",
        .user_lib_directory.display()
    )]
    EntryPointNotFound { user_lib_directory: PathBuf },

    /// More than one candidate jar declares an entry class; refusing to pick
    /// one nondeterministically.
    #[error(
        "Multiple JAR archives in user lib directory {} declare an entry class: {}",
        .user_lib_directory.display(),
        display_paths(.candidates)
    )]
    AmbiguousEntryPoint {
        user_lib_directory: PathBuf,
        candidates: Vec<PathBuf>,
    },

    /// The resolved class name cannot be loaded from the assembled class path.
    #[error("Could not find the provided job class ({class_name}) on the class path")]
    EntryClassNotFound { class_name: String },

    /// Directory, archive, or manifest could not be read.
    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// The loaded program failed while building its job graph.
    #[error("job program {class_name} failed to build a job graph: {message}")]
    Program { class_name: String, message: String },
}

impl RetrievalError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Path-aware shorthand for the common "could not read X" case.
pub fn io_error(context: &str, path: &Path, source: io::Error) -> RetrievalError {
    RetrievalError::io(format!("{context} {}", path.display()), source)
}
