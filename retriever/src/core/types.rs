//! Shared deterministic types for the retrieval core.
//!
//! These types define stable contracts between core components. They should not
//! depend on external state or I/O and must remain deterministic across runs.

use std::fmt;
use std::path::PathBuf;

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

/// Opaque identifier of the job a container is dedicated to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Create a job id from a non-empty token.
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(anyhow!("job id must be non-empty"));
        }
        Ok(Self(raw))
    }

    /// Well-known all-zero id used when a container has no configured job id.
    pub fn zero() -> Self {
        Self("00000000000000000000000000000000".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Instruction describing whether and where to resume prior persisted state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SavepointRestoreSettings {
    /// Start from a clean state.
    None,
    /// Restore from the savepoint at `savepoint_path`.
    Path {
        savepoint_path: String,
        /// Allow dropping savepoint state that no longer maps onto the program.
        allow_non_restored_state: bool,
    },
}

impl SavepointRestoreSettings {
    pub fn none() -> Self {
        Self::None
    }

    pub fn for_path(savepoint_path: impl Into<String>, allow_non_restored_state: bool) -> Self {
        Self::Path {
            savepoint_path: savepoint_path.into(),
            allow_non_restored_state,
        }
    }
}

/// A jar found in the user lib directory, with its manifest-declared entry
/// class when one is present. `None` marks a pure library jar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateJar {
    pub path: PathBuf,
    pub entry_class: Option<String>,
}

/// The single class whose program-construction contract will be invoked.
///
/// `source_jar` is set only when the entry point was discovered by scanning
/// the user lib directory, never when the class name was given explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedEntryPoint {
    pub class_name: String,
    pub source_jar: Option<PathBuf>,
}

/// The resolved, ready-to-execute program representation.
///
/// Reproducible bit-for-bit given an identical directory snapshot and
/// identical retrieval inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobGraphDescriptor {
    pub job_id: JobId,
    pub job_name: String,
    pub maximum_parallelism: u32,
    /// Additional code locations for the program, in `file:` URL form.
    pub classpaths: Vec<String>,
    pub savepoint_restore_settings: SavepointRestoreSettings,
}

impl JobGraphDescriptor {
    /// Descriptor with placeholder identity; the retrieval pipeline stamps
    /// `job_id`, `savepoint_restore_settings`, `classpaths`, and
    /// `maximum_parallelism` before returning it.
    pub fn new(job_name: impl Into<String>) -> Self {
        Self {
            job_id: JobId::zero(),
            job_name: job_name.into(),
            maximum_parallelism: 1,
            classpaths: Vec::new(),
            savepoint_restore_settings: SavepointRestoreSettings::None,
        }
    }
}
