//! Orchestration for the one-shot job-graph retrieval at container start.
//!
//! The pipeline is strictly linear: read the active class path, resolve the
//! entry point, assemble the user classpath, load and build the program,
//! stamp the descriptor. Any failure aborts immediately; no step is retried
//! and no partial descriptor is ever returned.

use std::env;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::core::classpath::assemble_classpath;
use crate::core::resolve::select_entry_point;
use crate::core::types::{
    CandidateJar, JobGraphDescriptor, JobId, ResolvedEntryPoint, SavepointRestoreSettings,
};
use crate::error::RetrievalError;
use crate::io::config::Configuration;
use crate::io::jar_source::JarSource;
use crate::io::loader::EntryPointLoader;
use crate::io::manifest::read_jar_manifest;
use crate::io::scan::{is_jar, normalize_path, scan_user_lib_directory};

/// Well-known location of user-provided jars, relative to the working
/// directory of the container.
pub const DEFAULT_USER_LIB_DIRECTORY: &str = "usrlib";

/// Validated inputs for one retrieval.
///
/// Mandatory fields are constructor parameters; a request without a job id
/// or savepoint settings cannot be expressed. The request is built once per
/// container start and consumed by exactly one retrieval.
#[derive(Debug, Clone)]
pub struct RetrievalRequest {
    pub job_id: JobId,
    pub savepoint_restore_settings: SavepointRestoreSettings,
    /// Passed verbatim to the loaded program.
    pub program_arguments: Vec<String>,
    /// Fully qualified entry class; set to skip entry-point discovery.
    pub job_class_name: Option<String>,
    /// Directory scanned for job and library jars. `None` means the
    /// well-known default, which is allowed to be absent.
    pub user_lib_directory: Option<PathBuf>,
}

impl RetrievalRequest {
    pub fn new(
        job_id: JobId,
        savepoint_restore_settings: SavepointRestoreSettings,
        program_arguments: Vec<String>,
    ) -> Self {
        Self {
            job_id,
            savepoint_restore_settings,
            program_arguments,
            job_class_name: None,
            user_lib_directory: None,
        }
    }

    /// The effective user lib directory.
    pub fn user_lib_directory(&self) -> PathBuf {
        self.user_lib_directory
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_USER_LIB_DIRECTORY))
    }
}

/// Outcome of the read-only resolution steps (everything before program
/// construction).
#[derive(Debug, Clone, Serialize)]
pub struct ProgramResolution {
    pub entry_point: ResolvedEntryPoint,
    /// Ordered `file:` URLs attached to the job graph.
    pub classpath: Vec<String>,
}

/// Resolve which program to run and which jars it needs, without loading it.
///
/// Reads one snapshot of the jar source and one snapshot of the user lib
/// directory; with an explicit job class name no manifest is inspected for
/// naming purposes. The default user lib directory may be absent (empty
/// classpath); an explicitly configured one must exist.
pub fn resolve_program<S: JarSource>(
    request: &RetrievalRequest,
    jar_source: &S,
) -> Result<ProgramResolution, RetrievalError> {
    let user_lib_directory = request.user_lib_directory();
    let active_jars: Vec<PathBuf> = jar_source
        .get()?
        .iter()
        .map(|jar| normalize_path(jar))
        .collect();
    let jar_files = scan_jar_files(request, &user_lib_directory)?;

    let entry_point = if request.job_class_name.is_some() {
        select_entry_point(request.job_class_name.as_deref(), &[], &user_lib_directory)?
    } else {
        let candidates = read_candidates(&jar_files, &active_jars)?;
        select_entry_point(None, &candidates, &user_lib_directory)?
    };
    info!(
        class_name = %entry_point.class_name,
        discovered = entry_point.source_jar.is_some(),
        "resolved entry point"
    );

    let working_directory = env::current_dir()
        .map_err(|err| RetrievalError::io("determine working directory", err))?;
    let classpath = assemble_classpath(&jar_files, &active_jars, &working_directory);
    debug!(entries = classpath.len(), "assembled user classpath");

    Ok(ProgramResolution {
        entry_point,
        classpath,
    })
}

/// Execute the full retrieval pipeline and return the stamped descriptor.
pub fn retrieve_job_graph<S: JarSource, L: EntryPointLoader>(
    request: &RetrievalRequest,
    jar_source: &S,
    loader: &L,
    configuration: &Configuration,
) -> Result<JobGraphDescriptor, RetrievalError> {
    let resolution = resolve_program(request, jar_source)?;

    let handle = loader.load(
        &resolution.entry_point.class_name,
        &resolution.classpath,
        &request.program_arguments,
    )?;
    let mut descriptor = handle.build(configuration)?;

    descriptor.job_id = request.job_id.clone();
    descriptor.savepoint_restore_settings = request.savepoint_restore_settings.clone();
    descriptor.classpaths = resolution.classpath;
    if let Some(parallelism) = configuration.default_parallelism {
        descriptor.maximum_parallelism = parallelism;
    }

    info!(
        job_id = %descriptor.job_id,
        job_name = %descriptor.job_name,
        "retrieved job graph"
    );
    Ok(descriptor)
}

/// Scan the user lib directory for jar bundles, normalized and in scan order.
///
/// The well-known default directory is allowed to be missing (a container
/// without user jars); a directory the operator configured explicitly is not.
fn scan_jar_files(
    request: &RetrievalRequest,
    user_lib_directory: &Path,
) -> Result<Vec<PathBuf>, RetrievalError> {
    if request.user_lib_directory.is_none() && !user_lib_directory.exists() {
        debug!(
            dir = %user_lib_directory.display(),
            "default user lib directory absent, continuing without user jars"
        );
        return Ok(Vec::new());
    }
    let files = scan_user_lib_directory(user_lib_directory)?;
    Ok(files
        .iter()
        .filter(|path| is_jar(path))
        .map(|path| normalize_path(path))
        .collect())
}

/// Read each candidate's manifest, skipping jars already active on the class
/// path (path equality after normalization).
fn read_candidates(
    jar_files: &[PathBuf],
    active_jars: &[PathBuf],
) -> Result<Vec<CandidateJar>, RetrievalError> {
    let mut candidates = Vec::new();
    for path in jar_files {
        if active_jars.contains(path) {
            continue;
        }
        let manifest = read_jar_manifest(path)?;
        candidates.push(CandidateJar {
            path: path.clone(),
            entry_class: manifest.entry_class,
        });
    }
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FixedJarSource, TEST_JOB_CLASS, test_registry, write_jar};
    use crate::io::loader::RegistryLoader;
    use std::fs;

    fn request() -> RetrievalRequest {
        RetrievalRequest::new(
            JobId::new("0123456789abcdef").expect("job id"),
            SavepointRestoreSettings::none(),
            vec!["--arg".to_string(), "suffix".to_string()],
        )
    }

    /// The default user lib directory does not exist in a bare test process;
    /// an explicit class name must still resolve with an empty classpath.
    #[test]
    fn missing_default_directory_yields_empty_classpath() {
        let mut req = request();
        req.job_class_name = Some(TEST_JOB_CLASS.to_string());

        let resolution =
            resolve_program(&req, &FixedJarSource::new(Vec::new())).expect("resolve");

        assert_eq!(resolution.entry_point.class_name, TEST_JOB_CLASS);
        assert_eq!(resolution.entry_point.source_jar, None);
        assert!(resolution.classpath.is_empty());
    }

    #[test]
    fn explicitly_configured_missing_directory_is_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut req = request();
        req.job_class_name = Some(TEST_JOB_CLASS.to_string());
        req.user_lib_directory = Some(temp.path().join("missing"));

        let err = resolve_program(&req, &FixedJarSource::new(Vec::new())).unwrap_err();

        assert!(matches!(err, RetrievalError::Io { .. }));
    }

    /// Verifies non-jar files in the user lib directory never reach the
    /// classpath or the candidate set.
    #[test]
    fn stray_files_are_ignored() {
        let temp = tempfile::tempdir().expect("tempdir");
        write_jar(&temp.path().join("job.jar"), Some(TEST_JOB_CLASS)).expect("write jar");
        fs::write(temp.path().join("notes.txt"), b"notes").expect("write txt");

        let mut req = request();
        req.user_lib_directory = Some(temp.path().to_path_buf());

        let resolution =
            resolve_program(&req, &FixedJarSource::new(Vec::new())).expect("resolve");

        assert_eq!(resolution.classpath.len(), 1);
        assert!(resolution.classpath[0].ends_with("job.jar"));
    }

    /// With no `default_parallelism` configured the program's own value
    /// survives stamping.
    #[test]
    fn parallelism_is_stamped_only_when_configured() {
        let temp = tempfile::tempdir().expect("tempdir");
        write_jar(&temp.path().join("job.jar"), Some(TEST_JOB_CLASS)).expect("write jar");

        let mut req = request();
        req.user_lib_directory = Some(temp.path().to_path_buf());
        let loader = RegistryLoader::new(test_registry());

        let unstamped = retrieve_job_graph(
            &req,
            &FixedJarSource::new(Vec::new()),
            &loader,
            &Configuration::default(),
        )
        .expect("retrieve");
        assert_eq!(unstamped.maximum_parallelism, 1);

        let configuration = Configuration {
            default_parallelism: Some(42),
        };
        let stamped = retrieve_job_graph(
            &req,
            &FixedJarSource::new(Vec::new()),
            &loader,
            &configuration,
        )
        .expect("retrieve");
        assert_eq!(stamped.maximum_parallelism, 42);
    }
}
