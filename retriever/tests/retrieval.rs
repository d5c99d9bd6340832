//! End-to-end retrieval tests over real temporary directories and jar
//! bundles.

use std::env;
use std::path::{Path, PathBuf};

use retriever::core::classpath::to_url_string;
use retriever::core::types::{JobId, SavepointRestoreSettings};
use retriever::error::RetrievalError;
use retriever::io::config::Configuration;
use retriever::io::loader::{ProgramRegistry, RegistryLoader};
use retriever::retrieve::{RetrievalRequest, resolve_program, retrieve_job_graph};
use retriever::test_support::{
    FAILING_JOB_CLASS, FixedJarSource, TEST_JOB_CLASS, jar_dirs, test_registry, write_jar,
};

const PROGRAM_ARGUMENTS: [&str; 2] = ["--arg", "suffix"];

fn request(job_id: &str) -> RetrievalRequest {
    RetrievalRequest::new(
        JobId::new(job_id).expect("job id"),
        SavepointRestoreSettings::none(),
        PROGRAM_ARGUMENTS.iter().map(|arg| arg.to_string()).collect(),
    )
}

/// The URL an assembled classpath is expected to carry for `path`:
/// canonicalized, relativized against the working directory when possible,
/// rendered as a `file:` URL.
fn expected_url(path: &Path) -> String {
    let canonical = path.canonicalize().expect("canonicalize");
    let working_directory = env::current_dir().expect("working directory");
    let relative = canonical
        .strip_prefix(&working_directory)
        .unwrap_or(&canonical);
    to_url_string(relative)
}

/// Verifies the straightforward explicit-class retrieval: the program is
/// constructed from the arguments, and job id plus configured parallelism
/// are stamped onto the descriptor.
#[test]
fn retrieves_job_graph_with_explicit_job_class() {
    let mut req = request("a1b2c3d4e5f60718a1b2c3d4e5f60718");
    req.job_class_name = Some(TEST_JOB_CLASS.to_string());
    let configuration = Configuration {
        default_parallelism: Some(42),
    };

    let descriptor = retrieve_job_graph(
        &req,
        &FixedJarSource::new(Vec::new()),
        &RegistryLoader::new(test_registry()),
        &configuration,
    )
    .expect("retrieve");

    assert_eq!(descriptor.job_name, format!("{TEST_JOB_CLASS}-suffix"));
    assert_eq!(descriptor.maximum_parallelism, 42);
    assert_eq!(descriptor.job_id, req.job_id);
}

/// An explicitly configured job class must win even when the jar source
/// points at a file that does not exist.
#[test]
fn explicit_job_class_has_precedence_over_jar_source() {
    let mut req = request("a1b2c3d4e5f60718a1b2c3d4e5f60718");
    req.job_class_name = Some(TEST_JOB_CLASS.to_string());

    let descriptor = retrieve_job_graph(
        &req,
        &FixedJarSource::new(vec![PathBuf::from("non-existing")]),
        &RegistryLoader::new(test_registry()),
        &Configuration::default(),
    )
    .expect("retrieve");

    assert_eq!(descriptor.job_name, format!("{TEST_JOB_CLASS}-suffix"));
}

/// Verifies `job_id` and `savepoint_restore_settings` pass through into the
/// descriptor unmodified.
#[test]
fn savepoint_restore_settings_pass_through() {
    let savepoint = SavepointRestoreSettings::for_path("foobar", true);
    let mut req = request("00f0e1d2c3b4a59600f0e1d2c3b4a596");
    req.savepoint_restore_settings = savepoint.clone();
    req.job_class_name = Some(TEST_JOB_CLASS.to_string());

    let descriptor = retrieve_job_graph(
        &req,
        &FixedJarSource::new(Vec::new()),
        &RegistryLoader::new(test_registry()),
        &Configuration::default(),
    )
    .expect("retrieve");

    assert_eq!(descriptor.savepoint_restore_settings, savepoint);
    assert_eq!(descriptor.job_id, req.job_id);
}

/// With no explicit class name, the single manifest-declared entry class is
/// discovered and the classpath carries both the job jar and the library jar
/// in scan order, skipping the stray text file.
#[test]
fn discovers_entry_class_and_assembles_classpath() {
    let dirs = jar_dirs().expect("jar dirs");
    let mut req = request("a1b2c3d4e5f60718a1b2c3d4e5f60718");
    req.user_lib_directory = Some(dirs.with_entry_class.clone());

    let descriptor = retrieve_job_graph(
        &req,
        &FixedJarSource::new(Vec::new()),
        &RegistryLoader::new(test_registry()),
        &Configuration::default(),
    )
    .expect("retrieve");

    assert_eq!(descriptor.job_name, format!("{TEST_JOB_CLASS}-suffix"));
    assert_eq!(
        descriptor.classpaths,
        vec![expected_url(&dirs.job_jar), expected_url(&dirs.lib_jar)]
    );
}

/// The classpath is assembled the same way when the entry class is given
/// explicitly: the job jar is not special-cased out.
#[test]
fn classpath_is_identical_with_explicit_entry_class() {
    let dirs = jar_dirs().expect("jar dirs");
    let mut req = request("a1b2c3d4e5f60718a1b2c3d4e5f60718");
    req.job_class_name = Some(TEST_JOB_CLASS.to_string());
    req.user_lib_directory = Some(dirs.with_entry_class.clone());

    let resolution = resolve_program(&req, &FixedJarSource::new(Vec::new())).expect("resolve");

    assert_eq!(resolution.entry_point.source_jar, None);
    assert_eq!(
        resolution.classpath,
        vec![expected_url(&dirs.job_jar), expected_url(&dirs.lib_jar)]
    );
}

#[test]
fn fails_when_user_lib_directory_has_no_entry_class() {
    let dirs = jar_dirs().expect("jar dirs");
    let mut req = request("a1b2c3d4e5f60718a1b2c3d4e5f60718");
    req.user_lib_directory = Some(dirs.without_entry_class.clone());

    let err = retrieve_job_graph(
        &req,
        &FixedJarSource::new(Vec::new()),
        &RegistryLoader::new(test_registry()),
        &Configuration::default(),
    )
    .unwrap_err();

    assert!(matches!(err, RetrievalError::EntryPointNotFound { .. }));
    assert!(
        err.to_string()
            .contains("Failed to find job JAR on class path")
    );
}

#[test]
fn fails_when_provided_job_class_cannot_be_loaded() {
    let dirs = jar_dirs().expect("jar dirs");
    let mut req = request("a1b2c3d4e5f60718a1b2c3d4e5f60718");
    req.job_class_name = Some("org.example.UnknownJob".to_string());
    req.user_lib_directory = Some(dirs.without_entry_class.clone());

    let err = retrieve_job_graph(
        &req,
        &FixedJarSource::new(Vec::new()),
        &RegistryLoader::new(test_registry()),
        &Configuration::default(),
    )
    .unwrap_err();

    assert!(matches!(err, RetrievalError::EntryClassNotFound { .. }));
    assert!(
        err.to_string()
            .contains("Could not find the provided job class")
    );
}

/// Two declaring jars are a hard failure; the retriever must not pick one
/// nondeterministically.
#[test]
fn fails_when_multiple_jars_declare_entry_classes() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_jar(&temp.path().join("a.jar"), Some("org.example.JobA")).expect("write a.jar");
    write_jar(&temp.path().join("b.jar"), Some("org.example.JobB")).expect("write b.jar");

    let mut req = request("a1b2c3d4e5f60718a1b2c3d4e5f60718");
    req.user_lib_directory = Some(temp.path().to_path_buf());

    let err = resolve_program(&req, &FixedJarSource::new(Vec::new())).unwrap_err();

    match err {
        RetrievalError::AmbiguousEntryPoint { candidates, .. } => {
            assert_eq!(candidates.len(), 2);
        }
        other => panic!("expected AmbiguousEntryPoint, got {other:?}"),
    }
}

/// Jars reported active by the jar source are excluded both from discovery
/// and from the assembled classpath.
#[test]
fn active_jars_are_excluded_from_classpath() {
    let dirs = jar_dirs().expect("jar dirs");
    let mut req = request("a1b2c3d4e5f60718a1b2c3d4e5f60718");
    req.user_lib_directory = Some(dirs.with_entry_class.clone());

    let resolution = resolve_program(
        &req,
        &FixedJarSource::new(vec![dirs.lib_jar.clone()]),
    )
    .expect("resolve");

    assert_eq!(resolution.entry_point.class_name, TEST_JOB_CLASS);
    assert_eq!(resolution.classpath, vec![expected_url(&dirs.job_jar)]);
}

/// Two retrievals against an unchanged directory snapshot and identical
/// requests (apart from the job id) produce descriptors differing only in
/// `job_id`.
#[test]
fn identical_requests_differ_only_in_job_id() {
    let dirs = jar_dirs().expect("jar dirs");
    let loader = RegistryLoader::new(test_registry());
    let jar_source = FixedJarSource::new(Vec::new());
    let configuration = Configuration::default();

    let mut first_req = request("11111111111111111111111111111111");
    first_req.user_lib_directory = Some(dirs.with_entry_class.clone());
    let mut second_req = request("22222222222222222222222222222222");
    second_req.user_lib_directory = Some(dirs.with_entry_class.clone());

    let first =
        retrieve_job_graph(&first_req, &jar_source, &loader, &configuration).expect("first");
    let mut second =
        retrieve_job_graph(&second_req, &jar_source, &loader, &configuration).expect("second");

    assert_ne!(first.job_id, second.job_id);
    second.job_id = first.job_id.clone();
    assert_eq!(first, second);
}

/// A program that loads but fails while building aborts the pipeline with a
/// distinct failure kind; no partial descriptor escapes.
#[test]
fn failing_program_build_aborts_the_pipeline() {
    let mut req = request("a1b2c3d4e5f60718a1b2c3d4e5f60718");
    req.job_class_name = Some(FAILING_JOB_CLASS.to_string());

    let err = retrieve_job_graph(
        &req,
        &FixedJarSource::new(Vec::new()),
        &RegistryLoader::new(test_registry()),
        &Configuration::default(),
    )
    .unwrap_err();

    assert!(matches!(err, RetrievalError::Program { .. }));
}

/// An empty registry makes any discovered entry class unloadable; the
/// discovery itself must still have succeeded first (distinct failure kind).
#[test]
fn discovered_entry_class_missing_from_registry_fails_at_load() {
    let dirs = jar_dirs().expect("jar dirs");
    let mut req = request("a1b2c3d4e5f60718a1b2c3d4e5f60718");
    req.user_lib_directory = Some(dirs.with_entry_class.clone());

    let err = retrieve_job_graph(
        &req,
        &FixedJarSource::new(Vec::new()),
        &RegistryLoader::new(ProgramRegistry::new()),
        &Configuration::default(),
    )
    .unwrap_err();

    assert!(matches!(err, RetrievalError::EntryClassNotFound { .. }));
}
