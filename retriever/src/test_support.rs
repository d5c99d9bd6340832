//! Test-only helpers: jar bundle builders, fixed jar sources, and scripted
//! job programs.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::core::types::JobGraphDescriptor;
use crate::error::RetrievalError;
use crate::io::config::Configuration;
use crate::io::jar_source::JarSource;
use crate::io::loader::{ProgramHandle, ProgramRegistry};
use crate::io::manifest::MANIFEST_PATH;

/// Entry class declared by the scripted test job.
pub const TEST_JOB_CLASS: &str = "org.example.TestJob";

/// Entry class whose scripted program always fails to build its job graph.
pub const FAILING_JOB_CLASS: &str = "org.example.FailingJob";

/// Write a jar bundle at `path`, declaring `entry_class` in its manifest
/// when given. Bundles without an entry class carry no manifest at all.
pub fn write_jar(path: &Path, entry_class: Option<&str>) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    if let Some(class_name) = entry_class {
        writer
            .start_file(MANIFEST_PATH, options)
            .context("start manifest entry")?;
        writeln!(writer, "entry-class = \"{class_name}\"").context("write manifest entry")?;
    }
    writer
        .start_file("code.bin", options)
        .context("start payload entry")?;
    writer.write_all(&[0]).context("write payload")?;
    writer.finish().context("finish jar")?;
    Ok(())
}

/// Jar source returning a fixed list, in order, without inspecting the
/// filesystem. The listed paths do not need to exist.
pub struct FixedJarSource {
    jars: Vec<PathBuf>,
}

impl FixedJarSource {
    pub fn new(jars: Vec<PathBuf>) -> Self {
        Self { jars }
    }
}

impl JarSource for FixedJarSource {
    fn get(&self) -> Result<Vec<PathBuf>, RetrievalError> {
        Ok(self.jars.clone())
    }
}

/// Program handle that names its job graph after the entry class and the
/// last program argument, mirroring how packaged demo jobs derive names.
#[derive(Debug)]
pub struct TestJobHandle {
    job_name: String,
}

impl ProgramHandle for TestJobHandle {
    fn build(&self, _configuration: &Configuration) -> Result<JobGraphDescriptor, RetrievalError> {
        Ok(JobGraphDescriptor::new(&self.job_name))
    }
}

fn test_job_constructor(arguments: &[String]) -> Result<Box<dyn ProgramHandle>, RetrievalError> {
    let suffix = arguments.last().cloned().unwrap_or_default();
    Ok(Box::new(TestJobHandle {
        job_name: format!("{TEST_JOB_CLASS}-{suffix}"),
    }))
}

#[derive(Debug)]
struct FailingJobHandle;

impl ProgramHandle for FailingJobHandle {
    fn build(&self, _configuration: &Configuration) -> Result<JobGraphDescriptor, RetrievalError> {
        Err(RetrievalError::Program {
            class_name: FAILING_JOB_CLASS.to_string(),
            message: "planner rejected the pipeline".to_string(),
        })
    }
}

fn failing_job_constructor(
    _arguments: &[String],
) -> Result<Box<dyn ProgramHandle>, RetrievalError> {
    Ok(Box::new(FailingJobHandle))
}

/// Registry with the scripted jobs registered under [`TEST_JOB_CLASS`] and
/// [`FAILING_JOB_CLASS`].
pub fn test_registry() -> ProgramRegistry {
    let mut registry = ProgramRegistry::new();
    registry.register(TEST_JOB_CLASS, test_job_constructor);
    registry.register(FAILING_JOB_CLASS, failing_job_constructor);
    registry
}

/// Temporary user lib directories mirroring the two container layouts the
/// integration tests exercise:
///
/// ```text
/// with_entry_class/
///   test-job.jar   (declares TEST_JOB_CLASS)
///   test-lib.jar   (library jar, no manifest)
///   test.txt
/// without_entry_class/
///   test-lib.jar
///   test.txt
/// ```
pub struct JarDirs {
    _temp: tempfile::TempDir,
    pub with_entry_class: PathBuf,
    pub without_entry_class: PathBuf,
    pub job_jar: PathBuf,
    pub lib_jar: PathBuf,
}

pub fn jar_dirs() -> Result<JarDirs> {
    let temp = tempfile::tempdir().context("tempdir")?;

    let with_entry_class = temp.path().join("with_entry_class");
    std::fs::create_dir(&with_entry_class).context("create with_entry_class")?;
    let job_jar = with_entry_class.join("test-job.jar");
    let lib_jar = with_entry_class.join("test-lib.jar");
    write_jar(&job_jar, Some(TEST_JOB_CLASS))?;
    write_jar(&lib_jar, None)?;
    std::fs::write(with_entry_class.join("test.txt"), b"text").context("write text file")?;

    let without_entry_class = temp.path().join("without_entry_class");
    std::fs::create_dir(&without_entry_class).context("create without_entry_class")?;
    write_jar(&without_entry_class.join("test-lib.jar"), None)?;
    std::fs::write(without_entry_class.join("test.txt"), b"text").context("write text file")?;

    Ok(JarDirs {
        _temp: temp,
        with_entry_class,
        without_entry_class,
        job_jar,
        lib_jar,
    })
}
