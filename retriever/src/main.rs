//! Container entrypoint CLI for standalone job deployments.
//!
//! Resolves which packaged job a container should run and which jars it
//! needs on its class path, then prints the resolution as JSON. Operational
//! tooling greps the failure messages and relies on the stable exit codes,
//! so both are part of the contract.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use retriever::core::types::{JobId, SavepointRestoreSettings};
use retriever::error::RetrievalError;
use retriever::exit_codes;
use retriever::io::config::{Configuration, load_config};
use retriever::io::jar_source::ClassPathJarSource;
use retriever::io::manifest::read_jar_manifest;
use retriever::logging;
use retriever::retrieve::{ProgramResolution, RetrievalRequest, resolve_program};

#[derive(Parser)]
#[command(
    name = "retriever",
    version,
    about = "Resolve which packaged job a container should run"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve the entry point and user classpath, print a JSON report.
    Resolve(ResolveArgs),
    /// Print a jar bundle's manifest as JSON.
    Manifest {
        /// Jar bundle to inspect.
        jar: PathBuf,
    },
}

#[derive(Args)]
struct ResolveArgs {
    /// Job id stamped onto the descriptor (all-zero id when omitted).
    #[arg(long)]
    job_id: Option<String>,

    /// Fully qualified job class; skips entry-point discovery.
    #[arg(long)]
    job_classname: Option<String>,

    /// Directory scanned for job and library jars (default: usrlib).
    #[arg(long)]
    user_lib_dir: Option<PathBuf>,

    /// Savepoint path to restore from.
    #[arg(long)]
    from_savepoint: Option<String>,

    /// Allow dropping savepoint state that no longer maps onto the program.
    #[arg(long)]
    allow_non_restored_state: bool,

    /// Default parallelism, overriding the configuration file.
    #[arg(long, short = 'p')]
    parallelism: Option<u32>,

    /// Configuration file (TOML).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Program arguments, passed verbatim to the job program (after `--`).
    #[arg(last = true)]
    program_arguments: Vec<String>,
}

fn main() {
    logging::init();
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("{:#}", err);
        std::process::exit(exit_code_for(&err));
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Resolve(args) => cmd_resolve(args),
        Command::Manifest { jar } => cmd_manifest(&jar),
    }
}

/// Report printed on stdout for `retriever resolve`.
#[derive(Serialize)]
struct ResolveReport {
    job_id: JobId,
    savepoint_restore_settings: SavepointRestoreSettings,
    entry_class: String,
    source_jar: Option<PathBuf>,
    classpath: Vec<String>,
}

fn cmd_resolve(args: ResolveArgs) -> Result<()> {
    let mut configuration = match &args.config {
        Some(path) => load_config(path)?,
        None => Configuration::default(),
    };
    if args.parallelism.is_some() {
        configuration.default_parallelism = args.parallelism;
    }
    configuration.validate()?;

    let job_id = match args.job_id {
        Some(raw) => JobId::new(raw).context("invalid --job-id")?,
        None => JobId::zero(),
    };
    let savepoint_restore_settings = match args.from_savepoint {
        Some(path) => SavepointRestoreSettings::for_path(path, args.allow_non_restored_state),
        None => SavepointRestoreSettings::none(),
    };

    let mut request = RetrievalRequest::new(job_id, savepoint_restore_settings, args.program_arguments);
    request.job_class_name = args.job_classname;
    request.user_lib_directory = args.user_lib_dir;

    let jar_source = ClassPathJarSource::from_env();
    let resolution = resolve_program(&request, &jar_source)?;

    print_json(&report(&request, resolution))
}

fn report(request: &RetrievalRequest, resolution: ProgramResolution) -> ResolveReport {
    ResolveReport {
        job_id: request.job_id.clone(),
        savepoint_restore_settings: request.savepoint_restore_settings.clone(),
        entry_class: resolution.entry_point.class_name,
        source_jar: resolution.entry_point.source_jar,
        classpath: resolution.classpath,
    }
}

fn cmd_manifest(jar: &Path) -> Result<()> {
    let manifest = read_jar_manifest(jar)?;
    print_json(&manifest)
}

/// Serialize `value` to pretty-printed JSON with trailing newline.
fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let payload = serde_json::to_string_pretty(value).context("serialize json")?;
    println!("{payload}");
    Ok(())
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<RetrievalError>() {
        Some(RetrievalError::EntryPointNotFound { .. }) => exit_codes::ENTRY_POINT_NOT_FOUND,
        Some(RetrievalError::AmbiguousEntryPoint { .. }) => exit_codes::AMBIGUOUS_ENTRY_POINT,
        Some(RetrievalError::EntryClassNotFound { .. }) => exit_codes::ENTRY_CLASS_NOT_FOUND,
        _ => exit_codes::INVALID,
    }
}
