//! Standalone job-graph retrieval for container deployments.
//!
//! Given a directory of packaged job jars and/or an explicitly named job
//! class, this crate decides at container start, before any distributed
//! execution, which program to run and which additional jars it needs on its
//! class path, then builds the runnable job-graph descriptor. The
//! architecture enforces a strict separation:
//!
//! - **[`core`]**: pure, deterministic logic (entry-point selection,
//!   classpath assembly). No I/O, fully testable in isolation.
//! - **[`io`]**: side-effecting operations (directory scans, manifest reads,
//!   the process class-path variable, program loading). Isolated to enable
//!   fakes in tests.
//!
//! The orchestration module ([`retrieve`]) sequences core logic with I/O to
//! implement the one-shot retrieval a container entrypoint performs.

pub mod core;
pub mod error;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod retrieve;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
