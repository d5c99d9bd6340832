//! Entry-point loading over an explicit program registry.
//!
//! The [`EntryPointLoader`] trait decouples retrieval from how compiled
//! programs are located (currently a registry of named constructors). Tests
//! register scripted programs without touching the filesystem.

use std::collections::BTreeMap;

use tracing::debug;

use crate::core::types::JobGraphDescriptor;
use crate::error::RetrievalError;
use crate::io::config::Configuration;

/// A loaded program, ready to produce its job graph.
pub trait ProgramHandle: std::fmt::Debug {
    /// Build the runnable descriptor from the supplied configuration.
    fn build(&self, configuration: &Configuration) -> Result<JobGraphDescriptor, RetrievalError>;
}

/// Constructor invoked with the verbatim program arguments.
pub type ProgramConstructor = fn(&[String]) -> Result<Box<dyn ProgramHandle>, RetrievalError>;

/// Abstraction over how an entry class becomes a runnable program.
pub trait EntryPointLoader {
    /// Load `class_name` against the assembled classpath and construct the
    /// program from `arguments`. An unknown or unloadable class fails with
    /// [`RetrievalError::EntryClassNotFound`].
    fn load(
        &self,
        class_name: &str,
        classpath: &[String],
        arguments: &[String],
    ) -> Result<Box<dyn ProgramHandle>, RetrievalError>;
}

/// Explicit table of entry classes available to this container image.
#[derive(Default)]
pub struct ProgramRegistry {
    constructors: BTreeMap<String, ProgramConstructor>,
}

impl ProgramRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, class_name: impl Into<String>, constructor: ProgramConstructor) {
        self.constructors.insert(class_name.into(), constructor);
    }

    pub fn get(&self, class_name: &str) -> Option<ProgramConstructor> {
        self.constructors.get(class_name).copied()
    }
}

/// Default loader backed by a [`ProgramRegistry`].
pub struct RegistryLoader {
    registry: ProgramRegistry,
}

impl RegistryLoader {
    pub fn new(registry: ProgramRegistry) -> Self {
        Self { registry }
    }
}

impl EntryPointLoader for RegistryLoader {
    fn load(
        &self,
        class_name: &str,
        classpath: &[String],
        arguments: &[String],
    ) -> Result<Box<dyn ProgramHandle>, RetrievalError> {
        let Some(constructor) = self.registry.get(class_name) else {
            return Err(RetrievalError::EntryClassNotFound {
                class_name: class_name.to_string(),
            });
        };
        debug!(
            class_name,
            classpath_entries = classpath.len(),
            argument_count = arguments.len(),
            "constructing program from entry class"
        );
        constructor(arguments)
    }
}
