//! Deterministic entry-point selection over scanned jar candidates.

use std::path::Path;

use crate::core::types::{CandidateJar, ResolvedEntryPoint};
use crate::error::RetrievalError;

/// Decide the single class whose program contract will be invoked.
///
/// An explicitly configured class name always wins and leaves `source_jar`
/// unset; otherwise exactly one candidate must declare an entry class. Zero
/// declaring candidates fail with [`RetrievalError::EntryPointNotFound`], more
/// than one with [`RetrievalError::AmbiguousEntryPoint`].
///
/// Candidates are expected to already exclude jars active on the class path.
pub fn select_entry_point(
    explicit_class_name: Option<&str>,
    candidates: &[CandidateJar],
    user_lib_directory: &Path,
) -> Result<ResolvedEntryPoint, RetrievalError> {
    if let Some(class_name) = explicit_class_name {
        return Ok(ResolvedEntryPoint {
            class_name: class_name.to_string(),
            source_jar: None,
        });
    }

    let mut declaring: Vec<&CandidateJar> = candidates
        .iter()
        .filter(|candidate| {
            candidate
                .entry_class
                .as_deref()
                .is_some_and(|name| !name.trim().is_empty())
        })
        .collect();

    match declaring.len() {
        0 => Err(RetrievalError::EntryPointNotFound {
            user_lib_directory: user_lib_directory.to_path_buf(),
        }),
        1 => {
            let jar = declaring.remove(0);
            Ok(ResolvedEntryPoint {
                class_name: jar
                    .entry_class
                    .clone()
                    .unwrap_or_default(),
                source_jar: Some(jar.path.clone()),
            })
        }
        _ => Err(RetrievalError::AmbiguousEntryPoint {
            user_lib_directory: user_lib_directory.to_path_buf(),
            candidates: declaring
                .into_iter()
                .map(|jar| jar.path.clone())
                .collect(),
        }),
    }
}
