//! Manifest access for jar bundles.
//!
//! A jar bundle is a zip archive that may carry a `manifest.toml` at its
//! root. The manifest declares at most one entry class; its absence marks
//! the bundle as a pure library dependency, never a candidate for
//! entry-point discovery.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;
use zip::ZipArchive;
use zip::result::ZipError;

use crate::error::{RetrievalError, io_error};

/// Well-known manifest location inside a jar bundle.
pub const MANIFEST_PATH: &str = "manifest.toml";

/// Per-bundle metadata (TOML).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JarManifest {
    /// Class whose program-construction contract should be invoked.
    #[serde(rename = "entry-class")]
    pub entry_class: Option<String>,
}

/// Read the manifest of the jar bundle at `path`.
///
/// A bundle without a manifest file yields the default (library) manifest.
/// A blank entry class is normalized to `None`. An unreadable archive or
/// unparseable manifest is an I/O failure; manifest inspection is read-only.
pub fn read_jar_manifest(path: &Path) -> Result<JarManifest, RetrievalError> {
    let file = File::open(path).map_err(|err| io_error("open jar", path, err))?;
    let mut archive = ZipArchive::new(BufReader::new(file))
        .map_err(|err| io_error("read jar archive", path, io::Error::other(err)))?;

    let mut entry = match archive.by_name(MANIFEST_PATH) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => {
            debug!(jar = %path.display(), "no manifest, treating as library jar");
            return Ok(JarManifest::default());
        }
        Err(err) => return Err(io_error("read manifest in", path, io::Error::other(err))),
    };

    let mut contents = String::new();
    entry
        .read_to_string(&mut contents)
        .map_err(|err| io_error("read manifest in", path, err))?;
    let mut manifest: JarManifest = toml::from_str(&contents)
        .map_err(|err| io_error("parse manifest in", path, io::Error::other(err)))?;

    manifest.entry_class = manifest
        .entry_class
        .filter(|name| !name.trim().is_empty());
    debug!(jar = %path.display(), entry_class = ?manifest.entry_class, "read jar manifest");
    Ok(manifest)
}
