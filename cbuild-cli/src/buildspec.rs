//! Buildspec loading

use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

/// Buildspec looked up in the working directory by default
pub const DEFAULT_BUILDSPEC: &str = "buildspec.yml";

/// Reads the buildspec at `path`
///
/// Returns `None` when the file does not exist, in which case the project's
/// own buildspec is used.
pub fn load(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            debug!("Loaded buildspec {:?} ({} bytes)", path, content.len());
            Ok(Some(content))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No buildspec at {:?}, using the project default", path);
            Ok(None)
        }
        Err(e) => Err(e).with_context(|| format!("Failed to read buildspec {:?}", path)),
    }
}
