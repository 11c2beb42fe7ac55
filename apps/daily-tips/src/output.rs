use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::errors::GenerationError;

/// Default output location, relative to the working directory.
pub const DEFAULT_OUTPUT_PATH: &str = "data/today.json";

/// Serializes `value` as 2-space pretty JSON and replaces `path` with it.
///
/// The parent directory is created if missing. Content goes to a temporary
/// file in the same directory which is then renamed over `path`, so readers
/// see either the old file or the complete new one. Returns bytes written.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<usize, GenerationError> {
    let mut contents = serde_json::to_string_pretty(value)
        .map_err(|e| GenerationError::FileSystem(std::io::Error::other(e)))?;
    contents.push('\n');

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.as_file().sync_all()?;
    // Temp files are created 0600; the published file should be world-readable.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))?;
    }
    tmp.persist(path).map_err(|e| GenerationError::FileSystem(e.error))?;

    debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(contents.len())
}
