//! Filesystem helpers for persisting fetched data.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

/// Write `contents` to `path`, replacing any existing file.
///
/// The bytes go to a temporary file in the same directory which is then
/// renamed over the destination, so a crash never leaves the destination
/// missing or half-written. Parent directories are created as needed.
pub fn write_replacing(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(contents)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Normalize a category for use in a filename: trim surrounding whitespace
/// and turn spaces into hyphens.
pub fn sanitize_category(category: &str) -> String {
    category.trim().replace(' ', "-")
}
