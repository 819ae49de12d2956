//! Filesystem helpers shared by the storage backends.

use std::io;
use std::path::{Path, PathBuf};

/// Data directory for persisted dashboard state.
pub(crate) fn data_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_default().join(".focusdash")
}

/// Write `content` to `path` atomically: write a sibling temp file,
/// then rename it over the target so concurrent readers never observe
/// a torn file.
pub(crate) fn atomic_write_str(path: &Path, content: &str) -> io::Result<()> {
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, content)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
