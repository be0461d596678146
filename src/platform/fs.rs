// sls-logs - platform/fs.rs
//
// Filesystem helpers used by the installer: atomic writes and copying an
// executable into place with the right permissions.

use std::io;
use std::path::{Path, PathBuf};

/// Write `contents` to `path` atomically (write temp, then rename).
///
/// A crash between write and rename loses the new contents but never
/// corrupts the previous file.
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let tmp = temp_sibling(path);
    std::fs::write(&tmp, contents)?;
    std::fs::rename(&tmp, path).map_err(|e| {
        // Clean up the temp file on failure; ignore any secondary error.
        let _ = std::fs::remove_file(&tmp);
        e
    })?;
    tracing::debug!(path = %path.display(), "File written atomically");
    Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Copy the executable at `from` to `to`, replacing any existing file, and
/// make sure the copy is executable.
pub fn copy_executable(from: &Path, to: &Path) -> io::Result<u64> {
    if to.exists() {
        // Removing first lets us replace a copy that is currently running.
        std::fs::remove_file(to)?;
    }
    let bytes = std::fs::copy(from, to)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(to)?.permissions();
        perms.set_mode(perms.mode() | 0o755);
        std::fs::set_permissions(to, perms)?;
    }

    tracing::debug!(from = %from.display(), to = %to.display(), bytes, "Executable copied");
    Ok(bytes)
}

/// Platform file name for an installed executable called `stem`.
pub fn executable_file_name(stem: &str) -> String {
    if cfg!(windows) {
        format!("{stem}.exe")
    } else {
        stem.to_string()
    }
}
