// ABOUTME: Line store for the known_hosts file: locating, loading and saving raw host lines
// ABOUTME: Normalizes line endings on read and preserves file permissions on write

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[cfg(windows)]
const LINE_BREAK: &str = "\r\n";
#[cfg(not(windows))]
const LINE_BREAK: &str = "\n";

#[cfg(unix)]
const DEFAULT_MODE: u32 = 0o644;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not determine the home directory")]
    NoHomeDir,

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Handle on a single known_hosts file. The path is resolved once by the
/// caller and never looked up again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownHostsFile {
    path: PathBuf,
}

impl KnownHostsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.ssh/known_hosts` for the current user.
    pub fn locate() -> Result<PathBuf, StoreError> {
        let home = dirs::home_dir().ok_or(StoreError::NoHomeDir)?;
        Ok(home.join(".ssh").join("known_hosts"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        fs::metadata(&self.path).is_ok()
    }

    pub fn load(&self) -> Result<Vec<String>, StoreError> {
        let bytes = fs::read(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;

        let lines = split_lines(&String::from_utf8_lossy(&bytes));
        tracing::debug!("Loaded {} lines from {}", lines.len(), self.path.display());
        Ok(lines)
    }

    pub fn save(&self, lines: &[String]) -> Result<(), StoreError> {
        let mut content = lines.join(LINE_BREAK);
        content.push_str(LINE_BREAK);

        self.write_preserving_mode(content.as_bytes())
            .map_err(|source| StoreError::Write {
                path: self.path.clone(),
                source,
            })?;

        tracing::debug!("Saved {} lines to {}", lines.len(), self.path.display());
        Ok(())
    }

    #[cfg(unix)]
    fn write_preserving_mode(&self, content: &[u8]) -> io::Result<()> {
        use std::io::Write;
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

        let existing = fs::metadata(&self.path).ok().map(|m| m.permissions());

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(DEFAULT_MODE)
            .open(&self.path)?;
        file.write_all(content)?;

        // The umask may have narrowed a freshly created file, and an existing
        // file keeps whatever mode the user gave it.
        let perms = existing.unwrap_or_else(|| fs::Permissions::from_mode(DEFAULT_MODE));
        fs::set_permissions(&self.path, perms)
    }

    #[cfg(not(unix))]
    fn write_preserving_mode(&self, content: &[u8]) -> io::Result<()> {
        fs::write(&self.path, content)
    }
}

fn split_lines(input: &str) -> Vec<String> {
    input
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
