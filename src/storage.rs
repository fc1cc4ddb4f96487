//! Persistence of the encrypted private key blob.
//!
//! Exactly one value is persisted: the armored key as the user supplied it,
//! still sealed with their passphrase. The unlocked key is never written.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::constants::PRIVATE_KEY_FILE_NAME;
#[cfg(unix)]
use crate::constants::{DEFAULT_DIR_PERMISSIONS, DEFAULT_FILE_PERMISSIONS};
use crate::errors::AppResult;

/// File-backed storage for the sealed private key.
#[derive(Debug, Clone)]
pub struct KeyStorage {
    path: PathBuf,
}

impl KeyStorage {
    /// Storage for the key file inside `state_dir`.
    pub fn in_dir(state_dir: &Path) -> Self {
        Self {
            path: state_dir.join(PRIVATE_KEY_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored blob, `None` if nothing has been stored yet.
    pub fn load(&self) -> AppResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(blob) if blob.trim().is_empty() => Ok(None),
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes the blob with owner-only permissions, creating the directory if needed.
    pub fn store(&self, armored_key: &str) -> AppResult<()> {
        write_private_file(&self.path, armored_key)?;
        debug!("Stored encrypted private key");
        Ok(())
    }
}

/// Writes `contents` to `path` readable by the owner only, creating missing
/// parent directories owner-only as well.
pub fn write_private_file(path: &Path, contents: &str) -> AppResult<()> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        create_private_dir(dir)?;
    }

    let mut file = open_private_file(path)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()?;
    Ok(())
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new()
        .recursive(true)
        .mode(DEFAULT_DIR_PERMISSIONS)
        .create(dir)
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}

#[cfg(unix)]
fn open_private_file(path: &Path) -> io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(DEFAULT_FILE_PERMISSIONS)
        .open(path)
}

#[cfg(not(unix))]
fn open_private_file(path: &Path) -> io::Result<fs::File> {
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}
