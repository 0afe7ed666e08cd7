#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::errors::CacheError;

#[cfg(unix)]
const CACHE_FILE_MODE: u32 = 0o600;

/// Single-value token cache file.
///
/// Contents are exactly the current token string, no framing or metadata.
/// This daemon is the only writer; any other process is a read-only consumer.
#[derive(Debug, Clone)]
pub struct TokenCache {
    path: PathBuf,
}

impl TokenCache {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the cached token verbatim. Missing or unreadable file is an
    /// error; the caller decides whether that is fatal.
    pub async fn read(&self) -> Result<String, CacheError> {
        fs::read_to_string(&self.path)
            .await
            .map_err(|source| CacheError::Read {
                path: self.path.clone(),
                source,
            })
    }

    /// Create-or-overwrite the cache file with exactly the token's bytes.
    ///
    /// The write goes to a temp file in the destination directory which is
    /// then renamed into place, so a reader never sees a torn value.
    /// Permissions are restricted to the owning account. Idempotent: writing
    /// the same value any number of times yields identical contents.
    pub async fn write(&self, token: &str) -> Result<(), CacheError> {
        let tmp = self.path.with_extension("tmp");
        let write_err = |source| CacheError::Write {
            path: self.path.clone(),
            source,
        };

        fs::write(&tmp, token.as_bytes()).await.map_err(write_err)?;
        #[cfg(unix)]
        {
            let perms = std::fs::Permissions::from_mode(CACHE_FILE_MODE);
            fs::set_permissions(&tmp, perms).await.map_err(write_err)?;
        }
        fs::rename(&tmp, &self.path).await.map_err(write_err)?;

        debug!("token cache updated at {}", self.path.display());
        Ok(())
    }
}
