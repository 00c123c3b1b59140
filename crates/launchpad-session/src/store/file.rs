/*
[INPUT]:  Session snapshots and a storage directory
[OUTPUT]: One JSON record per chain on disk
[POS]:    Persistence layer - durable session storage
[UPDATE]: When the file layout or permissions change
*/

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use uuid::Uuid;

use crate::http::Result;
use crate::store::SessionStore;
use crate::types::{Chain, Session};

const SESSION_DIR_ENV: &str = "LAUNCHPAD_SESSION_DIR";

/// Stores `{dir}/{chain}_session.json`, mode 0600 on unix.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// `$LAUNCHPAD_SESSION_DIR`, else `./.launchpad-session`.
    pub fn default_dir() -> PathBuf {
        if let Some(dir) = std::env::var_os(SESSION_DIR_ENV) {
            return PathBuf::from(dir);
        }
        let base_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        base_dir.join(".launchpad-session")
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn session_file_path(&self, chain: Chain) -> PathBuf {
        self.dir.join(format!("{chain}_session.json"))
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self, chain: Chain) -> Result<Option<Session>> {
        let path = self.session_file_path(chain);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        if content.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&content)?))
    }

    async fn save(&self, chain: Chain, session: &Session) -> Result<()> {
        fs::create_dir_all(&self.dir).await?;

        let path = self.session_file_path(chain);
        let tmp_path = self
            .dir
            .join(format!(".{chain}_session.{}.tmp", Uuid::new_v4()));
        let encoded = serde_json::to_vec_pretty(session)?;

        fs::write(&tmp_path, encoded).await?;
        restrict_permissions(&tmp_path).await?;
        if let Err(err) = fs::rename(&tmp_path, &path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(err.into());
        }
        Ok(())
    }

    async fn clear(&self, chain: Chain) -> Result<()> {
        match fs::remove_file(self.session_file_path(chain)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(unix)]
async fn restrict_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(path).await?.permissions();
    perms.set_mode(0o600);
    fs::set_permissions(path, perms).await
}

#[cfg(not(unix))]
async fn restrict_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
}
