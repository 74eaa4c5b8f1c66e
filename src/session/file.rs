//! JSON-file session store for the CLI

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::SessionStore;
use crate::error::{ClientError, ClientResult};

/// Keeps session keys in a small JSON object on disk
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data dir>/ahana/session.json`, or `./.ahana-session.json` when the
    /// platform has no data directory
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .map(|dir| dir.join("ahana").join("session.json"))
            .unwrap_or_else(|| PathBuf::from(".ahana-session.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> ClientResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content =
            fs::read_to_string(&self.path).map_err(|e| ClientError::Storage(e.to_string()))?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|e| ClientError::Storage(e.to_string()))
    }

    fn save(&self, values: &BTreeMap<String, String>) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| ClientError::Storage(e.to_string()))?;
            }
        }
        let content = serde_json::to_string_pretty(values)
            .map_err(|e| ClientError::Storage(e.to_string()))?;
        write_private(&self.path, content.as_bytes())
            .map_err(|e| ClientError::Storage(e.to_string()))?;
        debug!(path = %self.path.display(), keys = values.len(), "Saved session");
        Ok(())
    }
}

/// Writes `content` with owner-only permissions on unix
fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // mode() only applies on create; tighten files left by older builds
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(content)
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.load().ok()?.remove(key)
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        let mut values = self.load()?;
        values.insert(key.to_string(), value.to_string());
        self.save(&values)
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        let mut values = self.load()?;
        if values.remove(key).is_some() {
            self.save(&values)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{keys, Session};
    use tempfile::tempdir;

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let store = FileSessionStore::new(&path);
        store.set(keys::ACCESS_TOKEN, "abc").unwrap();
        store.set(keys::IS_AUTHENTICATED, "true").unwrap();

        let reopened = Session::new(FileSessionStore::new(&path));
        assert_eq!(reopened.access_token().as_deref(), Some("abc"));
        assert!(reopened.is_authenticated());

        reopened.logout().unwrap();
        let again = FileSessionStore::new(&path);
        assert_eq!(again.get(keys::ACCESS_TOKEN), None);
        assert_eq!(again.get(keys::IS_AUTHENTICATED).as_deref(), Some("false"));
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("none.json"));
        assert_eq!(store.get(keys::USER), None);
        store.remove(keys::USER).unwrap();
        assert!(!store.path().exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_session_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{}").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let store = FileSessionStore::new(&path);
        store.set(keys::ACCESS_TOKEN, "abc").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(store.get(keys::ACCESS_TOKEN).as_deref(), Some("abc"));
    }
}
