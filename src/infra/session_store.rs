//! On-disk record of the last signed-in account so a restart can restore it.

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize};

const SESSION_FILENAME: &str = "session.json";

/// Stored sessions older than this are ignored and must sign in again.
pub const SESSION_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    pub user_id: String,
    pub email: String,
    /// Bearer token issued by the backend; absent for demo accounts.
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Unix timestamp (seconds) when the session was stored.
    pub stored_at: u64,
}

impl StoredSession {
    pub fn new(user_id: String, email: String) -> Self {
        Self {
            user_id,
            email,
            access_token: None,
            refresh_token: None,
            stored_at: unix_now(),
        }
    }

    pub fn with_tokens(mut self, access_token: String, refresh_token: Option<String>) -> Self {
        self.access_token = Some(access_token);
        self.refresh_token = refresh_token;
        self
    }

    pub fn age(&self) -> Duration {
        Duration::from_secs(unix_now().saturating_sub(self.stored_at))
    }

    pub fn is_expired(&self) -> bool {
        self.age() > SESSION_TTL
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// JSON file holding at most one [`StoredSession`].
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<local data dir>/tech-trader/session.json`.
    pub fn default_location() -> Self {
        let base = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tech-trader");
        Self::new(base.join(SESSION_FILENAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the stored session unless it is missing, unreadable or expired.
    pub fn load(&self) -> Option<StoredSession> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no stored session");
            return None;
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), "failed to read stored session: {err}");
                return None;
            }
        };

        match serde_json::from_str::<StoredSession>(&content) {
            Ok(session) if session.is_expired() => {
                tracing::info!(email = %session.email, "stored session expired");
                None
            }
            Ok(session) => Some(session),
            Err(err) => {
                tracing::warn!("failed to parse stored session: {err}");
                None
            }
        }
    }

    pub fn save(&self, session: &StoredSession) -> Result<(), io::Error> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, content)?;
        tracing::debug!(email = %session.email, path = %self.path.display(), "stored session");
        Ok(())
    }

    pub fn clear(&self) -> Result<(), io::Error> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, SessionStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("nested").join(SESSION_FILENAME));
        (dir, store)
    }

    #[test]
    fn saved_session_loads_back() {
        let (_dir, store) = store();
        let session = StoredSession::new("u1".into(), "a@b.c".into())
            .with_tokens("access".into(), Some("refresh".into()));

        store.save(&session).unwrap();

        assert_eq!(store.load(), Some(session));
    }

    #[test]
    fn missing_or_corrupt_file_yields_none() {
        let (_dir, store) = store();
        assert_eq!(store.load(), None);

        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{ nope").unwrap();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn expired_session_is_ignored() {
        let (_dir, store) = store();
        let mut session = StoredSession::new("u1".into(), "a@b.c".into());
        session.stored_at = unix_now() - SESSION_TTL.as_secs() - 60;
        store.save(&session).unwrap();

        assert_eq!(store.load(), None);
    }

    #[test]
    fn clear_is_idempotent() {
        let (_dir, store) = store();
        store
            .save(&StoredSession::new("u1".into(), "a@b.c".into()))
            .unwrap();

        store.clear().unwrap();
        store.clear().unwrap();

        assert_eq!(store.load(), None);
    }
}
