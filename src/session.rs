use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::User;

/// An authenticated session: the bearer token plus the user profile,
/// persisted as JSON so a restart skips the login screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// File-backed session storage. Created at login, removed at logout.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => {
                let base = dirs::config_dir()
                    .context("Could not determine the user config directory")?;
                base.join("agenda-digital").join("session.json")
            }
        };
        Ok(Self { path })
    }

    /// Returns the stored session, or None when absent or unreadable.
    /// A corrupt file is treated the same as no session.
    pub fn load(&self) -> Option<Session> {
        let contents = fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&contents).ok()
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let contents = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove {}", self.path.display()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;

    fn sample_session() -> Session {
        Session {
            token: "tok-123".to_string(),
            user: User {
                id: 1,
                username: "ana".to_string(),
                email: "ana@example.com".to_string(),
            },
        }
    }

    #[test]
    fn session_round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(Some(dir.path().join("session.json"))).unwrap();

        assert!(store.load().is_none());

        store.save(&sample_session()).unwrap();
        let loaded = store.load().expect("session should load back");
        assert_eq!(loaded.token, "tok-123");
        assert_eq!(loaded.user.email, "ana@example.com");
    }

    #[test]
    fn clear_removes_the_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(Some(dir.path().join("session.json"))).unwrap();

        store.save(&sample_session()).unwrap();
        store.clear().unwrap();
        assert!(store.load().is_none());

        // Clearing an already-absent session is fine
        store.clear().unwrap();
    }

    #[test]
    fn corrupt_session_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let store = SessionStore::new(Some(path)).unwrap();
        assert!(store.load().is_none());
    }
}
