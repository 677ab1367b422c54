//! Session persistence.
//!
//! The slice of engine state that survives a restart: a stable session id
//! and the owner's view-as override. Stored as one JSON file under the
//! platform data dir. Selection state is deliberately not persisted; the
//! navigable address already carries it.

use crate::role::ViewAsRole;
use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub id: Uuid,
    #[serde(default)]
    pub view_as: ViewAsRole,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            view_as: ViewAsRole::default(),
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Loads and saves [`SessionState`] at a fixed path.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data_local_dir>/plat/session.json`, if the platform exposes a data
    /// dir at all.
    pub fn default_path() -> Option<PathBuf> {
        Some(dirs::data_local_dir()?.join("plat").join("session.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored session, or start a fresh one.
    ///
    /// A missing file is the normal first run. A corrupt or unreadable file
    /// logs a warning and also starts fresh; session state is never worth
    /// failing startup over.
    pub fn load(&self) -> SessionState {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no session file, starting fresh");
                return SessionState::new();
            },
            Err(error) => {
                tracing::warn!(
                    path = %self.path.display(),
                    %error,
                    "unreadable session file, starting fresh"
                );
                return SessionState::new();
            },
        };

        match serde_json::from_str(&raw) {
            Ok(state) => state,
            Err(error) => {
                tracing::warn!(
                    path = %self.path.display(),
                    %error,
                    "corrupt session file, starting fresh"
                );
                SessionState::new()
            },
        }
    }

    pub fn save(&self, state: &SessionState) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(state)?;
        fs::write(&self.path, json)
    }
}
