use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde_json::Error as SerdeError;

use crate::domain::app_state::PersistedState;

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "TechTrader";
const APP_NAME: &str = "TechTrader";

fn data_file() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join("state.json"))
}

/// Assessment history and preferences from the last run. Missing or damaged
/// files yield `None`.
pub fn load_persisted_state() -> Option<PersistedState> {
    let path = data_file()?;
    let data = fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&data) {
        Ok(state) => Some(state),
        Err(err) => {
            tracing::warn!(path = %path.display(), "ignoring unreadable state file: {err}");
            None
        }
    }
}

pub fn save_persisted_state(state: &PersistedState) -> Result<(), PersistSaveError> {
    let path = data_file().ok_or(PersistSaveError::StorageUnavailable)?;
    write_state(&path, state)
}

fn write_state(path: &Path, state: &PersistedState) -> Result<(), PersistSaveError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    fs::write(path, json)?;
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum PersistSaveError {
    #[error("storage directory unavailable")]
    StorageUnavailable,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] SerdeError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConditionTier;

    #[test]
    fn written_state_parses_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg").join("state.json");
        let state = PersistedState {
            history: Vec::new(),
            default_condition: ConditionTier::Fair,
        };

        write_state(&path, &state).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let parsed: PersistedState = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.default_condition, ConditionTier::Fair);
    }
}
