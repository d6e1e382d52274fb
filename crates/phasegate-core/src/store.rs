use crate::error::{PhasegateError, Result};
use crate::paths;
use crate::state::ProjectState;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// StateStore
// ---------------------------------------------------------------------------

/// Persistence port for project state. The orchestrator is written against
/// this trait so tests can swap the JSON file for an in-memory fake.
pub trait StateStore {
    fn exists(&self) -> bool;
    fn load(&self) -> Result<ProjectState>;
    fn save(&self, state: &ProjectState) -> Result<()>;
}

// ---------------------------------------------------------------------------
// JsonFileStore
// ---------------------------------------------------------------------------

/// Stores state as JSON at `.sdlc/state.json`. Writes go through the
/// atomic-rename path, so concurrent readers always see a complete document.
#[derive(Debug)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> PathBuf {
        paths::state_path(&self.root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl StateStore for JsonFileStore {
    fn exists(&self) -> bool {
        self.path().exists()
    }

    fn load(&self) -> Result<ProjectState> {
        let path = self.path();
        if !path.exists() {
            return Err(PhasegateError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let state: ProjectState = serde_json::from_str(&data)?;
        state.validate()?;
        Ok(state)
    }

    fn save(&self, state: &ProjectState) -> Result<()> {
        let data = serde_json::to_string_pretty(state)?;
        crate::io::atomic_write(&self.path(), data.as_bytes())
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// In-memory store for unit tests and embedding without a filesystem.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Option<ProjectState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: ProjectState) -> Self {
        Self {
            inner: Mutex::new(Some(state)),
        }
    }
}

impl StateStore for MemoryStore {
    fn exists(&self) -> bool {
        self.inner.lock().map(|s| s.is_some()).unwrap_or(false)
    }

    fn load(&self) -> Result<ProjectState> {
        let guard = self
            .inner
            .lock()
            .map_err(|_| PhasegateError::InvalidState("memory store poisoned".to_string()))?;
        guard.clone().ok_or(PhasegateError::NotInitialized)
    }

    fn save(&self, state: &ProjectState) -> Result<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| PhasegateError::InvalidState("memory store poisoned".to_string()))?;
        *guard = Some(state.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Phase;
    use tempfile::TempDir;

    #[test]
    fn file_store_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path());
        assert!(!store.exists());

        let mut state = ProjectState::new("roundtrip");
        state.add_note(Phase::Requirements, "kickoff done");
        store.save(&state).unwrap();

        assert!(store.exists());
        let loaded = store.load().unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn file_store_not_initialized() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path());
        assert!(matches!(
            store.load(),
            Err(PhasegateError::NotInitialized)
        ));
    }

    #[test]
    fn file_store_rejects_malformed_json() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path());
        std::fs::create_dir_all(dir.path().join(".sdlc")).unwrap();
        std::fs::write(store.path(), "{ not json").unwrap();
        assert!(matches!(store.load(), Err(PhasegateError::Json(_))));
    }

    #[test]
    fn file_store_validates_on_load() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path());

        let mut state = ProjectState::new("broken");
        state.current_phase = Phase::Deployment;
        // Bypass validation by serializing directly.
        let data = serde_json::to_string_pretty(&state).unwrap();
        std::fs::create_dir_all(dir.path().join(".sdlc")).unwrap();
        std::fs::write(store.path(), data).unwrap();

        assert!(matches!(
            store.load(),
            Err(PhasegateError::InvalidState(_))
        ));
    }

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert!(!store.exists());
        assert!(matches!(
            store.load(),
            Err(PhasegateError::NotInitialized)
        ));

        let state = ProjectState::new("in-memory");
        store.save(&state).unwrap();
        assert!(store.exists());
        assert_eq!(store.load().unwrap(), state);
    }
}
