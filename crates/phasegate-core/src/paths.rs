use crate::types::Phase;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const SDLC_DIR: &str = ".sdlc";
pub const PHASES_DIR: &str = ".sdlc/phases";

pub const STATE_FILE: &str = ".sdlc/state.json";
pub const GATES_FILE: &str = ".sdlc/gates.yaml";
pub const LOCK_FILE: &str = ".sdlc/state.lock";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn sdlc_dir(root: &Path) -> PathBuf {
    root.join(SDLC_DIR)
}

pub fn phases_dir(root: &Path) -> PathBuf {
    root.join(PHASES_DIR)
}

pub fn state_path(root: &Path) -> PathBuf {
    root.join(STATE_FILE)
}

pub fn gates_path(root: &Path) -> PathBuf {
    root.join(GATES_FILE)
}

pub fn lock_path(root: &Path) -> PathBuf {
    root.join(LOCK_FILE)
}

/// Checklist file for a phase, e.g. `.sdlc/phases/01-requirements.md`.
pub fn checklist_path(root: &Path, phase: Phase) -> PathBuf {
    phases_dir(root).join(format!("{:02}-{}.md", phase.order(), phase.as_str()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_helpers() {
        let root = Path::new("/tmp/proj");
        assert_eq!(
            state_path(root),
            PathBuf::from("/tmp/proj/.sdlc/state.json")
        );
        assert_eq!(
            gates_path(root),
            PathBuf::from("/tmp/proj/.sdlc/gates.yaml")
        );
        assert_eq!(
            lock_path(root),
            PathBuf::from("/tmp/proj/.sdlc/state.lock")
        );
    }

    #[test]
    fn checklist_paths_are_zero_padded() {
        let root = Path::new("/tmp/proj");
        assert_eq!(
            checklist_path(root, Phase::Requirements),
            PathBuf::from("/tmp/proj/.sdlc/phases/01-requirements.md")
        );
        assert_eq!(
            checklist_path(root, Phase::Monitoring),
            PathBuf::from("/tmp/proj/.sdlc/phases/07-monitoring.md")
        );
    }
}
