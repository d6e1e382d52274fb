//! The phase-gate state machine.
//!
//! Every mutating operation follows the same discipline: take the advisory
//! lock, load state through the store, check preconditions, mutate, save
//! through the atomic-rename path. A failed precondition returns before the
//! save, so persisted state is never half-written.

use crate::checklist;
use crate::config::GateConfig;
use crate::error::{PhasegateError, Result};
use crate::gate::{self, GateResult};
use crate::io;
use crate::lock::StateLock;
use crate::paths;
use crate::scaffold::{self, ScaffoldReport};
use crate::state::ProjectState;
use crate::store::{JsonFileStore, StateStore};
use crate::types::{Phase, ProjectType};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// What `initialize` produced.
#[derive(Debug)]
pub struct InitOutcome {
    pub state: ProjectState,
    /// Present when a project template was scaffolded alongside tracking.
    pub scaffold: Option<ScaffoldReport>,
}

/// A successful gate-checked transition.
#[derive(Debug, Clone, Serialize)]
pub struct AdvanceOutcome {
    pub completed: Phase,
    /// `None` after `monitoring`: the iteration is complete.
    pub next: Option<Phase>,
    pub gate: GateResult,
}

impl AdvanceOutcome {
    pub fn workflow_complete(&self) -> bool {
        self.next.is_none()
    }
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Drives a project through the seven phases. Generic over the state store
/// so the whole machine can be exercised against the in-memory fake.
pub struct Orchestrator<S: StateStore> {
    root: PathBuf,
    store: S,
    gates: GateConfig,
}

impl Orchestrator<JsonFileStore> {
    /// Open against the JSON store at `root`, with `gates.yaml` (or the
    /// built-in criteria table when the file is absent).
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let gates = GateConfig::load_or_default(&root)?;
        let store = JsonFileStore::new(&root);
        Ok(Self { root, store, gates })
    }
}

impl<S: StateStore> Orchestrator<S> {
    pub fn new(root: impl Into<PathBuf>, store: S, gates: GateConfig) -> Self {
        Self {
            root: root.into(),
            store,
            gates,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn gates(&self) -> &GateConfig {
        &self.gates
    }

    // ---------------------------------------------------------------------------
    // initialize
    // ---------------------------------------------------------------------------

    /// Create `.sdlc/` tracking: state at `requirements`, the gate config
    /// and the per-phase checklists. `force` replaces existing tracking
    /// with a pristine copy. `template` additionally scaffolds project
    /// starter files.
    pub fn initialize(
        &self,
        project_name: &str,
        force: bool,
        template: Option<ProjectType>,
    ) -> Result<InitOutcome> {
        let lock = StateLock::acquire(&self.root)?;
        if self.store.exists() && !force {
            return Err(PhasegateError::AlreadyInitialized);
        }
        if force {
            self.clear_tracking()?;
        }

        io::ensure_dir(&paths::phases_dir(&self.root))?;
        for &phase in Phase::all() {
            io::write_if_missing(
                &paths::checklist_path(&self.root, phase),
                checklist::markdown(phase).as_bytes(),
            )?;
        }
        if !paths::gates_path(&self.root).exists() {
            GateConfig::default().save(&self.root)?;
        }

        let state = ProjectState::new(project_name);
        self.store.save(&state)?;

        let report = match template {
            Some(ty) => Some(scaffold::apply(&self.root, &scaffold::plan(ty, project_name))?),
            None => None,
        };

        info!(project = project_name, "initialized phase tracking");
        lock.release()?;
        Ok(InitOutcome {
            state,
            scaffold: report,
        })
    }

    /// Remove tracked artifacts for a forced re-init. The live lock file
    /// stays in place.
    fn clear_tracking(&self) -> Result<()> {
        let state_path = paths::state_path(&self.root);
        if state_path.exists() {
            std::fs::remove_file(&state_path)?;
        }
        let gates_path = paths::gates_path(&self.root);
        if gates_path.exists() {
            std::fs::remove_file(&gates_path)?;
        }
        let phases_dir = paths::phases_dir(&self.root);
        if phases_dir.exists() {
            std::fs::remove_dir_all(&phases_dir)?;
        }
        Ok(())
    }

    // ---------------------------------------------------------------------------
    // gate evaluation
    // ---------------------------------------------------------------------------

    /// Evaluate one phase's gate (default: the current phase). Pure read.
    pub fn evaluate_gate(&self, phase: Option<Phase>) -> Result<GateResult> {
        let state = self.store.load()?;
        let phase = phase.unwrap_or(state.current_phase);
        Ok(gate::evaluate(
            &self.root,
            &state,
            phase,
            self.gates.criteria_for(phase),
        ))
    }

    /// Evaluate every phase's gate in order.
    pub fn evaluate_all(&self) -> Result<Vec<GateResult>> {
        let state = self.store.load()?;
        Ok(Phase::all()
            .iter()
            .map(|&p| gate::evaluate(&self.root, &state, p, self.gates.criteria_for(p)))
            .collect())
    }

    // ---------------------------------------------------------------------------
    // advance
    // ---------------------------------------------------------------------------

    /// Close the current phase through its gate and enter the next one.
    ///
    /// `phase`, when given, must name the current phase; this guards
    /// scripted callers against advancing the wrong project. After
    /// `monitoring` closes there is no successor and further calls return
    /// `WorkflowComplete` until a new iteration begins.
    pub fn advance(&self, phase: Option<Phase>) -> Result<AdvanceOutcome> {
        let lock = StateLock::acquire(&self.root)?;
        let mut state = self.store.load()?;
        let current = state.current_phase;
        if let Some(p) = phase {
            if p != current {
                return Err(PhasegateError::NotCurrentPhase { phase: p, current });
            }
        }
        if state.workflow_complete() {
            return Err(PhasegateError::WorkflowComplete(state.iteration));
        }
        if let Some(incomplete) = state.first_incomplete_before(current) {
            return Err(PhasegateError::PrecedingPhaseIncomplete {
                phase: current,
                incomplete,
            });
        }

        let gate = gate::evaluate(&self.root, &state, current, self.gates.criteria_for(current));
        if !gate.passed {
            return Err(PhasegateError::GateNotSatisfied(Box::new(gate)));
        }

        state.close_current(gate.clone());
        let next = current.next();
        if let Some(next_phase) = next {
            state.open_record(next_phase, false);
        }
        self.store.save(&state)?;
        lock.release()?;

        match next {
            Some(next_phase) => info!(completed = %current, next = %next_phase, "phase advanced"),
            None => info!(iteration = state.iteration, "workflow complete"),
        }
        Ok(AdvanceOutcome {
            completed: current,
            next,
            gate,
        })
    }

    // ---------------------------------------------------------------------------
    // jump_to
    // ---------------------------------------------------------------------------

    /// Administrative override: make `phase` current without a gate check.
    ///
    /// Unforced jumps require every lower-order phase to be complete in
    /// this iteration (resuming mid-pipeline). Forced jumps skip the check
    /// and are marked on the record for audit.
    pub fn jump_to(&self, phase: Phase, force: bool) -> Result<ProjectState> {
        let lock = StateLock::acquire(&self.root)?;
        let mut state = self.store.load()?;
        if phase == state.current_phase {
            lock.release()?;
            return Ok(state);
        }
        match state.first_incomplete_before(phase) {
            Some(incomplete) if !force => {
                return Err(PhasegateError::PrecedingPhaseIncomplete { phase, incomplete });
            }
            Some(incomplete) => {
                warn!(target = %phase, first_incomplete = %incomplete, "forced jump past incomplete phases");
            }
            None => {}
        }

        state.open_record(phase, force);
        self.store.save(&state)?;
        lock.release()?;
        info!(phase = %phase, force, "jumped to phase");
        Ok(state)
    }

    // ---------------------------------------------------------------------------
    // iteration feedback loop
    // ---------------------------------------------------------------------------

    /// Start iteration N+1 at `requirements` once `monitoring` has closed.
    /// This is the feedback loop: the workflow never rewinds inside an
    /// iteration, it cycles.
    pub fn begin_iteration(&self) -> Result<ProjectState> {
        let lock = StateLock::acquire(&self.root)?;
        let mut state = self.store.load()?;
        if !state.workflow_complete() {
            return Err(PhasegateError::IterationIncomplete(state.iteration));
        }
        state.next_iteration();
        self.store.save(&state)?;
        lock.release()?;
        info!(iteration = state.iteration, "new iteration started");
        Ok(state)
    }

    // ---------------------------------------------------------------------------
    // notes / status
    // ---------------------------------------------------------------------------

    /// Record a free-text note for a phase (sign-offs, verification
    /// records). Notes feed `state_note` gate criteria. Returns false when
    /// the identical note was already present.
    pub fn add_note(&self, phase: Phase, note: &str) -> Result<bool> {
        let lock = StateLock::acquire(&self.root)?;
        let mut state = self.store.load()?;
        let added = state.add_note(phase, note);
        if added {
            self.store.save(&state)?;
        }
        lock.release()?;
        Ok(added)
    }

    /// Read-only snapshot of the persisted state.
    pub fn status(&self) -> Result<ProjectState> {
        self.store.load()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
