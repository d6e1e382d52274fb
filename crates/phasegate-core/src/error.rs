use crate::gate::GateResult;
use crate::types::Phase;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PhasegateError {
    #[error("project is not initialized (run `phasegate init` first)")]
    NotInitialized,

    #[error("project is already initialized (use --force to reinitialize)")]
    AlreadyInitialized,

    #[error("invalid phase: {0}")]
    InvalidPhase(String),

    #[error("unknown project type: {0}")]
    UnknownProjectType(String),

    #[error("state file is invalid: {0}")]
    InvalidState(String),

    #[error("phase {phase} is not the current phase (current: {current})")]
    NotCurrentPhase { phase: Phase, current: Phase },

    #[error("gate for phase {} not satisfied: {}/{} criteria met", .0.phase, .0.met(), .0.criteria.len())]
    GateNotSatisfied(Box<GateResult>),

    #[error("cannot enter {phase} while {incomplete} is incomplete")]
    PrecedingPhaseIncomplete { phase: Phase, incomplete: Phase },

    #[error("workflow is complete: all phases of iteration {0} are done")]
    WorkflowComplete(u32),

    #[error("iteration {0} is not finished: complete the monitoring phase first")]
    IterationIncomplete(u32),

    #[error("state is locked by process {pid} (remove {path} if that process is gone)")]
    LockHeld { pid: u32, path: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl PhasegateError {
    /// Process exit code for the CLI: 1 for precondition and validation
    /// failures the user can act on, 2 for persistence and lock problems.
    pub fn exit_code(&self) -> i32 {
        match self {
            PhasegateError::Io(_)
            | PhasegateError::Json(_)
            | PhasegateError::Yaml(_)
            | PhasegateError::LockHeld { .. } => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, PhasegateError>;
