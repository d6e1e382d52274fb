use crate::error::{PhasegateError, Result};
use crate::gate::GateResult;
use crate::types::{Phase, PhaseStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// PhaseRecord
// ---------------------------------------------------------------------------

/// One traversal of one phase. A record opens when the phase is entered and
/// closes (`completed_at`, `gate_result`) only when its gate passes. Records
/// abandoned by an administrative jump keep `completed_at = null` forever.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseRecord {
    pub phase: Phase,
    #[serde(default = "default_iteration")]
    pub iteration: u32,
    pub entered_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub gate_result: Option<GateResult>,
    /// Set when the record was created by a forced jump, for audit.
    #[serde(default)]
    pub forced: bool,
}

impl PhaseRecord {
    pub fn is_open(&self) -> bool {
        self.completed_at.is_none()
    }
}

// ---------------------------------------------------------------------------
// ProjectState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectState {
    #[serde(default = "default_version")]
    pub version: u32,
    pub project_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub current_phase: Phase,
    #[serde(default = "default_iteration")]
    pub iteration: u32,
    pub phase_history: Vec<PhaseRecord>,
    #[serde(default)]
    pub notes: BTreeMap<Phase, Vec<String>>,
}

fn default_version() -> u32 {
    1
}

fn default_iteration() -> u32 {
    1
}

impl ProjectState {
    pub fn new(project_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            version: 1,
            project_name: project_name.into(),
            created_at: now,
            updated_at: now,
            current_phase: Phase::Requirements,
            iteration: 1,
            phase_history: vec![PhaseRecord {
                phase: Phase::Requirements,
                iteration: 1,
                entered_at: now,
                completed_at: None,
                gate_result: None,
                forced: false,
            }],
            notes: BTreeMap::new(),
        }
    }

    // ---------------------------------------------------------------------------
    // Record lookups (scoped to the current iteration, latest record wins)
    // ---------------------------------------------------------------------------

    /// Latest record for a phase in the current iteration. Re-entering a
    /// phase appends a new record, which then shadows the old one.
    pub fn record_for(&self, phase: Phase) -> Option<&PhaseRecord> {
        self.phase_history
            .iter()
            .rev()
            .find(|r| r.iteration == self.iteration && r.phase == phase)
    }

    /// The record for `current_phase`. Present in any valid state.
    pub fn current_record(&self) -> Option<&PhaseRecord> {
        self.record_for(self.current_phase)
    }

    pub fn is_complete(&self, phase: Phase) -> bool {
        self.record_for(phase)
            .map(|r| r.completed_at.is_some())
            .unwrap_or(false)
    }

    /// First phase below `phase` (by order) that is not complete in the
    /// current iteration.
    pub fn first_incomplete_before(&self, phase: Phase) -> Option<Phase> {
        Phase::all()
            .iter()
            .copied()
            .take_while(|p| p.order() < phase.order())
            .find(|p| !self.is_complete(*p))
    }

    /// Whether the current iteration has run all the way through.
    /// Monitoring can only complete after every predecessor has, so one
    /// check covers the whole pipeline.
    pub fn workflow_complete(&self) -> bool {
        self.is_complete(Phase::Monitoring)
    }

    pub fn phase_status(&self, phase: Phase) -> PhaseStatus {
        match self.record_for(phase) {
            Some(r) if r.completed_at.is_some() => PhaseStatus::Complete,
            Some(_) if phase == self.current_phase => PhaseStatus::InProgress,
            _ if phase.order() < self.current_phase.order() => PhaseStatus::Blocked,
            _ => PhaseStatus::Pending,
        }
    }

    // ---------------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------------

    /// Append an open record for `phase` and make it current.
    pub fn open_record(&mut self, phase: Phase, forced: bool) {
        self.phase_history.push(PhaseRecord {
            phase,
            iteration: self.iteration,
            entered_at: Utc::now(),
            completed_at: None,
            gate_result: None,
            forced,
        });
        self.current_phase = phase;
        self.updated_at = Utc::now();
    }

    /// Close the current phase's record with a passing gate result.
    pub fn close_current(&mut self, gate: GateResult) {
        let iteration = self.iteration;
        let phase = self.current_phase;
        if let Some(record) = self
            .phase_history
            .iter_mut()
            .rev()
            .find(|r| r.iteration == iteration && r.phase == phase)
        {
            record.completed_at = Some(Utc::now());
            record.gate_result = Some(gate);
        }
        self.updated_at = Utc::now();
    }

    /// Start the next iteration with a fresh requirements record.
    pub fn next_iteration(&mut self) {
        self.iteration += 1;
        self.open_record(Phase::Requirements, false);
    }

    /// Record a note for a phase. Duplicate notes are dropped. Returns true
    /// if the note was added.
    pub fn add_note(&mut self, phase: Phase, note: &str) -> bool {
        let notes = self.notes.entry(phase).or_default();
        if notes.iter().any(|n| n == note) {
            return false;
        }
        notes.push(note.to_string());
        self.updated_at = Utc::now();
        true
    }

    pub fn notes_for(&self, phase: Phase) -> &[String] {
        self.notes.get(&phase).map(Vec::as_slice).unwrap_or(&[])
    }

    // ---------------------------------------------------------------------------
    // Validation
    // ---------------------------------------------------------------------------

    /// Structural checks applied after deserializing. Returns the first
    /// violation found; a loaded state is never silently corrected.
    pub fn validate(&self) -> Result<()> {
        let Some(last) = self.phase_history.last() else {
            return Err(PhasegateError::InvalidState(
                "phase_history is empty".to_string(),
            ));
        };
        if last.phase != self.current_phase {
            return Err(PhasegateError::InvalidState(format!(
                "current_phase is {} but the last history entry is {}",
                self.current_phase, last.phase
            )));
        }
        if last.iteration != self.iteration {
            return Err(PhasegateError::InvalidState(format!(
                "iteration is {} but the last history entry has iteration {}",
                self.iteration, last.iteration
            )));
        }
        let mut prev = 0u32;
        for record in &self.phase_history {
            if record.iteration < prev {
                return Err(PhasegateError::InvalidState(format!(
                    "iteration goes backwards in phase_history (from {} to {})",
                    prev, record.iteration
                )));
            }
            prev = record.iteration;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
