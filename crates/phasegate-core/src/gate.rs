use crate::state::ProjectState;
use crate::types::Phase;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// CriterionCheck
// ---------------------------------------------------------------------------

/// How a single exit criterion is verified against the project. Checks are
/// configuration data, not code: gates.yaml can replace the built-in table
/// without touching the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CriterionCheck {
    /// A file exists at this project-relative path.
    FileExists { path: String },
    /// A directory exists at this project-relative path.
    DirExists { path: String },
    /// A glob pattern matches somewhere under the project root, any depth.
    FileMatch { pattern: String },
    /// Any one of several glob patterns matches.
    AnyMatch { patterns: Vec<String> },
    /// A file contains the text, case-insensitive.
    FileContains { path: String, text: String },
    /// A recorded note for the phase contains the text, case-insensitive.
    StateNote { phase: Phase, text: String },
}

// ---------------------------------------------------------------------------
// CriterionSpec
// ---------------------------------------------------------------------------

/// A named exit criterion. The name is what gate reports show; the check is
/// how it is decided.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CriterionSpec {
    pub name: String,
    pub check: CriterionCheck,
}

// ---------------------------------------------------------------------------
// CriterionResult / GateResult
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionResult {
    pub name: String,
    pub passed: bool,
    /// Present only when evaluation itself failed (unreadable file, bad
    /// pattern) and the criterion was degraded to false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateResult {
    pub phase: Phase,
    pub checked_at: DateTime<Utc>,
    pub criteria: Vec<CriterionResult>,
    pub passed: bool,
}

impl GateResult {
    /// Number of criteria that passed.
    pub fn met(&self) -> usize {
        self.criteria.iter().filter(|c| c.passed).count()
    }

    pub fn failed(&self) -> impl Iterator<Item = &CriterionResult> {
        self.criteria.iter().filter(|c| !c.passed)
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Evaluate every criterion for a phase. Pure read: nothing is mutated, and
/// a criterion whose check cannot run is recorded as failed with a reason
/// rather than aborting the gate.
pub fn evaluate(
    root: &Path,
    state: &ProjectState,
    phase: Phase,
    specs: &[CriterionSpec],
) -> GateResult {
    let criteria: Vec<CriterionResult> = specs
        .iter()
        .map(|spec| evaluate_criterion(root, state, spec))
        .collect();
    let passed = criteria.iter().all(|c| c.passed);
    GateResult {
        phase,
        checked_at: Utc::now(),
        criteria,
        passed,
    }
}

fn evaluate_criterion(root: &Path, state: &ProjectState, spec: &CriterionSpec) -> CriterionResult {
    match run_check(root, state, &spec.check) {
        Ok(passed) => CriterionResult {
            name: spec.name.clone(),
            passed,
            reason: None,
        },
        Err(reason) => {
            tracing::warn!("criterion '{}' degraded to false: {reason}", spec.name);
            CriterionResult {
                name: spec.name.clone(),
                passed: false,
                reason: Some(reason),
            }
        }
    }
}

fn run_check(
    root: &Path,
    state: &ProjectState,
    check: &CriterionCheck,
) -> std::result::Result<bool, String> {
    match check {
        CriterionCheck::FileExists { path } => Ok(root.join(path).exists()),
        CriterionCheck::DirExists { path } => Ok(root.join(path).is_dir()),
        CriterionCheck::FileMatch { pattern } => match_anywhere(root, pattern),
        CriterionCheck::AnyMatch { patterns } => {
            for pattern in patterns {
                if match_anywhere(root, pattern)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        CriterionCheck::FileContains { path, text } => {
            let target = root.join(path);
            if !target.exists() {
                return Ok(false);
            }
            let content =
                std::fs::read_to_string(&target).map_err(|e| format!("{path}: {e}"))?;
            Ok(content.to_lowercase().contains(&text.to_lowercase()))
        }
        CriterionCheck::StateNote { phase, text } => {
            let needle = text.to_lowercase();
            Ok(state
                .notes_for(*phase)
                .iter()
                .any(|note| note.to_lowercase().contains(&needle)))
        }
    }
}

/// True if `pattern` matches a path at any depth under `root`.
fn match_anywhere(root: &Path, pattern: &str) -> std::result::Result<bool, String> {
    let full = root.join("**").join(pattern);
    let entries = glob::glob(&full.to_string_lossy())
        .map_err(|e| format!("bad pattern '{pattern}': {e}"))?;
    for entry in entries {
        if entry.is_ok() {
            return Ok(true);
        }
    }
    Ok(false)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
