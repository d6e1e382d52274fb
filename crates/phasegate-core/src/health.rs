use crate::checklist;
use crate::error::Result;
use crate::state::ProjectState;
use crate::types::{Phase, PhaseStatus};
use serde::Serialize;
use std::path::Path;

// ---------------------------------------------------------------------------
// Per-phase survey
// ---------------------------------------------------------------------------

/// One row of the health dashboard: derived status, checklist progress
/// and gate outcome for a single phase.
#[derive(Debug, Clone, Serialize)]
pub struct PhaseHealth {
    pub phase: Phase,
    pub status: PhaseStatus,
    pub checked: usize,
    pub total: usize,
    pub gate_passed: bool,
}

/// Survey all seven phases against the state and the checklist files
/// under `root`.
pub fn survey(root: &Path, state: &ProjectState) -> Result<Vec<PhaseHealth>> {
    let mut rows = Vec::with_capacity(Phase::all().len());
    for &phase in Phase::all() {
        let (checked, total) = checklist::progress_for(root, phase)?;
        let gate_passed = state
            .record_for(phase)
            .and_then(|r| r.gate_result.as_ref())
            .is_some_and(|g| g.passed);
        rows.push(PhaseHealth {
            phase,
            status: state.phase_status(phase),
            checked,
            total,
            gate_passed,
        });
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Health score
// ---------------------------------------------------------------------------

/// Overall health in [0, 100], averaged over all phases. Checklist
/// progress weighs 70%, the gate 30%; a completed phase never scores
/// below 90 so old untracked checklists do not drag finished work down.
pub fn score(rows: &[PhaseHealth]) -> f64 {
    if rows.is_empty() {
        return 0.0;
    }
    let mut sum = 0.0;
    for row in rows {
        let checklist = if row.total == 0 {
            0.0
        } else {
            row.checked as f64 / row.total as f64
        };
        let gate = if row.gate_passed { 1.0 } else { 0.0 };
        let mut phase_score = (checklist * 0.7 + gate * 0.3) * 100.0;
        if row.status == PhaseStatus::Complete {
            phase_score = phase_score.max(90.0);
        }
        sum += phase_score;
    }
    let avg = sum / rows.len() as f64;
    (avg * 10.0).round() / 10.0
}

// ---------------------------------------------------------------------------
// Recommendations
// ---------------------------------------------------------------------------

/// Actionable next steps for the dashboard.
pub fn recommendations(state: &ProjectState, rows: &[PhaseHealth]) -> Vec<String> {
    let mut recs = Vec::new();
    let current = state.current_phase;
    for row in rows {
        if row.phase == current {
            if row.status == PhaseStatus::InProgress && !row.gate_passed {
                recs.push(format!("Complete gate criteria for '{}'", row.phase));
            }
        } else if row.phase.order() < current.order() && !row.gate_passed {
            recs.push(format!(
                "Phase '{}' gate not passed (before current phase)",
                row.phase
            ));
        }
    }
    if state.workflow_complete() {
        recs.push(
            "All phases complete. Start a new iteration to loop monitoring back into requirements."
                .to_string(),
        );
    }
    recs
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::GateResult;
    use chrono::Utc;
    use tempfile::TempDir;

    fn row(phase: Phase, status: PhaseStatus, checked: usize, total: usize, gate: bool) -> PhaseHealth {
        PhaseHealth {
            phase,
            status,
            checked,
            total,
            gate_passed: gate,
        }
    }

    fn pending_rows() -> Vec<PhaseHealth> {
        Phase::all()
            .iter()
            .map(|&p| row(p, PhaseStatus::Pending, 0, 0, false))
            .collect()
    }

    #[test]
    fn fresh_project_scores_zero() {
        let dir = TempDir::new().unwrap();
        let state = ProjectState::new("demo");
        let rows = survey(dir.path(), &state).unwrap();
        assert_eq!(rows.len(), 7);
        assert_eq!(score(&rows), 0.0);
    }

    #[test]
    fn checklist_progress_raises_score() {
        let mut rows = pending_rows();
        rows[0] = row(Phase::Requirements, PhaseStatus::InProgress, 7, 7, false);
        // one phase at 70 points, six at zero
        assert_eq!(score(&rows), 10.0);
    }

    #[test]
    fn gate_pass_adds_thirty_points() {
        let mut rows = pending_rows();
        rows[0] = row(Phase::Requirements, PhaseStatus::InProgress, 7, 7, true);
        // (0.7 + 0.3) * 100 / 7
        assert_eq!(score(&rows), 14.3);
    }

    #[test]
    fn completed_phase_floors_at_ninety() {
        let mut rows = pending_rows();
        rows[0] = row(Phase::Requirements, PhaseStatus::Complete, 0, 0, true);
        // 90 / 7 = 12.857...
        assert_eq!(score(&rows), 12.9);
    }

    #[test]
    fn all_complete_scores_ninety_or_more() {
        let rows: Vec<_> = Phase::all()
            .iter()
            .map(|&p| row(p, PhaseStatus::Complete, 0, 7, true))
            .collect();
        assert_eq!(score(&rows), 90.0);
    }

    #[test]
    fn survey_reads_gate_outcome_from_history() {
        let dir = TempDir::new().unwrap();
        let mut state = ProjectState::new("demo");
        let gate = GateResult {
            phase: Phase::Requirements,
            checked_at: Utc::now(),
            criteria: Vec::new(),
            passed: true,
        };
        state.close_current(gate);
        state.open_record(Phase::Development, false);

        let rows = survey(dir.path(), &state).unwrap();
        assert!(rows[0].gate_passed);
        assert_eq!(rows[0].status, PhaseStatus::Complete);
        assert_eq!(rows[1].status, PhaseStatus::InProgress);
        assert!(!rows[1].gate_passed);
    }

    #[test]
    fn recommends_gate_work_on_current_phase() {
        let state = ProjectState::new("demo");
        let mut rows = pending_rows();
        rows[0] = row(Phase::Requirements, PhaseStatus::InProgress, 0, 7, false);
        let recs = recommendations(&state, &rows);
        assert_eq!(recs, vec!["Complete gate criteria for 'requirements'".to_string()]);
    }

    #[test]
    fn flags_skipped_phases_behind_current() {
        let mut state = ProjectState::new("demo");
        state.open_record(Phase::Cicd, true);
        let mut rows = pending_rows();
        rows[0] = row(Phase::Requirements, PhaseStatus::Blocked, 0, 7, false);
        rows[1] = row(Phase::Development, PhaseStatus::Blocked, 0, 7, false);
        rows[2] = row(Phase::Cicd, PhaseStatus::InProgress, 0, 7, false);
        let recs = recommendations(&state, &rows);
        assert!(recs.contains(&"Phase 'requirements' gate not passed (before current phase)".to_string()));
        assert!(recs.contains(&"Phase 'development' gate not passed (before current phase)".to_string()));
    }

    #[test]
    fn complete_workflow_suggests_new_iteration() {
        let mut state = ProjectState::new("demo");
        for &phase in Phase::all() {
            if phase != Phase::Requirements {
                state.open_record(phase, false);
            }
            state.close_current(GateResult {
                phase,
                checked_at: Utc::now(),
                criteria: Vec::new(),
                passed: true,
            });
        }
        let rows: Vec<_> = Phase::all()
            .iter()
            .map(|&p| row(p, PhaseStatus::Complete, 0, 0, true))
            .collect();
        let recs = recommendations(&state, &rows);
        assert_eq!(recs.len(), 1);
        assert!(recs[0].contains("new iteration"));
    }
}
