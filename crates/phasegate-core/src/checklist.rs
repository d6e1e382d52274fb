use crate::error::Result;
use crate::paths;
use crate::types::Phase;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Checklist content
// ---------------------------------------------------------------------------

/// Working-items checklist for a phase. These are guidance, not gate
/// criteria: ticking boxes feeds the health score, the gate decides
/// advancement.
pub fn items(phase: Phase) -> &'static [&'static str] {
    match phase {
        Phase::Requirements => &[
            "Define project vision and goals",
            "Identify stakeholders",
            "Write PRD (Product Requirements Document)",
            "Create user stories with acceptance criteria",
            "Assess technical feasibility",
            "Define success metrics",
            "Get stakeholder sign-off",
        ],
        Phase::Development => &[
            "Set up repository and branching strategy",
            "Configure development environment",
            "Install pre-commit hooks",
            "Implement core features",
            "Write inline documentation",
            "Conduct code reviews",
            "Maintain clean commit history",
        ],
        Phase::Cicd => &[
            "Set up CI pipeline (build + test)",
            "Configure linting and formatting checks",
            "Add security scanning (SAST)",
            "Set up artifact publishing",
            "Configure branch protection rules",
            "Add deployment pipeline",
            "Test pipeline end-to-end",
        ],
        Phase::Testing => &[
            "Write unit tests (>80% coverage target)",
            "Write integration tests for critical paths",
            "Set up E2E test suite",
            "Run regression tests",
            "Conduct performance/load testing",
            "Fix all critical/high severity bugs",
            "Generate test coverage report",
        ],
        Phase::Uat => &[
            "Create UAT test plan from user stories",
            "Set up UAT environment",
            "Brief stakeholders on testing scope",
            "Execute UAT test cases",
            "Collect and triage feedback",
            "Fix blocking issues",
            "Obtain stakeholder sign-off",
        ],
        Phase::Deployment => &[
            "Create deployment runbook",
            "Set up feature flags (if applicable)",
            "Configure deployment strategy",
            "Run pre-deployment smoke tests",
            "Execute deployment",
            "Run post-deployment smoke tests",
            "Verify rollback procedure works",
        ],
        Phase::Monitoring => &[
            "Set up application metrics",
            "Configure log aggregation",
            "Define SLOs and error budgets",
            "Create alerting rules",
            "Set up dashboards",
            "Document incident response procedure",
            "Conduct game day / chaos testing",
        ],
    }
}

/// Render the markdown checklist written at init to
/// `.sdlc/phases/NN-<id>.md`.
pub fn markdown(phase: Phase) -> String {
    let mut out = format!("# Phase {}: {}\n\n", phase.order(), phase.title());
    for item in items(phase) {
        out.push_str("- [ ] ");
        out.push_str(item);
        out.push('\n');
    }
    out
}

// ---------------------------------------------------------------------------
// Progress parsing
// ---------------------------------------------------------------------------

static BOX_RE: OnceLock<Regex> = OnceLock::new();
static CHECKED_RE: OnceLock<Regex> = OnceLock::new();

fn box_re() -> &'static Regex {
    BOX_RE.get_or_init(|| Regex::new(r"- \[[ xX]\]").unwrap())
}

fn checked_re() -> &'static Regex {
    CHECKED_RE.get_or_init(|| Regex::new(r"- \[[xX]\]").unwrap())
}

/// Count (checked, total) checkbox items in markdown.
pub fn parse_progress(content: &str) -> (usize, usize) {
    let total = box_re().find_iter(content).count();
    let checked = checked_re().find_iter(content).count();
    (checked, total)
}

/// Progress for a phase's checklist file. A missing file counts as (0, 0).
pub fn progress_for(root: &Path, phase: Phase) -> Result<(usize, usize)> {
    let path = paths::checklist_path(root, phase);
    if !path.exists() {
        return Ok((0, 0));
    }
    let content = std::fs::read_to_string(&path)?;
    Ok(parse_progress(&content))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
