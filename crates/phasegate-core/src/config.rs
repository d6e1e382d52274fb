use crate::error::Result;
use crate::gate::{CriterionCheck, CriterionSpec};
use crate::paths;
use crate::types::Phase;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

// ---------------------------------------------------------------------------
// GateConfig
// ---------------------------------------------------------------------------

/// Per-phase exit criteria. The built-in table covers all seven phases; a
/// `gates.yaml` in `.sdlc/` replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default = "default_gates")]
    pub gates: BTreeMap<Phase, Vec<CriterionSpec>>,
}

fn default_version() -> u32 {
    1
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            version: 1,
            gates: default_gates(),
        }
    }
}

impl GateConfig {
    pub fn criteria_for(&self, phase: Phase) -> &[CriterionSpec] {
        self.gates
            .get(&phase)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Load `gates.yaml`, falling back to the built-in table when the file
    /// does not exist. A present but unparseable file is an error, not a
    /// silent fallback.
    pub fn load_or_default(root: &Path) -> Result<Self> {
        let path = paths::gates_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: GateConfig = serde_yaml::from_str(&data)?;
        for warning in cfg.validate() {
            tracing::warn!("gates.yaml: {warning}");
        }
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::gates_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        for phase in Phase::all() {
            if self.criteria_for(*phase).is_empty() {
                warnings.push(format!(
                    "phase '{phase}' has no gate criteria; its gate always passes"
                ));
            }
        }
        for (phase, specs) in &self.gates {
            for spec in specs {
                if spec.name.trim().is_empty() {
                    warnings.push(format!("phase '{phase}' has a criterion with no name"));
                }
                if let CriterionCheck::AnyMatch { patterns } = &spec.check {
                    if patterns.is_empty() {
                        warnings.push(format!(
                            "criterion '{}' on phase '{phase}' has no patterns and can never pass",
                            spec.name
                        ));
                    }
                }
            }
        }
        warnings
    }
}

// ---------------------------------------------------------------------------
// Default criteria table
// ---------------------------------------------------------------------------

fn spec(name: &str, check: CriterionCheck) -> CriterionSpec {
    CriterionSpec {
        name: name.to_string(),
        check,
    }
}

fn file(path: &str) -> CriterionCheck {
    CriterionCheck::FileExists {
        path: path.to_string(),
    }
}

fn dir(path: &str) -> CriterionCheck {
    CriterionCheck::DirExists {
        path: path.to_string(),
    }
}

fn pattern(pattern: &str) -> CriterionCheck {
    CriterionCheck::FileMatch {
        pattern: pattern.to_string(),
    }
}

fn any(patterns: &[&str]) -> CriterionCheck {
    CriterionCheck::AnyMatch {
        patterns: patterns.iter().map(|p| p.to_string()).collect(),
    }
}

fn contains(path: &str, text: &str) -> CriterionCheck {
    CriterionCheck::FileContains {
        path: path.to_string(),
        text: text.to_string(),
    }
}

fn note(phase: Phase, text: &str) -> CriterionCheck {
    CriterionCheck::StateNote {
        phase,
        text: text.to_string(),
    }
}

fn default_gates() -> BTreeMap<Phase, Vec<CriterionSpec>> {
    let mut gates = BTreeMap::new();
    gates.insert(
        Phase::Requirements,
        vec![
            spec("PRD document exists", file("docs/prd.md")),
            spec("User stories defined", pattern("docs/user-stories*")),
            spec(
                "Acceptance criteria present in PRD",
                contains("docs/prd.md", "acceptance criteria"),
            ),
            spec(
                "Technical feasibility assessed",
                pattern("docs/tech-feasibility*"),
            ),
            spec(
                "Stakeholder sign-off recorded",
                note(Phase::Requirements, "sign-off"),
            ),
        ],
    );
    gates.insert(
        Phase::Development,
        vec![
            spec("Git repository initialized", dir(".git")),
            spec("Branching strategy documented", pattern("*git*workflow*")),
            spec(
                "Pre-commit hooks configured",
                file(".pre-commit-config.yaml"),
            ),
            spec("README exists", file("README.md")),
            spec(
                "Code review process defined",
                note(Phase::Development, "code review"),
            ),
        ],
    );
    gates.insert(
        Phase::Cicd,
        vec![
            spec(
                "CI pipeline config exists",
                any(&[
                    ".github/workflows/*.yml",
                    ".github/workflows/*.yaml",
                    ".gitlab-ci.yml",
                    "Jenkinsfile",
                ]),
            ),
            spec("Build step defined", note(Phase::Cicd, "build")),
            spec("Test step in pipeline", note(Phase::Cicd, "test")),
            spec(
                "Linting configured",
                any(&[".eslintrc*", ".flake8", "pyproject.toml", ".prettierrc*"]),
            ),
            spec("Pipeline tested end-to-end", note(Phase::Cicd, "verified")),
        ],
    );
    gates.insert(
        Phase::Testing,
        vec![
            spec("Unit tests exist", pattern("*test*")),
            spec(
                "Test coverage report generated",
                any(&["coverage/*", "htmlcov/*", ".coverage"]),
            ),
            spec(
                "Coverage meets threshold (>80%)",
                note(Phase::Testing, "coverage"),
            ),
            spec(
                "Critical bugs resolved",
                note(Phase::Testing, "bugs resolved"),
            ),
            spec("Test plan documented", pattern("docs/test-plan*")),
        ],
    );
    gates.insert(
        Phase::Uat,
        vec![
            spec("UAT plan created", pattern("docs/uat*")),
            spec("UAT environment available", note(Phase::Uat, "environment")),
            spec("All UAT cases executed", note(Phase::Uat, "executed")),
            spec(
                "Stakeholder sign-off obtained",
                note(Phase::Uat, "sign-off"),
            ),
        ],
    );
    gates.insert(
        Phase::Deployment,
        vec![
            spec("Deployment runbook exists", pattern("docs/deployment*")),
            spec(
                "Rollback procedure documented",
                pattern("docs/rollback*"),
            ),
            spec("Smoke tests defined", pattern("*smoke*")),
            spec(
                "Deployment strategy chosen",
                note(Phase::Deployment, "strategy"),
            ),
            spec(
                "Pre-deployment checklist complete",
                note(Phase::Deployment, "checklist"),
            ),
        ],
    );
    gates.insert(
        Phase::Monitoring,
        vec![
            spec(
                "Monitoring configured",
                note(Phase::Monitoring, "configured"),
            ),
            spec("Alerts defined", pattern("*alert*")),
            spec("SLOs documented", pattern("docs/slo*")),
            spec("Incident response plan exists", pattern("docs/incident*")),
            spec("Dashboard created", note(Phase::Monitoring, "dashboard")),
        ],
    );
    gates
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
