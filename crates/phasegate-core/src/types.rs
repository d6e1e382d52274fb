use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Requirements,
    Development,
    Cicd,
    Testing,
    Uat,
    Deployment,
    Monitoring,
}

impl Phase {
    pub fn all() -> &'static [Phase] {
        &[
            Phase::Requirements,
            Phase::Development,
            Phase::Cicd,
            Phase::Testing,
            Phase::Uat,
            Phase::Deployment,
            Phase::Monitoring,
        ]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// One-based position in the lifecycle (1..=7).
    pub fn order(self) -> usize {
        self.index() + 1
    }

    pub fn next(self) -> Option<Phase> {
        let all = Phase::all();
        let i = self.index();
        all.get(i + 1).copied()
    }

    pub fn prev(self) -> Option<Phase> {
        let i = self.index();
        if i == 0 {
            None
        } else {
            Phase::all().get(i - 1).copied()
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Requirements => "requirements",
            Phase::Development => "development",
            Phase::Cicd => "cicd",
            Phase::Testing => "testing",
            Phase::Uat => "uat",
            Phase::Deployment => "deployment",
            Phase::Monitoring => "monitoring",
        }
    }

    /// Human display name, e.g. for the dashboard header.
    pub fn title(self) -> &'static str {
        match self {
            Phase::Requirements => "Requirements & Planning",
            Phase::Development => "Development & Git",
            Phase::Cicd => "CI/CD Pipeline",
            Phase::Testing => "QA Testing",
            Phase::Uat => "User Acceptance Testing",
            Phase::Deployment => "Production Deployment",
            Phase::Monitoring => "Monitoring & SRE",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Phase {
    type Err = crate::error::PhasegateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "requirements" => Ok(Phase::Requirements),
            "development" => Ok(Phase::Development),
            "cicd" => Ok(Phase::Cicd),
            "testing" => Ok(Phase::Testing),
            "uat" => Ok(Phase::Uat),
            "deployment" => Ok(Phase::Deployment),
            "monitoring" => Ok(Phase::Monitoring),
            _ => Err(crate::error::PhasegateError::InvalidPhase(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// PhaseStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    Pending,
    InProgress,
    Complete,
    Blocked,
}

impl fmt::Display for PhaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PhaseStatus::Pending => "pending",
            PhaseStatus::InProgress => "in_progress",
            PhaseStatus::Complete => "complete",
            PhaseStatus::Blocked => "blocked",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// ProjectType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    Node,
    Python,
    Go,
}

impl ProjectType {
    pub fn all() -> &'static [ProjectType] {
        &[ProjectType::Node, ProjectType::Python, ProjectType::Go]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProjectType::Node => "node",
            ProjectType::Python => "python",
            ProjectType::Go => "go",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProjectType {
    type Err = crate::error::PhasegateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "node" => Ok(ProjectType::Node),
            "python" => Ok(ProjectType::Python),
            "go" => Ok(ProjectType::Go),
            _ => Err(crate::error::PhasegateError::UnknownProjectType(
                s.to_string(),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_ordering() {
        assert!(Phase::Requirements < Phase::Development);
        assert!(Phase::Testing < Phase::Uat);
        assert!(Phase::Monitoring > Phase::Deployment);
    }

    #[test]
    fn phase_order_is_one_based() {
        assert_eq!(Phase::Requirements.order(), 1);
        assert_eq!(Phase::Cicd.order(), 3);
        assert_eq!(Phase::Monitoring.order(), 7);
    }

    #[test]
    fn phase_next() {
        assert_eq!(Phase::Requirements.next(), Some(Phase::Development));
        assert_eq!(Phase::Deployment.next(), Some(Phase::Monitoring));
        assert_eq!(Phase::Monitoring.next(), None);
    }

    #[test]
    fn phase_prev() {
        assert_eq!(Phase::Requirements.prev(), None);
        assert_eq!(Phase::Development.prev(), Some(Phase::Requirements));
        assert_eq!(Phase::Monitoring.prev(), Some(Phase::Deployment));
    }

    #[test]
    fn phase_roundtrip() {
        use std::str::FromStr;
        for phase in Phase::all() {
            let s = phase.as_str();
            let parsed = Phase::from_str(s).unwrap();
            assert_eq!(*phase, parsed);
        }
    }

    #[test]
    fn phase_rejects_unknown() {
        use std::str::FromStr;
        assert!(Phase::from_str("qa").is_err());
        assert!(Phase::from_str("").is_err());
        assert!(Phase::from_str("Requirements").is_err());
    }

    #[test]
    fn phase_serde_uses_snake_case() {
        let json = serde_json::to_string(&Phase::Cicd).unwrap();
        assert_eq!(json, "\"cicd\"");
        let back: Phase = serde_json::from_str("\"uat\"").unwrap();
        assert_eq!(back, Phase::Uat);
    }

    #[test]
    fn project_type_roundtrip() {
        use std::str::FromStr;
        for t in ProjectType::all() {
            assert_eq!(ProjectType::from_str(t.as_str()).unwrap(), *t);
        }
        assert!(ProjectType::from_str("rust").is_err());
    }
}
