//! Project scaffolding: a per-type template registry and a pure plan.
//!
//! `plan` decides every file without touching the filesystem; `apply`
//! writes the plan and skips anything that already exists.

use crate::error::Result;
use crate::types::ProjectType;
use std::path::{Path, PathBuf};
use tracing::warn;

// ---------------------------------------------------------------------------
// Template registry
// ---------------------------------------------------------------------------

/// Static scaffold description for one project type. Templates use
/// `{name}` as the project-name placeholder.
pub struct ProjectTemplate {
    pub gitignore: &'static str,
    pub manifest_path: &'static str,
    pub manifest: &'static str,
    pub entry_path: &'static str,
    pub entry: &'static str,
    pub lint_hint: &'static str,
}

static NODE: ProjectTemplate = ProjectTemplate {
    gitignore: "node_modules/\ndist/\ncoverage/\n.env\n*.log\n",
    manifest_path: "package.json",
    manifest: r#"{
  "name": "{name}",
  "version": "0.1.0",
  "private": true,
  "scripts": {
    "test": "node --test"
  }
}
"#,
    entry_path: "src/index.js",
    entry: r#"function main() {
  console.log("hello from {name}");
}

main();
"#,
    lint_hint: "npx eslint .",
};

static PYTHON: ProjectTemplate = ProjectTemplate {
    gitignore: "__pycache__/\n*.pyc\n.venv/\ndist/\n.coverage\nhtmlcov/\n.env\n",
    manifest_path: "pyproject.toml",
    manifest: r#"[project]
name = "{name}"
version = "0.1.0"
requires-python = ">=3.11"

[tool.ruff]
line-length = 100
"#,
    entry_path: "src/main.py",
    entry: r#"def main() -> None:
    print("hello from {name}")


if __name__ == "__main__":
    main()
"#,
    lint_hint: "ruff check .",
};

static GO: ProjectTemplate = ProjectTemplate {
    gitignore: "bin/\n*.test\ncoverage.out\n.env\n",
    manifest_path: "go.mod",
    manifest: "module {name}\n\ngo 1.22\n",
    entry_path: "main.go",
    entry: r#"package main

import "fmt"

func main() {
	fmt.Println("hello from {name}")
}
"#,
    lint_hint: "golangci-lint run",
};

pub fn template(project_type: ProjectType) -> &'static ProjectTemplate {
    match project_type {
        ProjectType::Node => &NODE,
        ProjectType::Python => &PYTHON,
        ProjectType::Go => &GO,
    }
}

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldFile {
    pub path: &'static str,
    pub content: String,
    pub executable: bool,
}

impl ScaffoldFile {
    fn new(path: &'static str, content: String) -> Self {
        Self {
            path,
            content,
            executable: false,
        }
    }
}

fn pre_commit_hook(lint_hint: &str) -> String {
    let mut out = String::from("#!/bin/sh\n");
    out.push_str("# Pre-commit checks: format/lint, then a staged-secrets scan.\n");
    out.push_str("set -e\n\n");
    out.push_str(&format!("# {lint_hint}\n\n"));
    out.push_str(
        "if git diff --cached -U0 | grep -iE '(api_key|secret|password|token)[[:space:]]*[:=]' >/dev/null; then\n",
    );
    out.push_str("  echo \"pre-commit: possible secret in staged changes\" >&2\n");
    out.push_str("  exit 1\nfi\n");
    out
}

const PRECOMMIT_CONFIG: &str = "\
# Pre-commit configuration
# Hook script lives at .githooks/pre-commit; enable with:
#   git config core.hooksPath .githooks
repos: []
";

/// Decide the full set of files for a fresh project of the given type.
/// Pure: never reads or writes the filesystem.
pub fn plan(project_type: ProjectType, project_name: &str) -> Vec<ScaffoldFile> {
    let t = template(project_type);
    let fill = |s: &str| s.replace("{name}", project_name);

    let mut hook = ScaffoldFile::new(".githooks/pre-commit", pre_commit_hook(t.lint_hint));
    hook.executable = true;

    vec![
        ScaffoldFile::new(
            "README.md",
            format!("# {project_name}\n\n## Setup\n\n## Development\n\n## Testing\n"),
        ),
        ScaffoldFile::new(".gitignore", t.gitignore.to_string()),
        ScaffoldFile::new(t.manifest_path, fill(t.manifest)),
        ScaffoldFile::new(t.entry_path, fill(t.entry)),
        ScaffoldFile::new(".pre-commit-config.yaml", PRECOMMIT_CONFIG.to_string()),
        hook,
    ]
}

// ---------------------------------------------------------------------------
// Apply
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct ScaffoldReport {
    pub created: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// Write a plan under `root`. Existing files are left untouched and
/// reported as skipped.
pub fn apply(root: &Path, files: &[ScaffoldFile]) -> Result<ScaffoldReport> {
    let mut report = ScaffoldReport::default();
    for file in files {
        let path = root.join(file.path);
        if path.exists() {
            warn!(path = %path.display(), "scaffold target exists, skipping");
            report.skipped.push(PathBuf::from(file.path));
            continue;
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, &file.content)?;
        #[cfg(unix)]
        if file.executable {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))?;
        }
        report.created.push(PathBuf::from(file.path));
    }
    Ok(report)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn plan_carries_manifest_and_entry_per_type() {
        let cases = [
            (ProjectType::Node, "package.json", "src/index.js"),
            (ProjectType::Python, "pyproject.toml", "src/main.py"),
            (ProjectType::Go, "go.mod", "main.go"),
        ];
        for (ty, manifest, entry) in cases {
            let files = plan(ty, "demo");
            let paths: Vec<_> = files.iter().map(|f| f.path).collect();
            assert!(paths.contains(&manifest), "{ty}: missing {manifest}");
            assert!(paths.contains(&entry), "{ty}: missing {entry}");
            assert!(paths.contains(&".pre-commit-config.yaml"));
            assert!(paths.contains(&".githooks/pre-commit"));
        }
    }

    #[test]
    fn plan_substitutes_project_name() {
        let files = plan(ProjectType::Python, "orbit");
        let manifest = files.iter().find(|f| f.path == "pyproject.toml").unwrap();
        assert!(manifest.content.contains("name = \"orbit\""));
        assert!(!manifest.content.contains("{name}"));
        let entry = files.iter().find(|f| f.path == "src/main.py").unwrap();
        assert!(entry.content.contains("hello from orbit"));
    }

    #[test]
    fn plan_is_deterministic() {
        assert_eq!(plan(ProjectType::Go, "demo"), plan(ProjectType::Go, "demo"));
    }

    #[test]
    fn hook_scans_for_staged_secrets() {
        for &ty in ProjectType::all() {
            let files = plan(ty, "demo");
            let hook = files.iter().find(|f| f.path == ".githooks/pre-commit").unwrap();
            assert!(hook.executable);
            assert!(hook.content.starts_with("#!/bin/sh"));
            assert!(hook.content.contains("git diff --cached"));
        }
    }

    #[test]
    fn apply_writes_plan_and_creates_parents() {
        let dir = TempDir::new().unwrap();
        let files = plan(ProjectType::Node, "demo");
        let report = apply(dir.path(), &files).unwrap();

        assert_eq!(report.created.len(), files.len());
        assert!(report.skipped.is_empty());
        assert!(dir.path().join("src/index.js").exists());
        let manifest = std::fs::read_to_string(dir.path().join("package.json")).unwrap();
        assert!(manifest.contains("\"name\": \"demo\""));
    }

    #[test]
    fn apply_skips_existing_files() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("README.md"), "hands off\n").unwrap();

        let files = plan(ProjectType::Go, "demo");
        let report = apply(dir.path(), &files).unwrap();

        assert_eq!(report.skipped, vec![PathBuf::from("README.md")]);
        assert_eq!(report.created.len(), files.len() - 1);
        let readme = std::fs::read_to_string(dir.path().join("README.md")).unwrap();
        assert_eq!(readme, "hands off\n");
    }

    #[cfg(unix)]
    #[test]
    fn apply_marks_hook_executable() {
        use std::os::unix::fs::PermissionsExt;
        let dir = TempDir::new().unwrap();
        apply(dir.path(), &plan(ProjectType::Python, "demo")).unwrap();
        let mode = std::fs::metadata(dir.path().join(".githooks/pre-commit"))
            .unwrap()
            .permissions()
            .mode();
        assert_ne!(mode & 0o111, 0);
    }
}
