use crate::output::print_json;
use phasegate_core::orchestrator::Orchestrator;
use phasegate_core::scaffold;
use phasegate_core::types::ProjectType;
use phasegate_core::PhasegateError;
use std::path::Path;

/// Scaffolding works with or without phase tracking: the name falls back
/// to the tracked project name, then to the directory name.
pub fn run(
    root: &Path,
    project_type: ProjectType,
    name: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let name = match name {
        Some(n) => n.to_string(),
        None => {
            let orch = Orchestrator::open(root)?;
            match orch.status() {
                Ok(state) => state.project_name,
                Err(PhasegateError::NotInitialized) => root
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "project".to_string()),
                Err(e) => return Err(e.into()),
            }
        }
    };

    let plan = scaffold::plan(project_type, &name);
    let report = scaffold::apply(root, &plan)?;

    if json {
        return print_json(&serde_json::json!({
            "project_type": project_type,
            "name": name,
            "created": report.created,
            "skipped": report.skipped,
        }));
    }

    println!("Scaffolded {project_type} project: {name}");
    for path in &report.created {
        println!("  created: {}", path.display());
    }
    for path in &report.skipped {
        println!("  exists:  {}", path.display());
    }
    Ok(())
}
