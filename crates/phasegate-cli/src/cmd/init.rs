use crate::output::print_json;
use phasegate_core::orchestrator::Orchestrator;
use phasegate_core::types::{Phase, ProjectType};
use std::path::Path;

pub fn run(
    root: &Path,
    project_name: &str,
    force: bool,
    template: Option<ProjectType>,
    json: bool,
) -> anyhow::Result<()> {
    let orch = Orchestrator::open(root)?;
    let outcome = orch.initialize(project_name, force, template)?;

    if json {
        return print_json(&outcome.state);
    }

    println!("Initialized phase tracking in: {}", root.display());
    println!("  project: {}", outcome.state.project_name);
    println!("  created: .sdlc/state.json");
    println!("  created: .sdlc/gates.yaml");
    println!(
        "  created: .sdlc/phases/ ({} checklists)",
        Phase::all().len()
    );
    if let Some(report) = &outcome.scaffold {
        for path in &report.created {
            println!("  created: {}", path.display());
        }
        for path in &report.skipped {
            println!("  exists:  {}", path.display());
        }
    }
    println!();
    println!("Current phase: {}", outcome.state.current_phase);
    println!("Next: `phasegate gate` to see the exit criteria for requirements");
    Ok(())
}
