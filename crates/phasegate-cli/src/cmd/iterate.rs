use crate::output::print_json;
use phasegate_core::orchestrator::Orchestrator;
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let orch = Orchestrator::open(root)?;
    let state = orch.begin_iteration()?;

    if json {
        return print_json(&state);
    }

    println!("Iteration {} started.", state.iteration);
    println!("Current phase: {}", state.current_phase);
    Ok(())
}
