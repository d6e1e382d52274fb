use crate::output::print_json;
use phasegate_core::orchestrator::Orchestrator;
use phasegate_core::types::Phase;
use std::path::Path;

pub fn run(root: &Path, phase: Phase, force: bool, json: bool) -> anyhow::Result<()> {
    let orch = Orchestrator::open(root)?;
    let state = orch.jump_to(phase, force)?;

    if json {
        return print_json(&state);
    }

    println!("Current phase: {}", state.current_phase);
    if state.current_record().is_some_and(|r| r.forced) {
        println!("Forced override recorded in phase history.");
    }
    Ok(())
}
