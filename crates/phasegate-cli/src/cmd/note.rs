use crate::output::print_json;
use phasegate_core::orchestrator::Orchestrator;
use phasegate_core::types::Phase;
use std::path::Path;

pub fn run(root: &Path, phase: Phase, text: &str, json: bool) -> anyhow::Result<()> {
    let orch = Orchestrator::open(root)?;
    let added = orch.add_note(phase, text)?;

    if json {
        return print_json(&serde_json::json!({
            "phase": phase,
            "text": text,
            "added": added,
        }));
    }

    if added {
        println!("Noted for {phase}: {text}");
    } else {
        println!("Note already recorded for {phase}.");
    }
    Ok(())
}
