use crate::cmd::gate::print_gate_report;
use crate::output::print_json;
use phasegate_core::orchestrator::Orchestrator;
use phasegate_core::types::Phase;
use phasegate_core::PhasegateError;
use std::path::Path;

pub fn run(root: &Path, phase: Option<Phase>, json: bool) -> anyhow::Result<()> {
    let orch = Orchestrator::open(root)?;
    match orch.advance(phase) {
        Ok(outcome) => {
            if json {
                return print_json(&outcome);
            }
            println!("Phase complete: {}", outcome.completed);
            match outcome.next {
                Some(next) => println!("Now in: {next}"),
                None => {
                    println!("All seven phases are complete for this iteration.");
                    println!("Run `phasegate next-iteration` to feed monitoring back into requirements.");
                }
            }
            Ok(())
        }
        // Show the full criterion breakdown, then fail with the same error
        // so the exit code still says "gate not satisfied".
        Err(PhasegateError::GateNotSatisfied(gate)) => {
            if json {
                print_json(&gate)?;
            } else {
                print_gate_report(&gate);
            }
            Err(PhasegateError::GateNotSatisfied(gate).into())
        }
        Err(e) => Err(e.into()),
    }
}
