use crate::output::print_json;
use phasegate_core::gate::GateResult;
use phasegate_core::orchestrator::Orchestrator;
use phasegate_core::types::Phase;
use phasegate_core::PhasegateError;
use std::path::Path;

pub fn run(root: &Path, phase: Option<Phase>, all: bool, json: bool) -> anyhow::Result<()> {
    let orch = Orchestrator::open(root)?;
    let results = if all {
        orch.evaluate_all()?
    } else {
        vec![orch.evaluate_gate(phase)?]
    };

    if json {
        if all {
            print_json(&results)?;
        } else {
            print_json(&results[0])?;
        }
    } else {
        for result in &results {
            print_gate_report(result);
        }
    }

    // A failing gate is the expected "not ready yet" answer; report it
    // through the normal error path so scripts can branch on the exit code.
    if let Some(failed) = results.iter().find(|r| !r.passed) {
        return Err(PhasegateError::GateNotSatisfied(Box::new(failed.clone())).into());
    }
    Ok(())
}

pub fn print_gate_report(result: &GateResult) {
    println!("\n{}", "=".repeat(50));
    println!("Phase Gate: {}", result.phase.as_str().to_uppercase());
    println!("{}\n", "=".repeat(50));

    for criterion in &result.criteria {
        let mark = if criterion.passed { "✓" } else { "✗" };
        match &criterion.reason {
            Some(reason) => println!("  {mark} {} ({reason})", criterion.name),
            None => println!("  {mark} {}", criterion.name),
        }
    }

    println!(
        "\n  Result: {}/{} criteria met",
        result.met(),
        result.criteria.len()
    );
    if result.passed {
        println!("  Status: PASSED");
        if let Some(next) = result.phase.next() {
            println!("\n  Ready to advance to: {next}");
        }
    } else {
        println!("  Status: BLOCKED");
        let failing = result.criteria.len() - result.met();
        println!("\n  Fix the {failing} failing criteria before advancing.");
    }
    println!();
}
