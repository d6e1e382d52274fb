use crate::output::{print_json, print_table};
use chrono::Utc;
use phasegate_core::health;
use phasegate_core::orchestrator::Orchestrator;
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let orch = Orchestrator::open(root)?;
    let state = orch.status()?;
    let rows = health::survey(root, &state)?;
    let score = health::score(&rows);
    let recs = health::recommendations(&state, &rows);

    if json {
        let mut value = serde_json::to_value(&state)?;
        if let Some(obj) = value.as_object_mut() {
            obj.insert("health_score".to_string(), serde_json::json!(score));
            obj.insert("phases".to_string(), serde_json::to_value(&rows)?);
        }
        return print_json(&value);
    }

    println!("\n{}", "=".repeat(60));
    println!("  Health Dashboard: {}", state.project_name);
    println!("{}\n", "=".repeat(60));

    let age_days = Utc::now()
        .signed_duration_since(state.created_at)
        .num_days();
    println!("  Project age: {age_days} days");
    println!("  Iteration: {}", state.iteration);
    println!("  Current phase: {}\n", state.current_phase);

    let table: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            let progress = if row.total > 0 {
                format!("{}/{}", row.checked, row.total)
            } else {
                "N/A".to_string()
            };
            let gate = if row.gate_passed { "✓" } else { "—" };
            let marker = if row.phase == state.current_phase {
                " ←"
            } else {
                ""
            };
            vec![
                row.phase.title().to_string(),
                row.status.to_string(),
                progress,
                format!("{gate}{marker}"),
            ]
        })
        .collect();
    print_table("  ", &["Phase", "Status", "Progress", "Gate"], &table);

    println!("\n  Overall health score: {score:.0}/100");
    if !recs.is_empty() {
        println!("\n  Recommendations:");
        for rec in &recs {
            println!("    • {rec}");
        }
    }
    println!();
    Ok(())
}
