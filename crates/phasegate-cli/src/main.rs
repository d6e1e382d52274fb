mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use phasegate_core::types::{Phase, ProjectType};
use phasegate_core::PhasegateError;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "phasegate",
    about = "Phase-gate SDLC orchestrator — advance through seven phases behind explicit exit criteria",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .sdlc/ or .git/)
    #[arg(long, global = true, env = "PHASEGATE_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize phase tracking in the current project
    Init {
        /// Project display name
        #[arg(long)]
        project_name: String,

        /// Replace existing tracking files with a pristine copy
        #[arg(long)]
        force: bool,

        /// Also scaffold starter files for this project type
        #[arg(long)]
        template: Option<ProjectType>,
    },

    /// Evaluate the exit criteria guarding a phase
    Gate {
        /// Phase to check (default: current phase)
        #[arg(long)]
        phase: Option<Phase>,

        /// Check every phase
        #[arg(long, conflicts_with = "phase")]
        all: bool,
    },

    /// Close the current phase through its gate and enter the next
    Advance {
        /// Phase expected to be current (guards scripted callers against drift)
        #[arg(long)]
        phase: Option<Phase>,
    },

    /// Set the current phase directly (administrative override)
    JumpTo {
        /// Target phase
        #[arg(long)]
        phase: Phase,

        /// Skip the completed-predecessors check (recorded in history)
        #[arg(long)]
        force: bool,
    },

    /// Show the project health dashboard
    Status,

    /// Record a note on a phase (sign-offs, verification evidence)
    Note {
        /// Phase the note belongs to
        #[arg(long)]
        phase: Phase,

        /// Note text
        text: String,
    },

    /// Start the next iteration once monitoring is complete
    NextIteration,

    /// Write starter files for a project type
    Scaffold {
        /// Project type
        #[arg(long = "type")]
        project_type: ProjectType,

        /// Name used in templates (default: the tracked project name)
        #[arg(long)]
        name: Option<String>,
    },
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // clap routes --help/--version through the error path; those
            // exit 0, genuine usage errors exit 3.
            let code = match e.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => 0,
                _ => 3,
            };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init {
            project_name,
            force,
            template,
        } => cmd::init::run(&root, &project_name, force, template, cli.json),
        Commands::Gate { phase, all } => cmd::gate::run(&root, phase, all, cli.json),
        Commands::Advance { phase } => cmd::advance::run(&root, phase, cli.json),
        Commands::JumpTo { phase, force } => cmd::jump::run(&root, phase, force, cli.json),
        Commands::Status => cmd::status::run(&root, cli.json),
        Commands::Note { phase, text } => cmd::note::run(&root, phase, &text, cli.json),
        Commands::NextIteration => cmd::iterate::run(&root, cli.json),
        Commands::Scaffold { project_type, name } => {
            cmd::scaffold::run(&root, project_type, name.as_deref(), cli.json)
        }
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        let code = e
            .downcast_ref::<PhasegateError>()
            .map(PhasegateError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}
