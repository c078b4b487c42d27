mod logging;
mod runner;
mod scenario;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

use crate::runner::{Runner, StepOutcome, StepResult};
use crate::scenario::{load_scenario, PlannedStep};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Municipal infrastructure registry scenario runner.
#[derive(Parser)]
#[command(
    name = "cityledger",
    version,
    about = "Municipal infrastructure registry scenario runner"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Log filter directives (e.g. "debug", "cityledger_core=trace"); overrides RUST_LOG
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a scenario against empty registries and print each outcome
    Run {
        /// Path to the scenario TOML file
        scenario: PathBuf,
        /// Stop at the first rejected step and exit 1
        #[arg(long)]
        fail_fast: bool,
    },

    /// Parse a scenario and resolve callers without running it
    Check {
        /// Path to the scenario TOML file
        scenario: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(msg) = logging::init_logging(cli.log_level.as_deref()) {
        report_error(&msg, cli.output, cli.quiet);
        process::exit(1);
    }

    match cli.command {
        Commands::Run {
            scenario,
            fail_fast,
        } => {
            cmd_run(&scenario, fail_fast, cli.output, cli.quiet);
        }
        Commands::Check { scenario } => {
            cmd_check(&scenario, cli.output, cli.quiet);
        }
    }
}

/// Load and plan a scenario, exiting with status 1 on any error.
fn plan_or_exit(path: &Path, output: OutputFormat, quiet: bool) -> Vec<PlannedStep> {
    let plan = load_scenario(path).and_then(|s| s.plan());
    match plan {
        Ok(plan) => {
            tracing::info!(path = %path.display(), steps = plan.len(), "scenario loaded");
            plan
        }
        Err(e) => {
            report_error(&format!("error: {}", e), output, quiet);
            process::exit(1);
        }
    }
}

fn cmd_run(path: &Path, fail_fast: bool, output: OutputFormat, quiet: bool) {
    let plan = plan_or_exit(path, output, quiet);
    let outcomes = Runner::new().run(&plan, fail_fast);
    let rejected = outcomes.iter().filter(|o| !o.is_ok()).count();

    if !quiet {
        match output {
            OutputFormat::Text => {
                for outcome in &outcomes {
                    println!("{}", format_outcome(outcome));
                }
                println!(
                    "{} steps, {} ok, {} rejected",
                    outcomes.len(),
                    outcomes.len() - rejected,
                    rejected
                );
            }
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "steps": outcomes,
                    "ok": outcomes.len() - rejected,
                    "rejected": rejected,
                });
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json)
                        .unwrap_or_else(|e| format!("serialization error: {}", e))
                );
            }
        }
    }

    if fail_fast && rejected > 0 {
        process::exit(1);
    }
}

fn cmd_check(path: &Path, output: OutputFormat, quiet: bool) {
    let plan = plan_or_exit(path, output, quiet);
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => println!("valid: {} steps", plan.len()),
        OutputFormat::Json => {
            let doc = serde_json::json!({ "valid": true, "steps": plan.len() });
            println!("{}", doc);
        }
    }
}

fn format_outcome(outcome: &StepOutcome) -> String {
    match &outcome.result {
        StepResult::Ok(value) => format!("step {} [{}] ok: {}", outcome.step, outcome.op, value),
        StepResult::Err { code, message } => format!(
            "step {} [{}] err({}): {}",
            outcome.step, outcome.op, code, message
        ),
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}
