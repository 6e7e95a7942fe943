//! CLI definitions and command dispatch.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};

use crate::command::SystemCommandRunner;
use crate::output;
use crate::plan::Plan;
use crate::report::ReportWriter;
use crate::results::ResultStore;
use crate::sweep::{self, Sweep};

#[derive(Parser)]
#[command(
    name = "tidysweep",
    about = "Sweep log and cache directories listed in a plan and write a cleanup report",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show what a plan would remove (dry-run, no deletion)
    Scan {
        /// TOML plan listing targets and commands
        plan: PathBuf,
    },

    /// Run a plan (requires --confirm to actually delete)
    Clean {
        /// TOML plan listing targets and commands
        plan: PathBuf,

        /// Actually delete files and run commands. Without this flag, behaves like scan.
        #[arg(long)]
        confirm: bool,

        /// Clean consecutive targets concurrently
        #[arg(long)]
        parallel: bool,

        /// Directory for the report file (overrides the plan's report_dir)
        #[arg(long)]
        report_dir: Option<PathBuf>,
    },
}

impl Command {
    pub fn run(self) -> Result<()> {
        match self {
            Command::Scan { plan } => {
                let plan = load(&plan)?;
                output::print_banner();
                output::print_scan(&sweep::scan(&plan));
            }
            Command::Clean {
                plan,
                confirm,
                parallel,
                report_dir,
            } => {
                let plan = load(&plan)?;
                output::print_banner();
                if !confirm {
                    output::print_no_confirm_warning();
                    output::print_scan(&sweep::scan(&plan));
                    output::print_dry_run_footer();
                    return Ok(());
                }
                clean(plan, parallel, report_dir)?;
            }
        }
        Ok(())
    }
}

fn load(path: &Path) -> Result<Plan> {
    Plan::load(path).with_context(|| format!("cannot load plan {}", path.display()))
}

fn clean(plan: Plan, parallel: bool, report_dir: Option<PathBuf>) -> Result<()> {
    let runner = SystemCommandRunner;
    let mut store = ResultStore::new();
    let summary = Sweep::new(&runner)
        .parallel(parallel)
        .run(&plan.steps, &mut store);
    output::print_sweep(&summary);

    let dir = report_dir
        .or(plan.report_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    let captured_at = Local::now().naive_local();
    let path = ReportWriter::new(dir)
        .write(&store, &captured_at)
        .context("cleanup finished but the report could not be saved")?;
    output::print_report_saved(&path);
    Ok(())
}
