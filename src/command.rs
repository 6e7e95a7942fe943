use std::io;
use std::process::{Command, Stdio};

use log::{debug, info, warn};

use crate::plan::CommandStep;
use crate::results::{Outcome, ResultStore};

/// Runs external programs on behalf of the sweep. The cleaner never does.
pub trait CommandRunner {
    /// Run `program` with `args` to completion. `Ok(None)` means the process
    /// ended without an exit code (killed by a signal).
    fn run(&self, program: &str, args: &[String]) -> io::Result<Option<i32>>;
}

/// Spawns real processes with output discarded.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[String]) -> io::Result<Option<i32>> {
        debug!("Running {program} {args:?}");
        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()?;
        Ok(status.code())
    }
}

/// Run one command step and record it under the step's category.
/// Returns whether it exited with status 0.
pub fn run_step(runner: &dyn CommandRunner, step: &CommandStep, store: &mut ResultStore) -> bool {
    info!("{}...", step.description);
    let outcome = match runner.run(&step.program, &step.args) {
        Ok(Some(0)) => Outcome::success(&step.description),
        Ok(Some(code)) => Outcome::failure(&step.description, format!("exit code: {code}")),
        Ok(None) => Outcome::failure(&step.description, "terminated by signal"),
        Err(e) => Outcome::failure(&step.description, e.to_string()),
    };

    match &outcome.reason {
        None => info!("{} - done", step.description),
        Some(reason) => warn!("{} - failed ({reason})", step.description),
    }
    let succeeded = outcome.succeeded;
    store.push(&step.category, outcome);
    succeeded
}
