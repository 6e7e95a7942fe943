//! tidysweep - remove log and cache trees listed in a plan and report every attempt.
//!
//! A run walks the plan's steps in order. Each clean target is emptied by a
//! [`DirectoryCleaner`], which records one [`Outcome`] per entry into a
//! [`ResultStore`] owned by the run. Command steps go through an injected
//! [`CommandRunner`]. At the end the store is written out once by a
//! [`ReportWriter`].

pub mod cleaner;
pub mod cli;
pub mod command;
pub mod output;
pub mod plan;
pub mod report;
pub mod results;
pub mod sweep;
pub mod utils;

pub use cleaner::{CleanCounts, DirectoryCleaner, FileSystem, StdFileSystem};
pub use command::{CommandRunner, SystemCommandRunner};
pub use plan::{CleanTarget, CommandStep, Plan, PlanError, Step};
pub use report::{ReportError, ReportWriter};
pub use results::{Outcome, ResultStore};
pub use sweep::{Sweep, SweepSummary};
