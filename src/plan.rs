//! Cleanup plan: the ordered list of targets and command steps for one run.

use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::utils;

#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("failed to read plan {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to parse plan: {0}")]
    Parse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, PlanError>;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Plan {
    /// Where the report goes. Defaults to the working directory.
    #[serde(default)]
    pub report_dir: Option<PathBuf>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Step {
    Clean(CleanTarget),
    Command(CommandStep),
}

/// A `(category, path, recursive)` target as written in the plan.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CleanTarget {
    pub category: String,
    pub path: String,
    #[serde(default = "default_recursive")]
    pub recursive: bool,
}

/// External command run through a [`crate::command::CommandRunner`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommandStep {
    pub category: String,
    pub description: String,
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

fn default_recursive() -> bool {
    true
}

impl CleanTarget {
    /// The target path with `~` and environment variables expanded.
    pub fn resolve(&self) -> Option<PathBuf> {
        utils::expand_path(&self.path)
    }
}

impl Plan {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| PlanError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        content.parse()
    }

    pub fn clean_targets(&self) -> impl Iterator<Item = &CleanTarget> {
        self.steps.iter().filter_map(|step| match step {
            Step::Clean(target) => Some(target),
            Step::Command(_) => None,
        })
    }
}

impl std::str::FromStr for Plan {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }
}
