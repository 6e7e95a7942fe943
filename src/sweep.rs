//! Runs a plan's steps in order against one [`ResultStore`].

use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use rayon::prelude::*;

use crate::cleaner::{CleanCounts, DirectoryCleaner, FileSystem, StdFileSystem};
use crate::command::{self, CommandRunner};
use crate::plan::{CleanTarget, Plan, Step};
use crate::results::ResultStore;
use crate::utils;

/// What happened to one clean target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSummary {
    pub category: String,
    /// `None` when the path could not be resolved and the target was skipped.
    pub path: Option<PathBuf>,
    pub counts: CleanCounts,
}

#[derive(Debug, Default)]
pub struct SweepSummary {
    pub targets: Vec<TargetSummary>,
    pub commands_succeeded: usize,
    pub commands_failed: usize,
}

impl SweepSummary {
    pub fn totals(&self) -> CleanCounts {
        let mut total = CleanCounts::default();
        for target in &self.targets {
            total += target.counts;
        }
        total
    }

    pub fn skipped(&self) -> usize {
        self.targets.iter().filter(|t| t.path.is_none()).count()
    }
}

/// Dry-run view of one clean target.
#[derive(Debug, Clone)]
pub struct ScanEntry {
    pub category: String,
    pub path: Option<PathBuf>,
    pub entries: usize,
    pub size_bytes: u64,
}

pub struct Sweep<'a, F = StdFileSystem> {
    cleaner: DirectoryCleaner<F>,
    runner: &'a dyn CommandRunner,
    parallel: bool,
}

impl<'a> Sweep<'a, StdFileSystem> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self::with_cleaner(DirectoryCleaner::new(), runner)
    }
}

impl<'a, F: FileSystem + Sync> Sweep<'a, F> {
    pub fn with_cleaner(cleaner: DirectoryCleaner<F>, runner: &'a dyn CommandRunner) -> Self {
        Self {
            cleaner,
            runner,
            parallel: false,
        }
    }

    /// Clean consecutive targets concurrently. Command steps still run alone,
    /// after every earlier target and before every later one.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn run(&self, steps: &[Step], store: &mut ResultStore) -> SweepSummary {
        let mut summary = SweepSummary::default();
        let mut batch: Vec<&CleanTarget> = Vec::new();

        for step in steps {
            match step {
                Step::Clean(target) => batch.push(target),
                Step::Command(cmd) => {
                    self.flush(&mut batch, store, &mut summary);
                    if command::run_step(self.runner, cmd, store) {
                        summary.commands_succeeded += 1;
                    } else {
                        summary.commands_failed += 1;
                    }
                }
            }
        }
        self.flush(&mut batch, store, &mut summary);

        let totals = summary.totals();
        info!(
            "Sweep finished: {} removed, {} failed, {} targets skipped",
            totals.removed,
            totals.failed,
            summary.skipped()
        );
        summary
    }

    fn flush(
        &self,
        batch: &mut Vec<&CleanTarget>,
        store: &mut ResultStore,
        summary: &mut SweepSummary,
    ) {
        if batch.is_empty() {
            return;
        }

        if self.parallel && batch.len() > 1 {
            // One store per target, merged back in plan order.
            let cleaner = &self.cleaner;
            for group in independent_groups(batch) {
                let results: Vec<(TargetSummary, ResultStore)> = group
                    .par_iter()
                    .map(|target| {
                        let mut local = ResultStore::new();
                        let target_summary = clean_target(cleaner, target, &mut local);
                        (target_summary, local)
                    })
                    .collect();
                for (target_summary, local) in results {
                    store.merge(local);
                    summary.targets.push(target_summary);
                }
            }
        } else {
            for target in batch.iter() {
                summary
                    .targets
                    .push(clean_target(&self.cleaner, target, store));
            }
        }
        batch.clear();
    }
}

/// Split a batch into consecutive runs in which no resolved path contains or
/// repeats another. Each run is safe to clean concurrently.
fn independent_groups<'t>(batch: &[&'t CleanTarget]) -> Vec<Vec<&'t CleanTarget>> {
    let mut groups = Vec::new();
    let mut current: Vec<&CleanTarget> = Vec::new();
    let mut paths: Vec<PathBuf> = Vec::new();

    for &target in batch {
        if let Some(path) = target.resolve() {
            if paths.iter().any(|seen| nested(seen, &path)) {
                debug!("{} overlaps an earlier target, starting a new batch", path.display());
                groups.push(std::mem::take(&mut current));
                paths.clear();
            }
            paths.push(path);
        }
        current.push(target);
    }
    if !current.is_empty() {
        groups.push(current);
    }
    groups
}

fn nested(a: &Path, b: &Path) -> bool {
    a.starts_with(b) || b.starts_with(a)
}

fn clean_target<F: FileSystem>(
    cleaner: &DirectoryCleaner<F>,
    target: &CleanTarget,
    store: &mut ResultStore,
) -> TargetSummary {
    let Some(path) = target.resolve() else {
        warn!(
            "Skipping {}: cannot resolve path {}",
            target.category, target.path
        );
        return TargetSummary {
            category: target.category.clone(),
            path: None,
            counts: CleanCounts::default(),
        };
    };

    info!("Cleaning {}: {}", target.category, path.display());
    let counts = if is_leaf_file(&path) {
        cleaner.remove_single_file(&path, store)
    } else {
        cleaner.clean(&path, target.recursive, store)
    };

    TargetSummary {
        category: target.category.clone(),
        path: Some(path),
        counts,
    }
}

/// Anything that exists and does not lead to a directory. Top-level links are
/// followed, so a link to a directory is cleaned through the link.
fn is_leaf_file(path: &Path) -> bool {
    path.symlink_metadata().is_ok() && !path.is_dir()
}

/// Resolve every clean target and measure what it would remove. Deletes
/// nothing and runs no commands.
pub fn scan(plan: &Plan) -> Vec<ScanEntry> {
    plan.clean_targets()
        .map(|target| {
            let path = target.resolve();
            let (entries, size_bytes) = match &path {
                Some(p) if is_leaf_file(p) => (1, p.metadata().map(|m| m.len()).unwrap_or(0)),
                Some(p) if target.recursive => utils::tree_stats(p),
                Some(p) => shallow_stats(p),
                None => (0, 0),
            };
            ScanEntry {
                category: target.category.clone(),
                path,
                entries,
                size_bytes,
            }
        })
        .collect()
}

/// Non-recursive targets only visit immediate children.
fn shallow_stats(path: &Path) -> (usize, u64) {
    match std::fs::read_dir(path) {
        Ok(read_dir) => read_dir.flatten().fold((0, 0), |(count, bytes), entry| {
            let size = entry
                .metadata()
                .ok()
                .filter(|m| m.is_file())
                .map(|m| m.len())
                .unwrap_or(0);
            (count + 1, bytes + size)
        }),
        Err(_) => (0, 0),
    }
}
