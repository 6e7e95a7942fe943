use std::io;
use std::ops::AddAssign;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::results::{Outcome, ResultStore};

/// Entry name recorded when a directory listing yields an entry that cannot be read.
pub const UNREADABLE_ENTRY: &str = "<unreadable entry>";

/// Filesystem operations the cleaner needs.
pub trait FileSystem {
    /// True when something exists at `path`, including dangling symlinks.
    fn exists(&self, path: &Path) -> bool;

    /// Whether `path` is a directory. Symlinks are not followed.
    fn is_dir(&self, path: &Path) -> io::Result<bool>;

    /// Immediate children of `path`. The outer error means the directory
    /// itself could not be listed; inner errors are per-entry.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<io::Result<PathBuf>>>;

    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Remove an empty directory.
    fn remove_dir(&self, path: &Path) -> io::Result<()>;
}

/// `std::fs` backed implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdFileSystem;

impl FileSystem for StdFileSystem {
    fn exists(&self, path: &Path) -> bool {
        std::fs::symlink_metadata(path).is_ok()
    }

    fn is_dir(&self, path: &Path) -> io::Result<bool> {
        Ok(std::fs::symlink_metadata(path)?.file_type().is_dir())
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<io::Result<PathBuf>>> {
        Ok(std::fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect())
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }

    fn remove_dir(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_dir(path)
    }
}

/// Removal tallies for one clean call, nested calls included.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CleanCounts {
    pub removed: usize,
    pub failed: usize,
}

impl AddAssign for CleanCounts {
    fn add_assign(&mut self, rhs: Self) {
        self.removed += rhs.removed;
        self.failed += rhs.failed;
    }
}

/// Walks a directory tree bottom-up, removing every entry and recording one
/// [`Outcome`] per entry under the directory that was being listed.
#[derive(Debug, Default)]
pub struct DirectoryCleaner<F = StdFileSystem> {
    fs: F,
}

impl DirectoryCleaner<StdFileSystem> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<F: FileSystem> DirectoryCleaner<F> {
    pub fn with_fs(fs: F) -> Self {
        Self { fs }
    }

    /// Remove the contents of `path`. `path` itself is left in place.
    ///
    /// With `recursive` set, child directories are emptied first and then
    /// removed. Without it, child directories get a single removal attempt,
    /// which fails when they are not empty.
    ///
    /// A missing `path` is a no-op. A `path` that cannot be listed is logged
    /// and skipped. Failures on individual entries are recorded and never stop
    /// the remaining siblings.
    pub fn clean(&self, path: &Path, recursive: bool, store: &mut ResultStore) -> CleanCounts {
        let mut counts = CleanCounts::default();
        if !self.fs.exists(path) {
            return counts;
        }

        let children = match self.fs.read_dir(path) {
            Ok(children) => children,
            Err(e) => {
                warn!("Cannot read {}: {e}", path.display());
                return counts;
            }
        };

        let category = path.display().to_string();
        for child in children {
            let child = match child {
                Ok(child) => child,
                Err(e) => {
                    counts.failed += 1;
                    store.push(&category, Outcome::failure(UNREADABLE_ENTRY, e.to_string()));
                    continue;
                }
            };

            let removal = match self.fs.is_dir(&child) {
                Ok(true) if recursive => {
                    counts += self.clean(&child, true, store);
                    self.fs.remove_dir(&child)
                }
                Ok(true) => self.fs.remove_dir(&child),
                Ok(false) => self.fs.remove_file(&child),
                Err(e) => Err(e),
            };
            record(store, &category, &child, removal, &mut counts);
        }

        info!(
            "Cleaned {category}: {} removed, {} failed",
            counts.removed, counts.failed
        );
        counts
    }

    /// Remove one file known to be a leaf. Recorded under its parent directory.
    pub fn remove_single_file(&self, path: &Path, store: &mut ResultStore) -> CleanCounts {
        let mut counts = CleanCounts::default();
        if !self.fs.exists(path) {
            return counts;
        }

        let category = path
            .parent()
            .map(|parent| parent.display().to_string())
            .unwrap_or_default();
        let removal = self.fs.remove_file(path);
        record(store, &category, path, removal, &mut counts);
        counts
    }
}

fn record(
    store: &mut ResultStore,
    category: &str,
    path: &Path,
    removal: io::Result<()>,
    counts: &mut CleanCounts,
) {
    let name = entry_name(path);
    match removal {
        Ok(()) => {
            debug!("Removed {}", path.display());
            counts.removed += 1;
            store.push(category, Outcome::success(name));
        }
        Err(e) => {
            debug!("Failed to remove {}: {e}", path.display());
            counts.failed += 1;
            store.push(category, Outcome::failure(name, e.to_string()));
        }
    }
}

fn entry_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
