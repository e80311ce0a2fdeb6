//! Installation of resolved items into a project
//!
//! Installation is validate-then-act: names are resolved (and may fail)
//! before anything is planned, the plan is computed without touching the
//! disk, and only then are files written. Writes are best-effort: one
//! failing file is recorded and the remaining files are still attempted.

use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::config::ProjectConfig;
use crate::error::{FileWriteError, Result};
use crate::fs::ProjectFs;
use crate::packages;
use crate::paths;
use crate::registry::{RegistryItem, RegistryStore};
use crate::resolver::{collect_dependencies, resolve};
use crate::transform::transform;

/// Per-item decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallAction {
    Write,
    /// Primary file already present and overwrite not requested
    SkipAlreadyExists,
}

/// A file ready to be written: destination and transformed content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    pub target: String,
    /// Project-relative destination
    pub path: PathBuf,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct ItemDecision<'a> {
    pub item: &'a RegistryItem,
    pub action: InstallAction,
    pub files: Vec<PlannedFile>,
}

/// What `execute` will do, in install order
#[derive(Debug, Clone, Default)]
pub struct InstallPlan<'a> {
    pub items: Vec<ItemDecision<'a>>,
    /// External packages needed by the items being written
    pub dependencies: Vec<String>,
}

impl<'a> InstallPlan<'a> {
    pub fn to_write(&self) -> impl Iterator<Item = &ItemDecision<'a>> {
        self.items
            .iter()
            .filter(|d| d.action == InstallAction::Write)
    }

    pub fn skipped(&self) -> impl Iterator<Item = &ItemDecision<'a>> {
        self.items
            .iter()
            .filter(|d| d.action == InstallAction::SkipAlreadyExists)
    }

    /// Number of files that `execute` will attempt
    pub fn file_count(&self) -> usize {
        self.to_write().map(|d| d.files.len()).sum()
    }

    /// Nothing to write
    pub fn is_empty(&self) -> bool {
        self.to_write().next().is_none()
    }
}

/// Decide, per item, whether to install it, and prepare its files
///
/// Only an item's first declared file is checked: if it exists and
/// `overwrite` is false, the whole item is skipped.
pub fn plan<'a>(
    resolved: &[&'a RegistryItem],
    config: &ProjectConfig,
    fs: &dyn ProjectFs,
    overwrite: bool,
) -> InstallPlan<'a> {
    let mut items = Vec::with_capacity(resolved.len());

    for &item in resolved {
        let files: Vec<PlannedFile> = item
            .files
            .iter()
            .map(|file| PlannedFile {
                target: file.target.clone(),
                path: paths::target_path(item.kind, &file.target, config),
                content: transform(&file.content, config),
            })
            .collect();

        let first_path = item
            .primary_file()
            .map(|file| paths::target_path(item.kind, &file.target, config));
        let action = match first_path.filter(|path| fs.exists(path)) {
            Some(path) if !overwrite => {
                debug!("Skipping {}: {} exists", item.name, path.display());
                InstallAction::SkipAlreadyExists
            }
            _ => InstallAction::Write,
        };

        items.push(ItemDecision {
            item,
            action,
            files,
        });
    }

    let writing: Vec<&RegistryItem> = items
        .iter()
        .filter(|d| d.action == InstallAction::Write)
        .map(|d| d.item)
        .collect();
    let dependencies = collect_dependencies(&writing);

    InstallPlan {
        items,
        dependencies,
    }
}

/// Result of executing a plan
#[derive(Debug, Default)]
pub struct InstallReport {
    /// Project-relative paths written successfully
    pub written: Vec<PathBuf>,
    pub failures: Vec<FileWriteError>,
}

impl InstallReport {
    pub fn written_count(&self) -> usize {
        self.written.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failures.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Write every file of every `Write` item, creating directories first
pub fn execute(plan: &InstallPlan<'_>, fs: &dyn ProjectFs) -> InstallReport {
    let mut report = InstallReport::default();

    for decision in plan.to_write() {
        for file in &decision.files {
            let result = match file.path.parent() {
                Some(dir) if !dir.as_os_str().is_empty() => fs.create_dir_all(dir),
                _ => Ok(()),
            }
            .and_then(|()| fs.write(&file.path, &file.content));

            match result {
                Ok(()) => {
                    debug!("Wrote {}", file.path.display());
                    report.written.push(file.path.clone());
                }
                Err(source) => {
                    warn!("Failed to write {}: {}", file.path.display(), source);
                    report.failures.push(FileWriteError {
                        path: file.path.clone(),
                        source,
                    });
                }
            }
        }
    }

    info!(
        "Wrote {} file(s), {} failed",
        report.written_count(),
        report.failed_count()
    );
    report
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AddOptions {
    /// Replace items whose files already exist
    pub overwrite: bool,
}

/// Everything `add` did
#[derive(Debug)]
pub struct AddOutcome<'a> {
    pub plan: InstallPlan<'a>,
    pub report: InstallReport,
    /// Planned external packages not yet declared in the project manifest
    pub missing_dependencies: Vec<String>,
}

/// Resolve, plan and write the requested items
///
/// Fails before any file is written when a name (or one of its
/// dependencies) is unknown or the dependency graph has a cycle.
pub fn add<'a, S: AsRef<str>>(
    store: &'a RegistryStore,
    names: &[S],
    config: &ProjectConfig,
    fs: &dyn ProjectFs,
    options: AddOptions,
) -> Result<AddOutcome<'a>> {
    let resolved = resolve(store, names)?;
    let plan = plan(&resolved, config, fs, options.overwrite);

    let report = execute(&plan, fs);
    let missing_dependencies = packages::missing_dependencies(&plan.dependencies, fs);

    Ok(AddOutcome {
        plan,
        report,
        missing_dependencies,
    })
}
