//! Comparison of installed files against the registry
//!
//! The line matcher is a greedy heuristic, not a minimal edit script: when
//! two lines differ, the only lookahead is whether a line shows up again in
//! the rest of the other text. Repeated lines are matched greedily too.

use std::fmt;
use std::path::PathBuf;

use crate::config::ProjectConfig;
use crate::fs::ProjectFs;
use crate::paths;
use crate::registry::{RegistryItem, RegistryStore};
use crate::transform::transform;

/// Which side of the comparison a line belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTag {
    Unchanged,
    OnlyInRegistry,
    OnlyInLocal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub tag: LineTag,
    pub text: String,
}

impl DiffLine {
    fn new(tag: LineTag, text: &str) -> Self {
        Self {
            tag,
            text: text.to_string(),
        }
    }
}

/// Tagged lines reconstructing both texts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffReport {
    pub lines: Vec<DiffLine>,
}

impl DiffReport {
    pub fn has_changes(&self) -> bool {
        self.lines.iter().any(|l| l.tag != LineTag::Unchanged)
    }

    /// Only the lines present on one side
    pub fn changes(&self) -> impl Iterator<Item = &DiffLine> {
        self.lines.iter().filter(|l| l.tag != LineTag::Unchanged)
    }

    pub fn count(&self, tag: LineTag) -> usize {
        self.lines.iter().filter(|l| l.tag == tag).count()
    }
}

impl fmt::Display for DiffReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            let marker = match line.tag {
                LineTag::Unchanged => ' ',
                LineTag::OnlyInRegistry => '+',
                LineTag::OnlyInLocal => '-',
            };
            writeln!(f, "{marker} {}", line.text)?;
        }
        Ok(())
    }
}

/// Compare local file text with (transformed) registry text, line by line
pub fn diff_lines(local: &str, registry: &str) -> DiffReport {
    let local: Vec<&str> = local.split('\n').collect();
    let registry: Vec<&str> = registry.split('\n').collect();
    let mut lines = Vec::with_capacity(local.len().max(registry.len()));

    let (mut i, mut j) = (0, 0);
    while i < local.len() || j < registry.len() {
        let l = local.get(i).copied();
        let r = registry.get(j).copied();

        match (l, r) {
            (Some(l), Some(r)) if l == r => {
                lines.push(DiffLine::new(LineTag::Unchanged, l));
                i += 1;
                j += 1;
            }
            // Local line comes back later in the registry: registry lines were added
            (Some(l), Some(r)) if registry[j..].contains(&l) => {
                lines.push(DiffLine::new(LineTag::OnlyInRegistry, r));
                j += 1;
            }
            // Registry line comes back later locally: local lines were added
            (Some(l), Some(r)) if local[i..].contains(&r) => {
                lines.push(DiffLine::new(LineTag::OnlyInLocal, l));
                i += 1;
            }
            (Some(l), Some(r)) => {
                lines.push(DiffLine::new(LineTag::OnlyInLocal, l));
                lines.push(DiffLine::new(LineTag::OnlyInRegistry, r));
                i += 1;
                j += 1;
            }
            (None, Some(r)) => {
                lines.push(DiffLine::new(LineTag::OnlyInRegistry, r));
                j += 1;
            }
            (Some(l), None) => {
                lines.push(DiffLine::new(LineTag::OnlyInLocal, l));
                i += 1;
            }
            (None, None) => break,
        }
    }

    DiffReport { lines }
}

/// Outcome of comparing one item file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    /// Not present in the project
    Missing,
    UpToDate,
    Changed(DiffReport),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub item: String,
    /// Virtual target inside the registry item
    pub target: String,
    /// Project-relative location
    pub path: PathBuf,
    pub status: FileStatus,
}

/// Compare every file of `item` with its installed copy
pub fn diff_item(
    item: &RegistryItem,
    config: &ProjectConfig,
    fs: &dyn ProjectFs,
) -> std::io::Result<Vec<FileDiff>> {
    let mut diffs = Vec::with_capacity(item.files.len());

    for file in &item.files {
        let path = paths::target_path(item.kind, &file.target, config);

        let status = if !fs.exists(&path) {
            FileStatus::Missing
        } else {
            let local = fs.read_to_string(&path)?;
            let registry = transform(&file.content, config);
            if local == registry {
                FileStatus::UpToDate
            } else {
                FileStatus::Changed(diff_lines(&local, &registry))
            }
        };

        diffs.push(FileDiff {
            item: item.name.clone(),
            target: file.target.clone(),
            path,
            status,
        });
    }

    Ok(diffs)
}

/// Names of registry items with at least one file present in the project
pub fn installed_items<'a>(
    store: &'a RegistryStore,
    config: &ProjectConfig,
    fs: &dyn ProjectFs,
) -> Vec<&'a str> {
    store
        .items()
        .iter()
        .filter(|item| {
            item.files
                .iter()
                .any(|file| fs.exists(&paths::target_path(item.kind, &file.target, config)))
        })
        .map(|item| item.name.as_str())
        .collect()
}
