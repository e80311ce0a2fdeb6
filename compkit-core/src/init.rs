//! Project initialization
//!
//! Writes `components.json`, creates the install directories, drops in
//! the `cn` class-merging helper that every component imports and a
//! Tailwind config carrying the theme tokens the components use.

use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::ProjectConfig;
use crate::error::{FileWriteError, RegistryError, Result};
use crate::fs::{DiskFs, ProjectFs};
use crate::packages;
use crate::paths;
use crate::registry::ItemKind;

/// Packages the `cn` helper and component variants rely on
pub const PEER_DEPENDENCIES: [&str; 3] = ["clsx", "tailwind-merge", "class-variance-authority"];

/// Package that marks the host as a Taro mini-program project
pub const TARO_PACKAGE: &str = "@tarojs/taro";

/// Tailwind config files recognised as already present; the first is written
pub const TAILWIND_CONFIG_FILES: [&str; 2] = ["tailwind.config.ts", "tailwind.config.js"];

const UTILS_CONTENT: &str = r#"import { type ClassValue, clsx } from 'clsx'
import { twMerge } from 'tailwind-merge'

export function cn(...inputs: ClassValue[]) {
  return twMerge(clsx(inputs))
}
"#;

const TAILWIND_CONFIG_CONTENT: &str = include_str!("../templates/tailwind.config.ts");

/// What `initialize` created or left alone; paths are project-relative
#[derive(Debug, Default)]
pub struct InitReport {
    pub config_path: PathBuf,
    pub directories: Vec<PathBuf>,
    /// The utils file, and whether it was written (false: it already existed)
    pub utils_file: (PathBuf, bool),
    /// The Tailwind config, and whether it was written (false: one already existed)
    pub tailwind_config: (PathBuf, bool),
    /// Whether `package.json` declares `@tarojs/taro`
    pub taro_project: bool,
    /// Peer packages not yet declared in `package.json`
    pub missing_dependencies: Vec<String>,
}

/// Initialize `root` with `config`
///
/// Refuses to replace an existing `components.json` unless `force` is set.
/// Existing utils and Tailwind config files are never overwritten.
pub fn initialize(root: &Path, config: &ProjectConfig, force: bool) -> Result<InitReport> {
    let config_file = ProjectConfig::path_in(root);
    if config_file.exists() && !force {
        return Err(RegistryError::ConfigExists { path: config_file });
    }
    config
        .validate()
        .map_err(|reason| RegistryError::ConfigInvalid {
            path: config_file.clone(),
            reason,
        })?;

    let fs = DiskFs::new(root);
    let declared = packages::declared_packages(&fs);
    let taro_project = declared.contains(TARO_PACKAGE);
    if !taro_project {
        warn!("{TARO_PACKAGE} is not declared in package.json");
    }

    config.write(root)?;

    let directories: Vec<PathBuf> = ItemKind::ALL
        .iter()
        .map(|&kind| paths::target_dir(kind, config))
        .collect();
    for dir in &directories {
        create_dir(&fs, dir)?;
    }

    let extension = if config.tsx { "ts" } else { "js" };
    let utils_path = PathBuf::from(format!(
        "{}.{extension}",
        paths::alias_to_path(&config.aliases.utils)
    ));
    let utils_written = write_new(&fs, &utils_path, UTILS_CONTENT)?;

    let tailwind_config = match TAILWIND_CONFIG_FILES
        .iter()
        .map(PathBuf::from)
        .find(|path| fs.exists(path))
    {
        Some(existing) => (existing, false),
        None => {
            let path = PathBuf::from(TAILWIND_CONFIG_FILES[0]);
            write_new(&fs, &path, TAILWIND_CONFIG_CONTENT)?;
            (path, true)
        }
    };

    let missing_dependencies: Vec<String> = PEER_DEPENDENCIES
        .iter()
        .filter(|p| !declared.contains(**p))
        .map(|p| p.to_string())
        .collect();

    info!("Initialized project at {}", root.display());
    Ok(InitReport {
        config_path: PathBuf::from(crate::config::CONFIG_FILE),
        directories,
        utils_file: (utils_path, utils_written),
        tailwind_config,
        taro_project,
        missing_dependencies,
    })
}

/// Write `content` unless the file exists; returns whether it was written
fn write_new(fs: &DiskFs, path: &Path, content: &str) -> Result<bool> {
    if fs.exists(path) {
        return Ok(false);
    }
    if let Some(dir) = path.parent() {
        create_dir(fs, dir)?;
    }
    fs.write(path, content).map_err(|source| FileWriteError {
        path: fs.resolve(path),
        source,
    })?;
    Ok(true)
}

fn create_dir(fs: &DiskFs, dir: &Path) -> Result<()> {
    if dir.as_os_str().is_empty() {
        return Ok(());
    }
    fs.create_dir_all(dir).map_err(|source| {
        FileWriteError {
            path: fs.resolve(dir),
            source,
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_default_layout() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        let report = initialize(root, &ProjectConfig::default(), false).unwrap();

        assert!(root.join("components.json").is_file());
        assert!(root.join("src/components/ui").is_dir());
        assert!(root.join("src/hooks").is_dir());
        assert!(root.join("src/lib").is_dir());
        assert_eq!(report.utils_file, (PathBuf::from("src/lib/utils.ts"), true));
        assert!(std::fs::read_to_string(root.join("src/lib/utils.ts"))
            .unwrap()
            .contains("export function cn"));
        assert_eq!(report.missing_dependencies.len(), 3);
    }

    #[test]
    fn test_existing_config_requires_force() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        initialize(root, &ProjectConfig::default(), false).unwrap();

        let err = initialize(root, &ProjectConfig::default(), false).unwrap_err();
        assert!(err.to_string().contains("--force"));

        let report = initialize(root, &ProjectConfig::default(), true).unwrap();
        assert!(!report.utils_file.1, "existing utils file must be kept");
    }

    #[test]
    fn test_javascript_projects_get_js_utils() {
        let temp_dir = TempDir::new().unwrap();
        let config = ProjectConfig {
            tsx: false,
            ..ProjectConfig::default()
        };

        initialize(temp_dir.path(), &config, false).unwrap();
        assert!(temp_dir.path().join("src/lib/utils.js").is_file());
    }

    #[test]
    fn test_tailwind_config_created_with_theme_tokens() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        let report = initialize(root, &ProjectConfig::default(), false).unwrap();

        assert_eq!(report.tailwind_config, (PathBuf::from("tailwind.config.ts"), true));
        let content = std::fs::read_to_string(root.join("tailwind.config.ts")).unwrap();
        assert!(content.contains("'primary-foreground': '#fafafa'"));
        assert!(content.contains("'slide-in-from-bottom'"));
        assert!(content.contains("borderRadius"));
    }

    #[test]
    fn test_existing_tailwind_config_kept() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        std::fs::write(root.join("tailwind.config.js"), "module.exports = {}\n").unwrap();

        let report = initialize(root, &ProjectConfig::default(), false).unwrap();

        assert_eq!(report.tailwind_config, (PathBuf::from("tailwind.config.js"), false));
        assert!(!root.join("tailwind.config.ts").exists());
        assert_eq!(
            std::fs::read_to_string(root.join("tailwind.config.js")).unwrap(),
            "module.exports = {}\n"
        );
    }

    #[test]
    fn test_taro_project_detection() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        let report = initialize(root, &ProjectConfig::default(), false).unwrap();
        assert!(!report.taro_project);

        std::fs::write(
            root.join("package.json"),
            r#"{ "dependencies": { "@tarojs/taro": "4.0.0", "clsx": "2.1.0" } }"#,
        )
        .unwrap();
        let report = initialize(root, &ProjectConfig::default(), true).unwrap();
        assert!(report.taro_project);
        assert_eq!(
            report.missing_dependencies,
            vec!["tailwind-merge", "class-variance-authority"]
        );
    }

    #[test]
    fn test_overlapping_aliases_rejected_before_writing() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = ProjectConfig::default();
        config.aliases.hooks = "@/lib".to_string();
        config.aliases.utils = "~/u".to_string();

        let err = initialize(temp_dir.path(), &config, false).unwrap_err();
        assert!(matches!(err, RegistryError::ConfigInvalid { .. }));
        assert!(!temp_dir.path().join("components.json").exists());
    }
}
