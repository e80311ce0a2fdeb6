//! External package installation
//!
//! Registry items name the npm packages their code imports. The engine only
//! produces the list of packages still missing from the project's
//! `package.json`; installing them is delegated to the project's package
//! manager through `PackageInstaller`.

use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

use crate::error::{RegistryError, Result};
use crate::fs::ProjectFs;

/// Host project dependency manifest
pub const PACKAGE_MANIFEST: &str = "package.json";

/// Package managers recognised by their lock files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Pnpm,
    Yarn,
    Npm,
}

impl PackageManager {
    /// Detect from lock files, falling back to npm
    pub fn detect(fs: &dyn ProjectFs) -> Self {
        if fs.exists(Path::new("pnpm-lock.yaml")) {
            PackageManager::Pnpm
        } else if fs.exists(Path::new("yarn.lock")) {
            PackageManager::Yarn
        } else {
            PackageManager::Npm
        }
    }

    pub fn program(&self) -> &'static str {
        match self {
            PackageManager::Pnpm => "pnpm",
            PackageManager::Yarn => "yarn",
            PackageManager::Npm => "npm",
        }
    }

    fn add_verb(&self) -> &'static str {
        match self {
            PackageManager::Pnpm | PackageManager::Yarn => "add",
            PackageManager::Npm => "install",
        }
    }

    /// Command that runs a package binary without installing it
    pub fn runner(&self) -> &'static str {
        match self {
            PackageManager::Pnpm => "pnpm dlx",
            PackageManager::Yarn => "yarn dlx",
            PackageManager::Npm => "npx",
        }
    }

    /// Full install command line, or `None` when there is nothing to install
    pub fn install_command(&self, packages: &[String]) -> Option<Vec<String>> {
        if packages.is_empty() {
            return None;
        }

        let mut command = vec![self.program().to_string(), self.add_verb().to_string()];
        command.extend(packages.iter().cloned());
        Some(command)
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

/// Packages declared in `dependencies` or `devDependencies` of the manifest
///
/// A missing or unreadable manifest declares nothing.
pub fn declared_packages(fs: &dyn ProjectFs) -> HashSet<String> {
    let manifest = Path::new(PACKAGE_MANIFEST);
    if !fs.exists(manifest) {
        return HashSet::new();
    }

    let parsed = fs
        .read_to_string(manifest)
        .ok()
        .and_then(|content| serde_json::from_str::<Value>(&content).ok());

    let Some(manifest) = parsed else {
        debug!("Ignoring unreadable {}", PACKAGE_MANIFEST);
        return HashSet::new();
    };

    ["dependencies", "devDependencies"]
        .iter()
        .filter_map(|section| manifest.get(section).and_then(Value::as_object))
        .flat_map(|deps| deps.keys().cloned())
        .collect()
}

/// `packages` minus those the manifest already declares, order preserved
pub fn missing_dependencies(packages: &[String], fs: &dyn ProjectFs) -> Vec<String> {
    let declared = declared_packages(fs);
    packages
        .iter()
        .filter(|p| !declared.contains(p.as_str()))
        .cloned()
        .collect()
}

/// Installs external packages into the project
pub trait PackageInstaller {
    fn install(&self, packages: &[String]) -> Result<()>;
}

/// Runs the package manager as a blocking subprocess in the project root
#[derive(Debug, Clone)]
pub struct CommandInstaller {
    root: PathBuf,
    manager: PackageManager,
}

impl CommandInstaller {
    pub fn new(root: impl Into<PathBuf>, manager: PackageManager) -> Self {
        Self {
            root: root.into(),
            manager,
        }
    }
}

impl PackageInstaller for CommandInstaller {
    fn install(&self, packages: &[String]) -> Result<()> {
        let Some(command) = self.manager.install_command(packages) else {
            return Ok(());
        };
        let command_line = command.join(" ");

        info!("Running `{}` in {}", command_line, self.root.display());

        let output = Command::new(&command[0])
            .args(&command[1..])
            .current_dir(&self.root)
            .output()
            .map_err(|e| RegistryError::PackageInstall {
                command: command_line.clone(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RegistryError::PackageInstall {
                command: command_line,
                reason: format!("exited with {}: {}", output.status, stderr.trim()),
            });
        }

        Ok(())
    }
}
