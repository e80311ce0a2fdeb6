//! Registry engine error types with clear, actionable messages

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, resolving or installing registry items
#[derive(Error, Debug)]
pub enum RegistryError {
    /// A requested or transitively required item is not in the registry
    #[error("Unknown item: \"{0}\" was not found in the registry.\n\nRun `compkit list` to see available items.")]
    UnknownItem(String),

    /// The registry dependency graph contains a cycle
    #[error("Cyclic registry dependency detected: {cycle}")]
    CyclicDependency { cycle: String },

    /// Two catalog entries share a name
    #[error("Duplicate registry item: \"{0}\" is declared more than once")]
    DuplicateItem(String),

    /// A catalog entry declares no files
    #[error("Registry item \"{0}\" declares no files")]
    EmptyItem(String),

    /// A file target has no file name (empty or ends in `/`)
    #[error("Registry item \"{item}\" has a file target without a file name: \"{target}\"")]
    InvalidTarget { item: String, target: String },

    /// A catalog entry lists itself as a registry dependency
    #[error("Registry item \"{0}\" depends on itself")]
    SelfDependency(String),

    /// Failed to read registry data from disk
    #[error("Failed to read registry from {path}")]
    RegistryLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Registry data is not valid item JSON
    #[error("Failed to parse registry data from {origin}")]
    RegistryParse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    /// The project has not been initialized
    #[error("Configuration file not found: {path}\n\nRun `compkit init` to create one.")]
    ConfigMissing { path: PathBuf },

    /// The project configuration exists but cannot be used
    #[error("Invalid configuration in {path}: {reason}\n\nFix the file or re-create it with `compkit init --force`.")]
    ConfigInvalid { path: PathBuf, reason: String },

    /// `init` would replace an existing configuration
    #[error("Configuration file already exists: {path}\n\nUse `compkit init --force` to overwrite it.")]
    ConfigExists { path: PathBuf },

    /// Failed to write the project configuration
    #[error("Failed to write configuration to {path}")]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A planned file could not be written
    #[error(transparent)]
    FileWrite(#[from] FileWriteError),

    /// The external package manager failed
    #[error("Failed to install packages with `{command}`: {reason}")]
    PackageInstall { command: String, reason: String },
}

/// A single failed file write; collected rather than aborting the batch
#[derive(Error, Debug)]
#[error("Failed to write {path}")]
pub struct FileWriteError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

pub type Result<T> = std::result::Result<T, RegistryError>;
