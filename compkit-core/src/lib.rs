//! compkit core library
//!
//! Resolves registry items into a dependency-complete install order, writes
//! their files under the project's configured aliases, and compares
//! installed files against the registry.

pub mod config;
pub mod diff;
pub mod error;
pub mod fs;
pub mod init;
pub mod installer;
pub mod packages;
pub mod paths;
pub mod registry;
pub mod resolver;
pub mod transform;

pub use config::{Aliases, ProjectConfig};
pub use error::{FileWriteError, RegistryError, Result};
pub use registry::{ItemKind, RegistryFile, RegistryItem, RegistryStore};
