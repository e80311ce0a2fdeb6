//! compkit registry - the catalog of installable items
//!
//! # Overview
//!
//! A registry is a flat, versionless set of named items. Each item is a
//! UI component, a hook or a shared library file, and carries:
//! - the names of other items it needs (`registryDependencies`)
//! - the external packages its code imports (`dependencies`)
//! - one or more file payloads written verbatim into the user's project
//!
//! # Architecture
//!
//! ```text
//! registry.json ──build_registry──▶ public/r/*.json
//!                                          │
//!             builtin.json ────────────────┤
//!                                          ▼
//!                                   RegistryStore           ← immutable, keyed by name
//!                                          │
//!                                          ▼
//!                                   resolver::resolve       ← dependency-closed install order
//!                                          │
//!                                          ▼
//!                                   installer::plan/execute ← files under the project's aliases
//! ```

mod build;
mod item;
mod store;

pub use build::{build_registry, BuildReport, OUTPUT_DIR, SOURCE_FILE};
pub use item::{ItemKind, RegistryFile, RegistryItem};
pub use store::{RegistryStore, INDEX_FILE};
