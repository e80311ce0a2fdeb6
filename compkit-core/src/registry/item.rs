//! Registry item definitions
//!
//! One JSON object per item, as produced by the registry build:
//!
//! ```json
//! {
//!   "name": "dialog",
//!   "type": "registry:ui",
//!   "description": "A modal dialog",
//!   "dependencies": ["clsx"],
//!   "registryDependencies": ["popup"],
//!   "files": [{ "target": "ui/dialog.tsx", "content": "..." }]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// What an item installs as; decides where its files land
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    #[serde(rename = "registry:ui")]
    UiComponent,
    #[serde(rename = "registry:hook")]
    Hook,
    #[serde(rename = "registry:lib")]
    Library,
}

impl ItemKind {
    pub const ALL: [ItemKind; 3] = [ItemKind::UiComponent, ItemKind::Hook, ItemKind::Library];

    /// Registry tag as it appears in item JSON
    pub fn tag(&self) -> &'static str {
        match self {
            ItemKind::UiComponent => "registry:ui",
            ItemKind::Hook => "registry:hook",
            ItemKind::Library => "registry:lib",
        }
    }

    /// Plural heading used when listing items
    pub fn label(&self) -> &'static str {
        match self {
            ItemKind::UiComponent => "Components",
            ItemKind::Hook => "Hooks",
            ItemKind::Library => "Utilities",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A file payload carried by an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryFile {
    /// Catalog-relative virtual path, e.g. `ui/button.tsx`
    pub target: String,

    /// Literal file text with canonical import references
    pub content: String,
}

/// A named, installable unit of the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryItem {
    pub name: String,

    #[serde(rename = "type")]
    pub kind: ItemKind,

    #[serde(default)]
    pub description: String,

    /// External package identifiers needed at runtime
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// Names of other items that must be installed first
    #[serde(default)]
    pub registry_dependencies: Vec<String>,

    pub files: Vec<RegistryFile>,
}

impl RegistryItem {
    /// The file used to decide whether the item is already installed
    pub fn primary_file(&self) -> Option<&RegistryFile> {
        self.files.first()
    }

    /// First line of the description, for compact listings
    pub fn short_description(&self) -> &str {
        self.description.lines().next().unwrap_or("")
    }
}
