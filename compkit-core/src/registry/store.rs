//! In-memory registry catalog
//!
//! The store is built once per invocation and never mutated afterwards.
//! Item order is the catalog order, which is what `list` shows.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

use super::{ItemKind, RegistryItem};
use crate::error::{RegistryError, Result};

/// Listing file emitted next to per-item files by the registry build
pub const INDEX_FILE: &str = "index.json";

/// Catalog compiled into the binary
const BUILTIN_REGISTRY: &str = include_str!("builtin.json");

/// A registry document (`registry.json`)
#[derive(Debug, Deserialize)]
struct RegistryDocument {
    #[serde(default)]
    #[allow(dead_code)]
    name: Option<String>,
    #[serde(default)]
    #[allow(dead_code)]
    homepage: Option<String>,
    items: Vec<RegistryItem>,
}

/// Immutable catalog of registry items, keyed by name
#[derive(Debug, Clone)]
pub struct RegistryStore {
    items: Vec<RegistryItem>,
    by_name: HashMap<String, usize>,
}

impl RegistryStore {
    /// Build a store, rejecting duplicate names, empty items, self-dependencies
    /// and targets that do not end in a file name
    pub fn new(items: Vec<RegistryItem>) -> Result<Self> {
        let mut by_name = HashMap::with_capacity(items.len());

        for (idx, item) in items.iter().enumerate() {
            if item.files.is_empty() {
                return Err(RegistryError::EmptyItem(item.name.clone()));
            }
            if let Some(file) = item
                .files
                .iter()
                .find(|f| f.target.is_empty() || f.target.ends_with('/'))
            {
                return Err(RegistryError::InvalidTarget {
                    item: item.name.clone(),
                    target: file.target.clone(),
                });
            }
            if item.registry_dependencies.contains(&item.name) {
                return Err(RegistryError::SelfDependency(item.name.clone()));
            }
            if by_name.insert(item.name.clone(), idx).is_some() {
                return Err(RegistryError::DuplicateItem(item.name.clone()));
            }
        }

        debug!("Loaded registry with {} items", items.len());
        Ok(Self { items, by_name })
    }

    /// The catalog shipped with compkit
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_REGISTRY, "builtin registry")
    }

    /// Parse a JSON array of items, a registry document, or a single item
    pub fn from_json(content: &str, origin: &str) -> Result<Self> {
        Self::new(parse_items(content, origin)?)
    }

    /// Load from a JSON file or a directory of per-item JSON files
    pub fn load(path: &Path) -> Result<Self> {
        let read = |p: &Path| {
            std::fs::read_to_string(p).map_err(|source| RegistryError::RegistryLoad {
                path: p.to_path_buf(),
                source,
            })
        };

        if !path.is_dir() {
            let content = read(path)?;
            return Self::from_json(&content, &path.display().to_string());
        }

        let mut items = Vec::new();
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry.map_err(|e| RegistryError::RegistryLoad {
                path: path.to_path_buf(),
                source: e.into(),
            })?;
            let file = entry.path();

            if !entry.file_type().is_file()
                || file.extension().and_then(|e| e.to_str()) != Some("json")
                || entry.file_name() == INDEX_FILE
            {
                continue;
            }

            debug!("Reading registry file {}", file.display());
            let content = read(file)?;
            items.extend(parse_items(&content, &file.display().to_string())?);
        }

        Self::new(items)
    }

    /// Look up an item, failing with `UnknownItem` when absent
    pub fn lookup(&self, name: &str) -> Result<&RegistryItem> {
        self.get(name)
            .ok_or_else(|| RegistryError::UnknownItem(name.to_string()))
    }

    pub fn get(&self, name: &str) -> Option<&RegistryItem> {
        self.by_name.get(name).map(|&idx| &self.items[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// All item names in catalog order
    pub fn all_names(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.name.as_str()).collect()
    }

    /// Names of items of one kind, in catalog order
    pub fn names_of_kind(&self, kind: ItemKind) -> Vec<&str> {
        self.items_of_kind(kind)
            .map(|item| item.name.as_str())
            .collect()
    }

    pub fn items_of_kind(&self, kind: ItemKind) -> impl Iterator<Item = &RegistryItem> {
        self.items.iter().filter(move |item| item.kind == kind)
    }

    pub fn items(&self) -> &[RegistryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn parse_items(content: &str, origin: &str) -> Result<Vec<RegistryItem>> {
    let parse_err = |source| RegistryError::RegistryParse {
        origin: origin.to_string(),
        source,
    };

    let value: Value = serde_json::from_str(content).map_err(parse_err)?;

    match value {
        Value::Array(_) => serde_json::from_value(value).map_err(parse_err),
        Value::Object(ref map) if map.contains_key("items") => {
            serde_json::from_value::<RegistryDocument>(value)
                .map(|doc| doc.items)
                .map_err(parse_err)
        }
        _ => serde_json::from_value::<RegistryItem>(value)
            .map(|item| vec![item])
            .map_err(parse_err),
    }
}
