//! Registry build
//!
//! Compiles a source catalog (`registry.json`, whose file entries point at
//! source files by `path`) into the layout `RegistryStore::load` reads: one
//! `<name>.json` per item with the file content inlined, plus an
//! `index.json` listing.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::store::INDEX_FILE;
use super::{ItemKind, RegistryFile, RegistryItem, RegistryStore};
use crate::error::{FileWriteError, RegistryError, Result};

/// Conventional name of the source catalog
pub const SOURCE_FILE: &str = "registry.json";

/// Default output directory, relative to the source catalog
pub const OUTPUT_DIR: &str = "public/r";

#[derive(Debug, Deserialize)]
struct SourceDocument {
    items: Vec<SourceItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SourceItem {
    name: String,
    #[serde(rename = "type")]
    kind: ItemKind,
    #[serde(default)]
    description: String,
    #[serde(default)]
    dependencies: Vec<String>,
    #[serde(default)]
    registry_dependencies: Vec<String>,
    files: Vec<SourceFile>,
}

#[derive(Debug, Deserialize)]
struct SourceFile {
    /// Source file, relative to the catalog's directory
    path: String,
    target: String,
}

/// One line of `index.json`
#[derive(Debug, Serialize)]
struct IndexEntry<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    kind: ItemKind,
    description: &'a str,
}

/// Result of a registry build
#[derive(Debug)]
pub struct BuildReport {
    pub output_dir: PathBuf,
    /// Item names written, in catalog order
    pub items: Vec<String>,
}

/// Build `source` into `output_dir`
///
/// Every source file must exist; the catalog is validated as a whole before
/// anything is written.
pub fn build_registry(source: &Path, output_dir: &Path) -> Result<BuildReport> {
    let content = read(source)?;
    let document: SourceDocument =
        serde_json::from_str(&content).map_err(|e| RegistryError::RegistryParse {
            origin: source.display().to_string(),
            source: e,
        })?;
    let base = source.parent().unwrap_or_else(|| Path::new(""));

    let mut items = Vec::with_capacity(document.items.len());
    for item in document.items {
        let files = item
            .files
            .into_iter()
            .map(|file| -> Result<RegistryFile> {
                let path = base.join(&file.path);
                debug!("Inlining {} as {}", path.display(), file.target);
                Ok(RegistryFile {
                    target: file.target,
                    content: read(&path)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        items.push(RegistryItem {
            name: item.name,
            kind: item.kind,
            description: item.description,
            dependencies: item.dependencies,
            registry_dependencies: item.registry_dependencies,
            files,
        });
    }
    let store = RegistryStore::new(items)?;

    std::fs::create_dir_all(output_dir).map_err(|source| FileWriteError {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let index: Vec<IndexEntry> = store
        .items()
        .iter()
        .map(|item| IndexEntry {
            name: &item.name,
            kind: item.kind,
            description: &item.description,
        })
        .collect();
    write_json(&output_dir.join(INDEX_FILE), &index)?;

    for item in store.items() {
        write_json(&output_dir.join(format!("{}.json", item.name)), item)?;
    }

    info!(
        "Built {} registry items to {}",
        store.len(),
        output_dir.display()
    );
    Ok(BuildReport {
        output_dir: output_dir.to_path_buf(),
        items: store.all_names().into_iter().map(String::from).collect(),
    })
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| RegistryError::RegistryLoad {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let write_err = |source| FileWriteError {
        path: path.to_path_buf(),
        source,
    };

    let mut content =
        serde_json::to_string_pretty(value).map_err(|e| write_err(io::Error::other(e)))?;
    content.push('\n');
    std::fs::write(path, content).map_err(write_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const SOURCE: &str = r#"{
        "name": "test-kit",
        "homepage": "https://example.com",
        "items": [
            {
                "name": "utils",
                "type": "registry:lib",
                "dependencies": ["clsx"],
                "files": [{ "path": "src/lib/utils.ts", "target": "lib/utils.ts" }]
            },
            {
                "name": "button",
                "type": "registry:ui",
                "description": "A button",
                "registryDependencies": ["utils"],
                "files": [{ "path": "src/ui/button.tsx", "target": "ui/button.tsx" }]
            }
        ]
    }"#;

    fn write_sources(root: &Path) {
        std::fs::create_dir_all(root.join("src/lib")).unwrap();
        std::fs::create_dir_all(root.join("src/ui")).unwrap();
        std::fs::write(root.join("src/lib/utils.ts"), "export function cn() {}\n").unwrap();
        std::fs::write(
            root.join("src/ui/button.tsx"),
            "import { cn } from '@/lib/utils'\n",
        )
        .unwrap();
        std::fs::write(root.join(SOURCE_FILE), SOURCE).unwrap();
    }

    #[test]
    fn test_build_output_loads_as_store() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write_sources(root);
        let output = root.join(OUTPUT_DIR);

        let report = build_registry(&root.join(SOURCE_FILE), &output).unwrap();
        assert_eq!(report.items, vec!["utils", "button"]);

        let index: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(output.join("index.json")).unwrap())
                .unwrap();
        assert_eq!(index[1]["name"], "button");
        assert_eq!(index[1]["type"], "registry:ui");
        assert_eq!(index[1]["description"], "A button");

        let store = RegistryStore::load(&output).unwrap();
        assert_eq!(store.len(), 2);
        let button = store.lookup("button").unwrap();
        assert_eq!(button.registry_dependencies, vec!["utils"]);
        assert_eq!(button.files[0].target, "ui/button.tsx");
        assert_eq!(button.files[0].content, "import { cn } from '@/lib/utils'\n");
        assert_eq!(store.lookup("utils").unwrap().dependencies, vec!["clsx"]);
    }

    #[test]
    fn test_missing_source_file_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write_sources(root);
        std::fs::remove_file(root.join("src/ui/button.tsx")).unwrap();
        let output = root.join(OUTPUT_DIR);

        let err = build_registry(&root.join(SOURCE_FILE), &output).unwrap_err();
        assert!(
            matches!(err, RegistryError::RegistryLoad { ref path, .. } if path.ends_with("src/ui/button.tsx"))
        );
        assert!(!output.exists());
    }

    #[test]
    fn test_invalid_catalog_rejected_before_writing() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write_sources(root);
        std::fs::write(
            root.join(SOURCE_FILE),
            SOURCE.replace(r#""registryDependencies": ["utils"]"#, r#""registryDependencies": ["button"]"#),
        )
        .unwrap();
        let output = root.join(OUTPUT_DIR);

        let err = build_registry(&root.join(SOURCE_FILE), &output).unwrap_err();
        assert!(matches!(err, RegistryError::SelfDependency(ref n) if n == "button"));
        assert!(!output.exists());
    }
}
