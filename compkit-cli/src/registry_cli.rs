//! Registry browsing commands: `list` and `diff`

use anyhow::{Context, Result};
use clap::ValueEnum;
use std::path::Path;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

use compkit_core::diff::{self, FileStatus};
use compkit_core::fs::DiskFs;
use compkit_core::{ItemKind, ProjectConfig};

use crate::load_store;

/// `--kind` values for `list`
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindFilter {
    Ui,
    Hook,
    Lib,
}

impl From<KindFilter> for ItemKind {
    fn from(filter: KindFilter) -> Self {
        match filter {
            KindFilter::Ui => ItemKind::UiComponent,
            KindFilter::Hook => ItemKind::Hook,
            KindFilter::Lib => ItemKind::Library,
        }
    }
}

/// Table row for `list`
#[derive(Tabled)]
struct ItemRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Depends on")]
    depends_on: String,
    #[tabled(rename = "Description")]
    description: String,
}

pub fn list_command(registry: Option<&Path>, kind: Option<KindFilter>, json: bool) -> Result<()> {
    let store = load_store(registry)?;
    let kinds: Vec<ItemKind> = match kind {
        Some(filter) => vec![filter.into()],
        None => ItemKind::ALL.to_vec(),
    };

    if json {
        let items: Vec<serde_json::Value> = kinds
            .iter()
            .flat_map(|&kind| store.items_of_kind(kind))
            .map(|item| {
                serde_json::json!({
                    "name": item.name,
                    "type": item.kind.tag(),
                    "description": item.description,
                    "dependencies": item.dependencies,
                    "registryDependencies": item.registry_dependencies,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    for kind in kinds {
        let rows: Vec<ItemRow> = store
            .items_of_kind(kind)
            .map(|item| {
                let desc = item.short_description();
                let description = if desc.chars().count() > 50 {
                    format!("{}...", desc.chars().take(47).collect::<String>())
                } else {
                    desc.to_string()
                };
                ItemRow {
                    name: item.name.clone(),
                    depends_on: item.registry_dependencies.join(", "),
                    description,
                }
            })
            .collect();
        if rows.is_empty() {
            continue;
        }

        let table = Table::new(&rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()))
            .to_string();

        println!("{} ({}):", kind.label(), rows.len());
        println!("{table}\n");
    }

    Ok(())
}

pub fn diff_command(root: &Path, registry: Option<&Path>, names: &[String]) -> Result<()> {
    let config = ProjectConfig::load(root)?;
    let store = load_store(registry)?;
    let project = DiskFs::new(root);

    let names: Vec<&str> = if names.is_empty() {
        diff::installed_items(&store, &config, &project)
    } else {
        names.iter().map(String::as_str).collect()
    };
    if names.is_empty() {
        println!("No installed items found.");
        return Ok(());
    }

    let mut changed = 0;
    for name in names {
        let item = store.lookup(name)?;
        let files = diff::diff_item(item, &config, &project)
            .with_context(|| format!("Failed to compare files of {name}"))?;

        for file in files {
            match file.status {
                FileStatus::UpToDate => {}
                FileStatus::Missing => {
                    println!("{}: {} is not installed", file.item, file.path.display());
                }
                FileStatus::Changed(report) => {
                    changed += 1;
                    println!("{}: {}", file.item, file.path.display());
                    print!("{report}");
                    println!();
                }
            }
        }
    }

    if changed == 0 {
        println!("Everything is up to date.");
    } else {
        println!("{changed} file(s) differ from the registry.");
    }
    Ok(())
}
