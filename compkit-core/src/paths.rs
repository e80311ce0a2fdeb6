//! Destination paths for item files
//!
//! Pure string rules: nothing here touches the filesystem. Aliases such as
//! `@/components` are mapped onto the project's `src/` directory.

use std::path::{Path, PathBuf};

use crate::config::ProjectConfig;
use crate::registry::ItemKind;

/// Alias prefixes that stand for the project source root
const ALIAS_PREFIXES: [&str; 2] = ["@/", "~/"];

/// Source root an alias prefix is mapped onto
const SOURCE_ROOT: &str = "src/";

/// Subdirectory of the components alias that UI items land in
const UI_DIR: &str = "ui";

/// Translate an import alias into a project-relative path
pub fn alias_to_path(alias: &str) -> String {
    ALIAS_PREFIXES
        .iter()
        .find_map(|prefix| alias.strip_prefix(prefix))
        .map(|rest| format!("{SOURCE_ROOT}{rest}"))
        .unwrap_or_else(|| alias.to_string())
}

/// Project-relative directory that files of `kind` are installed into
pub fn target_dir(kind: ItemKind, config: &ProjectConfig) -> PathBuf {
    let aliases = &config.aliases;
    match kind {
        ItemKind::UiComponent => PathBuf::from(alias_to_path(&aliases.components)).join(UI_DIR),
        ItemKind::Hook => PathBuf::from(alias_to_path(&aliases.hooks)),
        ItemKind::Library => PathBuf::from(alias_to_path(&aliases.utils))
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    }
}

/// File name for a virtual target, with extensions adjusted for plain JS
pub fn target_filename(target: &str, tsx: bool) -> String {
    let filename = target.rsplit('/').next().unwrap_or(target);

    if tsx {
        return filename.to_string();
    }

    if let Some(stem) = filename.strip_suffix(".tsx") {
        format!("{stem}.jsx")
    } else if let Some(stem) = filename.strip_suffix(".ts") {
        format!("{stem}.js")
    } else {
        filename.to_string()
    }
}

/// Project-relative destination of one item file
pub fn target_path(kind: ItemKind, target: &str, config: &ProjectConfig) -> PathBuf {
    target_dir(kind, config).join(target_filename(target, config.tsx))
}
