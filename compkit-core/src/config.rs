//! Project configuration (`components.json`)
//!
//! The file is user-owned and read once per invocation. A missing file and a
//! malformed file are distinct errors: the first is fixed by `compkit init`,
//! the second names what is wrong with it.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{RegistryError, Result};

/// Configuration file name, looked up in the project root
pub const CONFIG_FILE: &str = "components.json";

pub const DEFAULT_COMPONENTS_ALIAS: &str = "@/components";
pub const DEFAULT_UTILS_ALIAS: &str = "@/lib/utils";
pub const DEFAULT_HOOKS_ALIAS: &str = "@/hooks";

/// Import aliases for the three install locations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aliases {
    pub components: String,
    pub utils: String,
    pub hooks: String,
}

impl Default for Aliases {
    fn default() -> Self {
        Self {
            components: DEFAULT_COMPONENTS_ALIAS.to_string(),
            utils: DEFAULT_UTILS_ALIAS.to_string(),
            hooks: DEFAULT_HOOKS_ALIAS.to_string(),
        }
    }
}

/// Validated project configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Keep TypeScript extensions; `false` installs `.js`/`.jsx`
    #[serde(default = "default_tsx")]
    pub tsx: bool,

    pub aliases: Aliases,
}

fn default_tsx() -> bool {
    true
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            schema: None,
            tsx: true,
            aliases: Aliases::default(),
        }
    }
}

impl ProjectConfig {
    /// Path of the configuration file for a project root
    pub fn path_in(root: &Path) -> PathBuf {
        root.join(CONFIG_FILE)
    }

    pub fn exists(root: &Path) -> bool {
        Self::path_in(root).is_file()
    }

    /// Read and validate `components.json` from a project root
    pub fn load(root: &Path) -> Result<Self> {
        let path = Self::path_in(root);

        if !path.exists() {
            return Err(RegistryError::ConfigMissing { path });
        }

        let content = std::fs::read_to_string(&path).map_err(|e| RegistryError::ConfigInvalid {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        let config = Self::parse(&content).map_err(|reason| RegistryError::ConfigInvalid {
            path: path.clone(),
            reason,
        })?;

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse configuration text; the error string names the offending key
    pub fn parse(content: &str) -> std::result::Result<Self, String> {
        let config: Self = serde_json::from_str(content).map_err(|e| e.to_string())?;
        config.validate()?;
        Ok(config)
    }

    /// Check alias values; the error string names the offending key
    pub fn validate(&self) -> std::result::Result<(), String> {
        let aliases = [
            ("aliases.components", &self.aliases.components),
            ("aliases.utils", &self.aliases.utils),
            ("aliases.hooks", &self.aliases.hooks),
        ];

        for (key, value) in aliases {
            if value.trim().is_empty() {
                return Err(format!("{key} must not be empty"));
            }
        }

        if let Some(key) = crate::transform::unstable_alias(&self.aliases) {
            return Err(format!(
                "{key} must not point into @/lib/utils or @/hooks/<name>"
            ));
        }

        Ok(())
    }

    /// Write the configuration as pretty JSON with a trailing newline
    pub fn write(&self, root: &Path) -> Result<PathBuf> {
        let path = Self::path_in(root);
        let write_err = |source| RegistryError::ConfigWrite {
            path: path.clone(),
            source,
        };

        let mut content = serde_json::to_string_pretty(self)
            .map_err(|e| write_err(std::io::Error::other(e)))?;
        content.push('\n');

        std::fs::write(&path, content).map_err(write_err)?;
        debug!("Wrote configuration to {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let config = ProjectConfig::parse(
            r#"{
                "$schema": "https://example.com/schema.json",
                "tsx": false,
                "aliases": { "components": "~/ui", "utils": "~/lib/cn", "hooks": "~/use" }
            }"#,
        )
        .unwrap();

        assert!(!config.tsx);
        assert_eq!(config.aliases.utils, "~/lib/cn");
        assert_eq!(config.schema.as_deref(), Some("https://example.com/schema.json"));
    }

    #[test]
    fn test_tsx_defaults_to_true() {
        let config = ProjectConfig::parse(
            r#"{ "aliases": { "components": "@/c", "utils": "@/lib/utils", "hooks": "@/h" } }"#,
        )
        .unwrap();
        assert!(config.tsx);
    }

    #[test]
    fn test_missing_alias_is_named() {
        let err = ProjectConfig::parse(r#"{ "aliases": { "components": "@/c", "utils": "@/u" } }"#)
            .unwrap_err();
        assert!(err.contains("hooks"), "{err}");

        let err = ProjectConfig::parse(
            r#"{ "aliases": { "components": "", "utils": "@/u", "hooks": "@/h" } }"#,
        )
        .unwrap_err();
        assert!(err.contains("aliases.components"), "{err}");
    }

    #[test]
    fn test_overlapping_aliases_rejected() {
        let err = ProjectConfig::parse(
            r#"{ "aliases": { "components": "@/c", "utils": "~/u", "hooks": "@/lib" } }"#,
        )
        .unwrap_err();
        assert!(err.contains("aliases.hooks"), "{err}");

        let err = ProjectConfig::parse(
            r#"{ "aliases": { "components": "@/c", "utils": "@/hooks/cn", "hooks": "~/h" } }"#,
        )
        .unwrap_err();
        assert!(err.contains("aliases.utils"), "{err}");
    }

    #[test]
    fn test_missing_vs_invalid_file() {
        let temp_dir = TempDir::new().unwrap();

        let err = ProjectConfig::load(temp_dir.path()).unwrap_err();
        assert!(matches!(err, RegistryError::ConfigMissing { .. }));

        std::fs::write(temp_dir.path().join(CONFIG_FILE), "{ \"tsx\": true").unwrap();
        let err = ProjectConfig::load(temp_dir.path()).unwrap_err();
        assert!(matches!(err, RegistryError::ConfigInvalid { .. }));
    }

    #[test]
    fn test_write_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let config = ProjectConfig::default();

        let path = config.write(temp_dir.path()).unwrap();
        assert!(std::fs::read_to_string(path).unwrap().ends_with("}\n"));
        assert!(ProjectConfig::exists(temp_dir.path()));
        assert_eq!(ProjectConfig::load(temp_dir.path()).unwrap(), config);
    }
}
