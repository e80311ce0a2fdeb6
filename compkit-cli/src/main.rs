//! compkit - copy-in UI components for your project
//!
//! Main entry point: parses the command line, sets up logging and dispatches
//! to the command implementations.

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use compkit_core::fs::DiskFs;
use compkit_core::init;
use compkit_core::installer::{self, AddOptions};
use compkit_core::packages::{CommandInstaller, PackageInstaller, PackageManager};
use compkit_core::registry::{self, OUTPUT_DIR, SOURCE_FILE};
use compkit_core::{Aliases, ItemKind, ProjectConfig, RegistryStore};

mod registry_cli;

/// Log levels
#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Parser, Debug)]
#[clap(
    name = "compkit",
    about = "Add copy-in UI components, hooks and utilities to your project",
    version
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// Set log level
    #[clap(long, default_value = "warn", global = true)]
    log_level: LogLevel,

    /// Project root (defaults to the current directory)
    #[clap(long, default_value = ".", global = true)]
    cwd: PathBuf,

    /// Registry catalog file or directory (defaults to the bundled catalog)
    #[clap(long, global = true)]
    registry: Option<PathBuf>,
}

#[derive(Parser, Debug)]
enum Command {
    /// Initialize a project: write components.json and the cn helper
    Init {
        /// Install plain JavaScript files (.js/.jsx)
        #[clap(long)]
        no_tsx: bool,

        /// Import alias for components
        #[clap(long, default_value = compkit_core::config::DEFAULT_COMPONENTS_ALIAS)]
        components: String,

        /// Import alias for the utils module
        #[clap(long, default_value = compkit_core::config::DEFAULT_UTILS_ALIAS)]
        utils: String,

        /// Import alias for hooks
        #[clap(long, default_value = compkit_core::config::DEFAULT_HOOKS_ALIAS)]
        hooks: String,

        /// Overwrite an existing components.json
        #[clap(long)]
        force: bool,

        /// Do not run the package manager
        #[clap(long)]
        skip_install: bool,
    },

    /// Add items and their dependencies to the project
    Add {
        /// Item names
        names: Vec<String>,

        /// Add every UI component
        #[clap(long, conflicts_with = "names")]
        all: bool,

        /// Replace items that are already installed
        #[clap(long)]
        overwrite: bool,

        /// Do not run the package manager
        #[clap(long)]
        skip_install: bool,
    },

    /// List the items available in the registry
    List {
        /// Only show items of this kind
        #[clap(long, value_enum)]
        kind: Option<registry_cli::KindFilter>,

        /// Output as JSON
        #[clap(long)]
        json: bool,
    },

    /// Show how installed items differ from the registry
    Diff {
        /// Item names (defaults to every installed item)
        names: Vec<String>,
    },

    /// Compile a source registry.json into per-item JSON files
    Build {
        /// Source catalog whose files reference sources by path
        #[clap(default_value = SOURCE_FILE)]
        source: PathBuf,

        /// Output directory (defaults to public/r next to the source catalog)
        #[clap(long, short)]
        output: Option<PathBuf>,
    },
}

/// Initialize tracing from --log-level
///
/// Logs always go to stderr so command output on stdout stays clean.
/// RUST_LOG, when set, takes precedence.
fn initialize_tracing(log_level: &LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_filter_directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_tracing(&cli.log_level);
    debug!("Project root: {}", cli.cwd.display());

    let registry = cli.registry.as_deref();
    match cli.command {
        Command::Init {
            no_tsx,
            components,
            utils,
            hooks,
            force,
            skip_install,
        } => {
            let config = ProjectConfig {
                schema: None,
                tsx: !no_tsx,
                aliases: Aliases {
                    components,
                    utils,
                    hooks,
                },
            };
            init_command(&cli.cwd, &config, force, skip_install)
        }
        Command::Add {
            names,
            all,
            overwrite,
            skip_install,
        } => add_command(&cli.cwd, registry, names, all, overwrite, skip_install),
        Command::List { kind, json } => registry_cli::list_command(registry, kind, json),
        Command::Diff { names } => registry_cli::diff_command(&cli.cwd, registry, &names),
        Command::Build { source, output } => build_command(&cli.cwd, &source, output.as_deref()),
    }
}

/// Bundled catalog, or the one at `path`
pub(crate) fn load_store(path: Option<&Path>) -> Result<RegistryStore> {
    match path {
        Some(path) => RegistryStore::load(path)
            .with_context(|| format!("Failed to load registry from {}", path.display())),
        None => RegistryStore::builtin().context("Bundled registry is invalid"),
    }
}

fn init_command(root: &Path, config: &ProjectConfig, force: bool, skip_install: bool) -> Result<()> {
    let report = init::initialize(root, config, force)?;
    let project = DiskFs::new(root);

    println!("Initialized compkit in {}", root.display());
    println!("  wrote   {}", report.config_path.display());
    for dir in &report.directories {
        println!("  created {}", dir.display());
    }
    for (path, written) in [&report.utils_file, &report.tailwind_config] {
        if *written {
            println!("  wrote   {}", path.display());
        } else {
            println!("  kept    {} (already exists)", path.display());
        }
    }
    if !report.tailwind_config.1 {
        println!("\nMake sure your Tailwind config includes the compkit theme tokens.");
    }
    if !report.taro_project {
        eprintln!(
            "\nWarning: {} not found in package.json. compkit components target Taro projects.",
            init::TARO_PACKAGE
        );
    }

    install_packages(root, &project, &report.missing_dependencies, skip_install);

    let manager = PackageManager::detect(&project);
    println!("\nAdd your first component with:\n  {} compkit add button", manager.runner());
    Ok(())
}

fn add_command(
    root: &Path,
    registry: Option<&Path>,
    names: Vec<String>,
    all: bool,
    overwrite: bool,
    skip_install: bool,
) -> Result<()> {
    let config = ProjectConfig::load(root)?;
    let store = load_store(registry)?;

    let names: Vec<String> = if all {
        let components = store.names_of_kind(ItemKind::UiComponent);
        if components.is_empty() {
            bail!("The registry has no UI components to add.");
        }
        components.into_iter().map(String::from).collect()
    } else {
        names
    };
    if names.is_empty() {
        bail!("No items given. Pass one or more item names, or use --all.");
    }

    let project = DiskFs::new(root);
    let outcome = installer::add(&store, &names, &config, &project, AddOptions { overwrite })?;

    for decision in outcome.plan.skipped() {
        println!(
            "Skipped {} (already installed, use --overwrite to replace it)",
            decision.item.name
        );
    }
    if !outcome.report.written.is_empty() {
        println!("Wrote {} file(s):", outcome.report.written_count());
        for path in &outcome.report.written {
            println!("  {}", path.display());
        }
    }
    for failure in &outcome.report.failures {
        eprintln!("Failed to write {}: {}", failure.path.display(), failure.source);
    }
    if outcome.plan.to_write().next().is_none() {
        println!("Nothing to add.");
    }

    install_packages(root, &project, &outcome.missing_dependencies, skip_install);

    if !outcome.report.is_complete() {
        bail!(
            "{} file(s) could not be written",
            outcome.report.failed_count()
        );
    }
    Ok(())
}

fn build_command(root: &Path, source: &Path, output: Option<&Path>) -> Result<()> {
    let source = root.join(source);
    let output = match output {
        Some(dir) => root.join(dir),
        None => source.parent().unwrap_or(root).join(OUTPUT_DIR),
    };

    let report = registry::build_registry(&source, &output)
        .with_context(|| format!("Failed to build registry from {}", source.display()))?;

    println!(
        "Built {} registry item(s) to {}",
        report.items.len(),
        report.output_dir.display()
    );
    Ok(())
}

/// Install missing packages, or print the command to do it by hand
fn install_packages(root: &Path, project: &DiskFs, packages: &[String], skip_install: bool) {
    let manager = PackageManager::detect(project);
    let Some(command) = manager.install_command(packages) else {
        return;
    };
    let command = command.join(" ");

    if skip_install {
        println!("\nInstall the required packages with:\n  {command}");
        return;
    }

    println!("\nInstalling {} with {manager}...", packages.join(", "));
    let installer = CommandInstaller::new(root, manager);
    if let Err(e) = installer.install(packages) {
        warn!("{e}");
        eprintln!("Package installation failed. Run it yourself:\n  {command}");
    }
}
