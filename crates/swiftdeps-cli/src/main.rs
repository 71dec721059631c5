//! Swiftdeps - Swift package dependency resolver for Xcode projects
//!
//! Usage:
//!   swiftdeps list App.xcodeproj           # Show resolved packages
//!   swiftdeps list App.xcodeproj -f json   # Machine-readable map
//!   swiftdeps which App.xcodeproj Logging  # Package providing a module

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use swiftdeps_core::lockfile::UNKNOWN_VERSION;
use swiftdeps_core::prelude::*;

#[derive(Parser)]
#[command(name = "swiftdeps")]
#[command(about = "Resolve Swift package dependencies of an Xcode project", long_about = None)]
struct Cli {
    /// Narrate each locate/parse/extract step on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// DerivedData directory (default: ~/Library/Developer/Xcode/DerivedData)
    #[arg(long, global = true, env = "SWIFTDEPS_DERIVED_DATA")]
    derived_data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every pinned package with its version and modules
    List {
        /// Path to the .xcodeproj bundle
        project: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Print the package that provides a module
    Which {
        /// Path to the .xcodeproj bundle
        project: PathBuf,

        /// Module or package name to look up
        module: String,
    },
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "swiftdeps=debug,swiftdeps_core=debug,info"
    } else {
        "warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match cli.derived_data {
        Some(dir) => ResolverConfig::new(dir),
        None => ResolverConfig::detect().context("Failed to locate DerivedData")?,
    };
    debug!(root = %config.derived_data_dir().display(), "Using DerivedData");
    let resolver = DependencyResolver::new(config);

    match cli.command {
        Commands::List { project, format } => {
            let map = resolve(&resolver, &project)?;
            print_dependencies(&map, format)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Which { project, module } => {
            let map = resolve(&resolver, &project)?;
            run_which(&map, &module)
        }
    }
}

fn resolve(resolver: &DependencyResolver, project: &std::path::Path) -> Result<DependencyMap> {
    resolver
        .resolve(project)
        .with_context(|| format!("Failed to resolve dependencies of {}", project.display()))
}

fn run_which(map: &DependencyMap, module: &str) -> Result<ExitCode> {
    let Some(package) = map.resolve_module_to_package(module) else {
        eprintln!("No package provides '{module}'");
        return Ok(ExitCode::FAILURE);
    };

    println!("{package}");

    let others = other_owners(map, module, package);
    if !others.is_empty() {
        eprintln!("  ⚠ '{module}' is also exported by: {}", others.join(", "));
    }
    Ok(ExitCode::SUCCESS)
}

/// Packages exporting `module` besides the one `which` reported.
fn other_owners<'a>(map: &'a DependencyMap, module: &str, package: &str) -> Vec<&'a str> {
    map.packages_exporting(module)
        .into_iter()
        .filter(|owner| *owner != package)
        .collect()
}

fn print_dependencies(map: &DependencyMap, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(map)?);
        }
        OutputFormat::Table => {
            if map.is_empty() {
                println!("No dependencies pinned");
                return Ok(());
            }

            let width = map
                .package_names()
                .map(str::len)
                .max()
                .unwrap_or(0)
                .max("PACKAGE".len());

            println!("{:<width$}  {:<12}  MODULES", "PACKAGE", "VERSION");
            for dependency in map {
                let modules = if dependency.exported_modules.is_empty() {
                    "-".to_string()
                } else {
                    dependency
                        .exported_modules
                        .iter()
                        .map(String::as_str)
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                println!(
                    "{:<width$}  {:<12}  {}",
                    dependency.package_name,
                    display_version(dependency),
                    modules
                );
            }
        }
    }
    Ok(())
}

/// Releases print as-is; revision pins are shortened and marked with `@`.
fn display_version(dependency: &ResolvedDependency) -> String {
    if dependency.release().is_some() || dependency.version == UNKNOWN_VERSION {
        dependency.version.clone()
    } else {
        let short: String = dependency.version.chars().take(7).collect();
        format!("@{short}")
    }
}
