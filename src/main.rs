//! OpenThread library importer CLI
//!
//! Validates the per-target library configuration against the catalog of
//! known libraries, builds the required libraries and imports their
//! archives into `../lib/<target>/<toolchain>/`.
//!
//! # Usage
//!
//! ```bash
//! # Validate the configuration only
//! otlibs check
//!
//! # Build every required library (GCC makefiles)
//! otlibs build
//!
//! # Copy archives for every configured compiler
//! otlibs import
//!
//! # Copy archives for some compilers only (case-insensitive)
//! otlibs import gcc IAR
//!
//! # Show what is built / imported
//! otlibs status
//!
//! # Remove per-target build directories
//! otlibs clean
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use otlibs::config::{CATALOG_FILE_NAME, CONFIG_FILE_NAME};
use otlibs::status::NextStep;
use otlibs::{Project, ProjectPaths, Toolchain, ToolchainFilter};

#[derive(Parser)]
#[command(name = "otlibs")]
#[command(author, version, about = "OpenThread static library importer", long_about = None)]
struct Cli {
    /// Project directory holding the YAML documents and target trees
    #[arg(short = 'C', long, global = true, default_value = ".")]
    project_dir: PathBuf,

    /// Configuration document, relative to the project directory
    #[arg(long, global = true, default_value = CONFIG_FILE_NAME)]
    config: PathBuf,

    /// Library catalog document, relative to the project directory
    #[arg(long, global = true, default_value = CATALOG_FILE_NAME)]
    catalog: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy built archives into ../lib
    Import {
        /// Only these compilers (default: all configured)
        toolchains: Vec<String>,
    },

    /// Build every required library with make
    Build {
        /// Only these compilers (default: all configured)
        toolchains: Vec<String>,
    },

    /// Remove every subdirectory of every target directory
    Clean,

    /// Validate the configuration without touching the filesystem
    Check,

    /// Show build and import status of required libraries
    Status {
        /// Only this target
        #[arg(short, long)]
        target: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .parse_default_env()
        .format_timestamp(None)
        .init();

    let paths = ProjectPaths::new(&cli.project_dir)
        .with_config(&cli.config)
        .with_catalog(&cli.catalog);

    let result = match cli.command {
        Commands::Import { toolchains } => cmd_import(paths, &toolchains),
        Commands::Build { toolchains } => cmd_build(paths, &toolchains),
        Commands::Clean => cmd_clean(paths),
        Commands::Check => cmd_check(paths),
        Commands::Status { target } => cmd_status(paths, target.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn open(paths: ProjectPaths) -> Result<Project> {
    let config = paths.config.clone();
    Project::open(paths).with_context(|| format!("invalid configuration {}", config.display()))
}

fn cmd_import(paths: ProjectPaths, toolchains: &[String]) -> Result<()> {
    let project = open(paths)?;
    let filter = ToolchainFilter::from_names(toolchains);

    let summary = otlibs::import::import_libraries(&project, &filter).context("import failed")?;

    println!("\n=== Import Complete ===");
    println!(
        "  Scanned: {} archive(s) in {}",
        summary.artifacts_scanned,
        project.paths.artifacts_dir().display()
    );
    println!("  Copied:  {} archive(s)", summary.copied.len());
    if !summary.skipped.is_empty() {
        println!("  Skipped: {} compiler(s) by filter", summary.skipped.len());
    }
    println!("  Output:  {}", project.paths.output_dir().display());
    Ok(())
}

fn cmd_build(paths: ProjectPaths, toolchains: &[String]) -> Result<()> {
    let project = open(paths)?;
    let filter = ToolchainFilter::from_names(toolchains);

    if otlibs::build::runs_make(&filter) {
        let preflight = otlibs::preflight::run_all(otlibs::build::MAKE);
        if !preflight.is_ok() {
            preflight.print_summary();
            bail!("preflight failed:\n{}", preflight.error_summary());
        }
    }

    let steps = otlibs::build::build_libraries(&project, &filter, otlibs::build::MAKE)?;

    println!("\n=== Build Complete ===");
    println!("  Built: {} librar{}", steps.len(), if steps.len() == 1 { "y" } else { "ies" });
    println!("\nNext: otlibs import");
    Ok(())
}

fn cmd_clean(paths: ProjectPaths) -> Result<()> {
    let config = Project::open_config(&paths)?;
    let removed = otlibs::clean::clean_targets(&paths, &config)?;
    println!("Removed {} director{}", removed.len(), if removed.len() == 1 { "y" } else { "ies" });
    Ok(())
}

fn cmd_check(paths: ProjectPaths) -> Result<()> {
    let project = open(paths)?;

    println!("Configuration OK");
    println!("================");
    for (target, params) in &project.config.targets {
        println!(
            "  {:<16} required: {:>2}  dropped: {:>2}  compilers: {}",
            target,
            params.required_libs.len(),
            params.dropped_libs.len(),
            if params.compilers.is_empty() {
                "-".to_string()
            } else {
                params.compilers.join(", ")
            }
        );
    }
    if !project.report.is_clean() {
        println!("\n{} warning(s):", project.report.warnings.len());
        for warning in &project.report.warnings {
            println!("  - {}", warning);
        }
    }
    Ok(())
}

fn cmd_status(paths: ProjectPaths, target: Option<&str>) -> Result<()> {
    let project = open(paths)?;
    let report = otlibs::status::collect(&project, target)?;

    println!("Library Status");
    println!("==============");
    let mut current: Option<(&str, Toolchain)> = None;
    for entry in &report.entries {
        if current != Some((entry.target.as_str(), entry.toolchain)) {
            println!("\n{} / {}:", entry.target, entry.toolchain);
            current = Some((entry.target.as_str(), entry.toolchain));
        }
        let built = if entry.built { "BUILT" } else { "NOT BUILT" };
        let imported = if entry.imported { "IMPORTED" } else { "NOT IMPORTED" };
        println!("  {:<32} {:<10} {}", entry.library, built, imported);
    }
    println!();

    println!("Next steps:");
    match report.next_step() {
        NextStep::Build => {
            println!(
                "  {} archive(s) missing. Run 'otlibs build'.",
                report.missing_builds()
            );
            if !otlibs::preflight::has_tool(otlibs::build::MAKE) {
                println!("  Note: {} is not on PATH.", otlibs::build::MAKE);
            }
        }
        NextStep::Import => println!(
            "  {} archive(s) not imported. Run 'otlibs import'.",
            report.missing_imports()
        ),
        NextStep::Done => println!("  All libraries imported."),
    }
    Ok(())
}
