//! # Strawplan CLI
//!
//! Command line driver for the construction engine.
//!
//! Commands:
//! - `wall`      - Construct one wall of a perimeter
//! - `perimeter` - Construct every wall of a perimeter
//! - `catalog`   - Print the built-in configuration catalog as TOML

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use plan_core::config::ConfigSnapshot;
use plan_core::construction::{construct_perimeter, construct_wall, ConstructionModel};
use plan_core::errors::{PlanError, PlanResult};
use plan_core::file_io::{load_config, load_project};
use plan_core::ids::{PerimeterId, WallId};
use plan_core::units::format_length;
use tracing::info;

#[derive(Parser)]
#[command(name = "plan_cli", about = "Strawbale wall construction planner", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration catalog (TOML or JSON); the built-in catalog when omitted
    #[arg(short, long, global = true, env = "STRAWPLAN_CONFIG")]
    config: Option<PathBuf>,

    /// Print the construction model as JSON instead of a summary
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Construct one wall
    Wall {
        /// Project file (JSON)
        project: PathBuf,

        #[arg(short, long)]
        perimeter: String,

        #[arg(short, long)]
        wall: String,
    },

    /// Construct every wall of a perimeter
    Perimeter {
        /// Project file (JSON)
        project: PathBuf,

        #[arg(short, long)]
        perimeter: String,
    },

    /// Print the built-in catalog
    Catalog,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error [{}]: {}", e.error_code(), e);
            if cli.json {
                if let Ok(json) = serde_json::to_string_pretty(&e) {
                    eprintln!("{}", json);
                }
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> PlanResult<()> {
    match &cli.command {
        Commands::Catalog => {
            let text = toml::to_string_pretty(&ConfigSnapshot::builtin())
                .map_err(|e| PlanError::serialization(e.to_string()))?;
            println!("{}", text);
        }
        Commands::Wall {
            project,
            perimeter,
            wall,
        } => {
            let config = config(cli.config.as_deref())?;
            let project = load_project(project)?;
            let model = construct_wall(&project, &config, &PerimeterId::new(perimeter.as_str()), &WallId::new(wall.as_str()))?;
            if cli.json {
                print_json(&model)?;
            } else {
                print_summary(wall, &model);
            }
        }
        Commands::Perimeter { project, perimeter } => {
            let config = config(cli.config.as_deref())?;
            let project = load_project(project)?;
            let models = construct_perimeter(&project, &config, &PerimeterId::new(perimeter.as_str()))?;
            if cli.json {
                print_json(&models)?;
            } else {
                for (wall_id, model) in &models {
                    print_summary(wall_id.as_str(), model);
                    println!();
                }
                let errors: usize = models.iter().map(|(_, m)| m.errors.len()).sum();
                println!("{} walls, {} errors", models.len(), errors);
            }
        }
    }
    Ok(())
}

fn config(path: Option<&Path>) -> PlanResult<ConfigSnapshot> {
    let config = match path {
        Some(path) => {
            info!(path = %path.display(), "Loading configuration");
            load_config(path)?
        }
        None => ConfigSnapshot::builtin(),
    };
    config.validate()?;
    Ok(config)
}

fn print_json<T: serde::Serialize>(value: &T) -> PlanResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| PlanError::serialization(e.to_string()))?;
    println!("{}", json);
    Ok(())
}

fn print_summary(wall_id: &str, model: &ConstructionModel) {
    println!("═══════════════════════════════════════");
    println!("  WALL {}", wall_id);
    println!("═══════════════════════════════════════");
    if let Some(bounds) = model.bounds {
        let size = bounds.size();
        println!(
            "  Extent: {} x {} x {} mm",
            format_length(size.x),
            format_length(size.y),
            format_length(size.z)
        );
    }
    println!("  Elements: {} ({} pieces)", model.elements.len(), model.leaf_count());
    for (tag, count) in model.tag_counts() {
        println!("    {:<20} {}", tag.label(), count);
    }
    for error in &model.errors {
        println!("  ERROR   {}", error.description);
    }
    for warning in &model.warnings {
        println!("  WARNING {}", warning.description);
    }
    println!(
        "  RESULT: {}",
        if model.is_valid() { "OK" } else { "HAS ERRORS" }
    );
}
